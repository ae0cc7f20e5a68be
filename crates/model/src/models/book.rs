use super::{BookId, Note};

/// Highest allowed rating. A rating of `0` means "unrated".
pub const MAX_RATING: u8 = 5;

/// A tracked book, in the canonical shape every view and cache operates on.
///
/// Field names follow the library's own vocabulary (`nom`, `auteur`, ...);
/// the English wire names only exist on [`RemoteBook`](crate::RemoteBook).
/// `lu` and `favorite` are always strict booleans here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    /// Title
    pub nom: String,
    /// Author
    pub auteur: String,
    /// Publisher
    pub editeur: Option<String>,
    /// Four-digit publication year
    pub annee: Option<i32>,
    /// Read status
    pub lu: bool,
    pub favorite: bool,
    /// `0..=5`, `0` being unrated
    pub rating: u8,
    /// Cover image URI or URL
    pub cover: Option<String>,
    /// Free-form category or genre
    pub theme: Option<String>,
    pub notes: Vec<Note>,
}
impl Book {
    pub fn new(id: impl Into<BookId>, nom: impl Into<String>, auteur: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nom: nom.into(),
            auteur: auteur.into(),
            ..Self::default()
        }
    }

    /// Build a book from a draft once the remote repository has assigned an id.
    pub fn from_draft(id: impl Into<BookId>, draft: BookDraft) -> Self {
        let mut book = Self {
            id: id.into(),
            ..Self::default()
        };
        book.apply(draft);
        book
    }

    /// Overwrite every editable field with the draft, keeping `id` and `notes`.
    pub fn apply(&mut self, draft: BookDraft) {
        let BookDraft {
            nom,
            auteur,
            editeur,
            annee,
            lu,
            favorite,
            rating,
            cover,
            theme,
        } = draft;
        self.nom = nom;
        self.auteur = auteur;
        self.editeur = editeur;
        self.annee = annee;
        self.lu = lu;
        self.favorite = favorite;
        self.rating = rating;
        self.cover = cover;
        self.theme = theme;
    }

    /// The editable fields of this book, without `id` and `notes`.
    pub fn draft(&self) -> BookDraft {
        BookDraft {
            nom: self.nom.clone(),
            auteur: self.auteur.clone(),
            editeur: self.editeur.clone(),
            annee: self.annee,
            lu: self.lu,
            favorite: self.favorite,
            rating: self.rating,
            cover: self.cover.clone(),
            theme: self.theme.clone(),
        }
    }

    /// Whether the book has been given a positive rating.
    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }
}
impl AsRef<Book> for Book {
    fn as_ref(&self) -> &Book {
        self
    }
}

/// A book that hasn't been created on the remote repository yet.
///
/// Produced by [`BookForm::validate`](crate::BookForm::validate), so a draft
/// always satisfies the title/author/year/rating rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub nom: String,
    pub auteur: String,
    pub editeur: Option<String>,
    pub annee: Option<i32>,
    pub lu: bool,
    pub favorite: bool,
    pub rating: u8,
    pub cover: Option<String>,
    pub theme: Option<String>,
}
