use crate::error::{ErrorKind, Result};
use crate::models::{Book, BookDraft, MAX_RATING};

/// Raw add/edit form input, exactly as typed by the user.
///
/// Nothing here has been trimmed or checked yet; call
/// [`validate()`](Self::validate) to get a [`BookDraft`] that is safe to send
/// to the remote repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub nom: String,
    pub auteur: String,
    pub editeur: String,
    pub annee: String,
    pub lu: bool,
    pub favorite: bool,
    pub rating: u8,
    pub cover: Option<String>,
    pub theme: Option<String>,
}
impl BookForm {
    /// Check the form and turn it into a [`BookDraft`].
    ///
    /// - title and author are trimmed and must not be empty,
    /// - publisher is trimmed, and dropped when empty,
    /// - year is optional, but when present must be exactly four digits,
    /// - rating must not exceed [`MAX_RATING`].
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf_model::BookForm;
    ///
    /// let form = BookForm {
    ///     nom: "  Dune ".to_string(),
    ///     auteur: "Herbert".to_string(),
    ///     annee: "1965".to_string(),
    ///     ..BookForm::default()
    /// };
    /// let draft = form.clone().validate().unwrap();
    /// assert_eq!(draft.nom, "Dune");
    /// assert_eq!(draft.annee, Some(1965));
    ///
    /// let bad = BookForm { annee: "65".to_string(), ..form };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(self) -> Result<BookDraft> {
        let nom = self.nom.trim();
        let auteur = self.auteur.trim();
        if nom.is_empty() || auteur.is_empty() {
            exn::bail!(ErrorKind::MissingTitleOrAuthor);
        }
        let annee = parse_year(&self.annee)?;
        if self.rating > MAX_RATING {
            exn::bail!(ErrorKind::InvalidRating(self.rating));
        }
        let editeur = Some(self.editeur.trim()).filter(|e| !e.is_empty()).map(str::to_string);
        Ok(BookDraft {
            nom: nom.to_string(),
            auteur: auteur.to_string(),
            editeur,
            annee,
            lu: self.lu,
            favorite: self.favorite,
            rating: self.rating,
            cover: self.cover.filter(|c| !c.is_empty()),
            theme: self.theme.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        })
    }
}

/// Prefill an edit form from an existing book.
impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            nom: book.nom.clone(),
            auteur: book.auteur.clone(),
            editeur: book.editeur.clone().unwrap_or_default(),
            annee: book.annee.map(|year| year.to_string()).unwrap_or_default(),
            lu: book.lu,
            favorite: book.favorite,
            rating: book.rating,
            cover: book.cover.clone(),
            theme: book.theme.clone(),
        }
    }
}

fn parse_year(input: &str) -> Result<Option<i32>> {
    let year = input.trim();
    if year.is_empty() {
        return Ok(None);
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        exn::bail!(ErrorKind::InvalidYear(year.to_string()));
    }
    // Four ASCII digits always fit.
    Ok(year.parse().ok())
}
