//! Filtered, sorted projections of the collection.
//!
//! [`derive_view`] is a pure function: it never touches the repository or the
//! cache and never mutates its input. Filtering happens before sorting, and
//! sorting is stable, so books that compare equal keep their collection order.

use derive_more::Display;
use shelf_model::Book;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Which books to keep, by read/favorite state.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    #[display("all")]
    All,
    #[display("read")]
    Read,
    #[display("unread")]
    Unread,
    #[display("favorites")]
    Favorites,
}
impl Filter {
    fn keeps(self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Read => book.lu,
            Self::Unread => !book.lu,
            Self::Favorites => book.favorite,
        }
    }
}
/// Unknown values parse as [`Filter::All`].
impl FromStr for Filter {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "read" => Self::Read,
            "unread" => Self::Unread,
            "favorites" => Self::Favorites,
            _ => Self::All,
        })
    }
}

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    #[display("titre")]
    Titre,
    #[display("auteur")]
    Auteur,
    #[display("theme")]
    Theme,
}
/// Unknown values parse as [`SortKey::Titre`].
impl FromStr for SortKey {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "auteur" => Self::Auteur,
            "theme" => Self::Theme,
            _ => Self::Titre,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Free-text search over title and author. Blank means "no search".
    pub query: String,
    pub filter: Filter,
    pub sort: SortKey,
}
impl ViewQuery {
    pub fn new(query: impl Into<String>, filter: Filter, sort: SortKey) -> Self {
        Self {
            query: query.into(),
            filter,
            sort,
        }
    }
}

/// Collation key for title and author sorting.
///
/// The primary level ignores case and accents (`é` sorts with `e`); the
/// secondary level breaks ties between strings that differ only in accents.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Collation {
    primary: String,
    secondary: String,
}
impl Collation {
    fn new(s: &str) -> Self {
        Self {
            primary: s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect(),
            secondary: s.to_lowercase(),
        }
    }
}

fn matches_query(book: &Book, needle: &str) -> bool {
    book.nom.to_lowercase().contains(needle) || book.auteur.to_lowercase().contains(needle)
}

/// Filter and sort a copy of `books` according to `query`.
///
/// # Examples
///
/// ```
/// use shelf_library::view::{Filter, SortKey, ViewQuery, derive_view};
/// use shelf_model::Book;
///
/// let books = vec![Book::new("1", "Dune", "Herbert"), Book::new("2", "1984", "Orwell")];
/// let view = derive_view(&books, &ViewQuery::new("orw", Filter::All, SortKey::Auteur));
/// assert_eq!(view.len(), 1);
/// assert_eq!(view[0].nom, "1984");
/// ```
pub fn derive_view(books: &[Book], query: &ViewQuery) -> Vec<Book> {
    let needle = query.query.trim().to_lowercase();
    let mut view: Vec<Book> = books
        .iter()
        .filter(|book| query.filter.keeps(book))
        .filter(|book| needle.is_empty() || matches_query(book, &needle))
        .cloned()
        .collect();
    match query.sort {
        SortKey::Titre => view.sort_by_cached_key(|book| Collation::new(&book.nom)),
        SortKey::Auteur => view.sort_by_cached_key(|book| Collation::new(&book.auteur)),
        // Plain code-point order, no case or accent folding.
        SortKey::Theme => view.sort_by(|a, b| compare_theme(a.theme.as_deref(), b.theme.as_deref())),
    }
    tracing::trace!(total = books.len(), shown = view.len(), filter = %query.filter, sort = %query.sort, "Derived view");
    view
}

fn compare_theme(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.unwrap_or("").cmp(b.unwrap_or(""))
}
