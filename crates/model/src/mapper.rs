//! Translation between the remote repository's wire shape and [`Book`].
//!
//! The remote API speaks English field names and is loose about types: `read`
//! and `favorite` may be booleans, `"true"`/`"false"` strings or `0`/`1`,
//! `year` may be a number or a string, `rating` may be missing. Those fields
//! are kept as raw [`Value`]s on [`RemoteBook`] and resolved exactly once, in
//! [`from_remote`].

use crate::flag::normalize_flag;
use crate::models::{Book, BookDraft, BookId, MAX_RATING, Note};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A book as sent and received by the remote repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub year: Value,
    #[serde(default)]
    pub read: Value,
    #[serde(default)]
    pub favorite: Value,
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<RemoteNote>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNote {
    pub content: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Map a wire record into the canonical [`Book`].
///
/// Total: missing or unrecognisable fields fall back to their defaults rather
/// than failing. A record without an id maps to an unassigned [`BookId`].
///
/// # Examples
///
/// ```
/// use shelf_model::{RemoteBook, from_remote};
///
/// let raw: RemoteBook = serde_json::from_str(r#"{"id": 3, "name": "Dune", "author": "Herbert", "read": "1"}"#).unwrap();
/// let book = from_remote(raw);
/// assert_eq!(book.nom, "Dune");
/// assert!(book.lu);
/// assert_eq!(book.rating, 0);
/// ```
pub fn from_remote(raw: RemoteBook) -> Book {
    let RemoteBook {
        id,
        name,
        author,
        editor,
        year,
        read,
        favorite,
        rating,
        cover,
        theme,
        notes,
    } = raw;
    Book {
        id: id.unwrap_or_default(),
        nom: name.unwrap_or_default(),
        auteur: author.unwrap_or_default(),
        editeur: editor,
        annee: lenient_year(&year),
        lu: normalize_flag(&read),
        favorite: normalize_flag(&favorite),
        rating: lenient_rating(&rating),
        cover,
        theme,
        notes: notes.unwrap_or_default().into_iter().map(Note::from).collect(),
    }
}

/// Map a [`Book`] back into the wire shape.
///
/// Flags are already strict booleans, so they are sent as JSON booleans.
pub fn to_remote(book: &Book) -> RemoteBook {
    let mut raw = RemoteBook::from(&book.draft());
    raw.id = book.id.is_assigned().then(|| book.id.clone());
    raw.notes = (!book.notes.is_empty()).then(|| book.notes.iter().map(RemoteNote::from).collect());
    raw
}

/// Map a whole collection with [`from_remote`].
pub fn normalize_books(list: Vec<RemoteBook>) -> Vec<Book> {
    let books: Vec<Book> = list.into_iter().map(from_remote).collect();
    tracing::debug!(books = books.len(), "Normalized remote books");
    books
}

impl From<RemoteBook> for Book {
    fn from(raw: RemoteBook) -> Self {
        from_remote(raw)
    }
}
impl From<&Book> for RemoteBook {
    fn from(book: &Book) -> Self {
        to_remote(book)
    }
}
impl From<&BookDraft> for RemoteBook {
    fn from(draft: &BookDraft) -> Self {
        Self {
            id: None,
            name: Some(draft.nom.clone()),
            author: Some(draft.auteur.clone()),
            editor: draft.editeur.clone(),
            year: draft.annee.map(Value::from).unwrap_or(Value::Null),
            read: Value::Bool(draft.lu),
            favorite: Value::Bool(draft.favorite),
            rating: Value::from(draft.rating),
            cover: draft.cover.clone(),
            theme: draft.theme.clone(),
            notes: None,
        }
    }
}
impl From<RemoteNote> for Note {
    fn from(note: RemoteNote) -> Self {
        Note::new(note.content, note.created_at)
    }
}
impl From<&Note> for RemoteNote {
    fn from(note: &Note) -> Self {
        Self {
            content: note.content.clone(),
            created_at: note.created_at,
        }
    }
}

fn lenient_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_rating(value: &Value) -> u8 {
    let rating = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    // Out-of-range ratings are clamped rather than rejected; this runs on
    // data the server already accepted.
    rating.map(|r| r.clamp(0, i64::from(MAX_RATING)) as u8).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn raw(value: Value) -> RemoteBook {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_field_renames() {
        let book = from_remote(raw(json!({
            "id": "b1",
            "name": "Dune",
            "author": "Frank Herbert",
            "editor": "Chilton",
            "year": 1965,
            "read": true,
            "favorite": false,
            "rating": 5,
            "cover": "https://example.org/dune.jpg",
            "theme": "SF",
        })));
        assert_eq!(book.id, BookId::from("b1"));
        assert_eq!(book.nom, "Dune");
        assert_eq!(book.auteur, "Frank Herbert");
        assert_eq!(book.editeur.as_deref(), Some("Chilton"));
        assert_eq!(book.annee, Some(1965));
        assert!(book.lu);
        assert!(!book.favorite);
        assert_eq!(book.rating, 5);
        assert_eq!(book.cover.as_deref(), Some("https://example.org/dune.jpg"));
        assert_eq!(book.theme.as_deref(), Some("SF"));
        assert!(book.notes.is_empty());
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("true"), true)]
    #[case(json!(1), true)]
    #[case(json!("1"), true)]
    #[case(json!("false"), false)]
    #[case(json!(0), false)]
    #[case(json!("oui"), false)]
    #[case(json!(null), false)]
    fn test_flags_are_strict(#[case] flag: Value, #[case] expected: bool) {
        let book = from_remote(raw(json!({"name": "x", "author": "y", "read": flag, "favorite": flag})));
        assert_eq!(book.lu, expected);
        assert_eq!(book.favorite, expected);
    }

    #[test]
    fn test_missing_fields_default() {
        let book = from_remote(raw(json!({})));
        assert!(!book.id.is_assigned());
        assert_eq!(book.nom, "");
        assert!(!book.lu);
        assert!(!book.favorite);
        assert_eq!(book.rating, 0);
        assert_eq!(book.annee, None);
    }

    #[rstest]
    #[case(json!(1984), Some(1984))]
    #[case(json!("1984"), Some(1984))]
    #[case(json!(" 2001 "), Some(2001))]
    #[case(json!("soon"), None)]
    #[case(json!(null), None)]
    fn test_lenient_year(#[case] year: Value, #[case] expected: Option<i32>) {
        assert_eq!(from_remote(raw(json!({"year": year}))).annee, expected);
    }

    #[rstest]
    #[case(json!(3), 3)]
    #[case(json!("4"), 4)]
    #[case(json!(4.0), 4)]
    #[case(json!(9), 5)]
    #[case(json!(-1), 0)]
    #[case(json!(null), 0)]
    fn test_lenient_rating(#[case] rating: Value, #[case] expected: u8) {
        assert_eq!(from_remote(raw(json!({"rating": rating}))).rating, expected);
    }

    #[test]
    fn test_to_remote_renames() {
        let mut book = Book::new("7", "1984", "Orwell");
        book.lu = true;
        let raw = serde_json::to_value(to_remote(&book)).unwrap();
        assert_eq!(raw["id"], json!("7"));
        assert_eq!(raw["name"], json!("1984"));
        assert_eq!(raw["author"], json!("Orwell"));
        assert_eq!(raw["read"], json!(true));
        assert_eq!(raw["favorite"], json!(false));
        assert_eq!(raw["rating"], json!(0));
        assert!(raw.get("notes").is_none());
    }

    #[test]
    fn test_draft_has_no_id() {
        let raw = serde_json::to_value(RemoteBook::from(&Book::new("7", "a", "b").draft())).unwrap();
        assert!(raw.get("id").is_none());
    }

    #[test]
    fn test_round_trip() {
        let book = Book {
            id: BookId::from("42"),
            nom: "Le Petit Prince".to_string(),
            auteur: "Saint-Exupéry".to_string(),
            editeur: Some("Gallimard".to_string()),
            annee: Some(1943),
            lu: true,
            favorite: true,
            rating: 4,
            cover: Some("file:///covers/prince.png".to_string()),
            theme: Some("Conte".to_string()),
            notes: vec![Note::new("relire", OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap())],
        };
        assert_eq!(from_remote(to_remote(&book)), book);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut book = Book::new("3", "Dune", "Herbert");
        book.notes.push(Note::new("spice", OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap()));
        let json = serde_json::to_string(&to_remote(&book)).unwrap();
        let back: RemoteBook = serde_json::from_str(&json).unwrap();
        assert_eq!(from_remote(back), book);
    }

    #[test]
    fn test_notes_wire_format() {
        let book = from_remote(raw(json!({
            "notes": [{"content": "first", "createdAt": "2024-01-02T03:04:05Z"}],
        })));
        assert_eq!(book.notes.len(), 1);
        assert_eq!(book.notes[0].content, "first");
        assert_eq!(book.notes[0].created_at.unix_timestamp(), 1_704_164_645);
    }

    #[test]
    fn test_normalize_books() {
        let list = vec![raw(json!({"id": 1, "read": "1"})), raw(json!({"id": 2, "read": 0}))];
        let books = normalize_books(list);
        assert_eq!(books.len(), 2);
        assert!(books[0].lu);
        assert!(!books[1].lu);
        assert!(normalize_books(Vec::new()).is_empty());
    }

    #[test]
    fn test_absent_record_passes_through() {
        let raw: Option<RemoteBook> = serde_json::from_str("null").unwrap();
        assert_eq!(raw.map(from_remote), None);
        let book: Option<&Book> = None;
        assert_eq!(book.map(to_remote), None);
    }
}
