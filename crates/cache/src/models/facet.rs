//! Serialization proxies for the cached collection.
//!
//! The cached JSON keeps the library's own field names (`nom`, `auteur`, ...)
//! rather than the remote wire names, and stores flags as real booleans: what
//! comes out of the cache has already been through the mapper once.

use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use shelf_model::{Book, BookId, Note};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(facet::Facet)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct BookProxy {
    id: String,
    nom: String,
    auteur: String,
    #[facet(default, skip_serializing_if = Option::is_none)]
    editeur: Option<String>,
    #[facet(default, skip_serializing_if = Option::is_none)]
    annee: Option<i32>,
    lu: bool,
    favorite: bool,
    rating: u8,
    #[facet(default, skip_serializing_if = Option::is_none)]
    cover: Option<String>,
    #[facet(default, skip_serializing_if = Option::is_none)]
    theme: Option<String>,
    #[facet(default)]
    notes: Vec<NoteProxy>,
}
impl TryFrom<&Book> for BookProxy {
    type Error = Error;
    fn try_from(book: &Book) -> Result<Self, Self::Error> {
        Ok(Self {
            id: book.id.to_string(),
            nom: book.nom.clone(),
            auteur: book.auteur.clone(),
            editeur: book.editeur.clone(),
            annee: book.annee,
            lu: book.lu,
            favorite: book.favorite,
            rating: book.rating,
            cover: book.cover.clone(),
            theme: book.theme.clone(),
            notes: book.notes.iter().map(NoteProxy::try_from).collect::<Result<_, _>>()?,
        })
    }
}
impl TryFrom<BookProxy> for Book {
    type Error = Error;
    fn try_from(proxy: BookProxy) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookId::new(proxy.id),
            nom: proxy.nom,
            auteur: proxy.auteur,
            editeur: proxy.editeur,
            annee: proxy.annee,
            lu: proxy.lu,
            favorite: proxy.favorite,
            rating: proxy.rating,
            cover: proxy.cover,
            theme: proxy.theme,
            notes: proxy.notes.into_iter().map(Note::try_from).collect::<Result<_, _>>()?,
        })
    }
}

#[derive(facet::Facet)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct NoteProxy {
    content: String,
    #[facet(rename = "createdAt")]
    created_at: String,
}
impl TryFrom<&Note> for NoteProxy {
    type Error = Error;
    fn try_from(note: &Note) -> Result<Self, Self::Error> {
        Ok(Self {
            content: note.content.clone(),
            created_at: note.created_at.format(&Rfc3339).or_raise(|| ErrorKind::InvalidData("note timestamp"))?,
        })
    }
}
impl TryFrom<NoteProxy> for Note {
    type Error = Error;
    fn try_from(proxy: NoteProxy) -> Result<Self, Self::Error> {
        let created_at =
            OffsetDateTime::parse(&proxy.created_at, &Rfc3339).or_raise(|| ErrorKind::InvalidData("note timestamp"))?;
        Ok(Note::new(proxy.content, created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_json::{from_str as from_json, to_string as to_json};
    use rstest::rstest;

    fn dune() -> Book {
        let mut book = Book::new("1", "Dune", "Herbert");
        book.lu = true;
        book.rating = 5;
        book
    }

    #[rstest]
    #[case(
        r#"{"id":"1","nom":"Dune","auteur":"Herbert","lu":true,"favorite":false,"rating":5,"notes":[]}"#
    )]
    fn test_book_deserialize(#[case] input: &str) {
        let proxy = from_json::<BookProxy>(input).unwrap();
        assert_eq!(Book::try_from(proxy).unwrap(), dune());
    }

    #[test]
    fn test_book_round_trip() {
        let mut book = dune();
        book.editeur = Some("Chilton".to_string());
        book.annee = Some(1965);
        book.notes.push(Note::new("spice", OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap()));
        let json = to_json(&BookProxy::try_from(&book).unwrap()).unwrap();
        let back = Book::try_from(from_json::<BookProxy>(&json).unwrap()).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_note_serialize() {
        let note = Note::new("hello", OffsetDateTime::from_unix_timestamp(1_704_164_645).unwrap());
        let json = to_json(&NoteProxy::try_from(&note).unwrap()).unwrap();
        assert_eq!(json, r#"{"content":"hello","createdAt":"2024-01-02T03:04:05Z"}"#);
    }

    #[test]
    fn test_note_bad_timestamp() {
        let proxy = NoteProxy {
            content: "x".to_string(),
            created_at: "yesterday".to_string(),
        };
        let err = Note::try_from(proxy).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }
}
