mod book;
mod id;
mod note;

pub use self::book::{Book, BookDraft, MAX_RATING};
pub use self::id::BookId;
pub use self::note::Note;
