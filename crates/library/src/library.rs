use crate::error::{ErrorKind, Result};
use crate::loader::CollectionLoader;
use crate::theme::ThemePreference;
use exn::{OptionExt, ResultExt};
use futures::Stream;
use shelf_cache::LocalCache;
use shelf_config::Config;
use shelf_model::error::ErrorKind as ValidationErrorKind;
use shelf_model::{Book, BookForm, BookId, MAX_RATING, Note, RemoteBook, from_remote, to_remote};
use shelf_remote::lookup::OpenLibrary;
use shelf_remote::repository::HttpRepository;
use shelf_remote::{LookupHandle, RepositoryHandle};
use shelf_storage::StoreHandle;
use shelf_storage::backend::LocalStore;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::instrument;

/// Everything the screens of the book tracker need, behind one handle.
///
/// Every mutation is a full-record round trip through the repository and
/// returns the server's version of the book, already normalized. Nothing is
/// changed locally: on success or failure, callers re-[`load()`](Self::load)
/// to refresh their view. Input is validated, and ids are checked, before
/// anything is sent.
#[derive(Clone)]
pub struct Library {
    repository: RepositoryHandle,
    lookup: LookupHandle,
    store: StoreHandle,
    namespace: String,
    loader: CollectionLoader,
}
impl Library {
    pub fn new(repository: RepositoryHandle, lookup: LookupHandle, store: StoreHandle, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let cache = LocalCache::new(store.clone(), &namespace);
        Self {
            loader: CollectionLoader::new(repository.clone(), cache),
            repository,
            lookup,
            store,
            namespace,
        }
    }

    /// Wire up the HTTP repository, the Open Library lookup and a local
    /// filesystem store from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Setup)?;
        let repository = HttpRepository::new(&config.api.base_url, config.api.timeout()).or_raise(|| ErrorKind::Setup)?;
        let lookup = OpenLibrary::new(&config.lookup.base_url, config.lookup.timeout()).or_raise(|| ErrorKind::Setup)?;
        let data_dir = config.storage.data_dir().or_raise(|| ErrorKind::Setup)?;
        let store = LocalStore::new("local", &data_dir).or_raise(|| ErrorKind::Setup)?;
        tracing::info!(
            api = %config.api.base_url,
            data_dir = %data_dir.display(),
            namespace = %config.storage.namespace,
            "Library configured"
        );
        Ok(Self::new(Arc::new(repository), Arc::new(lookup), Arc::new(store), &config.storage.namespace))
    }

    pub fn cache(&self) -> &LocalCache {
        self.loader.cache()
    }

    /// Read the persisted theme preference from this library's store.
    pub async fn theme(&self) -> ThemePreference {
        ThemePreference::load(self.store.clone(), &self.namespace).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// See [`CollectionLoader::load`].
    pub async fn load(&self) -> Result<Vec<Book>> {
        self.loader.load().await
    }

    /// See [`CollectionLoader::watch`].
    pub fn watch<'a, S>(&'a self, events: S) -> impl Stream<Item = Result<Vec<Book>>> + 'a
    where
        S: Stream<Item = ()> + 'a,
    {
        self.loader.watch(events)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: &BookId) -> Result<Book> {
        check_id(id)?;
        let raw = self.repository.get_by_id(id).await.or_raise(|| ErrorKind::Fetch)?;
        Ok(from_remote(raw))
    }

    /// Number of editions the lookup service knows for this title. Never
    /// fails; `0` when unknown.
    pub async fn editions_count(&self, book: &Book) -> u64 {
        self.lookup.editions_count(&book.nom).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    #[instrument(skip(self, form))]
    pub async fn create(&self, form: BookForm) -> Result<Book> {
        let draft = form.validate().or_raise(|| ErrorKind::Validation)?;
        let created = self
            .repository
            .create(&RemoteBook::from(&draft))
            .await
            .or_raise(|| ErrorKind::Mutation("create"))?;
        let book = from_remote(created);
        tracing::info!(id = %book.id, title = %book.nom, "Book created");
        Ok(book)
    }

    /// Replace the editable fields of a book with the form's, keeping its
    /// notes as currently stored on the server.
    #[instrument(skip(self, form), fields(id = %id))]
    pub async fn edit(&self, id: &BookId, form: BookForm) -> Result<Book> {
        check_id(id)?;
        let draft = form.validate().or_raise(|| ErrorKind::Validation)?;
        let current = self.repository.get_by_id(id).await.or_raise(|| ErrorKind::Mutation("edit"))?;
        let mut book = from_remote(current);
        book.id = id.clone();
        book.apply(draft);
        self.replace(book, "edit").await
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &BookId) -> Result<()> {
        check_id(id)?;
        self.repository.delete(id).await.or_raise(|| ErrorKind::Mutation("delete"))?;
        tracing::info!("Book deleted");
        Ok(())
    }

    pub async fn toggle_read(&self, book: &Book) -> Result<Book> {
        check_id(&book.id)?;
        let mut updated = book.clone();
        updated.lu = !updated.lu;
        self.replace(updated, "update").await
    }

    pub async fn toggle_favorite(&self, book: &Book) -> Result<Book> {
        check_id(&book.id)?;
        let mut updated = book.clone();
        updated.favorite = !updated.favorite;
        self.replace(updated, "update").await
    }

    /// Set the rating, `0` meaning unrated.
    pub async fn set_rating(&self, book: &Book, rating: u8) -> Result<Book> {
        check_id(&book.id)?;
        if rating > MAX_RATING {
            let err = exn::Exn::from(ValidationErrorKind::InvalidRating(rating));
            return Err(err.raise(ErrorKind::Validation));
        }
        let mut updated = book.clone();
        updated.rating = rating;
        self.replace(updated, "update").await
    }

    /// Append a note stamped with the current time.
    pub async fn add_note(&self, book: &Book, content: &str) -> Result<Book> {
        check_id(&book.id)?;
        let content = Some(content.trim())
            .filter(|c| !c.is_empty())
            .ok_or_raise(|| ValidationErrorKind::EmptyNote)
            .or_raise(|| ErrorKind::Validation)?;
        let mut updated = book.clone();
        updated.notes.push(Note::new(content, OffsetDateTime::now_utc()));
        self.replace(updated, "add note to").await
    }

    /// Send the whole record and return what the server stored.
    #[instrument(skip(self, book), fields(id = %book.id))]
    async fn replace(&self, book: Book, action: &'static str) -> Result<Book> {
        let stored = self
            .repository
            .update(&book.id, &to_remote(&book))
            .await
            .or_raise(|| ErrorKind::Mutation(action))?;
        tracing::debug!(action, "Book updated");
        Ok(from_remote(stored))
    }
}

/// Reject books that never came back from the server.
fn check_id(id: &BookId) -> Result<()> {
    if !id.is_assigned() {
        let err = exn::Exn::from(ValidationErrorKind::MissingId);
        return Err(err.raise(ErrorKind::Validation));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shelf_remote::lookup::MockLookup;
    use shelf_remote::repository::MockRepository;
    use shelf_storage::backend::MockStore;

    struct Fixture {
        repository: Arc<MockRepository>,
        store: Arc<MockStore>,
        library: Library,
    }

    fn fixture(records: Vec<RemoteBook>) -> Fixture {
        let repository = Arc::new(MockRepository::with_books(records));
        let store = Arc::new(MockStore::default());
        let lookup = Arc::new(MockLookup::with_counts([("Dune", 120)]));
        let library = Library::new(repository.clone(), lookup, store.clone(), "@booklist_app");
        Fixture {
            repository,
            store,
            library,
        }
    }

    fn dune() -> RemoteBook {
        RemoteBook {
            id: Some(BookId::from("1")),
            name: Some("Dune".to_string()),
            author: Some("Herbert".to_string()),
            read: serde_json::Value::String("0".to_string()),
            notes: Some(vec![]),
            ..Default::default()
        }
    }

    fn form(nom: &str, auteur: &str, annee: &str) -> BookForm {
        BookForm {
            nom: nom.to_string(),
            auteur: auteur.to_string(),
            annee: annee.to_string(),
            ..BookForm::default()
        }
    }

    fn validation_kind(err: &crate::error::Error) -> bool {
        matches!(&**err, ErrorKind::Validation)
    }

    #[tokio::test]
    async fn test_create() {
        let f = fixture(vec![dune()]);
        let book = f.library.create(form(" 1984 ", "Orwell", "1949")).await.unwrap();
        assert_eq!(book.id, BookId::from("2"));
        assert_eq!(book.nom, "1984");
        assert_eq!(book.annee, Some(1949));
        assert!(!book.lu);
        assert_eq!(f.library.load().await.unwrap().len(), 2);
    }

    #[rstest]
    #[case(form("", "Orwell", ""))]
    #[case(form("1984", "   ", ""))]
    #[case(form("1984", "Orwell", "49"))]
    #[case(form("1984", "Orwell", "19a9"))]
    #[tokio::test]
    async fn test_create_validation_skips_repository(#[case] input: BookForm) {
        let f = fixture(vec![]);
        let err = f.library.create(input).await.unwrap_err();
        assert!(validation_kind(&err));
        assert_eq!(f.repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_failure_is_mutation_error() {
        let f = fixture(vec![]);
        f.repository.set_offline(true);
        let err = f.library.create(form("1984", "Orwell", "")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Mutation("create")));
        assert!(f.repository.books().await.is_empty());
    }

    #[tokio::test]
    async fn test_get() {
        let f = fixture(vec![dune()]);
        let book = f.library.get(&BookId::from("1")).await.unwrap();
        assert_eq!(book.nom, "Dune");
        let err = f.library.get(&BookId::from("9")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Fetch));
    }

    #[tokio::test]
    async fn test_edit_preserves_notes() {
        let mut record = dune();
        record.notes = Some(vec![shelf_model::RemoteNote {
            content: "spice".to_string(),
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        }]);
        let f = fixture(vec![record]);
        let mut input = form("Dune", "Frank Herbert", "1965");
        input.rating = 5;
        let book = f.library.edit(&BookId::from("1"), input).await.unwrap();
        assert_eq!(book.auteur, "Frank Herbert");
        assert_eq!(book.rating, 5);
        assert_eq!(book.notes.len(), 1);
        assert_eq!(book.notes[0].content, "spice");
    }

    #[tokio::test]
    async fn test_edit_invalid_form_skips_repository() {
        let f = fixture(vec![dune()]);
        let err = f.library.edit(&BookId::from("1"), form("Dune", "", "")).await.unwrap_err();
        assert!(validation_kind(&err));
        assert_eq!(f.repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture(vec![dune()]);
        f.library.delete(&BookId::from("1")).await.unwrap();
        assert!(f.repository.books().await.is_empty());
        let err = f.library.delete(&BookId::from("1")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Mutation("delete")));
    }

    #[tokio::test]
    async fn test_toggles() {
        let f = fixture(vec![dune()]);
        let book = f.library.get(&BookId::from("1")).await.unwrap();
        let read = f.library.toggle_read(&book).await.unwrap();
        assert!(read.lu);
        assert!(!book.lu, "input is not mutated");
        let favorite = f.library.toggle_favorite(&read).await.unwrap();
        assert!(favorite.favorite);
        assert!(favorite.lu);
        let stored = f.repository.books().await;
        assert_eq!(stored[0].read, serde_json::Value::Bool(true));
        assert_eq!(stored[0].favorite, serde_json::Value::Bool(true));
    }

    #[tokio::test]
    async fn test_set_rating() {
        let f = fixture(vec![dune()]);
        let book = f.library.get(&BookId::from("1")).await.unwrap();
        assert_eq!(f.library.set_rating(&book, 4).await.unwrap().rating, 4);
        let calls = f.repository.calls();
        let err = f.library.set_rating(&book, 6).await.unwrap_err();
        assert!(validation_kind(&err));
        assert_eq!(f.repository.calls(), calls);
    }

    #[tokio::test]
    async fn test_add_note() {
        let f = fixture(vec![dune()]);
        let book = f.library.get(&BookId::from("1")).await.unwrap();
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let noted = f.library.add_note(&book, "  great read ").await.unwrap();
        assert_eq!(noted.notes.len(), 1);
        assert_eq!(noted.notes[0].content, "great read");
        assert!(noted.notes[0].created_at.unix_timestamp() >= before);

        let calls = f.repository.calls();
        let err = f.library.add_note(&noted, "   ").await.unwrap_err();
        assert!(validation_kind(&err));
        assert_eq!(f.repository.calls(), calls);
    }

    #[tokio::test]
    async fn test_unassigned_id_rejected_before_network() {
        let f = fixture(vec![]);
        let orphan = from_remote(RemoteBook {
            name: Some("Dune".to_string()),
            ..Default::default()
        });
        assert!(validation_kind(&f.library.toggle_read(&orphan).await.unwrap_err()));
        assert!(validation_kind(&f.library.toggle_favorite(&orphan).await.unwrap_err()));
        assert!(validation_kind(&f.library.set_rating(&orphan, 3).await.unwrap_err()));
        assert!(validation_kind(&f.library.add_note(&orphan, "x").await.unwrap_err()));
        assert!(validation_kind(&f.library.delete(&orphan.id).await.unwrap_err()));
        assert!(validation_kind(&f.library.edit(&orphan.id, form("Dune", "Herbert", "")).await.unwrap_err()));
        assert_eq!(f.repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_mutation_failure_leaves_cache_alone() {
        let f = fixture(vec![dune()]);
        let books = f.library.load().await.unwrap();
        f.repository.set_offline(true);
        let err = f.library.toggle_read(&books[0]).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Mutation("update")));
        assert_eq!(f.library.cache().load_books().await, Some(books.clone()));
        // Still offline: the load falls back to the untouched snapshot.
        assert_eq!(f.library.load().await.unwrap(), books);
    }

    #[tokio::test]
    async fn test_editions_count() {
        let f = fixture(vec![]);
        assert_eq!(f.library.editions_count(&Book::new("1", "Dune", "Herbert")).await, 120);
        assert_eq!(f.library.editions_count(&Book::new("2", "Unknown", "Nobody")).await, 0);
    }

    #[tokio::test]
    async fn test_theme_uses_namespace() {
        let f = fixture(vec![]);
        let mut theme = f.library.theme().await;
        theme.toggle().await;
        assert!(f.library.theme().await.is_dark());
        assert_eq!(f.store.keys().await, vec!["@booklist_app:theme".to_string()]);
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store"));
        Library::from_config(&config).unwrap();
        assert!(dir.path().join("store").is_dir());

        config.api.timeout_secs = 0;
        let err = Library::from_config(&config).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Setup));
    }
}
