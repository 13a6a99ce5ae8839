//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kvstore_core::{Archive, Archived, Fields, Storable};
use kvstore_store::{Coordinator, KvStore, SchemaMode, SqliteKvStore, StoreConfig, StoreObserver};
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;

/// A database file in its own temporary directory.
pub struct TestFixture {
    pub dir: TempDir,
    pub config: StoreConfig,
    pub coordinator: Arc<Coordinator>,
}

impl TestFixture {
    /// Create a fixture with the default key-only schema.
    pub fn new() -> Self {
        Self::with_schema(SchemaMode::KeyOnly)
    }

    /// Create a fixture with the given schema mode.
    pub fn with_schema(schema: SchemaMode) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config = StoreConfig::in_dir(dir.path()).with_schema(schema);
        let coordinator = Arc::new(Coordinator::open(&config));
        Self {
            dir,
            config,
            coordinator,
        }
    }

    /// A store on this fixture's database.
    pub fn store(&self, name: &str) -> SqliteKvStore {
        SqliteKvStore::new(name, Arc::clone(&self.coordinator))
    }

    /// Open a fresh coordinator on the same file, as a restarted process
    /// would.
    pub fn reopen(&self) -> Arc<Coordinator> {
        Arc::new(Coordinator::open(&self.config))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts observer notifications.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    stored: AtomicUsize,
    failed: AtomicUsize,
    last_store: Mutex<Option<String>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of "tuple stored" notifications.
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    /// Number of "tuple store failed" notifications.
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Name of the store behind the latest notification.
    pub fn last_store(&self) -> Option<String> {
        self.last_store.lock().expect("observer mutex poisoned").clone()
    }

    fn record(&self, store: &dyn KvStore) {
        *self.last_store.lock().expect("observer mutex poisoned") = Some(store.store_name().to_string());
    }
}

impl StoreObserver for RecordingObserver {
    fn did_store_tuple(&self, store: &dyn KvStore) {
        self.stored.fetch_add(1, Ordering::SeqCst);
        self.record(store);
    }

    fn did_fail_to_store_tuple(&self, store: &dyn KvStore) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.record(store);
    }
}

/// Sample application type with its own field mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
}

impl Person {
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            name: name.to_string(),
            age,
            email: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

impl Storable for Person {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), self.name.clone().into());
        fields.insert("age".into(), self.age.into());
        if let Some(email) = &self.email {
            fields.insert("email".into(), email.clone().into());
        }
        fields
    }
}

/// Sample archivable key type.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionToken {
    pub user: String,
    pub serial: i64,
}

impl Archive for SessionToken {
    fn archive(&self) -> Archived {
        Archived::new("SessionToken")
            .field("user", self.user.clone())
            .field("serial", self.serial)
    }
}

/// Route tracing output through the test harness. Safe to call from every
/// test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
