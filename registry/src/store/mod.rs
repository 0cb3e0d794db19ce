use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{consts::consts::PersonId, model::person::Person, options::RegistryOptions};

pub mod memory;
pub mod network;
pub mod postgres;

#[derive(Error, Debug)]
pub enum StoreError {
    // Constraints
    #[error("Cannot add row as a person already exists with this email: {0}")]
    UniqueConstraintViolation(String),

    #[error("Row does not exist: {0}")]
    RowNotFound(PersonId),

    #[error("Cannot save a row without an id")]
    MissingId,

    // Infrastructure
    #[error("Store is unavailable: {0}")]
    Unavailable(anyhow::Error),

    #[error("Unable to decode row: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn to_generic_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> anyhow::Error {
    anyhow::Error::new(e)
}

/// Persistent collection of people keyed by [`PersonId`].
///
/// Implementations enforce email uniqueness themselves, `insert` and `save` must fail
/// with [`StoreError::UniqueConstraintViolation`] rather than write a duplicate.
pub trait PersonStore: Send + Sync {
    /// All people, ordered by id
    fn find_all(&self) -> StoreResult<Vec<Person>>;
    fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>>;
    fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>>;
    fn find_by_name(&self, first_name: &str, last_name: &str) -> StoreResult<Vec<Person>>;

    /// Ignores `person.id` and returns the stored row with its newly assigned id
    fn insert(&self, person: Person) -> StoreResult<Person>;

    /// Full replace of an existing row
    fn save(&self, person: Person) -> StoreResult<Person>;

    fn delete(&self, id: PersonId) -> StoreResult<()>;
    fn count(&self) -> StoreResult<usize>;

    /// Removes every row
    fn reset(&self) -> StoreResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PgConfig {
    pub connection_string: String,
    pub reply_timeout: Duration,
}

impl PgConfig {
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            reply_timeout: Duration::from_secs(5),
        }
    }

    pub fn set_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageEngine {
    Memory,
    Postgres(PgConfig),
}

impl StorageEngine {
    pub fn name(&self) -> &'static str {
        match self {
            StorageEngine::Memory => "memory",
            StorageEngine::Postgres(_) => "postgres",
        }
    }

    pub fn get_engine(options: &RegistryOptions) -> StoreResult<Arc<dyn PersonStore>> {
        let store: Arc<dyn PersonStore> = match &options.storage_engine {
            StorageEngine::Memory => Arc::new(memory::MemoryStore::new()),
            StorageEngine::Postgres(config) => Arc::new(postgres::PgStore::new(config.clone())?),
        };

        if options.reset {
            log::info!("Resetting {} store", options.storage_engine.name());
            store.reset()?;
        }

        Ok(store)
    }
}
