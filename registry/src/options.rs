use crate::store::StorageEngine;

#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub storage_engine: StorageEngine,
    pub reset: bool,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl RegistryOptions {
    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }

    /// Removes every stored person when the store is opened
    pub fn set_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            storage_engine: StorageEngine::Memory,
            reset: false,
        }
    }
}

#[cfg(test)]
impl RegistryOptions {
    pub fn new_test() -> Self {
        RegistryOptions::default()
            .set_storage_engine(StorageEngine::Memory)
            .set_reset(true)
    }
}
