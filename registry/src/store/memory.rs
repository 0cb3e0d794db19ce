use std::{
    collections::{BTreeMap, HashMap},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use anyhow::anyhow;

use crate::{
    consts::consts::{PersonId, START_AT_ID},
    model::person::Person,
};

use super::{PersonStore, StoreError, StoreResult};

pub struct PersonTable {
    pub person_rows: BTreeMap<PersonId, Person>,
    pub unique_email_index: HashMap<String, PersonId>,
    next_id: PersonId,
}

impl PersonTable {
    pub fn new() -> Self {
        Self {
            person_rows: BTreeMap::new(),
            unique_email_index: HashMap::new(),
            next_id: START_AT_ID,
        }
    }

    // Each mutation can be broken up into 3 steps
    //  - Verifying validity / constraints (uniqueness)
    //  - Applying the change
    //  - Index maintenance
    pub fn insert(&mut self, person: Person) -> StoreResult<Person> {
        if self.unique_email_index.contains_key(&person.email) {
            return Err(StoreError::UniqueConstraintViolation(person.email));
        }

        // Ids are never reused, even after a delete
        let id = self.next_id;
        self.next_id = id.increment();

        let person = person.with_id(id);

        self.unique_email_index.insert(person.email.clone(), id);
        self.person_rows.insert(id, person.clone());

        Ok(person)
    }

    pub fn save(&mut self, person: Person) -> StoreResult<Person> {
        let id = person.id.ok_or(StoreError::MissingId)?;

        let previous_email = self
            .person_rows
            .get(&id)
            .map(|previous| previous.email.clone())
            .ok_or(StoreError::RowNotFound(id))?;

        // Edge case: saving a row with its own email must not trip the constraint
        if previous_email != person.email {
            if self.unique_email_index.contains_key(&person.email) {
                return Err(StoreError::UniqueConstraintViolation(person.email));
            }

            self.unique_email_index.remove(&previous_email);
            self.unique_email_index.insert(person.email.clone(), id);
        }

        self.person_rows.insert(id, person.clone());

        Ok(person)
    }

    pub fn delete(&mut self, id: PersonId) -> StoreResult<()> {
        let previous = self
            .person_rows
            .remove(&id)
            .ok_or(StoreError::RowNotFound(id))?;

        self.unique_email_index.remove(&previous.email);

        Ok(())
    }

    pub fn find_by_email(&self, email: &str) -> Option<Person> {
        self.unique_email_index
            .get(email)
            .and_then(|id| self.person_rows.get(id))
            .cloned()
    }

    pub fn clear(&mut self) {
        self.person_rows.clear();
        self.unique_email_index.clear();
    }
}

impl Default for PersonTable {
    fn default() -> Self {
        Self::new()
    }
}

/// In-process store, the table sits behind a single lock so the uniqueness check and
/// the write of an insert happen atomically.
pub struct MemoryStore {
    table: RwLock<PersonTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PersonTable::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, PersonTable>> {
        self.table
            .read()
            .map_err(|e| StoreError::Unavailable(anyhow!("person table lock poisoned: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, PersonTable>> {
        self.table
            .write()
            .map_err(|e| StoreError::Unavailable(anyhow!("person table lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    fn find_all(&self) -> StoreResult<Vec<Person>> {
        Ok(self.read()?.person_rows.values().cloned().collect())
    }

    #[tracing::instrument(skip(self))]
    fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
        Ok(self.read()?.person_rows.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        Ok(self.read()?.find_by_email(email))
    }

    #[tracing::instrument(skip(self))]
    fn find_by_name(&self, first_name: &str, last_name: &str) -> StoreResult<Vec<Person>> {
        let people = self
            .read()?
            .person_rows
            .values()
            .filter(|person| person.first_name == first_name && person.last_name == last_name)
            .cloned()
            .collect();

        Ok(people)
    }

    #[tracing::instrument(skip(self, person))]
    fn insert(&self, person: Person) -> StoreResult<Person> {
        self.write()?.insert(person)
    }

    #[tracing::instrument(skip(self, person))]
    fn save(&self, person: Person) -> StoreResult<Person> {
        self.write()?.save(person)
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, id: PersonId) -> StoreResult<()> {
        self.write()?.delete(id)
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.person_rows.len())
    }

    fn reset(&self) -> StoreResult<()> {
        self.write()?.clear();

        Ok(())
    }
}
