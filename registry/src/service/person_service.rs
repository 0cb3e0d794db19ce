use std::sync::Arc;

use crate::{
    consts::consts::PersonId,
    model::{error::DomainError, person::Person},
    store::{PersonStore, StoreError},
};

/// Orchestrates the person lifecycle on top of a [`PersonStore`]
///
/// Every call is a short sequence of store calls:
/// 1. create: find-by-email, then insert. Both the pre-check and the store's unique
///    constraint surface as [`DomainError::Conflict`]
/// 2. update: find-by-id, merge the mutable fields, save. `id` and `email` always come from
///    the stored record
/// 3. delete: find-by-id, then delete. A row that disappears between the two calls is
///    [`DomainError::NotFound`]
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub fn find_all(&self) -> Result<Vec<Person>, DomainError> {
        log::info!("Finding all people!");

        Ok(self.store.find_all()?)
    }

    #[tracing::instrument(skip(self))]
    pub fn find_by_id(&self, id: PersonId) -> Result<Person, DomainError> {
        log::info!("Finding one person! [id: {}]", id);

        self.store
            .find_by_id(id)?
            .ok_or(DomainError::NotFound(Some(id)))
    }

    #[tracing::instrument(skip(self))]
    pub fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Vec<Person>, DomainError> {
        log::info!("Finding people by name!");

        Ok(self.store.find_by_name(first_name, last_name)?)
    }

    #[tracing::instrument(skip(self, person), fields(email = %person.email))]
    pub fn create(&self, person: Person) -> Result<Person, DomainError> {
        log::info!("Creating one person!");

        if self.store.find_by_email(&person.email)?.is_some() {
            log::warn!("Rejected create, e-mail already in use: {}", person.email);
            return Err(DomainError::Conflict(person.email));
        }

        let person = Person { id: None, ..person };

        match self.store.insert(person) {
            Ok(created) => Ok(created),
            // Lost the race against a concurrent create with the same email
            Err(StoreError::UniqueConstraintViolation(email)) => {
                log::warn!("Rejected create, e-mail already in use: {}", email);
                Err(DomainError::Conflict(email))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self, person), fields(id = ?person.id))]
    pub fn update(&self, person: Person) -> Result<Person, DomainError> {
        log::info!("Updating one person!");

        let id = person.id.ok_or(DomainError::NotFound(None))?;

        let mut entity = self
            .store
            .find_by_id(id)?
            .ok_or(DomainError::NotFound(Some(id)))?;

        entity.merge_mutable_fields(&person);

        match self.store.save(entity) {
            Ok(saved) => Ok(saved),
            Err(StoreError::RowNotFound(id)) => Err(DomainError::NotFound(Some(id))),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: PersonId) -> Result<(), DomainError> {
        log::info!("Deleting one person! [id: {}]", id);

        let entity = self
            .store
            .find_by_id(id)?
            .ok_or(DomainError::NotFound(Some(id)))?;

        let entity_id = entity.id.unwrap_or(id);

        match self.store.delete(entity_id) {
            Ok(()) => Ok(()),
            Err(StoreError::RowNotFound(id)) => Err(DomainError::NotFound(Some(id))),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        Ok(self.store.count()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use anyhow::anyhow;
    use threadpool::ThreadPool;

    use super::*;
    use crate::store::{memory::MemoryStore, StoreResult};

    fn new_service() -> PersonService {
        PersonService::new(Arc::new(MemoryStore::new()))
    }

    fn test_person(first_name: &str, email: &str) -> Person {
        Person::new(
            first_name.to_string(),
            "da Silva".to_string(),
            "Barueri".to_string(),
            "Male".to_string(),
            email.to_string(),
        )
    }

    mod create {
        use super::*;

        #[test_log::test]
        fn create_assigns_an_id_and_round_trips() {
            // Given an empty store
            let service = new_service();
            let person = test_person("Nicolas", "nicolas@gmail.com");

            // When we create a person
            let created = service.create(person.clone()).unwrap();

            // Then it gets an id and reads back equal in every other field
            let id = created.id.expect("should have an id");
            let found = service.find_by_id(id).unwrap();

            assert_eq!(found, person.with_id(id));
        }

        #[test_log::test]
        fn create_ignores_caller_supplied_id() {
            let service = new_service();

            let created = service
                .create(test_person("Nicolas", "nicolas@gmail.com").with_id(PersonId(99)))
                .unwrap();

            assert_eq!(created.id, Some(PersonId(1)));
        }

        #[test_log::test]
        fn duplicate_email_is_a_conflict_and_writes_nothing() {
            // Given a person with an email
            let service = new_service();
            service.create(test_person("Nicolas", "nicolas@gmail.com")).unwrap();

            // When another person is created with the same email
            let result = service
                .create(test_person("Ana", "nicolas@gmail.com"))
                .err()
                .expect("should error");

            // Then it is rejected and the store is unchanged
            assert!(matches!(&result, DomainError::Conflict(email) if email == "nicolas@gmail.com"));
            assert_eq!(
                result.to_string(),
                "Person already exists with given e-mail nicolas@gmail.com"
            );
            assert_eq!(service.count().unwrap(), 1);
        }

        #[test_log::test]
        fn concurrent_creates_with_the_same_email_admit_exactly_one() {
            let service = new_service();
            let pool = ThreadPool::new(8);
            let (result_tx, result_rx) = channel::<Result<Person, DomainError>>();

            for index in 0..32 {
                let service = service.clone();
                let result_tx = result_tx.clone();

                pool.execute(move || {
                    let person = test_person(&format!("Racer {}", index), "race@x.com");
                    result_tx
                        .send(service.create(person))
                        .expect("receiver should be alive");
                });
            }

            let results: Vec<Result<Person, DomainError>> = result_rx.iter().take(32).collect();

            let created = results.iter().filter(|r| r.is_ok()).count();
            let conflicts = results
                .iter()
                .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
                .count();

            assert_eq!(created, 1);
            assert_eq!(conflicts, 31);
            assert_eq!(service.count().unwrap(), 1);
        }
    }

    mod update {
        use super::*;

        #[test_log::test]
        fn update_applies_mutable_fields_and_keeps_identity() {
            // Given a stored person
            let service = new_service();
            let created = service.create(test_person("Nicolas", "nicolas@gmail.com")).unwrap();
            let id = created.id.unwrap();

            // When the payload changes every field, email included
            let payload = Person {
                id: Some(id),
                first_name: "Leonardo".to_string(),
                last_name: "Costa".to_string(),
                address: "Osasco".to_string(),
                gender: "Female".to_string(),
                email: "leonardo@gmail.com".to_string(),
            };

            let updated = service.update(payload).unwrap();

            // Then the four mutable fields change, id and email do not
            assert_eq!(updated.id, Some(id));
            assert_eq!(updated.email, "nicolas@gmail.com");
            assert_eq!(updated.first_name, "Leonardo");
            assert_eq!(updated.last_name, "Costa");
            assert_eq!(updated.address, "Osasco");
            assert_eq!(updated.gender, "Female");
            assert_eq!(service.find_by_id(id).unwrap(), updated);
        }

        #[test_log::test]
        fn update_of_unknown_id_is_not_found() {
            let service = new_service();

            let result = service
                .update(test_person("Ghost", "ghost@x.com").with_id(PersonId(42)))
                .err()
                .expect("should error");

            assert!(matches!(result, DomainError::NotFound(Some(PersonId(42)))));
        }

        #[test_log::test]
        fn update_without_id_is_not_found() {
            let service = new_service();
            service.create(test_person("Nicolas", "nicolas@gmail.com")).unwrap();

            let result = service
                .update(test_person("Nicolas", "nicolas@gmail.com"))
                .err()
                .expect("should error");

            assert!(matches!(result, DomainError::NotFound(None)));
        }
    }

    mod not_found {
        use super::*;

        #[test_log::test]
        fn find_update_delete_all_fail_on_absent_id() {
            let service = new_service();

            assert!(service.find_by_id(PersonId(1)).unwrap_err().is_not_found());
            assert!(service
                .update(test_person("A", "a@x.com").with_id(PersonId(1)))
                .unwrap_err()
                .is_not_found());
            assert!(service.delete(PersonId(1)).unwrap_err().is_not_found());
        }

        #[test_log::test]
        fn find_all_on_empty_store_is_empty() {
            let service = new_service();

            assert!(service.find_all().unwrap().is_empty());
        }

        #[test_log::test]
        fn delete_then_find_is_not_found() {
            // Given a stored person
            let service = new_service();
            let id = service
                .create(test_person("Nicolas", "nicolas@gmail.com"))
                .unwrap()
                .id
                .unwrap();

            // When it is deleted
            service.delete(id).unwrap();

            // Then it cannot be found, nor deleted again
            assert!(service.find_by_id(id).unwrap_err().is_not_found());
            assert!(service.delete(id).unwrap_err().is_not_found());
        }
    }

    /// Store whose rows vanish between the read and the write, as if another request deleted
    /// them in the meantime
    mod vanishing_rows {
        use super::*;

        struct VanishingStore {
            inner: MemoryStore,
        }

        impl PersonStore for VanishingStore {
            fn find_all(&self) -> StoreResult<Vec<Person>> {
                self.inner.find_all()
            }

            fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
                let found = self.inner.find_by_id(id)?;

                if found.is_some() {
                    self.inner.delete(id)?;
                }

                Ok(found)
            }

            fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
                self.inner.find_by_email(email)
            }

            fn find_by_name(&self, first_name: &str, last_name: &str) -> StoreResult<Vec<Person>> {
                self.inner.find_by_name(first_name, last_name)
            }

            fn insert(&self, person: Person) -> StoreResult<Person> {
                self.inner.insert(person)
            }

            fn save(&self, person: Person) -> StoreResult<Person> {
                self.inner.save(person)
            }

            fn delete(&self, id: PersonId) -> StoreResult<()> {
                self.inner.delete(id)
            }

            fn count(&self) -> StoreResult<usize> {
                self.inner.count()
            }

            fn reset(&self) -> StoreResult<()> {
                self.inner.reset()
            }
        }

        fn vanishing_service() -> (PersonService, PersonId) {
            let store = VanishingStore {
                inner: MemoryStore::new(),
            };
            let id = store
                .insert(test_person("Nicolas", "nicolas@gmail.com"))
                .unwrap()
                .id
                .unwrap();

            (PersonService::new(Arc::new(store)), id)
        }

        #[test_log::test]
        fn concurrent_delete_during_update_is_not_found() {
            let (service, id) = vanishing_service();

            let result = service
                .update(test_person("Leonardo", "nicolas@gmail.com").with_id(id))
                .err()
                .expect("should error");

            assert!(matches!(result, DomainError::NotFound(Some(found)) if found == id));
        }

        #[test_log::test]
        fn concurrent_delete_during_delete_is_not_swallowed() {
            let (service, id) = vanishing_service();

            let result = service.delete(id).err().expect("should error");

            assert!(result.is_not_found());
        }
    }

    mod infrastructure {
        use super::*;

        struct BrokenStore;

        fn broken<T>() -> StoreResult<T> {
            Err(StoreError::Unavailable(anyhow!("connection refused")))
        }

        impl PersonStore for BrokenStore {
            fn find_all(&self) -> StoreResult<Vec<Person>> {
                broken()
            }

            fn find_by_id(&self, _: PersonId) -> StoreResult<Option<Person>> {
                broken()
            }

            fn find_by_email(&self, _: &str) -> StoreResult<Option<Person>> {
                broken()
            }

            fn find_by_name(&self, _: &str, _: &str) -> StoreResult<Vec<Person>> {
                broken()
            }

            fn insert(&self, _: Person) -> StoreResult<Person> {
                broken()
            }

            fn save(&self, _: Person) -> StoreResult<Person> {
                broken()
            }

            fn delete(&self, _: PersonId) -> StoreResult<()> {
                broken()
            }

            fn count(&self) -> StoreResult<usize> {
                broken()
            }

            fn reset(&self) -> StoreResult<()> {
                broken()
            }
        }

        #[test_log::test]
        fn store_failures_are_not_domain_errors() {
            let service = PersonService::new(Arc::new(BrokenStore));

            assert!(matches!(service.find_all(), Err(DomainError::Store(_))));
            assert!(matches!(
                service.find_by_id(PersonId(1)),
                Err(DomainError::Store(_))
            ));
            assert!(matches!(
                service.create(test_person("A", "a@x.com")),
                Err(DomainError::Store(_))
            ));
        }
    }

    #[test_log::test]
    fn find_by_name_returns_matching_people() {
        let service = new_service();
        service.create(test_person("Nicolas", "nicolas@gmail.com")).unwrap();
        service.create(test_person("Ana", "ana@gmail.com")).unwrap();

        let people = service.find_by_name("Ana", "da Silva").unwrap();

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].email, "ana@gmail.com");
    }
}
