use serde::{Deserialize, Serialize};

use crate::consts::consts::PersonId;

/// A natural person. `id` is assigned by the store on insert and is `None` until then.
///
/// Fields missing from an incoming JSON payload fall back to their defaults, so
/// `{"firstName": "A", "email": "a@x.com"}` is a valid create request.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub email: String,
}

impl Person {
    pub fn new(
        first_name: String,
        last_name: String,
        address: String,
        gender: String,
        email: String,
    ) -> Self {
        Person {
            id: None,
            first_name,
            last_name,
            address,
            gender,
            email,
        }
    }

    pub fn new_test() -> Self {
        Person::new(
            "First Name".to_string(),
            "Last Name".to_string(),
            "Address".to_string(),
            "Gender".to_string(),
            "Email".to_string(),
        )
    }

    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = Some(id);
        self
    }

    /// Copies the fields an update is allowed to touch. `id` and `email` stay as they are.
    pub fn merge_mutable_fields(&mut self, update: &Person) {
        self.first_name = update.first_name.clone();
        self.last_name = update.last_name.clone();
        self.address = update.address.clone();
        self.gender = update.gender.clone();
    }
}
