use std::sync::Arc;

use tokio_postgres::{error::SqlState, Client, NoTls, Row};

use crate::{consts::consts::PersonId, model::person::Person};

use super::{
    network::{ClientFuture, NetworkStore, Reply, TaskFuture},
    to_generic_error, PersonStore, PgConfig, StoreError, StoreResult,
};

const CREATE_PERSON_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "public"."person" (
        "id" BIGSERIAL NOT NULL,
        "first_name" text NOT NULL,
        "last_name" text NOT NULL,
        "address" text NOT NULL,
        "gender" text NOT NULL,
        "email" text NOT NULL,
        PRIMARY KEY ("id"),
        CONSTRAINT "person_email_key" UNIQUE ("email")
    );
"#;

const PERSON_COLUMNS: &str = r#""id", "first_name", "last_name", "address", "gender", "email""#;

pub enum PgStoreAction {
    FindAll(Reply<Vec<Person>>),
    FindById(PersonId, Reply<Option<Person>>),
    FindByEmail(String, Reply<Option<Person>>),
    FindByName(String, String, Reply<Vec<Person>>),
    Insert(Person, Reply<Person>),
    Save(Person, Reply<Person>),
    Delete(PersonId, Reply<()>),
    Count(Reply<usize>),
    Reset(Reply<()>),
}

/// PostgreSQL backed store. Email uniqueness is a column constraint, violations come back
/// as [`StoreError::UniqueConstraintViolation`].
pub struct PgStore {
    network_store: NetworkStore<PgStoreAction>,
}

impl PgStore {
    pub fn new(config: PgConfig) -> StoreResult<Self> {
        let network_store = NetworkStore::start(
            "Postgres Tokio",
            config.reply_timeout,
            client_fn(config.connection_string),
            task_fn,
        )?;

        Ok(Self { network_store })
    }
}

fn client_fn(connection_string: String) -> ClientFuture<Client> {
    Box::pin(async move {
        let (client, connection) = tokio_postgres::connect(&connection_string, NoTls)
            .await
            .map_err(|e| StoreError::Unavailable(to_generic_error(e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("Postgres connection error: {}", e);
            }
        });

        client
            .batch_execute(CREATE_PERSON_TABLE)
            .await
            .map_err(|e| StoreError::Unavailable(to_generic_error(e)))?;

        log::info!("Connected to postgres, person table is ready");

        Ok::<Client, StoreError>(client)
    })
}

fn row_to_person(row: &Row) -> StoreResult<Person> {
    let decode = |e: tokio_postgres::Error| StoreError::Serialization(e.to_string());

    Ok(Person {
        id: Some(PersonId(row.try_get("id").map_err(decode)?)),
        first_name: row.try_get("first_name").map_err(decode)?,
        last_name: row.try_get("last_name").map_err(decode)?,
        address: row.try_get("address").map_err(decode)?,
        gender: row.try_get("gender").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
    })
}

fn rows_to_people(rows: Vec<Row>) -> StoreResult<Vec<Person>> {
    rows.iter().map(row_to_person).collect()
}

fn translate_error(err: tokio_postgres::Error, email: &str) -> StoreError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        return StoreError::UniqueConstraintViolation(email.to_string());
    }

    StoreError::Unavailable(to_generic_error(err))
}

fn unavailable(err: tokio_postgres::Error) -> StoreError {
    StoreError::Unavailable(to_generic_error(err))
}

async fn find_all(client: &Client) -> StoreResult<Vec<Person>> {
    let query = format!(r#"SELECT {} FROM "public"."person" ORDER BY "id";"#, PERSON_COLUMNS);

    let rows = client.query(&query, &[]).await.map_err(unavailable)?;

    rows_to_people(rows)
}

async fn find_by_id(client: &Client, id: PersonId) -> StoreResult<Option<Person>> {
    let query = format!(r#"SELECT {} FROM "public"."person" WHERE "id" = $1;"#, PERSON_COLUMNS);

    let row = client
        .query_opt(&query, &[&id.to_number()])
        .await
        .map_err(unavailable)?;

    row.as_ref().map(row_to_person).transpose()
}

async fn find_by_email(client: &Client, email: &str) -> StoreResult<Option<Person>> {
    let query = format!(r#"SELECT {} FROM "public"."person" WHERE "email" = $1;"#, PERSON_COLUMNS);

    let row = client.query_opt(&query, &[&email]).await.map_err(unavailable)?;

    row.as_ref().map(row_to_person).transpose()
}

async fn find_by_name(client: &Client, first_name: &str, last_name: &str) -> StoreResult<Vec<Person>> {
    let query = format!(
        r#"SELECT {} FROM "public"."person" WHERE "first_name" = $1 AND "last_name" = $2 ORDER BY "id";"#,
        PERSON_COLUMNS
    );

    let rows = client
        .query(&query, &[&first_name, &last_name])
        .await
        .map_err(unavailable)?;

    rows_to_people(rows)
}

async fn insert(client: &Client, person: Person) -> StoreResult<Person> {
    let query = format!(
        r#"INSERT INTO "public"."person" ("first_name", "last_name", "address", "gender", "email")
           VALUES ($1, $2, $3, $4, $5) RETURNING {};"#,
        PERSON_COLUMNS
    );

    let row = client
        .query_one(
            &query,
            &[
                &person.first_name,
                &person.last_name,
                &person.address,
                &person.gender,
                &person.email,
            ],
        )
        .await
        .map_err(|e| translate_error(e, &person.email))?;

    row_to_person(&row)
}

async fn save(client: &Client, person: Person) -> StoreResult<Person> {
    let id = person.id.ok_or(StoreError::MissingId)?;

    let query = format!(
        r#"UPDATE "public"."person"
           SET "first_name" = $2, "last_name" = $3, "address" = $4, "gender" = $5, "email" = $6
           WHERE "id" = $1 RETURNING {};"#,
        PERSON_COLUMNS
    );

    let row = client
        .query_opt(
            &query,
            &[
                &id.to_number(),
                &person.first_name,
                &person.last_name,
                &person.address,
                &person.gender,
                &person.email,
            ],
        )
        .await
        .map_err(|e| translate_error(e, &person.email))?;

    match row {
        Some(row) => row_to_person(&row),
        None => Err(StoreError::RowNotFound(id)),
    }
}

async fn delete(client: &Client, id: PersonId) -> StoreResult<()> {
    let deleted = client
        .execute(r#"DELETE FROM "public"."person" WHERE "id" = $1;"#, &[&id.to_number()])
        .await
        .map_err(unavailable)?;

    if deleted == 0 {
        return Err(StoreError::RowNotFound(id));
    }

    Ok(())
}

async fn count(client: &Client) -> StoreResult<usize> {
    let row = client
        .query_one(r#"SELECT COUNT(*) AS "count" FROM "public"."person";"#, &[])
        .await
        .map_err(unavailable)?;

    let count: i64 = row
        .try_get("count")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    Ok(count as usize)
}

async fn reset(client: &Client) -> StoreResult<()> {
    client
        .batch_execute(r#"TRUNCATE TABLE "public"."person" RESTART IDENTITY;"#)
        .await
        .map_err(unavailable)
}

fn task_fn(client: Arc<Client>, action: PgStoreAction) -> TaskFuture {
    Box::pin(async move {
        // A failed send means the caller timed out and stopped waiting
        match action {
            PgStoreAction::FindAll(reply) => {
                let _ = reply.send(find_all(&client).await);
            }
            PgStoreAction::FindById(id, reply) => {
                let _ = reply.send(find_by_id(&client, id).await);
            }
            PgStoreAction::FindByEmail(email, reply) => {
                let _ = reply.send(find_by_email(&client, &email).await);
            }
            PgStoreAction::FindByName(first_name, last_name, reply) => {
                let _ = reply.send(find_by_name(&client, &first_name, &last_name).await);
            }
            PgStoreAction::Insert(person, reply) => {
                let _ = reply.send(insert(&client, person).await);
            }
            PgStoreAction::Save(person, reply) => {
                let _ = reply.send(save(&client, person).await);
            }
            PgStoreAction::Delete(id, reply) => {
                let _ = reply.send(delete(&client, id).await);
            }
            PgStoreAction::Count(reply) => {
                let _ = reply.send(count(&client).await);
            }
            PgStoreAction::Reset(reply) => {
                let _ = reply.send(reset(&client).await);
            }
        }
    })
}

impl PersonStore for PgStore {
    fn find_all(&self) -> StoreResult<Vec<Person>> {
        self.network_store.request(PgStoreAction::FindAll)
    }

    fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
        self.network_store
            .request(|reply| PgStoreAction::FindById(id, reply))
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        self.network_store
            .request(|reply| PgStoreAction::FindByEmail(email.to_string(), reply))
    }

    fn find_by_name(&self, first_name: &str, last_name: &str) -> StoreResult<Vec<Person>> {
        self.network_store.request(|reply| {
            PgStoreAction::FindByName(first_name.to_string(), last_name.to_string(), reply)
        })
    }

    fn insert(&self, person: Person) -> StoreResult<Person> {
        self.network_store
            .request(|reply| PgStoreAction::Insert(person, reply))
    }

    fn save(&self, person: Person) -> StoreResult<Person> {
        self.network_store
            .request(|reply| PgStoreAction::Save(person, reply))
    }

    fn delete(&self, id: PersonId) -> StoreResult<()> {
        self.network_store
            .request(|reply| PgStoreAction::Delete(id, reply))
    }

    fn count(&self) -> StoreResult<usize> {
        self.network_store.request(PgStoreAction::Count)
    }

    fn reset(&self) -> StoreResult<()> {
        self.network_store.request(PgStoreAction::Reset)
    }
}
