use super::Result;
use crate::{
    Error,
    constants::{DB_ADDRESS, DB_EMAIL, DB_FAVORITE, DB_NAME, DB_PHONE, DB_SEARCH_TERM, DB_TABLE},
    contact::{Contact, ContactFilter, ContactPayload, ContactStoreApi},
};
use async_trait::async_trait;
use log::error;
use serde::{Deserialize, Serialize};
use surrealdb::{Surreal, engine::any::Any, sql::Thing};

#[derive(Clone)]
pub struct SurrealContactStore {
    db: Surreal<Any>,
}

impl SurrealContactStore {
    const TABLE: &'static str = "contacts";

    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Record ids the store generates are 20 characters from [a-z0-9].
    /// Anything else can never address a stored contact.
    fn is_valid_record_id(id: &str) -> bool {
        id.len() == 20
            && id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    }

    async fn query_by_filter(
        &self,
        filter: &ContactFilter,
        first_match_only: bool,
    ) -> Result<Vec<ContactDb>> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.name.is_some() {
            conditions.push("name = $name");
        }
        if filter.email.is_some() {
            conditions.push("email = $email");
        }
        if filter.address.is_some() {
            conditions.push("address = $address");
        }
        if filter.phone.is_some() {
            conditions.push("phone = $phone");
        }
        if filter.favorite.is_some() {
            conditions.push("favorite = $favorite");
        }

        let mut sql = String::from("SELECT * FROM type::table($table)");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if first_match_only {
            sql.push_str(" LIMIT 1");
        }

        let mut query = self.db.query(sql).bind((DB_TABLE, Self::TABLE));
        if let Some(name) = filter.name.clone() {
            query = query.bind((DB_NAME, name));
        }
        if let Some(email) = filter.email.clone() {
            query = query.bind((DB_EMAIL, email));
        }
        if let Some(address) = filter.address.clone() {
            query = query.bind((DB_ADDRESS, address));
        }
        if let Some(phone) = filter.phone.clone() {
            query = query.bind((DB_PHONE, phone));
        }
        if let Some(favorite) = filter.favorite {
            query = query.bind((DB_FAVORITE, favorite));
        }

        let rows: Vec<ContactDb> = query.await?.take(0)?;
        Ok(rows)
    }
}

#[async_trait]
impl ContactStoreApi for SurrealContactStore {
    async fn create(&self, payload: &ContactPayload) -> Result<Contact> {
        let favorite = payload.favorite_flag();
        let matched = self
            .query_by_filter(&ContactFilter::from(payload), true)
            .await?;
        match matched.into_iter().next() {
            Some(existing) => {
                let id = existing.id.id.to_raw();
                let updated: Option<ContactDb> = self
                    .db
                    .update((Self::TABLE, id.as_str()))
                    .merge(FavoritePatchDb { favorite })
                    .await?;
                match updated {
                    Some(row) => Ok(row.into()),
                    None => {
                        error!("contact {id} vanished while setting its favorite flag");
                        Err(Error::InsertFailed(id))
                    }
                }
            }
            None => {
                let created: Option<ContactDb> = self
                    .db
                    .create(Self::TABLE)
                    .content(NewContactDb::from(payload))
                    .await?;
                match created {
                    Some(row) => Ok(row.into()),
                    None => {
                        error!("store returned no record for a created contact");
                        Err(Error::InsertFailed("contact".to_string()))
                    }
                }
            }
        }
    }

    async fn find(&self, filter: &ContactFilter) -> Result<Vec<Contact>> {
        let rows = self.query_by_filter(filter, false).await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Contact>> {
        // the raw term is regex source, metacharacters keep their meaning
        let pattern = format!("(?i){name}");
        let rows: Vec<ContactDb> = self
            .db
            .query("SELECT * FROM type::table($table) WHERE string::matches(name ?? '', $search_term)")
            .bind((DB_TABLE, Self::TABLE))
            .bind((DB_SEARCH_TERM, pattern))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>> {
        if !Self::is_valid_record_id(id) {
            return Ok(None);
        }
        let result: Option<ContactDb> = self.db.select((Self::TABLE, id)).await?;
        Ok(result.map(Contact::from))
    }

    async fn update(&self, id: &str, payload: &ContactPayload) -> Result<Option<Contact>> {
        if !Self::is_valid_record_id(id) {
            return Ok(None);
        }
        let result: Option<ContactDb> = self
            .db
            .update((Self::TABLE, id))
            .merge(ContactPatchDb::from(payload))
            .await?;
        Ok(result.map(Contact::from))
    }

    async fn delete(&self, id: &str) -> Result<Option<Contact>> {
        if !Self::is_valid_record_id(id) {
            return Ok(None);
        }
        let result: Option<ContactDb> = self.db.delete((Self::TABLE, id)).await?;
        Ok(result.map(Contact::from))
    }

    async fn find_favorite(&self) -> Result<Vec<Contact>> {
        self.find(&ContactFilter {
            favorite: Some(true),
            ..Default::default()
        })
        .await
    }

    async fn delete_all(&self) -> Result<u64> {
        let removed: Vec<ContactDb> = self.db.delete(Self::TABLE).await?;
        Ok(removed.len() as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactDb {
    pub id: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub favorite: bool,
}

/// Write model for a new contact, the store assigns the record id.
#[derive(Debug, Clone, Serialize)]
struct NewContactDb {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    favorite: bool,
}

/// Merge content for updates, unset fields stay untouched.
#[derive(Debug, Clone, Serialize)]
struct ContactPatchDb {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorite: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct FavoritePatchDb {
    favorite: bool,
}

impl From<ContactDb> for Contact {
    fn from(value: ContactDb) -> Self {
        Self {
            id: value.id.id.to_raw(),
            name: value.name,
            email: value.email,
            address: value.address,
            phone: value.phone,
            favorite: value.favorite,
        }
    }
}

impl From<&ContactPayload> for NewContactDb {
    fn from(value: &ContactPayload) -> Self {
        Self {
            name: value.name.clone(),
            email: value.email.clone(),
            address: value.address.clone(),
            phone: value.phone.clone(),
            favorite: value.favorite_flag(),
        }
    }
}

impl From<&ContactPayload> for ContactPatchDb {
    fn from(value: &ContactPayload) -> Self {
        Self {
            name: value.name.clone(),
            email: value.email.clone(),
            address: value.address.clone(),
            phone: value.phone.clone(),
            favorite: value.favorite,
        }
    }
}
