use super::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single entry in the contact book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub favorite: bool,
}

/// Partial contact data for create and update calls. Fields that are not
/// set are never sent to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactPayload {
    /// The strict boolean persisted for `favorite` - only a literal `true`
    /// in the payload counts.
    pub fn favorite_flag(&self) -> bool {
        self.favorite == Some(true)
    }
}

/// Equality filter over contact fields. Fields that are not set don't
/// constrain the result, so the default filter matches every record.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub favorite: Option<bool>,
}

impl From<&ContactPayload> for ContactFilter {
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

#[async_trait]
pub trait ContactStoreApi: Send + Sync {
    /// Creates a contact from the set payload fields, or returns the
    /// existing record if one matches all of them. The stored `favorite`
    /// flag is overwritten with the coerced boolean either way.
    async fn create(&self, payload: &ContactPayload) -> Result<Contact>;
    /// Returns all contacts matching the filter
    async fn find(&self, filter: &ContactFilter) -> Result<Vec<Contact>>;
    /// Case-insensitive name search, the given term is used as regex source
    async fn find_by_name(&self, name: &str) -> Result<Vec<Contact>>;
    /// Fetches the contact with the given id, if there is one
    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>>;
    /// Merges the set payload fields onto the contact with the given id
    async fn update(&self, id: &str, payload: &ContactPayload) -> Result<Option<Contact>>;
    /// Removes the contact with the given id, returning its last state
    async fn delete(&self, id: &str) -> Result<Option<Contact>>;
    /// Returns all contacts flagged as favorite
    async fn find_favorite(&self) -> Result<Vec<Contact>>;
    /// Removes all contacts, returning how many were removed
    async fn delete_all(&self) -> Result<u64>;
}
