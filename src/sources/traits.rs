use crate::error::Result as MarketResult;
use crate::models::{AccountStatus, NewUser, Property, User};
use crate::search::{filter, SearchCriteria};
use anyhow::Result;
use async_trait::async_trait;

/// Where listings come from
/// The filter stays synchronous; only fetching the snapshot is async.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch every listing, in source order
    async fn list_properties(&self) -> Result<Vec<Property>>;

    /// Fetch a single listing by id
    async fn find_property(&self, id: &str) -> Result<Option<Property>>;

    /// Get the name of the data source
    fn source_name(&self) -> &'static str;

    /// Fetch a snapshot and filter it
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Property>> {
        let properties = self.list_properties().await?;
        Ok(filter(&properties, criteria))
    }
}

/// Account lookup and creation
pub trait UserStore {
    /// Emails compare case-insensitively
    fn find_user_by_email(&self, email: &str) -> Option<User>;

    fn find_user(&self, id: &str) -> Option<User>;

    /// Fails with `EmailAlreadyRegistered` if the email is taken
    fn create_user(&mut self, new_user: NewUser) -> MarketResult<User>;

    fn set_user_status(&mut self, id: &str, status: AccountStatus) -> MarketResult<User>;

    fn user_count(&self) -> usize;
}

/// Client-side continuity for a signed-in session
/// The value is an opaque serialized token.
pub trait SessionPersistence {
    fn get(&self) -> Result<Option<String>>;
    fn set(&mut self, value: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}
