use super::traits::UserStore;
use crate::error::{MarketError, Result};
use crate::models::{AccountStatus, NewUser, Property, User, VerificationRequest};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory marketplace tables
///
/// Rows are kept in insertion order so that filters see a stable sequence.
/// Writes are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    properties: Vec<Property>,
    users: Vec<User>,
    verifications: Vec<VerificationRequest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(
        properties: Vec<Property>,
        users: Vec<User>,
        verifications: Vec<VerificationRequest>,
    ) -> Self {
        Self {
            properties,
            users,
            verifications,
        }
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn verifications(&self) -> &[VerificationRequest] {
        &self.verifications
    }

    /// Cheap shared copy of the listings for readers
    pub fn snapshot(&self) -> Arc<Vec<Property>> {
        Arc::new(self.properties.clone())
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn property_mut(&mut self, id: &str) -> Result<&mut Property> {
        self.properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MarketError::property_not_found(id))
    }

    /// Insert or replace a listing by id
    pub fn upsert_property(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.id == property.id) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    pub fn remove_property(&mut self, id: &str) -> Result<Property> {
        let index = self
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| MarketError::property_not_found(id))?;
        Ok(self.properties.remove(index))
    }

    pub fn remove_user(&mut self, id: &str) -> Result<User> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| MarketError::user_not_found(id))?;
        Ok(self.users.remove(index))
    }

    pub fn verification_mut(&mut self, id: &str) -> Result<&mut VerificationRequest> {
        self.verifications
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| MarketError::request_not_found(id))
    }

    pub fn add_verification(&mut self, request: VerificationRequest) {
        self.verifications.push(request);
    }
}

impl UserStore for MemoryStore {
    fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn find_user(&self, id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    fn create_user(&mut self, new_user: NewUser) -> Result<User> {
        if self.find_user_by_email(&new_user.email).is_some() {
            return Err(MarketError::EmailAlreadyRegistered(new_user.email));
        }

        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: new_user.name,
            email: new_user.email.trim().to_string(),
            role: new_user.role,
            status: AccountStatus::Active,
            joined_on: Utc::now().date_naive(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn set_user_status(&mut self, id: &str, status: AccountStatus) -> Result<User> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| MarketError::user_not_found(id))?;
        user.status = status;
        Ok(user.clone())
    }

    fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Sneha Reddy".to_string(),
            email: email.to_string(),
            role: Role::Tenant,
        }
    }

    #[test]
    fn test_create_and_find_user() {
        let mut store = MemoryStore::new();
        let user = store.create_user(new_user("sneha@example.com")).unwrap();

        assert!(user.id.starts_with("user_"));
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(store.find_user(&user.id), Some(user.clone()));
        assert_eq!(store.find_user_by_email("SNEHA@example.com"), Some(user));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut store = MemoryStore::new();
        store.create_user(new_user("sneha@example.com")).unwrap();

        let err = store.create_user(new_user("Sneha@Example.com")).unwrap_err();
        assert!(matches!(err, MarketError::EmailAlreadyRegistered(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_set_status_unknown_user() {
        let mut store = MemoryStore::new();
        let err = store.set_user_status("ghost", AccountStatus::Suspended).unwrap_err();
        assert!(matches!(err, MarketError::NotFound { kind: "User", .. }));
    }

    #[test]
    fn test_remove_unknown_property() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.remove_property("42"),
            Err(MarketError::NotFound { kind: "Property", .. })
        ));
    }

    #[test]
    fn test_remove_user_frees_email() {
        let mut store = MemoryStore::new();
        let user = store.create_user(new_user("sneha@example.com")).unwrap();

        assert_eq!(store.remove_user(&user.id).unwrap(), user);
        assert_eq!(store.user_count(), 0);
        assert!(store.create_user(new_user("sneha@example.com")).is_ok());
        assert!(matches!(
            store.remove_user(&user.id),
            Err(MarketError::NotFound { kind: "User", .. })
        ));
    }
}
