//! Moderation actions on listings and accounts.
//!
//! Each action re-resolves the caller from the session and is safe to
//! repeat: applying the same value twice leaves the same record and only the
//! first application is logged.

pub mod log;

pub use log::{MutationAction, MutationEntry, MutationLog};

use crate::error::{MarketError, Result};
use crate::marketplace::Marketplace;
use crate::auth::SessionState;
use crate::models::{AccountStatus, ListingStatus, Property, Role, User, VerificationStatus};
use crate::search::{filter_admin, filter_users, AdminPropertyQuery, UserQuery};
use crate::sources::UserStore;
use tracing::{info, warn};

/// Result of one id within a bulk action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub id: String,
    pub result: Result<()>,
}

/// Per-id results of a bulk action, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub items: Vec<ItemOutcome>,
}

impl BulkOutcome {
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|i| i.result.is_ok())
            .map(|i| i.id.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &MarketError)> {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().err().map(|e| (i.id.as_str(), e)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(|i| i.result.is_ok())
    }
}

impl Marketplace {
    fn require_admin(&self, state: &SessionState) -> Result<User> {
        let user = self.current_user(state)?;
        if user.role != Role::Admin {
            warn!("User {} ({}) attempted an admin action", user.id, user.role);
            return Err(MarketError::Forbidden(format!(
                "{} accounts cannot moderate listings",
                user.role
            )));
        }
        Ok(user)
    }

    /// Admin listings table
    pub fn listings_table(&self, state: &SessionState, query: &AdminPropertyQuery) -> Result<Vec<Property>> {
        self.require_admin(state)?;
        Ok(filter_admin(self.store.properties(), self.store.users(), query))
    }

    /// Admin users table
    pub fn users_table(&self, state: &SessionState, query: &UserQuery) -> Result<Vec<User>> {
        self.require_admin(state)?;
        Ok(filter_users(self.store.users(), query))
    }

    pub fn set_verified(&mut self, state: &SessionState, property_id: &str, verified: bool) -> Result<()> {
        let admin = self.require_admin(state)?;
        let property = self.store.property_mut(property_id)?;
        if property.verified != verified {
            property.verified = verified;
            self.log
                .record(&admin.id, property_id, MutationAction::SetVerified(verified));
            info!("Listing {} verified={} by {}", property_id, verified, admin.id);
        }
        Ok(())
    }

    /// Admins may feature any listing; everyone else only their own.
    pub fn set_featured(&mut self, state: &SessionState, property_id: &str, featured: bool) -> Result<()> {
        let caller = self.current_user(state)?;
        let property = self.store.property_mut(property_id)?;
        if caller.role != Role::Admin && property.owner_id != caller.id {
            warn!("User {} attempted to feature listing {} they do not own", caller.id, property_id);
            return Err(MarketError::Forbidden(format!(
                "listing {} belongs to another owner",
                property_id
            )));
        }
        if property.featured != featured {
            property.featured = featured;
            self.log
                .record(&caller.id, property_id, MutationAction::SetFeatured(featured));
            info!("Listing {} featured={} by {}", property_id, featured, caller.id);
        }
        Ok(())
    }

    pub fn set_status(&mut self, state: &SessionState, property_id: &str, status: ListingStatus) -> Result<()> {
        let admin = self.require_admin(state)?;
        let property = self.store.property_mut(property_id)?;
        if property.status != status {
            property.status = status;
            self.log
                .record(&admin.id, property_id, MutationAction::SetStatus(status));
            info!("Listing {} status={} by {}", property_id, status, admin.id);
        }
        Ok(())
    }

    /// Suspending also revokes every live session of the target account.
    pub fn set_user_suspended(&mut self, state: &SessionState, user_id: &str, suspended: bool) -> Result<()> {
        let admin = self.require_admin(state)?;
        let target = self
            .store
            .find_user(user_id)
            .ok_or_else(|| MarketError::user_not_found(user_id))?;

        let status = if suspended {
            AccountStatus::Suspended
        } else {
            AccountStatus::Active
        };
        if target.status != status {
            self.store.set_user_status(user_id, status)?;
            self.log
                .record(&admin.id, user_id, MutationAction::SetSuspended(suspended));
            info!("User {} suspended={} by {}", user_id, suspended, admin.id);
        }
        if suspended {
            let revoked = self.sessions.revoke_user(user_id);
            if revoked > 0 {
                info!("Revoked {} session(s) of suspended user {}", revoked, user_id);
            }
        }
        Ok(())
    }

    pub fn delete_property(&mut self, state: &SessionState, property_id: &str) -> Result<()> {
        let admin = self.require_admin(state)?;
        self.store.remove_property(property_id)?;
        self.log.record(&admin.id, property_id, MutationAction::Deleted);
        info!("Listing {} deleted by {}", property_id, admin.id);
        Ok(())
    }

    /// Remove an account and revoke its sessions. Its listings are kept.
    pub fn delete_user(&mut self, state: &SessionState, user_id: &str) -> Result<()> {
        let admin = self.require_admin(state)?;
        if admin.id == user_id {
            return Err(MarketError::Validation(
                "admins cannot delete their own account".to_string(),
            ));
        }
        self.store.remove_user(user_id)?;
        let revoked = self.sessions.revoke_user(user_id);
        self.log.record(&admin.id, user_id, MutationAction::UserDeleted);
        info!("User {} deleted by {} ({} session(s) revoked)", user_id, admin.id, revoked);
        Ok(())
    }

    pub fn verify_selected<S: AsRef<str>>(
        &mut self,
        state: &SessionState,
        ids: &[S],
        verified: bool,
    ) -> BulkOutcome {
        self.apply_each(ids, |market, id| market.set_verified(state, id, verified))
    }

    pub fn delete_selected<S: AsRef<str>>(&mut self, state: &SessionState, ids: &[S]) -> BulkOutcome {
        self.apply_each(ids, |market, id| market.delete_property(state, id))
    }

    pub fn suspend_selected<S: AsRef<str>>(
        &mut self,
        state: &SessionState,
        ids: &[S],
        suspended: bool,
    ) -> BulkOutcome {
        self.apply_each(ids, |market, id| market.set_user_suspended(state, id, suspended))
    }

    pub fn delete_users_selected<S: AsRef<str>>(&mut self, state: &SessionState, ids: &[S]) -> BulkOutcome {
        self.apply_each(ids, |market, id| market.delete_user(state, id))
    }

    fn apply_each<S, F>(&mut self, ids: &[S], mut op: F) -> BulkOutcome
    where
        S: AsRef<str>,
        F: FnMut(&mut Self, &str) -> Result<()>,
    {
        let items: Vec<ItemOutcome> = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                ItemOutcome {
                    id: id.to_string(),
                    result: op(self, id),
                }
            })
            .collect();

        let failed = items.iter().filter(|i| i.result.is_err()).count();
        if failed > 0 {
            warn!("Bulk action: {} of {} item(s) failed", failed, items.len());
        }
        BulkOutcome { items }
    }

    /// Approve a pending request and mark its listing verified.
    pub fn approve_verification(&mut self, state: &SessionState, request_id: &str) -> Result<()> {
        let admin = self.require_admin(state)?;
        let property_id = self.pending_request(request_id)?;

        self.store.property_mut(&property_id)?.verified = true;
        self.store.verification_mut(request_id)?.status = VerificationStatus::Approved;
        self.log
            .record(&admin.id, request_id, MutationAction::VerificationApproved);
        info!("Verification {} for listing {} approved by {}", request_id, property_id, admin.id);
        Ok(())
    }

    pub fn reject_verification(&mut self, state: &SessionState, request_id: &str, reason: &str) -> Result<()> {
        let admin = self.require_admin(state)?;
        self.pending_request(request_id)?;

        let reason = match reason.trim() {
            "" => "Rejected by admin".to_string(),
            r => r.to_string(),
        };
        let request = self.store.verification_mut(request_id)?;
        request.status = VerificationStatus::Rejected;
        request.rejection_reason = Some(reason.clone());
        self.log
            .record(&admin.id, request_id, MutationAction::VerificationRejected(reason));
        info!("Verification {} rejected by {}", request_id, admin.id);
        Ok(())
    }

    /// Property id of a request that is still awaiting a decision
    fn pending_request(&mut self, request_id: &str) -> Result<String> {
        let request = self.store.verification_mut(request_id)?;
        if request.status != VerificationStatus::Pending {
            return Err(MarketError::Validation(format!(
                "verification request {} has already been decided",
                request_id
            )));
        }
        Ok(request.property_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::sources::seed;

    fn market() -> Marketplace {
        Marketplace::new(seed::store(), AppConfig::default())
    }

    fn signed_in(market: &mut Marketplace, email: &str) -> SessionState {
        market.sign_in(email, "pw").unwrap().into()
    }

    #[test]
    fn test_non_admin_cannot_verify() {
        let mut market = market();
        let owner = signed_in(&mut market, "rahul@example.com");

        let err = market.set_verified(&owner, "5", true).unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));
        assert!(!market.store().property("5").unwrap().verified);
        assert!(market.mutation_log().is_empty());
    }

    #[test]
    fn test_anonymous_cannot_verify() {
        let mut market = market();
        let err = market
            .set_verified(&SessionState::Anonymous, "5", true)
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));
    }

    #[test]
    fn test_admin_verify_is_idempotent() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");

        market.set_verified(&admin, "5", true).unwrap();
        market.set_verified(&admin, "5", true).unwrap();

        assert!(market.store().property("5").unwrap().verified);
        assert_eq!(market.mutation_log().len(), 1);
    }

    #[test]
    fn test_verify_unknown_property() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let err = market.set_verified(&admin, "404", true).unwrap_err();
        assert!(matches!(err, MarketError::NotFound { kind: "Property", .. }));
    }

    #[test]
    fn test_owner_features_only_own_listing() {
        let mut market = market();
        let rahul = signed_in(&mut market, "rahul@example.com");

        market.set_featured(&rahul, "3", false).unwrap();
        assert!(!market.store().property("3").unwrap().featured);

        let err = market.set_featured(&rahul, "2", true).unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));
        assert!(!market.store().property("2").unwrap().featured);
    }

    #[test]
    fn test_feature_unknown_property() {
        let mut market = market();
        let rahul = signed_in(&mut market, "rahul@example.com");
        let admin = signed_in(&mut market, "admin@example.com");

        for state in [&rahul, &admin] {
            let err = market.set_featured(state, "404", true).unwrap_err();
            assert!(matches!(err, MarketError::NotFound { kind: "Property", .. }));
        }
        assert!(market.mutation_log().is_empty());
    }

    #[test]
    fn test_status_unknown_property() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");

        let err = market
            .set_status(&admin, "404", ListingStatus::Inactive)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotFound { kind: "Property", .. }));
        assert!(market.mutation_log().is_empty());
    }

    #[test]
    fn test_admin_sets_status() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let tenant = signed_in(&mut market, "sneha@example.com");

        market.set_status(&admin, "2", ListingStatus::Active).unwrap();
        assert_eq!(market.store().property("2").unwrap().status, ListingStatus::Active);

        assert!(market.set_status(&tenant, "2", ListingStatus::Inactive).is_err());
        assert_eq!(market.store().property("2").unwrap().status, ListingStatus::Active);
    }

    #[test]
    fn test_suspension_revokes_sessions() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let agent = signed_in(&mut market, "amit@example.com");
        assert!(market.authorize(&agent, crate::auth::Access::Dashboard));

        market.set_user_suspended(&admin, "3", true).unwrap();
        assert!(!market.authorize(&agent, crate::auth::Access::Dashboard));
        assert!(matches!(
            market.sign_in("amit@example.com", "pw"),
            Err(MarketError::AccountSuspended(_))
        ));

        market.set_user_suspended(&admin, "3", false).unwrap();
        // reinstating does not revive the old session
        assert!(!market.authorize(&agent, crate::auth::Access::Dashboard));
        assert!(market.sign_in("amit@example.com", "pw").is_ok());
    }

    #[test]
    fn test_suspend_unknown_user() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let err = market.set_user_suspended(&admin, "99", true).unwrap_err();
        assert!(matches!(err, MarketError::NotFound { kind: "User", .. }));
    }

    #[test]
    fn test_bulk_reports_per_item() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");

        let outcome = market.verify_selected(&admin, &["5", "missing", "2"], true);
        assert!(!outcome.all_succeeded());
        assert_eq!(outcome.succeeded().collect::<Vec<_>>(), vec!["5", "2"]);
        let failed: Vec<_> = outcome.failed().map(|(id, _)| id).collect();
        assert_eq!(failed, vec!["missing"]);
        assert!(market.store().property("5").unwrap().verified);
    }

    #[test]
    fn test_bulk_delete() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let before = market.store().properties().len();

        let outcome = market.delete_selected(&admin, &["7".to_string(), "8".to_string(), "7".to_string()]);
        assert_eq!(outcome.succeeded().count(), 2);
        assert!(matches!(
            outcome.items[2].result,
            Err(MarketError::NotFound { .. })
        ));
        assert_eq!(market.store().properties().len(), before - 2);
    }

    #[test]
    fn test_bulk_by_non_admin_fails_each_item() {
        let mut market = market();
        let tenant = signed_in(&mut market, "sneha@example.com");

        let outcome = market.delete_selected(&tenant, &["1", "2"]);
        assert_eq!(outcome.failed().count(), 2);
        assert_eq!(market.store().properties().len(), 8);
    }

    #[test]
    fn test_suspend_selected_revokes_each() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let rahul = signed_in(&mut market, "rahul@example.com");
        let sneha = signed_in(&mut market, "sneha@example.com");

        let outcome = market.suspend_selected(&admin, &["1", "ghost", "4"], true);
        assert_eq!(outcome.succeeded().collect::<Vec<_>>(), vec!["1", "4"]);
        assert!(matches!(
            outcome.items[1].result,
            Err(MarketError::NotFound { kind: "User", .. })
        ));

        assert!(!market.authorize(&rahul, crate::auth::Access::Dashboard));
        assert!(!market.authorize(&sneha, crate::auth::Access::Dashboard));
        assert!(market.store().find_user("4").unwrap().is_suspended());
        assert!(market.authorize(&admin, crate::auth::Access::ADMIN));
    }

    #[test]
    fn test_delete_user_revokes_sessions() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let priya = signed_in(&mut market, "priya@example.com");
        let before = market.store().user_count();

        market.delete_user(&admin, "2").unwrap();
        assert_eq!(market.store().user_count(), before - 1);
        assert!(market.store().find_user("2").is_none());
        assert!(!market.authorize(&priya, crate::auth::Access::Dashboard));
        assert_eq!(
            market.sign_in("priya@example.com", "pw").unwrap_err(),
            MarketError::InvalidCredentials
        );
        // listings outlive their owner's account
        assert!(market.store().property("2").is_some());

        let entry = market.mutation_log().entries().last().unwrap();
        assert_eq!(entry.action, MutationAction::UserDeleted);
        assert_eq!(entry.target_id, "2");
    }

    #[test]
    fn test_delete_user_guards() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let agent = signed_in(&mut market, "amit@example.com");

        assert!(matches!(
            market.delete_user(&agent, "4"),
            Err(MarketError::Forbidden(_))
        ));
        assert!(matches!(
            market.delete_user(&admin, "6"),
            Err(MarketError::Validation(_))
        ));
        assert!(matches!(
            market.delete_user(&admin, "99"),
            Err(MarketError::NotFound { kind: "User", .. })
        ));
        assert!(market.mutation_log().is_empty());
    }

    #[test]
    fn test_delete_users_selected() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let before = market.store().user_count();

        let outcome = market.delete_users_selected(&admin, &["4", "5", "4"]);
        assert_eq!(outcome.succeeded().count(), 2);
        assert!(matches!(outcome.items[2].result, Err(MarketError::NotFound { .. })));
        assert_eq!(market.store().user_count(), before - 2);
    }

    #[test]
    fn test_admin_tables() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");
        let owner = signed_in(&mut market, "priya@example.com");

        let query = AdminPropertyQuery::from_form("amit", "all", "all");
        let ids: Vec<_> = market
            .listings_table(&admin, &query)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["4", "6", "8"]);

        let suspended = UserQuery::from_form("", "all", "suspended");
        let users = market.users_table(&admin, &suspended).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Deepak Verma");

        assert!(matches!(
            market.users_table(&owner, &UserQuery::default()),
            Err(MarketError::Forbidden(_))
        ));
    }

    #[test]
    fn test_verification_queue() {
        let mut market = market();
        let admin = signed_in(&mut market, "admin@example.com");

        market.approve_verification(&admin, "1").unwrap();
        assert!(market.store().property("5").unwrap().verified);

        market.reject_verification(&admin, "2", "").unwrap();
        let rejected = market
            .store()
            .verifications()
            .iter()
            .find(|v| v.id == "2")
            .unwrap();
        assert_eq!(rejected.status, VerificationStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Rejected by admin"));

        let err = market.approve_verification(&admin, "2").unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));
    }
}
