use crate::admin::MutationLog;
use crate::auth::{service, Access, Session, SessionRegistry, SessionState};
use crate::config::AppConfig;
use crate::error::{MarketError, Result};
use crate::models::{Category, Inquiry, ListingStatus, Property, Role, User};
use crate::search::{self, ListingStats, SearchCriteria, SortOrder};
use crate::sources::{CatalogSource, MemoryStore, SessionPersistence};
use tracing::info;

/// Store, live sessions and audit log behind a single owner
///
/// This is the outermost boundary: session state is handed in by the caller
/// on every call rather than held here.
pub struct Marketplace {
    pub(crate) store: MemoryStore,
    pub(crate) sessions: SessionRegistry,
    pub(crate) log: MutationLog,
    config: AppConfig,
}

impl Marketplace {
    pub fn new(store: MemoryStore, config: AppConfig) -> Self {
        Self {
            store,
            sessions: SessionRegistry::new(config.session_ttl()),
            log: MutationLog::new(),
            config,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn mutation_log(&self) -> &MutationLog {
        &self.log
    }

    /// Async source serving a snapshot of the current listings
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::with_latency(self.store.snapshot(), self.config.source_latency())
    }

    /// Public search: filter the current listings, then order them
    pub fn search(&self, criteria: &SearchCriteria, order: SortOrder) -> Vec<Property> {
        let mut results = search::filter(self.store.properties(), criteria);
        search::sort(&mut results, order);
        results
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        service::sign_in(&self.store, &mut self.sessions, email, password)
    }

    pub fn sign_up(&mut self, name: &str, email: &str, password: &str, role: &str) -> Result<Session> {
        service::sign_up(&mut self.store, &mut self.sessions, name, email, password, role)
    }

    pub fn sign_out(&mut self, state: &mut SessionState) {
        service::sign_out(&mut self.sessions, state)
    }

    pub fn authorize(&self, state: &SessionState, access: Access) -> bool {
        service::authorize(&self.store, &self.sessions, state, access)
    }

    pub fn current_user(&self, state: &SessionState) -> Result<User> {
        service::current_user(&self.store, &self.sessions, state)
    }

    /// Resume a stored session, readmitting its token after a restart
    pub fn restore(&mut self, persistence: &mut dyn SessionPersistence) -> SessionState {
        service::restore(&self.store, &mut self.sessions, persistence)
    }

    /// Listings on the caller's own dashboard, optionally one category tab
    pub fn my_listings(&self, state: &SessionState, category: Option<Category>) -> Result<Vec<Property>> {
        let user = self.current_user(state)?;
        Ok(search::owned_by(self.store.properties(), &user.id)
            .into_iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    /// Contact form on a listing page. Anyone may send one to an active listing.
    pub fn submit_inquiry(&mut self, property_id: &str, inquiry: &Inquiry) -> Result<()> {
        inquiry.validate()?;
        let property = self.store.property_mut(property_id)?;
        if property.status != ListingStatus::Active {
            return Err(MarketError::Validation(format!(
                "listing {} is not accepting inquiries",
                property_id
            )));
        }
        property.inquiries += 1;
        info!("Inquiry for listing {} from {}", property_id, inquiry.email);
        Ok(())
    }

    /// Dashboard cards: admins see the whole marketplace, others their own listings
    pub fn dashboard_stats(&self, state: &SessionState) -> Result<ListingStats> {
        let user = self.current_user(state)?;
        let properties = self.store.properties();
        Ok(match user.role {
            Role::Admin => ListingStats::from_properties(properties),
            _ => ListingStats::from_properties(search::owned_by(properties, &user.id)),
        })
    }
}
