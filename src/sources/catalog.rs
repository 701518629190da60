use crate::models::Property;
use crate::sources::traits::PropertySource;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Listing source over a snapshot of the in-memory store
pub struct CatalogSource {
    properties: Arc<Vec<Property>>,
    latency: Duration,
}

impl CatalogSource {
    pub fn new(properties: Arc<Vec<Property>>) -> Self {
        Self::with_latency(properties, Duration::ZERO)
    }

    /// Simulate a slow backend by sleeping before each response
    pub fn with_latency(properties: Arc<Vec<Property>>, latency: Duration) -> Self {
        Self {
            properties,
            latency,
        }
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            debug!("Simulating {:?} of source latency", self.latency);
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PropertySource for CatalogSource {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.wait().await;
        debug!("Serving {} listings from catalog", self.properties.len());
        Ok(self.properties.as_ref().clone())
    }

    async fn find_property(&self, id: &str) -> Result<Option<Property>> {
        self.wait().await;
        Ok(self.properties.iter().find(|p| p.id == id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "Catalog"
    }
}
