//! Listing search, sessions and moderation for a rental marketplace.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod models;
pub mod search;
pub mod sources;

pub use error::{MarketError, Result};
pub use marketplace::Marketplace;
