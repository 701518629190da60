//! Pure filtering over property and user snapshots.
//!
//! Nothing here fails: criteria that could not be parsed were already
//! dropped when the criteria were built, and an impossible price range simply
//! matches nothing. Every filter keeps the input order.

use super::types::{AdminPropertyQuery, SearchCriteria, SortOrder, UserQuery};
use crate::models::{Category, ListingStatus, Property, User};
use serde::Serialize;
use std::collections::BTreeMap;

impl SearchCriteria {
    /// Check whether a single property satisfies every present criterion.
    pub fn matches(&self, property: &Property) -> bool {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return false;
            }
        }
        if let Some(category) = self.category {
            if property.category != category {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(&property.location, location) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if property.bedrooms != bedrooms {
                return false;
            }
        }
        true
    }
}

/// Stable filter of `properties` by `criteria`.
pub fn filter(properties: &[Property], criteria: &SearchCriteria) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

/// Reorder a result set. Ties keep their relative order.
pub fn sort(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::Relevance => {}
        SortOrder::Newest => properties.sort_by(|a, b| b.posted_on.cmp(&a.posted_on)),
        SortOrder::PriceLowToHigh => properties.sort_by_key(|p| p.price),
        SortOrder::PriceHighToLow => properties.sort_by(|a, b| b.price.cmp(&a.price)),
    }
}

/// Listings table filter. The search term matches title, location, or the
/// owner's name (falling back to the raw owner id when the owner is unknown).
pub fn filter_admin(
    properties: &[Property],
    users: &[User],
    query: &AdminPropertyQuery,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| {
            let matches_term = match &query.term {
                None => true,
                Some(term) => {
                    let owner = users
                        .iter()
                        .find(|u| u.id == p.owner_id)
                        .map(|u| u.name.as_str())
                        .unwrap_or(p.owner_id.as_str());
                    contains_ignore_case(&p.title, term)
                        || contains_ignore_case(&p.location, term)
                        || contains_ignore_case(owner, term)
                }
            };
            let matches_status = query.status.map_or(true, |s| p.status == s);
            let matches_category = query.category.map_or(true, |c| p.category == c);
            matches_term && matches_status && matches_category
        })
        .cloned()
        .collect()
}

pub fn filter_users(users: &[User], query: &UserQuery) -> Vec<User> {
    users
        .iter()
        .filter(|u| {
            let matches_term = query.term.as_deref().map_or(true, |term| {
                contains_ignore_case(&u.name, term) || contains_ignore_case(&u.email, term)
            });
            let matches_role = query.role.map_or(true, |r| u.role == r);
            let matches_status = query.status.map_or(true, |s| u.status == s);
            matches_term && matches_role && matches_status
        })
        .cloned()
        .collect()
}

/// Listings of a single owner, as shown on their dashboard.
pub fn owned_by<'a>(properties: &'a [Property], owner_id: &str) -> Vec<&'a Property> {
    properties.iter().filter(|p| p.owner_id == owner_id).collect()
}

pub fn count_by_category(properties: &[Property]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        Category::ALL.iter().map(|c| (c.as_str(), 0)).collect();
    for property in properties {
        *counts.entry(property.category.as_str()).or_default() += 1;
    }
    counts
}

/// Summary numbers for the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
    pub featured: usize,
    pub verified: usize,
    pub views: u64,
    pub inquiries: u64,
}

impl ListingStats {
    pub fn from_properties<'a, I>(properties: I) -> Self
    where
        I: IntoIterator<Item = &'a Property>,
    {
        properties.into_iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            match p.status {
                ListingStatus::Active => stats.active += 1,
                ListingStatus::Pending => stats.pending += 1,
                ListingStatus::Inactive => stats.inactive += 1,
            }
            stats.featured += usize::from(p.featured);
            stats.verified += usize::from(p.verified);
            stats.views += p.views;
            stats.inquiries += p.inquiries;
            stats
        })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
