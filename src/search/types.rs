use crate::error::{MarketError, Result};
use crate::models::{AccountStatus, Category, ListingStatus, Role};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Search parameters for the public listings page
///
/// Every field is optional; an absent field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Exact category match
    pub category: Option<Category>,
    /// Case-insensitive substring of the listing location
    pub location: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<u64>,
    /// Inclusive upper price bound
    pub max_price: Option<u64>,
    /// Exact bedroom count
    pub bedrooms: Option<u32>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(&location.into());
        self
    }

    pub fn price_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = Some(bedrooms);
        self
    }

    /// Build criteria from raw query-string pairs as emitted by the search form
    /// (`type`, `location`, `minPrice`, `maxPrice`, `bedrooms`).
    ///
    /// Blank values, unparseable numbers and unknown categories are dropped
    /// rather than rejected. Unrecognised keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "type" | "category" => criteria.category = parse_lenient(value),
                "location" => criteria.location = non_blank(value),
                "minPrice" | "min_price" => criteria.min_price = parse_lenient(value),
                "maxPrice" | "max_price" => criteria.max_price = parse_lenient(value),
                "bedrooms" => criteria.bedrooms = parse_lenient(value),
                _ => {}
            }
        }
        criteria
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Explain why a search can never match. The filter does not call this.
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(MarketError::Validation(format!(
                    "minimum price {} exceeds maximum price {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// Filters for the admin listings table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPropertyQuery {
    /// Matched against title, location and owner name
    pub term: Option<String>,
    pub status: Option<ListingStatus>,
    pub category: Option<Category>,
}

impl AdminPropertyQuery {
    /// `"all"` and blank select values mean no constraint.
    pub fn from_form(term: &str, status: &str, category: &str) -> Self {
        Self {
            term: non_blank(term),
            status: select_value(status),
            category: select_value(category),
        }
    }
}

/// Filters for the admin users table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Matched against name and email
    pub term: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl UserQuery {
    pub fn from_form(term: &str, role: &str, status: &str) -> Self {
        Self {
            term: non_blank(term),
            role: select_value(role),
            status: select_value(status),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Keep the store order
    #[default]
    Relevance,
    Newest,
    PriceLowToHigh,
    PriceHighToLow,
}

impl FromStr for SortOrder {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "relevance" => Ok(SortOrder::Relevance),
            "newest" => Ok(SortOrder::Newest),
            "price_asc" | "price-low-to-high" => Ok(SortOrder::PriceLowToHigh),
            "price_desc" | "price-high-to-low" => Ok(SortOrder::PriceHighToLow),
            other => Err(MarketError::Validation(format!("unknown sort order '{}'", other))),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_lenient<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

fn select_value<T: FromStr>(value: &str) -> Option<T> {
    match value.trim() {
        "" | "all" => None,
        other => other.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_reads_form_keys() {
        let criteria = SearchCriteria::from_pairs([
            ("type", "rent"),
            ("location", "Koramangala"),
            ("minPrice", "5000"),
            ("maxPrice", "50000"),
            ("bedrooms", "3"),
        ]);

        assert_eq!(criteria.category, Some(Category::Rent));
        assert_eq!(criteria.location.as_deref(), Some("Koramangala"));
        assert_eq!(criteria.min_price, Some(5000));
        assert_eq!(criteria.max_price, Some(50000));
        assert_eq!(criteria.bedrooms, Some(3));
    }

    #[test]
    fn test_malformed_values_are_absent() {
        let criteria = SearchCriteria::from_pairs([
            ("type", "castle"),
            ("location", "   "),
            ("minPrice", "cheap"),
            ("maxPrice", "-100"),
            ("bedrooms", "two"),
            ("furnishing", "fully"),
        ]);

        assert!(criteria.is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let criteria = SearchCriteria::new().price_range(Some(20000), Some(10000));
        assert!(matches!(criteria.validate(), Err(MarketError::Validation(_))));
        assert!(SearchCriteria::new().price_range(Some(1), Some(1)).validate().is_ok());
    }

    #[test]
    fn test_admin_select_all_means_no_constraint() {
        let query = AdminPropertyQuery::from_form("", "all", "pg");
        assert_eq!(query.term, None);
        assert_eq!(query.status, None);
        assert_eq!(query.category, Some(Category::Pg));

        let users = UserQuery::from_form(" priya ", "owner", "all");
        assert_eq!(users.term.as_deref(), Some("priya"));
        assert_eq!(users.role, Some(Role::Owner));
        assert_eq!(users.status, None);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("price_asc".parse::<SortOrder>().unwrap(), SortOrder::PriceLowToHigh);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Relevance);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
