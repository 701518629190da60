use clap::Parser;
use property_hub::search::{SearchCriteria, SortOrder};
use tracing::warn;

/// Search the listing catalog
#[derive(Parser, Debug, Default)]
#[command(name = "property-hub", version, about)]
pub struct Cli {
    /// Listing category: rent, buy, pg or commercial
    #[arg(long = "type")]
    pub category: Option<String>,

    /// Case-insensitive location substring
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub min_price: Option<String>,

    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum number of bedrooms
    #[arg(short, long)]
    pub bedrooms: Option<String>,

    /// relevance, newest, price_asc or price_desc
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sign in as this email and remember the session
    #[arg(long)]
    pub login: Option<String>,
}

impl Cli {
    /// Values go through the same lenient parsing as the search form, so
    /// a malformed number leaves that bound open instead of failing.
    pub fn criteria(&self) -> SearchCriteria {
        let pairs = [
            ("type", &self.category),
            ("location", &self.location),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
            ("bedrooms", &self.bedrooms),
        ];
        SearchCriteria::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (key, v))),
        )
    }

    pub fn sort_order(&self) -> SortOrder {
        match &self.sort {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}; keeping listing order", e);
                SortOrder::Relevance
            }),
            None => SortOrder::Relevance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use property_hub::models::Category;

    #[test]
    fn test_flags_map_to_criteria() {
        let cli = Cli::try_parse_from([
            "property-hub",
            "--type",
            "rent",
            "--max-price",
            "20000",
            "--bedrooms",
            "2",
            "--sort",
            "price_asc",
        ])
        .unwrap();

        let criteria = cli.criteria();
        assert_eq!(criteria.category, Some(Category::Rent));
        assert_eq!(criteria.max_price, Some(20000));
        assert_eq!(criteria.bedrooms, Some(2));
        assert_eq!(criteria.min_price, None);
        assert_eq!(cli.sort_order(), SortOrder::PriceLowToHigh);
    }

    #[test]
    fn test_malformed_values_do_not_constrain() {
        let cli = Cli::try_parse_from(["property-hub", "--min-price", "lots", "--sort", "cheapest"]).unwrap();
        assert!(cli.criteria().is_empty());
        assert_eq!(cli.sort_order(), SortOrder::Relevance);
    }

    #[test]
    fn test_login_flag() {
        let cli = Cli::try_parse_from(["property-hub", "--login", "rahul@example.com"]).unwrap();
        assert_eq!(cli.login.as_deref(), Some("rahul@example.com"));
        assert!(cli.criteria().is_empty());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["property-hub", "--colour", "blue"]).is_err());
    }
}
