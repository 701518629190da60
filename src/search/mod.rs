pub mod filter;
pub mod types;

pub use filter::{
    count_by_category, filter, filter_admin, filter_users, owned_by, sort, ListingStats,
};
pub use types::{AdminPropertyQuery, SearchCriteria, SortOrder, UserQuery};
