//! Demo catalogue for local runs and tests.

use crate::models::{
    AccountStatus, Category, ListingStatus, Property, Role, User, VerificationRequest,
    VerificationStatus,
};
use crate::sources::memory::MemoryStore;
use chrono::NaiveDate;
use tracing::info;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    category: Category,
    price: u64,
    location: &str,
    (bedrooms, bathrooms): (u32, u32),
    area: f64,
    (verified, featured): (bool, bool),
    owner_id: &str,
    posted_on: NaiveDate,
) -> Property {
    Property {
        id: id.to_string(),
        title: title.to_string(),
        category,
        price,
        location: location.to_string(),
        bedrooms,
        bathrooms,
        area,
        verified,
        featured,
        status: ListingStatus::Active,
        owner_id: owner_id.to_string(),
        posted_on,
        views: 0,
        inquiries: 0,
    }
}

/// Bangalore listings used by the browse page
pub fn properties() -> Vec<Property> {
    let mut properties = vec![
        listing(
            "1",
            "Modern 3BHK Apartment with Garden View",
            Category::Rent,
            25_000,
            "Koramangala, Bangalore",
            (3, 2),
            1200.0,
            (true, true),
            "1",
            date(2023, 6, 1),
        ),
        listing(
            "2",
            "Luxury 2BHK Flat Near Metro",
            Category::Rent,
            18_000,
            "HSR Layout, Bangalore",
            (2, 2),
            950.0,
            (true, false),
            "2",
            date(2023, 5, 28),
        ),
        listing(
            "3",
            "Spacious PG with AC Rooms",
            Category::Pg,
            8_500,
            "BTM Layout, Bangalore",
            (1, 1),
            250.0,
            (true, true),
            "1",
            date(2023, 5, 25),
        ),
        listing(
            "4",
            "Commercial Office Space in Business Park",
            Category::Commercial,
            45_000,
            "Whitefield, Bangalore",
            (0, 2),
            1800.0,
            (true, true),
            "3",
            date(2023, 5, 20),
        ),
        listing(
            "5",
            "1BHK Flat for Rent in Gated Community",
            Category::Rent,
            12_000,
            "Electronic City, Bangalore",
            (1, 1),
            650.0,
            (false, false),
            "5",
            date(2023, 5, 15),
        ),
        listing(
            "6",
            "Shared Room in 3BHK Apartment",
            Category::Sharing,
            7_000,
            "Indiranagar, Bangalore",
            (1, 2),
            300.0,
            (true, false),
            "3",
            date(2023, 5, 10),
        ),
        listing(
            "7",
            "Fully Furnished Studio Apartment",
            Category::Rent,
            15_000,
            "JP Nagar, Bangalore",
            (1, 1),
            500.0,
            (true, false),
            "2",
            date(2023, 5, 5),
        ),
        listing(
            "8",
            "Premium PG for Women with Meals",
            Category::Pg,
            11_000,
            "Marathahalli, Bangalore",
            (1, 1),
            200.0,
            (true, false),
            "3",
            date(2023, 5, 1),
        ),
    ];

    properties[1].status = ListingStatus::Pending;
    properties[4].status = ListingStatus::Inactive;
    properties[0].views = 245;
    properties[0].inquiries = 12;
    properties[2].views = 178;
    properties[2].inquiries = 8;
    properties
}

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, role: Role, status: AccountStatus, joined| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        joined_on: joined,
    };

    vec![
        user("1", "Rahul Sharma", "rahul@example.com", Role::Owner, AccountStatus::Active, date(2023, 1, 15)),
        user("2", "Priya Patel", "priya@example.com", Role::Owner, AccountStatus::Active, date(2023, 2, 20)),
        user("3", "Amit Kumar", "amit@example.com", Role::Agent, AccountStatus::Active, date(2022, 11, 5)),
        user("4", "Sneha Reddy", "sneha@example.com", Role::Tenant, AccountStatus::Active, date(2023, 3, 10)),
        user("5", "Deepak Verma", "deepak@example.com", Role::Owner, AccountStatus::Suspended, date(2023, 1, 25)),
        user("6", "Site Admin", "admin@example.com", Role::Admin, AccountStatus::Active, date(2022, 10, 1)),
    ]
}

pub fn verification_requests() -> Vec<VerificationRequest> {
    let request = |id: &str, property_id: &str, requested_on, status, reason: Option<&str>| {
        VerificationRequest {
            id: id.to_string(),
            property_id: property_id.to_string(),
            requested_on,
            status,
            rejection_reason: reason.map(str::to_string),
            documents: vec![
                format!("documents/{}/ownership.pdf", property_id),
                format!("documents/{}/id-proof.pdf", property_id),
            ],
        }
    };

    vec![
        request("1", "5", date(2023, 6, 5), VerificationStatus::Pending, None),
        request("2", "2", date(2023, 6, 3), VerificationStatus::Pending, None),
        request("3", "1", date(2023, 5, 28), VerificationStatus::Approved, None),
        request(
            "4",
            "6",
            date(2023, 5, 25),
            VerificationStatus::Rejected,
            Some("Documents unclear"),
        ),
    ]
}

/// Store pre-populated with the demo catalogue
pub fn store() -> MemoryStore {
    let store = MemoryStore::with_data(properties(), users(), verification_requests());
    info!(
        "📋 Seeded {} listings, {} users, {} verification requests",
        store.properties().len(),
        store.users().len(),
        store.verifications().len()
    );
    store
}
