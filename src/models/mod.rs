use crate::error::MarketError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rent,
    Pg,
    Sharing,
    Commercial,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Rent,
        Category::Pg,
        Category::Sharing,
        Category::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rent => "rent",
            Category::Pg => "pg",
            Category::Sharing => "sharing",
            Category::Commercial => "commercial",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rent" => Ok(Category::Rent),
            "pg" => Ok(Category::Pg),
            "sharing" => Ok(Category::Sharing),
            "commercial" => Ok(Category::Commercial),
            other => Err(MarketError::Validation(format!(
                "unknown property category '{}'",
                other
            ))),
        }
    }
}

/// Moderation state of a listing. Only admins move a listing between states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Pending,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ListingStatus::Active),
            "pending" => Ok(ListingStatus::Pending),
            "inactive" => Ok(ListingStatus::Inactive),
            other => Err(MarketError::Validation(format!(
                "unknown listing status '{}'",
                other
            ))),
        }
    }
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub price: u64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Floor area in sq.ft
    pub area: f64,
    pub verified: bool,
    pub featured: bool,
    pub status: ListingStatus,
    /// Weak reference to the owning `User::id`
    pub owner_id: String,
    pub posted_on: NaiveDate,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub inquiries: u64,
}

/// Marketplace role. Fixed at account creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Owner,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Owner => "owner",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tenant" => Ok(Role::Tenant),
            "owner" => Ok(Role::Owner),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            _ => Err(MarketError::InvalidRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl FromStr for AccountStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(MarketError::Validation(format!(
                "unknown account status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub joined_on: NaiveDate,
}

impl User {
    pub fn is_suspended(&self) -> bool {
        self.status == AccountStatus::Suspended
    }
}

/// Fields supplied at sign-up, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// An owner's request to have a listing marked as verified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationRequest {
    pub id: String,
    pub property_id: String,
    pub requested_on: NaiveDate,
    pub status: VerificationStatus,
    pub rejection_reason: Option<String>,
    pub documents: Vec<String>,
}

/// Contact form sent to a listing's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl Inquiry {
    pub const DEFAULT_MESSAGE: &'static str =
        "I'm interested in this property. Please contact me with more information.";

    /// Every field is required and the email must look like one.
    pub fn validate(&self) -> Result<(), MarketError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(MarketError::Validation(format!("{} is required", field)));
            }
        }
        if !self.email.contains('@') {
            return Err(MarketError::Validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}
