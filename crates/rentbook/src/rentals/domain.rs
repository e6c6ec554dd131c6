use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for tenancy contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenancyId(pub String);

impl fmt::Display for TenancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for payment records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub String);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPurpose {
    ForSale,
    ForRent,
}

impl PropertyPurpose {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ForSale => "For Sale",
            Self::ForRent => "For Rent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    House,
    Apartment,
    Studio,
    RuralProperty,
    Land,
}

impl PropertyKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::House,
            Self::Apartment,
            Self::Studio,
            Self::RuralProperty,
            Self::Land,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Studio => "Studio",
            Self::RuralProperty => "Rural Property",
            Self::Land => "Land",
        }
    }
}

/// A listed property. Only the price matching `purpose` is meaningful; the
/// other one defaults to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    pub purpose: PropertyPurpose,
    pub owner: String,
    pub kind: PropertyKind,
    pub sale_price: u32,
    pub rental_price: u32,
}

impl Property {
    /// The price that applies to the property's listed purpose.
    pub fn active_price(&self) -> u32 {
        match self.purpose {
            PropertyPurpose::ForSale => self.sale_price,
            PropertyPurpose::ForRent => self.rental_price,
        }
    }
}

/// Caller-supplied property fields; the service assigns the identifier and
/// zeroes the price that does not match the purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub address: String,
    pub purpose: PropertyPurpose,
    pub owner: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub sale_price: u32,
    #[serde(default)]
    pub rental_price: u32,
}

/// A lease contract. `end_date` unset means the tenancy is active; setting it
/// is the only way the property becomes available again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenancy {
    pub id: TenancyId,
    pub name: String,
    pub property_id: PropertyId,
    /// Day of month the rent falls due (1-31).
    pub due_day: u8,
    /// Snapshot of the property's rental price at contract start. Later price
    /// changes never touch this or any existing payment record.
    pub monthly_rent: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Tenancy {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Tenant details captured by the onboarding form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Day of month the rent falls due; defaults to [`DEFAULT_DUE_DAY`].
    #[serde(default)]
    pub due_day: Option<u8>,
}

/// Due day applied when onboarding omits one.
pub const DEFAULT_DUE_DAY: u8 = 10;

/// Structured calendar-month key for a payment record. Matching is exact
/// `(month, year)` equality; human-readable labels are derived output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub month: u32,
    pub year: i32,
}

impl BillingPeriod {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("Unknown");
        format!("{} {}", name, self.year)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

/// One rent installment for one billing period. Never deleted; the only
/// mutation is the Unpaid -> Paid transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub tenancy_id: TenancyId,
    pub property_id: PropertyId,
    pub amount: u32,
    pub period: BillingPeriod,
    pub status: PaymentStatus,
    /// Set exactly when `status` is `Paid`.
    pub payment_date: Option<NaiveDate>,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// Payment standing of a tenancy for one calendar month. `NoRecord` is
/// rendered as unpaid but kept distinct so callers can tell a missing record
/// from an unpaid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPaymentStatus {
    NoRecord,
    Unpaid,
    Paid,
}

impl PeriodPaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoRecord => "No Record",
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

/// Listing filters applied by the properties page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub purpose: Option<PropertyPurpose>,
    #[serde(default)]
    pub kind: Option<PropertyKind>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let hit = property.address.to_lowercase().contains(&query)
                || property.owner.to_lowercase().contains(&query)
                || property.kind.label().to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }
        if let Some(purpose) = self.purpose {
            if property.purpose != purpose {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if property.kind != kind {
                return false;
            }
        }
        true
    }
}

/// Validation failures raised by the occupancy/payment engine. All are local,
/// recoverable errors surfaced to the caller; none are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RentalError {
    #[error("property {0} is not listed for rent")]
    NotForRent(PropertyId),
    #[error("property {0} already has an active tenancy")]
    PropertyOccupied(PropertyId),
    #[error("tenancy {0} already ended on {1}")]
    AlreadyEnded(TenancyId, NaiveDate),
    #[error("due day {0} is outside 1-31")]
    InvalidDueDay(u8),
}
