//! Read access to the `customers` table.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use propgen_core::{ConversionOverrides, PackageTier, ResearchRequest};

use crate::DbError;

const DEFAULT_LOCATION: &str = "United Kingdom";

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A row from the `customers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub public_id: Uuid,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub sdr_notes: Option<String>,
    pub average_deal_value: Option<Decimal>,
    pub profit_per_deal: Option<Decimal>,
    /// Lead → customer rate as a fraction.
    pub conversion_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRow {
    /// Research input for this customer at the requested tier. Blank
    /// free-text fields fall back to generic values the industry mapping and
    /// search agent both accept.
    #[must_use]
    pub fn research_request(&self, tier: PackageTier) -> ResearchRequest {
        ResearchRequest {
            company_name: self.company_name.trim().to_string(),
            website: non_blank(self.website.as_deref()),
            industry: non_blank(self.industry.as_deref()).unwrap_or_default(),
            location: non_blank(self.location.as_deref())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            tier,
        }
    }

    /// Record-level figures that replace the projection defaults.
    #[must_use]
    pub fn conversion_overrides(&self) -> ConversionOverrides {
        let whole_pounds = |d: Option<Decimal>| {
            d.and_then(|v| {
                v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u64()
            })
            .filter(|v| *v > 0)
        };
        ConversionOverrides {
            average_deal_value: whole_pounds(self.average_deal_value),
            profit_per_deal: whole_pounds(self.profit_per_deal),
            lead_to_customer_rate: self.conversion_rate.and_then(|r| r.to_f64()),
        }
    }

    /// Average deal value in whole pounds, when recorded.
    #[must_use]
    pub fn deal_value(&self) -> Option<u64> {
        self.conversion_overrides().average_deal_value
    }
}

/// Fields for a new customer record; used by seeding and tests.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer<'a> {
    pub company_name: &'a str,
    pub website: Option<&'a str>,
    pub industry: Option<&'a str>,
    pub location: Option<&'a str>,
    pub sdr_notes: Option<&'a str>,
    pub average_deal_value: Option<Decimal>,
}

const CUSTOMER_COLUMNS: &str = "id, public_id, company_name, contact_name, email, website, industry, \
     location, sdr_notes, average_deal_value, profit_per_deal, conversion_rate, created_at, updated_at";

/// Returns a single non-deleted customer by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] when no live customer has this id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_customer(pool: &PgPool, id: i64) -> Result<CustomerRow, DbError> {
    sqlx::query_as::<_, CustomerRow>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Inserts a customer and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_customer(pool: &PgPool, customer: &NewCustomer<'_>) -> Result<CustomerRow, DbError> {
    let row = sqlx::query_as::<_, CustomerRow>(&format!(
        "INSERT INTO customers (public_id, company_name, website, industry, location, sdr_notes, average_deal_value) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {CUSTOMER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(customer.company_name)
    .bind(customer.website)
    .bind(customer.industry)
    .bind(customer.location)
    .bind(customer.sdr_notes)
    .bind(customer.average_deal_value)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
