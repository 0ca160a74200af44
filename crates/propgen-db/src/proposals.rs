//! Database operations for the `proposals` table and its number sequence.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Summary row from `proposals`. The stored content and raw research JSON
/// are not loaded by list or detail queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProposalRow {
    pub id: i64,
    pub public_id: Uuid,
    pub proposal_number: String,
    pub customer_id: i64,
    pub package_tier: String,
    pub proposal_mode: String,
    pub template_style: String,
    pub output_format: String,
    pub document_url: String,
    pub filename: String,
    pub model: String,
    pub total_tokens: i64,
    pub total_cost: Decimal,
    pub duration_ms: i64,
    pub created_at: DateTime<Utc>,
}

/// Everything persisted for one successful generation run.
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub proposal_number: String,
    pub customer_id: i64,
    pub package_tier: String,
    pub proposal_mode: String,
    pub template_style: String,
    pub output_format: String,
    pub document_url: String,
    pub filename: String,
    pub model: String,
    pub total_tokens: i64,
    pub total_cost: Decimal,
    pub duration_ms: i64,
    /// Research exactly as the research stage produced it, kept for audit.
    pub raw_research: Option<serde_json::Value>,
    pub content: serde_json::Value,
}

const PROPOSAL_COLUMNS: &str = "id, public_id, proposal_number, customer_id, package_tier, \
     proposal_mode, template_style, output_format, document_url, filename, model, total_tokens, \
     total_cost, duration_ms, created_at";

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

/// `PROP-{year}-{sequence}` with the sequence zero-padded to five digits.
#[must_use]
pub fn format_proposal_number(year: i32, sequence: i64) -> String {
    format!("PROP-{year}-{sequence:05}")
}

/// Draws the next proposal number from `proposal_number_seq`.
///
/// Sequence values are never reused, so numbers from failed runs leave gaps.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the sequence cannot be read.
pub async fn next_proposal_number(pool: &PgPool, year: i32) -> Result<String, DbError> {
    let sequence: i64 = sqlx::query_scalar("SELECT nextval('proposal_number_seq')")
        .fetch_one(pool)
        .await?;
    Ok(format_proposal_number(year, sequence))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a proposal row and returns its summary.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (unknown customer, duplicate
/// number, or a check constraint).
pub async fn insert_proposal(pool: &PgPool, proposal: &NewProposal) -> Result<ProposalRow, DbError> {
    let row = sqlx::query_as::<_, ProposalRow>(&format!(
        "INSERT INTO proposals (public_id, proposal_number, customer_id, package_tier, proposal_mode, \
                                template_style, output_format, document_url, filename, model, \
                                total_tokens, total_cost, duration_ms, raw_research, content) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING {PROPOSAL_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&proposal.proposal_number)
    .bind(proposal.customer_id)
    .bind(&proposal.package_tier)
    .bind(&proposal.proposal_mode)
    .bind(&proposal.template_style)
    .bind(&proposal.output_format)
    .bind(&proposal.document_url)
    .bind(&proposal.filename)
    .bind(&proposal.model)
    .bind(proposal.total_tokens)
    .bind(proposal.total_cost)
    .bind(proposal.duration_ms)
    .bind(&proposal.raw_research)
    .bind(&proposal.content)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Most recent proposals first, optionally for one customer.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_proposals(
    pool: &PgPool,
    customer_id: Option<i64>,
    limit: i64,
) -> Result<Vec<ProposalRow>, DbError> {
    let rows = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {PROPOSAL_COLUMNS} FROM proposals \
         WHERE ($1::BIGINT IS NULL OR customer_id = $1) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(customer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one proposal by its public number, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_proposal_by_number(
    pool: &PgPool,
    proposal_number: &str,
) -> Result<Option<ProposalRow>, DbError> {
    let row = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE proposal_number = $1"
    ))
    .bind(proposal_number)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_numbers_are_zero_padded() {
        assert_eq!(format_proposal_number(2026, 42), "PROP-2026-00042");
        assert_eq!(format_proposal_number(2026, 123_456), "PROP-2026-123456");
    }
}
