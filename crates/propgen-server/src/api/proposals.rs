use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProposalItem {
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

impl From<propgen_db::ProposalRow> for ProposalItem {
    fn from(row: propgen_db::ProposalRow) -> Self {
        Self {
            proposal_number: row.proposal_number,
            customer_id: row.customer_id,
            package_tier: row.package_tier,
            proposal_mode: row.proposal_mode,
            template_style: row.template_style,
            output_format: row.output_format,
            document_url: row.document_url,
            filename: row.filename,
            model: row.model,
            total_tokens: row.total_tokens,
            total_cost: row.total_cost,
            duration_ms: row.duration_ms,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProposalQuery {
    pub customer_id: Option<i64>,
    pub limit: Option<i64>,
}

pub(super) async fn list_proposals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProposalQuery>,
) -> Result<Json<ApiResponse<Vec<ProposalItem>>>, ApiError> {
    let rows = propgen_db::list_proposals(
        &state.pool,
        query.customer_id,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ProposalItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_proposal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(number): Path<String>,
) -> Result<Json<ApiResponse<ProposalItem>>, ApiError> {
    let row = propgen_db::get_proposal_by_number(&state.pool, &number)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("proposal {number} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
