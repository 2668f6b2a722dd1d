use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::GrantRecord;
use crate::classification::{normalize_org_name, ClassificationEngine, ClassificationResult};
use crate::taxonomy::OrgType;

/// Largest batch accepted by the synchronous batch endpoint.
pub const MAX_BATCH: usize = 1_000;

/// Router exposing the classification engine over HTTP.
pub fn classification_router(engine: Arc<ClassificationEngine>) -> Router {
    Router::new()
        .route("/api/v1/grants/classify", post(classify_handler))
        .route("/api/v1/grants/classify/batch", post(batch_handler))
        .route("/api/v1/grants/evidence", post(evidence_handler))
        .route("/api/v1/organizations/classify", post(organization_handler))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub grants: Vec<GrantRecord>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total: usize,
    pub flagged: usize,
    pub results: Vec<ClassificationResult>,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationRequest {
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub activity_code: String,
}

fn rejected(message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

fn missing_id(record: &GrantRecord) -> bool {
    record.application_id.trim().is_empty()
}

pub(crate) async fn classify_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(record): Json<GrantRecord>,
) -> Response {
    if missing_id(&record) {
        return rejected("application_id is required");
    }
    let result = engine.classify_grant(&record);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn batch_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(request): Json<BatchRequest>,
) -> Response {
    if request.grants.len() > MAX_BATCH {
        return rejected(format!(
            "batch of {} grants exceeds the limit of {MAX_BATCH}",
            request.grants.len()
        ));
    }
    if let Some(position) = request.grants.iter().position(missing_id) {
        return rejected(format!("grant at index {position} has no application_id"));
    }

    let results = engine.classify_all(&request.grants);
    let response = BatchResponse {
        total: results.len(),
        flagged: results.iter().filter(|result| result.needs_review).count(),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn evidence_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(record): Json<GrantRecord>,
) -> Response {
    if missing_id(&record) {
        return rejected("application_id is required");
    }
    let org_type = engine.classify_organization(record.org_name.as_deref(), &record.code());
    let assessment = engine.assess_biotools_evidence(&record, org_type);
    let payload = json!({
        "application_id": record.application_id,
        "org_type": org_type,
        "evidence": assessment,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn organization_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(request): Json<OrganizationRequest>,
) -> Response {
    let code = request.activity_code.trim().to_ascii_uppercase();
    let org_type: OrgType = engine.classify_organization(request.org_name.as_deref(), &code);
    let payload = json!({
        "org_type": org_type,
        "normalized_name": request
            .org_name
            .as_deref()
            .map(|name| normalize_org_name(name).trim().to_string()),
    });
    (StatusCode::OK, Json(payload)).into_response()
}
