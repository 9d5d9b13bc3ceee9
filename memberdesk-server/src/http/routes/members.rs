//! Member endpoints
//!
//! - POST /members: validate, then insert
//! - GET /members/{id}: one record
//! - GET /list: every record

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::MemberId;
use crate::http::server::AppState;
use crate::models::{Member, MemberSubmission};

/// Create response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Member as returned to clients, dates in ISO-8601 text
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub name: String,
    pub dob: String,
    pub age: i32,
    pub date_of_joining: String,
    pub height: f64,
    pub weight: f64,
    pub occupation: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub looking_for: String,
    pub membership_mode: String,
    pub end_of_membership: String,
    pub physical_problems: String,
    #[serde(rename = "physicalDescription")]
    pub physical_description: Option<String>,
    pub fractures: String,
    #[serde(rename = "fractureDescription")]
    pub fracture_description: Option<String>,
    pub agreed_to_terms: bool,
    pub photo: Option<String>,
    pub submitted_at: String,
}

impl From<Member> for MemberResponse {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            dob: m.dob.format("%Y-%m-%d").to_string(),
            age: m.age,
            date_of_joining: m.date_of_joining.format("%Y-%m-%d").to_string(),
            height: m.height,
            weight: m.weight,
            occupation: m.occupation,
            address: m.address,
            email: m.email,
            phone: m.phone,
            alternate_phone: m.alternate_phone,
            looking_for: m.looking_for,
            membership_mode: m.membership_mode,
            end_of_membership: m.end_of_membership.format("%Y-%m-%d").to_string(),
            physical_problems: m.physical_problems,
            physical_description: m.physical_description,
            fractures: m.fractures,
            fracture_description: m.fracture_description,
            agreed_to_terms: m.agreed_to_terms,
            photo: m.photo,
            submitted_at: m.submitted_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// POST /members - validate and store a submission
///
/// The body is parsed as JSON whatever its content type.
async fn create_member(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let payload: Value = serde_json::from_slice(&body)?;
    let submission = MemberSubmission::from_json(&payload)?;

    let id = state.store.insert(submission).await?;
    tracing::info!(id, "Member created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /members/{id} - get a single member
async fn get_member(
    State(state): State<Arc<AppState>>,
    MemberId(id): MemberId,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = state.store.get(id).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// GET /list - list all members
async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.store.list().await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// Member routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", post(create_member))
        .route("/members/{id}", get(get_member))
        .route("/list", get(list_members))
}
