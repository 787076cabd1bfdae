//! Membership handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::members::MemberService;
use crate::web::dto::{MemberRequest, Payload};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::Outcome;

/// GET /:list/members - Member addresses.
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let members = MemberService::new(state.engine.as_ref())
        .members(&list)
        .await?;
    Ok(Json(members))
}

/// PUT /:list/members - Subscribe an address.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
    Payload(req): Payload<MemberRequest>,
) -> Result<Json<Outcome>, ApiError> {
    let address = req.address();
    let outcome = MemberService::new(state.engine.as_ref())
        .subscribe(&list, address.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// DELETE /:list/members - Unsubscribe an address.
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
    Payload(req): Payload<MemberRequest>,
) -> Result<Json<Outcome>, ApiError> {
    let address = req.address();
    let outcome = MemberService::new(state.engine.as_ref())
        .unsubscribe(&list, address.as_deref())
        .await?;
    Ok(Json(outcome))
}
