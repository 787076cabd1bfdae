//! List handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::lists::ListService;
use crate::web::dto::{CreateListRequest, ListResponse, Payload};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::Outcome;

/// GET / - Summaries of every list except the site list.
pub async fn list_lists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListResponse>>, ApiError> {
    let service = ListService::new(state.engine.as_ref(), &state.settings);
    let lists = service.list_all().await?;

    Ok(Json(
        lists
            .iter()
            .map(|list| ListResponse::from_list(list, &state.settings))
            .collect(),
    ))
}

/// GET /:list - Single-element array with the list's summary.
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
) -> Result<Json<Vec<ListResponse>>, ApiError> {
    let service = ListService::new(state.engine.as_ref(), &state.settings);
    let list = service.describe(&list).await?;

    Ok(Json(vec![ListResponse::from_list(&list, &state.settings)]))
}

/// PUT /:list - Create a list.
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
    Payload(req): Payload<CreateListRequest>,
) -> Result<Json<Outcome>, ApiError> {
    let service = ListService::new(state.engine.as_ref(), &state.settings);
    let outcome = service.create(&req.into_create_list(&list)).await?;

    Ok(Json(outcome))
}
