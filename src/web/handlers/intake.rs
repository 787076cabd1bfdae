//! Mail intake handler.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::intake::{IntakeService, MessageFields};
use crate::web::dto::{Payload, SendMailRequest};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::Outcome;

/// POST /:list - Submit a message for distribution.
pub async fn send_mail(
    State(state): State<Arc<AppState>>,
    Path(list): Path<String>,
    Payload(req): Payload<SendMailRequest>,
) -> Result<Json<Outcome>, ApiError> {
    let fields = MessageFields::from(req);
    let outcome = IntakeService::new(state.engine.as_ref())
        .submit(&list, &fields)
        .await?;
    Ok(Json(outcome))
}
