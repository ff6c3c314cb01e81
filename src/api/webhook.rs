// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use tracing::{debug, info, instrument, warn, Instrument};

use crate::error::ApiError;
use crate::models::{WebhookAck, DELIVERY_HEADER, EVENT_HEADER};
use crate::setup::{Acceptance, WebhookDelivery};
use crate::signature::SIGNATURE_HEADER;
use crate::state::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Receive a GitHub webhook delivery.
///
/// Authentic `repository.created` deliveries start a setup run in the
/// background and are acknowledged immediately; the outcome of the run is
/// only visible in the logs. Other authentic deliveries are acknowledged and
/// ignored.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "Webhook",
    params(
        ("X-GitHub-Event" = String, Header, description = "Event type, only `repository` is handled"),
        ("X-Hub-Signature-256" = Option<String>, Header, description = "`sha256=` HMAC of the raw body"),
        ("X-GitHub-Delivery" = Option<String>, Header, description = "Delivery id, used for log correlation")
    ),
    request_body(content = String, description = "Raw webhook payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Delivery accepted or ignored", body = WebhookAck),
        (status = 400, description = "Malformed repository event", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid or missing signature", body = crate::error::ErrorBody)
    )
)]
#[instrument(
    name = "github.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        delivery = tracing::field::Empty,
    )
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let event = header(&headers, EVENT_HEADER);
    let delivery = header(&headers, DELIVERY_HEADER).unwrap_or("unknown");

    let span = tracing::Span::current();
    span.record("event", event.unwrap_or_default());
    span.record("delivery", delivery);

    let acceptance = state.orchestrator.accept(WebhookDelivery {
        body: &body,
        event,
        signature: header(&headers, SIGNATURE_HEADER),
    });

    let repo = match acceptance {
        Ok(Acceptance::Accepted(repo)) => repo,
        Ok(Acceptance::Ignored(reason)) => {
            debug!(%reason, "Ignoring delivery");
            return Ok(Json(WebhookAck::ignored(reason)));
        }
        Ok(Acceptance::Rejected) => {
            return Err(ApiError::unauthorized("invalid webhook signature"));
        }
        Err(e) => {
            warn!(error = %e, "Rejecting malformed repository event");
            return Err(e.into());
        }
    };

    info!(repository = %repo, installation_id = repo.installation_id, "Scheduling repository setup");

    let orchestrator = state.orchestrator.clone();
    state.tasks.spawn(
        async move {
            orchestrator.run(repo).await;
        }
        .in_current_span(),
    );

    Ok(Json(WebhookAck::processing()))
}
