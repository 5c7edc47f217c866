//! Handler for short link redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Friendly page for ids with no link.
///
/// Renders `templates/404.html`.
#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
struct NotFoundTemplate {
    id: String,
}

/// Redirects a short id to its stored location.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Responses
///
/// - **308 Permanent Redirect** with `Location` set to the stored destination
/// - **404 Not Found** when no link exists; the HTML page is rendered only if
///   the delivery was configured with the not-found template
/// - **500 Internal Server Error** for any other failure, with no body
pub async fn redirect_handler(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    let link = match state.link_api.get_link_by_id(&id).await {
        Ok(link) => link,
        Err(AppError::NotFound { .. }) if state.not_found_template => {
            debug!(id = %id, "Link not found, rendering template");
            return (StatusCode::NOT_FOUND, NotFoundTemplate { id }).into_response();
        }
        Err(e) => return e.into_response(),
    };

    // Locations are stored unvalidated, so they may not be legal header values.
    let Ok(location) = HeaderValue::from_str(&link.location) else {
        return AppError::invalid(
            "location",
            format!("link '{}' has a location that is not a valid header value", link.id),
        )
        .into_response();
    };

    debug!(id = %link.id, location = %link.location, "Redirecting");
    (StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response()
}
