//! Admin route handlers.

pub mod catalog;
pub mod coverage;
pub mod publish;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(settings::router())
        .merge(catalog::router())
        .merge(coverage::router())
        .merge(publish::router())
}

/// Query parameters carrying a transient notice across a redirect.
#[derive(Debug, serde::Deserialize)]
pub struct NoticeParams {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Redirect to `path` with a success notice.
pub(crate) fn redirect_success(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Redirect to `path` with an error notice.
pub(crate) fn redirect_error(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Persist the working document, downgrading failures to a notice.
pub(crate) async fn persist_and_redirect(
    state: &AppState,
    path: &str,
    success: &str,
) -> axum::response::Redirect {
    match state.persist().await {
        Ok(()) => redirect_success(path, success),
        Err(e) => {
            tracing::error!("failed to persist the store document: {e}");
            redirect_error(path, "Erro ao salvar os dados localmente.")
        }
    }
}
