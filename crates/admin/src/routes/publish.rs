//! Publication, export, and import routes.
//!
//! Publishing saves locally first, then replaces the whole remote
//! document. A second publish while one is in flight is refused. Import
//! wholesale-replaces the working document after an explicit confirmation;
//! there is no partial merge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use secrecy::SecretString;
use tracing::instrument;

use crate::docstore::PublishError;
use crate::error::AppError;
use crate::services::ConfigStore;
use crate::state::AppState;

use super::{NoticeParams, redirect_error, redirect_success};

/// Backup page template (export download and import upload).
#[derive(Template, WebTemplate)]
#[template(path = "backup/index.html")]
pub struct BackupTemplate {
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Build the publish/backup router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publish", post(publish))
        .route("/backup", get(backup_page))
        .route("/export", get(export))
        .route("/import", post(import))
}

/// Display the backup page.
#[instrument]
async fn backup_page(Query(params): Query<NoticeParams>) -> BackupTemplate {
    BackupTemplate {
        success_message: params.success,
        error_message: params.error,
    }
}

/// Save locally, then replace the whole remote document.
#[instrument(skip(state))]
async fn publish(State(state): State<AppState>) -> Redirect {
    if !state.begin_publish() {
        return redirect_error("/", "Publicação já em andamento. Aguarde.");
    }

    let result = run_publish(&state).await;
    state.end_publish();

    match result {
        Ok(()) => redirect_success("/", "Publicado com sucesso!"),
        Err(PublishError::MissingCredentials) => redirect_error(
            "/",
            "Documento remoto e chave de escrita são obrigatórios para publicar.",
        ),
        Err(PublishError::Rejected { status, message }) => {
            redirect_error("/", &format!("Erro {status}: {message}"))
        }
        Err(PublishError::Http(e)) => {
            tracing::error!("publish failed: {e}");
            redirect_error("/", "Erro de conexão com o serviço de publicação.")
        }
    }
}

async fn run_publish(state: &AppState) -> Result<(), PublishError> {
    // Local save first: the admin's work survives a failed publish
    if let Err(e) = state.persist().await {
        tracing::error!("pre-publish local save failed: {e}");
    }

    let (document, doc_id, write_secret) = {
        let document = state.document().read().await;
        (
            document.clone(),
            document.publication.remote_doc_id.clone(),
            SecretString::from(document.publication.write_secret.clone()),
        )
    };

    state
        .docstore()
        .publish(&document, &doc_id, &write_secret)
        .await
}

/// Download the working document as a dated JSON file.
#[instrument(skip(state))]
async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let document = state.document().read().await;
    let body = document
        .export_snapshot()
        .map_err(|e| AppError::Internal(format!("export serialization failed: {e}")))?;

    let file_name = ConfigStore::export_file_name(Utc::now());
    let disposition = format!("attachment; filename=\"{file_name}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Upload a snapshot and wholesale-replace the working document.
#[instrument(skip(state, multipart))]
async fn import(State(state): State<AppState>, mut multipart: Multipart) -> Redirect {
    let mut file_text: Option<String> = None;
    let mut confirmed = false;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => file_text = field.text().await.ok(),
            Some("confirm") => confirmed = true,
            _ => {}
        }
    }

    if !confirmed {
        return redirect_error("/backup", "Confirme a substituição dos dados da loja.");
    }
    let Some(text) = file_text else {
        return redirect_error("/backup", "Selecione um arquivo de backup.");
    };

    let imported = match ConfigStore::import(&text) {
        Ok(imported) => imported,
        Err(e) => {
            tracing::warn!("import refused: {e}");
            return redirect_error("/backup", "Arquivo de backup inválido ou incompleto.");
        }
    };

    {
        let mut document = state.document().write().await;
        *document = imported;
    }

    match state.persist().await {
        Ok(()) => redirect_success("/backup", "Dados importados com sucesso."),
        Err(e) => {
            tracing::error!("failed to persist imported document: {e}");
            redirect_error("/backup", "Importado, mas houve erro ao salvar localmente.")
        }
    }
}
