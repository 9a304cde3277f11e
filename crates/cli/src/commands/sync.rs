//! Remote document store round-trips: publish and fetch.

use secrecy::SecretString;

use vitrine_kiosk::docstore::DocStoreClient as FetchClient;

use super::open_config_store;
use vitrine_admin::docstore::DocStoreClient as PublishClient;

/// Publish the store document to the hosted document store.
pub async fn publish() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_store) = open_config_store()?;
    let document = config_store.load();

    let doc_id = document.publication.remote_doc_id.clone();
    let write_secret = SecretString::from(document.publication.write_secret.clone());

    let client = PublishClient::new(&config.docstore_base_url)?;
    client.publish(&document, &doc_id, &write_secret).await?;

    tracing::info!(doc_id, "store document published");
    Ok(())
}

/// Fetch the latest published revision and report its shape.
pub async fn fetch(doc_id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_store) = open_config_store()?;

    let doc_id = match doc_id {
        Some(id) => id,
        None => {
            let document = config_store.load();
            let id = document.publication.remote_doc_id;
            if id.trim().is_empty() {
                return Err("no document id configured; pass --doc-id".into());
            }
            id
        }
    };

    let client = FetchClient::new(&config.docstore_base_url)?;
    let document = client.fetch_latest(&doc_id).await?;

    tracing::info!(
        doc_id,
        store = %document.operations.store_name,
        status = %document.operations.status,
        categories = document.categories.len(),
        products = document.products.len(),
        coverage_areas = document.coverage_areas.len(),
        "fetched the latest published revision"
    );
    Ok(())
}
