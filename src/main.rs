//! Record Linker demo
//!
//! Runs each record operation once against an in-memory store and logs the
//! outcome.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use record_linker::{
    AccountUpdate, Contact, InMemoryRecordStore, LinkerConfig, RecordOperations,
};

/// Default configuration path
const DEFAULT_CONFIG_PATH: &str = "config/record_linker.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "record_linker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("RECORD_LINKER_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        tracing::info!(path = %config_path, "Loading configuration");
        LinkerConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?
    } else {
        tracing::warn!(path = %config_path, "Config file not found, using defaults");
        LinkerConfig::default()
    };

    let ops = RecordOperations::new(InMemoryRecordStore::new(), config);

    ops.insert_account("Jane")
        .await
        .context("Single insert failed")?;

    let update = AccountUpdate {
        rating: Some("Hot".to_string()),
        ..Default::default()
    };
    ops.update_account_by_name("Jane", &update)
        .await
        .context("Update by name failed")?;

    let names = vec!["Renewal".to_string(), "Upsell".to_string()];
    let summary = ops
        .upsert_opportunities(&names)
        .await
        .context("Opportunity upsert failed")?;
    tracing::info!(
        summary = %serde_json::to_string(&summary)?,
        "Opportunity upsert summary"
    );

    let deleted = ops
        .bulk_insert_then_delete(&["Temp 1".to_string(), "Temp 2".to_string()])
        .await
        .context("Bulk insert-then-delete failed")?;
    tracing::info!(deleted, "Bulk cycle complete");

    let contacts = vec![
        Contact::new("John", "Doe"),
        Contact::new("Mary", "Jane"),
        Contact::new("Rick", "Doe"),
    ];
    let outcome = ops
        .link_contacts_to_accounts(contacts)
        .await
        .context("Contact linking failed")?;
    tracing::info!(
        report = %serde_json::to_string(&outcome.report)?,
        "Contact linking report"
    );

    Ok(())
}
