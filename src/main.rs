use std::env;
use std::sync::Arc;

use recipebook_client::config::Config;
use recipebook_client::navigator::NullNavigator;
use recipebook_client::storage::FileStorage;
use recipebook_client::{RecipeClient, SessionHandle, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Smoke check against a live API: restore or establish a session, then make
/// one authorized call to prove the pipeline works end to end.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("using API at {}", config.base_url);

    let storage = Arc::new(FileStorage::open(&config.session_file));
    let session = SessionHandle::new(storage);
    let client = RecipeClient::new(
        config.base_url.clone(),
        session.clone(),
        Arc::new(NullNavigator),
    );
    let store = SessionStore::new(session, client.clone());

    store.bootstrap();

    if !store.snapshot().is_authenticated() {
        let email = env::var("RECIPEBOOK_EMAIL").unwrap_or_default();
        let password = env::var("RECIPEBOOK_PASSWORD").unwrap_or_default();

        tracing::info!("no stored session, logging in...");
        if let Err(e) = store.login(&email, &password).await {
            tracing::error!("Login failed: {}", e);
            tracing::error!("Please verify:");
            tracing::error!("  - RECIPEBOOK_API_URL is correct: {}", config.base_url);
            tracing::error!("  - RECIPEBOOK_EMAIL and RECIPEBOOK_PASSWORD are set and correct");
            tracing::error!("  - The API server is running and accessible");
            std::process::exit(1);
        }
    }

    let snapshot = store.snapshot();
    tracing::info!(
        "session ready (user {})",
        snapshot.user_id.as_deref().unwrap_or("unknown")
    );

    // Prove the authorized pipeline works with a real call
    match client.get_profile().await {
        Ok(profile) => tracing::info!("logged in as {} <{}>", profile.name, profile.email),
        Err(e) => tracing::warn!("profile check failed: {}", e),
    }

    let recipes = client.list_recipes(None).await?;
    tracing::info!("API access verified: {} recipes visible", recipes.len());

    Ok(())
}
