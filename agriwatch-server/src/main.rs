use anyhow::Result;
use tracing::info;

use agriwatch_adapters::{ClassifierClient, FirebaseSource};
use agriwatch_server::{config::ServerConfig, router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::load()?;

    let mut reader = FirebaseSource::builder().database_url(config.database_url.as_str());
    if let Some(token) = &config.database_auth {
        reader = reader.auth_token(token.as_str());
    }
    let reader = reader.build();

    let classifier = ClassifierClient::builder()
        .endpoint(config.disease_api_url.as_str())
        .build();

    info!("reading snapshots from {}", reader.description());
    info!("forwarding predictions to {}", classifier.endpoint());

    let app = router(AppState { reader, classifier });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
