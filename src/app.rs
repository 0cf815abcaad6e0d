/*
 * Responsibility
 * - Config load → Mongo bootstrap → dependency build → Router assembly
 * - middleware application (HTTP plumbing + CORS)
 * - axum::serve() startup
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{
    api, config::Config, middleware, repos::post_repo::MongoPostsRepo,
    services::uploads::UploadStorage, state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;
    let db = client.database(&config.mongodb_db);

    let state = AppState::new(
        Arc::new(MongoPostsRepo::new(&db)),
        UploadStorage::new(&config.upload_dir),
    );

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
