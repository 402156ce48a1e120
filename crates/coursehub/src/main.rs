use anyhow::Context;
use coursehub::{config::Config, server::Server};
use coursehub_db::Database;
use std::sync::Arc;

static DEFAULT_LOG_FILTER: &str = "coursehub=info,actix_web=info";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let config = Config::from_env()?;
    let database = Database::connect(&config.mongodb_uri, &config.mongodb_database)
        .await
        .context("connecting to MongoDB")?;

    Server::start(config, Arc::new(database))?.await?;
    Ok(())
}
