use anyhow::Result;
use snapgraph::config::AppConfig;
use snapgraph::logging::init_tracing;
use snapgraph::server::ServerBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    // First argument: optional YAML config file
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default(),
    }
    .with_env_overrides();

    init_tracing(&config.server.log_level);

    let bind = config.server.bind.clone();
    let builder = ServerBuilder::new().with_config(config.clone());

    #[cfg(feature = "postgres")]
    let builder = match &config.database.url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url).await?;
            snapgraph::storage::postgres::ensure_schema(&pool).await?;
            tracing::info!("Using PostgreSQL storage");
            builder.with_backend(snapgraph::storage::PostgresStore::new(pool))
        }
        None => {
            tracing::info!("No database url configured, using in-memory storage");
            builder.with_backend(snapgraph::storage::InMemoryStore::new())
        }
    };

    #[cfg(not(feature = "postgres"))]
    let builder = {
        tracing::info!("Using in-memory storage");
        builder.with_backend(snapgraph::storage::InMemoryStore::new())
    };

    builder.serve(&bind).await
}
