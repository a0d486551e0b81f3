use chainkg_rs::{GraphDriver, Ingestor, LoaderConfig, Neo4jDriver, RecordStore, SchemaCatalog};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chainkg_rs=info".parse()?)
                .add_directive("chainkg_loader=info".parse()?),
        )
        .json()
        .init();

    info!("chainkg-loader starting");

    // ── Config ────────────────────────────────────────────────────────────────
    let config = LoaderConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        uri = %config.neo4j_uri,
        data_dir = %config.data_dir.display(),
        policy = ?config.ingestion.duplicate_policy,
        verify_endpoints = config.ingestion.verify_endpoints,
        "configuration loaded"
    );

    // ── Store ─────────────────────────────────────────────────────────────────
    let driver = Neo4jDriver::connect(
        config.neo4j_uri.as_str(),
        config.neo4j_user.as_str(),
        config.neo4j_password.as_str(),
    )
    .await?;
    driver.ping().await?;

    // ── Run ───────────────────────────────────────────────────────────────────
    let store = RecordStore::new(&config.data_dir);
    let ingestor = Ingestor::new(driver, SchemaCatalog::standard(), config.ingestion);
    let result = ingestor.run(&store).await;
    ingestor.driver().close().await?;

    let report = result.map_err(|e| {
        error!("Ingestion aborted: {}", e);
        e
    })?;

    for batch in &report.batches {
        info!(
            batch = %batch.name,
            total = batch.total,
            created = batch.created(),
            skipped = batch.skipped(),
            unresolved = batch.unresolved(),
            failed = batch.failed(),
            "batch summary"
        );
    }

    info!(run_id = %report.run_id, "chainkg-loader finished");
    Ok(())
}
