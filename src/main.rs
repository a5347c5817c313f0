use anyhow::Context;
use rmcp::{ServiceExt, transport::stdio};
use symbol_search::{Config, MemoryCorpus, Snapshot, SymbolServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with MCP traffic on stdout
    symbol_search::tracing::init(tracing::Level::INFO);

    let config = Config::load().context("Failed to load configuration")?;

    let corpus = match &config.corpus {
        Some(path) => MemoryCorpus::load(path)
            .await
            .with_context(|| format!("Failed to load corpus snapshot {}", path.display()))?,
        None => {
            tracing::warn!("No corpus configured; serving an empty corpus");
            MemoryCorpus::from_snapshot(Snapshot::default())?
        }
    };

    tracing::info!(
        "Starting symbol-search MCP server ({} packages, {} symbol rows)",
        corpus.package_count(),
        corpus.row_count()
    );

    let server = SymbolServer::new(corpus, &config);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
