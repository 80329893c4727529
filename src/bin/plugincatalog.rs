use std::net::SocketAddr;

use tracing::{info, Level};

use plugincatalog_core::{http, Catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let catalog = Catalog::from_env();
    catalog.migrate()?;
    catalog.seed()?;

    let addr: SocketAddr = std::env::var("CATALOG_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("catalog starting at http://{}", addr);

    http::serve(catalog, addr).await?;

    Ok(())
}
