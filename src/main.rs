use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lead_intake::{api, config, db};

fn main() -> Result<()> {
    let cfg = config::load()?;

    // RUST_LOG wins over the configured level when set.
    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))?;
    if !cfg.logging.access_log {
        filter = filter.add_directive("tower_http=off".parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting lead intake v{}", env!("CARGO_PKG_VERSION"));

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime.worker_threads(workers);
    }

    runtime.build()?.block_on(async {
        let db_pool = db::init(&cfg).await?;
        info!("Database initialized");

        api::serve(cfg, db_pool).await
    })
}
