//! `keyclaim serve` - run the claim-and-update server.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cli::args::ServeArgs;
use keyclaim_server::monitor::LogReporter;
use keyclaim_server::store::{MemoryStore, RecordStore};
use keyclaim_server::{server, AppState, ServerConfig};

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = match (&args.config, &args.domain) {
        (Some(path), _) => ServerConfig::load(path)?,
        (None, Some(domain)) => ServerConfig::new(domain),
        (None, None) => bail!("either --config or --domain is required"),
    };
    if let Some(domain) = args.domain {
        config.domain = domain;
    }
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    config.validate()?;

    // Composition root: in-memory store and log reporter; a real DNS
    // backend plugs in behind the RecordStore trait.
    let store = Arc::new(MemoryStore::new()) as Arc<dyn RecordStore>;
    let reporter = Arc::new(LogReporter::new());
    let state = Arc::new(AppState::new(config, store, reporter));

    server::run(state).await?;
    Ok(())
}
