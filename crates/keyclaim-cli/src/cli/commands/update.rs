//! `keyclaim update` - claim a subdomain and update its address.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::args::UpdateArgs;
use keyclaim_client::{daemon, keyfile, UpdateClient};
use keyclaim_core::validate_name;

pub async fn execute(args: UpdateArgs) -> Result<()> {
    // Pre-flight: the server applies the same rule authoritatively.
    validate_name(&args.name)?;

    let credential = keyfile::load_or_generate(&args.key)
        .with_context(|| format!("failed to load key file {}", args.key.display()))?;

    let client = UpdateClient::new(&args.url);

    if args.daemon {
        let interval = Duration::from_secs(args.interval_mins * 60);
        daemon::run(&client, &credential, &args.name, interval).await
    } else {
        let body = client.send(&credential, &args.name).await?;
        println!("{body}");
        Ok(())
    }
}
