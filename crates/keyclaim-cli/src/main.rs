//! keyclaim - claim a subdomain with a key, keep its address current.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    keyclaim_cli::run().await
}
