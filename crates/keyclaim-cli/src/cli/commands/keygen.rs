//! `keyclaim keygen` - create the credential file and print the public key.

use anyhow::{Context, Result};

use crate::cli::args::KeygenArgs;
use keyclaim_client::keyfile;

pub fn execute(args: &KeygenArgs) -> Result<()> {
    let existed = args.key.exists();
    let credential = keyfile::load_or_generate(&args.key)
        .with_context(|| format!("failed to load key file {}", args.key.display()))?;

    if existed {
        println!("Existing key at {}", args.key.display());
    } else {
        println!("New key written to {}", args.key.display());
    }
    println!("Public key: {}", credential.public_key_encoded());
    Ok(())
}
