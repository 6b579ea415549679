//! Credential persistence.
//!
//! The credential is created once and reused forever: if the key file
//! exists it is always loaded, never regenerated, since losing the key
//! means losing every name claimed with it.

use std::path::Path;

use tracing::info;

use keyclaim_core::{Credential, Result};

/// Load the credential from `path`, generating and persisting a fresh one
/// if no file exists yet.
///
/// A file that exists but fails to decode is an error, not a trigger for
/// regeneration.
pub fn load_or_generate(path: &Path) -> Result<Credential> {
    if path.exists() {
        let text = std::fs::read_to_string(path)?;
        return Credential::from_encoded(&text);
    }

    let credential = Credential::generate()?;
    write_key_file(path, &credential.to_encoded())?;
    info!(path = %path.display(), "generated new credential");
    Ok(credential)
}

#[cfg(unix)]
fn write_key_file(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(not(unix))]
fn write_key_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyclaim_core::UpdateError;

    #[test]
    fn test_generates_then_reloads_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyclaim.key");

        let first = load_or_generate(&path).unwrap();
        assert!(path.exists());

        let second = load_or_generate(&path).unwrap();
        assert_eq!(first.public_key_encoded(), second.public_key_encoded());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyclaim.key");
        std::fs::write(&path, "definitely not a key").unwrap();

        assert!(matches!(
            load_or_generate(&path),
            Err(UpdateError::KeyDecode(_))
        ));
        // File left alone.
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "definitely not a key"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyclaim.key");
        load_or_generate(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
