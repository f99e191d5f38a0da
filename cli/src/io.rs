//! Artifact I/O
//!
//! Everything that touches the filesystem lives here, so the library crates
//! stay synchronous and pure.

use std::path::{Path, PathBuf};

use aegis_audit::{AuditError, CiphertextRecord, PublicKeyArtifact};
use aegis_threshold::ShareArtifact;
use anyhow::{Context, Result};
use tokio::fs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub const PUBLIC_KEY_FILE: &str = "public_key.json";
pub const PROVER_INPUTS_FILE: &str = "Prover.toml";
pub const CIPHERTEXT_FILE: &str = "ciphertext.json";

pub fn share_file_name(index: u64) -> String {
    format!("share_{index}.json")
}

/// A read failure surfaces as [`AuditError::KeyUnavailable`] so callers can retry
pub async fn load_public_key(path: &Path) -> Result<PublicKeyArtifact> {
    let json = fs::read_to_string(path)
        .await
        .map_err(|e| AuditError::KeyUnavailable(format!("{}: {e}", path.display())))
        .with_context(|| format!("Failed to read public key: {}", path.display()))?;
    PublicKeyArtifact::from_json(&json)
        .with_context(|| format!("Failed to decode public key: {}", path.display()))
}

pub async fn load_shares(paths: &[PathBuf]) -> Result<Vec<ShareArtifact>> {
    let mut shares = Vec::with_capacity(paths.len());
    for path in paths {
        let json = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read share: {}", path.display()))?;
        let share = ShareArtifact::from_json(&json)
            .with_context(|| format!("Failed to decode share: {}", path.display()))?;
        shares.push(share);
    }
    log::debug!("loaded {} share files", shares.len());
    Ok(shares)
}

pub async fn load_ciphertext(path: &Path) -> Result<CiphertextRecord> {
    let json = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read ciphertext: {}", path.display()))?;
    CiphertextRecord::from_json(&json)
        .with_context(|| format!("Failed to decode ciphertext: {}", path.display()))
}

/// `share_<i>.json` files in `dir`, ordered by file name
pub async fn find_share_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list share directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("share_") && name.ends_with(".json") {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write a file only its owner can read
pub async fn write_secret_file(path: &Path, contents: &str) -> Result<()> {
    write_file(path, contents).await?;

    #[cfg(unix)]
    {
        // chmod 600 (rw-------)
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .with_context(|| format!("Failed to restrict permissions: {}", path.display()))?;
    }

    Ok(())
}

/// One file of a command's output set
pub struct Output {
    pub path: PathBuf,
    pub contents: String,
    pub secret: bool,
}

impl Output {
    pub fn public(path: PathBuf, contents: String) -> Self {
        Self {
            path,
            contents,
            secret: false,
        }
    }

    pub fn secret(path: PathBuf, contents: String) -> Self {
        Self {
            path,
            contents,
            secret: true,
        }
    }
}

/// Write every output or none of them.
///
/// Each file is first written to a hidden sibling, then all are renamed into
/// place. A failure while staging removes whatever was staged so far.
pub async fn write_outputs(outputs: &[Output]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());

    for output in outputs {
        let tmp = staging_path(&output.path)?;
        let written = if output.secret {
            write_secret_file(&tmp, &output.contents).await
        } else {
            write_file(&tmp, &output.contents).await
        };
        staged.push((tmp, &output.path));
        if let Err(err) = written {
            discard(&staged).await;
            return Err(err);
        }
    }

    for (i, (tmp, dest)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(tmp, dest).await {
            discard(&staged[i..]).await;
            return Err(err).with_context(|| format!("Failed to write {}", dest.display()));
        }
    }
    Ok(())
}

fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

async fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        if let Err(err) = fs::remove_file(tmp).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove {}: {err}", tmp.display());
            }
        }
    }
}

/// Public key and share files a previous deal left in `dir`
pub async fn existing_deal_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let exists = fs::try_exists(dir)
        .await
        .with_context(|| format!("Failed to inspect {}", dir.display()))?;
    if !exists {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    let public_key = dir.join(PUBLIC_KEY_FILE);
    if fs::try_exists(&public_key).await? {
        found.push(public_key);
    }
    found.extend(find_share_files(dir).await?);
    Ok(found)
}
