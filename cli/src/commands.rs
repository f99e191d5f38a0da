use std::path::{Path, PathBuf};

use aegis_audit::{AuditEncryptor, CiphertextRecord, ProofInputs, PublicKeyArtifact, PublicKeyCache};
use aegis_config::AegisConfig;
use aegis_privacy::{CommitmentScheme, Keypair, NullifierKey};
use aegis_ring::parse_numeral;
use aegis_threshold::{KeyShare, RlweKeyPair, ShareArtifact, split_secret_key, threshold_decrypt};
use anyhow::{Context, Result, bail};
use num_bigint::BigUint;
use rand::rngs::OsRng;

use crate::io;

/// Identity keypair from a decimal or `0x` seed
pub fn parse_seed(text: &str) -> Result<Keypair> {
    let seed = parse_numeral(text)
        .with_context(|| format!("Invalid seed: {text:?}"))?
        .to_biguint()
        .with_context(|| format!("Seed must be non-negative: {text:?}"))?;
    Ok(Keypair::generate(&seed))
}

fn identity_commitment(keypair: &Keypair) -> BigUint {
    let commitment = CommitmentScheme::new().identity_commitment(keypair.public_key());
    BigUint::from_bytes_le(commitment.as_bytes())
}

pub fn keygen(seed: &str, leaf: Option<u64>) -> Result<()> {
    let keypair = parse_seed(seed)?;
    let (x, y) = keypair.public_key().to_biguints();

    println!("🔐 Identity keypair");
    println!("   Secret key:          {}", keypair.secret_key_biguint());
    println!("   Public key x:        {x}");
    println!("   Public key y:        {y}");
    println!("   Identity commitment: {}", identity_commitment(&keypair));

    if let Some(leaf) = leaf {
        let nullifier = NullifierKey::new(&keypair).derive_nullifier(leaf);
        println!(
            "   Nullifier (leaf {leaf}): {}",
            BigUint::from_bytes_le(nullifier.as_bytes())
        );
    }

    Ok(())
}

/// Deal a fresh auditor key into `out`.
///
/// Refuses to touch a directory holding an earlier deal unless `force` is set;
/// with `force` the old public key and every old share file are replaced.
pub async fn deal(threshold: usize, total: usize, out: &Path, force: bool) -> Result<()> {
    let existing = io::existing_deal_files(out).await?;
    if !existing.is_empty() && !force {
        bail!(
            "{} already holds a dealt key ({} files), use --force to replace it",
            out.display(),
            existing.len()
        );
    }

    let mut rng = OsRng;
    let keypair = RlweKeyPair::generate(&mut rng);
    let shares = split_secret_key(keypair.secret(), threshold, total, &mut rng)
        .context("Failed to split auditor secret")?;

    let public = PublicKeyArtifact::from_rings(keypair.a(), keypair.b());
    let public_path = out.join(io::PUBLIC_KEY_FILE);
    let mut outputs = vec![io::Output::public(
        public_path.clone(),
        serde_json::to_string_pretty(&public)?,
    )];
    for share in &shares {
        let path = out.join(io::share_file_name(share.share_index));
        outputs.push(io::Output::secret(path, share.to_json()?));
    }

    // shares from a wider earlier deal would otherwise mix into the quorum
    for stale in existing.iter().filter(|p| !outputs.iter().any(|o| &o.path == *p)) {
        log::info!("removing stale share {}", stale.display());
        tokio::fs::remove_file(stale)
            .await
            .with_context(|| format!("Failed to remove {}", stale.display()))?;
    }
    io::write_outputs(&outputs).await?;

    println!("✅ Dealt a {threshold}-of-{total} auditor key");
    println!("   Public key: {}", public_path.display());
    println!("   Shares:     {}", out.display());
    Ok(())
}

pub async fn encrypt(seed: &str, public_key: &Path, out: &Path) -> Result<()> {
    let keypair = parse_seed(seed)?;
    let artifact = io::load_public_key(public_key).await?;

    let cache = PublicKeyCache::new();
    let encryptor = AuditEncryptor::from_cache(&cache, &artifact)?;

    let (x, y) = keypair.public_key().to_biguints();
    let encryption = encryptor.encrypt(&x, &y, &mut OsRng)?;

    let inputs = ProofInputs::new(
        &keypair.secret_key_biguint(),
        &identity_commitment(&keypair),
        &encryption,
    );
    let record = CiphertextRecord::from_encryption(&encryption);
    let prover_path = out.join(io::PROVER_INPUTS_FILE);
    let ciphertext_path = out.join(io::CIPHERTEXT_FILE);
    io::write_outputs(&[
        io::Output::secret(prover_path.clone(), inputs.to_toml()?),
        io::Output::public(ciphertext_path.clone(), record.to_json()?),
    ])
    .await?;

    println!("✅ Encrypted identity to the auditor key");
    println!("   Proof inputs: {}", prover_path.display());
    println!("   Ciphertext:   {}", ciphertext_path.display());
    Ok(())
}

pub async fn decrypt(ciphertext: &Path, shares: &[PathBuf]) -> Result<()> {
    let (record, artifacts) =
        tokio::try_join!(io::load_ciphertext(ciphertext), io::load_shares(shares))?;

    let ciphertext = record.to_ciphertext()?;
    let shares = key_shares(&artifacts)?;
    let (x, y) = threshold_decrypt(&shares, &ciphertext)?;

    println!("🔓 Recovered identity");
    println!("   Owner x: {x}");
    println!("   Owner y: {y}");
    Ok(())
}

pub async fn roundtrip(seed: &str, public_key: &Path, shares: &[PathBuf]) -> Result<()> {
    let keypair = parse_seed(seed)?;
    let (artifact, share_artifacts) =
        tokio::try_join!(io::load_public_key(public_key), io::load_shares(shares))?;

    let cache = PublicKeyCache::new();
    let encryptor = AuditEncryptor::from_cache(&cache, &artifact)?;
    let (x, y) = keypair.public_key().to_biguints();
    let ciphertext = encryptor.encrypt(&x, &y, &mut OsRng)?.into_ciphertext();

    let shares = key_shares(&share_artifacts)?;
    let (dx, dy) = threshold_decrypt(&shares, &ciphertext)?;

    if dx != x || dy != y {
        bail!("Round trip mismatch: decrypted identity differs from the encrypted one");
    }

    println!("✅ Round trip OK with {} shares", shares.len());
    println!("   Owner x: {x}");
    println!("   Owner y: {y}");
    Ok(())
}

/// Explicit share files, or every share in the configured share directory
pub async fn resolve_share_paths(
    explicit: Vec<PathBuf>,
    config: &AegisConfig,
) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    let found = io::find_share_files(&config.threshold.share_dir).await?;
    if found.is_empty() {
        bail!(
            "No share files given and none found in {}",
            config.threshold.share_dir.display()
        );
    }
    log::info!(
        "using {} shares from {}",
        found.len(),
        config.threshold.share_dir.display()
    );
    Ok(found)
}

fn key_shares(artifacts: &[ShareArtifact]) -> Result<Vec<KeyShare>> {
    artifacts
        .iter()
        .map(|a| {
            KeyShare::from_artifact(a)
                .with_context(|| format!("Invalid share {}", a.share_index))
        })
        .collect()
}
