//! Bounded cache of the last import.
//!
//! Only the first [`CACHE_LIMIT`] processed users are kept, together with the
//! import time and the full user count. A new import overwrites the cache.

use crate::directory::types::ProcessedUser;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Maximum number of users persisted.
pub const CACHE_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedImport {
    pub saved_at: DateTime<Utc>,
    /// Users in the import, including those not cached.
    pub total_users: usize,
    pub users: Vec<ProcessedUser>,
}

/// Persist a sample of the current dataset, replacing any previous cache.
///
/// Returns the number of users written.
pub fn store(path: impl AsRef<Path>, users: &[ProcessedUser], now: DateTime<Utc>) -> Result<usize> {
    let path = path.as_ref();
    let cached = CachedImport {
        saved_at: now,
        total_users: users.len(),
        users: users.iter().take(CACHE_LIMIT).cloned().collect(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create cache file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &cached)
        .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
    writer.flush()?;

    debug!(path = %path.display(), users = cached.users.len(), "Stored last import");
    Ok(cached.users.len())
}

/// Load the cached import.
pub fn load(path: impl AsRef<Path>) -> Result<CachedImport> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open cache file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse cache file: {}", path.display()))
}
