use std::{fs, io};

use engine::{MemoryDirectory, MemoryStore, PayeeRecord, ResolvedPayee};
use serde::Deserialize;

/// Initial content of the in-memory backend.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub payees: Vec<PayeeRecord>,
    pub directory: Vec<ResolvedPayee>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed seed file: {0}")]
    Json(#[from] serde_json::Error),
}

impl Seed {
    /// A missing file is an empty seed.
    pub fn load(path: &str) -> Result<Self, SeedError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("seed file {path} not found, starting empty");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn into_backend(self) -> (MemoryStore, MemoryDirectory) {
        tracing::debug!(
            "seeding {} payees and {} PayIDs",
            self.payees.len(),
            self.directory.len()
        );
        (
            MemoryStore::with_payees(self.payees),
            MemoryDirectory::with_entries(self.directory),
        )
    }
}
