//! In-process PayID directory used as the resolver of the mock backend.

use std::collections::HashMap;

use crate::{
    PayIdKind, PayIdResolver, ResolvedPayee, Resolution, ResolverError,
    validation::normalize_pay_id,
};

#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    entries: HashMap<(PayIdKind, String), ResolvedPayee>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = ResolvedPayee>) -> Self {
        let mut directory = Self::new();
        for entry in entries {
            directory.insert(entry);
        }
        directory
    }

    /// Register a PayID. An existing entry for the same PayID is replaced.
    pub fn insert(&mut self, entry: ResolvedPayee) {
        let key = (entry.kind, lookup_key(&entry.pay_id, entry.kind));
        self.entries.insert(key, entry);
    }

    pub fn lookup(&self, pay_id: &str, kind: PayIdKind) -> Option<&ResolvedPayee> {
        self.entries.get(&(kind, lookup_key(pay_id, kind)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(pay_id: &str, kind: PayIdKind) -> String {
    let normalized = normalize_pay_id(pay_id, kind);
    match kind {
        PayIdKind::Email => normalized.to_lowercase(),
        PayIdKind::Mobile | PayIdKind::Abn => normalized,
    }
}

impl PayIdResolver for MemoryDirectory {
    async fn resolve(&self, pay_id: &str, kind: PayIdKind) -> Result<Resolution, ResolverError> {
        Ok(self
            .lookup(pay_id, kind)
            .cloned()
            .map_or(Resolution::NotFound, Resolution::Found))
    }
}
