//! Payee storage backends.
//!
//! [`PayeeStore`] is the contract every backend fulfils. [`MemoryStore`]
//! keeps the records in process and filters them with the
//! [matcher](crate::matcher); remote backends live outside the engine.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{PayeeRecord, StoreError, matcher};

type ResultStore<T> = Result<T, StoreError>;

/// Source of raw payee records.
pub trait PayeeStore: Send + Sync {
    /// Every stored record, in no particular order.
    fn list_all(&self) -> impl Future<Output = ResultStore<Vec<PayeeRecord>>> + Send;

    /// Records matching an already sanitized, non-empty query.
    fn search(&self, query: &str) -> impl Future<Output = ResultStore<Vec<PayeeRecord>>> + Send;

    /// Append a record whose id has already been assigned.
    fn add(&self, payee: PayeeRecord) -> impl Future<Output = ResultStore<PayeeRecord>> + Send;
}

/// In-process store, cheap to clone. Clones share the same records.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    payees: Arc<Mutex<Vec<PayeeRecord>>>,
    latency: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payees(payees: Vec<PayeeRecord>) -> Self {
        Self {
            payees: Arc::new(Mutex::new(payees)),
            latency: Duration::ZERO,
        }
    }

    /// Delay every store call, to mimic a slow backend in demos.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the whole record set.
    pub async fn replace_all(&self, payees: Vec<PayeeRecord>) {
        *self.payees.lock().await = payees;
    }

    /// Remove every record.
    pub async fn clear(&self) {
        self.payees.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.payees.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payees.lock().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl PayeeStore for MemoryStore {
    async fn list_all(&self) -> ResultStore<Vec<PayeeRecord>> {
        self.simulate_latency().await;
        Ok(self.payees.lock().await.clone())
    }

    async fn search(&self, query: &str) -> ResultStore<Vec<PayeeRecord>> {
        self.simulate_latency().await;
        let payees = self.payees.lock().await;
        Ok(payees
            .iter()
            .filter(|payee| matcher::matches(payee, query))
            .cloned()
            .collect())
    }

    async fn add(&self, payee: PayeeRecord) -> ResultStore<PayeeRecord> {
        self.simulate_latency().await;
        let mut payees = self.payees.lock().await;
        if payees.iter().any(|existing| existing.id == payee.id) {
            return Err(StoreError::DuplicateId(payee.id));
        }
        payees.push(payee.clone());
        Ok(payee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PayIdKind;

    fn record(id: &str, name: &str, pay_id: &str, kind: PayIdKind) -> PayeeRecord {
        PayeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            nickname: None,
            pay_id: pay_id.to_string(),
            kind,
        }
    }

    #[tokio::test]
    async fn add_then_list_returns_record() {
        let store = MemoryStore::new();
        let stored = store
            .add(record("1", "Alice", "alice@x.com", PayIdKind::Email))
            .await
            .unwrap();
        assert_eq!(stored.id, "1");
        assert_eq!(store.list_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::with_payees(vec![record("1", "Alice", "a@x.com", PayIdKind::Email)]);
        let err = store
            .add(record("1", "Bob", "b@x.com", PayIdKind::Email))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("1".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn search_filters_with_matcher() {
        let store = MemoryStore::with_payees(vec![
            record("1", "Alice", "a@x.com", PayIdKind::Email),
            record("2", "Bob", "0412345678", PayIdKind::Mobile),
        ]);
        let found = store.search("0412 345").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Bob");
    }

    #[tokio::test]
    async fn clones_share_records_and_admin_ops_apply() {
        let store = MemoryStore::new();
        let other = store.clone();
        other
            .replace_all(vec![
                record("1", "Alice", "a@x.com", PayIdKind::Email),
                record("2", "Bob", "b@x.com", PayIdKind::Email),
            ])
            .await;
        assert_eq!(store.len().await, 2);

        store.clear().await;
        assert!(other.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_calls() {
        let store = MemoryStore::new().latency(Duration::from_millis(800));
        let started = tokio::time::Instant::now();
        store.list_all().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
