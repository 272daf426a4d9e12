//! Payee address-book engine.
//!
//! [`PayeeBook`] is the entry point: it composes a [`PayeeStore`] backend,
//! the display [formatter](format) and the PayID [validator](validation)
//! behind the operations the UI consumes.

use chrono::Utc;
use uuid::Uuid;

pub use directory::MemoryDirectory;
pub use error::{EngineError, ResolverError, StoreError};
pub use flow::{AddPayeeFlow, FlowError, FlowState};
pub use payee::{DisplayRecord, NewPayee, PayIdKind, PayeeRecord};
pub use search::LiveSearch;
pub use store::{MemoryStore, PayeeStore};
pub use validation::{
    PayIdResolver, PayIdStatus, Resolution, ResolvedPayee, ValidationError, ValidationOutcome,
};

mod directory;
mod error;
mod flow;
pub mod format;
pub mod matcher;
mod payee;
pub mod search;
mod store;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;

const ID_SUFFIX_LEN: usize = 9;

/// The address book as seen by the UI.
///
/// Owns one store and one PayID resolver; several independent books can
/// coexist, each with its own backend.
#[derive(Debug)]
pub struct PayeeBook<S, R> {
    store: S,
    resolver: R,
}

impl<S, R> PayeeBook<S, R>
where
    S: PayeeStore,
    R: PayIdResolver,
{
    pub fn new(store: S, resolver: R) -> Self {
        Self { store, resolver }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Every payee, sorted by name and formatted for display.
    pub async fn all_payees(&self) -> ResultEngine<Vec<DisplayRecord>> {
        let payees = self.store.list_all().await.map_err(|err| {
            tracing::error!("error fetching payees: {err}");
            EngineError::LoadFailed(err)
        })?;
        Ok(format::format_payees(payees))
    }

    /// Payees matching `query`, sorted and formatted like [`Self::all_payees`].
    ///
    /// Queries shorter than [`search::MIN_SEARCH_LENGTH`] give an empty
    /// result without touching the store.
    pub async fn search_payees(&self, query: &str) -> ResultEngine<Vec<DisplayRecord>> {
        let Some(query) = search::check_query(query)? else {
            return Ok(Vec::new());
        };

        let payees = self.store.search(&query).await.map_err(|err| {
            tracing::error!("error searching payees: {err}");
            EngineError::SearchFailed(err)
        })?;
        Ok(format::format_payees(payees))
    }

    /// Assign an id to `payee` and store it.
    pub async fn add_payee(&self, payee: NewPayee) -> ResultEngine<PayeeRecord> {
        if payee.name.trim().is_empty() {
            return Err(EngineError::InvalidPayee("name is required".to_string()));
        }
        validation::check_format(&payee.pay_id, payee.kind)
            .map_err(|err| EngineError::InvalidPayee(err.message.to_string()))?;

        let record = payee.into_record(generate_payee_id());
        self.store.add(record).await.map_err(|err| {
            tracing::error!("error adding payee: {err}");
            EngineError::AddFailed(err)
        })
    }

    /// Syntax check plus one lookup against the resolver.
    pub async fn validate_pay_id(&self, pay_id: &str, kind: PayIdKind) -> ValidationOutcome {
        validation::validate_pay_id(&self.resolver, pay_id, kind).await
    }
}

/// `payee_<unix millis>_<random suffix>`.
///
/// Not cryptographically unique, collisions are negligible at address-book
/// scale.
pub fn generate_payee_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "payee_{}_{}",
        Utc::now().timestamp_millis(),
        &suffix[..ID_SUFFIX_LEN]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_have_expected_shape_and_differ() {
        let a = generate_payee_id();
        let b = generate_payee_id();
        assert_ne!(a, b);

        let parts: Vec<_> = a.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "payee");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].chars().all(|ch| ch.is_ascii_alphanumeric()));
    }
}
