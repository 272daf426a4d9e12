//! The add-payee interaction as an explicit state machine.
//!
//! ```text
//! EnteringPayId --begin_validation--> Validating
//! Validating --finish_validation(valid)--> Confirming
//! Validating --finish_validation(invalid)--> EnteringPayId { error }
//! Confirming --begin_submit--> Submitting | --back--> EnteringPayId | --reset--> EnteringPayId
//! Submitting --finish_submit(ok)--> Done
//! Submitting --finish_submit(err)--> Confirming { submission_error }
//! ```
//!
//! Editing the PayID or switching its kind returns to `EnteringPayId` from any
//! state and drops the previous validation outcome.

use thiserror::Error;

use crate::{
    EngineError, NewPayee, PayIdKind, PayIdResolver, PayeeBook, PayeeRecord, PayeeStore,
    ValidationOutcome,
};

/// Errors shown inline in the add-payee form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Payee name is required")]
    NameRequired,
    #[error("PayID is required")]
    PayIdRequired,
    #[error("{0}")]
    Validation(String),
    #[error("Please validate PayID first")]
    NotValidated,
    #[error("Please confirm the payee details")]
    NotConfirmed,
    #[error("Failed to add payee")]
    Submission,
    #[error("action not allowed while {0}")]
    InvalidState(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    EnteringPayId { error: Option<FlowError> },
    Validating,
    Confirming {
        confirmed: bool,
        submission_error: Option<FlowError>,
    },
    Submitting,
    Done(PayeeRecord),
}

impl FlowState {
    fn name(&self) -> &'static str {
        match self {
            FlowState::EnteringPayId { .. } => "entering PayID",
            FlowState::Validating => "validating",
            FlowState::Confirming { .. } => "confirming",
            FlowState::Submitting => "submitting",
            FlowState::Done(_) => "done",
        }
    }
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::EnteringPayId { error: None }
    }
}

/// Form data and progress of a single add-payee interaction.
#[derive(Clone, Debug)]
pub struct AddPayeeFlow {
    name: String,
    nickname: String,
    pay_id: String,
    kind: PayIdKind,
    outcome: Option<ValidationOutcome>,
    state: FlowState,
}

impl Default for AddPayeeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddPayeeFlow {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            nickname: String::new(),
            pay_id: String::new(),
            kind: PayIdKind::Email,
            outcome: None,
            state: FlowState::default(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn outcome(&self) -> Option<&ValidationOutcome> {
        self.outcome.as_ref()
    }

    pub fn pay_id(&self) -> &str {
        &self.pay_id
    }

    pub fn kind(&self) -> PayIdKind {
        self.kind
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_nickname(&mut self, nickname: &str) {
        self.nickname = nickname.to_string();
    }

    pub fn set_pay_id(&mut self, pay_id: &str) {
        self.pay_id = pay_id.to_string();
        self.restart();
    }

    pub fn set_kind(&mut self, kind: PayIdKind) {
        self.kind = kind;
        self.restart();
    }

    fn restart(&mut self) {
        self.outcome = None;
        self.state = FlowState::default();
    }

    /// Check the form and move to `Validating`.
    ///
    /// Returns the PayID and kind the caller must validate.
    pub fn begin_validation(&mut self) -> Result<(String, PayIdKind), FlowError> {
        if !matches!(self.state, FlowState::EnteringPayId { .. }) {
            return Err(FlowError::InvalidState(self.state.name()));
        }
        let missing = if self.name.trim().is_empty() {
            Some(FlowError::NameRequired)
        } else if self.pay_id.trim().is_empty() {
            Some(FlowError::PayIdRequired)
        } else {
            None
        };
        if let Some(err) = missing {
            self.state = FlowState::EnteringPayId {
                error: Some(err.clone()),
            };
            return Err(err);
        }

        self.outcome = None;
        self.state = FlowState::Validating;
        Ok((self.pay_id.clone(), self.kind))
    }

    /// Apply a validation outcome.
    ///
    /// An outcome that arrives after the form was edited is ignored and
    /// `false` is returned.
    pub fn finish_validation(&mut self, outcome: ValidationOutcome) -> bool {
        if self.state != FlowState::Validating {
            return false;
        }
        self.state = if outcome.is_valid {
            FlowState::Confirming {
                confirmed: false,
                submission_error: None,
            }
        } else {
            let message = outcome
                .message()
                .unwrap_or_else(|| "PayID validation failed".to_string());
            FlowState::EnteringPayId {
                error: Some(FlowError::Validation(message)),
            }
        };
        self.outcome = Some(outcome);
        true
    }

    /// Tick or untick the explicit confirmation.
    pub fn confirm(&mut self, value: bool) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Confirming { confirmed, .. } => {
                *confirmed = value;
                Ok(())
            }
            other => Err(FlowError::InvalidState(other.name())),
        }
    }

    /// Leave confirmation to edit the PayID again.
    pub fn back(&mut self) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::Confirming { .. }) {
            return Err(FlowError::InvalidState(self.state.name()));
        }
        self.restart();
        Ok(())
    }

    /// Clear the whole form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Move to `Submitting` and return the payee to add.
    pub fn begin_submit(&mut self) -> Result<NewPayee, FlowError> {
        let confirmed = match &self.state {
            FlowState::Confirming { confirmed, .. } => *confirmed,
            FlowState::EnteringPayId { .. } => return Err(FlowError::NotValidated),
            other => return Err(FlowError::InvalidState(other.name())),
        };
        if !self.outcome.as_ref().is_some_and(|outcome| outcome.is_valid) {
            return Err(FlowError::NotValidated);
        }
        if !confirmed {
            return Err(FlowError::NotConfirmed);
        }

        self.state = FlowState::Submitting;
        let nickname = self.nickname.trim();
        Ok(NewPayee {
            name: self.name.trim().to_string(),
            nickname: (!nickname.is_empty()).then(|| nickname.to_string()),
            pay_id: self.pay_id.trim().to_string(),
            kind: self.kind,
        })
    }

    /// Apply the result of the add call. Failures keep the form data and
    /// the confirmation so the user can retry.
    pub fn finish_submit(
        &mut self,
        result: Result<PayeeRecord, EngineError>,
    ) -> Result<(), FlowError> {
        if self.state != FlowState::Submitting {
            return Err(FlowError::InvalidState(self.state.name()));
        }
        match result {
            Ok(payee) => {
                self.state = FlowState::Done(payee);
                Ok(())
            }
            Err(_) => {
                self.state = FlowState::Confirming {
                    confirmed: true,
                    submission_error: Some(FlowError::Submission),
                };
                Err(FlowError::Submission)
            }
        }
    }

    /// Run the validation round trip against `book`.
    pub async fn validate<S, R>(&mut self, book: &PayeeBook<S, R>) -> Result<(), FlowError>
    where
        S: PayeeStore,
        R: PayIdResolver,
    {
        let (pay_id, kind) = self.begin_validation()?;
        let outcome = book.validate_pay_id(&pay_id, kind).await;
        self.finish_validation(outcome);
        match &self.state {
            FlowState::EnteringPayId { error: Some(err) } => Err(err.clone()),
            _ => Ok(()),
        }
    }

    /// Run the submission round trip against `book`.
    pub async fn submit<S, R>(&mut self, book: &PayeeBook<S, R>) -> Result<PayeeRecord, FlowError>
    where
        S: PayeeStore,
        R: PayIdResolver,
    {
        let payee = self.begin_submit()?;
        let result = book.add_payee(payee).await;
        let stored = result.as_ref().ok().cloned();
        self.finish_submit(result)?;
        stored.ok_or(FlowError::Submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryDirectory, MemoryStore, PayIdStatus, ResolvedPayee, StoreError};

    fn book() -> PayeeBook<MemoryStore, MemoryDirectory> {
        let directory = MemoryDirectory::with_entries([
            ResolvedPayee {
                pay_id: "john@example.com".to_string(),
                kind: PayIdKind::Email,
                owner_name: "John Smith".to_string(),
                status: PayIdStatus::Active,
                npp_reachable: true,
            },
            ResolvedPayee {
                pay_id: "0412345678".to_string(),
                kind: PayIdKind::Mobile,
                owner_name: "Old Number".to_string(),
                status: PayIdStatus::Disabled,
                npp_reachable: true,
            },
        ]);
        PayeeBook::new(MemoryStore::new(), directory)
    }

    fn filled(pay_id: &str, kind: PayIdKind) -> AddPayeeFlow {
        let mut flow = AddPayeeFlow::new();
        flow.set_name("John Smith");
        flow.set_nickname(" Johnny ");
        flow.set_kind(kind);
        flow.set_pay_id(pay_id);
        flow
    }

    #[tokio::test]
    async fn happy_path_adds_payee() {
        let book = book();
        let mut flow = filled("john@example.com", PayIdKind::Email);

        flow.validate(&book).await.unwrap();
        assert_eq!(
            flow.state(),
            &FlowState::Confirming {
                confirmed: false,
                submission_error: None
            }
        );
        assert_eq!(flow.outcome().unwrap().payee.as_ref().unwrap().owner_name, "John Smith");

        assert_eq!(flow.submit(&book).await.unwrap_err(), FlowError::NotConfirmed);
        flow.confirm(true).unwrap();
        let stored = flow.submit(&book).await.unwrap();
        assert_eq!(stored.nickname.as_deref(), Some("Johnny"));
        assert!(matches!(flow.state(), FlowState::Done(_)));
        assert_eq!(book.store().len().await, 1);
    }

    #[tokio::test]
    async fn missing_fields_block_validation() {
        let mut flow = AddPayeeFlow::new();
        flow.set_pay_id("john@example.com");
        assert_eq!(flow.begin_validation(), Err(FlowError::NameRequired));

        flow.set_name("John");
        flow.set_pay_id("   ");
        assert_eq!(flow.begin_validation(), Err(FlowError::PayIdRequired));
        assert_eq!(
            flow.state(),
            &FlowState::EnteringPayId {
                error: Some(FlowError::PayIdRequired)
            }
        );
    }

    #[tokio::test]
    async fn failed_validation_stays_in_entry_with_error() {
        let book = book();
        let mut flow = filled("0412 345 678", PayIdKind::Mobile);

        let err = flow.validate(&book).await.unwrap_err();
        assert_eq!(err, FlowError::Validation("PayID is inactive".to_string()));
        assert!(matches!(flow.state(), FlowState::EnteringPayId { error: Some(_) }));
        assert_eq!(flow.begin_submit(), Err(FlowError::NotValidated));
    }

    #[tokio::test]
    async fn editing_payid_discards_outcome_and_late_results() {
        let book = book();
        let mut flow = filled("john@example.com", PayIdKind::Email);
        flow.validate(&book).await.unwrap();

        flow.set_pay_id("jane@example.com");
        assert_eq!(flow.state(), &FlowState::EnteringPayId { error: None });
        assert!(flow.outcome().is_none());

        let (pay_id, kind) = flow.begin_validation().unwrap();
        let outcome = book.validate_pay_id(&pay_id, kind).await;
        flow.set_kind(PayIdKind::Mobile);
        assert!(!flow.finish_validation(outcome));
        assert!(flow.outcome().is_none());
    }

    #[tokio::test]
    async fn back_and_reset_leave_confirmation() {
        let book = book();
        let mut flow = filled("john@example.com", PayIdKind::Email);
        flow.validate(&book).await.unwrap();
        flow.back().unwrap();
        assert_eq!(flow.state(), &FlowState::EnteringPayId { error: None });
        assert_eq!(flow.pay_id(), "john@example.com");

        flow.validate(&book).await.unwrap();
        flow.reset();
        assert_eq!(flow.pay_id(), "");
        assert_eq!(flow.kind(), PayIdKind::Email);
        assert!(flow.confirm(true).is_err());
    }

    #[tokio::test]
    async fn submission_failure_is_retryable() {
        let book = book();
        let mut flow = filled("john@example.com", PayIdKind::Email);
        flow.validate(&book).await.unwrap();
        flow.confirm(true).unwrap();

        flow.begin_submit().unwrap();
        let err = flow
            .finish_submit(Err(EngineError::AddFailed(StoreError::Transport(
                "connection reset".to_string(),
            ))))
            .unwrap_err();
        assert_eq!(err, FlowError::Submission);
        assert_eq!(
            flow.state(),
            &FlowState::Confirming {
                confirmed: true,
                submission_error: Some(FlowError::Submission)
            }
        );

        flow.submit(&book).await.unwrap();
        assert!(matches!(flow.state(), FlowState::Done(_)));
    }
}
