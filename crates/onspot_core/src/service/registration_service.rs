//! Registration use-case service.
//!
//! # Responsibility
//! - Run the desk flow: validate, advisory contact check, insert.
//! - Expose listing and search for the operator views.
//!
//! # Invariants
//! - Nothing is stored unless validation passed.
//! - A contact match is a decision point for the caller, never an error.
//! - No failure is retried here.

use crate::model::participant::{generate_uid, Participant, ParticipantUid, RegistrationPayload};
use crate::model::registration::{RegistrationForm, RegistrationValidationError};
use crate::repo::participant_repo::{ParticipantRepository, RepoError};
use crate::service::search::filter_participants;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for registration use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Candidate failed validation; the operator must correct input.
    Validation(RegistrationValidationError),
    /// Persistence-layer failure, including `DuplicateUid`.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RegistrationValidationError> for ServiceError {
    fn from(value: RegistrationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Participant stored.
    Registered(Participant),
    /// Email or phone already belongs to `existing_uid`; nothing was stored.
    ///
    /// The desk re-issues the confirmation for `payload` without storing it;
    /// storing anyway is an explicit `register_anyway` call.
    ContactAlreadyRegistered {
        existing_uid: ParticipantUid,
        payload: RegistrationPayload,
    },
}

/// Registration service facade over repository implementations.
pub struct RegistrationService<R: ParticipantRepository> {
    repo: R,
}

impl<R: ParticipantRepository> RegistrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers `form` under a freshly generated uid.
    pub fn register(&self, form: &RegistrationForm) -> ServiceResult<RegistrationOutcome> {
        self.register_with_uid(form, generate_uid())
    }

    /// Registers `form` under a caller-provided uid.
    ///
    /// # Errors
    /// - `Validation` when the form fails a desk rule; nothing is looked up.
    /// - `Repo(DuplicateUid)` when `uid` is already stored.
    /// - `Repo(..)` storage faults otherwise.
    pub fn register_with_uid(
        &self,
        form: &RegistrationForm,
        uid: impl Into<ParticipantUid>,
    ) -> ServiceResult<RegistrationOutcome> {
        let payload = form.to_payload(uid)?;

        if let Some(existing_uid) = self
            .repo
            .find_by_contact(payload.email.as_str(), payload.phone.as_str())?
        {
            info!(
                "event=registration module=service status=contact_match uid={} existing_uid={}",
                payload.uid, existing_uid
            );
            return Ok(RegistrationOutcome::ContactAlreadyRegistered {
                existing_uid,
                payload,
            });
        }

        let stored = self.repo.insert(&payload)?;
        Ok(RegistrationOutcome::Registered(stored))
    }

    /// Inserts `payload` after the caller chose to proceed past a contact match.
    pub fn register_anyway(&self, payload: &RegistrationPayload) -> ServiceResult<Participant> {
        info!(
            "event=registration module=service status=override uid={}",
            payload.uid
        );
        Ok(self.repo.insert(payload)?)
    }

    /// Lists every participant, most recent first.
    pub fn list_all(&self) -> ServiceResult<Vec<Participant>> {
        Ok(self.repo.list_all()?)
    }

    /// Loads one stored participant by uid.
    pub fn find(&self, uid: &str) -> ServiceResult<Option<Participant>> {
        Ok(self.repo.find_by_uid(uid)?)
    }

    /// Returns participants with any field containing `query`, ignoring case.
    pub fn search(&self, query: &str) -> ServiceResult<Vec<Participant>> {
        Ok(filter_participants(self.repo.list_all()?, query))
    }
}
