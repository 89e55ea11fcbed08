//! Core domain logic for the on-spot registration desk.
//! This crate is the single source of truth for registration rules and storage.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod qr;
pub mod reference;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{ConfigError, KioskConfig};
pub use export::{append_backup, render_export, write_export, ExportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::participant::{generate_uid, Participant, ParticipantUid, RegistrationPayload};
pub use model::registration::{
    is_valid_email, is_valid_phone, FormField, RegistrationForm, RegistrationValidationError,
};
pub use qr::{parse_qr_payload, qr_code, qr_payload, render_qr_svg, render_qr_terminal, QrError};
pub use reference::{OptionKind, ReferenceOptions};
pub use repo::participant_repo::{
    ParticipantRepository, RepoError, RepoResult, SqliteParticipantRepository,
};
pub use repo::participant_store::ParticipantStore;
pub use service::registration_service::{
    RegistrationOutcome, RegistrationService, ServiceError, ServiceResult,
};
pub use session::{DeskCredentials, DeskSession, SessionError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
