//! Desk operator session state.
//!
//! # Responsibility
//! - Gate the operator views behind the shared desk credentials.
//!
//! # Invariants
//! - Session state lives in memory and is owned by the UI layer.
//! - Storage and validation never consult the session.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shared desk login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for DeskCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidCredentials,
    NotAuthenticated,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid desk credentials"),
            Self::NotAuthenticated => write!(f, "desk login required"),
        }
    }
}

impl Error for SessionError {}

/// In-memory login state for one operator process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeskSession {
    operator: Option<String>,
}

impl DeskSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs in when `email` and `password` equal `credentials` exactly.
    ///
    /// A failed attempt leaves any previous login untouched.
    pub fn login(
        &mut self,
        credentials: &DeskCredentials,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        if email != credentials.email || password != credentials.password {
            warn!("event=desk_login module=session status=error error_code=invalid_credentials");
            return Err(SessionError::InvalidCredentials);
        }
        info!("event=desk_login module=session status=ok");
        self.operator = Some(email.to_string());
        Ok(())
    }

    pub fn logout(&mut self) {
        self.operator = None;
    }

    /// Logged-in operator email, if any.
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn require_authenticated(&self) -> Result<&str, SessionError> {
        self.operator().ok_or(SessionError::NotAuthenticated)
    }
}
