//! Session gate in front of the habit screen.
//!
//! # Responsibility
//! - Validate that both credential fields are filled in.
//! - Delegate the credential comparison to a pluggable [`Authenticator`].
//! - Track which screen the app is on for the current process.
//!
//! # Invariants
//! - No comparison happens while either field is empty.
//! - A rejection never says which field was wrong.
//! - Nothing about the session is persisted; every launch starts at
//!   [`Screen::Login`].

use log::info;

pub const USERNAME_REQUIRED_MESSAGE: &str = "Please enter your username";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Please enter your password";
pub const REJECTED_MESSAGE: &str = "Incorrect username or password";

/// Credential check seam.
pub trait Authenticator {
    /// Returns whether the non-empty pair is accepted.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Literal-pair authenticator. Not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCredentialAuthenticator {
    username: String,
    password: String,
}

impl FixedCredentialAuthenticator {
    pub const DEFAULT_USERNAME: &'static str = "test";
    pub const DEFAULT_PASSWORD: &'static str = "test123";

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for FixedCredentialAuthenticator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_USERNAME, Self::DEFAULT_PASSWORD)
    }
}

impl Authenticator for FixedCredentialAuthenticator {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Per-field validation failures shown inline under the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    UsernameRequired,
    PasswordRequired,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::UsernameRequired => USERNAME_REQUIRED_MESSAGE,
            Self::PasswordRequired => PASSWORD_REQUIRED_MESSAGE,
        }
    }
}

/// Outcome of a comparison that actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Authenticated,
    Rejected,
}

/// Result of one login attempt.
///
/// Either one or both field errors are set and `decision` is `None`, or no
/// field error is set and `decision` carries the comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateResult {
    pub username_error: Option<FieldError>,
    pub password_error: Option<FieldError>,
    pub decision: Option<AuthDecision>,
}

impl GateResult {
    pub fn is_authenticated(&self) -> bool {
        self.decision == Some(AuthDecision::Authenticated)
    }

    /// Generic banner text for a rejected comparison.
    pub fn banner(&self) -> Option<&'static str> {
        match self.decision {
            Some(AuthDecision::Rejected) => Some(REJECTED_MESSAGE),
            _ => None,
        }
    }
}

/// Checks one credential pair without touching session state.
pub fn evaluate_credentials(
    authenticator: &impl Authenticator,
    username: &str,
    password: &str,
) -> GateResult {
    let username_error = username.is_empty().then_some(FieldError::UsernameRequired);
    let password_error = password.is_empty().then_some(FieldError::PasswordRequired);

    let decision = if username_error.is_none() && password_error.is_none() {
        if authenticator.verify(username, password) {
            Some(AuthDecision::Authenticated)
        } else {
            Some(AuthDecision::Rejected)
        }
    } else {
        None
    };

    GateResult {
        username_error,
        password_error,
        decision,
    }
}

/// Screens reachable in one process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Habits,
}

/// Login gate plus current-screen state.
pub struct SessionGate<A: Authenticator> {
    authenticator: A,
    screen: Screen,
}

impl<A: Authenticator> SessionGate<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            screen: Screen::Login,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Runs one login attempt and moves to [`Screen::Habits`] on success.
    pub fn attempt_login(&mut self, username: &str, password: &str) -> GateResult {
        let result = evaluate_credentials(&self.authenticator, username, password);
        match result.decision {
            Some(AuthDecision::Authenticated) => {
                self.screen = Screen::Habits;
                info!("event=login module=auth status=ok");
            }
            Some(AuthDecision::Rejected) => {
                info!("event=login module=auth status=rejected");
            }
            None => {
                info!(
                    "event=login module=auth status=invalid username_missing={} password_missing={}",
                    result.username_error.is_some(),
                    result.password_error.is_some()
                );
            }
        }
        result
    }

    /// Returns to the login screen.
    pub fn sign_out(&mut self) {
        self.screen = Screen::Login;
    }
}

impl Default for SessionGate<FixedCredentialAuthenticator> {
    fn default() -> Self {
        Self::new(FixedCredentialAuthenticator::default())
    }
}
