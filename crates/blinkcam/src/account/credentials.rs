//! Login credentials type.

use std::fmt;

use crate::error::AuthError;

/// Login credentials for the Blink service.
///
/// Either value may be absent. An anonymous client is valid until a login is
/// attempted, at which point both must be present.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use blinkcam::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter2");
/// assert_eq!(creds.username(), Some("alice@example.com"));
/// assert!(Credentials::anonymous().username().is_none());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Create credentials with both values present.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Create credentials with neither value present.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create credentials from optional parts.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Returns the username (the account email), if set.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the password, if set.
    ///
    /// # Security
    ///
    /// Never log or display this value.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns true if a non-empty username is stored.
    pub fn has_username(&self) -> bool {
        self.username().is_some_and(|u| !u.is_empty())
    }

    /// Returns true if a non-empty password is stored.
    pub fn has_password(&self) -> bool {
        self.password().is_some_and(|p| !p.is_empty())
    }

    /// Replace the username.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Replace the password.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    /// Returns both values, or the first missing one as an error.
    ///
    /// An empty value counts as missing. The username is checked before the
    /// password, so a client holding only a username still fails on the
    /// password check.
    pub(crate) fn require(&self) -> Result<(&str, &str), AuthError> {
        let username = non_empty(self.username())
            .ok_or(AuthError::MissingCredential { field: "username" })?;
        let password = non_empty(self.password())
            .ok_or(AuthError::MissingCredential { field: "password" })?;
        Ok((username, password))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field(
                "password",
                &self.password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
