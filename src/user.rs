//! Session identities.
//!
//! There is no account system: a session picks one of a fixed set of names.

use std::fmt;
use std::str::FromStr;

use crate::ShareError;

/// Uploader / creator name recorded when no identity is selected.
pub const UNKNOWN_USER: &str = "Inconnu";

/// One of the fixed session identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum User {
    Hugues,
    Jan,
    Alain,
}

impl User {
    /// All identities, in login-screen order.
    pub const ALL: [User; 3] = [User::Hugues, User::Jan, User::Alain];

    /// Name as stored in `uploadedBy` / `createdBy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            User::Hugues => "Hugues",
            User::Jan => "Jan",
            User::Alain => "Alain",
        }
    }

    /// Avatar initial.
    pub fn initial(&self) -> char {
        self.as_str().chars().next().unwrap_or('?')
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for User {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        User::ALL
            .into_iter()
            .find(|user| user.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ShareError::Validation(format!("unknown user: {s}")))
    }
}

/// Name to record for the given session, falling back to [`UNKNOWN_USER`].
pub fn identity_name(user: Option<User>) -> &'static str {
    user.map(|u| u.as_str()).unwrap_or(UNKNOWN_USER)
}
