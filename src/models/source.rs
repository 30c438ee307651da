// SPDX-License-Identifier: MIT

//! Source identity and credential types.

use std::fmt;
use std::str::FromStr;

/// One row/object exactly as a source returned it, before any
/// normalization. Keys are source-specific; no component outside the
/// matching processor may depend on them.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Supported logbook sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogbookType {
    MountainProject,
    EightA,
}

impl LogbookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogbookType::MountainProject => "mountain_project",
            LogbookType::EightA => "eight_a",
        }
    }
}

impl fmt::Display for LogbookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogbookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mountain_project" => Ok(LogbookType::MountainProject),
            "eight_a" => Ok(LogbookType::EightA),
            other => Err(format!("unknown logbook type: {}", other)),
        }
    }
}

/// Ephemeral reference to the external account.
///
/// Created per call, used in-memory only, never persisted. The `Debug`
/// impl redacts the secret so credentials cannot leak through logs.
#[derive(Clone)]
pub enum SourceCredential {
    /// Mountain Project profile locator, e.g.
    /// `https://www.mountainproject.com/user/12345/jane-doe`
    ProfileUrl(String),
    /// 8a.nu account login
    Login { username: String, password: String },
}

impl fmt::Debug for SourceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCredential::ProfileUrl(url) => {
                f.debug_tuple("ProfileUrl").field(url).finish()
            }
            SourceCredential::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_debug_redacts_password() {
        let cred = SourceCredential::Login {
            username: "jane".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", cred);
        assert!(rendered.contains("jane"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_logbook_type_round_trip() {
        for lt in [LogbookType::MountainProject, LogbookType::EightA] {
            assert_eq!(lt.as_str().parse::<LogbookType>().unwrap(), lt);
        }
        assert!("strava".parse::<LogbookType>().is_err());
    }
}
