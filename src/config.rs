// ABOUTME: Environment-derived defaults collected once into a Settings value
// ABOUTME: Keeps credential, session-path, and timezone lookup out of business logic

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_USER_AGENT;

/// Process-wide defaults for client construction.
///
/// Built once (normally via [`Settings::from_env`]) and passed into
/// constructors; library code never reads the environment directly, so tests
/// can inject settings without mutating the process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Ambient login username (`TR_USERNAME`)
    pub username: Option<String>,
    /// Ambient login password (`TR_PASSWORD`)
    pub password: Option<String>,
    /// Session-file location (`TR_SESSION_FILE`)
    pub session_file: PathBuf,
    /// Default IANA timezone (`TR_TIMEZONE`)
    pub timezone: Option<String>,
    /// User agent attached to every request
    pub user_agent: String,
}

impl Settings {
    /// Read defaults from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            username: env_non_empty("TR_USERNAME"),
            password: env_non_empty("TR_PASSWORD"),
            session_file: env_non_empty("TR_SESSION_FILE")
                .map_or_else(default_session_file, PathBuf::from),
            timezone: env_non_empty("TR_TIMEZONE"),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            session_file: default_session_file(),
            timezone: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trainerroad")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        env::set_var("TR_USERNAME", "rider");
        env::set_var("TR_SESSION_FILE", "/tmp/tr-session.json");
        env::remove_var("TR_PASSWORD");

        let settings = Settings::from_env();
        assert_eq!(settings.username.as_deref(), Some("rider"));
        assert_eq!(settings.password, None);
        assert_eq!(settings.session_file, PathBuf::from("/tmp/tr-session.json"));

        env::remove_var("TR_USERNAME");
        env::remove_var("TR_SESSION_FILE");
    }

    #[test]
    #[serial]
    fn blank_variables_are_ignored() {
        env::set_var("TR_TIMEZONE", "   ");
        let settings = Settings::from_env();
        assert_eq!(settings.timezone, None);
        env::remove_var("TR_TIMEZONE");
    }
}
