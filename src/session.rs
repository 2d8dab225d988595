// ABOUTME: Cookie jar state and the file-backed session store behind it
// ABOUTME: Loads tolerantly, saves via temp-file rename, clears on logout

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ExportError, ExportResult};

/// Name→value cookie map owned by one client instance.
///
/// Every response's `Set-Cookie` entries update it unconditionally,
/// last-write-wins per name.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    /// Empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar seeded from a persisted cookie map.
    #[must_use]
    pub fn from_map(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    /// Snapshot of the cookie map for persistence.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.cookies.clone()
    }

    /// Value of a named cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Whether a named cookie is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Serialized `Cookie` header value; `None` when the jar is empty.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Fold one `Set-Cookie` header into the jar.
    ///
    /// Only the first segment matters; attributes after the first `;` are
    /// dropped. Malformed segments are ignored.
    pub fn apply_set_cookie(&mut self, header: &str) {
        let first_segment = header.split(';').next().unwrap_or("");
        let Some(separator) = first_segment.find('=') else {
            return;
        };
        if separator == 0 {
            return;
        }
        let name = first_segment[..separator].trim();
        let value = first_segment[separator + 1..].trim();
        if name.is_empty() {
            return;
        }
        self.cookies.insert(name.to_owned(), value.to_owned());
    }

    /// Drop every cookie.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

/// Shape of the session file on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionData {
    /// Persisted cookie map
    pub cookies: BTreeMap<String, String>,
    /// When the file was last written
    pub updated_at: Option<String>,
    /// When a login last succeeded
    pub authenticated_at: Option<String>,
    /// Redirect target returned by the last login
    pub last_login_redirect: Option<String>,
}

/// Login metadata attached to a save.
#[derive(Debug, Clone, Default)]
pub struct SessionMeta {
    /// Timestamp of a successful login
    pub authenticated_at: Option<String>,
    /// Redirect target from the login response
    pub last_login_redirect: Option<String>,
}

/// File-backed persistence for one session.
///
/// Single-owner: concurrent processes sharing one file are out of scope and
/// may race.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session-file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session file; a missing or corrupt file is an empty session.
    pub async fn load(&self) -> SessionData {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                debug!(path = %self.path.display(), %error, "ignoring unreadable session file");
                SessionData::default()
            }),
            Err(_) => SessionData::default(),
        }
    }

    /// Persist the jar plus metadata, via temp file and rename so a crash
    /// mid-write cannot leave a half-written session behind.
    pub async fn save(&self, jar: &CookieJar, meta: SessionMeta) -> ExportResult<()> {
        let data = SessionData {
            cookies: jar.to_map(),
            updated_at: Some(Utc::now().to_rfc3339()),
            authenticated_at: meta.authenticated_at,
            last_login_redirect: meta.last_login_redirect,
        };
        let payload = serde_json::to_string_pretty(&data).map_err(|source| ExportError::Json {
            context: "session file",
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, format!("{payload}\n"))
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        Ok(())
    }

    /// Delete the session file; missing files are fine.
    pub async fn clear(&self) -> ExportResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ExportError {
        ExportError::Session {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cookie_keeps_first_segment_only() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("SharedTrainerRoadAuth=abc123; Path=/; HttpOnly; Secure");
        assert_eq!(jar.get("SharedTrainerRoadAuth"), Some("abc123"));
    }

    #[test]
    fn set_cookie_is_last_write_wins() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("token=old");
        jar.apply_set_cookie("token=new; Max-Age=3600");
        assert_eq!(jar.get("token"), Some("new"));
    }

    #[test]
    fn malformed_set_cookie_is_ignored() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("no-separator-here");
        jar.apply_set_cookie("=value-without-name");
        assert!(jar.cookie_header().is_none());
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("a=1");
        jar.apply_set_cookie("b=2");
        assert_eq!(jar.cookie_header().as_deref(), Some("a=1; b=2"));
    }
}
