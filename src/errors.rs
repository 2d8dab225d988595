// ABOUTME: Unified error taxonomy for the export client and CLI
// ABOUTME: Defines ExportError with structured variants and the ExportResult alias

use std::path::PathBuf;

/// Maximum number of upstream response bytes carried inside an error.
const BODY_PREVIEW_LIMIT: usize = 300;

/// Error type covering every failure the export core can surface.
///
/// None of these are retried internally: credential problems will not fix
/// themselves, and upstream failures propagate to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A timezone string did not resolve to a known IANA zone
    #[error("invalid timezone \"{zone}\"; use an IANA name like \"America/New_York\"")]
    InvalidTimeZone {
        /// The candidate zone string after the resolution chain
        zone: String,
    },

    /// The login handshake failed before or after the credential POST
    #[error("authentication failed: {reason}")]
    Authentication {
        /// What broke: missing hidden field, no redirect, or absent auth cookie
        reason: String,
    },

    /// An upstream endpoint answered with a non-2xx status or a non-JSON body
    #[error("upstream request failed: {status} for {path} -> {body}")]
    UpstreamRequest {
        /// HTTP status code returned by the platform
        status: u16,
        /// Request path (no query values with credentials ever appear here)
        path: String,
        /// Truncated response body for diagnosis
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connect, read)
    #[error("network error for {path}")]
    Network {
        /// Request path the transport failure occurred on
        path: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Public mode was requested with no explicit target and no identity
    #[error(
        "no target profile available; use --target <username> for public mode, or login for private mode"
    )]
    NoTarget,

    /// The public per-day aggregate could not be fetched for a username.
    ///
    /// Upstream detail is deliberately dropped: a failure here is treated as
    /// a privacy/existence signal, not a transport fault.
    #[error(
        "public profile data is unavailable for \"{username}\"; the profile may be private, or the username may not exist"
    )]
    PublicProfileUnavailable {
        /// The username whose aggregate was requested
        username: String,
    },

    /// A private-only operation ran against a public-resolved context
    #[error(
        "{operation} requires private authenticated mode; login first and run without --public/--target"
    )]
    PrivateModeRequired {
        /// Name of the operation that needs authentication
        operation: String,
    },

    /// A caller-supplied argument was malformed (bad date, inverted range)
    #[error("{message}")]
    InvalidInput {
        /// User-correctable description of the problem
        message: String,
    },

    /// The session file could not be written or removed
    #[error("session file error at {path}")]
    Session {
        /// Path of the session file
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Serialization of an outgoing payload failed
    #[error("serialization failed for {context}")]
    Json {
        /// What was being serialized
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    /// Authentication failure with a reason string.
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    /// Non-2xx upstream response; the body is truncated before storage.
    pub fn upstream(status: u16, path: impl Into<String>, body: &str) -> Self {
        let mut preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
        if body.len() > preview.len() {
            preview.push('…');
        }
        Self::UpstreamRequest {
            status,
            path: path.into(),
            body: preview,
        }
    }

    /// User-correctable input problem.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ExportError::upstream(502, "/app/api/member-info", &body);
        match err {
            ExportError::UpstreamRequest { status, body, .. } => {
                assert_eq!(status, 502);
                assert!(body.chars().count() <= 301);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn public_profile_error_names_the_username() {
        let err = ExportError::PublicProfileUnavailable {
            username: "alice".into(),
        };
        assert!(err.to_string().contains("\"alice\""));
    }
}
