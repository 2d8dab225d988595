// ABOUTME: Private-vs-public mode resolution and the per-invocation query context
// ABOUTME: The decision table is explicit so the fallback precedence stays auditable

use tracing::debug;

use crate::client::TrainerRoadClient;
use crate::errors::{ExportError, ExportResult};
use crate::models::{DayAggregate, MemberInfo, PublicTss, Timeline};
use crate::normalize::flatten_public_days;

/// Caller intent for one invocation.
#[derive(Debug, Clone, Default)]
pub struct QueryIntent {
    /// Explicit target username, when the caller named one
    pub target: Option<String>,
    /// Force the public data path even when authenticated
    pub force_public: bool,
}

/// Outcome of the mode decision table.
///
/// Precedence is fixed and must not regress: private requires an identity,
/// no force-public flag, and no explicit target other than the identity
/// itself. Public targets the explicit username first, then the identity's
/// own username, then fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeDecision {
    /// Serve from authenticated private data
    Private,
    /// Serve from the public per-day aggregate for this username
    Public {
        /// Username whose public profile to read
        target: String,
    },
}

impl ModeDecision {
    /// Apply the decision table.
    pub fn decide(
        identity_username: Option<&str>,
        explicit_target: Option<&str>,
        force_public: bool,
    ) -> ExportResult<Self> {
        let can_use_private = identity_username.is_some()
            && !force_public
            && explicit_target.is_none_or(|target| Some(target) == identity_username);
        if can_use_private {
            return Ok(Self::Private);
        }
        explicit_target
            .or(identity_username)
            .map(|target| Self::Public {
                target: target.to_owned(),
            })
            .ok_or(ExportError::NoTarget)
    }
}

/// Mode-specific base data carried by a resolved context.
#[derive(Debug)]
pub enum ContextData {
    /// Full private calendar timeline
    Private {
        /// Timeline payload for the authenticated member
        timeline: Timeline,
    },
    /// Day-level public aggregate
    Public {
        /// Raw aggregate payload (also carries FTP history)
        public_tss: PublicTss,
        /// Flattened per-day records
        days: Vec<DayAggregate>,
    },
}

/// Resolved context for one invocation; not cached across invocations.
#[derive(Debug)]
pub struct QueryContext {
    /// Client carrying the session used for the resolution
    pub client: TrainerRoadClient,
    /// Username the data belongs to
    pub target_username: String,
    /// Authenticated identity, when the session had one (present in public
    /// mode too when a logged-in caller targets someone else)
    pub authenticated_member: Option<MemberInfo>,
    /// Mode-specific base data
    pub data: ContextData,
}

/// Borrowed view of a private context: identity plus timeline, together.
#[derive(Debug, Clone, Copy)]
pub struct PrivateView<'a> {
    /// Authenticated member the data belongs to
    pub member: &'a MemberInfo,
    /// Private timeline payload
    pub timeline: &'a Timeline,
}

impl QueryContext {
    /// `"private"` or `"public"`, for payload envelopes.
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        match self.data {
            ContextData::Private { .. } => "private",
            ContextData::Public { .. } => "public",
        }
    }

    /// Guard for operations with no public-mode equivalent.
    ///
    /// Annotations, plans, events, levels, weight history, and power data
    /// must use this rather than silently degrading.
    pub fn require_private(&self, operation: &str) -> ExportResult<PrivateView<'_>> {
        match (&self.data, self.authenticated_member.as_ref()) {
            (ContextData::Private { timeline }, Some(member)) => {
                Ok(PrivateView { member, timeline })
            }
            _ => Err(ExportError::PrivateModeRequired {
                operation: operation.to_owned(),
            }),
        }
    }

    /// Flattened public days; empty outside public mode.
    #[must_use]
    pub fn public_days(&self) -> &[DayAggregate] {
        match &self.data {
            ContextData::Public { days, .. } => days,
            ContextData::Private { .. } => &[],
        }
    }
}

/// Resolve caller intent into a working context, performing the minimum
/// necessary fetch.
///
/// Failure to establish identity is "no identity", never fatal at this
/// stage. A failing public-aggregate fetch collapses to
/// [`ExportError::PublicProfileUnavailable`] with upstream detail dropped.
pub async fn resolve_query_context(
    client: TrainerRoadClient,
    intent: &QueryIntent,
) -> ExportResult<QueryContext> {
    let identity = match client.get_member_info().await {
        Ok(member) => Some(member),
        Err(error) => {
            debug!(%error, "no authenticated identity");
            None
        }
    };

    let decision = ModeDecision::decide(
        identity.as_ref().map(|member| member.username.as_str()),
        intent.target.as_deref(),
        intent.force_public,
    )?;

    match decision {
        ModeDecision::Private => {
            // decide() only returns Private when an identity exists
            let Some(member) = identity else {
                return Err(ExportError::NoTarget);
            };
            let timeline = client
                .get_timeline(member.member_id, &member.username)
                .await?;
            Ok(QueryContext {
                client,
                target_username: member.username.clone(),
                authenticated_member: Some(member),
                data: ContextData::Private { timeline },
            })
        }
        ModeDecision::Public { target } => {
            let public_tss = match client.get_public_tss(&target).await {
                Ok(payload) => payload,
                Err(error) => {
                    debug!(%error, username = %target, "public aggregate fetch failed");
                    return Err(ExportError::PublicProfileUnavailable { username: target });
                }
            };
            let days = flatten_public_days(&public_tss);
            Ok(QueryContext {
                client,
                target_username: target,
                authenticated_member: identity,
                data: ContextData::Public { public_tss, days },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_without_target_resolves_private() {
        let decision = ModeDecision::decide(Some("rider"), None, false).unwrap();
        assert_eq!(decision, ModeDecision::Private);
    }

    #[test]
    fn identity_targeting_itself_resolves_private() {
        let decision = ModeDecision::decide(Some("rider"), Some("rider"), false).unwrap();
        assert_eq!(decision, ModeDecision::Private);
    }

    #[test]
    fn explicit_target_beats_identity() {
        let decision = ModeDecision::decide(Some("rider"), Some("alice"), false).unwrap();
        assert_eq!(
            decision,
            ModeDecision::Public {
                target: "alice".into()
            }
        );
    }

    #[test]
    fn force_public_falls_back_to_identity_username() {
        let decision = ModeDecision::decide(Some("rider"), None, true).unwrap();
        assert_eq!(
            decision,
            ModeDecision::Public {
                target: "rider".into()
            }
        );
    }

    #[test]
    fn no_identity_uses_explicit_target() {
        let decision = ModeDecision::decide(None, Some("alice"), false).unwrap();
        assert_eq!(
            decision,
            ModeDecision::Public {
                target: "alice".into()
            }
        );
    }

    #[test]
    fn force_public_with_explicit_target_uses_the_target() {
        let decision = ModeDecision::decide(Some("rider"), Some("alice"), true).unwrap();
        assert_eq!(
            decision,
            ModeDecision::Public {
                target: "alice".into()
            }
        );
    }

    #[test]
    fn explicit_target_without_identity_survives_force_public() {
        let decision = ModeDecision::decide(None, Some("alice"), true).unwrap();
        assert_eq!(
            decision,
            ModeDecision::Public {
                target: "alice".into()
            }
        );
    }

    #[test]
    fn no_identity_and_no_target_fails() {
        let error = ModeDecision::decide(None, None, false).unwrap_err();
        assert!(matches!(error, ExportError::NoTarget));
    }

    #[test]
    fn force_public_without_any_username_fails() {
        let error = ModeDecision::decide(None, None, true).unwrap_err();
        assert!(matches!(error, ExportError::NoTarget));
    }
}
