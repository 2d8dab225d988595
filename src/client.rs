// ABOUTME: Authenticated/public HTTP surface against the platform, owning cookie state
// ABOUTME: Implements the login form flow, fixed-path accessors, and batched detail fetches

use reqwest::header::{ACCEPT, COOKIE, LOCATION, ORIGIN, REFERER, SET_COOKIE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{LazyLock, Mutex};
use tracing::{debug, info};

use crate::config::Settings;
use crate::constants::{
    APP_URL, AUTH_COOKIE, BASE_URL, BATCH_LIMIT, CACHE_HEADER, CACHE_USE_CACHE, IDS_HEADER,
    JSON_FORMAT_CAMEL, JSON_FORMAT_HEADER,
};
use crate::errors::{ExportError, ExportResult};
use crate::models::{
    AiFtpEligibility, CareerLevels, LoginOutcome, MemberInfo, PersonalRecordRangeResponse,
    PublicTss, RawCurrentPlan, RawPlanPhase, RawPlanSummary, RawWeight, Timeline,
};
use crate::session::{CookieJar, SessionData, SessionMeta, SessionStore};

static VERIFICATION_TOKEN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"(?i)name="__RequestVerificationToken"\s+type="hidden"\s+value="([^"]+)""#)
        .expect("static pattern")
});
static RETURN_URL: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"(?i)id="ReturnUrl"\s+name="ReturnUrl"\s+type="hidden"\s+value="([^"]+)""#)
        .expect("static pattern")
});

/// Query knobs for date-ranged personal-record lookups.
#[derive(Debug, Clone)]
pub struct PersonalRecordQuery {
    /// Range start, `YYYY-MM-DD`
    pub start_date: String,
    /// Range end, `YYYY-MM-DD`
    pub end_date: String,
    /// Upstream row type (101 = power curve)
    pub row_type: u32,
    /// Restrict to indoor rides
    pub indoor_only: bool,
    /// Comparison slot
    pub slot: u32,
}

/// Client for the platform's app API.
///
/// Owns the cookie jar and the file-backed session behind it. Redirects are
/// never followed automatically: the login flow needs to observe 3xx
/// responses, and every response's `Set-Cookie` entries must reach the jar.
/// The jar sits behind a mutex only so independent fetches can fan out
/// concurrently from one instance; each response's update is atomic.
#[derive(Debug)]
pub struct TrainerRoadClient {
    http: reqwest::Client,
    jar: Mutex<CookieJar>,
    store: SessionStore,
    settings: Settings,
}

impl TrainerRoadClient {
    /// Build a client from settings; the session file is not read until
    /// [`TrainerRoadClient::load_session`].
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(settings.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let store = SessionStore::new(settings.session_file.clone());
        Self {
            http,
            jar: Mutex::new(CookieJar::new()),
            store,
            settings,
        }
    }

    /// Load persisted cookies into the jar; missing or corrupt session files
    /// mean an empty jar, never an error.
    pub async fn load_session(&self) -> SessionData {
        let data = self.store.load().await;
        if let Ok(mut jar) = self.jar.lock() {
            *jar = CookieJar::from_map(data.cookies.clone());
        }
        data
    }

    /// Drop all cookie state and delete the session file.
    pub async fn clear_session(&self) -> ExportResult<()> {
        if let Ok(mut jar) = self.jar.lock() {
            jar.clear();
        }
        self.store.clear().await
    }

    /// Whether the jar currently holds the authentication cookie.
    #[must_use]
    pub fn has_auth_cookie(&self) -> bool {
        self.jar
            .lock()
            .map(|jar| jar.has(AUTH_COOKIE))
            .unwrap_or(false)
    }

    fn jar_snapshot(&self) -> CookieJar {
        self.jar
            .lock()
            .map(|jar| jar.clone())
            .unwrap_or_default()
    }

    fn base_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = if path.starts_with("http") {
            path.to_owned()
        } else {
            format!("{BASE_URL}{path}")
        };
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json, text/plain, */*");
        let cookie = self.jar.lock().ok().and_then(|jar| jar.cookie_header());
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> ExportResult<reqwest::Response> {
        let response = builder.send().await.map_err(|source| ExportError::Network {
            path: path.to_owned(),
            source,
        })?;
        if let Ok(mut jar) = self.jar.lock() {
            for header in response.headers().get_all(SET_COOKIE) {
                if let Ok(raw) = header.to_str() {
                    jar.apply_set_cookie(raw);
                }
            }
        }
        debug!(path, status = response.status().as_u16(), "upstream response");
        Ok(response)
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ExportResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = configure(
            self.base_request(method, path)
                .header(JSON_FORMAT_HEADER, JSON_FORMAT_CAMEL),
        );
        let response = self.send(builder, path).await?;
        let status = response.status();
        let text = response.text().await.map_err(|source| ExportError::Network {
            path: path.to_owned(),
            source,
        })?;
        if !status.is_success() {
            return Err(ExportError::upstream(status.as_u16(), path, &text));
        }
        serde_json::from_str(&text).map_err(|_| ExportError::upstream(status.as_u16(), path, &text))
    }

    fn career_referer(username: &str) -> String {
        format!("{APP_URL}/career/{username}")
    }

    /// Two-step login: fetch the login page, extract the hidden form fields,
    /// POST the credential form, and require a redirect plus the auth
    /// cookie. Persists the session on success.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        return_path: &str,
    ) -> ExportResult<LoginOutcome> {
        let username = username
            .or(self.settings.username.as_deref())
            .ok_or_else(|| ExportError::authentication("username and password are required"))?
            .to_owned();
        let password = password
            .or(self.settings.password.as_deref())
            .ok_or_else(|| ExportError::authentication("username and password are required"))?
            .to_owned();

        let return_path = ensure_leading_slash(return_path);
        let login_path = format!("/app/login?ReturnUrl={}", urlencoding::encode(&return_path));

        let page = self
            .send(
                self.base_request(Method::GET, &login_path).header(
                    ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                ),
                &login_path,
            )
            .await?;
        let html = page.text().await.map_err(|source| ExportError::Network {
            path: login_path.clone(),
            source,
        })?;

        let token = extract_hidden_field(&VERIFICATION_TOKEN, &html).ok_or_else(|| {
            ExportError::authentication("could not locate __RequestVerificationToken on login page")
        })?;
        let return_url = extract_hidden_field(&RETURN_URL, &html).ok_or_else(|| {
            ExportError::authentication("could not locate ReturnUrl hidden input on login page")
        })?;

        let form = [
            ("Username", username.as_str()),
            ("Password", password.as_str()),
            ("ReturnUrl", return_url.as_str()),
            ("__RequestVerificationToken", token.as_str()),
        ];
        let response = self
            .send(
                self.base_request(Method::POST, "/app/login")
                    .header(ORIGIN, BASE_URL)
                    .header(REFERER, format!("{BASE_URL}{login_path}"))
                    .form(&form),
                "/app/login",
            )
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            return Err(ExportError::authentication(format!(
                "login did not redirect; status={status}, body preview={preview}"
            )));
        }
        if !self.has_auth_cookie() {
            return Err(ExportError::authentication(format!(
                "login redirect succeeded, but the {AUTH_COOKIE} cookie is missing"
            )));
        }

        let redirect = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        self.store
            .save(
                &self.jar_snapshot(),
                SessionMeta {
                    authenticated_at: Some(chrono::Utc::now().to_rfc3339()),
                    last_login_redirect: Some(redirect.clone()),
                },
            )
            .await?;
        info!(username = %username, "login succeeded");

        Ok(LoginOutcome {
            ok: true,
            redirect,
            has_auth_cookie: true,
        })
    }

    /// Authenticated member identity.
    pub async fn get_member_info(&self) -> ExportResult<MemberInfo> {
        self.request_json(Method::GET, "/app/api/member-info", |builder| builder)
            .await
    }

    /// Public per-day aggregate (and FTP history) for a username.
    pub async fn get_public_tss(&self, username: &str) -> ExportResult<PublicTss> {
        let path = format!("/app/api/tss/{}", urlencoding::encode(username));
        self.request_json(Method::GET, &path, |builder| builder).await
    }

    /// Full weight history for a member.
    pub async fn get_weight_history(
        &self,
        member_id: i64,
        username: &str,
    ) -> ExportResult<Vec<RawWeight>> {
        let path = format!("/app/api/weight-history/{member_id}/all");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// Every training plan on the member's calendar.
    pub async fn get_all_user_plans(&self, username: &str) -> ExportResult<Vec<RawPlanSummary>> {
        let path = format!(
            "/app/api/plan-builder/{}/all-user-plans",
            urlencoding::encode(username)
        );
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// The member's current custom plan, when one is active.
    pub async fn get_current_custom_plan(
        &self,
        username: &str,
    ) -> ExportResult<Option<RawCurrentPlan>> {
        let path = format!(
            "/app/api/plan-builder/current-custom-plan/{}",
            urlencoding::encode(username)
        );
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// Phases of the member's plans.
    pub async fn get_plan_phases(&self, username: &str) -> ExportResult<Vec<RawPlanPhase>> {
        let path = format!(
            "/app/api/plan-builder/{}/plan-phases",
            urlencoding::encode(username)
        );
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// Per-zone progression levels.
    pub async fn get_career_levels(
        &self,
        member_id: i64,
        username: &str,
    ) -> ExportResult<CareerLevels> {
        let path = format!("/app/api/career/{member_id}/levels");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// Whether AI FTP detection can run, with detection details.
    pub async fn get_ai_ftp_eligibility(
        &self,
        member_id: i64,
        username: &str,
    ) -> ExportResult<AiFtpEligibility> {
        let path = format!("/app/api/ai-ftp-detection/can-use-ai-ftp/{member_id}");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// AI FTP failure status from the calendar service.
    pub async fn get_ai_ftp_failure_status(
        &self,
        member_id: i64,
        username: &str,
    ) -> ExportResult<Value> {
        let path = format!("/app/api/calendar/aiftp/{member_id}/ai-failure-status");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| {
            builder
                .header(CACHE_HEADER, CACHE_USE_CACHE)
                .header(REFERER, referer)
        })
        .await
    }

    /// Power ranking entries across standard durations.
    pub async fn get_power_ranking(
        &self,
        member_id: i64,
        username: &str,
    ) -> ExportResult<Vec<Value>> {
        let path = format!("/app/api/onboarding/power-ranking?memberId={member_id}");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| builder.header(REFERER, referer))
            .await
    }

    /// Personal records for a date range; a POST whose body is a JSON array
    /// of slot descriptors.
    pub async fn get_personal_records_for_date_range(
        &self,
        member_id: i64,
        username: &str,
        query: &PersonalRecordQuery,
    ) -> ExportResult<PersonalRecordRangeResponse> {
        let path = format!(
            "/app/api/personal-records/for-date-range/{member_id}?rowType={}&indoorOnly={}",
            query.row_type, query.indoor_only
        );
        let referer = Self::career_referer(username);
        let payload = serde_json::json!([{
            "Slot": query.slot,
            "StartDate": query.start_date,
            "EndDate": query.end_date,
        }]);
        self.request_json(Method::POST, &path, |builder| {
            builder.header(REFERER, referer).json(&payload)
        })
        .await
    }

    /// Full calendar timeline for a member.
    pub async fn get_timeline(&self, member_id: i64, username: &str) -> ExportResult<Timeline> {
        let path = format!("/app/api/react-calendar/{member_id}/timeline");
        let referer = Self::career_referer(username);
        self.request_json(Method::GET, &path, |builder| {
            builder
                .header(CACHE_HEADER, CACHE_USE_CACHE)
                .header(REFERER, referer)
        })
        .await
    }

    /// Detailed activities for a set of ids, batched at the upstream cap and
    /// concatenated in batch order.
    pub async fn get_activities_by_ids(
        &self,
        member_id: i64,
        username: &str,
        activity_ids: &[i64],
    ) -> ExportResult<Vec<Value>> {
        let path = format!("/app/api/react-calendar/{member_id}/activities");
        self.fetch_batched_list(&path, username, activity_ids).await
    }

    /// Detailed planned activities for a set of ids.
    pub async fn get_planned_activities_by_ids(
        &self,
        member_id: i64,
        username: &str,
        planned_ids: &[i64],
    ) -> ExportResult<Vec<Value>> {
        let path = format!("/app/api/react-calendar/{member_id}/planned-activities");
        self.fetch_batched_list(&path, username, planned_ids).await
    }

    /// Personal records keyed by activity id, batched and merged by key.
    pub async fn get_personal_records_by_activity_ids(
        &self,
        member_id: i64,
        username: &str,
        activity_ids: &[i64],
    ) -> ExportResult<serde_json::Map<String, Value>> {
        if activity_ids.is_empty() {
            return Ok(serde_json::Map::new());
        }
        let path = format!("/app/api/react-calendar/{member_id}/personal-records");
        let referer = Self::career_referer(username);
        let mut merged = serde_json::Map::new();
        for ids in batched_id_headers(activity_ids) {
            let payload: serde_json::Map<String, Value> = self
                .request_json(Method::GET, &path, |builder| {
                    builder
                        .header(CACHE_HEADER, CACHE_USE_CACHE)
                        .header(REFERER, referer.clone())
                        .header(IDS_HEADER, ids)
                })
                .await?;
            merged.extend(payload);
        }
        Ok(merged)
    }

    // Batches are issued sequentially to stay inside implicit rate limits.
    async fn fetch_batched_list(
        &self,
        path: &str,
        username: &str,
        ids: &[i64],
    ) -> ExportResult<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let referer = Self::career_referer(username);
        let mut results = Vec::with_capacity(ids.len());
        for joined in batched_id_headers(ids) {
            let payload: Vec<Value> = self
                .request_json(Method::GET, path, |builder| {
                    builder
                        .header(CACHE_HEADER, CACHE_USE_CACHE)
                        .header(REFERER, referer.clone())
                        .header(IDS_HEADER, joined)
                })
                .await?;
            results.extend(payload);
        }
        Ok(results)
    }
}

fn ensure_leading_slash(value: &str) -> String {
    if value.starts_with('/') {
        value.to_owned()
    } else {
        format!("/{value}")
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One comma-joined `ids` header value per request, chunked at the upstream
/// cap with input order preserved.
fn batched_id_headers(ids: &[i64]) -> Vec<String> {
    ids.chunks(BATCH_LIMIT).map(join_ids).collect()
}

fn extract_hidden_field(pattern: &regex::Regex, html: &str) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_fields_extract_from_login_html() {
        let html = r#"
            <form action="/app/login" method="post">
              <input id="ReturnUrl" name="ReturnUrl" type="hidden" value="/app/career/rider" />
              <input name="__RequestVerificationToken" type="hidden" value="tok-123" />
            </form>
        "#;
        assert_eq!(
            extract_hidden_field(&VERIFICATION_TOKEN, html).as_deref(),
            Some("tok-123")
        );
        assert_eq!(
            extract_hidden_field(&RETURN_URL, html).as_deref(),
            Some("/app/career/rider")
        );
    }

    #[test]
    fn missing_hidden_field_is_none() {
        assert!(extract_hidden_field(&VERIFICATION_TOKEN, "<html></html>").is_none());
    }

    #[test]
    fn ids_join_comma_separated() {
        assert_eq!(join_ids(&[1, 2, 30]), "1,2,30");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn batching_splits_at_the_upstream_cap_in_order() {
        let ids: Vec<i64> = (1..=250).collect();
        let batches = batched_id_headers(&ids);
        assert_eq!(batches.len(), 3);
        assert!(batches[0].starts_with("1,2,"));
        assert!(batches[0].ends_with(",100"));
        assert!(batches[1].starts_with("101,"));
        assert!(batches[1].ends_with(",200"));
        assert!(batches[2].starts_with("201,"));
        assert!(batches[2].ends_with(",250"));
    }

    #[test]
    fn leading_slash_is_ensured() {
        assert_eq!(ensure_leading_slash("app/career"), "/app/career");
        assert_eq!(ensure_leading_slash("/app"), "/app");
    }
}
