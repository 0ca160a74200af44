//! Request ids, API-key checks for the proposal routes, and a start limit on
//! generation runs.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderName, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::{Choice, ConstantTimeEq};
use uuid::Uuid;

use propgen_core::Environment;

use crate::api::ApiError;

pub const API_KEYS_VAR: &str = "PROPGEN_API_KEYS";

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Caller-supplied ids longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one HTTP request, echoed in `meta.request_id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    fn of(req: &Request) -> String {
        req.extensions()
            .get::<Self>()
            .map(|id| id.0.clone())
            .unwrap_or_default()
    }
}

/// Keys accepted as `Authorization: Bearer <key>`. An empty set leaves the
/// routes open, which only development allows.
#[derive(Clone)]
pub struct ApiKeys(Arc<[String]>);

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys").field("count", &self.0.len()).finish()
    }
}

impl ApiKeys {
    /// No key required.
    #[must_use]
    pub fn open() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Reads the comma-separated list in `PROPGEN_API_KEYS`.
    ///
    /// # Errors
    ///
    /// Fails outside development when no key is configured.
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        Self::parse(&std::env::var(API_KEYS_VAR).unwrap_or_default(), env)
    }

    /// # Errors
    ///
    /// Fails outside development when `raw` holds no key.
    pub fn parse(raw: &str, env: &Environment) -> anyhow::Result<Self> {
        let keys: BTreeSet<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            if *env != Environment::Development {
                anyhow::bail!("{API_KEYS_VAR} must list at least one key in {env}");
            }
            tracing::warn!("{API_KEYS_VAR} is empty; proposal routes are unauthenticated");
            return Ok(Self::open());
        }
        Ok(Self(keys.into_iter().map(String::from).collect()))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time match against every configured key.
    fn accepts(&self, presented: &str) -> bool {
        let hit = self.0.iter().fold(Choice::from(0), |hit, key| {
            hit | key.as_bytes().ct_eq(presented.as_bytes())
        });
        hit.into()
    }
}

/// Sliding-window cap on how many generation runs may start. Each run holds
/// an LLM research call, a content call and a browser, so the generate route
/// is limited on its own.
#[derive(Debug, Clone)]
pub struct GenerationLimiter {
    max_starts: usize,
    window: Duration,
    starts: Arc<Mutex<VecDeque<Instant>>>,
}

impl GenerationLimiter {
    #[must_use]
    pub fn new(max_starts: usize, window: Duration) -> Self {
        Self {
            max_starts,
            window,
            starts: Arc::new(Mutex::new(VecDeque::with_capacity(max_starts))),
        }
    }

    /// Records a start at `now`, or returns how long until a slot frees up.
    fn try_start(&self, now: Instant) -> Result<(), Duration> {
        let mut starts = self.starts.lock().unwrap_or_else(PoisonError::into_inner);
        while starts
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            starts.pop_front();
        }
        if starts.len() >= self.max_starts {
            let wait = starts.front().map_or(self.window, |oldest| {
                self.window
                    .saturating_sub(now.saturating_duration_since(*oldest))
            });
            return Err(wait);
        }
        starts.push_back(now);
        Ok(())
    }
}

/// Takes a usable `x-request-id` from the caller or mints a UUID, then
/// stores it in the request extensions and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    res
}

pub async fn require_api_key(State(keys): State<ApiKeys>, req: Request, next: Next) -> Response {
    if keys.is_open() {
        return next.run(req).await;
    }
    match bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if keys.accepts(token) => next.run(req).await,
        _ => ApiError::new(
            RequestId::of(&req),
            "unauthorized",
            "a valid API key is required",
        )
        .into_response(),
    }
}

pub async fn limit_generation(
    State(limiter): State<GenerationLimiter>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.try_start(Instant::now()) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            tracing::warn!(
                max_starts = limiter.max_starts,
                retry_after,
                "generation start refused"
            );
            let mut res = ApiError::new(
                RequestId::of(&req),
                "rate_limited",
                "too many proposals are being generated; try again shortly",
            )
            .into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after.max(1)));
            res
        }
    }
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let (scheme, token) = value?.to_str().ok()?.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let header = HeaderValue::from_static("bearer key-1");
        assert_eq!(bearer_token(Some(&header)), Some("key-1"));
        let header = HeaderValue::from_static("Basic a2V5");
        assert_eq!(bearer_token(Some(&header)), None);
        let header = HeaderValue::from_static("Bearer   ");
        assert_eq!(bearer_token(Some(&header)), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn empty_keys_are_open_only_in_development() {
        assert!(ApiKeys::parse("", &Environment::Development).unwrap().is_open());
        assert!(ApiKeys::parse(" , ", &Environment::Production).is_err());
        assert!(ApiKeys::parse("", &Environment::Test).is_err());
    }

    #[test]
    fn only_configured_keys_are_accepted() {
        let keys = ApiKeys::parse("sales-team, ops ,sales-team", &Environment::Production).unwrap();
        assert!(!keys.is_open());
        assert!(keys.accepts("sales-team"));
        assert!(keys.accepts("ops"));
        assert!(!keys.accepts("sales"));
        assert!(!keys.accepts(""));
        assert_eq!(format!("{keys:?}"), "ApiKeys { count: 2 }");
    }

    #[test]
    fn limiter_frees_slots_as_the_window_slides() {
        let limiter = GenerationLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.try_start(t0).is_ok());
        assert!(limiter.try_start(t0 + Duration::from_secs(20)).is_ok());

        let wait = limiter.try_start(t0 + Duration::from_secs(30)).unwrap_err();
        assert_eq!(wait, Duration::from_secs(30));

        assert!(limiter.try_start(t0 + Duration::from_secs(60)).is_ok());
        assert!(limiter.try_start(t0 + Duration::from_secs(61)).is_err());
    }
}
