//! Sequential fallback across endpoint variants
//!
//! A chain holds attempts that perform the same logical operation against
//! different wire paths. Attempts run strictly in order:
//!
//! - success stops the chain and returns the value
//! - "route not found" records the error and moves on to the next variant
//! - any other failure aborts the chain with that error
//! - running out of variants raises the last recorded error
//!
//! Attempts are never issued concurrently; two variants of a non-idempotent
//! operation must not both reach the backend.

use std::future::Future;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::http::error::TRANSPORT_STATUS;
use crate::http::{RequestError, RequestResult};

/// Decides which failures let a chain continue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// Also treat a status-less failure whose message mentions 404 as
    /// "route not found". Off by default: an unrelated message that happens
    /// to contain "404" would be misclassified.
    pub match_not_found_message: bool,
}

impl FallbackPolicy {
    /// Policy that also inspects transport messages for a 404
    pub fn with_message_matching() -> Self {
        Self {
            match_not_found_message: true,
        }
    }

    /// Whether `error` means "this route variant does not exist here"
    pub fn is_continuable(&self, error: &RequestError) -> bool {
        if error.kind().is_continuable() {
            return true;
        }

        self.match_not_found_message
            && error.status == TRANSPORT_STATUS
            && not_found_pattern().is_match(&error.message)
    }
}

fn not_found_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b404\b").expect("Valid regex pattern"))
}

/// Result of a single attempt, tagged for the chain
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    Success(T),
    /// Route variant missing; try the next one
    Continue(RequestError),
    /// Real failure of the operation; stop here
    Abort(RequestError),
}

/// Tag an attempt result under `policy`
pub fn classify_attempt<T>(result: RequestResult<T>, policy: &FallbackPolicy) -> AttemptOutcome<T> {
    match result {
        Ok(value) => AttemptOutcome::Success(value),
        Err(error) if policy.is_continuable(&error) => AttemptOutcome::Continue(error),
        Err(error) => AttemptOutcome::Abort(error),
    }
}

/// Chain state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainState {
    /// Attempts remain
    Pending,
    Succeeded,
    /// Every attempt reported "route not found"
    Exhausted,
    /// A non-continuable failure occurred
    Aborted,
}

impl ChainState {
    /// State after an attempt finishes
    pub fn after<T>(outcome: &AttemptOutcome<T>, has_more: bool) -> Self {
        match outcome {
            AttemptOutcome::Success(_) => ChainState::Succeeded,
            AttemptOutcome::Abort(_) => ChainState::Aborted,
            AttemptOutcome::Continue(_) if has_more => ChainState::Pending,
            AttemptOutcome::Continue(_) => ChainState::Exhausted,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChainState::Pending)
    }
}

/// Record of one attempt in a chain
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackAttempt {
    pub endpoint: String,
    pub success: bool,
    pub error: Option<RequestError>,
    pub duration: Duration,
}

/// Successful chain result with the variant that served it
#[derive(Debug, Clone)]
pub struct Served<T> {
    pub value: T,
    pub endpoint: String,
    pub attempts: Vec<FallbackAttempt>,
}

impl<T> Served<T> {
    /// Number of attempts made, including the successful one
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}

type AttemptFn<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, RequestResult<T>> + Send + 'a>;

/// Ordered list of equivalent endpoint attempts for one logical operation
pub struct FallbackChain<'a, T> {
    operation: String,
    policy: FallbackPolicy,
    attempts: Vec<(String, AttemptFn<'a, T>)>,
}

impl<'a, T: Send + 'a> FallbackChain<'a, T> {
    /// Create an empty chain; `operation` names it in logs and errors
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            policy: FallbackPolicy::default(),
            attempts: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append an attempt; `endpoint` labels the variant it targets
    pub fn attempt<F, Fut>(mut self, endpoint: impl Into<String>, attempt: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = RequestResult<T>> + Send + 'a,
    {
        self.attempts
            .push((endpoint.into(), Box::new(move || attempt().boxed())));
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Run the chain and return the first successful value
    pub async fn run(self) -> RequestResult<T> {
        self.run_detailed().await.map(|served| served.value)
    }

    /// Run the chain, reporting which variant served the request
    pub async fn run_detailed(self) -> RequestResult<Served<T>> {
        let FallbackChain {
            operation,
            policy,
            attempts,
        } = self;

        let total = attempts.len();
        let mut trace = Vec::with_capacity(total);
        let mut last_error = None;

        for (index, (endpoint, attempt)) in attempts.into_iter().enumerate() {
            let started = Instant::now();
            let outcome = classify_attempt(attempt().await, &policy);
            let duration = started.elapsed();
            let state = ChainState::after(&outcome, index + 1 < total);

            match outcome {
                AttemptOutcome::Success(value) => {
                    trace.push(FallbackAttempt {
                        endpoint: endpoint.clone(),
                        success: true,
                        error: None,
                        duration,
                    });
                    if index > 0 {
                        info!(operation = %operation, endpoint = %endpoint, attempt = index + 1, "Served by fallback route");
                    }
                    return Ok(Served {
                        value,
                        endpoint,
                        attempts: trace,
                    });
                }
                AttemptOutcome::Continue(error) => {
                    debug!(
                        operation = %operation,
                        endpoint = %endpoint,
                        state = ?state,
                        "Route variant not found"
                    );
                    trace.push(FallbackAttempt {
                        endpoint,
                        success: false,
                        error: Some(error.clone()),
                        duration,
                    });
                    last_error = Some(error);
                }
                AttemptOutcome::Abort(error) => {
                    debug!(
                        operation = %operation,
                        endpoint = %endpoint,
                        status = error.status,
                        state = ?state,
                        "Fallback chain aborted"
                    );
                    return Err(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RequestError::transport(format!("all fallback attempts failed for {}", operation))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn not_found() -> RequestError {
        RequestError::new(404, "Not found")
    }

    #[tokio::test]
    async fn test_falls_back_on_not_found() {
        let calls = AtomicUsize::new(0);

        let served = FallbackChain::new("players.get")
            .attempt("/api/players/p9", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(not_found())
            })
            .attempt("/players/p9", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("Legacy")
            })
            .run_detailed()
            .await
            .unwrap();

        assert_eq!(served.value, "Legacy");
        assert_eq!(served.endpoint, "/players/p9");
        assert_eq!(served.attempt_count(), 2);
        assert!(!served.attempts[0].success);
        assert_eq!(served.attempts[0].error.as_ref().unwrap().status, 404);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_server_error_aborts() {
        let second_called = AtomicUsize::new(0);

        let err = FallbackChain::<()>::new("auth.login")
            .attempt("/api/auth/login", || async { Err(RequestError::new(500, "Boom")) })
            .attempt("/auth/login", || async {
                second_called.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.status, 500);
        assert_eq!(err.message, "Boom");
        assert_eq!(second_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_and_transport_abort() {
        for failure in [RequestError::new(401, "Unauthorized"), RequestError::cancelled()] {
            let expected = failure.status;
            let err = FallbackChain::<u32>::new("groups.get")
                .attempt("/api/groups/g1", move || async move { Err(failure) })
                .attempt("/groups/g1", || async { Ok(1) })
                .run()
                .await
                .unwrap_err();
            assert_eq!(err.status, expected);
        }
    }

    #[tokio::test]
    async fn test_exhausted_raises_last_error() {
        let err = FallbackChain::<()>::new("players.update_skills")
            .attempt("/api/players/p2/abilities", || async { Err(RequestError::new(404, "first")) })
            .attempt("/players/p2/abilities", || async { Err(RequestError::new(404, "second")) })
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.status, 404);
        assert_eq!(err.message, "second");
    }

    #[tokio::test]
    async fn test_empty_chain_fails_generically() {
        let chain = FallbackChain::<()>::new("noop");
        assert!(chain.is_empty());
        let err = chain.run().await.unwrap_err();
        assert_eq!(err.status, 0);
        assert!(err.message.contains("all fallback attempts failed for noop"));
    }

    #[tokio::test]
    async fn test_message_matching_is_opt_in() {
        let transport_404 = || RequestError::transport("upstream said 404 page missing");

        let err = FallbackChain::new("strict")
            .attempt("/a", || async { Err(transport_404()) })
            .attempt("/b", || async { Ok(2) })
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.status, 0);

        let value = FallbackChain::new("lenient")
            .with_policy(FallbackPolicy::with_message_matching())
            .attempt("/a", || async { Err(transport_404()) })
            .attempt("/b", || async { Ok(2) })
            .run()
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[test]
    fn test_message_matching_needs_whole_number() {
        let policy = FallbackPolicy::with_message_matching();
        assert!(!policy.is_continuable(&RequestError::transport("error 14045")));
        assert!(!policy.is_continuable(&RequestError::new(500, "404 in upstream")));
    }

    #[test]
    fn test_state_transitions() {
        let ok: AttemptOutcome<u8> = AttemptOutcome::Success(1);
        let skip: AttemptOutcome<u8> = AttemptOutcome::Continue(not_found());
        let stop: AttemptOutcome<u8> = AttemptOutcome::Abort(RequestError::new(500, "x"));

        assert_eq!(ChainState::after(&ok, true), ChainState::Succeeded);
        assert_eq!(ChainState::after(&skip, true), ChainState::Pending);
        assert_eq!(ChainState::after(&skip, false), ChainState::Exhausted);
        assert_eq!(ChainState::after(&stop, true), ChainState::Aborted);
        assert!(!ChainState::Pending.is_terminal());
        assert!(ChainState::Exhausted.is_terminal());
    }
}
