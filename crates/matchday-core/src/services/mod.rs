//! Domain operations over the request layer
//!
//! Each service wraps a shared [`HttpClient`]. Operations whose backend route
//! moved between deployments run a fallback chain over the known variants,
//! newest first.

use std::future::Future;
use std::sync::Arc;

use crate::http::{FallbackChain, HttpClient, RequestResult};

pub mod auth;
pub mod groups;
pub mod matches;
pub mod players;

pub use auth::AuthService;
pub use groups::GroupService;
pub use matches::MatchService;
pub use players::PlayerService;

/// All domain services over one client
#[derive(Clone)]
pub struct MatchdayApi {
    pub auth: AuthService,
    pub players: PlayerService,
    pub groups: GroupService,
    pub matches: MatchService,
}

impl MatchdayApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            players: PlayerService::new(client.clone()),
            groups: GroupService::new(client.clone()),
            matches: MatchService::new(client),
        }
    }
}

/// Build a chain that runs `call` once per route, in order
pub(crate) fn route_chain<'a, T, R, F, Fut>(
    client: &HttpClient,
    operation: &str,
    routes: &'a [R],
    call: F,
) -> FallbackChain<'a, T>
where
    T: Send + 'a,
    R: AsRef<str> + Sync,
    F: Fn(&'a str) -> Fut + Send + Sync + 'a,
    Fut: Future<Output = RequestResult<T>> + Send + 'a,
{
    let call = Arc::new(call);
    routes.iter().fold(client.chain(operation), |chain, route| {
        let call = Arc::clone(&call);
        let route = route.as_ref();
        chain.attempt(route, move || (*call)(route))
    })
}

/// Percent-encode a value for use in a query string
pub(crate) fn query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
