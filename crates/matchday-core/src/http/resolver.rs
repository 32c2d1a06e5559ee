//! URL resolution against the configured base address
//!
//! The base may be empty (site-relative targets), relative, or absolute, and
//! may already end in the `/api` segment that newer routes also start with.

use tracing::debug;

/// Route segment shared by the base address and the modern routes
pub const API_SEGMENT: &str = "api";

/// Resolves relative resource paths into request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base: String,
}

impl UrlResolver {
    /// Create a resolver; whitespace and trailing separators are trimmed
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// The normalized base address
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve `path` into exactly one target with no duplicated separators
    /// and no duplicated `/api` prefix
    pub fn resolve(&self, path: &str) -> String {
        let mut clean = path.trim_start_matches('/');

        if self.base_ends_with_api() {
            if let Some(rest) = strip_api_segment(clean) {
                debug!(
                    base = %self.base,
                    path = %path,
                    "Dropping duplicate api segment from request path"
                );
                // Bare segment, possibly with a query or fragment: the base already names it
                if rest.is_empty() || rest.starts_with(['?', '#']) {
                    return format!("{}{}", self.base, rest);
                }
                clean = rest;
            }
        }

        if self.base.is_empty() {
            format!("/{}", clean)
        } else {
            format!("{}/{}", self.base, clean)
        }
    }

    fn base_ends_with_api(&self) -> bool {
        match self.base.rsplit_once('/') {
            Some((_, last)) => last.eq_ignore_ascii_case(API_SEGMENT),
            None => self.base.eq_ignore_ascii_case(API_SEGMENT),
        }
    }
}

/// Remainder of `path` after a leading `api` segment, if it has one
///
/// The segment ends at `/`, `?`, `#` or the end of the path. Separators
/// after it are dropped; a query or fragment is kept.
fn strip_api_segment(path: &str) -> Option<&str> {
    let end = path.find(['/', '?', '#']).unwrap_or(path.len());
    if !path[..end].eq_ignore_ascii_case(API_SEGMENT) {
        return None;
    }
    Some(path[end..].trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_absolute_base() {
        let resolver = UrlResolver::new("https://futbol.example.com/");
        assert_eq!(
            resolver.resolve("/players"),
            "https://futbol.example.com/players"
        );
        assert_eq!(
            resolver.resolve("api/groups"),
            "https://futbol.example.com/api/groups"
        );
    }

    #[test]
    fn test_duplicate_api_segment_removed() {
        let resolver = UrlResolver::new("https://futbol.example.com/api");
        assert_eq!(
            resolver.resolve("/api/auth/login"),
            "https://futbol.example.com/api/auth/login"
        );
        assert_eq!(
            resolver.resolve("/auth/login"),
            "https://futbol.example.com/api/auth/login"
        );
    }

    #[test]
    fn test_duplicate_check_is_case_insensitive() {
        let resolver = UrlResolver::new("https://futbol.example.com/API");
        assert_eq!(
            resolver.resolve("Api/players/all"),
            "https://futbol.example.com/API/players/all"
        );
    }

    #[test]
    fn test_segment_prefix_is_not_api() {
        let resolver = UrlResolver::new("https://futbol.example.com/api");
        assert_eq!(
            resolver.resolve("/apis/list"),
            "https://futbol.example.com/api/apis/list"
        );
    }

    #[test]
    fn test_bare_api_path() {
        let resolver = UrlResolver::new("https://h.test/api");
        for (path, expected) in [
            ("/api", "https://h.test/api"),
            ("api/", "https://h.test/api"),
            ("/api?x=1", "https://h.test/api?x=1"),
            ("/API#top", "https://h.test/api#top"),
            ("/api/?x=1", "https://h.test/api?x=1"),
        ] {
            let target = resolver.resolve(path);
            assert!(!target.contains("/api/api"), "{} resolved to {}", path, target);
            assert_eq!(target, expected);
        }

        let resolver = UrlResolver::new("/api");
        assert_eq!(resolver.resolve("/api"), "/api");
    }

    #[test]
    fn test_empty_base_is_site_relative() {
        let resolver = UrlResolver::new("   ");
        assert_eq!(resolver.resolve("//matches/m1"), "/matches/m1");
        assert_eq!(resolver.resolve("api/groups"), "/api/groups");
    }

    #[test]
    fn test_relative_base() {
        let resolver = UrlResolver::new("/api/");
        assert_eq!(resolver.base(), "/api");
        assert_eq!(resolver.resolve("/api/groups"), "/api/groups");
    }

    #[test]
    fn test_query_is_preserved() {
        let resolver = UrlResolver::new("http://localhost:3000");
        assert_eq!(
            resolver.resolve("/matches/m1/generate-teams?ai=1&seed=7"),
            "http://localhost:3000/matches/m1/generate-teams?ai=1&seed=7"
        );
    }

    proptest! {
        #[test]
        fn prop_never_duplicates_api_prefix(
            host in "[a-z]{1,12}",
            rest in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}",
            leading in "/{0,3}",
        ) {
            prop_assume!(!rest.starts_with("api"));
            let resolver = UrlResolver::new(&format!("https://{}.test/api", host));
            let target = resolver.resolve(&format!("{}api/{}", leading, rest));
            prop_assert!(!target.contains("/api/api"));
            prop_assert_eq!(target, format!("https://{}.test/api/{}", host, rest));
        }

        #[test]
        fn prop_bare_api_segment_is_not_duplicated(
            host in "[a-z]{1,12}",
            leading in "/{0,3}",
            suffix in "(\\?[a-z]{1,4}=[0-9]{1,3}|#[a-z]{1,6})?",
        ) {
            let resolver = UrlResolver::new(&format!("https://{}.test/api", host));
            let target = resolver.resolve(&format!("{}api{}", leading, suffix));
            prop_assert!(!target.contains("/api/api"));
            prop_assert_eq!(target, format!("https://{}.test/api{}", host, suffix));
        }

        #[test]
        fn prop_no_double_separator_after_base(
            rest in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}",
            leading in "/{0,4}",
            trailing in "/{0,3}",
        ) {
            let resolver = UrlResolver::new(&format!("http://localhost:8080{}", trailing));
            let target = resolver.resolve(&format!("{}{}", leading, rest));
            prop_assert_eq!(target, format!("http://localhost:8080/{}", rest));
        }
    }
}
