//! Presence verification.
//!
//! A presence check confirms that the UI is currently showing the expected
//! page. Pages run their check before handing out any region or control, so
//! tests never interact with elements of a stale or wrong page.
//!
//! The check itself is a collaborator: a live driver decides what "present"
//! means. This module ships the trait plus a few stock checks.

use crate::result::{PageError, PageResult};
use std::collections::HashMap;

/// Confirms that a page is the one currently displayed.
pub trait PresenceCheck: Send + Sync {
    /// Return `Ok(())` if the page is present.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Presence`] carrying `failure_message` otherwise.
    fn verify_presence(&self, failure_message: &str) -> PageResult<()>;
}

/// Check that always succeeds. Used by pages with no presence directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPresent;

impl PresenceCheck for AlwaysPresent {
    fn verify_presence(&self, _failure_message: &str) -> PageResult<()> {
        Ok(())
    }
}

/// Check that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverPresent;

impl PresenceCheck for NeverPresent {
    fn verify_presence(&self, failure_message: &str) -> PageResult<()> {
        Err(PageError::presence(failure_message))
    }
}

/// Check backed by a predicate closure.
pub struct FnPresence<F> {
    check: F,
}

impl<F> std::fmt::Debug for FnPresence<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPresence").finish_non_exhaustive()
    }
}

impl<F> FnPresence<F>
where
    F: Fn() -> bool + Send + Sync,
{
    /// Wrap a predicate returning `true` when the page is present
    #[must_use]
    pub const fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> PresenceCheck for FnPresence<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn verify_presence(&self, failure_message: &str) -> PageResult<()> {
        if (self.check)() {
            Ok(())
        } else {
            Err(PageError::presence(failure_message))
        }
    }
}

/// Check that matches the driver's current URL against a pattern.
///
/// The current URL comes from a caller-supplied source, typically a closure
/// reading it from a live browser session. `None` means no page is loaded.
pub struct UrlPresence<F> {
    matcher: UrlMatcher,
    current_url: F,
}

impl<F> std::fmt::Debug for UrlPresence<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlPresence")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl<F> UrlPresence<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    /// Create a URL-backed presence check
    #[must_use]
    pub fn new(pattern: &str, current_url: F) -> Self {
        Self {
            matcher: UrlMatcher::new(pattern),
            current_url,
        }
    }

    /// The underlying matcher
    #[must_use]
    pub const fn matcher(&self) -> &UrlMatcher {
        &self.matcher
    }
}

impl<F> PresenceCheck for UrlPresence<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn verify_presence(&self, failure_message: &str) -> PageResult<()> {
        match (self.current_url)() {
            Some(url) if self.matcher.matches(&url) => Ok(()),
            Some(url) => {
                tracing::debug!(%url, pattern = self.matcher.pattern(), "url does not match page");
                Err(PageError::presence(failure_message))
            }
            None => Err(PageError::presence(failure_message)),
        }
    }
}

/// URL pattern matcher
///
/// Patterns support:
/// - Literal segments: `/login`
/// - Wildcards: `/users/*`
/// - Named parameters: `/users/:id`
///
/// Query strings and fragments of the matched URL are ignored, as is a
/// leading `scheme://host`.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments: Vec<&str> = split_path(url).collect();

        // wildcards and parameters each consume exactly one segment
        if url_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&url_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit == actual,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Extract named parameters from a matching URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        if !self.matches(url) {
            return HashMap::new();
        }

        self.segments
            .iter()
            .zip(split_path(url))
            .filter_map(|(segment, actual)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), actual.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn split_path(url: &str) -> impl Iterator<Item = &str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => path,
    };
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    mod stock_check_tests {
        use super::*;

        #[test]
        fn test_always_present() {
            assert!(AlwaysPresent.verify_presence("unused").is_ok());
        }

        #[test]
        fn test_never_present_carries_message() {
            let err = NeverPresent.verify_presence("not here").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Presence);
            assert_eq!(err.to_string(), "not here");
        }

        #[test]
        fn test_fn_presence_follows_check() {
            let flag = Arc::new(AtomicBool::new(false));
            let shared = Arc::clone(&flag);
            let check = FnPresence::new(move || shared.load(Ordering::SeqCst));

            assert!(check.verify_presence("absent").is_err());
            flag.store(true, Ordering::SeqCst);
            assert!(check.verify_presence("absent").is_ok());
        }
    }

    mod url_presence_tests {
        use super::*;

        #[test]
        fn test_matching_url() {
            let check = UrlPresence::new("/users/:id", || {
                Some("https://example.test/users/42?tab=posts".to_string())
            });
            assert!(check.verify_presence("wrong page").is_ok());
        }

        #[test]
        fn test_other_url() {
            let check = UrlPresence::new("/login", || Some("/dashboard".to_string()));
            let err = check.verify_presence("wrong page").unwrap_err();
            assert_eq!(err.to_string(), "wrong page");
        }

        #[test]
        fn test_no_url() {
            let check = UrlPresence::new("/login", || None);
            assert_eq!(
                check.verify_presence("no page").unwrap_err().kind(),
                ErrorKind::Presence
            );
        }
    }

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/login");
            assert!(matcher.matches("/login"));
            assert!(!matcher.matches("/register"));
            assert!(!matcher.matches("/login/extra"));
        }

        #[test]
        fn test_wildcard_match() {
            let matcher = UrlMatcher::new("/users/*");
            assert!(matcher.matches("/users/123"));
            assert!(!matcher.matches("/users"));
            assert!(!matcher.matches("/other/123"));
        }

        #[test]
        fn test_full_url_and_query_ignored() {
            let matcher = UrlMatcher::new("/login");
            assert!(matcher.matches("http://localhost:8080/login?next=%2F#top"));
            assert!(!matcher.matches("http://localhost:8080/"));
        }

        #[test]
        fn test_root_pattern() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("https://example.test"));
            assert!(matcher.matches("/"));
            assert!(!matcher.matches("/home"));
        }

        #[test]
        fn test_extract_params() {
            let matcher = UrlMatcher::new("/users/:id/posts/:post_id");
            let params = matcher.extract_params("/users/42/posts/100");

            assert_eq!(params.get("id"), Some(&"42".to_string()));
            assert_eq!(params.get("post_id"), Some(&"100".to_string()));
            assert!(matcher.extract_params("/users/42").is_empty());
        }

        #[test]
        fn test_pattern_getter() {
            let matcher = UrlMatcher::new("/test/pattern");
            assert_eq!(matcher.pattern(), "/test/pattern");
        }
    }
}
