//! Store adapter plumbing shared by the document and key-value adapters.
//!
//! Adapters route every backend call through [`observe`], which bounds it by
//! the store timeout and emits one tracing span plus one metric sample per
//! call.

mod instrument;

pub use instrument::{observe, StoreCall, OUTCOME_FAILURE, OUTCOME_SUCCESS};

/// Returns the scheme of a store URI (`redis` for `redis://host`).
#[must_use]
pub fn uri_scheme(uri: &str) -> Option<&str> {
    uri.split_once("://").map(|(scheme, _)| scheme)
}

/// Masks the password of a store URI before it is logged.
#[must_use]
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return uri.to_string();
    };
    let (userinfo, host) = rest.split_at(at);
    match userinfo.split_once(':') {
        Some((user, _password)) => format!("{scheme}://{user}:***{host}"),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_scheme_extracts_prefix() {
        assert_eq!(uri_scheme("mongodb+srv://cluster/db"), Some("mongodb+srv"));
        assert_eq!(uri_scheme("memory://"), Some("memory"));
        assert_eq!(uri_scheme("localhost:6379"), None);
    }

    #[test]
    fn redact_uri_masks_password_only() {
        assert_eq!(
            redact_uri("mongodb://app:s3cret@db:27017/alpha-articles"),
            "mongodb://app:***@db:27017/alpha-articles"
        );
        assert_eq!(
            redact_uri("redis://:pw@cache:6379/0"),
            "redis://:***@cache:6379/0"
        );
        assert_eq!(redact_uri("redis://cache:6379"), "redis://cache:6379");
        assert_eq!(redact_uri("memory://"), "memory://");
    }
}
