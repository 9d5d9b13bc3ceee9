//! Email address validation
//!
//! Address grammar and length limits come from `validator`. On top of that the
//! domain must be a dotted hostname with a real top-level label, so
//! `alice@localhost` and IP literals are rejected.

use validator::ValidateEmail;

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address, returning `None` if it is malformed.
    ///
    /// Internationalized domains are accepted; the local part must be ASCII.
    ///
    /// # Example
    /// ```
    /// use memberdesk_server::models::EmailAddress;
    ///
    /// assert!(EmailAddress::parse("alice@example.com").is_some());
    /// assert!(EmailAddress::parse("alice@bücher.de").is_some());
    /// assert!(EmailAddress::parse("alice@localhost").is_none());
    /// assert!(EmailAddress::parse("not-an-email").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (_, domain) = s.rsplit_once('@')?;
        if !has_top_level_label(domain) {
            return None;
        }

        let candidate = s.to_owned();
        candidate.validate_email().then_some(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Dotted hostname whose last label has two or more characters and is not numeric.
fn has_top_level_label(domain: &str) -> bool {
    if domain.starts_with('[') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.chars().count() >= 2 && !tld.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_addresses() {
        assert!(EmailAddress::parse("alice@example.com").is_some());
        assert!(EmailAddress::parse("first.last@sub.example.co.uk").is_some());
        assert!(EmailAddress::parse("bob+gym@example.org").is_some());
        assert!(EmailAddress::parse("x_y-z@my-domain.io").is_some());
    }

    #[test]
    fn internationalized_domain() {
        let email = EmailAddress::parse("alice@bücher.de").unwrap();
        assert_eq!(email.as_str(), "alice@bücher.de");
        assert!(EmailAddress::parse("alice@xn--bcher-kva.de").is_some());
    }

    #[test]
    fn rejects_non_ascii_local_part() {
        assert!(EmailAddress::parse("josé@example.com").is_none());
    }

    #[test]
    fn rejects_missing_at() {
        assert!(EmailAddress::parse("alice.example.com").is_none());
    }

    #[test]
    fn rejects_missing_tld() {
        assert!(EmailAddress::parse("alice@example").is_none());
        assert!(EmailAddress::parse("alice@example.c").is_none());
        assert!(EmailAddress::parse("alice@10.0.0.1").is_none());
        assert!(EmailAddress::parse("alice@[10.0.0.1]").is_none());
    }

    #[test]
    fn rejects_bad_domain_labels() {
        assert!(EmailAddress::parse("alice@example..com").is_none());
        assert!(EmailAddress::parse("alice@-example.com").is_none());
        assert!(EmailAddress::parse("alice@example-.com").is_none());
    }

    #[test]
    fn rejects_whitespace_and_empty() {
        assert!(EmailAddress::parse("").is_none());
        assert!(EmailAddress::parse("alice @example.com").is_none());
        assert!(EmailAddress::parse("alice@exa mple.com").is_none());
    }

    #[test]
    fn length_limits() {
        let local_64 = "a".repeat(64);
        assert!(EmailAddress::parse(&format!("{local_64}@example.com")).is_some());

        let local_65 = "a".repeat(65);
        assert!(EmailAddress::parse(&format!("{local_65}@example.com")).is_none());

        let long_domain = format!("{}.com", "b".repeat(60)).repeat(5);
        assert!(EmailAddress::parse(&format!("a@{long_domain}")).is_none());
    }
}
