//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;

/// Extract a member id from the path.
///
/// Only plain non-negative decimal integers route to a member; anything else
/// answers 404, same as an unknown id.
pub struct MemberId(pub i64);

impl<S> FromRequestParts<S> for MemberId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;

        parse_member_id(&raw).map(Self).ok_or(ApiError::NotFound)
    }
}

fn parse_member_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digits() {
        assert_eq!(parse_member_id("1"), Some(1));
        assert_eq!(parse_member_id("0042"), Some(42));
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(parse_member_id(""), None);
        assert_eq!(parse_member_id("-1"), None);
        assert_eq!(parse_member_id("+1"), None);
        assert_eq!(parse_member_id("abc"), None);
        assert_eq!(parse_member_id("1.5"), None);
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(parse_member_id("99999999999999999999"), None);
    }
}
