//! Caller context middleware.
//!
//! Authentication and session issuance are external: deployments front
//! this service with the platform gateway, which authenticates the request
//! and stamps the caller's identity into trusted headers. This middleware
//! turns those headers into a [`CallerContext`] request extension; requests
//! without a complete, well-formed set are rejected with 401.
//!
//! Headers (all required):
//! - `x-kohort-user`: caller's user id (UUID)
//! - `x-kohort-org`:  caller's organization id (UUID)
//! - `x-kohort-tier`: privilege tier (guest | learner | instructor |
//!   org_admin | platform)

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use kohort_core::{CallerContext, OrgId, PrivilegeTier, UserId};

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-kohort-user";

/// Header carrying the caller's organization id.
pub const ORG_HEADER: &str = "x-kohort-org";

/// Header carrying the caller's privilege tier.
pub const TIER_HEADER: &str = "x-kohort-tier";

/// Build a [`CallerContext`] from the trusted gateway headers.
fn parse_caller(headers: &HeaderMap) -> Result<CallerContext, String> {
    let header = |name: &str| -> Result<&str, String> {
        headers
            .get(name)
            .ok_or_else(|| format!("missing {name} header"))?
            .to_str()
            .map_err(|_| format!("{name} header is not valid UTF-8"))
    };

    let user_id: UserId = header(USER_HEADER)?
        .parse()
        .map_err(|e| format!("{e}"))?;
    let org_id: OrgId = header(ORG_HEADER)?
        .parse()
        .map_err(|e| format!("{e}"))?;
    let tier: PrivilegeTier = header(TIER_HEADER)?.parse()?;

    Ok(CallerContext::new(user_id, org_id, tier))
}

/// Reject requests lacking a complete caller context; attach it otherwise.
pub async fn caller_context_middleware(mut request: Request, next: Next) -> Response {
    match parse_caller(request.headers()) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!(reason = %reason, "Rejected request without caller context");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "type": "https://kohort.io/errors/unauthorized",
                    "title": "Unauthorized",
                    "status": 401,
                    "detail": reason,
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn full_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        headers.insert(
            ORG_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        headers.insert(TIER_HEADER, HeaderValue::from_static("org_admin"));
        headers
    }

    #[test]
    fn parses_complete_headers() {
        let caller = parse_caller(&full_headers()).unwrap();
        assert_eq!(caller.tier, PrivilegeTier::OrgAdmin);
    }

    #[test]
    fn rejects_missing_header() {
        let mut headers = full_headers();
        headers.remove(ORG_HEADER);
        let err = parse_caller(&headers).unwrap_err();
        assert!(err.contains(ORG_HEADER));
    }

    #[test]
    fn rejects_unknown_tier() {
        let mut headers = full_headers();
        headers.insert(TIER_HEADER, HeaderValue::from_static("root"));
        assert!(parse_caller(&headers).is_err());
    }

    #[test]
    fn rejects_malformed_uuid() {
        let mut headers = full_headers();
        headers.insert(USER_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(parse_caller(&headers).is_err());
    }
}
