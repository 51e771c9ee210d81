use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::TokenService;
use crate::error::ApiError;

pub const MISSING_HEADER: &str = "Akses Ditolak. Header Authorization tidak ada.";
pub const BAD_HEADER: &str = "Akses Ditolak. Format header Authorization salah.";
const NO_SESSION: &str = "Sesi tidak valid.";

/// The kader a verified token belongs to. Protected handlers take this as an extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthKader {
    pub id: i32,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthKader
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthKader>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized(NO_SESSION))
    }
}

/// Bearer-token gate for every protected route. Rejections never reach the wrapped handler.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?;

    let claims = tokens.verify(token).map_err(|e| {
        warn!("Rejected token for {} {}: {:?}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthKader { id: claims.kader_id });
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized(MISSING_HEADER))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized(BAD_HEADER))?;

    match auth_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::unauthorized(BAD_HEADER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, HeaderValue, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    fn tokens() -> TokenService {
        TokenService::new("gate-secret", "posyanduku-api", Duration::hours(24))
    }

    fn app(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/me",
                get(move |kader: AuthKader| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        kader.id.to_string()
                    }
                }),
            )
            .layer(from_fn_with_state(tokens(), require_auth))
    }

    async fn call(auth: Option<&str>) -> (StatusCode, String, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut builder = HttpRequest::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let res = app(hits.clone())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), hits.load(Ordering::SeqCst))
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers).unwrap_err().message(), MISSING_HEADER);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers).unwrap_err().message(), BAD_HEADER);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers).unwrap_err().message(), BAD_HEADER);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[tokio::test]
    async fn missing_header_is_rejected_without_calling_handler() {
        let (status, body, hits) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains(MISSING_HEADER));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let (status, body, hits) = call(Some("Bearer nonsense")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token tidak berformat benar."));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = tokens().issue_at(3, Utc::now() - Duration::hours(48)).unwrap();
        let (status, body, hits) = call(Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token sudah kadaluarsa atau belum aktif."));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let token = tokens().issue(3).unwrap();
        let (status, body, hits) = call(Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "3");
        assert_eq!(hits, 1);
    }
}
