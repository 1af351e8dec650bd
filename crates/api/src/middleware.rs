use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// CORS policy derived from `CORS_ALLOWED_ORIGINS`.
#[derive(Clone)]
pub struct CorsState {
    /// `None` = allow any origin.
    allowed_origins: Option<Arc<Vec<String>>>,
}

impl CorsState {
    pub fn new(allowed_origins: Option<Vec<String>>) -> Self {
        Self {
            allowed_origins: allowed_origins.map(Arc::new),
        }
    }

    /// The `Access-Control-Allow-Origin` value for a request origin, if the
    /// origin is allowed.
    fn allow_origin(&self, origin: Option<&str>) -> Option<HeaderValue> {
        match &self.allowed_origins {
            None => Some(HeaderValue::from_static("*")),
            Some(allowed) => {
                let origin = origin?;
                let origin = origin.trim_end_matches('/');
                if allowed.iter().any(|a| a == origin) {
                    HeaderValue::from_str(origin).ok()
                } else {
                    None
                }
            }
        }
    }
}

pub async fn cors_middleware(
    State(state): State<CorsState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allow = state.allow_origin(origin.as_deref());

    if req.method() == Method::OPTIONS {
        let mut res = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut res, allow);
        return res;
    }

    let mut res = next.run(req).await;
    apply_cors_headers(&mut res, allow);
    res
}

fn apply_cors_headers(res: &mut Response, allow: Option<HeaderValue>) {
    if let Some(allow) = allow {
        let headers = res.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_any_ignores_origin() {
        let state = CorsState::new(None);
        assert_eq!(
            state.allow_origin(None),
            Some(HeaderValue::from_static("*"))
        );
        assert_eq!(
            state.allow_origin(Some("http://evil.example")),
            Some(HeaderValue::from_static("*"))
        );
    }

    #[test]
    fn origin_list_echoes_only_allowed_origins() {
        let state = CorsState::new(Some(vec!["http://localhost:3000".to_string()]));
        assert_eq!(
            state.allow_origin(Some("http://localhost:3000")),
            Some(HeaderValue::from_static("http://localhost:3000"))
        );
        assert_eq!(state.allow_origin(Some("http://evil.example")), None);
        assert_eq!(state.allow_origin(None), None);
    }
}
