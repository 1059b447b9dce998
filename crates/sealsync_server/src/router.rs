//! HTTP routes.

use crate::auth::AuthGate;
use crate::handler::{error_response, RequestHandler};
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use sealsync_protocol::{HttpResponse, SIGNATURE_HEADER};
use std::sync::Arc;

/// Builds the router. Every request passes the auth gate, then the
/// handler's routing decision, so this and [`RequestHandler::handle`]
/// answer identically.
pub fn router(handler: Arc<RequestHandler>) -> Router {
    Router::new()
        .route("/", any(dispatch))
        .fallback(dispatch)
        .layer(middleware::from_fn(auth_gate))
        .with_state(handler)
}

async fn auth_gate(request: Request, next: Next) -> Response {
    let admitted = match request.headers().get(AUTHORIZATION) {
        None => AuthGate::admit(None).map(str::to_owned),
        Some(value) => AuthGate::admit(Some(value.to_str().unwrap_or_default())).map(str::to_owned),
    };
    let token = match admitted {
        Ok(token) => token,
        Err(e) => return into_axum(error_response(&e)),
    };

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&token) {
        response.headers_mut().insert(SIGNATURE_HEADER, value);
    }
    response
}

async fn dispatch(
    State(handler): State<Arc<RequestHandler>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    into_axum(handler.route(method.as_str(), uri.path(), &body))
}

fn into_axum(response: HttpResponse) -> Response {
    let mut out = Response::new(Body::from(response.body));
    *out.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) =
            (HeaderName::try_from(name.as_str()), HeaderValue::from_str(value))
        {
            out.headers_mut().insert(name, value);
        }
    }
    out
}
