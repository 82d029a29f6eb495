use crate::{errors::Error, vars::MDSWEEP_API_KEY};
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

pub async fn auth(req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if is_authorized(token, &MDSWEEP_API_KEY) {
        next.run(req).await
    } else {
        Error::Unauthorized.into_response()
    }
}

fn is_authorized(token: Option<&str>, key: &str) -> bool {
    matches!(token, Some(token) if !key.is_empty() && token == key)
}
