use crate::api::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Port token in the host this server is reached on.
pub const SERVER_PORT_TOKEN: &str = "8500";
/// Port token of the companion detection service on the same host.
pub const COMPANION_PORT_TOKEN: &str = "8000";

/// Base URL of the companion service, derived from the request's own `Host`.
///
/// The first `8500` in the host is swapped for `8000` and the result is
/// prefixed with `http://`. Pages link to the companion through this value,
/// so the substitution must stay exactly as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionUrl(pub String);

impl CompanionUrl {
    pub fn from_host(host: &str) -> Self {
        Self(format!(
            "http://{}",
            host.replacen(SERVER_PORT_TOKEN, COMPANION_PORT_TOKEN, 1)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CompanionUrl
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            // HTTP/2 requests carry the authority in the URI instead
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .ok_or_else(|| AppError::Validation("Host header is required".to_string()))?;

        Ok(Self::from_host(&host))
    }
}
