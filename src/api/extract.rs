//! Request body extraction for endpoints whose body may be omitted

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body that may be left out entirely
///
/// An empty (or whitespace only) body yields `None`. Anything else has to be
/// JSON of the right shape, otherwise the request is rejected instead of being
/// treated as missing.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson<T>(pub Option<T>);

/// Why a request body could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRejection {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<JsonRejection> for BodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BodyRejection {
                status: e.status(),
                message: e.body_text(),
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }
        if !is_json {
            return Err(BodyRejection {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "Expected request with `Content-Type: application/json`".to_string(),
            });
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(Self(Some(value)))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
