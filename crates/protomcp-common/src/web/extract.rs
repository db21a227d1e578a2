//! axum integration: a protobuf-JSON extractor/response and error mapping.

use super::json::decode_json;
use super::render::render_proto_json;
use crate::error::Error;
use axum::async_trait;
use axum::body::Body;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use http::{Method, StatusCode};
use prost_reflect::ReflectMessage;
use tracing::warn;

/// Protobuf-JSON extractor and response.
///
/// As an extractor it decodes the request body with [`decode_json`] and the
/// default limit. As a response it renders the message with status 200.
///
/// ```no_run
/// use axum::{routing::post, Router};
/// use prost_types::DescriptorProto;
/// use protomcp_common::web::ProtoJson;
///
/// async fn echo(ProtoJson(msg): ProtoJson<DescriptorProto>) -> ProtoJson<DescriptorProto> {
///     ProtoJson(msg)
/// }
///
/// let app: Router = Router::new().route("/echo", post(echo));
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct ProtoJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ProtoJson<T>
where
    T: ReflectMessage + Default,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        decode_json(req, 0).await.map(ProtoJson)
    }
}

impl<T> IntoResponse for ProtoJson<T>
where
    T: ReflectMessage,
{
    fn into_response(self) -> Response {
        match render_proto_json(http::Response::builder(), &Method::GET, 200, &self.0) {
            Ok(resp) => resp.map(Body::new),
            Err(err) => err.into_response(),
        }
    }
}

impl Error {
    /// Returns the HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
