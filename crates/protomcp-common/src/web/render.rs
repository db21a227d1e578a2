//! JSON response rendering with HEAD and header normalization.
//!
//! Every renderer follows the same steps:
//!
//! 1. `Content-Type: application/json` is set unless the builder already
//!    carries a content type.
//! 2. For `HEAD` requests the payload is never marshaled. A 200 status is
//!    promoted to 204 and the body is left empty.
//! 3. Otherwise the payload is marshaled, `Content-Length` is set unless
//!    already present, and the body is attached.
//!
//! A negative status code renders as 500 and a zero code as 200.

use crate::error::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::response::Builder;
use http::{Method, Response, StatusCode};
use http_body_util::Full;
use prost_reflect::{DynamicMessage, ReflectMessage};
use serde::Serialize;
use tracing::{debug, trace};

/// Content type set on every rendered response
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Response type produced by the renderers
pub type JsonResponse = Response<Full<Bytes>>;

/// A payload that is either a protobuf message or an arbitrary serializable
/// value.
///
/// Messages are marshaled with protobuf-JSON rules (camelCase names, enum
/// names as strings); values go through their own `Serialize` impl.
#[derive(Debug)]
pub enum MaybeProto<'a, T: ?Sized> {
    /// A protobuf message in dynamic form
    Message(DynamicMessage),
    /// Any other serializable value
    Value(&'a T),
}

impl<'a, T: ?Sized> MaybeProto<'a, T> {
    /// Wraps a typed protobuf message
    pub fn message<M: ReflectMessage>(msg: &M) -> Result<Self> {
        to_dynamic(msg).map(Self::Message)
    }

    /// Wraps a plain serializable value
    pub fn value(value: &'a T) -> Self {
        Self::Value(value)
    }
}

/// Renders a protobuf message as protobuf-JSON.
///
/// ```
/// use http::{Method, Response};
/// use prost_types::DescriptorProto;
/// use protomcp_common::web::render_proto_json;
///
/// let msg = DescriptorProto { name: Some("Test".into()), ..Default::default() };
/// let resp = render_proto_json(Response::builder(), &Method::GET, 200, &msg)?;
/// assert_eq!(resp.headers()["content-type"], "application/json");
/// assert_eq!(resp.headers()["content-length"], "15");
/// # Ok::<(), protomcp_common::Error>(())
/// ```
pub fn render_proto_json<M>(
    builder: Builder,
    method: &Method,
    code: i32,
    data: &M,
) -> Result<JsonResponse>
where
    M: ReflectMessage,
{
    render_with(builder, method, code, data, |msg| marshal_proto_json(msg))
}

/// Renders any serializable value with plain JSON rules.
pub fn render_json<T>(builder: Builder, method: &Method, code: i32, data: &T) -> Result<JsonResponse>
where
    T: Serialize + ?Sized,
{
    render_with(builder, method, code, data, |value| marshal_json(value))
}

/// Renders a [`MaybeProto`], choosing the marshaler by its variant.
pub fn render_maybe_proto_json<T>(
    builder: Builder,
    method: &Method,
    code: i32,
    data: MaybeProto<'_, T>,
) -> Result<JsonResponse>
where
    T: Serialize + ?Sized,
{
    render_with(builder, method, code, data, |data| match data {
        MaybeProto::Message(msg) => Ok(serde_json::to_vec(&msg)?),
        MaybeProto::Value(value) => marshal_json(value),
    })
}

/// Marshals a protobuf message to protobuf-JSON bytes
pub fn marshal_proto_json<M: ReflectMessage>(msg: &M) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&to_dynamic(msg)?)?)
}

/// Marshals a serializable value to JSON bytes
pub fn marshal_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn to_dynamic<M: ReflectMessage>(msg: &M) -> Result<DynamicMessage> {
    let mut dynamic = DynamicMessage::new(msg.descriptor());
    dynamic.transcode_from(msg)?;
    Ok(dynamic)
}

fn render_with<D, F>(
    mut builder: Builder,
    method: &Method,
    code: i32,
    data: D,
    marshal: F,
) -> Result<JsonResponse>
where
    F: FnOnce(D) -> Result<Vec<u8>>,
{
    let mut status = resolve_status(code)?;

    headers(&mut builder)?
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(CONTENT_TYPE_JSON));

    if *method == Method::HEAD {
        if status == StatusCode::OK {
            status = StatusCode::NO_CONTENT;
        }
        trace!("Rendering HEAD response with status {}", status);
        return Ok(builder.status(status).body(Full::new(Bytes::new()))?);
    }

    let body = marshal(data)?;
    headers(&mut builder)?
        .entry(CONTENT_LENGTH)
        .or_insert(HeaderValue::from(body.len()));

    trace!("Rendering {} byte JSON response with status {}", body.len(), status);
    Ok(builder.status(status).body(Full::new(Bytes::from(body)))?)
}

fn headers(builder: &mut Builder) -> Result<&mut http::HeaderMap> {
    builder
        .headers_mut()
        .ok_or_else(|| Error::invalid_argument("response builder is in an error state"))
}

fn resolve_status(code: i32) -> Result<StatusCode> {
    match code {
        c if c < 0 => {
            debug!("Negative status code {}, rendering 500", c);
            Ok(StatusCode::INTERNAL_SERVER_ERROR)
        }
        0 => Ok(StatusCode::OK),
        c => u16::try_from(c)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .ok_or_else(|| Error::invalid_argument(format!("invalid status code {c}"))),
    }
}
