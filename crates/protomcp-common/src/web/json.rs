//! Size-capped protobuf-JSON request decoding.

use crate::error::{BoxError, Error, Result};
use bytes::Bytes;
use http::Request;
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use prost_reflect::{DeserializeOptions, DynamicMessage, ReflectMessage};
use tracing::{debug, trace};

/// Default request body limit for [`decode_json`]: 1 MiB
pub const DEFAULT_DECODE_JSON_LIMIT: usize = 1024 * 1024;

/// Configuration for request decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum body size in bytes (0 = [`DEFAULT_DECODE_JSON_LIMIT`])
    pub limit: usize,
    /// Reject JSON objects carrying fields the message does not declare
    pub deny_unknown_fields: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DECODE_JSON_LIMIT,
            deny_unknown_fields: true,
        }
    }
}

impl DecodeConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body size limit; 0 selects the default
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets whether unknown JSON fields are rejected
    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }

    /// Returns the limit actually applied
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_DECODE_JSON_LIMIT
        } else {
            self.limit
        }
    }
}

/// Reads a JSON request body and parses it as protobuf-JSON into `T`.
///
/// At most `limit` bytes are accepted (0 selects
/// [`DEFAULT_DECODE_JSON_LIMIT`]). A larger body fails with
/// [`Error::BodyTooLarge`] before any parsing happens. Body read failures are
/// returned as [`Error::BodyRead`] and malformed JSON as [`Error::Json`].
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use http::Request;
/// use http_body_util::Full;
/// use prost_types::DescriptorProto;
/// use protomcp_common::web::decode_json;
///
/// let req = Request::new(Full::new(bytes::Bytes::from(r#"{"name":"TestMessage"}"#)));
/// let msg: DescriptorProto = decode_json(req, 0).await?;
/// assert_eq!(msg.name(), "TestMessage");
/// # Ok::<(), protomcp_common::Error>(())
/// # }).unwrap();
/// ```
pub async fn decode_json<T, B>(req: Request<B>, limit: usize) -> Result<T>
where
    T: ReflectMessage + Default,
    B: Body,
    B::Error: Into<BoxError>,
{
    decode_json_with_config(req, &DecodeConfig::new().limit(limit)).await
}

/// Like [`decode_json`], with every decoding knob taken from `config`.
pub async fn decode_json_with_config<T, B>(req: Request<B>, config: &DecodeConfig) -> Result<T>
where
    T: ReflectMessage + Default,
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = config.effective_limit();
    let body = read_body(req.into_body(), limit).await?;
    parse_proto_json(&body, config)
}

/// Applies the [`decode_json`] rules to a body that is already in memory.
pub fn decode_json_bytes<T>(body: &[u8], limit: usize) -> Result<T>
where
    T: ReflectMessage + Default,
{
    let config = DecodeConfig::new().limit(limit);
    let limit = config.effective_limit();
    if body.len() > limit {
        debug!("Rejecting {} byte body (limit {})", body.len(), limit);
        return Err(Error::BodyTooLarge { limit });
    }
    parse_proto_json(body, &config)
}

async fn read_body<B>(body: B, limit: usize) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            trace!("Read {} byte request body", bytes.len());
            Ok(bytes)
        }
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            debug!("Request body exceeds limit of {} bytes", limit);
            Err(Error::BodyTooLarge { limit })
        }
        Err(err) => Err(Error::BodyRead(err)),
    }
}

fn parse_proto_json<T>(body: &[u8], config: &DecodeConfig) -> Result<T>
where
    T: ReflectMessage + Default,
{
    let desc = T::default().descriptor();
    let options = DeserializeOptions::new().deny_unknown_fields(config.deny_unknown_fields);

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let message = DynamicMessage::deserialize_with_options(desc, &mut deserializer, &options)?;
    deserializer.end()?;

    Ok(message.transcode_to::<T>()?)
}
