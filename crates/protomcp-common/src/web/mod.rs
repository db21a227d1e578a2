//! HTTP JSON wrappers for handlers that speak protobuf-JSON.
//!
//! [`decode_json`] reads a size-capped request body into a typed message.
//! The `render_*` functions build `application/json` responses that treat
//! `HEAD` requests correctly. With the `axum` feature, [`ProtoJson`] wraps
//! both directions for axum handlers.

mod json;
mod render;

#[cfg(feature = "axum")]
mod extract;

pub use json::{
    decode_json, decode_json_bytes, decode_json_with_config, DecodeConfig,
    DEFAULT_DECODE_JSON_LIMIT,
};
pub use render::{
    marshal_json, marshal_proto_json, render_json, render_maybe_proto_json, render_proto_json,
    JsonResponse, MaybeProto, CONTENT_TYPE_JSON,
};

#[cfg(feature = "axum")]
pub use extract::ProtoJson;
