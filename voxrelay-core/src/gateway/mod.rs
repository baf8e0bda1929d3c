//! Server side of voxrelay: request validation, voice resolution and the
//! HTTP surface in front of the speech vendor.

pub mod error;
pub mod header;
pub mod routes;
pub mod service;

pub use error::GatewayError;
pub use header::{decode_phonetic, encode_phonetic, PHONETIC_HEADER};
pub use routes::{router, serve};
pub use service::{GatewayRequest, SynthesisGateway};
