//! Transport layer: wire-format details (envelope encoding, response decoding).

mod commands;
mod response;

pub use commands::{EncodeCommand, encode_command};
pub use response::{decode_api_result, decode_error_payload};
