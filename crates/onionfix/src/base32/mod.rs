//! RFC 4648 base32 over fixed-size buffers.
//!
//! Output is lower-case and never padded; callers size their buffers with
//! [`encoded_len`] so every input encodes to a whole number of symbols.

mod error;
mod rfc4648;

pub use error::*;
pub use rfc4648::*;
