//! Object identity for the tft object store.
//!
//! Every stored object is addressed by the SHA-1 digest of its canonical
//! encoding `kind SP len NUL payload`. This crate owns that digest type,
//! its hex form, and the streaming hasher that produces it.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::{ObjectId, DIGEST_LEN, HEX_LEN};
