pub mod error;
pub mod lockfile;
pub mod signature;

pub use bstr::{BStr, BString, ByteSlice, ByteVec};
pub use error::{LockError, UtilError};

pub type Result<T> = std::result::Result<T, UtilError>;
