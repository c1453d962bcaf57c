//! Error taxonomy shared by the containers and the wire codec.

use thiserror::Error;

/// Errors surfaced by arena decoding and serialization.
///
/// Point operations (`get`, `insert`, `remove`, `contains*`) are
/// infallible once a container exists: arena bytes are validated during
/// deserialization, so decode failures cannot occur on in-memory data.
#[derive(Debug, Error)]
pub enum Error {
    /// Arena bytes at `offset` are not valid UTF-8. Indicates corrupt
    /// input; fatal to the operation that hit it.
    #[error("arena bytes at offset {offset} are not valid UTF-8")]
    Decode {
        offset: u64,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A deserialization invariant was violated. Fatal to the load; no
    /// partially rebuilt container is returned.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Propagated unchanged from the underlying byte sink/source. The
    /// caller owns retry policy.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
