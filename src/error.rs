use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Every failure the codec can produce. None of these are recoverable at the point they are
/// raised; the caller decides whether to abort the batch or move on to the next record.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "invalid .seq signature: expected {expected:?}, found {found:?}
suggestion: is this file a packed sequence unit?"
    )]
    BadSignature { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported .seq version {found} (this build reads version {expected})")]
    UnsupportedVersion { expected: u8, found: u8 },

    /// `symbol` is the raw input byte and `position` a byte offset, so a multibyte character
    /// is reported at its first byte.
    #[error("invalid base '{}' at position {position}", .symbol.escape_ascii())]
    InvalidSymbol { symbol: u8, position: usize },

    #[error("invalid strand type byte {0} (expected 1 for DNA or 2 for RNA)")]
    InvalidStrandType(u8),

    #[error("input ended early while reading the {field}")]
    TruncatedInput { field: &'static str },

    #[error("header line {line} has an empty identifier")]
    EmptyIdentifier { line: u64 },

    #[error("header is {0} bytes long, which does not fit in the 32-bit metadata length")]
    MetadataTooLong(usize),
}

impl CodecError {
    /// Maps a short read onto `TruncatedInput`, leaving any other I/O failure untouched.
    pub(crate) fn truncated(field: &'static str) -> impl FnOnce(std::io::Error) -> CodecError {
        move |e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => CodecError::TruncatedInput { field },
            _ => CodecError::Io(e),
        }
    }
}
