pub mod format;
pub mod reader;
pub mod writer;

pub use self::format::{packed_len, FormatOptions, LINE_WIDTH, SIGNATURE, VERSION};
pub use self::reader::{unpack, BinaryUnit, UnitHeader, UnitReader, WrappedWriter};
pub use self::writer::{pack_bases, BasePacker, UnitWriter};
