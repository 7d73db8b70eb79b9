/// ASCII / Braille / Unicode conversion for brascii.
///
/// Builds the three directional bit-indexed tables and exposes
/// character-level and text-level conversions.

pub mod codec;
pub mod error;
pub mod text;

pub use codec::{Codec, Direction, TableStatus};
pub use error::CodecError;
pub use text::{ChunkFailure, Conversion};
