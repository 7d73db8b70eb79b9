use std::num::ParseIntError;

use br_core::TableError;
use thiserror::Error;

use crate::codec::Direction;

/// Errors originating from a conversion.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Key rejected or path missing in the underlying table.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The key resolved to no value.
    #[error("Aucune valeur pour « {key} » dans la table {direction}")]
    NoValue {
        /// Key looked up.
        key: String,
        /// Table consulted.
        direction: Direction,
    },

    /// A stored code point is not valid hexadecimal or not a Unicode scalar.
    #[error("Code point « {value} » non décodable")]
    DecodeFailure {
        /// Stored value.
        value: String,
        /// Parse failure, if the value was not hexadecimal.
        #[source]
        source: Option<ParseIntError>,
    },
}
