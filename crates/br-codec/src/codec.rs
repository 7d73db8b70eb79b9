use std::fmt;
use std::io::BufRead;

use br_core::bits::{is_bit_string, to_bit_string};
use br_core::config::TablesConfig;
use br_core::error::TableError;
use br_core::table::{BitIndexedTable, ImportReport};

use crate::error::CodecError;

/// Key width of ASCII characters.
pub const ASCII_WIDTH: usize = 8;
/// Key width of a Braille cell.
pub const CELL_WIDTH: usize = 6;

/// One conversion table of the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// 8-bit ASCII → Braille cell.
    AsciiToBraille,
    /// Braille cell → ASCII text.
    BrailleToAscii,
    /// Braille cell → hexadecimal Unicode code point.
    BrailleToUnicode,
}

impl Direction {
    /// All directions, in load order.
    pub const ALL: [Self; 3] = [
        Self::AsciiToBraille,
        Self::BrailleToAscii,
        Self::BrailleToUnicode,
    ];

    /// Key width of the table.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::AsciiToBraille => ASCII_WIDTH,
            Self::BrailleToAscii | Self::BrailleToUnicode => CELL_WIDTH,
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AsciiToBraille => "ascii-braille",
            Self::BrailleToAscii => "braille-ascii",
            Self::BrailleToUnicode => "braille-unicode",
        }
    }

    /// Parse a short name (see [`Direction::name`]).
    ///
    /// # Example
    /// ```
    /// use br_codec::codec::Direction;
    /// assert_eq!(Direction::from_name("braille-unicode"), Some(Direction::BrailleToUnicode));
    /// assert_eq!(Direction::from_name("morse"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load state of a single table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableStatus {
    /// Source read to the end.
    Loaded {
        /// Lines stored.
        inserted: usize,
        /// Lines skipped.
        skipped: usize,
    },
    /// Source could not be opened or read. The table stays empty.
    Unavailable(String),
}

impl TableStatus {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

#[derive(Debug)]
struct Slot {
    table: BitIndexedTable,
    status: TableStatus,
}

impl Slot {
    fn fill(
        direction: Direction,
        import: impl FnOnce(&mut BitIndexedTable) -> Result<ImportReport, TableError>,
    ) -> Result<Self, CodecError> {
        let mut table = BitIndexedTable::new(direction.width())?;
        let status = match import(&mut table) {
            Ok(report) => {
                log::info!(
                    "Table {direction} chargée : {} entrées, {} lignes ignorées",
                    table.len(),
                    report.skipped.len()
                );
                TableStatus::Loaded {
                    inserted: report.inserted,
                    skipped: report.skipped.len(),
                }
            }
            Err(e) => {
                log::error!("Table {direction} indisponible : {e}");
                // Rien de partiel : une source illisible laisse la table vide.
                table = BitIndexedTable::new(direction.width())?;
                TableStatus::Unavailable(e.to_string())
            }
        };
        Ok(Self { table, status })
    }
}

/// Converts between ASCII characters, Braille cells and Braille code points.
///
/// Holds one bit-indexed table per direction, each loaded once at
/// construction. A table whose source fails stays empty and reports
/// [`TableStatus::Unavailable`]; the others remain usable.
///
/// # Example
/// ```
/// use br_codec::Codec;
/// let codec = Codec::from_sources(
///     "01000001,100000\n".as_bytes(),
///     "100000,A\n".as_bytes(),
///     "100000,2801\n".as_bytes(),
/// ).unwrap();
/// assert_eq!(codec.char_to_braille('A').unwrap(), "100000");
/// assert_eq!(codec.braille_to_char("100000").unwrap(), "a");
/// assert_eq!(codec.braille_to_codepoint("100000").unwrap(), '\u{2801}');
/// ```
#[derive(Debug)]
pub struct Codec {
    ascii_to_braille: Slot,
    braille_to_ascii: Slot,
    braille_to_unicode: Slot,
}

impl Codec {
    /// Charge les trois tables depuis les fichiers de `config`.
    ///
    /// Unreadable files are logged and leave their table empty; they do not
    /// make construction fail.
    pub fn load(config: &TablesConfig) -> Result<Self, CodecError> {
        Ok(Self {
            ascii_to_braille: Slot::fill(Direction::AsciiToBraille, |t| {
                t.load(&config.ascii_to_braille)
            })?,
            braille_to_ascii: Slot::fill(Direction::BrailleToAscii, |t| {
                t.load(&config.braille_to_ascii)
            })?,
            braille_to_unicode: Slot::fill(Direction::BrailleToUnicode, |t| {
                t.load(&config.braille_to_unicode)
            })?,
        })
    }

    /// Build the codec from three in-memory or already-opened sources.
    pub fn from_sources<A, B, U>(
        ascii_to_braille: A,
        braille_to_ascii: B,
        braille_to_unicode: U,
    ) -> Result<Self, CodecError>
    where
        A: BufRead,
        B: BufRead,
        U: BufRead,
    {
        Ok(Self {
            ascii_to_braille: Slot::fill(Direction::AsciiToBraille, |t| {
                t.import(ascii_to_braille)
            })?,
            braille_to_ascii: Slot::fill(Direction::BrailleToAscii, |t| {
                t.import(braille_to_ascii)
            })?,
            braille_to_unicode: Slot::fill(Direction::BrailleToUnicode, |t| {
                t.import(braille_to_unicode)
            })?,
        })
    }

    fn slot(&self, direction: Direction) -> &Slot {
        match direction {
            Direction::AsciiToBraille => &self.ascii_to_braille,
            Direction::BrailleToAscii => &self.braille_to_ascii,
            Direction::BrailleToUnicode => &self.braille_to_unicode,
        }
    }

    /// Table backing `direction`.
    #[must_use]
    pub fn table(&self, direction: Direction) -> &BitIndexedTable {
        &self.slot(direction).table
    }

    /// Load state of the table backing `direction`.
    #[must_use]
    pub fn status(&self, direction: Direction) -> &TableStatus {
        &self.slot(direction).status
    }

    /// Cellule Braille du caractère `c`.
    ///
    /// The ordinal of `c` is written as 8 binary digits and looked up in the
    /// ASCII → Braille table. Ordinals above 255 are rejected as
    /// [`TableError::InvalidKey`].
    pub fn char_to_braille(&self, c: char) -> Result<String, CodecError> {
        let key = to_bit_string(u32::from(c), ASCII_WIDTH);
        if key.len() != ASCII_WIDTH {
            return Err(TableError::InvalidKey {
                key,
                width: ASCII_WIDTH,
            }
            .into());
        }
        match self.ascii_to_braille.table.lookup(&key)? {
            Some(cell) => Ok(cell.to_owned()),
            None => Err(CodecError::NoValue {
                key,
                direction: Direction::AsciiToBraille,
            }),
        }
    }

    /// Texte ASCII (en minuscules) de la cellule `cell`.
    pub fn braille_to_char(&self, cell: &str) -> Result<String, CodecError> {
        if cell.len() != CELL_WIDTH || !is_bit_string(cell) {
            return Err(TableError::InvalidKey {
                key: cell.to_owned(),
                width: CELL_WIDTH,
            }
            .into());
        }
        match self.braille_to_ascii.table.lookup(cell)? {
            Some(text) => Ok(text.to_lowercase()),
            None => Err(CodecError::NoValue {
                key: cell.to_owned(),
                direction: Direction::BrailleToAscii,
            }),
        }
    }

    /// Caractère Unicode de la cellule `cell`.
    ///
    /// The stored value is a base-16 code point. A missing or empty value is
    /// [`TableError::InvalidKey`]; an unparsable one is
    /// [`CodecError::DecodeFailure`].
    pub fn braille_to_codepoint(&self, cell: &str) -> Result<char, CodecError> {
        let value = match self.braille_to_unicode.table.lookup(cell)? {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(TableError::InvalidKey {
                    key: cell.to_owned(),
                    width: CELL_WIDTH,
                }
                .into());
            }
        };
        let code = u32::from_str_radix(value, 16).map_err(|source| CodecError::DecodeFailure {
            value: value.to_owned(),
            source: Some(source),
        })?;
        char::from_u32(code).ok_or_else(|| CodecError::DecodeFailure {
            value: value.to_owned(),
            source: None,
        })
    }
}
