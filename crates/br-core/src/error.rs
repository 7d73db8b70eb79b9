use thiserror::Error;

/// Errors originating from a bit-indexed table.
#[derive(Error, Debug)]
pub enum TableError {
    /// A table was configured with a key width of zero.
    #[error("Largeur de clé invalide : {width} (minimum 1)")]
    InvalidWidth {
        /// Requested key width.
        width: usize,
    },

    /// Key has the wrong length or contains characters outside `{0,1}`.
    #[error("Clé invalide « {key} » : {width} bits binaires attendus")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Key width of the table.
        width: usize,
    },

    /// Traversal reached a missing child.
    #[error("Chemin invalide « {key} » : aucun nœud au bit {depth}")]
    InvalidPath {
        /// The key being looked up.
        key: String,
        /// Zero-based index of the bit that could not be followed.
        depth: usize,
    },

    /// Import line without a `<bits>,<value>` shape.
    #[error("Ligne {line_number} mal formée : {line:?}")]
    MalformedLine {
        /// One-based line number in the source.
        line_number: usize,
        /// Raw line content.
        line: String,
    },

    /// Backing data source could not be opened or read.
    #[error("Source indisponible : {origin}")]
    SourceUnavailable {
        /// Path or description of the source.
        origin: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
