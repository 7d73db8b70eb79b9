use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::bits::{branch_index, is_bit_string};
use crate::error::TableError;

/// The `0` and `1` children of an internal node. `None` = no key with that prefix.
#[derive(Debug, Default)]
struct Branches {
    children: [Option<Box<Node>>; 2],
}

#[derive(Debug)]
enum Node {
    Internal(Branches),
    Leaf(String),
}

impl Node {
    fn internal() -> Self {
        Self::Internal(Branches::default())
    }

    /// Branches of an internal node; `None` for a leaf.
    fn branches_mut(&mut self) -> Option<&mut Branches> {
        match self {
            Self::Internal(branches) => Some(branches),
            Self::Leaf(_) => None,
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Lines stored in the table (overwrites included).
    pub inserted: usize,
    /// Lines rejected, in source order.
    pub skipped: Vec<TableError>,
}

/// Binary trie mapping fixed-width bit strings to string values.
///
/// Leaves only ever sit at depth `width`: one edge per bit of the key.
///
/// # Example
/// ```
/// use br_core::table::BitIndexedTable;
/// let mut table = BitIndexedTable::new(8).unwrap();
/// table.insert("01000001", "A").unwrap();
/// assert_eq!(table.lookup("01000001").unwrap(), Some("A"));
/// assert_eq!(table.lookup("0100000").unwrap(), None);
/// assert!(table.lookup("01000000").is_err());
/// ```
#[derive(Debug)]
pub struct BitIndexedTable {
    width: usize,
    root: Branches,
    len: usize,
}

impl BitIndexedTable {
    /// Crée une table vide de largeur `width`.
    ///
    /// # Errors
    /// [`TableError::InvalidWidth`] if `width` is zero.
    pub fn new(width: usize) -> Result<Self, TableError> {
        if width == 0 {
            return Err(TableError::InvalidWidth { width });
        }
        Ok(Self {
            width,
            root: Branches::default(),
            len: 0,
        })
    }

    /// Key width of this table.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stocke `value` sous `key`. Last write wins.
    ///
    /// # Errors
    /// [`TableError::InvalidKey`] unless `key` is exactly `width` characters of `{0,1}`.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<(), TableError> {
        if key.len() != self.width || !is_bit_string(key) {
            return Err(self.invalid_key(key));
        }
        let Some((&last, path)) = key.as_bytes().split_last() else {
            return Err(self.invalid_key(key));
        };

        let width = self.width;
        let mut branches = &mut self.root;
        for &bit in path {
            let child = branches.children[branch_index(bit)]
                .get_or_insert_with(|| Box::new(Node::internal()));
            // Fixed width: leaves only sit at depth `width`.
            let Some(next) = child.branches_mut() else {
                return Err(TableError::InvalidKey {
                    key: key.to_owned(),
                    width,
                });
            };
            branches = next;
        }

        let slot = &mut branches.children[branch_index(last)];
        if !matches!(slot.as_deref(), Some(Node::Leaf(_))) {
            self.len += 1;
        }
        *slot = Some(Box::new(Node::Leaf(value.into())));
        Ok(())
    }

    /// Follows `key` bit by bit from the root.
    ///
    /// `key` may be shorter than `width`: landing on an internal node yields
    /// `Ok(None)`. An empty key resolves to the root and also yields `Ok(None)`.
    ///
    /// # Errors
    /// - [`TableError::InvalidKey`] if `key` contains characters outside `{0,1}`.
    /// - [`TableError::InvalidPath`] if a required child is missing, or if
    ///   bits remain once a leaf has been reached.
    pub fn lookup(&self, key: &str) -> Result<Option<&str>, TableError> {
        if !key.is_empty() && !is_bit_string(key) {
            return Err(self.invalid_key(key));
        }

        let mut branches = &self.root;
        let mut reached: Option<&Node> = None;
        for (depth, bit) in key.bytes().enumerate() {
            if let Some(node) = reached {
                match node {
                    Node::Internal(next) => branches = next,
                    Node::Leaf(_) => return Err(Self::invalid_path(key, depth)),
                }
            }
            reached = Some(
                branches.children[branch_index(bit)]
                    .as_deref()
                    .ok_or_else(|| Self::invalid_path(key, depth))?,
            );
        }

        Ok(match reached {
            Some(Node::Leaf(value)) => Some(value.as_str()),
            _ => None,
        })
    }

    /// Lazy `(path, value)` iterator over every leaf, `0` branch before `1` branch.
    ///
    /// # Example
    /// ```
    /// use br_core::table::BitIndexedTable;
    /// let mut table = BitIndexedTable::new(2).unwrap();
    /// table.insert("10", "b").unwrap();
    /// table.insert("01", "a").unwrap();
    /// let all: Vec<_> = table.entries().collect();
    /// assert_eq!(all, vec![("01".to_string(), "a"), ("10".to_string(), "b")]);
    /// ```
    #[must_use]
    pub fn entries(&self) -> Entries<'_> {
        let mut entries = Entries { stack: Vec::new() };
        entries.push_children(&self.root, "");
        entries
    }

    /// Écrit la table au format `<bits>,<value>`, une entrée par ligne.
    ///
    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (path, value) in self.entries() {
            writeln!(out, "{path},{value}")?;
        }
        out.flush()
    }

    /// Imports `<bits>,<value>` lines. Bad lines are logged and skipped.
    ///
    /// # Errors
    /// [`TableError::SourceUnavailable`] if reading the source fails.
    pub fn import<R: BufRead>(&mut self, source: R) -> Result<ImportReport, TableError> {
        self.import_named(source, "<flux>")
    }

    /// Ouvre `path` et importe son contenu.
    ///
    /// # Errors
    /// [`TableError::SourceUnavailable`] if the file cannot be opened or read.
    pub fn load(&mut self, path: &Path) -> Result<ImportReport, TableError> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|source| TableError::SourceUnavailable {
            origin: origin.clone(),
            source,
        })?;
        self.import_named(BufReader::new(file), &origin)
    }

    fn import_named<R: BufRead>(
        &mut self,
        source: R,
        origin: &str,
    ) -> Result<ImportReport, TableError> {
        let mut report = ImportReport::default();
        for (index, raw) in source.split(b'\n').enumerate() {
            let mut raw = raw.map_err(|source| TableError::SourceUnavailable {
                origin: origin.to_owned(),
                source,
            })?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            // Octets non UTF-8 remplacés par U+FFFD, la ligne reste importable.
            let line = String::from_utf8_lossy(&raw);
            match self.import_line(index + 1, &line) {
                Ok(()) => report.inserted += 1,
                Err(e) => {
                    log::warn!("{origin} : ligne ignorée : {e}");
                    report.skipped.push(e);
                }
            }
        }
        log::debug!(
            "{origin} : {} entrées importées, {} lignes ignorées",
            report.inserted,
            report.skipped.len()
        );
        Ok(report)
    }

    fn import_line(&mut self, line_number: usize, line: &str) -> Result<(), TableError> {
        // Later commas belong to the value.
        match line.split_once(',') {
            Some((path, value)) if !path.is_empty() => self.insert(path, value),
            _ => Err(TableError::MalformedLine {
                line_number,
                line: line.to_owned(),
            }),
        }
    }

    fn invalid_key(&self, key: &str) -> TableError {
        TableError::InvalidKey {
            key: key.to_owned(),
            width: self.width,
        }
    }

    fn invalid_path(key: &str, depth: usize) -> TableError {
        log::trace!("Chemin invalide : pas d'enfant au bit {depth} de {key}");
        TableError::InvalidPath {
            key: key.to_owned(),
            depth,
        }
    }
}

/// Depth-first leaf iterator returned by [`BitIndexedTable::entries`].
#[derive(Debug)]
pub struct Entries<'a> {
    stack: Vec<(String, &'a Node)>,
}

impl<'a> Entries<'a> {
    fn push_children(&mut self, branches: &'a Branches, path: &str) {
        // Pushed `1` first so that `0` pops first.
        for (bit, child) in ['0', '1'].into_iter().zip(&branches.children).rev() {
            if let Some(node) = child.as_deref() {
                self.stack.push((format!("{path}{bit}"), node));
            }
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (String, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((path, node)) = self.stack.pop() {
            match node {
                Node::Leaf(value) => return Some((path, value.as_str())),
                Node::Internal(branches) => self.push_children(branches, &path),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(width: usize, entries: &[(&str, &str)]) -> BitIndexedTable {
        let mut table = BitIndexedTable::new(width).unwrap();
        for (key, value) in entries {
            table.insert(key, *value).unwrap();
        }
        table
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(matches!(
            BitIndexedTable::new(0),
            Err(TableError::InvalidWidth { width: 0 })
        ));
    }

    #[test]
    fn lookup_full_partial_and_missing() {
        let t = table(8, &[("01000001", "A")]);
        assert_eq!(t.lookup("01000001").unwrap(), Some("A"));
        assert_eq!(t.lookup("0100000").unwrap(), None);
        assert!(matches!(
            t.lookup("01000000"),
            Err(TableError::InvalidPath { depth: 7, .. })
        ));
        assert_eq!(t.lookup("").unwrap(), None);
    }

    #[test]
    fn insert_rejects_bad_keys() {
        let mut t = BitIndexedTable::new(6).unwrap();
        for key in ["00000", "0000000", "00a000", "", "0000 1"] {
            assert!(
                matches!(t.insert(key, "x"), Err(TableError::InvalidKey { width: 6, .. })),
                "clé acceptée à tort : {key:?}"
            );
        }
        assert!(t.is_empty());
    }

    #[test]
    fn overwrite_keeps_last_value_only() {
        let mut t = table(6, &[("101010", "first")]);
        t.insert("101010", "second").unwrap();
        assert_eq!(t.lookup("101010").unwrap(), Some("second"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.entries().count(), 1);
    }

    #[test]
    fn shared_prefixes_reuse_internal_nodes() {
        let mut t = table(1, &[("0", "a"), ("1", "b")]);
        t.insert("0", "c").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup("0").unwrap(), Some("c"));

        let t = table(4, &[("0000", "a"), ("0001", "b"), ("0011", "c"), ("0000", "d")]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.lookup("000").unwrap(), None);
        assert_eq!(t.lookup("0000").unwrap(), Some("d"));
        assert_eq!(t.lookup("0011").unwrap(), Some("c"));
    }

    #[test]
    fn key_longer_than_width_is_invalid_path() {
        let t = table(3, &[("101", "x")]);
        assert!(matches!(
            t.lookup("1010"),
            Err(TableError::InvalidPath { depth: 3, .. })
        ));
    }

    #[test]
    fn lookup_rejects_non_binary_characters() {
        let t = table(3, &[("101", "x")]);
        assert!(matches!(t.lookup("1x1"), Err(TableError::InvalidKey { .. })));
    }

    #[test]
    fn every_inserted_key_is_retrievable() {
        let mut t = BitIndexedTable::new(6).unwrap();
        for v in 0..64u32 {
            let key = crate::bits::to_bit_string(v, 6);
            t.insert(&key, v.to_string()).unwrap();
        }
        assert_eq!(t.len(), 64);
        for v in 0..64u32 {
            let key = crate::bits::to_bit_string(v, 6);
            assert_eq!(t.lookup(&key).unwrap(), Some(v.to_string().as_str()));
        }
    }

    #[test]
    fn entries_are_depth_first_zero_before_one() {
        let t = table(3, &[("111", "h"), ("000", "a"), ("010", "c"), ("001", "b")]);
        let paths: Vec<String> = t.entries().map(|(p, _)| p).collect();
        assert_eq!(paths, ["000", "001", "010", "111"]);
        // Re-traversal restarts from the root.
        assert_eq!(t.entries().count(), 4);
    }

    #[test]
    fn import_skips_malformed_and_invalid_lines() {
        let source = "000001,a\nnot a line\n000010,b\n0001,short\n,empty\n000011,c,d\n";
        let mut t = BitIndexedTable::new(6).unwrap();
        let report = t.import(source.as_bytes()).unwrap();

        assert_eq!(report.inserted, 3);
        assert_eq!(report.skipped.len(), 3);
        assert!(matches!(
            report.skipped[0],
            TableError::MalformedLine { line_number: 2, .. }
        ));
        assert!(matches!(report.skipped[1], TableError::InvalidKey { .. }));
        assert_eq!(t.len(), 3);
        assert_eq!(t.lookup("000001").unwrap(), Some("a"));
        assert_eq!(t.lookup("000010").unwrap(), Some("b"));
        assert_eq!(t.lookup("000011").unwrap(), Some("c,d"));
    }

    #[test]
    fn import_survives_invalid_utf8_line() {
        let mut t = BitIndexedTable::new(6).unwrap();
        let report = t.import(&b"000001,a\n000010,\xff\xfe\n000011,c\n"[..]).unwrap();

        assert_eq!(report.inserted, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(t.len(), 3);
        assert_eq!(t.lookup("000001").unwrap(), Some("a"));
        assert_eq!(t.lookup("000010").unwrap(), Some("\u{FFFD}\u{FFFD}"));
        assert_eq!(t.lookup("000011").unwrap(), Some("c"));
    }

    #[test]
    fn import_handles_crlf() {
        let mut t = BitIndexedTable::new(2).unwrap();
        t.import("01,x\r\n10,y\r\n".as_bytes()).unwrap();
        assert_eq!(t.lookup("01").unwrap(), Some("x"));
        assert_eq!(t.lookup("10").unwrap(), Some("y"));
    }

    #[test]
    fn write_then_import_reproduces_table() {
        let t = table(4, &[("0000", "zero"), ("1010", "a,b"), ("0110", "six")]);
        let mut dumped = Vec::new();
        t.write_to(&mut dumped).unwrap();
        assert_eq!(
            String::from_utf8(dumped.clone()).unwrap(),
            "0000,zero\n0110,six\n1010,a,b\n"
        );

        let mut copy = BitIndexedTable::new(4).unwrap();
        let report = copy.import(dumped.as_slice()).unwrap();
        assert!(report.skipped.is_empty());
        assert!(copy.entries().eq(t.entries()));
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        std::fs::write(&path, "01,a\n11,b\n").unwrap();

        let mut t = BitIndexedTable::new(2).unwrap();
        let report = t.load(&path).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(t.lookup("11").unwrap(), Some("b"));

        let missing = dir.path().join("absent.txt");
        assert!(matches!(
            t.load(&missing),
            Err(TableError::SourceUnavailable { .. })
        ));
    }
}
