use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::{UTF_8, WINDOWS_1252};
use thiserror::Error;

use super::model::{Record, Table, dedupe_headers};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITER: u8 = b';';

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse table: {reason}")]
    Unparseable { reason: String },

    #[error("table is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

// ---------------------------------------------------------------------------
// Candidate encodings
// ---------------------------------------------------------------------------

/// A text encoding the loader may try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1,
    Iso8859_1,
    Windows1252,
    Utf8,
}

impl TextEncoding {
    /// Default priority order. Latin-1 maps every byte, so in practice it wins.
    pub const DEFAULT_CANDIDATES: [TextEncoding; 4] = [
        TextEncoding::Latin1,
        TextEncoding::Iso8859_1,
        TextEncoding::Windows1252,
        TextEncoding::Utf8,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    /// Decode `bytes`, or `None` if any byte sequence is not valid in this
    /// encoding.
    pub fn decode_strict(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => Some(decode_latin1(bytes)),
            TextEncoding::Windows1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
        }
    }

    /// Decode `bytes`, substituting U+FFFD for anything unmappable.
    pub fn decode_lossy(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => decode_latin1(bytes),
            TextEncoding::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes).0,
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(bytes).0,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ISO-8859-1: byte value == code point. Never fails.
fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        // ASCII is valid UTF-8 byte-for-byte.
        return Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default());
    }
    Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
}

/// How the accepted text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    /// Decoded cleanly with this encoding.
    Clean(TextEncoding),
    /// Every candidate failed; decoded with this encoding, replacing
    /// undecodable bytes.
    Lossy(TextEncoding),
}

impl Decoding {
    pub fn encoding(self) -> TextEncoding {
        match self {
            Decoding::Clean(e) | Decoding::Lossy(e) => e,
        }
    }

    pub fn is_lossy(self) -> bool {
        matches!(self, Decoding::Lossy(_))
    }
}

impl fmt::Display for Decoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoding::Clean(e) => write!(f, "{e}"),
            Decoding::Lossy(e) => write!(f, "{e} (with substitutions)"),
        }
    }
}

/// A successfully loaded table plus the decoding that produced it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub decoding: Decoding,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// `;`-delimited loader that tries encodings in priority order.
#[derive(Debug, Clone)]
pub struct Loader {
    candidates: Vec<TextEncoding>,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            candidates: TextEncoding::DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate list. An empty list falls back to UTF-8.
    #[cfg(test)]
    pub fn with_candidates(mut self, candidates: &[TextEncoding]) -> Self {
        self.candidates = if candidates.is_empty() {
            vec![TextEncoding::Utf8]
        } else {
            candidates.to_vec()
        };
        self
    }

    /// Read and parse the file at `path`.
    pub fn load(&self, path: &Path) -> Result<LoadedTable, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        self.load_bytes(&bytes)
    }

    /// Decode and parse an in-memory buffer.
    ///
    /// The first candidate that both decodes and parses wins. If none decodes
    /// cleanly, the first candidate is used again in lossy mode.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<LoadedTable, LoadError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut any_decoded = false;
        let mut last_parse_error = None;

        for &encoding in &self.candidates {
            let Some(text) = encoding.decode_strict(bytes) else {
                log::debug!("{encoding}: decode error, trying next candidate");
                continue;
            };
            any_decoded = true;
            match self.parse(&text) {
                Ok(table) => {
                    return Ok(LoadedTable {
                        table,
                        decoding: Decoding::Clean(encoding),
                    });
                }
                Err(e) => {
                    log::debug!("{encoding}: decoded but failed to parse: {e}");
                    last_parse_error = Some(e);
                }
            }
        }

        if !any_decoded {
            // `with_candidates` guarantees at least one entry.
            let encoding = self.candidates.first().copied().unwrap_or(TextEncoding::Utf8);
            log::warn!("no candidate decoded cleanly, falling back to lossy {encoding}");
            let text = encoding.decode_lossy(bytes);
            let table = self.parse(&text)?;
            return Ok(LoadedTable {
                table,
                decoding: Decoding::Lossy(encoding),
            });
        }

        Err(last_parse_error.unwrap_or_else(|| LoadError::Unparseable {
            reason: "no candidate encodings".to_string(),
        }))
    }

    fn parse(&self, text: &str) -> Result<Table, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| unparseable(format!("reading header: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(unparseable("no columns to parse from file".to_string()));
        }
        let width = headers.len();

        let mut rows = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            let record = result.map_err(|e| unparseable(format!("row {}: {e}", row_no + 1)))?;
            if record.len() > width {
                return Err(unparseable(format!(
                    "row {}: expected {width} fields, saw {}",
                    row_no + 1,
                    record.len()
                )));
            }
            rows.push(Record::new(record.iter().map(str::to_string).collect()));
        }

        Ok(Table::new(dedupe_headers(headers), rows))
    }
}

fn unparseable(reason: String) -> LoadError {
    LoadError::Unparseable { reason }
}

/// Load `path` with the default candidates and `;` delimiter.
pub fn load(path: &Path) -> Result<LoadedTable, LoadError> {
    Loader::new().load(path)
}

/// Fail with [`LoadError::MissingColumns`] unless every name in `required`
/// is a header of `table`.
pub fn require_columns<'a>(
    table: &Table,
    required: impl IntoIterator<Item = &'a str>,
) -> Result<(), LoadError> {
    let missing = table.missing_columns(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn latin1_wins_even_for_utf8_input() {
        let loaded = Loader::new()
            .load_bytes("Origem;Destino\nSão Paulo;Recife\n".as_bytes())
            .unwrap();
        assert_eq!(loaded.decoding, Decoding::Clean(TextEncoding::Latin1));
        // UTF-8 "ã" read as two Latin-1 characters.
        assert_eq!(loaded.table.cell(0, "Origem"), Some("SÃ£o Paulo"));
    }

    #[test]
    fn latin1_bytes_decode_to_accented_text() {
        let bytes = b"Origem;Destino\nS\xE3o Paulo;Bel\xE9m\n";
        let loaded = Loader::new().load_bytes(bytes).unwrap();
        assert_eq!(loaded.table.cell(0, "Origem"), Some("São Paulo"));
        assert_eq!(loaded.table.cell(0, "Destino"), Some("Belém"));
    }

    #[test]
    fn later_candidate_used_when_earlier_ones_fail() {
        let loaded = Loader::new()
            .with_candidates(&[TextEncoding::Utf8, TextEncoding::Windows1252])
            .load_bytes(b"a;b\n\x80;x\n")
            .unwrap();
        assert_eq!(loaded.decoding, Decoding::Clean(TextEncoding::Windows1252));
        assert_eq!(loaded.table.cell(0, "a"), Some("€"));
    }

    #[test]
    fn lossy_fallback_replaces_undecodable_bytes() {
        let loaded = Loader::new()
            .with_candidates(&[TextEncoding::Utf8])
            .load_bytes(b"a;b\nx\xFFy;z\n")
            .unwrap();
        assert_eq!(loaded.decoding, Decoding::Lossy(TextEncoding::Utf8));
        assert!(loaded.decoding.is_lossy());
        assert_eq!(loaded.table.cell(0, "a"), Some("x\u{FFFD}y"));
    }

    #[test]
    fn blank_rows_are_dropped_and_index_is_dense() {
        let text = "a;b\n1;2\n;\n \n3;4\n;\n5;6\n";
        let table = Loader::new().load_bytes(text.as_bytes()).unwrap().table;
        assert_eq!(table.row_count(), 3);
        let firsts: Vec<_> = (0..table.row_count())
            .map(|i| table.cell(i, "a").unwrap())
            .collect();
        assert_eq!(firsts, vec!["1", "3", "5"]);
        assert!(table.rows().iter().all(|r| !r.is_blank()));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = Loader::new().load_bytes(b"a;b;c\n1\n").unwrap().table;
        assert_eq!(table.rows()[0].cells, vec!["1", "", ""]);
    }

    #[test]
    fn overlong_row_is_unparseable() {
        let err = Loader::new().load_bytes(b"a;b\n1;2;3\n").unwrap_err();
        assert!(matches!(err, LoadError::Unparseable { .. }));
    }

    #[test]
    fn lossy_fallback_that_cannot_parse_is_unparseable() {
        let err = Loader::new()
            .with_candidates(&[TextEncoding::Utf8])
            .load_bytes(b"a;b\nx\xFF;1;2\n")
            .unwrap_err();
        match err {
            LoadError::Unparseable { reason } => assert!(reason.contains("expected 2 fields")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn comma_is_not_a_delimiter() {
        let table = Loader::new().load_bytes(b"a,b\n1,2\n").unwrap().table;
        assert_eq!(table.columns(), &["a,b".to_string()]);
        assert_eq!(table.cell(0, "a,b"), Some("1,2"));
    }

    #[test]
    fn empty_input_is_unparseable() {
        let err = Loader::new().load_bytes(b"").unwrap_err();
        assert!(matches!(err, LoadError::Unparseable { .. }));
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let table = Loader::new().load_bytes(b"\xEF\xBB\xBFOrigem;x\nA;1\n").unwrap().table;
        assert_eq!(table.columns()[0], "Origem");
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn unreadable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Origem;UF_Origem\nA;SP\nB;RJ\n").unwrap();
        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded.table.row_count(), 2);
        assert_eq!(loaded.table.column_count(), 2);
    }

    #[test]
    fn require_columns_lists_what_is_missing() {
        let table = Loader::new().load_bytes(b"Origem;x\nA;1\n").unwrap().table;
        assert!(require_columns(&table, ["Origem"]).is_ok());
        match require_columns(&table, ["Origem", "Destino"]) {
            Err(LoadError::MissingColumns(cols)) => assert_eq!(cols, vec!["Destino"]),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
