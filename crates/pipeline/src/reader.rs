use crate::encoding::decode_buffer;
use crate::error::Result;
use std::path::Path;
use std::rc::Rc;

pub const COL_NAME: &str = "Nome";
pub const COL_LEVEL: &str = "Nível_da_estrutura_de_tópicos";
/// The level header as it appears when the export was produced by a tool
/// that had already mangled the accents.
pub const COL_LEVEL_MOJIBAKE: &str = "N\u{FFFD}vel_da_estrutura_de_t\u{FFFD}picos";
pub const COL_DASHBOARD: &str = "Dashboard";
pub const COL_PERCENT_REAL: &str = "Porcentagem_Prev_Real";
pub const COL_PERCENT_PLANNED: &str = "Porcentagem_Prev_LB";

/// Value marking a level-4 row as dashboard-visible.
pub const DASHBOARD_FLAG: &str = "S";

/// One CSV line with header-driven field access.
///
/// A missing column, or a record shorter than the header, resolves to the
/// empty string; extra trailing fields are simply unreachable. Both cases
/// are deterministic, so a noisy export never aborts the file.
#[derive(Debug, Clone)]
pub struct RawRow {
    headers: Rc<[String]>,
    fields: Vec<String>,
}

impl RawRow {
    #[must_use]
    pub fn field(&self, column: &str) -> &str {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|index| self.fields.get(index))
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.field(COL_NAME)
    }

    /// Structure level, accepting the mojibake header variant.
    #[must_use]
    pub fn level(&self) -> &str {
        let level = self.field(COL_LEVEL);
        if level.is_empty() {
            self.field(COL_LEVEL_MOJIBAKE)
        } else {
            level
        }
    }

    #[must_use]
    pub fn dashboard_flagged(&self) -> bool {
        self.field(COL_DASHBOARD) == DASHBOARD_FLAG
    }

    #[must_use]
    pub fn percent_real(&self) -> &str {
        self.field(COL_PERCENT_REAL)
    }

    #[must_use]
    pub fn percent_planned(&self) -> &str {
        self.field(COL_PERCENT_PLANNED)
    }
}

#[derive(Debug)]
pub struct RowReadOutcome {
    pub rows: Vec<RawRow>,
    /// Rows the CSV layer rejected outright. They are dropped, not fatal.
    pub skipped: usize,
}

/// Read a file, detect its encoding and parse the semicolon-delimited rows.
///
/// An unreadable file propagates the underlying I/O error unchanged; no
/// attempt is made to guess at content.
pub fn read_rows(path: &Path) -> Result<RowReadOutcome> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_buffer(&bytes);
    log::info!(
        "decoded {} bytes from {} as {}",
        bytes.len(),
        path.display(),
        encoding.name()
    );
    parse_rows(&text)
}

/// Parse already-decoded text as semicolon-delimited records, first row as
/// header.
pub fn parse_rows(text: &str) -> Result<RowReadOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Rc<[String]> = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(RawRow {
                headers: Rc::clone(&headers),
                fields: record.iter().map(str::to_string).collect(),
            }),
            Err(err) => {
                skipped += 1;
                log::warn!("skipping malformed row: {err}");
            }
        }
    }

    log::info!("parsed {} rows ({} skipped)", rows.len(), skipped);
    Ok(RowReadOutcome { rows, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_driven_field_access() {
        let outcome = parse_rows(
            "Nome;Nível_da_estrutura_de_tópicos;Dashboard;Porcentagem_Prev_Real;Porcentagem_Prev_LB\n\
             Forno;3;;50,0;80,0\n",
        )
        .unwrap();
        assert_eq!(outcome.rows.len(), 1);
        let row = &outcome.rows[0];
        assert_eq!(row.name(), "Forno");
        assert_eq!(row.level(), "3");
        assert_eq!(row.percent_real(), "50,0");
        assert_eq!(row.percent_planned(), "80,0");
        assert!(!row.dashboard_flagged());
    }

    #[test]
    fn test_missing_columns_resolve_to_empty() {
        let outcome = parse_rows("Nome;Dashboard\nForno\n").unwrap();
        let row = &outcome.rows[0];
        assert_eq!(row.name(), "Forno");
        assert_eq!(row.field(COL_DASHBOARD), "");
        assert_eq!(row.level(), "");
        assert_eq!(row.percent_real(), "");
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let outcome = parse_rows("Nome;Dashboard\nForno;S;sobra;mais\n").unwrap();
        let row = &outcome.rows[0];
        assert_eq!(row.name(), "Forno");
        assert!(row.dashboard_flagged());
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_mojibake_level_header_is_accepted() {
        let text = format!("Nome;{COL_LEVEL_MOJIBAKE}\nForno;3\n");
        let outcome = parse_rows(&text).unwrap();
        assert_eq!(outcome.rows[0].level(), "3");
    }

    #[test]
    fn test_unreadable_file_propagates_io_error() {
        let err = read_rows(Path::new("/definitely/not/there.csv")).unwrap_err();
        assert!(matches!(err, crate::PipelineError::Io(_)));
    }
}
