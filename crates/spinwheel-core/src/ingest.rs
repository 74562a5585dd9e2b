// Tabular (CSV) ingestion: turns header + rows into `id-name-org` candidates.
//
// Column selection per field:
//   1. columns whose lowercased header contains a keyword, keywords in order
//   2. the positional column (1st, 2nd, 3rd)
//   3. a fixed placeholder
// The first non-empty value along that chain wins, row by row.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{info, warn};

use crate::config::IngestConfig;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("CSV file has a header but no data rows")]
    NoRows,
}

// ---------------------------------------------------------------------------
// Column plan
// ---------------------------------------------------------------------------

/// Resolved lookup order for one output field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldPlan {
    /// Column indices matched by keyword, in keyword priority order.
    keyword_columns: Vec<usize>,
    /// Positional fallback column.
    position: usize,
}

impl FieldPlan {
    fn resolve(headers: &[String], keywords: &[String], position: usize) -> Self {
        let keyword_columns = keywords
            .iter()
            .filter_map(|kw| {
                let kw = kw.to_lowercase();
                headers.iter().position(|h| h.contains(&kw))
            })
            .collect();
        FieldPlan {
            keyword_columns,
            position,
        }
    }

    fn pick<'r>(&self, record: &'r StringRecord, placeholder: &'r str) -> &'r str {
        self.keyword_columns
            .iter()
            .chain(std::iter::once(&self.position))
            .filter_map(|&idx| record.get(idx))
            .find(|value| !value.is_empty())
            .unwrap_or(placeholder)
    }
}

/// Column lookup plan for a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    id: FieldPlan,
    name: FieldPlan,
    org: FieldPlan,
}

impl ColumnPlan {
    /// Build the plan from a header row. Headers are compared lowercased.
    pub fn from_headers(headers: &StringRecord, rules: &IngestConfig) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        ColumnPlan {
            id: FieldPlan::resolve(&lowered, &rules.id_keywords, 0),
            name: FieldPlan::resolve(&lowered, &rules.name_keywords, 1),
            org: FieldPlan::resolve(&lowered, &rules.org_keywords, 2),
        }
    }

    /// Format one data row as a candidate string.
    pub fn format_record(&self, record: &StringRecord, rules: &IngestConfig) -> String {
        let id = self.id.pick(record, &rules.id_placeholder);
        let name = self.name.pick(record, &rules.name_placeholder);
        let org = self.org.pick(record, &rules.org_placeholder);
        [id, name, org].join(rules.separator.as_str())
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse CSV from any reader into candidate strings.
///
/// A header row is required. Blank rows are skipped. Rows may be shorter or
/// longer than the header; missing fields take their placeholders. A parse
/// failure aborts the whole import so the caller can leave its state
/// untouched.
pub fn candidates_from_reader<R: Read>(
    rdr: R,
    rules: &IngestConfig,
) -> Result<Vec<String>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(IngestError::MissingHeader);
    }
    let plan = ColumnPlan::from_headers(&headers, rules);

    let mut candidates = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        candidates.push(plan.format_record(&record, rules));
    }

    if candidates.is_empty() {
        warn!("CSV import produced no rows");
        return Err(IngestError::NoRows);
    }
    Ok(candidates)
}

/// Read a CSV file from disk into candidate strings.
pub fn load_table_file(path: &Path, rules: &IngestConfig) -> Result<Vec<String>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let candidates = candidates_from_reader(file, rules)?;
    info!("Imported {} candidates from {}", candidates.len(), path.display());
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
