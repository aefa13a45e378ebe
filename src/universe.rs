use crate::error::UniverseError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Header that marks the identifier column of a CSV universe.
pub const SYMBOL_COLUMN: &str = "symbol";

/// Load the ordered, de-duplicated list of symbols to analyze.
///
/// `.csv` files are read through their `symbol` column (header matched
/// case-insensitively). `.txt` and extensionless files hold one symbol per
/// line, with blank lines and `#` comments ignored. Other formats are
/// rejected. An empty universe is not an error.
pub fn load_symbols(path: &Path) -> Result<Vec<String>, UniverseError> {
    if !path.exists() {
        return Err(UniverseError::NotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let raw = match extension.as_deref() {
        Some("csv") => read_csv_column(path)?,
        None | Some("txt") => read_lines(path)?,
        Some(other) => {
            return Err(UniverseError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: other.to_string(),
            });
        }
    };

    let symbols = dedupe(raw);
    info!(path = %path.display(), count = symbols.len(), "loaded symbol universe");
    Ok(symbols)
}

fn read_csv_column(path: &Path) -> Result<Vec<String>, UniverseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(SYMBOL_COLUMN))
        .ok_or_else(|| UniverseError::MissingSymbolColumn {
            path: path.display().to_string(),
            columns: headers.iter().map(str::to_string).collect(),
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(column).map(str::trim).filter(|v| !v.is_empty()) {
            symbols.push(value.to_string());
        }
    }
    Ok(symbols)
}

fn read_lines(path: &Path) -> Result<Vec<String>, UniverseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Keep the first occurrence of each symbol.
fn dedupe(symbols: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        if seen.insert(symbol.clone()) {
            unique.push(symbol);
        } else {
            warn!(symbol = %symbol, "duplicate symbol in universe, ignoring");
        }
    }
    unique
}
