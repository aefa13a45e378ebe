use nse_oi_tracker::error::UniverseError;
use nse_oi_tracker::universe::load_symbols;
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_symbol_column_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "fno.csv",
            "Sr,  SYMBOL ,Lot\n1, RELIANCE ,250\n2,M&M,350\n3,,100\n4,TCS,175\n",
        );

        let symbols = load_symbols(&path).unwrap();

        assert_eq!(symbols, vec!["RELIANCE", "M&M", "TCS"]);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fno.csv", "Symbol\nINFY\nTCS\nINFY\nSBIN\nTCS\n");

        assert_eq!(load_symbols(&path).unwrap(), vec!["INFY", "TCS", "SBIN"]);
    }

    #[test]
    fn test_header_only_is_empty_universe() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fno.csv", "Symbol\n");

        assert!(load_symbols(&path).unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fno.txt", "# weekly list\nHDFCBANK\n\n  ITC  \n# BAJFINANCE\nITC\n");

        assert_eq!(load_symbols(&path).unwrap(), vec!["HDFCBANK", "ITC"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_symbols(&dir.path().join("nope.csv")).unwrap_err();

        assert!(matches!(err, UniverseError::NotFound(_)));
    }

    #[test]
    fn test_missing_symbol_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fno.csv", "Ticker,Lot\nTCS,175\n");

        match load_symbols(&path) {
            Err(UniverseError::MissingSymbolColumn { columns, .. }) => {
                assert_eq!(columns, vec!["Ticker", "Lot"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_spreadsheet_is_rejected_with_clear_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fno_stock_list.xlsx");
        // Zip magic followed by non-UTF-8 bytes, like a real workbook
        std::fs::write(&path, [0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe, 0x00]).unwrap();

        let err = load_symbols(&path).unwrap_err();

        match &err {
            UniverseError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "xlsx"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(".csv or .txt"));
    }

    #[test]
    fn test_extensionless_file_is_a_plain_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "symbols", "AXISBANK\nLT\n");

        assert_eq!(load_symbols(&path).unwrap(), vec!["AXISBANK", "LT"]);
    }
}
