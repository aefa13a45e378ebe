use nse_oi_tracker::analysis::analyze;
use nse_oi_tracker::error::{AnalysisError, InsufficientDataError};
use nse_oi_tracker::models::RawChainEntry;

/// Full ladder 100..=200 step 10 with identical legs at every strike.
fn uniform_chain(underlying: f64, ce_oi: f64, pe_oi: f64, ce_chg: f64, pe_chg: f64) -> Vec<RawChainEntry> {
    (0..=10)
        .flat_map(|i| {
            let strike = 100.0 + 10.0 * i as f64;
            [
                RawChainEntry::call(strike, ce_oi, ce_chg).with_underlying(underlying),
                RawChainEntry::put(strike, pe_oi, pe_chg).with_underlying(underlying),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_sums_seven_strike_window() {
        let entries = uniform_chain(150.0, 100.0, 300.0, 10.0, 40.0);

        let result = analyze("RELIANCE", &entries).unwrap();

        assert_eq!(result.symbol, "RELIANCE");
        assert_eq!(result.underlying_value, 150.0);
        assert_eq!(result.sum_ce_oi, 700);
        assert_eq!(result.sum_pe_oi, 2100);
        assert_eq!(result.sum_ce_change_oi, 70);
        assert_eq!(result.sum_pe_change_oi, 280);
        // (2100 - 700) / 700
        assert_eq!(result.combined_oi, 2.0);
        // (280 - 70) / 2800
        assert_eq!(result.combined_ch_oi, 0.075);
    }

    #[test]
    fn test_analyze_combined_oi_scenario() {
        // One strike carries all the open interest: CE 1000, PE 3000
        let entries = vec![
            RawChainEntry::call(500.0, 1000.0, 0.0).with_underlying(500.0),
            RawChainEntry::put(500.0, 3000.0, 0.0).with_underlying(500.0),
        ];

        let result = analyze("TCS", &entries).unwrap();

        assert_eq!(result.combined_oi, 2.0);
        assert_eq!(result.combined_ch_oi, 0.0);
    }

    #[test]
    fn test_zero_open_interest_fails() {
        let entries = uniform_chain(150.0, 0.0, 0.0, 0.0, 0.0);

        let err = analyze("ZERO", &entries).unwrap_err();

        assert_eq!(err, AnalysisError::ZeroMinOpenInterest { ce: 0, pe: 0 });
    }

    #[test]
    fn test_one_sided_open_interest_fails() {
        let entries = uniform_chain(150.0, 0.0, 500.0, 0.0, 5.0);

        assert!(matches!(
            analyze("PUTS", &entries),
            Err(AnalysisError::ZeroMinOpenInterest { ce: 0, pe: 3500 })
        ));
    }

    #[test]
    fn test_empty_chain_fails() {
        assert_eq!(analyze("EMPTY", &[]), Err(AnalysisError::EmptyChain));
    }

    #[test]
    fn test_missing_underlying_fails() {
        let entries = vec![
            RawChainEntry::call(100.0, 10.0, 0.0),
            RawChainEntry::put(100.0, 10.0, 0.0),
        ];

        assert_eq!(analyze("NOPRICE", &entries), Err(AnalysisError::MissingUnderlying));
    }

    #[test]
    fn test_insufficient_data_wraps_selector_error() {
        let err = AnalysisError::from(InsufficientDataError);
        assert_eq!(err.to_string(), "strike ladder is empty");
    }

    #[test]
    fn test_strikes_outside_window_are_ignored() {
        let mut entries = uniform_chain(150.0, 100.0, 100.0, 0.0, 0.0);
        // Far out-of-the-money rows carry huge OI and must not count
        entries.push(RawChainEntry::call(1000.0, 1e9, 1e6).with_underlying(150.0));
        entries.push(RawChainEntry::put(10.0, 1e9, 1e6).with_underlying(150.0));

        let result = analyze("WINDOW", &entries).unwrap();

        assert_eq!(result.sum_ce_oi, 700);
        assert_eq!(result.sum_pe_oi, 700);
        assert_eq!(result.combined_oi, 0.0);
    }

    #[test]
    fn test_fractional_sums_are_truncated() {
        let entries = vec![
            RawChainEntry::call(100.0, 10.4, 1.9).with_underlying(100.0),
            RawChainEntry::call(100.0, 10.4, 1.9).with_underlying(100.0),
            RawChainEntry::put(100.0, 20.0, 0.0).with_underlying(100.0),
        ];

        let result = analyze("FRACT", &entries).unwrap();

        assert_eq!(result.sum_ce_oi, 20);
        assert_eq!(result.sum_ce_change_oi, 3);
    }

    #[test]
    fn test_analysis_is_bit_identical_across_runs() {
        let entries = uniform_chain(147.3, 1234.0, 987.0, -55.0, 321.0);

        let first = analyze("SAME", &entries).unwrap();
        let second = analyze("SAME", &entries).unwrap();

        assert_eq!(first.combined_oi.to_bits(), second.combined_oi.to_bits());
        assert_eq!(first.combined_ch_oi.to_bits(), second.combined_ch_oi.to_bits());
        assert_eq!(first, second);
    }
}
