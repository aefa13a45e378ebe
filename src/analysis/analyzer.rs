use super::strikes::{self, StrikeWindow};
use crate::error::AnalysisError;
use crate::models::{OptionType, RawChainEntry, SymbolResult};
use tracing::debug;

/// Decimal places kept on both derived ratios.
pub const METRIC_DECIMALS: i32 = 4;

/// Open-interest totals over the selected strike window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OiTotals {
    pub ce_oi: i64,
    pub pe_oi: i64,
    pub ce_change_oi: i64,
    pub pe_change_oi: i64,
}

/// Analyze one symbol's option chain into a `SymbolResult`.
pub fn analyze(symbol: &str, entries: &[RawChainEntry]) -> Result<SymbolResult, AnalysisError> {
    if entries.is_empty() {
        return Err(AnalysisError::EmptyChain);
    }

    let underlying_value = entries
        .iter()
        .find_map(|e| e.underlying_price)
        .ok_or(AnalysisError::MissingUnderlying)?;

    let ladder: Vec<f64> = entries.iter().map(|e| e.strike_price).collect();
    let window = strikes::select_window(&ladder, underlying_value)?;

    debug!(
        symbol,
        underlying = underlying_value,
        atm = window.atm_strike,
        spacing = ?window.spacing,
        strikes = ?window.strikes,
        "strike window selected"
    );

    let totals = sum_window(entries, &window)?;
    let combined_oi = combined_oi(&totals)?;
    let combined_ch_oi = combined_ch_oi(&totals)?;

    Ok(SymbolResult {
        symbol: symbol.to_string(),
        underlying_value,
        sum_ce_oi: totals.ce_oi,
        sum_pe_oi: totals.pe_oi,
        sum_ce_change_oi: totals.ce_change_oi,
        sum_pe_change_oi: totals.pe_change_oi,
        combined_oi,
        combined_ch_oi,
    })
}

/// Sum OI and OI change per option type over entries inside the window.
pub fn sum_window(
    entries: &[RawChainEntry],
    window: &StrikeWindow,
) -> Result<OiTotals, AnalysisError> {
    let (mut ce_oi, mut pe_oi, mut ce_chg, mut pe_chg) = (0.0, 0.0, 0.0, 0.0);

    for entry in entries.iter().filter(|e| window.contains(e.strike_price)) {
        match entry.option_type {
            OptionType::Call => {
                ce_oi += entry.open_interest;
                ce_chg += entry.change_in_oi;
            }
            OptionType::Put => {
                pe_oi += entry.open_interest;
                pe_chg += entry.change_in_oi;
            }
        }
    }

    Ok(OiTotals {
        ce_oi: to_contracts(ce_oi)?,
        pe_oi: to_contracts(pe_oi)?,
        ce_change_oi: to_contracts(ce_chg)?,
        pe_change_oi: to_contracts(pe_chg)?,
    })
}

/// Whole contracts; fractional parts are dropped. Sums outside the `i64`
/// range are rejected instead of saturating.
fn to_contracts(sum: f64) -> Result<i64, AnalysisError> {
    // 2^63 is exact in f64, so the upper bound is exclusive
    if sum.is_finite() && sum >= i64::MIN as f64 && sum < i64::MAX as f64 {
        Ok(sum as i64)
    } else {
        Err(AnalysisError::OpenInterestOutOfRange(sum))
    }
}

/// `(PE - CE) / MIN(PE, CE)`, rounded.
pub fn combined_oi(totals: &OiTotals) -> Result<f64, AnalysisError> {
    let min = totals.pe_oi.min(totals.ce_oi);
    if min <= 0 {
        return Err(AnalysisError::ZeroMinOpenInterest {
            ce: totals.ce_oi,
            pe: totals.pe_oi,
        });
    }

    // i128 keeps sums and differences of two i64 values exact
    let diff = i128::from(totals.pe_oi) - i128::from(totals.ce_oi);
    Ok(round_metric(diff as f64 / min as f64))
}

/// `(PE change - CE change) / (PE + CE)`, rounded.
pub fn combined_ch_oi(totals: &OiTotals) -> Result<f64, AnalysisError> {
    let total = i128::from(totals.pe_oi) + i128::from(totals.ce_oi);
    if total <= 0 {
        return Err(AnalysisError::ZeroTotalOpenInterest {
            ce: totals.ce_oi,
            pe: totals.pe_oi,
        });
    }

    let diff = i128::from(totals.pe_change_oi) - i128::from(totals.ce_change_oi);
    Ok(round_metric(diff as f64 / total as f64))
}

fn round_metric(value: f64) -> f64 {
    let scale = 10f64.powi(METRIC_DECIMALS);
    (value * scale).round() / scale
}
