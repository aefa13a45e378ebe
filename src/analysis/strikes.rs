use crate::error::InsufficientDataError;

/// Strikes taken on each side of the ATM strike.
pub const STRIKES_EACH_SIDE: usize = 3;

/// ATM strike plus its neighbours by rank in the sorted ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeWindow {
    pub atm_strike: f64,
    /// Smallest positive gap between consecutive strikes; `None` for a
    /// single-strike ladder.
    pub spacing: Option<f64>,
    /// Ascending, at most `2 * STRIKES_EACH_SIDE + 1` entries.
    pub strikes: Vec<f64>,
}

impl StrikeWindow {
    pub fn contains(&self, strike: f64) -> bool {
        self.strikes.iter().any(|&s| s == strike)
    }

    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }
}

/// Select the ATM strike and up to three strikes above and below it.
///
/// Duplicates in `strikes` are collapsed. Neighbours are picked by position in
/// the sorted ladder rather than by `atm ± k * spacing`, so a ladder with a few
/// missing rungs still yields a full window.
pub fn select_window(
    strikes: &[f64],
    underlying_price: f64,
) -> Result<StrikeWindow, InsufficientDataError> {
    let ladder = sorted_ladder(strikes);
    if ladder.is_empty() {
        return Err(InsufficientDataError);
    }

    let spacing = detect_spacing(&ladder);
    let atm_index = find_atm_index(&ladder, underlying_price);

    let start = atm_index.saturating_sub(STRIKES_EACH_SIDE);
    let end = (atm_index + STRIKES_EACH_SIDE + 1).min(ladder.len());

    Ok(StrikeWindow {
        atm_strike: ladder[atm_index],
        spacing,
        strikes: ladder[start..end].to_vec(),
    })
}

/// Ascending, de-duplicated copy of the ladder.
fn sorted_ladder(strikes: &[f64]) -> Vec<f64> {
    let mut ladder = strikes.to_vec();
    ladder.sort_by(f64::total_cmp);
    ladder.dedup();
    ladder
}

/// Minimum positive difference between consecutive strikes.
pub fn detect_spacing(ladder: &[f64]) -> Option<f64> {
    ladder
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .min_by(f64::total_cmp)
}

/// Index of the strike closest to the underlying; ties go to the lower strike.
fn find_atm_index(ladder: &[f64], underlying_price: f64) -> usize {
    let mut closest = 0;
    let mut min_distance = f64::MAX;

    // Ascending scan with a strict comparison keeps the lower strike on ties
    for (idx, &strike) in ladder.iter().enumerate() {
        let distance = (strike - underlying_price).abs();
        if distance < min_distance {
            min_distance = distance;
            closest = idx;
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_atm_index_prefers_floor() {
        let ladder = vec![100.0, 105.0, 110.0];

        // Underlying at 107.5 should choose 105 (floor)
        assert_eq!(ladder[find_atm_index(&ladder, 107.5)], 105.0);

        // Underlying at 102.5 should choose 100 (floor)
        assert_eq!(ladder[find_atm_index(&ladder, 102.5)], 100.0);
    }

    #[test]
    fn test_detect_spacing_uses_minimum_gap() {
        assert_eq!(detect_spacing(&[100.0, 120.0, 130.0, 150.0]), Some(10.0));
        assert_eq!(detect_spacing(&[100.0]), None);
    }

    #[test]
    fn test_sorted_ladder_dedups() {
        let ladder = sorted_ladder(&[110.0, 100.0, 110.0, 105.0, 100.0]);
        assert_eq!(ladder, vec![100.0, 105.0, 110.0]);
    }

    #[test]
    fn test_underlying_outside_ladder() {
        let strikes = [100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0];

        let low = select_window(&strikes, 10.0).unwrap();
        assert_eq!(low.atm_strike, 100.0);
        assert_eq!(low.strikes, vec![100.0, 110.0, 120.0, 130.0]);

        let high = select_window(&strikes, 999.0).unwrap();
        assert_eq!(high.atm_strike, 180.0);
        assert_eq!(high.strikes, vec![150.0, 160.0, 170.0, 180.0]);
    }
}
