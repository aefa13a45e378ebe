use nse_oi_tracker::analysis::select_window;
use nse_oi_tracker::error::InsufficientDataError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_by_rank_with_minimum_spacing() {
        let strikes = [2700.0, 2750.0, 2800.0, 2825.0, 2850.0, 2875.0, 2900.0, 2950.0, 3000.0];

        let window = select_window(&strikes, 2850.0).unwrap();

        assert_eq!(window.spacing, Some(25.0));
        assert_eq!(window.atm_strike, 2850.0);
        assert_eq!(
            window.strikes,
            vec![2750.0, 2800.0, 2825.0, 2850.0, 2875.0, 2900.0, 2950.0]
        );
    }

    #[test]
    fn test_short_ladder_returns_everything() {
        let strikes = [110.0, 100.0, 120.0, 130.0];

        let window = select_window(&strikes, 117.0).unwrap();

        assert_eq!(window.atm_strike, 120.0);
        assert_eq!(window.strikes, vec![100.0, 110.0, 120.0, 130.0]);
    }

    #[test]
    fn test_empty_ladder_fails() {
        assert_eq!(select_window(&[], 100.0), Err(InsufficientDataError));
    }

    #[test]
    fn test_midpoint_picks_lower_strike() {
        let strikes: Vec<f64> = (0..20).map(|i| 1000.0 + 20.0 * i as f64).collect();

        let window = select_window(&strikes, 1110.0).unwrap();

        assert_eq!(window.atm_strike, 1100.0);
        assert_eq!(window.len(), 7);
        assert_eq!(window.strikes.first(), Some(&1040.0));
        assert_eq!(window.strikes.last(), Some(&1160.0));
    }

    #[test]
    fn test_window_is_bounded_and_drawn_from_input() {
        let strikes: Vec<f64> = (0..40).map(|i| 50.0 + 2.5 * i as f64).collect();

        for underlying in [0.0, 51.3, 75.0, 99.99, 200.0] {
            let window = select_window(&strikes, underlying).unwrap();
            assert!(window.len() <= 7);
            assert!(window.strikes.iter().all(|s| strikes.contains(s)));
            assert!(window.contains(window.atm_strike));
        }
    }

    #[test]
    fn test_ladder_with_missing_rungs_still_gives_full_window() {
        // 140 and 170 are missing from a 10-point ladder
        let strikes = [100.0, 110.0, 120.0, 130.0, 150.0, 160.0, 180.0, 190.0, 200.0];

        let window = select_window(&strikes, 152.0).unwrap();

        assert_eq!(window.spacing, Some(10.0));
        assert_eq!(window.atm_strike, 150.0);
        assert_eq!(
            window.strikes,
            vec![110.0, 120.0, 130.0, 150.0, 160.0, 180.0, 190.0]
        );
    }
}
