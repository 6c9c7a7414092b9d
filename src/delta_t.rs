//! # ΔT estimation (TT − UT1)
//!
//! Piecewise model for the accumulated difference between terrestrial time and
//! universal time, combining:
//!
//! * **Historical eras** (before 2005): the Espenak & Meeus (2006) polynomial
//!   expressions, one per era, fitted to match at era boundaries.
//! * **2005–2025**: annual observed ΔT values (IERS/USNO Bulletin A), linearly
//!   interpolated.
//! * **After 2025**: linear extrapolation at the last observed rate
//!   (~+0.02 s/yr), which tracks the nearly flat 2019–2025 behavior far better
//!   than the long-range polynomial.
//!
//! ΔT feeds every ET↔UT1 conversion, so first-order continuity at the era
//! boundaries is an invariant of this module, not a nicety: a step in ΔT would
//! surface as a time discontinuity in every downstream position query.
//!
//! References: Espenak & Meeus, "Five Millennium Canon of Solar Eclipses"
//! (NASA/TP-2006-214141); IERS Bulletin A.

use crate::constants::{JulianDay, J2000};

/// Annual observed ΔT values (seconds), 2005.0–2025.0, IERS/USNO Bulletin A.
#[rustfmt::skip]
const OBSERVED_DT: [f64; 21] = [
    // 2005   2006   2007   2008   2009   2010   2011
    64.69, 64.85, 65.15, 65.46, 65.78, 66.07, 66.32,
    // 2012   2013   2014   2015   2016   2017   2018
    66.60, 66.91, 67.28, 67.64, 68.10, 68.59, 68.97,
    // 2019   2020   2021   2022   2023   2024   2025
    69.22, 69.36, 69.36, 69.29, 69.18, 69.09, 69.13,
];

const OBSERVED_START_YEAR: f64 = 2005.0;
const OBSERVED_END_YEAR: f64 = 2025.0;

/// ΔT rate used beyond the observed table, in seconds per year.
const EXTRAPOLATION_RATE: f64 = 0.02;

/// ΔT = TT − UT1 in seconds at a given Julian day (UT scale).
///
/// Arguments
/// ---------
/// * `jd_ut`: Julian day number on the UT time scale.
///
/// Return
/// ------
/// * ΔT in SI seconds.
///
/// See also
/// --------
/// * [`crate::calendar::utc_to_jd`] – Folds this value into the ET/UT1 pair.
pub fn delta_t(jd_ut: JulianDay) -> f64 {
    let year = 2000.0 + (jd_ut - J2000) / 365.25;
    delta_t_for_year(year)
}

/// ΔT in seconds for a decimal year.
pub fn delta_t_for_year(year: f64) -> f64 {
    if year < -500.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    } else if year < 500.0 {
        let u = year / 100.0;
        poly(
            u,
            &[
                10583.6,
                -1014.41,
                33.78311,
                -5.952053,
                -0.1798452,
                0.022174192,
                0.0090316521,
            ],
        )
    } else if year < 1600.0 {
        let u = (year - 1000.0) / 100.0;
        poly(
            u,
            &[
                1574.2,
                -556.01,
                71.23472,
                0.319781,
                -0.8503463,
                -0.005050998,
                0.0083572073,
            ],
        )
    } else if year < 1700.0 {
        let t = year - 1600.0;
        120.0 - 0.9808 * t - 0.01532 * t * t + t * t * t / 7129.0
    } else if year < 1800.0 {
        let t = year - 1700.0;
        poly(t, &[8.83, 0.1603, -0.0059285, 0.00013336]) - t.powi(4) / 1_174_000.0
    } else if year < 1860.0 {
        let t = year - 1800.0;
        poly(
            t,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        )
    } else if year < 1900.0 {
        let t = year - 1860.0;
        poly(t, &[7.62, 0.5737, -0.251754, 0.01680668, -0.0004473624]) + t.powi(5) / 233_174.0
    } else if year < 1920.0 {
        let t = year - 1900.0;
        poly(t, &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197])
    } else if year < 1941.0 {
        let t = year - 1920.0;
        poly(t, &[21.20, 0.84493, -0.076100, 0.0020936])
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t * t * t / 2547.0
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t * t * t / 718.0
    } else if year < OBSERVED_START_YEAR {
        let t = year - 2000.0;
        poly(
            t,
            &[
                63.86,
                0.3345,
                -0.060374,
                0.0017275,
                0.000651814,
                0.00002373599,
            ],
        )
    } else if year < OBSERVED_END_YEAR {
        // Linear interpolation inside the observed annual table.
        let idx = (year - OBSERVED_START_YEAR).floor() as usize;
        let frac = year - OBSERVED_START_YEAR - idx as f64;
        OBSERVED_DT[idx] + frac * (OBSERVED_DT[idx + 1] - OBSERVED_DT[idx])
    } else {
        OBSERVED_DT[OBSERVED_DT.len() - 1] + (year - OBSERVED_END_YEAR) * EXTRAPOLATION_RATE
    }
}

/// Evaluate a polynomial with coefficients in increasing power order.
fn poly(x: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod delta_t_test {
    use super::*;

    #[test]
    fn test_reference_values() {
        // J2000: ΔT ≈ 63.8 s.
        let dt = delta_t(2_451_545.0);
        assert!((dt - 63.86).abs() < 0.2, "ΔT(2000) = {dt}");

        // 1900: ΔT ≈ -2.8 s.
        let dt = delta_t_for_year(1900.0);
        assert!((dt - (-2.79)).abs() < 0.5, "ΔT(1900) = {dt}");

        // 1620 (telescopic era): ΔT ≈ 100 s.
        let dt = delta_t_for_year(1620.0);
        assert!((dt - 100.0).abs() < 10.0, "ΔT(1620) = {dt}");

        // Observed 2015.
        let dt = delta_t_for_year(2015.0);
        assert!((dt - 67.64).abs() < 0.05, "ΔT(2015) = {dt}");

        // 2025 anchors the extrapolation: ΔT = 32.184 + (TAI−UTC) − DUT1
        // ≈ 69.184 − 0.05.
        let dt = delta_t_for_year(2025.0);
        assert!((dt - 69.13).abs() < 0.05, "ΔT(2025) = {dt}");
    }

    #[test]
    fn test_era_boundary_continuity() {
        let boundaries = [
            -500.0, 500.0, 1600.0, 1700.0, 1800.0, 1860.0, 1900.0, 1920.0, 1941.0, 1961.0,
            1986.0, 2005.0, 2025.0,
        ];
        for &b in &boundaries {
            let below = delta_t_for_year(b - 1e-6);
            let above = delta_t_for_year(b + 1e-6);
            assert!(
                (below - above).abs() < 1.0,
                "ΔT jump of {} s at year {b}",
                (below - above).abs()
            );
        }
    }

    #[test]
    fn test_ancient_epoch() {
        // Morrison & Stephenson estimate ~17190 s at -1000; the parabola
        // should land in the same regime.
        let dt = delta_t_for_year(-1000.0);
        assert!((15_000.0..20_000.0).contains(&dt), "ΔT(-1000) = {dt}");
    }

    #[test]
    fn test_future_extrapolation_is_linear() {
        let d1 = delta_t_for_year(2030.0);
        let d2 = delta_t_for_year(2040.0);
        assert!((d2 - d1 - 10.0 * EXTRAPOLATION_RATE).abs() < 1e-9);
    }
}
