//! # Sidereal time and ayanamsa
//!
//! Earth-rotation angles and the sidereal zodiac offset:
//!
//! - [`gmst`] — Greenwich Mean Sidereal Time (IAU 1982 polynomial).
//! - [`sidtime`] — Greenwich **apparent** sidereal time in hours (GMST plus
//!   the equation of the equinoxes).
//! - [`local_sidereal_time`] — apparent sidereal time at an east longitude,
//!   in degrees, as consumed by the house engine.
//! - [`SiderealMode`] and [`ayanamsa`] / [`ayanamsa_ut`] — the precession
//!   offset between the tropical zodiac and a chosen sidereal reference.
//!
//! The ayanamsa is computed as the general precession in ecliptic longitude
//! accumulated since the mode's reference epoch, plus the mode's initial
//! value at that epoch. Reference epochs and initial values are the classical
//! catalog constants, held here as versioned numbers.

use crate::constants::{norm_deg, norm_rad, Degree, JulianDay, Radian, DAYS_PER_CENTURY, DPI,
    JDTOMJD, RADH, SIDEREAL_RATIO};
use crate::delta_t::delta_t;
use crate::ref_system::{equequ, prec_longitude};
use crate::constants::SECONDS_PER_DAY;

/// Julian day of the B1950-era reference epoch used by several catalogs.
const J1900: JulianDay = 2_415_020.0;

/// Sidereal reference mode: which zero point the sidereal zodiac is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SiderealMode {
    /// Fagan/Bradley (western sidereal).
    #[default]
    FaganBradley,
    /// Lahiri (Indian official).
    Lahiri,
    /// De Luce.
    DeLuce,
    /// B.V. Raman.
    Raman,
    /// Krishnamurti (KP).
    Krishnamurti,
    /// Sidereal zodiac anchored at the J2000 equinox (zero ayanamsa at J2000).
    J2000,
    /// User-supplied reference epoch and initial ayanamsa.
    Custom {
        t0: JulianDay,
        ayan_t0: Degree,
    },
}

impl SiderealMode {
    /// Reference epoch of the mode, Julian day (ET).
    pub fn t0(&self) -> JulianDay {
        match *self {
            SiderealMode::FaganBradley => 2_433_282.5,
            SiderealMode::Lahiri => 2_435_553.5,
            SiderealMode::DeLuce => J1900,
            SiderealMode::Raman => J1900,
            SiderealMode::Krishnamurti => J1900,
            SiderealMode::J2000 => crate::constants::J2000,
            SiderealMode::Custom { t0, .. } => t0,
        }
    }

    /// Ayanamsa at the reference epoch, in degrees.
    pub fn ayan_t0(&self) -> Degree {
        match *self {
            SiderealMode::FaganBradley => 24.042_044_444,
            SiderealMode::Lahiri => 23.250_182_778,
            SiderealMode::DeLuce => 26.516_666_667,
            SiderealMode::Raman => 21.013_333_333,
            SiderealMode::Krishnamurti => 22.363_888_889,
            SiderealMode::J2000 => 0.0,
            SiderealMode::Custom { ayan_t0, .. } => ayan_t0,
        }
    }

    /// Resolve a numeric mode selector of the classical call surface.
    pub fn from_index(idx: i32) -> Option<SiderealMode> {
        match idx {
            0 => Some(SiderealMode::FaganBradley),
            1 => Some(SiderealMode::Lahiri),
            2 => Some(SiderealMode::DeLuce),
            3 => Some(SiderealMode::Raman),
            5 => Some(SiderealMode::Krishnamurti),
            18 => Some(SiderealMode::J2000),
            _ => None,
        }
    }
}

/// Ayanamsa in degrees at an ET epoch, for a given sidereal mode.
///
/// Arguments
/// ---------
/// * `jd_et`: Julian day (ET/TT scale).
/// * `mode`: the sidereal reference mode.
///
/// Return
/// ------
/// * The ayanamsa in degrees, normalized to [0, 360).
///
/// See also
/// --------
/// * [`ayanamsa_ut`] – UT entry point.
pub fn ayanamsa(jd_et: JulianDay, mode: SiderealMode) -> Degree {
    let accumulated = prec_longitude(jd_et) - prec_longitude(mode.t0());
    norm_deg(mode.ayan_t0() + accumulated)
}

/// Ayanamsa in degrees at a UT epoch (ΔT applied internally).
pub fn ayanamsa_ut(jd_ut: JulianDay, mode: SiderealMode) -> Degree {
    ayanamsa(jd_ut + delta_t(jd_ut) / SECONDS_PER_DAY, mode)
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Julian day (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula for the mean
/// sidereal time at 0h UT1, plus the fractional-day correction term due to
/// Earth's rotation rate.
///
/// # Arguments
/// * `jd_ut1` - Julian day (UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(jd_ut1: JulianDay) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24_110.54841;
    const C1: f64 = 8_640_184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let tjm = jd_ut1 - JDTOMJD;

    // Extract the integer MJD (0h UT1) and compute centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - 51_544.5) / DAYS_PER_CENTURY;

    // GMST at 0h UT1 using the polynomial expression, converted to radians
    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / SECONDS_PER_DAY;

    // Contribution from the fraction of the day, scaled by the sidereal rate
    let h = tjm.fract() * DPI;
    norm_rad(gmst0 + h * SIDEREAL_RATIO)
}

/// Greenwich apparent sidereal time in hours, in [0, 24).
///
/// GMST plus the equation of the equinoxes; ΔT converts the UT argument to
/// the TT epoch the nutation series expects.
pub fn sidtime(jd_ut1: JulianDay) -> f64 {
    let jd_tt = jd_ut1 + delta_t(jd_ut1) / SECONDS_PER_DAY;
    norm_rad(gmst(jd_ut1) + equequ(jd_tt)) / RADH
}

/// Local apparent sidereal time in degrees at an east longitude.
pub fn local_sidereal_time(jd_ut1: JulianDay, geolon: Degree) -> Degree {
    norm_deg(sidtime(jd_ut1) * 15.0 + geolon)
}

#[cfg(test)]
mod sidereal_test {
    use super::*;
    use crate::constants::J2000;

    #[test]
    fn test_gmst_j2000() {
        // GMST at J2000.0 = 18h41m50.5484 = 4.894961... rad.
        let g = gmst(J2000);
        assert!((g - 4.894961212789145).abs() < 1e-9, "gmst = {g}");
    }

    #[test]
    fn test_sidtime_meeus_example() {
        // Meeus example 12.a: 1987 April 10, 0h UT (JD 2446895.5):
        // apparent sidereal time = 13h10m46.1351s = 13.179482h.
        let st = sidtime(2_446_895.5);
        assert!((st - 13.179_48).abs() < 1e-3, "sidtime = {st}");
    }

    #[test]
    fn test_local_sidereal_time_wraps() {
        let lst = local_sidereal_time(J2000, -250.0);
        assert!((0.0..360.0).contains(&lst));
    }

    #[test]
    fn test_ayanamsa_zero_at_reference_epoch() {
        for mode in [
            SiderealMode::FaganBradley,
            SiderealMode::Lahiri,
            SiderealMode::Raman,
        ] {
            let ayan = ayanamsa(mode.t0(), mode);
            assert!((ayan - mode.ayan_t0()).abs() < 1e-12);
        }
        assert_eq!(ayanamsa(J2000, SiderealMode::J2000), 0.0);
    }

    #[test]
    fn test_lahiri_magnitude_today() {
        // Lahiri ayanamsa is ≈ 24.1° in the mid-2020s.
        let jd = 2_460_000.0; // 2023-02-24
        let ayan = ayanamsa(jd, SiderealMode::Lahiri);
        assert!((ayan - 24.17).abs() < 0.2, "ayanamsa = {ayan}");
    }

    #[test]
    fn test_ayanamsa_increases_with_time() {
        let a1 = ayanamsa(J2000, SiderealMode::Lahiri);
        let a2 = ayanamsa(J2000 + 10.0 * 365.25, SiderealMode::Lahiri);
        assert!(a2 > a1);
        // Rate ≈ 50.3"/yr.
        let rate = (a2 - a1) / 10.0 * 3600.0;
        assert!((rate - 50.3).abs() < 0.5, "rate = {rate}");
    }

    #[test]
    fn test_sid_mode_from_index() {
        assert_eq!(SiderealMode::from_index(1), Some(SiderealMode::Lahiri));
        assert_eq!(SiderealMode::from_index(99), None);
    }
}
