//! # Constants and type definitions for Siderea
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `siderea` library, together with the calculation flag
//! bitmask shared by the position, fixed-star and house surfaces.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Core type aliases used across the crate
//! - The [`flags`] bitmask constants
//!
//! These definitions are used by all main modules, including the calendar converter,
//! the ephemeris calculator, the house engine and the heliacal engine.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-9;

/// Julian Day of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648_000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = (EARTH_MAJOR_AXIS / 1000.) / AU;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Light travel time for one AU, in days
pub const AU_LIGHT_DAYS: f64 = AU / VLIGHT / SECONDS_PER_DAY;

/// Mean lunar parallax constant, in degrees (Moon at mean distance)
pub const MOON_MEAN_PARALLAX: f64 = 0.950_724;

/// Ratio of a sidereal day to a solar day
pub const SIDEREAL_RATIO: f64 = 1.002_737_909_34;

/// First Julian day of the supported ephemeris range (1 Jan -4712, JD 0)
pub const JD_MIN: f64 = 0.0;

/// Last Julian day of the supported ephemeris range (31 Dec 9999 Gregorian)
pub const JD_MAX: f64 = 5_373_484.5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;

/// Julian day number (days, continuous time axis)
pub type JulianDay = f64;

// -------------------------------------------------------------------------------------------------
// Calculation flags
// -------------------------------------------------------------------------------------------------

/// Bitmask controlling the output frame and corrections of a position query.
///
/// Flags combine with `|`; an empty mask requests the default output:
/// apparent geocentric ecliptic tropical position of date, without speeds.
pub mod flags {
    /// Flag set for a position query, combined with bitwise or.
    pub type CalcFlag = u32;

    /// Also compute longitude/latitude/distance rates of change.
    pub const SPEED: CalcFlag = 1 << 0;
    /// Heliocentric instead of geocentric position.
    pub const HELIOCENTRIC: CalcFlag = 1 << 1;
    /// Topocentric position, using the session observer.
    pub const TOPOCENTRIC: CalcFlag = 1 << 2;
    /// Sidereal longitudes, using the session sidereal mode.
    pub const SIDEREAL: CalcFlag = 1 << 3;
    /// Equatorial output (right ascension / declination) instead of ecliptic.
    pub const EQUATORIAL: CalcFlag = 1 << 4;
    /// Geometric position: skip light-time and aberration.
    pub const TRUEPOS: CalcFlag = 1 << 5;
    /// Skip the nutation correction (mean equinox of date).
    pub const NONUT: CalcFlag = 1 << 6;
    /// Refer the position to the J2000 equinox instead of the equinox of date.
    pub const J2000_EQUINOX: CalcFlag = 1 << 7;

    /// Mask of all defined flags, for validation of caller input.
    pub const ALL: CalcFlag = SPEED
        | HELIOCENTRIC
        | TOPOCENTRIC
        | SIDEREAL
        | EQUATORIAL
        | TRUEPOS
        | NONUT
        | J2000_EQUINOX;
}

/// Normalize an angle in degrees to the [0, 360) interval.
pub fn norm_deg(x: Degree) -> Degree {
    let y = x % 360.0;
    if y < 0.0 {
        y + 360.0
    } else {
        y
    }
}

/// Normalize an angle in radians to the [0, 2π) interval.
pub fn norm_rad(x: Radian) -> Radian {
    let y = x % DPI;
    if y < 0.0 {
        y + DPI
    } else {
        y
    }
}

/// Signed difference `a - b` wrapped to (-180, 180] degrees.
pub fn diff_deg(a: Degree, b: Degree) -> Degree {
    let mut d = norm_deg(a - b);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_norm_deg() {
        assert_eq!(norm_deg(0.0), 0.0);
        assert_eq!(norm_deg(360.0), 0.0);
        assert_eq!(norm_deg(-30.0), 330.0);
        assert_eq!(norm_deg(725.0), 5.0);
    }

    #[test]
    fn test_diff_deg() {
        assert_eq!(diff_deg(10.0, 350.0), 20.0);
        assert_eq!(diff_deg(350.0, 10.0), -20.0);
        assert_eq!(diff_deg(180.0, 0.0), 180.0);
    }

    #[test]
    fn test_flag_mask() {
        use flags::*;
        assert_eq!(ALL & SPEED, SPEED);
        assert_eq!(ALL | SPEED, ALL);
        assert_eq!((SPEED | SIDEREAL) & EQUATORIAL, 0);
    }
}
