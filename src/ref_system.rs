//! # Reference-frame transformations
//!
//! Pure rotations between the coordinate frames of the engine:
//!
//! - ecliptic ↔ equatorial through an obliquity angle ([`cotrans`]),
//! - equatorial ↔ topocentric-horizontal given local sidereal time and
//!   geographic latitude ([`equatorial_to_horizontal`], [`horizontal_to_equatorial`]),
//! - polar ↔ cartesian helpers on [`nalgebra::Vector3`].
//!
//! plus the Earth-orientation models they rely on: IAU 1976 mean obliquity
//! ([`obleq`]), a truncated IAU 1980 nutation series ([`nutn80`]), the IAU 1976
//! precession matrix ([`prec`]) and the equation of the equinoxes ([`equequ`]).
//!
//! These are math identities, not validated APIs: inputs are not range-checked.
//!
//! ## Conventions
//!
//! - [`cotrans`] follows the classical sign convention: a **positive**
//!   obliquity converts equatorial → ecliptic coordinates, a **negative**
//!   obliquity the reverse.
//! - Azimuth is measured from the **south point, westward** (the convention of
//!   the original ephemeris surface this engine reproduces).

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{norm_deg, Degree, JulianDay, Radian, DAYS_PER_CENTURY, J2000, RADEG, RADSEC};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `jd_tt`: Julian day (TT scale).
///
/// Return
/// ------
/// * The mean obliquity ε in radians.
pub fn obleq(jd_tt: JulianDay) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// True obliquity: mean obliquity plus the nutation in obliquity.
pub fn obleq_true(jd_tt: JulianDay) -> Radian {
    let (_, deps) = nutn80(jd_tt);
    obleq(jd_tt) + deps * RADSEC
}

/// One periodic term of the truncated IAU 1980 nutation series.
///
/// Multipliers of the five fundamental arguments (D, M, M', F, Ω) and the
/// sine/cosine coefficients in 0.0001 arcseconds (constant and T-linear parts).
struct NutationTerm {
    d: i8,
    m: i8,
    mp: i8,
    f: i8,
    om: i8,
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
}

/// Principal terms (|Δψ| ≥ 0.005″) of the IAU 1980 nutation theory.
#[rustfmt::skip]
const NUTATION_TERMS: [NutationTerm; 18] = [
    NutationTerm { d:  0, m: 0, mp:  0, f: 0, om: 1, psi: -171_996.0, psi_t: -174.2, eps: 92_025.0, eps_t:  8.9 },
    NutationTerm { d: -2, m: 0, mp:  0, f: 2, om: 2, psi:  -13_187.0, psi_t:   -1.6, eps:  5_736.0, eps_t: -3.1 },
    NutationTerm { d:  0, m: 0, mp:  0, f: 2, om: 2, psi:   -2_274.0, psi_t:   -0.2, eps:    977.0, eps_t: -0.5 },
    NutationTerm { d:  0, m: 0, mp:  0, f: 0, om: 2, psi:    2_062.0, psi_t:    0.2, eps:   -895.0, eps_t:  0.5 },
    NutationTerm { d:  0, m: 1, mp:  0, f: 0, om: 0, psi:    1_426.0, psi_t:   -3.4, eps:     54.0, eps_t: -0.1 },
    NutationTerm { d:  0, m: 0, mp:  1, f: 0, om: 0, psi:      712.0, psi_t:    0.1, eps:     -7.0, eps_t:  0.0 },
    NutationTerm { d: -2, m: 1, mp:  0, f: 2, om: 2, psi:     -517.0, psi_t:    1.2, eps:    224.0, eps_t: -0.6 },
    NutationTerm { d:  0, m: 0, mp:  0, f: 2, om: 1, psi:     -386.0, psi_t:   -0.4, eps:    200.0, eps_t:  0.0 },
    NutationTerm { d:  0, m: 0, mp:  1, f: 2, om: 2, psi:     -301.0, psi_t:    0.0, eps:    129.0, eps_t: -0.1 },
    NutationTerm { d: -2, m: -1, mp: 0, f: 2, om: 2, psi:      217.0, psi_t:   -0.5, eps:    -95.0, eps_t:  0.3 },
    NutationTerm { d: -2, m: 0, mp:  1, f: 0, om: 0, psi:     -158.0, psi_t:    0.0, eps:      0.0, eps_t:  0.0 },
    NutationTerm { d: -2, m: 0, mp:  0, f: 2, om: 1, psi:      129.0, psi_t:    0.1, eps:    -70.0, eps_t:  0.0 },
    NutationTerm { d:  0, m: 0, mp: -1, f: 2, om: 2, psi:      123.0, psi_t:    0.0, eps:    -53.0, eps_t:  0.0 },
    NutationTerm { d:  2, m: 0, mp:  0, f: 0, om: 0, psi:       63.0, psi_t:    0.0, eps:      0.0, eps_t:  0.0 },
    NutationTerm { d:  0, m: 0, mp:  1, f: 0, om: 1, psi:       63.0, psi_t:    0.1, eps:    -33.0, eps_t:  0.0 },
    NutationTerm { d:  2, m: 0, mp: -1, f: 2, om: 2, psi:      -59.0, psi_t:    0.0, eps:     26.0, eps_t:  0.0 },
    NutationTerm { d:  0, m: 0, mp: -1, f: 0, om: 1, psi:      -58.0, psi_t:   -0.1, eps:     32.0, eps_t:  0.0 },
    NutationTerm { d:  0, m: 0, mp:  1, f: 2, om: 1, psi:      -51.0, psi_t:    0.0, eps:     27.0, eps_t:  0.0 },
];

/// Compute the nutation angles in longitude and obliquity (IAU 1980, truncated).
///
/// The series keeps the 18 principal terms of the Wahr theory, which bounds
/// the truncation error below ~0.003″ — ample for the apparent sidereal time
/// and apparent place reductions of this engine.
///
/// Arguments
/// ---------
/// * `jd_tt`: Julian day (TT scale).
///
/// Return
/// ------
/// * `(Δψ, Δε)` in arcseconds.
///
/// See also
/// --------
/// * [`equequ`] – Equation of the equinoxes built from Δψ.
pub fn nutn80(jd_tt: JulianDay) -> (f64, f64) {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    // Fundamental arguments, in radians (Meeus 1998, ch. 22).
    let d = fund_arg(t, 297.85036, 445_267.111480, -0.0019142, 1.0 / 189_474.0);
    let m = fund_arg(t, 357.52772, 35_999.050340, -0.0001603, -1.0 / 300_000.0);
    let mp = fund_arg(t, 134.96298, 477_198.867398, 0.0086972, 1.0 / 56_250.0);
    let f = fund_arg(t, 93.27191, 483_202.017538, -0.0036825, 1.0 / 327_270.0);
    let om = fund_arg(t, 125.04452, -1_934.136261, 0.0020708, 1.0 / 450_000.0);

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for term in NUTATION_TERMS.iter() {
        let arg = term.d as f64 * d
            + term.m as f64 * m
            + term.mp as f64 * mp
            + term.f as f64 * f
            + term.om as f64 * om;
        dpsi += (term.psi + term.psi_t * t) * arg.sin();
        deps += (term.eps + term.eps_t * t) * arg.cos();
    }

    // Convert results from 0.0001 arcseconds to arcseconds
    (dpsi * 1e-4, deps * 1e-4)
}

fn fund_arg(t: f64, a0: f64, a1: f64, a2: f64, a3_inv: f64) -> Radian {
    norm_deg(((a3_inv * t + a2) * t + a1) * t + a0) * RADEG
}

/// Equation of the equinoxes Δψ·cos ε, in radians.
///
/// Links mean and apparent sidereal time.
pub fn equequ(jd_tt: JulianDay) -> Radian {
    let oblm = obleq(jd_tt);
    let (dpsi, _deps) = nutn80(jd_tt);
    RADSEC * dpsi * oblm.cos()
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians (positive = trigonometric sense).
/// * `k`: axis index (0 → X, 1 → Y, 2 → Z).
///
/// Return
/// ------
/// * `R` such that the rotated vector is `x' = R · x`.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// IAU 1976 precession matrix from the J2000 mean equator/equinox to the mean
/// equator/equinox of date.
///
/// Arguments
/// ---------
/// * `jd_tt`: target epoch, Julian day (TT scale).
///
/// Return
/// ------
/// * `R` such that `x_of_date = R · x_J2000`.
pub fn prec(jd_tt: JulianDay) -> Matrix3<f64> {
    // Precession polynomial coefficients (in radians)
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    let r1 = rotmt(-zeta, 2);
    let r2 = rotmt(theta, 1);
    let r3 = rotmt(-z, 2);

    (r1 * r2) * r3
}

/// Accumulated general precession in ecliptic longitude from J2000 to `jd_tt`,
/// in degrees (IAU 1976 pA polynomial).
pub fn prec_longitude(jd_tt: JulianDay) -> Degree {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    (5_029.0966 * t + 1.11113 * t * t - 0.000006 * t * t * t) / 3600.0
}

/// Convert spherical ecliptic/equatorial coordinates to a cartesian vector.
///
/// Arguments
/// ---------
/// * `lon`, `lat`: longitude and latitude in degrees.
/// * `dist`: radial distance (any unit; carried through).
pub fn polar_to_cartesian(lon: Degree, lat: Degree, dist: f64) -> Vector3<f64> {
    let (lon, lat) = (lon * RADEG, lat * RADEG);
    Vector3::new(
        dist * lat.cos() * lon.cos(),
        dist * lat.cos() * lon.sin(),
        dist * lat.sin(),
    )
}

/// Convert a cartesian vector back to `(lon, lat, dist)` in degrees.
///
/// The longitude is normalized to [0, 360); the zero vector maps to the
/// origin of coordinates.
pub fn cartesian_to_polar(v: &Vector3<f64>) -> (Degree, Degree, f64) {
    let dist = v.norm();
    if dist == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lon = norm_deg(v.y.atan2(v.x) / RADEG);
    let lat = (v.z / dist).asin() / RADEG;
    (lon, lat, dist)
}

/// Rotate spherical coordinates through an obliquity angle (ecliptic ↔ equatorial).
///
/// Positive `eps` converts **equatorial → ecliptic** coordinates; negative
/// `eps` the reverse. Distance is carried through unchanged.
///
/// Arguments
/// ---------
/// * `lon`, `lat`: input longitude/RA and latitude/declination in degrees.
/// * `dist`: radial distance, any unit.
/// * `eps`: obliquity in degrees, signed per the convention above.
///
/// Return
/// ------
/// * `(lon, lat, dist)` in the rotated frame, longitude in [0, 360).
pub fn cotrans(lon: Degree, lat: Degree, dist: f64, eps: Degree) -> (Degree, Degree, f64) {
    let v = polar_to_cartesian(lon, lat, if dist != 0.0 { dist } else { 1.0 });
    let rotated = rotmt(-eps * RADEG, 0) * v;
    let (lon_out, lat_out, _) = cartesian_to_polar(&rotated);
    (lon_out, lat_out, dist)
}

/// Convert equatorial coordinates to topocentric-horizontal ones.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: right ascension and declination in degrees.
/// * `lst`: local apparent sidereal time in degrees.
/// * `geolat`: geographic latitude in degrees.
///
/// Return
/// ------
/// * `(azimuth, altitude)` in degrees, azimuth from south turning westward.
pub fn equatorial_to_horizontal(
    ra: Degree,
    dec: Degree,
    lst: Degree,
    geolat: Degree,
) -> (Degree, Degree) {
    let h = (lst - ra) * RADEG;
    let (dec, phi) = (dec * RADEG, geolat * RADEG);

    let alt = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin();
    let az = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());

    (norm_deg(az / RADEG), alt / RADEG)
}

/// Convert topocentric-horizontal coordinates back to equatorial ones.
///
/// The inverse of [`equatorial_to_horizontal`] under the same azimuth
/// convention (from south, westward).
pub fn horizontal_to_equatorial(
    az: Degree,
    alt: Degree,
    lst: Degree,
    geolat: Degree,
) -> (Degree, Degree) {
    let (az, alt, phi) = (az * RADEG, alt * RADEG, geolat * RADEG);

    let dec = (phi.sin() * alt.sin() - phi.cos() * alt.cos() * az.cos()).asin();
    let h = az
        .sin()
        .atan2(az.cos() * phi.sin() + alt.tan() * phi.cos());

    (norm_deg(lst - h / RADEG), dec / RADEG)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use crate::constants::J2000;

    #[test]
    fn test_obliquity() {
        let obl = obleq(J2000);
        assert_eq!(obl, 0.40909280422232897);
    }

    #[test]
    fn test_nutation_1987() {
        // Meeus, example 22.a: 1987 April 10.0 TD (JD 2446895.5):
        // Δψ = -3.788", Δε = +9.443".
        let (dpsi, deps) = nutn80(2_446_895.5);
        assert!((dpsi - (-3.788)).abs() < 0.01, "dpsi = {dpsi}");
        assert!((deps - 9.443).abs() < 0.01, "deps = {deps}");
    }

    #[test]
    fn test_cotrans_round_trip() {
        let eps = obleq(J2000) / RADEG;
        let (lon, lat, dist) = cotrans(184.0, 1.5, 0.98, -eps);
        let (lon2, lat2, dist2) = cotrans(lon, lat, dist, eps);
        assert!((lon2 - 184.0).abs() < 1e-9);
        assert!((lat2 - 1.5).abs() < 1e-9);
        assert_eq!(dist2, 0.98);
    }

    #[test]
    fn test_cotrans_pole() {
        // The ecliptic north pole sits at dec = 90 - eps in the equatorial frame.
        let eps = obleq(J2000) / RADEG;
        let (_, lat, _) = cotrans(270.0, 90.0 - eps, 1.0, eps);
        assert!((lat - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_round_trip() {
        // Meeus example 13.b (Venus from Washington): A = 68.034, h = 15.125.
        let (az, alt) = equatorial_to_horizontal(347.3193, -6.719892, 51.67231, 38.92139);
        assert!((az - 68.034).abs() < 0.01, "az = {az}");
        assert!((alt - 15.125).abs() < 0.01, "alt = {alt}");

        let (ra, dec) = horizontal_to_equatorial(az, alt, 51.67231, 38.92139);
        assert!((ra - 347.3193).abs() < 1e-9);
        assert!((dec - (-6.719892)).abs() < 1e-9);
    }

    #[test]
    fn test_prec_is_orthonormal() {
        let r = prec(2_469_807.5);
        let should_be_identity = r * r.transpose();
        assert!((should_be_identity - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_polar_cartesian_round_trip() {
        let v = polar_to_cartesian(123.456, -45.0, 2.5);
        let (lon, lat, dist) = cartesian_to_polar(&v);
        assert!((lon - 123.456).abs() < 1e-12);
        assert!((lat - (-45.0)).abs() < 1e-12);
        assert!((dist - 2.5).abs() < 1e-12);
    }
}
