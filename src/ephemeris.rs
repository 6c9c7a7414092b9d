//! # Planetary position calculator
//!
//! Core position engine of the crate. [`calc`] (ET entry point) and
//! [`calc_ut`] compute ecliptic or equatorial coordinates of a [`Body`] from
//! the analytic theories in [`crate::bodies`], then run the requested chain of
//! reductions:
//!
//! 1. geometric heliocentric/geocentric composition,
//! 2. light-time iteration (skipped with [`flags::TRUEPOS`]),
//! 3. annual aberration,
//! 4. frame reduction — nutation, or precession to J2000,
//! 5. diurnal parallax for topocentric queries,
//! 6. ayanamsa subtraction for sidereal queries,
//! 7. rotation to the equator for [`flags::EQUATORIAL`] output.
//!
//! Rates of change are obtained by symmetric finite differences of the whole
//! pipeline when [`flags::SPEED`] is set.

use nalgebra::Vector3;

use crate::bodies::{self, Body};
use crate::calendar::et_to_ut1;
use crate::constants::flags::{self, CalcFlag};
use crate::constants::{
    diff_deg, norm_deg, AstronomicalUnit, Degree, JulianDay, AU, AU_LIGHT_DAYS, DAYS_PER_CENTURY,
    ERAU, J2000, JD_MAX, JD_MIN, RADEG, SECONDS_PER_DAY,
};
use crate::delta_t::delta_t;
use crate::ref_system::{
    cartesian_to_polar, cotrans, nutn80, obleq, obleq_true, polar_to_cartesian, prec,
};
use crate::sidereal::{ayanamsa, local_sidereal_time};
use crate::siderea::Siderea;
use crate::siderea_errors::SidereaError;

/// Step used for the symmetric speed differences, in days.
const SPEED_STEP: f64 = 0.05;

/// Annual aberration constant, arcseconds.
const ABERRATION_KAPPA: f64 = 20.49552;

/// Mean geocentric distance assigned to the lunar nodes, AU.
const NODE_DISTANCE: AstronomicalUnit = 384_400.0 / AU;

/// Result of a position query.
///
/// Angles are in degrees, the distance in AU, speeds in the same units per
/// day. With [`flags::EQUATORIAL`] the `longitude`/`latitude` pair carries
/// right ascension and declination instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub longitude: Degree,
    pub latitude: Degree,
    pub distance: AstronomicalUnit,
    pub longitude_speed: f64,
    pub latitude_speed: f64,
    pub distance_speed: f64,
}

impl Position {
    fn still(longitude: Degree, latitude: Degree, distance: AstronomicalUnit) -> Position {
        Position {
            longitude,
            latitude,
            distance,
            longitude_speed: 0.0,
            latitude_speed: 0.0,
            distance_speed: 0.0,
        }
    }
}

fn check_epoch(jd: JulianDay) -> Result<(), SidereaError> {
    if !jd.is_finite() || !(JD_MIN..=JD_MAX).contains(&jd) {
        return Err(SidereaError::OutOfRange(format!(
            "Julian day {jd} outside the supported ephemeris range"
        )));
    }
    Ok(())
}

fn check_flags(body: Body, iflag: CalcFlag) -> Result<(), SidereaError> {
    if iflag & !flags::ALL != 0 {
        return Err(SidereaError::InvalidFlags(format!(
            "unknown flag bits 0x{:x}",
            iflag & !flags::ALL
        )));
    }
    if iflag & flags::HELIOCENTRIC != 0 && body.is_earth_bound() {
        return Err(SidereaError::InvalidFlags(format!(
            "heliocentric flag cannot apply to the {}",
            body.name()
        )));
    }
    if iflag & flags::SIDEREAL != 0 && iflag & (flags::EQUATORIAL | flags::J2000_EQUINOX) != 0 {
        return Err(SidereaError::InvalidFlags(
            "sidereal output combines with neither equatorial nor J2000 flags".into(),
        ));
    }
    Ok(())
}

/// Heliocentric ecliptic cartesian position, AU, equinox of date.
fn helio_vector(body: Body, jd_tt: JulianDay) -> Result<Vector3<f64>, SidereaError> {
    let (lon, lat, r) = bodies::heliocentric_position(body, jd_tt)?;
    Ok(polar_to_cartesian(lon, lat, r))
}

/// Geometric geocentric ecliptic position of date, with the light-time
/// iteration unless `truepos` is set.
fn geocentric(
    body: Body,
    jd_tt: JulianDay,
    truepos: bool,
) -> Result<(Degree, Degree, AstronomicalUnit), SidereaError> {
    match body {
        Body::Moon => Ok(bodies::moon_position(jd_tt)),
        Body::MeanNode => Ok((bodies::mean_node(jd_tt), 0.0, NODE_DISTANCE)),
        Body::TrueNode => Ok((bodies::true_node(jd_tt), 0.0, NODE_DISTANCE)),
        Body::Sun => {
            // The Sun sits at the origin of the planetary theory; the
            // geocentric direction is the anti-Earth direction and carries no
            // light-time displacement of its own.
            let earth = helio_vector(Body::Sun, jd_tt)?;
            Ok(cartesian_to_polar(&(-earth)))
        }
        _ => {
            let earth = helio_vector(Body::Sun, jd_tt)?;
            let mut planet = helio_vector(body, jd_tt)?;
            let mut geo = planet - earth;

            if !truepos {
                // Two light-time passes: antedate the planet, keep the Earth
                // at the reception epoch.
                for _ in 0..2 {
                    let tau = geo.norm() * AU_LIGHT_DAYS;
                    planet = helio_vector(body, jd_tt - tau)?;
                    geo = planet - earth;
                }
            }
            Ok(cartesian_to_polar(&geo))
        }
    }
}

/// Annual aberration in ecliptic coordinates of date (Meeus ch. 23).
fn aberration(
    lon: Degree,
    lat: Degree,
    jd_tt: JulianDay,
) -> Result<(Degree, Degree), SidereaError> {
    let earth = helio_vector(Body::Sun, jd_tt)?;
    let (sun_lon, _, _) = cartesian_to_polar(&(-earth));

    let d = (sun_lon - lon) * RADEG;
    let dlon = -ABERRATION_KAPPA * d.cos() / (lat * RADEG).cos() / 3600.0;
    let dlat = -ABERRATION_KAPPA * (lat * RADEG).sin() * d.sin() / 3600.0;
    Ok((lon + dlon, lat + dlat))
}

/// Reduce an ecliptic position from the mean equinox of date to J2000.
fn to_j2000(lon: Degree, lat: Degree, dist: f64, jd_tt: JulianDay) -> (Degree, Degree, f64) {
    let eps_date = obleq(jd_tt) / RADEG;
    let eps_2000 = obleq(J2000) / RADEG;

    let (ra, dec, _) = cotrans(lon, lat, dist, -eps_date);
    let v_date = polar_to_cartesian(ra, dec, if dist != 0.0 { dist } else { 1.0 });
    let v_2000 = prec(jd_tt).transpose() * v_date;
    let (ra0, dec0, _) = cartesian_to_polar(&v_2000);
    cotrans(ra0, dec0, dist, eps_2000)
}

/// Diurnal parallax: shift an ecliptic position of date from the geocenter to
/// the session observer.
fn to_topocentric(
    ctx: &Siderea,
    lon: Degree,
    lat: Degree,
    dist: f64,
    jd_tt: JulianDay,
    eps_deg: Degree,
) -> Result<(Degree, Degree, f64), SidereaError> {
    let observer = ctx.observer().ok_or_else(|| {
        SidereaError::InvalidFlags("topocentric flag used without a session observer".into())
    })?;

    let (rho_cos, rho_sin) = observer.parallax_factors();
    let lst = local_sidereal_time(et_to_ut1(jd_tt), observer.longitude_deg()) * RADEG;

    // Observer position in the equatorial frame of date, AU.
    let site = Vector3::new(
        ERAU * rho_cos * lst.cos(),
        ERAU * rho_cos * lst.sin(),
        ERAU * rho_sin,
    );

    let (ra, dec, _) = cotrans(lon, lat, dist, -eps_deg);
    let geo = polar_to_cartesian(ra, dec, dist);
    let topo = geo - site;
    let (ra_t, dec_t, dist_t) = cartesian_to_polar(&topo);
    let (lon_t, lat_t, _) = cotrans(ra_t, dec_t, dist_t, eps_deg);
    Ok((lon_t, lat_t, dist_t))
}

/// Single-epoch position, no speed handling.
fn calc_once(
    ctx: &Siderea,
    jd_et: JulianDay,
    body: Body,
    iflag: CalcFlag,
) -> Result<Position, SidereaError> {
    let truepos = iflag & flags::TRUEPOS != 0;

    // Heliocentric queries short-circuit the geocentric reduction chain.
    if iflag & flags::HELIOCENTRIC != 0 {
        if body == Body::Sun {
            return Ok(Position::still(0.0, 0.0, 0.0));
        }
        let (mut lon, mut lat, mut dist) = bodies::heliocentric_position(body, jd_et)?;
        if iflag & flags::J2000_EQUINOX != 0 {
            (lon, lat, dist) = to_j2000(lon, lat, dist, jd_et);
        }
        if iflag & flags::SIDEREAL != 0 {
            lon = norm_deg(lon - ayanamsa(jd_et, ctx.sid_mode()));
        }
        if iflag & flags::EQUATORIAL != 0 {
            let eps = frame_obliquity(jd_et, iflag);
            (lon, lat, dist) = cotrans(lon, lat, dist, -eps);
        }
        return Ok(Position::still(lon, lat, dist));
    }

    let (mut lon, mut lat, mut dist) = geocentric(body, jd_et, truepos)?;

    // The Moon and the nodes share the Earth's orbital motion, so annual
    // aberration applies to the Sun and the planets only.
    if !truepos && !body.is_earth_bound() {
        (lon, lat) = aberration(lon, lat, jd_et)?;
    }

    if iflag & flags::J2000_EQUINOX != 0 {
        (lon, lat, dist) = to_j2000(lon, lat, dist, jd_et);
    } else if iflag & flags::NONUT == 0 {
        let (dpsi, _) = nutn80(jd_et);
        lon = norm_deg(lon + dpsi / 3600.0);
    }

    let eps = frame_obliquity(jd_et, iflag);

    if iflag & flags::TOPOCENTRIC != 0 {
        (lon, lat, dist) = to_topocentric(ctx, lon, lat, dist, jd_et, eps)?;
    }

    if iflag & flags::SIDEREAL != 0 {
        lon = norm_deg(lon - ayanamsa(jd_et, ctx.sid_mode()));
    }

    if iflag & flags::EQUATORIAL != 0 {
        (lon, lat, dist) = cotrans(lon, lat, dist, -eps);
    }

    Ok(Position::still(lon, lat, dist))
}

/// Obliquity of the output frame in degrees: true of date, mean of date with
/// [`flags::NONUT`], J2000 with [`flags::J2000_EQUINOX`].
fn frame_obliquity(jd_et: JulianDay, iflag: CalcFlag) -> Degree {
    if iflag & flags::J2000_EQUINOX != 0 {
        obleq(J2000) / RADEG
    } else if iflag & flags::NONUT != 0 {
        obleq(jd_et) / RADEG
    } else {
        obleq_true(jd_et) / RADEG
    }
}

/// Compute the position of a body at an ET (TT) epoch.
///
/// Arguments
/// ---------
/// * `ctx`: session context (observer, sidereal mode).
/// * `jd_et`: epoch as a Julian day on the ET/TT scale.
/// * `body`: the body selector.
/// * `iflag`: bitmask from [`flags`] controlling corrections and output frame.
///
/// Return
/// ------
/// * The [`Position`] in the requested frame, or a tagged error: unknown flag
///   bits and impossible combinations map to [`SidereaError::InvalidFlags`],
///   epochs outside the ephemeris range to [`SidereaError::OutOfRange`].
///
/// See also
/// --------
/// * [`calc_ut`] – UT entry point.
pub fn calc(
    ctx: &Siderea,
    jd_et: JulianDay,
    body: Body,
    iflag: CalcFlag,
) -> Result<Position, SidereaError> {
    check_epoch(jd_et)?;
    check_flags(body, iflag)?;

    let mut pos = calc_once(ctx, jd_et, body, iflag)?;

    if iflag & flags::SPEED != 0 {
        let base = iflag & !flags::SPEED;
        let before = calc_once(ctx, jd_et - SPEED_STEP, body, base)?;
        let after = calc_once(ctx, jd_et + SPEED_STEP, body, base)?;

        pos.longitude_speed = diff_deg(after.longitude, before.longitude) / (2.0 * SPEED_STEP);
        pos.latitude_speed = (after.latitude - before.latitude) / (2.0 * SPEED_STEP);
        pos.distance_speed = (after.distance - before.distance) / (2.0 * SPEED_STEP);
    }

    Ok(pos)
}

/// Compute the position of a body at a UT epoch (ΔT applied internally).
pub fn calc_ut(
    ctx: &Siderea,
    jd_ut: JulianDay,
    body: Body,
    iflag: CalcFlag,
) -> Result<Position, SidereaError> {
    check_epoch(jd_ut)?;
    calc(ctx, jd_ut + delta_t(jd_ut) / SECONDS_PER_DAY, body, iflag)
}

/// Nodes and apsides of a body's orbit.
///
/// Each member is a [`Position`] in the frame selected by `iflag` (ecliptic of
/// date by default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodesApsides {
    pub ascending: Position,
    pub descending: Position,
    pub perihelion: Position,
    pub aphelion: Position,
}

/// Element set used by [`nod_aps_ut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodApsMethod {
    /// Mean orbital elements.
    #[default]
    Mean,
    /// Elements osculating the instantaneous orbit.
    Osculating,
}

/// Orbital nodes and apsides of a body at a UT epoch.
///
/// Planets use their mean elements: nodes at the ecliptic crossings of the
/// orbital plane, apsides on the line of the perihelion. The Moon uses the
/// mean node and the mean perigee longitude. Only [`NodApsMethod::Mean`] is
/// implemented; [`NodApsMethod::Osculating`] is rejected with
/// [`SidereaError::ComputationError`] (the osculating node of the Moon is
/// available through [`Body::TrueNode`] and `calc`). The Sun has no orbit of
/// its own and is rejected with [`SidereaError::UnknownBody`].
pub fn nod_aps_ut(
    ctx: &Siderea,
    jd_ut: JulianDay,
    body: Body,
    iflag: CalcFlag,
    method: NodApsMethod,
) -> Result<NodesApsides, SidereaError> {
    check_epoch(jd_ut)?;
    check_flags(body, iflag)?;
    if method == NodApsMethod::Osculating {
        return Err(SidereaError::ComputationError(
            "osculating nodes and apsides are not implemented; use the mean elements".into(),
        ));
    }
    let jd_et = jd_ut + delta_t(jd_ut) / SECONDS_PER_DAY;

    let (asc_lon, desc_lon, peri_lon, peri_dist, apo_lon, apo_dist) = match body {
        Body::Sun | Body::MeanNode | Body::TrueNode => {
            return Err(SidereaError::UnknownBody(body.index()))
        }
        Body::Moon => {
            let node = bodies::mean_node(jd_et);
            let perigee = mean_lunar_perigee(jd_et);
            // Mean perigee/apogee distances of the lunar orbit, AU.
            let peri_d = 363_296.0 / AU;
            let apo_d = 405_504.0 / AU;
            (
                node,
                norm_deg(node + 180.0),
                perigee,
                peri_d,
                norm_deg(perigee + 180.0),
                apo_d,
            )
        }
        _ => {
            let el = bodies::mean_elements(body, jd_et)?;
            (
                el.node,
                norm_deg(el.node + 180.0),
                el.perihelion,
                el.semi_major * (1.0 - el.eccentricity),
                norm_deg(el.perihelion + 180.0),
                el.semi_major * (1.0 + el.eccentricity),
            )
        }
    };

    let reduce = |lon: Degree, dist: f64| -> Position {
        let mut lon = lon;
        let mut lat = 0.0;
        let mut dist = dist;
        if iflag & flags::J2000_EQUINOX != 0 {
            (lon, lat, dist) = to_j2000(lon, lat, dist, jd_et);
        } else if iflag & flags::NONUT == 0 {
            let (dpsi, _) = nutn80(jd_et);
            lon = norm_deg(lon + dpsi / 3600.0);
        }
        if iflag & flags::SIDEREAL != 0 {
            lon = norm_deg(lon - ayanamsa(jd_et, ctx.sid_mode()));
        }
        if iflag & flags::EQUATORIAL != 0 {
            let eps = frame_obliquity(jd_et, iflag);
            (lon, lat, dist) = cotrans(lon, lat, dist, -eps);
        }
        Position::still(lon, lat, dist)
    };

    Ok(NodesApsides {
        ascending: reduce(asc_lon, peri_dist.max(apo_dist)),
        descending: reduce(desc_lon, peri_dist.max(apo_dist)),
        perihelion: reduce(peri_lon, peri_dist),
        aphelion: reduce(apo_lon, apo_dist),
    })
}

/// Mean longitude of the lunar perigee, degrees (equinox of date).
fn mean_lunar_perigee(jd_tt: JulianDay) -> Degree {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    norm_deg(83.353_2465 + 4_069.013_7287 * t - 0.010_3200 * t * t - t.powi(3) / 80_053.0)
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::constants::J2000;

    fn ctx() -> Siderea {
        Siderea::new()
    }

    #[test]
    fn test_unknown_flags_rejected() {
        let err = calc(&ctx(), J2000, Body::Sun, 1 << 20).unwrap_err();
        assert!(matches!(err, SidereaError::InvalidFlags(_)));
    }

    #[test]
    fn test_heliocentric_moon_rejected() {
        let err = calc(&ctx(), J2000, Body::Moon, flags::HELIOCENTRIC).unwrap_err();
        assert!(matches!(err, SidereaError::InvalidFlags(_)));
    }

    #[test]
    fn test_heliocentric_sidereal_shifts_by_ayanamsa() {
        let ctx = ctx();
        let tropical = calc(&ctx, J2000, Body::Mars, flags::HELIOCENTRIC).unwrap();
        let sidereal_pos = calc(
            &ctx,
            J2000,
            Body::Mars,
            flags::HELIOCENTRIC | flags::SIDEREAL,
        )
        .unwrap();
        let shift = crate::constants::diff_deg(tropical.longitude, sidereal_pos.longitude);
        let ayan = ctx.get_ayanamsa(J2000);
        assert!((shift - ayan).abs() < 1e-9, "shift {shift} vs ayanamsa {ayan}");
        assert_eq!(tropical.latitude, sidereal_pos.latitude);
    }

    #[test]
    fn test_epoch_range() {
        let err = calc(&ctx(), 9e6, Body::Sun, 0).unwrap_err();
        assert!(matches!(err, SidereaError::OutOfRange(_)));
    }

    #[test]
    fn test_topocentric_without_observer() {
        let err = calc(&ctx(), J2000, Body::Moon, flags::TOPOCENTRIC).unwrap_err();
        assert!(matches!(err, SidereaError::InvalidFlags(_)));
    }

    #[test]
    fn test_sun_j2000_position() {
        // Apparent geocentric solar longitude at J2000.0 is close to
        // 280.46° (Capricorn), latitude within an arcsecond of zero.
        let pos = calc(&ctx(), J2000, Body::Sun, 0).unwrap();
        assert!((pos.longitude - 280.37).abs() < 0.2, "lon = {}", pos.longitude);
        assert!(pos.latitude.abs() < 0.01);
        assert!((pos.distance - 0.9833).abs() < 0.002, "r = {}", pos.distance);
    }

    #[test]
    fn test_sun_speed_near_perihelion() {
        // Around early January the Sun moves just over 1°.01/day.
        let pos = calc(&ctx(), J2000, Body::Sun, flags::SPEED).unwrap();
        assert!(
            (pos.longitude_speed - 1.019).abs() < 0.01,
            "speed = {}",
            pos.longitude_speed
        );
    }

    #[test]
    fn test_moon_speed_magnitude() {
        let pos = calc_ut(&ctx(), 2_460_000.5, Body::Moon, flags::SPEED).unwrap();
        assert!(
            (11.0..15.5).contains(&pos.longitude_speed),
            "speed = {}",
            pos.longitude_speed
        );
    }

    #[test]
    fn test_truepos_shifts_longitude() {
        // Dropping light-time and aberration moves the apparent Sun by
        // roughly 20 arcseconds.
        let apparent = calc(&ctx(), J2000, Body::Sun, 0).unwrap();
        let geometric = calc(&ctx(), J2000, Body::Sun, flags::TRUEPOS).unwrap();
        let shift = diff_deg(geometric.longitude, apparent.longitude).abs() * 3600.0;
        assert!((10.0..40.0).contains(&shift), "shift = {shift}\"");
    }

    #[test]
    fn test_equatorial_frame_differs() {
        let ecl = calc(&ctx(), 2_460_000.5, Body::Mars, 0).unwrap();
        let equ = calc(&ctx(), 2_460_000.5, Body::Mars, flags::EQUATORIAL).unwrap();
        assert!((ecl.longitude - equ.longitude).abs() > 0.01);
        assert_eq!(ecl.distance, equ.distance);
    }

    #[test]
    fn test_j2000_vs_date_equinox() {
        // Precession accumulates ~0.838°/60yr between J2000 and 2060.
        let jd = J2000 + 60.0 * 365.25;
        let date = calc(&ctx(), jd, Body::Sun, flags::NONUT).unwrap();
        let j2000 = calc(&ctx(), jd, Body::Sun, flags::J2000_EQUINOX).unwrap();
        let shift = diff_deg(date.longitude, j2000.longitude);
        assert!((shift - 0.838).abs() < 0.02, "shift = {shift}");
    }

    #[test]
    fn test_nodes_opposite() {
        let na = nod_aps_ut(&ctx(), 2_460_000.5, Body::Mars, flags::NONUT, NodApsMethod::Mean)
            .unwrap();
        let sep = diff_deg(na.descending.longitude, na.ascending.longitude).abs();
        assert!((sep - 180.0).abs() < 1e-9);
        assert!(na.perihelion.distance < na.aphelion.distance);
    }

    #[test]
    fn test_nod_aps_sun_rejected() {
        let err = nod_aps_ut(&ctx(), J2000, Body::Sun, 0, NodApsMethod::Mean).unwrap_err();
        assert!(matches!(err, SidereaError::UnknownBody(0)));
    }

    #[test]
    fn test_nod_aps_osculating_rejected() {
        let err =
            nod_aps_ut(&ctx(), J2000, Body::Mars, 0, NodApsMethod::Osculating).unwrap_err();
        assert!(matches!(err, SidereaError::ComputationError(_)));
    }
}
