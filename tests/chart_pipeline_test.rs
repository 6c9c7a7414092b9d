//! End-to-end chart scenario: one civil date is pushed through the calendar
//! converter, the position pipeline, the house engine and the sidereal
//! reduction, the way a chart application consumes the crate.

use siderea::bodies::Body;
use siderea::calendar::{julday, utc_to_jd, Calendar};
use siderea::constants::diff_deg;
use siderea::constants::flags;
use siderea::houses::HouseSystem;
use siderea::sidereal::SiderealMode;
use siderea::Siderea;

const PARIS_LON: f64 = 2.336;
const PARIS_LAT: f64 = 48.853;

#[test]
fn test_equinox_chart() {
    let session = Siderea::new();
    // 2023-03-21 06:00 UTC.
    let (jd_et, jd_ut) = utc_to_jd(2023, 3, 21, 6, 0, 0.0, Calendar::Gregorian).unwrap();

    // A day after the March equinox the Sun sits in the first degrees of
    // Aries.
    let sun = session.calc(jd_et, Body::Sun, flags::SPEED).unwrap();
    assert!(sun.longitude < 2.0 || sun.longitude > 358.0, "sun at {}", sun.longitude);
    assert!((sun.longitude_speed - 0.99).abs() < 0.03);

    // Houses for the same instant: the Sun must land in the house its
    // longitude falls in.
    let houses = session
        .houses(jd_ut, PARIS_LAT, PARIS_LON, HouseSystem::Placidus)
        .unwrap();
    assert_eq!(houses.cusps[1], houses.ascendant);
    assert_eq!(houses.cusps[10], houses.mc);

    // All twelve cusps advance in zodiacal order around the wheel.
    let mut total = 0.0;
    for k in 1..=12 {
        let next = houses.cusps[if k == 12 { 1 } else { k + 1 }];
        let step = (next - houses.cusps[k]).rem_euclid(360.0);
        assert!(step > 0.0, "cusp {k} does not advance");
        total += step;
    }
    assert!((total - 360.0).abs() < 1e-6);
}

#[test]
fn test_tropical_minus_sidereal_is_ayanamsa() {
    let mut session = Siderea::new();
    session.set_sid_mode(SiderealMode::Lahiri);
    let jd = julday(2023, 3, 21, 6.0, Calendar::Gregorian);

    let tropical = session.calc(jd, Body::Moon, 0).unwrap();
    let sidereal_pos = session.calc(jd, Body::Moon, flags::SIDEREAL).unwrap();
    let ayanamsa = session.get_ayanamsa(jd);

    let shift = diff_deg(tropical.longitude, sidereal_pos.longitude);
    assert!(
        (shift - diff_deg(ayanamsa, 0.0)).abs() < 1e-9,
        "shift {shift} vs ayanamsa {ayanamsa}"
    );
}

#[test]
fn test_topocentric_moon_parallax() {
    let mut session = Siderea::new();
    session.set_topo(PARIS_LON, PARIS_LAT, 35.0).unwrap();
    let jd = julday(2023, 3, 21, 6.0, Calendar::Gregorian);

    let geocentric = session.calc(jd, Body::Moon, 0).unwrap();
    let topocentric = session.calc(jd, Body::Moon, flags::TOPOCENTRIC).unwrap();

    // Lunar diurnal parallax moves the Moon by up to about a degree.
    let shift = diff_deg(topocentric.longitude, geocentric.longitude).abs();
    assert!(shift > 0.01 && shift < 1.5, "parallax shift = {shift}");

    // For a planet the effect is tiny but nonzero.
    let geo_mars = session.calc(jd, Body::Mars, 0).unwrap();
    let topo_mars = session.calc(jd, Body::Mars, flags::TOPOCENTRIC).unwrap();
    let mars_shift = diff_deg(topo_mars.longitude, geo_mars.longitude).abs();
    assert!(mars_shift < 0.01, "mars parallax = {mars_shift}");
}

#[test]
fn test_fixstar_through_context() {
    let session = Siderea::new();
    let jd = julday(2023, 3, 21, 6.0, Calendar::Gregorian);

    let (name, spica) = session.fixstar("Spica", jd, 0).unwrap();
    assert_eq!(name, "Spica,alVir");
    // Spica's tropical longitude drifts past 204° by 2023.
    assert!((spica.longitude - 204.1).abs() < 0.3, "spica at {}", spica.longitude);
}
