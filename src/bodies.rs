//! # Celestial body selectors and orbital theories
//!
//! The body catalog of the engine and the underlying analytic models:
//!
//! - [`Body`] — numeric selector of the classical call surface.
//! - [`mean_elements`] — Meeus (1998) ch. 31 mean orbital elements of the
//!   planets, referred to the mean equinox of date.
//! - [`solve_kepler`] — Newton iteration for the eccentric anomaly, with a
//!   fixed iteration budget.
//! - [`heliocentric_position`] — Kepler propagation of a planet to a TT epoch.
//! - [`moon_position`] — truncated ELP-2000/82 lunar theory (Meeus ch. 47).
//! - [`mean_node`] / [`true_node`] — lunar node longitudes.
//!
//! All angles produced here are referred to the **mean ecliptic and equinox of
//! date**; frame reductions (nutation, J2000, equatorial, …) happen in the
//! position calculator.

use crate::constants::{norm_deg, AstronomicalUnit, Degree, JulianDay, AU, DAYS_PER_CENTURY, J2000,
    RADEG};
use crate::siderea_errors::SidereaError;

/// Celestial body selector of the classical call surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// Mean ascending node of the lunar orbit.
    MeanNode,
    /// Osculating (true) ascending node of the lunar orbit.
    TrueNode,
}

impl Body {
    /// Resolve a numeric selector; fails with [`SidereaError::UnknownBody`].
    pub fn from_index(ipl: i32) -> Result<Body, SidereaError> {
        match ipl {
            0 => Ok(Body::Sun),
            1 => Ok(Body::Moon),
            2 => Ok(Body::Mercury),
            3 => Ok(Body::Venus),
            4 => Ok(Body::Mars),
            5 => Ok(Body::Jupiter),
            6 => Ok(Body::Saturn),
            7 => Ok(Body::Uranus),
            8 => Ok(Body::Neptune),
            9 => Ok(Body::Pluto),
            10 => Ok(Body::MeanNode),
            11 => Ok(Body::TrueNode),
            _ => Err(SidereaError::UnknownBody(ipl)),
        }
    }

    /// Numeric selector of the body.
    pub fn index(&self) -> i32 {
        match self {
            Body::Sun => 0,
            Body::Moon => 1,
            Body::Mercury => 2,
            Body::Venus => 3,
            Body::Mars => 4,
            Body::Jupiter => 5,
            Body::Saturn => 6,
            Body::Uranus => 7,
            Body::Neptune => 8,
            Body::Pluto => 9,
            Body::MeanNode => 10,
            Body::TrueNode => 11,
        }
    }

    /// Human-readable body name.
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::MeanNode => "mean Node",
            Body::TrueNode => "true Node",
        }
    }

    /// Resolve a body from a case-insensitive name, as used by the heliacal
    /// surface where objects are addressed by name rather than index.
    pub fn from_name(name: &str) -> Option<Body> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sun" => Some(Body::Sun),
            "moon" => Some(Body::Moon),
            "mercury" => Some(Body::Mercury),
            "venus" => Some(Body::Venus),
            "mars" => Some(Body::Mars),
            "jupiter" => Some(Body::Jupiter),
            "saturn" => Some(Body::Saturn),
            "uranus" => Some(Body::Uranus),
            "neptune" => Some(Body::Neptune),
            "pluto" => Some(Body::Pluto),
            _ => None,
        }
    }

    /// True for selectors the heliocentric flag cannot apply to.
    pub fn is_earth_bound(&self) -> bool {
        matches!(self, Body::Moon | Body::MeanNode | Body::TrueNode)
    }
}

/// Mean orbital elements of a planet at some epoch, equinox of date.
#[derive(Debug, Clone, Copy)]
pub struct MeanElements {
    /// Mean longitude L, degrees.
    pub mean_longitude: Degree,
    /// Semi-major axis, AU.
    pub semi_major: AstronomicalUnit,
    /// Eccentricity.
    pub eccentricity: f64,
    /// Inclination to the ecliptic, degrees.
    pub inclination: Degree,
    /// Longitude of the ascending node Ω, degrees.
    pub node: Degree,
    /// Longitude of perihelion ϖ, degrees.
    pub perihelion: Degree,
}

/// Cubic polynomial coefficients for one element: value = c0 + c1·T + c2·T² + c3·T³.
type ElemPoly = [f64; 4];

struct PlanetElements {
    l: ElemPoly,
    a: ElemPoly,
    e: ElemPoly,
    i: ElemPoly,
    node: ElemPoly,
    peri: ElemPoly,
}

/// Meeus (1998), Table 31.a — mean elements referred to the mean equinox of date.
#[rustfmt::skip]
fn planet_table(body: Body) -> Option<&'static PlanetElements> {
    static MERCURY: PlanetElements = PlanetElements {
        l:    [252.250906, 149_474.072_2491, 0.000_30350, 0.000_000_018],
        a:    [0.387_098_310, 0.0, 0.0, 0.0],
        e:    [0.205_631_75, 0.000_020_407, -0.000_000_0283, -0.000_000_000_18],
        i:    [7.004_986, 0.001_8215, -0.000_018_10, 0.000_000_056],
        node: [48.330_893, 1.186_1883, 0.000_175_42, 0.000_000_215],
        peri: [77.456_119, 1.556_4776, 0.000_295_44, 0.000_000_009],
    };
    static VENUS: PlanetElements = PlanetElements {
        l:    [181.979_801, 58_519.213_0302, 0.000_310_14, 0.000_000_015],
        a:    [0.723_329_820, 0.0, 0.0, 0.0],
        e:    [0.006_771_92, -0.000_047_765, 0.000_000_0981, 0.000_000_000_46],
        i:    [3.394_662, 0.001_0037, -0.000_000_88, -0.000_000_007],
        node: [76.679_920, 0.901_1206, 0.000_406_18, -0.000_000_093],
        peri: [131.563_703, 1.402_2288, -0.001_076_18, -0.000_005_678],
    };
    static EARTH: PlanetElements = PlanetElements {
        l:    [100.466_457, 36_000.769_8278, 0.000_303_22, 0.000_000_020],
        a:    [1.000_001_018, 0.0, 0.0, 0.0],
        e:    [0.016_708_63, -0.000_042_037, -0.000_000_1267, 0.000_000_000_14],
        i:    [0.0, 0.0, 0.0, 0.0],
        node: [0.0, 0.0, 0.0, 0.0],
        peri: [102.937_348, 1.719_5366, 0.000_456_88, -0.000_000_018],
    };
    static MARS: PlanetElements = PlanetElements {
        l:    [355.433, 19_141.696_4471, 0.000_310_52, 0.000_000_016],
        a:    [1.523_679_342, 0.0, 0.0, 0.0],
        e:    [0.093_400_65, 0.000_090_484, -0.000_000_0806, -0.000_000_000_25],
        i:    [1.849_726, -0.000_6011, 0.000_012_76, -0.000_000_007],
        node: [49.558_093, 0.772_0959, 0.000_015_57, 0.000_002_267],
        peri: [336.060_234, 1.841_0449, 0.000_134_77, 0.000_000_536],
    };
    static JUPITER: PlanetElements = PlanetElements {
        l:    [34.351_519, 3_036.302_7748, 0.000_223_30, 0.000_000_037],
        a:    [5.202_603_209, 0.000_000_1913, 0.0, 0.0],
        e:    [0.048_497_93, 0.000_163_225, -0.000_000_4714, -0.000_000_002_01],
        i:    [1.303_267, -0.005_4965, 0.000_004_66, -0.000_000_002],
        node: [100.464_407, 1.020_9774, 0.000_403_15, 0.000_000_404],
        peri: [14.331_207, 1.612_6352, 0.001_030_42, -0.000_004_464],
    };
    static SATURN: PlanetElements = PlanetElements {
        l:    [50.077_444, 1_223.511_0686, 0.000_519_08, -0.000_000_030],
        a:    [9.554_909_192, -0.000_002_139, 0.000_000_004, 0.0],
        e:    [0.055_548_14, -0.000_346_641, -0.000_000_6436, 0.000_000_003_40],
        i:    [2.488_879, -0.003_7362, -0.000_015_19, 0.000_000_087],
        node: [113.665_503, 0.877_0880, -0.000_121_76, -0.000_002_249],
        peri: [93.057_237, 1.963_7613, 0.000_837_53, 0.000_004_928],
    };
    static URANUS: PlanetElements = PlanetElements {
        l:    [314.055_005, 429.864_0561, 0.000_303_90, 0.000_000_026],
        a:    [19.218_446_062, -0.000_000_0372, 0.000_000_000_98, 0.0],
        e:    [0.046_381_22, -0.000_027_293, 0.000_000_0789, 0.000_000_000_24],
        i:    [0.773_197, 0.000_7744, 0.000_037_49, -0.000_000_092],
        node: [74.005_957, 0.521_1278, 0.001_339_47, 0.000_018_484],
        peri: [173.005_291, 1.486_3790, 0.000_214_06, 0.000_000_434],
    };
    static NEPTUNE: PlanetElements = PlanetElements {
        l:    [304.348_665, 219.883_3092, 0.000_308_82, 0.000_000_018],
        a:    [30.110_386_869, -0.000_000_1663, 0.000_000_000_69, 0.0],
        e:    [0.009_455_75, 0.000_006_033, 0.0, -0.000_000_000_05],
        i:    [1.769_953, -0.009_3082, -0.000_007_08, 0.000_000_027],
        node: [131.784_057, 1.102_2039, 0.000_259_52, -0.000_000_637],
        peri: [48.120_276, 1.426_2957, 0.000_384_34, 0.000_000_020],
    };
    // Pluto carries no Meeus series; osculating J2000 elements with a linear
    // mean longitude (sidereal period 247.92 yr plus general precession).
    static PLUTO: PlanetElements = PlanetElements {
        l:    [238.928_81, 146.601, 0.0, 0.0],
        a:    [39.481_686_77, 0.0, 0.0, 0.0],
        e:    [0.248_807_66, 0.0, 0.0, 0.0],
        i:    [17.141_75, 0.0, 0.0, 0.0],
        node: [110.303_47, 1.397, 0.0, 0.0],
        peri: [224.066_76, 1.397, 0.0, 0.0],
    };

    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Sun => Some(&EARTH),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        _ => None,
    }
}

fn eval(p: &ElemPoly, t: f64) -> f64 {
    ((p[3] * t + p[2]) * t + p[1]) * t + p[0]
}

/// Mean orbital elements of a planet at a TT epoch (equinox of date).
///
/// `Body::Sun` resolves to the **Earth** elements; the geocentric solar
/// position is derived from them by the position calculator. Fails with
/// [`SidereaError::UnknownBody`] for bodies without an elliptic theory
/// (Moon, nodes).
pub fn mean_elements(body: Body, jd_tt: JulianDay) -> Result<MeanElements, SidereaError> {
    let table = planet_table(body).ok_or(SidereaError::UnknownBody(body.index()))?;
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    Ok(MeanElements {
        mean_longitude: norm_deg(eval(&table.l, t)),
        semi_major: eval(&table.a, t),
        eccentricity: eval(&table.e, t),
        inclination: eval(&table.i, t),
        node: norm_deg(eval(&table.node, t)),
        perihelion: norm_deg(eval(&table.peri, t)),
    })
}

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians.
/// * `eccentricity`: orbital eccentricity (elliptic, e < 1).
///
/// Return
/// ------
/// * The eccentric anomaly E in radians; [`SidereaError::ComputationError`]
///   if the iteration budget is exhausted.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, SidereaError> {
    const ITX: usize = 30;
    const CONTR: f64 = 1e-13;

    let m = mean_anomaly;
    let mut e_anom = if eccentricity < 0.8 { m } else { std::f64::consts::PI };

    for _ in 0..ITX {
        let de = -(e_anom - eccentricity * e_anom.sin() - m) / (1.0 - eccentricity * e_anom.cos());
        e_anom += de;
        if de.abs() < CONTR {
            return Ok(e_anom);
        }
    }
    Err(SidereaError::ComputationError(format!(
        "Kepler equation did not converge (M = {mean_anomaly}, e = {eccentricity})"
    )))
}

/// Heliocentric ecliptic position of a planet, equinox of date.
///
/// Propagates the mean elements to the epoch and solves the two-body problem.
///
/// Return
/// ------
/// * `(longitude_deg, latitude_deg, distance_au)` referred to the mean
///   ecliptic and equinox of date.
pub fn heliocentric_position(
    body: Body,
    jd_tt: JulianDay,
) -> Result<(Degree, Degree, AstronomicalUnit), SidereaError> {
    let el = mean_elements(body, jd_tt)?;

    let m = norm_deg(el.mean_longitude - el.perihelion) * RADEG;
    let e_anom = solve_kepler(m, el.eccentricity)?;

    // True anomaly and radius vector.
    let nu = 2.0
        * (((1.0 + el.eccentricity) / (1.0 - el.eccentricity)).sqrt() * (e_anom / 2.0).tan())
            .atan();
    let r = el.semi_major * (1.0 - el.eccentricity * e_anom.cos());

    // Argument of latitude and the in-orbit-plane to ecliptic reduction.
    let omega = el.node * RADEG;
    let u = nu + (el.perihelion - el.node) * RADEG;
    let incl = el.inclination * RADEG;

    let lon = (u.sin() * incl.cos()).atan2(u.cos()) + omega;
    let lat = (u.sin() * incl.sin()).asin();

    Ok((norm_deg(lon / RADEG), lat / RADEG, r))
}

// -------------------------------------------------------------------------------------------------
// Lunar theory (Meeus ch. 47, truncated ELP-2000/82)
// -------------------------------------------------------------------------------------------------

/// One periodic term of the lunar longitude/distance series: multipliers of
/// (D, M, M', F), coefficient of sine in 1e-6 degrees, coefficient of cosine
/// in 1e-3 km.
#[rustfmt::skip]
const MOON_LR: [(i8, i8, i8, i8, f64, f64); 32] = [
    (0, 0, 1, 0,  6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0,    658_314.0, -2_955_968.0),
    (0, 0, 2, 0,    213_618.0,   -569_925.0),
    (0, 1, 0, 0,   -185_116.0,     48_888.0),
    (0, 0, 0, 2,   -114_332.0,     -3_149.0),
    (2, 0, -2, 0,    58_793.0,    246_158.0),
    (2, -1, -1, 0,   57_066.0,   -152_138.0),
    (2, 0, 1, 0,     53_322.0,   -170_733.0),
    (2, -1, 0, 0,    45_758.0,   -204_586.0),
    (0, 1, -1, 0,   -40_923.0,   -129_620.0),
    (1, 0, 0, 0,    -34_720.0,    108_743.0),
    (0, 1, 1, 0,    -30_383.0,    104_755.0),
    (2, 0, 0, -2,    15_327.0,     10_321.0),
    (0, 0, 1, 2,    -12_528.0,          0.0),
    (0, 0, 1, -2,    10_980.0,     79_661.0),
    (4, 0, -1, 0,    10_675.0,    -34_782.0),
    (0, 0, 3, 0,     10_034.0,    -23_210.0),
    (4, 0, -2, 0,     8_548.0,    -21_636.0),
    (2, 1, -1, 0,    -7_888.0,     24_208.0),
    (2, 1, 0, 0,     -6_766.0,     30_824.0),
    (1, 0, -1, 0,    -5_163.0,     -8_379.0),
    (1, 1, 0, 0,      4_987.0,    -16_675.0),
    (2, -1, 1, 0,     4_036.0,    -12_831.0),
    (2, 0, 2, 0,      3_994.0,    -10_445.0),
    (4, 0, 0, 0,      3_861.0,    -11_650.0),
    (2, 0, -3, 0,     3_665.0,     14_403.0),
    (0, 1, -2, 0,    -2_689.0,     -7_003.0),
    (2, -1, -2, 0,    2_390.0,     10_056.0),
    (1, 0, 1, 0,     -2_348.0,      6_322.0),
    (2, -2, 0, 0,     2_236.0,     -9_884.0),
    (0, 2, 0, 0,     -2_120.0,      5_751.0),
];

/// Periodic terms of the lunar latitude series: multipliers of (D, M, M', F)
/// and coefficient of sine in 1e-6 degrees.
#[rustfmt::skip]
const MOON_B: [(i8, i8, i8, i8, f64); 30] = [
    (0, 0, 0, 1,  5_128_122.0),
    (0, 0, 1, 1,    280_602.0),
    (0, 0, 1, -1,   277_693.0),
    (2, 0, 0, -1,   173_237.0),
    (2, 0, -1, 1,    55_413.0),
    (2, 0, -1, -1,   46_271.0),
    (2, 0, 0, 1,     32_573.0),
    (0, 0, 2, 1,     17_198.0),
    (2, 0, 1, -1,     9_266.0),
    (0, 0, 2, -1,     8_822.0),
    (2, -1, 0, -1,    8_216.0),
    (2, 0, -2, -1,    4_324.0),
    (2, 0, 1, 1,      4_200.0),
    (2, 1, 0, -1,    -3_359.0),
    (2, -1, -1, 1,    2_463.0),
    (2, -1, 0, 1,     2_211.0),
    (2, -1, -1, -1,   2_065.0),
    (0, 1, -1, -1,   -1_870.0),
    (4, 0, -1, -1,    1_828.0),
    (0, 1, 0, 1,     -1_794.0),
    (0, 0, 0, 3,     -1_749.0),
    (0, 1, -1, 1,    -1_565.0),
    (1, 0, 0, 1,     -1_491.0),
    (0, 1, 1, 1,     -1_475.0),
    (0, 1, 1, -1,    -1_410.0),
    (0, 1, 0, -1,    -1_344.0),
    (1, 0, 0, -1,    -1_335.0),
    (0, 0, 3, 1,      1_107.0),
    (4, 0, 0, -1,     1_021.0),
    (4, 0, -1, 1,       833.0),
];

/// Fundamental arguments of the lunar theory at time T (Julian centuries TT
/// since J2000), all in degrees: (L', D, M, M', F).
fn moon_fundamentals(t: f64) -> (f64, f64, f64, f64, f64) {
    let lp = norm_deg(
        218.316_4477 + 481_267.881_234_21 * t - 0.001_5786 * t * t + t.powi(3) / 538_841.0
            - t.powi(4) / 65_194_000.0,
    );
    let d = norm_deg(
        297.850_1921 + 445_267.111_4034 * t - 0.001_8819 * t * t + t.powi(3) / 545_868.0
            - t.powi(4) / 113_065_000.0,
    );
    let m = norm_deg(
        357.529_1092 + 35_999.050_2909 * t - 0.000_1536 * t * t + t.powi(3) / 24_490_000.0,
    );
    let mp = norm_deg(
        134.963_3964 + 477_198.867_5055 * t + 0.008_7414 * t * t + t.powi(3) / 69_699.0
            - t.powi(4) / 14_712_000.0,
    );
    let f = norm_deg(
        93.272_0950 + 483_202.017_5233 * t - 0.003_6539 * t * t - t.powi(3) / 3_526_000.0
            + t.powi(4) / 863_310_000.0,
    );
    (lp, d, m, mp, f)
}

/// Geocentric ecliptic position of the Moon, mean equinox of date.
///
/// Truncated ELP-2000/82 (Meeus ch. 47): 32 longitude/distance terms, 30
/// latitude terms, plus the Venus/Jupiter/flattening additives. Accuracy is
/// a few arcseconds in longitude over several centuries around J2000.
///
/// Return
/// ------
/// * `(longitude_deg, latitude_deg, distance_au)`.
pub fn moon_position(jd_tt: JulianDay) -> (Degree, Degree, AstronomicalUnit) {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let (lp, d, m, mp, f) = moon_fundamentals(t);

    // Eccentricity damping factor for terms involving the solar anomaly M.
    let e = 1.0 - 0.002_516 * t - 0.000_0074 * t * t;

    let (dr, mr, mpr, fr) = (d * RADEG, m * RADEG, mp * RADEG, f * RADEG);

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, sl, sr) in MOON_LR.iter() {
        let arg = cd as f64 * dr + cm as f64 * mr + cmp as f64 * mpr + cf as f64 * fr;
        let damp = match cm.abs() {
            1 => e,
            2 => e * e,
            _ => 1.0,
        };
        sum_l += sl * damp * arg.sin();
        sum_r += sr * damp * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, sb) in MOON_B.iter() {
        let arg = cd as f64 * dr + cm as f64 * mr + cmp as f64 * mpr + cf as f64 * fr;
        let damp = match cm.abs() {
            1 => e,
            2 => e * e,
            _ => 1.0,
        };
        sum_b += sb * damp * arg.sin();
    }

    // Additive terms: Venus (A1), Jupiter (A2), and the Earth flattening term.
    let a1 = norm_deg(119.75 + 131.849 * t) * RADEG;
    let a2 = norm_deg(53.09 + 479_264.290 * t) * RADEG;
    let a3 = norm_deg(313.45 + 481_266.484 * t) * RADEG;
    let lpr = lp * RADEG;

    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lpr - fr).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lpr.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - fr).sin()
        + 175.0 * (a1 + fr).sin()
        + 127.0 * (lpr - mpr).sin()
        - 115.0 * (lpr + mpr).sin();

    let lon = norm_deg(lp + sum_l / 1e6);
    let lat = sum_b / 1e6;
    let dist_km = 385_000.56 + sum_r / 1e3;

    (lon, lat, dist_km / AU)
}

/// Mean longitude of the ascending lunar node, equinox of date.
pub fn mean_node(jd_tt: JulianDay) -> Degree {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    norm_deg(
        125.044_5479 - 1_934.136_2891 * t + 0.002_0754 * t * t + t.powi(3) / 467_441.0
            - t.powi(4) / 60_616_000.0,
    )
}

/// Osculating ("true") longitude of the ascending lunar node, equinox of date.
///
/// Mean node plus the principal periodic corrections (Meeus ch. 47).
pub fn true_node(jd_tt: JulianDay) -> Degree {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let (_, d, m, mp, f) = moon_fundamentals(t);
    let (dr, mr, mpr, fr) = (d * RADEG, m * RADEG, mp * RADEG, f * RADEG);

    let correction = -1.4979 * (2.0 * (dr - fr)).sin()
        - 0.1500 * mr.sin()
        - 0.1226 * (2.0 * dr).sin()
        + 0.1176 * (2.0 * fr).sin()
        - 0.0801 * (2.0 * (mpr - fr)).sin();

    norm_deg(mean_node(jd_tt) + correction)
}

#[cfg(test)]
mod bodies_test {
    use super::*;

    #[test]
    fn test_body_from_index() {
        assert_eq!(Body::from_index(0).unwrap(), Body::Sun);
        assert_eq!(Body::from_index(9).unwrap(), Body::Pluto);
        assert!(Body::from_index(57).is_err());
    }

    #[test]
    fn test_body_names() {
        assert_eq!(Body::Venus.name(), "Venus");
        assert_eq!(Body::from_name(" VENUS "), Some(Body::Venus));
        assert_eq!(Body::from_name("vulcan"), None);
    }

    #[test]
    fn test_solve_kepler_circular() {
        let e = solve_kepler(1.234, 0.0).unwrap();
        assert!((e - 1.234).abs() < 1e-13);
    }

    #[test]
    fn test_solve_kepler_meeus_example() {
        // Meeus example 30.a: M = 5.554589 rad? — ch. 30 uses M = 5°,
        // e = 0.1: E = 5.554589°.
        let e = solve_kepler(5.0 * RADEG, 0.1).unwrap();
        assert!((e / RADEG - 5.554589).abs() < 1e-5, "E = {}", e / RADEG);
    }

    #[test]
    fn test_moon_meeus_example() {
        // Meeus example 47.a: 1992 April 12.0 TD (JD 2448724.5):
        // λ = 133.162655°, β = -3.229126°, Δ = 368409.7 km.
        let (lon, lat, dist) = moon_position(2_448_724.5);
        assert!((lon - 133.1626).abs() < 0.01, "lon = {lon}");
        assert!((lat - (-3.229_126)).abs() < 0.01, "lat = {lat}");
        assert!((dist * AU - 368_409.7).abs() < 200.0, "dist = {}", dist * AU);
    }

    #[test]
    fn test_earth_distance_is_one_au() {
        let (_, _, r) = heliocentric_position(Body::Sun, J2000).unwrap();
        assert!((r - 1.0).abs() < 0.02, "r = {r}");
    }

    #[test]
    fn test_mean_node_regresses() {
        let n1 = mean_node(J2000);
        let n2 = mean_node(J2000 + 365.25);
        // The node regresses ~19.3°/yr.
        let motion = crate::constants::diff_deg(n2, n1);
        assert!((motion + 19.34).abs() < 0.1, "motion = {motion}");
    }

    #[test]
    fn test_heliocentric_latitudes_bounded() {
        for body in [Body::Mercury, Body::Venus, Body::Mars, Body::Jupiter] {
            let (lon, lat, r) = heliocentric_position(body, 2_460_000.5).unwrap();
            assert!((0.0..360.0).contains(&lon));
            assert!(lat.abs() <= 8.0);
            assert!(r > 0.3);
        }
    }

    #[test]
    fn test_moon_latitude_bounded() {
        for k in 0..40 {
            let (_, lat, _) = moon_position(J2000 + k as f64 * 17.3);
            assert!(lat.abs() < 5.4, "lat = {lat}");
        }
    }
}
