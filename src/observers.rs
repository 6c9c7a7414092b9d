//! # Ground observer locations
//!
//! An [`Observer`] ties a position query to a point on the Earth surface. The
//! coordinate fields are stored as [`NotNan`] so observers can be hashed and
//! compared, and the parallax factors `ρ sin φ'` / `ρ cos φ'` are computed
//! once at construction.

use ordered_float::NotNan;

use crate::constants::{Degree, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, RADEG};
use crate::siderea_errors::SidereaError;

/// A topocentric observation site on the Earth surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observer {
    /// Geographic longitude, degrees east of Greenwich.
    pub longitude: NotNan<f64>,
    /// Geodetic latitude, degrees.
    pub latitude: NotNan<f64>,
    /// Elevation above sea level, meters.
    pub elevation: NotNan<f64>,
    /// Geocentric parallax factor ρ cos φ', Earth radii.
    rho_cos_phi: NotNan<f64>,
    /// Geocentric parallax factor ρ sin φ', Earth radii.
    rho_sin_phi: NotNan<f64>,
}

impl Observer {
    /// Build an observer from geodetic coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: geographic longitude, degrees east (in [-180, 180]).
    /// * `latitude`: geodetic latitude, degrees (in [-90, 90]).
    /// * `elevation`: elevation above sea level, meters.
    ///
    /// Return
    /// ------
    /// * A ready-to-use [`Observer`]; [`SidereaError::OutOfRange`] for
    ///   coordinates outside the geographic domain or non-finite input.
    pub fn new(longitude: Degree, latitude: Degree, elevation: Meter) -> Result<Observer, SidereaError> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SidereaError::OutOfRange(format!(
                "geographic longitude {longitude} outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SidereaError::OutOfRange(format!(
                "geodetic latitude {latitude} outside [-90, 90]"
            )));
        }
        if !elevation.is_finite() || elevation < -500.0 || elevation > 25_000.0 {
            return Err(SidereaError::OutOfRange(format!(
                "elevation {elevation} m outside the atmospheric domain"
            )));
        }

        // Meeus ch. 11: reduction of the geodetic latitude on the reference
        // ellipsoid, plus the elevation contribution.
        let flat = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;
        let phi = latitude * RADEG;
        let u = (flat * phi.tan()).atan();
        let h = elevation / EARTH_MAJOR_AXIS;
        let rho_sin = flat * u.sin() + h * phi.sin();
        let rho_cos = u.cos() + h * phi.cos();

        let wrap = |v: f64| {
            NotNan::new(v).map_err(|_| SidereaError::OutOfRange("NaN observer coordinate".into()))
        };

        Ok(Observer {
            longitude: wrap(longitude)?,
            latitude: wrap(latitude)?,
            elevation: wrap(elevation)?,
            rho_cos_phi: wrap(rho_cos)?,
            rho_sin_phi: wrap(rho_sin)?,
        })
    }

    /// Geocentric parallax factors `(ρ cos φ', ρ sin φ')` in Earth radii.
    pub fn parallax_factors(&self) -> (f64, f64) {
        (self.rho_cos_phi.into_inner(), self.rho_sin_phi.into_inner())
    }

    /// Geographic longitude in degrees east.
    pub fn longitude_deg(&self) -> Degree {
        self.longitude.into_inner()
    }

    /// Geodetic latitude in degrees.
    pub fn latitude_deg(&self) -> Degree {
        self.latitude.into_inner()
    }

    /// Elevation above sea level in meters.
    pub fn elevation_m(&self) -> Meter {
        self.elevation.into_inner()
    }
}

#[cfg(test)]
mod observers_test {
    use super::*;

    #[test]
    fn test_observer_validation() {
        assert!(Observer::new(2.336, 48.853, 35.0).is_ok());
        assert!(Observer::new(190.0, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, 91.0, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, 40_000.0).is_err());
    }

    #[test]
    fn test_parallax_factors_equator() {
        // At sea level on the equator, ρ cos φ' = 1 and ρ sin φ' = 0.
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let (rc, rs) = obs.parallax_factors();
        assert!((rc - 1.0).abs() < 1e-12);
        assert!(rs.abs() < 1e-12);
    }

    #[test]
    fn test_parallax_factors_meeus() {
        // Meeus ch. 11, Palomar: φ = 33°.356111, h = 1706 m:
        // ρ sin φ' = +0.546861, ρ cos φ' = +0.836339.
        let obs = Observer::new(-116.8625, 33.356_111, 1706.0).unwrap();
        let (rc, rs) = obs.parallax_factors();
        assert!((rs - 0.546_861).abs() < 1e-5, "rs = {rs}");
        assert!((rc - 0.836_339).abs() < 1e-5, "rc = {rc}");
    }
}
