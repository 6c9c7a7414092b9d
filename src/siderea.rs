//! # Session context of the engine
//!
//! [`Siderea`] carries the state the classical call surface kept in process
//! globals: the topocentric observer, the sidereal mode, and the star
//! catalog. Every stateful operation takes the context explicitly, so two
//! sessions with different settings can coexist in one process.
//!
//! The star catalog is loaded lazily on first use and cached in the context.

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;

use crate::bodies::Body;
use crate::constants::flags::CalcFlag;
use crate::constants::{Degree, JulianDay, Meter};
use crate::ephemeris::{self, NodApsMethod, NodesApsides, Position};
use crate::fixed_stars::{self, StarCatalog};
use crate::heliacal::{
    self, Atmosphere, GeoCoord, HeliacalEvent, HeliacalPheno, HeliacalTiming, ObserverVision,
    VisLimit,
};
use crate::houses::{self, HouseSystem, Houses};
use crate::observers::Observer;
use crate::sidereal::{self, SiderealMode};
use crate::siderea_errors::SidereaError;

/// Session context: observer, sidereal mode and star catalog.
///
/// A fresh context has no observer, uses the Fagan/Bradley sidereal mode and
/// the built-in star catalog.
///
/// ```
/// use siderea::Siderea;
///
/// let mut session = Siderea::new();
/// session.set_topo(2.336, 48.853, 35.0).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Siderea {
    observer: Option<Observer>,
    sid_mode: SiderealMode,
    catalog_path: Option<Utf8PathBuf>,
    star_catalog: OnceCell<StarCatalog>,
}

impl Siderea {
    /// Create a context with default settings.
    pub fn new() -> Siderea {
        Siderea::default()
    }

    /// Set the topocentric observer for subsequent position queries.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: geographic longitude, degrees east.
    /// * `latitude`: geodetic latitude, degrees.
    /// * `elevation`: elevation above sea level, meters.
    pub fn set_topo(
        &mut self,
        longitude: Degree,
        latitude: Degree,
        elevation: Meter,
    ) -> Result<(), SidereaError> {
        self.observer = Some(Observer::new(longitude, latitude, elevation)?);
        Ok(())
    }

    /// The session observer, if one was set.
    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    /// Select the sidereal mode used by sidereal queries and ayanamsa
    /// computations.
    pub fn set_sid_mode(&mut self, mode: SiderealMode) {
        self.sid_mode = mode;
    }

    /// The active sidereal mode.
    pub fn sid_mode(&self) -> SiderealMode {
        self.sid_mode
    }

    /// Use a CSV star catalog file instead of the built-in catalog.
    ///
    /// The file is read on the first star query; a load failure surfaces
    /// there as [`SidereaError::CatalogFile`].
    pub fn set_star_catalog_path(&mut self, path: impl AsRef<Utf8Path>) {
        self.catalog_path = Some(path.as_ref().to_owned());
        self.star_catalog = OnceCell::new();
    }

    /// The star catalog of the session, loading it if necessary.
    pub fn star_catalog(&self) -> Result<&StarCatalog, SidereaError> {
        self.star_catalog.get_or_try_init(|| match &self.catalog_path {
            Some(path) => StarCatalog::from_csv_file(path),
            None => Ok(StarCatalog::built_in()),
        })
    }

    // ---------------------------------------------------------------------------------------------
    // Delegating surface
    // ---------------------------------------------------------------------------------------------

    /// Position of a body at an ET epoch; see [`ephemeris::calc`].
    pub fn calc(
        &self,
        jd_et: JulianDay,
        body: Body,
        iflag: CalcFlag,
    ) -> Result<Position, SidereaError> {
        ephemeris::calc(self, jd_et, body, iflag)
    }

    /// Position of a body at a UT epoch; see [`ephemeris::calc_ut`].
    pub fn calc_ut(
        &self,
        jd_ut: JulianDay,
        body: Body,
        iflag: CalcFlag,
    ) -> Result<Position, SidereaError> {
        ephemeris::calc_ut(self, jd_ut, body, iflag)
    }

    /// Orbital nodes and apsides; see [`ephemeris::nod_aps_ut`].
    pub fn nod_aps_ut(
        &self,
        jd_ut: JulianDay,
        body: Body,
        iflag: CalcFlag,
        method: NodApsMethod,
    ) -> Result<NodesApsides, SidereaError> {
        ephemeris::nod_aps_ut(self, jd_ut, body, iflag, method)
    }

    /// Fixed star position at an ET epoch; see [`fixed_stars::fixstar`].
    pub fn fixstar(
        &self,
        star: &str,
        jd_et: JulianDay,
        iflag: CalcFlag,
    ) -> Result<(String, Position), SidereaError> {
        fixed_stars::fixstar(self, star, jd_et, iflag)
    }

    /// Fixed star position at a UT epoch; see [`fixed_stars::fixstar_ut`].
    pub fn fixstar_ut(
        &self,
        star: &str,
        jd_ut: JulianDay,
        iflag: CalcFlag,
    ) -> Result<(String, Position), SidereaError> {
        fixed_stars::fixstar_ut(self, star, jd_ut, iflag)
    }

    /// Catalog magnitude of a fixed star; see [`fixed_stars::fixstar_mag`].
    pub fn fixstar_mag(&self, star: &str) -> Result<(String, f64), SidereaError> {
        fixed_stars::fixstar_mag(self, star)
    }

    /// Ayanamsa of the session's sidereal mode at an ET epoch.
    pub fn get_ayanamsa(&self, jd_et: JulianDay) -> Degree {
        sidereal::ayanamsa(jd_et, self.sid_mode)
    }

    /// Ayanamsa of the session's sidereal mode at a UT epoch.
    pub fn get_ayanamsa_ut(&self, jd_ut: JulianDay) -> Degree {
        sidereal::ayanamsa_ut(jd_ut, self.sid_mode)
    }

    /// House cusps for a UT epoch and location; see [`houses::houses`].
    pub fn houses(
        &self,
        jd_ut: JulianDay,
        geolat: Degree,
        geolon: Degree,
        system: HouseSystem,
    ) -> Result<Houses, SidereaError> {
        houses::houses(jd_ut, geolat, geolon, system)
    }

    /// Limiting magnitude at an object's place; see
    /// [`heliacal::vis_limit_mag`].
    pub fn vis_limit_mag(
        &self,
        jd_ut: JulianDay,
        geo: &GeoCoord,
        atm: &Atmosphere,
        vision: &ObserverVision,
        object_name: &str,
    ) -> Result<VisLimit, SidereaError> {
        heliacal::vis_limit_mag(self, jd_ut, geo, atm, vision, object_name)
    }

    /// Heliacal phenomenon data; see [`heliacal::heliacal_pheno_ut`].
    pub fn heliacal_pheno_ut(
        &self,
        jd_ut: JulianDay,
        geo: &GeoCoord,
        atm: &Atmosphere,
        object_name: &str,
    ) -> Result<HeliacalPheno, SidereaError> {
        heliacal::heliacal_pheno_ut(self, jd_ut, geo, atm, object_name)
    }

    /// Heliacal event search; see [`heliacal::heliacal_ut`].
    #[allow(clippy::too_many_arguments)]
    pub fn heliacal_ut(
        &self,
        jd_start: JulianDay,
        geo: &GeoCoord,
        atm: &Atmosphere,
        vision: &ObserverVision,
        object_name: &str,
        event: HeliacalEvent,
    ) -> Result<HeliacalTiming, SidereaError> {
        heliacal::heliacal_ut(self, jd_start, geo, atm, vision, object_name, event)
    }
}

#[cfg(test)]
mod siderea_test {
    use super::*;
    use crate::constants::J2000;

    #[test]
    fn test_default_context() {
        let ctx = Siderea::new();
        assert!(ctx.observer().is_none());
        assert_eq!(ctx.sid_mode(), SiderealMode::FaganBradley);
        assert!(!ctx.star_catalog().unwrap().is_empty());
    }

    #[test]
    fn test_set_topo() {
        let mut ctx = Siderea::new();
        ctx.set_topo(2.336, 48.853, 35.0).unwrap();
        let obs = ctx.observer().unwrap();
        assert_eq!(obs.latitude_deg(), 48.853);
        assert!(ctx.set_topo(500.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_two_sessions_disagree_on_ayanamsa() {
        let tropical = Siderea::new();
        let mut lahiri = Siderea::new();
        lahiri.set_sid_mode(SiderealMode::Lahiri);
        assert_ne!(tropical.get_ayanamsa(J2000), lahiri.get_ayanamsa(J2000));
    }

    #[test]
    fn test_missing_catalog_file_surfaces_on_first_use() {
        let mut ctx = Siderea::new();
        ctx.set_star_catalog_path("/nonexistent/stars.csv");
        assert!(matches!(
            ctx.star_catalog(),
            Err(SidereaError::CatalogFile(_))
        ));
    }

    #[test]
    fn test_delegation_matches_free_functions() {
        let ctx = Siderea::new();
        let via_ctx = ctx.calc(J2000, Body::Sun, 0).unwrap();
        let direct = crate::ephemeris::calc(&ctx, J2000, Body::Sun, 0).unwrap();
        assert_eq!(via_ctx, direct);
    }
}
