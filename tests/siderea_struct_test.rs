use siderea::siderea::Siderea;
use siderea::sidereal::SiderealMode;

#[test]
fn test_siderea_observer_management() {
    let mut session = Siderea::new();

    session.set_topo(-73.06644, 51.58206, 100.).unwrap();
    let obs = session.observer().unwrap();
    assert_eq!(obs.longitude_deg(), -73.06644);
    assert_eq!(obs.latitude_deg(), 51.58206);
    let (rho_cos, rho_sin) = obs.parallax_factors();
    assert!((rho_cos - 0.6227).abs() < 1e-3, "rho_cos = {rho_cos}");
    assert!((rho_sin - 0.7799).abs() < 1e-3, "rho_sin = {rho_sin}");

    session.set_topo(23.4587, 52.58206, 1423.).unwrap();
    let obs = session.observer().unwrap();
    assert_eq!(obs.elevation_m(), 1423.);
}

#[test]
fn test_siderea_sid_mode_management() {
    let mut session = Siderea::new();
    assert_eq!(session.sid_mode(), SiderealMode::FaganBradley);

    session.set_sid_mode(SiderealMode::Lahiri);
    assert_eq!(session.sid_mode(), SiderealMode::Lahiri);

    session.set_sid_mode(SiderealMode::Custom {
        t0: 2_451_545.0,
        ayan_t0: 23.5,
    });
    assert_eq!(session.get_ayanamsa(2_451_545.0), 23.5);
}

#[test]
fn test_siderea_star_catalog_default() {
    let session = Siderea::new();
    let catalog = session.star_catalog().unwrap();
    assert!(catalog.len() >= 20);
    assert!(catalog.lookup("Sirius").is_ok());
}
