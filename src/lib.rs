//! # Siderea
//!
//! **Siderea** is an astronomical ephemeris engine: calendar and time-scale
//! conversions, apparent positions of the Sun, Moon and planets from compact
//! analytic theories, fixed-star places, astrological house systems, sidereal
//! zodiac offsets, and naked-eye (heliacal) visibility modelling.
//!
//! ## Overview
//!
//! The crate exposes the classical ephemeris call surface through an explicit
//! session context, [`Siderea`](crate::siderea::Siderea): the context carries
//! the topocentric observer, the sidereal mode and the star catalog, so two
//! sessions with different settings can coexist in one process. Stateless
//! operations (calendar arithmetic, ΔT, house mathematics) are plain
//! functions in their modules.
//!
//! ## Main components
//!
//! - [`calendar`] — Julian day ↔ calendar date conversions in both Julian and
//!   Gregorian reckonings, the UTC leap-second bridge, time zone splitting.
//! - [`delta_t`] — the ΔT = TT − UT1 estimate across historical eras.
//! - [`ref_system`] — obliquity, precession, nutation, frame rotations and
//!   the equatorial/ecliptic/horizontal conversions.
//! - [`sidereal`] — sidereal time and the ayanamsa of the sidereal zodiacs.
//! - [`bodies`] / [`ephemeris`] — analytic planetary and lunar theories and
//!   the flag-driven position pipeline.
//! - [`fixed_stars`] — the star catalog and apparent star places.
//! - [`houses`] — eight astrological house systems.
//! - [`heliacal`] — atmospheric modelling and heliacal event searches.
//!
//! ## Example
//!
//! ```
//! use siderea::constants::flags;
//! use siderea::bodies::Body;
//! use siderea::calendar::{julday, Calendar};
//! use siderea::Siderea;
//!
//! let session = Siderea::new();
//! let jd = julday(2000, 1, 1, 12.0, Calendar::Gregorian);
//! let sun = session.calc(jd, Body::Sun, flags::SPEED).unwrap();
//! assert!((sun.longitude - 280.4).abs() < 0.5);
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns a [`SidereaError`](siderea_errors::SidereaError)
//! naming the failure class: out-of-range input, unknown selectors, missing
//! stars, house systems undefined at polar latitudes, and exhausted searches.

pub mod bodies;
pub mod calendar;
pub mod constants;
pub mod delta_t;
pub mod ephemeris;
pub mod fixed_stars;
pub mod heliacal;
pub mod houses;
pub mod observers;
pub mod ref_system;
pub mod sidereal;
pub mod siderea;
pub mod siderea_errors;

pub use crate::siderea::Siderea;
pub use crate::siderea_errors::SidereaError;
