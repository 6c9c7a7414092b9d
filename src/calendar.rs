//! # Calendar and time-base conversion
//!
//! This module owns the conversion between calendar dates and the Julian-day
//! time axis, for both Julian and Gregorian reckoning, and the UTC-aware pair
//! of conversions that fold in the leap-second table and ΔT:
//!
//! - [`julday`] / [`revjul`] — calendar date ⇄ Julian day, exact bijections
//!   under a fixed [`Calendar`] flag.
//! - [`julday_historical`] / [`revjul_historical`] — mixed reckoning honoring
//!   the Gregorian adoption gap (1582-10-05 … 1582-10-14 do not exist).
//! - [`utc_to_jd`] — wall-clock UTC instant → `(jd_et, jd_ut1)`.
//! - [`jdet_to_utc`] / [`jdut1_to_utc`] — the inverses.
//! - [`utc_time_zone`] — shift a civil date by a fixed zone offset.
//!
//! ## Time scales
//!
//! ET (ephemeris/terrestrial time) and UT1 are carried as plain Julian day
//! numbers. The ET↔UT1 offset comes from [`delta_t`](crate::delta_t::delta_t);
//! the UTC↔TAI offset from the built-in leap-second table (held constant after
//! the last tabulated leap second).
//!
//! ## Units
//!
//! - `hour` in [`julday`] is a fractional hour in [0, 24).
//! - Leap seconds and ΔT in SI seconds.

use std::str::FromStr;

use hifitime::Epoch;

use crate::constants::{JulianDay, JD_MAX, JD_MIN, SECONDS_PER_DAY};
use crate::delta_t::delta_t;
use crate::siderea_errors::SidereaError;

/// Calendar reckoning used to interpret a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Proleptic Julian calendar.
    Julian,
    /// Proleptic Gregorian calendar.
    Gregorian,
}

/// First Julian day of the Gregorian calendar (1582-10-15 Gregorian, 0h).
pub const GREGORIAN_START_JD: JulianDay = 2_299_160.5;

/// A calendar date with a fractional hour, under some [`Calendar`] reckoning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    /// Fractional hour of day, in [0, 24).
    pub hour: f64,
}

/// A civil UTC instant broken into wall-clock components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds with fraction; 60.x only during an inserted leap second.
    pub second: f64,
}

// -------------------------------------------------------------------------------------------------
// Leap seconds
// -------------------------------------------------------------------------------------------------

/// Leap-second table: (Julian day of effectivity at 0h UTC, TAI−UTC in seconds).
///
/// After the last entry the offset is held constant; before the first entry
/// UTC is treated as equal to UT1.
const LEAP_SECONDS: [(JulianDay, f64); 28] = [
    (2_441_317.5, 10.0), // 1972-01-01
    (2_441_499.5, 11.0), // 1972-07-01
    (2_441_683.5, 12.0), // 1973-01-01
    (2_442_048.5, 13.0), // 1974-01-01
    (2_442_413.5, 14.0), // 1975-01-01
    (2_442_778.5, 15.0), // 1976-01-01
    (2_443_144.5, 16.0), // 1977-01-01
    (2_443_509.5, 17.0), // 1978-01-01
    (2_443_874.5, 18.0), // 1979-01-01
    (2_444_239.5, 19.0), // 1980-01-01
    (2_444_786.5, 20.0), // 1981-07-01
    (2_445_151.5, 21.0), // 1982-07-01
    (2_445_516.5, 22.0), // 1983-07-01
    (2_446_247.5, 23.0), // 1985-07-01
    (2_447_161.5, 24.0), // 1988-01-01
    (2_447_892.5, 25.0), // 1990-01-01
    (2_448_257.5, 26.0), // 1991-01-01
    (2_448_804.5, 27.0), // 1992-07-01
    (2_449_169.5, 28.0), // 1993-07-01
    (2_449_534.5, 29.0), // 1994-07-01
    (2_450_083.5, 30.0), // 1996-01-01
    (2_450_630.5, 31.0), // 1997-07-01
    (2_451_179.5, 32.0), // 1999-01-01
    (2_453_736.5, 33.0), // 2006-01-01
    (2_454_832.5, 34.0), // 2009-01-01
    (2_456_109.5, 35.0), // 2012-07-01
    (2_457_204.5, 36.0), // 2015-07-01
    (2_457_754.5, 37.0), // 2017-01-01
];

/// TAI−UTC in seconds at a given Julian day (UTC scale).
///
/// Returns 0 before the start of the leap-second era (1972), and holds the
/// last tabulated value after the end of the table.
pub fn tai_utc(jd_utc: JulianDay) -> f64 {
    let mut offset = 0.0;
    for &(jd, sec) in LEAP_SECONDS.iter() {
        if jd_utc >= jd {
            offset = sec;
        } else {
            break;
        }
    }
    offset
}

/// TT−UTC in seconds at a given Julian day, 32.184 s above TAI−UTC.
fn tt_utc(jd_utc: JulianDay) -> f64 {
    tai_utc(jd_utc) + 32.184
}

// -------------------------------------------------------------------------------------------------
// Calendar date <-> Julian day
// -------------------------------------------------------------------------------------------------

/// Convert a calendar date to a Julian day number.
///
/// The conversion is valid for any date of the proleptic Julian or Gregorian
/// calendar and is the exact inverse of [`revjul`] under the same flag.
///
/// Arguments
/// ---------
/// * `year`: astronomical year (1 BCE = 0, 2 BCE = -1, …).
/// * `month`: month in [1, 12].
/// * `day`: day of month.
/// * `hour`: fractional hour of day in [0, 24).
/// * `calendar`: calendar reckoning of the input date.
///
/// Return
/// ------
/// * The Julian day number of the instant.
///
/// See also
/// --------
/// * [`revjul`] – The inverse conversion.
/// * [`date_to_jd`] – The validating wrapper used by the UTC surface.
pub fn julday(year: i32, month: u8, day: u8, hour: f64, calendar: Calendar) -> JulianDay {
    let u = if month < 3 { year - 1 } else { year } as f64;
    let u0 = u + 4712.0;
    let mut u1 = month as f64 + 1.0;
    if u1 < 4.0 {
        u1 += 12.0;
    }

    let mut jd =
        (u0 * 365.25).floor() + (30.6 * u1 + 1e-6).floor() + day as f64 + hour / 24.0 - 63.5;

    if calendar == Calendar::Gregorian {
        let mut u2 = (u.abs() / 100.0).floor() - (u.abs() / 400.0).floor();
        if u < 0.0 {
            u2 = -u2;
        }
        jd = jd - u2 + 2.0;
        if u < 0.0 && u / 100.0 == (u / 100.0).floor() && u / 400.0 != (u / 400.0).floor() {
            jd -= 1.0;
        }
    }
    jd
}

/// Convert a Julian day number back to a calendar date.
///
/// Arguments
/// ---------
/// * `jd`: Julian day number.
/// * `calendar`: calendar reckoning of the output date.
///
/// Return
/// ------
/// * The [`CalendarDate`] of the instant (hour with fraction).
///
/// See also
/// --------
/// * [`julday`] – The inverse conversion.
pub fn revjul(jd: JulianDay, calendar: Calendar) -> CalendarDate {
    let mut u0 = jd + 32_082.5;

    if calendar == Calendar::Gregorian {
        let mut u1 = u0 + (u0 / 36_525.0).floor() - (u0 / 146_100.0).floor() - 38.0;
        if jd >= 1_830_691.5 {
            u1 += 1.0;
        }
        u0 = u0 + (u1 / 36_525.0).floor() - (u1 / 146_100.0).floor() - 38.0;
    }

    let u2 = (u0 + 123.0).floor();
    let u3 = ((u2 - 122.2) / 365.25).floor();
    let u4 = ((u2 - (365.25 * u3).floor()) / 30.6001).floor();

    let mut month = (u4 - 1.0) as i32;
    if month > 12 {
        month -= 12;
    }
    let day = (u2 - (365.25 * u3).floor() - (30.6001 * u4).floor()) as u8;
    let year = (u3 + ((u4 - 2.0) / 12.0).floor() - 4800.0) as i32;
    let hour = (jd - (jd + 0.5).floor() + 0.5) * 24.0;

    CalendarDate {
        year,
        month: month as u8,
        day,
        hour,
    }
}

/// Number of days in a month under a given calendar.
fn month_len(year: i32, month: u8, calendar: Calendar) -> u8 {
    const LEN: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 {
        let leap = match calendar {
            Calendar::Julian => year.rem_euclid(4) == 0,
            Calendar::Gregorian => {
                year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
            }
        };
        if leap {
            29
        } else {
            28
        }
    } else {
        LEN[month as usize - 1]
    }
}

/// Validate a calendar date and convert it to a Julian day number.
///
/// Fails with [`SidereaError::OutOfRange`] when the month, day or hour is
/// internally inconsistent (e.g. February 30th), or when the resulting Julian
/// day leaves the supported ephemeris range.
pub fn date_to_jd(
    year: i32,
    month: u8,
    day: u8,
    hour: f64,
    calendar: Calendar,
) -> Result<JulianDay, SidereaError> {
    if !(1..=12).contains(&month) {
        return Err(SidereaError::OutOfRange(format!("month {month}")));
    }
    if day < 1 || day > month_len(year, month, calendar) {
        return Err(SidereaError::OutOfRange(format!(
            "day {day} of {year}-{month:02}"
        )));
    }
    if !(0.0..24.0).contains(&hour) {
        return Err(SidereaError::OutOfRange(format!("hour {hour}")));
    }
    let jd = julday(year, month, day, hour, calendar);
    if !(JD_MIN..=JD_MAX).contains(&jd) {
        return Err(SidereaError::OutOfRange(format!("julian day {jd}")));
    }
    Ok(jd)
}

/// Convert a historical calendar date to a Julian day, honoring the Gregorian
/// calendar adoption: dates before 1582-10-15 are read in the Julian calendar,
/// later dates in the Gregorian calendar, and the dropped days 1582-10-05 …
/// 1582-10-14 are rejected as [`SidereaError::OutOfRange`].
pub fn julday_historical(year: i32, month: u8, day: u8, hour: f64) -> Result<JulianDay, SidereaError> {
    if year == 1582 && month == 10 && (5..15).contains(&day) {
        return Err(SidereaError::OutOfRange(format!(
            "1582-10-{day:02} does not exist (Gregorian adoption gap)"
        )));
    }
    let calendar = if (year, month, day) >= (1582, 10, 15) {
        Calendar::Gregorian
    } else {
        Calendar::Julian
    };
    date_to_jd(year, month, day, hour, calendar)
}

/// Convert a Julian day back to a historical calendar date (Julian reckoning
/// before [`GREGORIAN_START_JD`], Gregorian after).
pub fn revjul_historical(jd: JulianDay) -> CalendarDate {
    if jd < GREGORIAN_START_JD {
        revjul(jd, Calendar::Julian)
    } else {
        revjul(jd, Calendar::Gregorian)
    }
}

// -------------------------------------------------------------------------------------------------
// UTC <-> ET / UT1
// -------------------------------------------------------------------------------------------------

/// Convert a wall-clock UTC instant to Julian day numbers in ET and UT1.
///
/// Leap seconds are taken from the built-in table (second 60 is accepted only
/// on a day that actually carries an inserted leap second); ΔT links ET to
/// UT1. Before 1972, UTC is treated as equal to UT1.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: civil date.
/// * `hour`, `minute`: civil time components.
/// * `second`: seconds with fraction, in [0, 60) — or [60, 61) on a leap-second day.
/// * `calendar`: calendar reckoning of the date.
///
/// Return
/// ------
/// * `(jd_et, jd_ut1)` for the instant.
///
/// See also
/// --------
/// * [`jdet_to_utc`], [`jdut1_to_utc`] – The inverse conversions.
pub fn utc_to_jd(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
    calendar: Calendar,
) -> Result<(JulianDay, JulianDay), SidereaError> {
    if hour > 23 || minute > 59 {
        return Err(SidereaError::OutOfRange(format!("time {hour}:{minute}")));
    }
    if !(0.0..61.0).contains(&second) {
        return Err(SidereaError::OutOfRange(format!("second {second}")));
    }

    let jd_day = date_to_jd(year, month, day, 0.0, calendar)?;

    // A 60th second is only valid at 23:59 on a day preceding a leap-second step.
    if second >= 60.0 {
        let is_leap_slot =
            hour == 23 && minute == 59 && tai_utc(jd_day + 1.0) > tai_utc(jd_day);
        if !is_leap_slot {
            return Err(SidereaError::OutOfRange(format!(
                "second {second} outside a leap-second slot"
            )));
        }
    }

    let sec_of_day = hour as f64 * 3600.0 + minute as f64 * 60.0 + second;

    if jd_day < LEAP_SECONDS[0].0 {
        // Pre-leap-second era: UTC == UT1.
        let jd_ut1 = jd_day + sec_of_day / SECONDS_PER_DAY;
        let jd_et = jd_ut1 + delta_t(jd_ut1) / SECONDS_PER_DAY;
        return Ok((jd_et, jd_ut1));
    }

    let jd_et = jd_day + (sec_of_day + tt_utc(jd_day)) / SECONDS_PER_DAY;
    let jd_ut1 = et_to_ut1(jd_et);
    Ok((jd_et, jd_ut1))
}

/// ET Julian day → UT1 Julian day, resolving the ΔT(UT) circularity with a
/// short fixed-point iteration.
pub(crate) fn et_to_ut1(jd_et: JulianDay) -> JulianDay {
    let mut jd_ut1 = jd_et;
    for _ in 0..3 {
        jd_ut1 = jd_et - delta_t(jd_ut1) / SECONDS_PER_DAY;
    }
    jd_ut1
}

/// Decompose the fractional hour of a UTC day into wall-clock components.
fn split_day(jd_day: JulianDay, sec_of_day: f64, calendar: Calendar) -> UtcDate {
    let date = revjul(jd_day, calendar);
    let hour = (sec_of_day / 3600.0).floor().min(23.0);
    let minute = ((sec_of_day - hour * 3600.0) / 60.0).floor().min(59.0);
    let second = sec_of_day - hour * 3600.0 - minute * 60.0;
    UtcDate {
        year: date.year,
        month: date.month,
        day: date.day,
        hour: hour as u8,
        minute: minute as u8,
        second,
    }
}

/// Convert an ET Julian day to a civil UTC date.
///
/// The inverse of [`utc_to_jd`] on its ET output. Before the leap-second era
/// the conversion goes through UT1 instead of TAI.
pub fn jdet_to_utc(jd_et: JulianDay, calendar: Calendar) -> UtcDate {
    if jd_et - tt_utc(jd_et) / SECONDS_PER_DAY < LEAP_SECONDS[0].0 {
        let jd_ut1 = et_to_ut1(jd_et);
        let day = (jd_ut1 + 0.5).floor() - 0.5;
        return split_day(day, (jd_ut1 - day) * SECONDS_PER_DAY, calendar);
    }

    // An inserted leap second occupies the ET interval between the pre-step
    // and post-step TT-UTC offsets at the leap midnight; its civil label is
    // 23:59:60 of the day before, not 00:00:00 of the day after.
    let midnight = (jd_et - tt_utc(jd_et) / SECONDS_PER_DAY - 0.5).round() + 0.5;
    if tai_utc(midnight) > tai_utc(midnight - 1.0) {
        let leap_start = midnight + tt_utc(midnight - 1.0) / SECONDS_PER_DAY;
        let leap_end = midnight + tt_utc(midnight) / SECONDS_PER_DAY;
        if (leap_start..leap_end).contains(&jd_et) {
            let date = revjul(midnight - 1.0, calendar);
            return UtcDate {
                year: date.year,
                month: date.month,
                day: date.day,
                hour: 23,
                minute: 59,
                second: 60.0 + (jd_et - leap_start) * SECONDS_PER_DAY,
            };
        }
    }

    // TT−UTC is piecewise constant; one correction step settles the day.
    let mut jd_utc = jd_et - tt_utc(jd_et) / SECONDS_PER_DAY;
    jd_utc = jd_et - tt_utc(jd_utc) / SECONDS_PER_DAY;

    let day = (jd_utc + 0.5).floor() - 0.5;
    let mut sec_of_day = (jd_utc - day) * SECONDS_PER_DAY;
    // Snap sub-microsecond residue at the day boundary.
    if sec_of_day > SECONDS_PER_DAY - 1e-6 {
        return split_day(day + 1.0, 0.0, calendar);
    }
    if sec_of_day < 1e-9 {
        sec_of_day = 0.0;
    }
    split_day(day, sec_of_day, calendar)
}

/// Convert a UT1 Julian day to a civil UTC date.
///
/// The inverse of [`utc_to_jd`] on its UT1 output, routed through ET so the
/// leap-second bookkeeping stays in one place.
pub fn jdut1_to_utc(jd_ut1: JulianDay, calendar: Calendar) -> UtcDate {
    let jd_et = jd_ut1 + delta_t(jd_ut1) / SECONDS_PER_DAY;
    jdet_to_utc(jd_et, calendar)
}

/// Shift a civil date by a fixed time-zone offset in hours.
///
/// A positive `tz_hours` converts zone time to UTC eastward (e.g. `+5.5` turns
/// 12:00 IST into 06:30 UTC); use the negated offset for the reverse
/// direction. Leap seconds are left untouched: second 60 stays second 60.
pub fn utc_time_zone(date: UtcDate, tz_hours: f64) -> UtcDate {
    let leap = date.second >= 60.0;
    let second = if leap { date.second - 1.0 } else { date.second };

    let jd = julday(date.year, date.month, date.day, 0.0, Calendar::Gregorian)
        + (date.hour as f64 * 3600.0 + date.minute as f64 * 60.0 + second) / SECONDS_PER_DAY
        - tz_hours / 24.0;

    let day = (jd + 0.5).floor() - 0.5;
    let mut out = split_day(day, (jd - day) * SECONDS_PER_DAY, Calendar::Gregorian);
    // Round away float residue from the day arithmetic (sub-microsecond).
    out.second = (out.second * 1e6).round() / 1e6;
    if out.second >= 60.0 {
        out.second = 0.0;
    }
    if leap {
        out.second += 1.0;
    }
    out
}

// -------------------------------------------------------------------------------------------------
// hifitime bridge
// -------------------------------------------------------------------------------------------------

/// Parse an ISO 8601 UTC timestamp (`YYYY-MM-DDTHH:MM:SS`) into a UT Julian day.
///
/// Thin wrapper over [`hifitime::Epoch`]; only proleptic-Gregorian dates within
/// hifitime's range are accepted.
pub fn iso_to_jd_ut(date: &str) -> Result<JulianDay, SidereaError> {
    Epoch::from_str(date)
        .map(|e| e.to_jde_utc_days())
        .map_err(|e| SidereaError::OutOfRange(format!("{date}: {e}")))
}

/// Parse an ISO 8601 UTC timestamp into an ET (TT) Julian day.
pub fn iso_to_jd_et(date: &str) -> Result<JulianDay, SidereaError> {
    Epoch::from_str(date)
        .map(|e| e.to_jde_tt_days())
        .map_err(|e| SidereaError::OutOfRange(format!("{date}: {e}")))
}
