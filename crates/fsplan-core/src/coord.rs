// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Degrees-minutes-seconds rendering for the `WorldPosition` / `*LLA` fields
//! of a flight plan.

/// Highest elevation the simulator accepts in a position string (feet).
pub const MAX_ELEVATION: f64 = 999_999.99;

/// Decimal places used for seconds in every position string.
pub const SECONDS_PRECISION: usize = 3;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

struct Dms {
    degrees: u32,
    minutes: u32,
    seconds: f64,
}

impl Dms {
    fn split(value: f64, precision: usize) -> Self {
        let multiplier = 10f64.powi(precision as i32);
        let abs = value.abs();
        let mut degrees = abs.trunc() as u32;
        let float_minutes = (abs - degrees as f64) * 60.0;
        let mut minutes = float_minutes.trunc() as u32;
        let mut seconds = (float_minutes - minutes as f64) * 60.0;

        // Rounding must never print 60 seconds
        if (seconds * multiplier).round() >= 60.0 * multiplier {
            seconds = (seconds - 60.0).max(0.0);
            minutes += 1;
            if minutes >= 60 {
                minutes -= 60;
                degrees += 1;
            }
        }

        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    fn rounds_to_zero(&self, precision: usize) -> bool {
        let multiplier = 10f64.powi(precision as i32);
        self.degrees == 0 && self.minutes == 0 && (self.seconds * multiplier).round() == 0.0
    }

    fn render(&self, precision: usize, hemisphere: &str) -> String {
        format!(
            "{}\u{00B0}{}\u{2032}{:.*}\u{2033}{}",
            self.degrees, self.minutes, precision, self.seconds, hemisphere
        )
    }
}

/// Formats a longitude as `D°M′S.sss″H`, wrapping it into [-180, 180] first.
pub fn format_longitude_dms(lon: f64, precision: usize) -> String {
    let mut wrapped = lon % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped < -180.0 {
        wrapped += 360.0;
    }

    let dms = Dms::split(wrapped, precision);
    let multiplier = 10f64.powi(precision as i32);
    let mut hemisphere = if wrapped < 0.0 { "W" } else { "E" };
    if dms.rounds_to_zero(precision) {
        hemisphere = "";
    }
    // The antimeridian is neither east nor west
    if dms.degrees == 180 && dms.minutes == 0 && dms.seconds < 0.5 / multiplier {
        hemisphere = "";
    }
    dms.render(precision, hemisphere)
}

/// Formats a latitude as `D°M′S.sss″H`, wrapping it into [-90, 90] first.
pub fn format_latitude_dms(lat: f64, precision: usize) -> String {
    let mut wrapped = lat % 180.0;
    if wrapped > 90.0 {
        wrapped -= 180.0;
    } else if wrapped < -90.0 {
        wrapped += 180.0;
    }

    let dms = Dms::split(wrapped, precision);
    let mut hemisphere = if wrapped < 0.0 { "S" } else { "N" };
    if dms.rounds_to_zero(precision) {
        hemisphere = "";
    }
    dms.render(precision, hemisphere)
}

/// Moves a trailing hemisphere letter to the front and swaps the unicode
/// minute/second marks for plain quotes, e.g. `47°30′0.000″N` becomes
/// `N47° 30' 0.000"`.
pub fn prefix_hemisphere(formatted: &str) -> String {
    let reordered = match formatted.chars().last() {
        Some(c @ ('N' | 'S' | 'E' | 'W')) => {
            format!("{}{}", c, &formatted[..formatted.len() - c.len_utf8()])
        }
        _ => formatted.to_string(),
    };
    reordered
        .replace('\u{00B0}', "\u{00B0} ")
        .replace('\u{2032}', "' ")
        .replace('\u{2033}', "\"")
}

/// Zero-padded, capped elevation magnitude: `50.0` -> `000050.00`.
pub fn format_elevation(elevation: f64) -> String {
    let capped = elevation.abs().min(MAX_ELEVATION);
    format!("{:09.2}", capped)
}

/// Full `lat,lon,±elevation` string used by `WorldPosition` and `*LLA`.
pub fn format_position(point: GeoPoint, elevation: f64) -> String {
    let lat = prefix_hemisphere(&format_latitude_dms(point.lat, SECONDS_PRECISION));
    let lon = prefix_hemisphere(&format_longitude_dms(point.lon, SECONDS_PRECISION));
    let sign = if elevation < 0.0 { '-' } else { '+' };
    format!("{},{},{}{}", lat, lon, sign, format_elevation(elevation))
}
