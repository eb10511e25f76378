//! Great-circle math for airport proximity and relative direction.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per nautical mile.
pub const KM_PER_NM: f64 = 1.852;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two points in nautical miles.
pub fn distance_nm(a: Position, b: Position) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    (EARTH_RADIUS_KM * c) / KM_PER_NM
}

/// Initial bearing from `from` to `to`, in degrees within `[0, 360)`.
pub fn bearing_deg(from: Position, to: Position) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lon - from.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_deg(x.atan2(y).to_degrees())
}

/// Wrap any angle into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// The eight principal compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 8] = [
        CompassPoint::North,
        CompassPoint::NorthEast,
        CompassPoint::East,
        CompassPoint::SouthEast,
        CompassPoint::South,
        CompassPoint::SouthWest,
        CompassPoint::West,
        CompassPoint::NorthWest,
    ];

    /// Bucket a bearing into 45° sectors centred on each direction.
    ///
    /// Sector lower bounds are inclusive, so 22.5° is north-east and
    /// 337.5° is north.
    pub fn from_bearing(bearing: f64) -> Self {
        let shifted = normalize_deg(bearing) + 22.5;
        let index = (shifted / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    /// Localized direction word used in prompts.
    pub fn label(self, language: Language) -> &'static str {
        language.phrases().compass[self as usize]
    }
}
