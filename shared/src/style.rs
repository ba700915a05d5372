use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hour (local, inclusive) at which the night basemap takes over.
pub const NIGHT_STARTS_AT: u32 = 18;
/// Hour (local, exclusive) until which the night basemap stays on.
pub const NIGHT_ENDS_AT: u32 = 6;

/// Basemap style keys understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    Light,
    Dark,
    Road,
    Satellite,
}

impl MapStyle {
    pub fn key(&self) -> &'static str {
        match self {
            MapStyle::Light => "light",
            MapStyle::Dark => "dark",
            MapStyle::Road => "road",
            MapStyle::Satellite => "satellite",
        }
    }

    /// Light backgrounds need a slightly more opaque fill to keep contrast.
    pub fn is_light(&self) -> bool {
        matches!(self, MapStyle::Light | MapStyle::Road)
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MapStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<MapStyle, String> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(MapStyle::Light),
            "dark" => Ok(MapStyle::Dark),
            "road" => Ok(MapStyle::Road),
            "satellite" => Ok(MapStyle::Satellite),
            other => Err(format!("unknown map style: {}", other)),
        }
    }
}

/// Pick the basemap for this render cycle.
///
/// An explicit user choice always wins. Otherwise the style follows the local
/// wall-clock hour: dark from 18:00 until 06:00, light in between. Nothing is
/// cached, so callers must call this again on every cycle.
pub fn select_style(choice: Option<MapStyle>, now_hour: u32) -> MapStyle {
    match choice {
        Some(style) => style,
        None if is_night(now_hour) => MapStyle::Dark,
        None => MapStyle::Light,
    }
}

pub fn is_night(hour: u32) -> bool {
    let hour = hour % 24;
    hour >= NIGHT_STARTS_AT || hour < NIGHT_ENDS_AT
}
