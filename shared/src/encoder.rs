//! Reading to visual attribute mapping.
//!
//! Every derived value is a pure function of the reading and the basemap the
//! record will be drawn on. The numeric mappings live in small policy values so
//! an [`Encoder`] applies exactly one of each to a whole batch.

use crate::models::{Classification, EncodedRecord, Rgba, WeatherReading};
use crate::style::{select_style, MapStyle};

/// Temperature range (°C) spanned by the color gradient.
pub const TEMPERATURE_DOMAIN: (f64, f64) = (0.0, 35.0);

const ALPHA_DARK: u8 = 200;
const ALPHA_LIGHT: u8 = 210;
/// Near-white RGB for sub-zero precipitation; alpha follows the basemap.
const SNOW: [u8; 3] = [235, 242, 255];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorPolicy {
    /// Red rises and blue falls linearly over the temperature domain.
    Gradient { green: u8, snow: bool },
    /// Fixed bands: >=30 purple, >=20 orange, >=10 yellow-green, >0 cyan, else blue.
    Banded { snow: bool },
}

impl ColorPolicy {
    pub const GRADIENT: ColorPolicy = ColorPolicy::Gradient {
        green: 100,
        snow: true,
    };
    pub const BANDED: ColorPolicy = ColorPolicy::Banded { snow: true };

    pub fn color(&self, reading: &WeatherReading, basemap: MapStyle) -> Rgba {
        let alpha = if basemap.is_light() {
            ALPHA_LIGHT
        } else {
            ALPHA_DARK
        };
        let t = reading.temperature;

        let snow = match self {
            ColorPolicy::Gradient { snow, .. } | ColorPolicy::Banded { snow } => *snow,
        };
        if snow && t < 0.0 && reading.precipitation > 0.0 {
            let [r, g, b] = SNOW;
            return Rgba::new(r, g, b, alpha);
        }

        match self {
            ColorPolicy::Gradient { green, .. } => {
                let norm = normalize_temperature(t);
                Rgba::new(
                    (255.0 * norm).round() as u8,
                    *green,
                    (255.0 * (1.0 - norm)).round() as u8,
                    alpha,
                )
            }
            ColorPolicy::Banded { .. } => {
                let [r, g, b] = if t >= 30.0 {
                    [128, 0, 128]
                } else if t >= 20.0 {
                    [255, 165, 0]
                } else if t >= 10.0 {
                    [154, 205, 50]
                } else if t > 0.0 {
                    [0, 255, 255]
                } else {
                    [0, 0, 255]
                };
                Rgba::new(r, g, b, alpha)
            }
        }
    }
}

/// Column height: `scale * (temperature + offset)`, never below zero.
///
/// The offset keeps sub-freezing cities visible as short columns instead of
/// collapsing them to flat markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationPolicy {
    pub scale: f64,
    pub offset: f64,
}

impl ElevationPolicy {
    pub const OFFSET: ElevationPolicy = ElevationPolicy {
        scale: 2500.0,
        offset: 10.0,
    };
    pub const LINEAR: ElevationPolicy = ElevationPolicy {
        scale: 5000.0,
        offset: 0.0,
    };

    pub fn elevation(&self, temperature: f64) -> f64 {
        (self.scale * (temperature + self.offset)).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusPolicy {
    pub base: f64,
    pub per_mm: f64,
}

impl RadiusPolicy {
    pub const DEFAULT: RadiusPolicy = RadiusPolicy {
        base: 5000.0,
        per_mm: 5000.0,
    };

    pub fn radius(&self, precipitation: f64) -> f64 {
        self.base + precipitation.max(0.0) * self.per_mm
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Encoder {
    pub color: ColorPolicy,
    pub elevation: ElevationPolicy,
    pub precipitation: RadiusPolicy,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            color: ColorPolicy::GRADIENT,
            elevation: ElevationPolicy::OFFSET,
            precipitation: RadiusPolicy::DEFAULT,
        }
    }
}

impl Encoder {
    pub fn encode(&self, reading: &WeatherReading, basemap: MapStyle) -> EncodedRecord {
        EncodedRecord {
            reading: reading.clone(),
            fill_color: self.color.color(reading, basemap),
            elevation: self.elevation.elevation(reading.temperature),
            precipitation_radius: self.precipitation.radius(reading.precipitation),
            wind_icon_angle: wind_icon_angle(reading.wind_direction),
            classification: Classification::of(reading.temperature, reading.precipitation),
        }
    }
}

/// Encode with the default policies, on the basemap the hour calls for.
pub fn encode(reading: &WeatherReading, now_hour: u32) -> EncodedRecord {
    Encoder::default().encode(reading, select_style(None, now_hour))
}

pub fn normalize_temperature(temperature: f64) -> f64 {
    let (min, max) = TEMPERATURE_DOMAIN;
    ((temperature - min) / (max - min)).clamp(0.0, 1.0)
}

/// Rotation for an "up"-pointing glyph so it points where the wind blows to.
///
/// Directions are reported as "from", hence the 180° correction.
pub fn wind_icon_angle(wind_direction: f64) -> f64 {
    let angle = (180.0 - wind_direction).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}
