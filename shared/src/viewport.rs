use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{EncodedRecord, LngLat};
use crate::style::MapStyle;

pub const PITCH: f64 = 45.0;
pub const BEARING: f64 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub map_style: MapStyle,
}

impl ViewConfig {
    pub fn new(camera: Camera, map_style: MapStyle) -> Self {
        ViewConfig {
            center: camera.center,
            zoom: camera.zoom,
            pitch: camera.pitch,
            bearing: camera.bearing,
            map_style,
        }
    }
}

/// Fewer cities cover a tighter region, so they get a closer zoom.
pub fn zoom_for(city_count: usize) -> f64 {
    match city_count {
        0 | 1 => 9.0,
        2..=3 => 7.5,
        4..=7 => 6.5,
        _ => 4.5,
    }
}

/// Camera centered on the mean position of the batch.
///
/// Returns `None` for an empty batch, whose mean is undefined.
pub fn plan(records: &[EncodedRecord]) -> Option<Camera> {
    if records.is_empty() {
        return None;
    }

    let count = records.len() as f64;
    let (lng_sum, lat_sum) = records.iter().fold((0.0, 0.0), |(lng, lat), record| {
        let position = record.position();
        (lng + position.lng, lat + position.lat)
    });
    let cities: HashSet<&str> = records.iter().map(|r| r.city_name()).collect();

    Some(Camera {
        center: LngLat::new(lng_sum / count, lat_sum / count),
        zoom: zoom_for(cities.len()),
        pitch: PITCH,
        bearing: BEARING,
    })
}
