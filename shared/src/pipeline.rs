use serde::{Deserialize, Serialize};

use crate::encoder::Encoder;
use crate::layers::{compose, LayerGroup};
use crate::models::{EncodedRecord, WeatherReading};
use crate::style::{select_style, MapStyle};
use crate::viewport::{plan, ViewConfig};

/// Tooltip shown on hover; placeholders are record field paths.
pub const TOOLTIP_TEMPLATE: &str = "<b>{city.name}</b><br>Temperature: {temperature}°C<br>Precipitation: {precipitation} mm<br>Wind: {windSpeed} km/h";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub layers: Vec<LayerGroup>,
    pub view: ViewConfig,
    pub style: MapStyle,
    pub tooltip: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Snapshot {
    Ready(RenderPayload),
    /// Every city failed to fetch; nothing to draw.
    NoData,
}

impl Snapshot {
    pub fn payload(&self) -> Option<&RenderPayload> {
        match self {
            Snapshot::Ready(payload) => Some(payload),
            Snapshot::NoData => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapshotPipeline {
    pub encoder: Encoder,
}

impl SnapshotPipeline {
    pub fn new(encoder: Encoder) -> Self {
        Self { encoder }
    }

    pub fn encode_all(&self, readings: &[WeatherReading], style: MapStyle) -> Vec<EncodedRecord> {
        readings
            .iter()
            .map(|reading| self.encoder.encode(reading, style))
            .collect()
    }

    /// Turn one batch of readings into a render payload.
    ///
    /// The style is re-selected on every call. An empty batch yields
    /// [`Snapshot::NoData`] without touching the composer or the planner.
    pub fn run(
        &self,
        readings: &[WeatherReading],
        style_choice: Option<MapStyle>,
        now_hour: u32,
    ) -> Snapshot {
        let style = select_style(style_choice, now_hour);
        let records = self.encode_all(readings, style);

        let camera = match plan(&records) {
            Some(camera) => camera,
            None => return Snapshot::NoData,
        };

        Snapshot::Ready(RenderPayload {
            layers: compose(&records),
            view: ViewConfig::new(camera, style),
            style,
            tooltip: TOOLTIP_TEMPLATE.to_string(),
        })
    }
}
