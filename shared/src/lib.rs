//! Weather readings to 3D map layers.
//!
//! Pure, synchronous building blocks: encode readings, group them into
//! layers, plan the camera and pick the basemap. No I/O happens here.

pub mod encoder;
pub mod layers;
pub mod models;
pub mod pipeline;
pub mod style;
pub mod viewport;

pub use encoder::{encode, ColorPolicy, ElevationPolicy, Encoder, RadiusPolicy};
pub use layers::{compose, LayerGroup, LayerKind};
pub use models::{Classification, CityLocation, EncodedRecord, LngLat, Rgba, WeatherReading};
pub use pipeline::{RenderPayload, Snapshot, SnapshotPipeline};
pub use style::{select_style, MapStyle};
pub use viewport::{plan, Camera, ViewConfig};
