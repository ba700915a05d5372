use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Classification, EncodedRecord, Rgba};

/// Layer kinds, declared back-to-front.
///
/// The derived `Ord` is the draw order the renderer must respect: ground
/// markers first so columns occlude them, flat ripples above the ground, wind
/// glyphs always on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum LayerKind {
    FlatMarker,
    Column,
    PrecipitationRipple,
    WindArrow,
}

impl LayerKind {
    pub fn primitive(&self) -> &'static str {
        match self {
            LayerKind::FlatMarker => "flat-disc",
            LayerKind::Column => "extruded-column",
            LayerKind::PrecipitationRipple => "ripple-circle",
            LayerKind::WindArrow => "rotated-glyph",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            LayerKind::FlatMarker => "marker",
            LayerKind::Column => "column",
            LayerKind::PrecipitationRipple => "ripple",
            LayerKind::WindArrow => "wind",
        }
    }

    pub fn hints(&self) -> RenderHints {
        match self {
            LayerKind::FlatMarker => RenderHints {
                radius: Some(MARKER_RADIUS),
                pickable: true,
                ..RenderHints::default()
            },
            LayerKind::Column => RenderHints {
                radius: Some(MARKER_RADIUS),
                pickable: true,
                auto_highlight: true,
                transitions: vec![
                    Transition::interpolate("elevation"),
                    Transition::interpolate("fillColor"),
                ],
                ..RenderHints::default()
            },
            // ripple radius is per record, see `EncodedRecord::precipitation_radius`
            LayerKind::PrecipitationRipple => RenderHints::default(),
            LayerKind::WindArrow => RenderHints {
                glyph: Some(Glyph {
                    text: WIND_GLYPH.to_string(),
                    size_field: "windSpeed".to_string(),
                    size_scale: 2.0,
                    color: Rgba::new(80, 80, 80, 255),
                    pixel_offset: [0, -30],
                }),
                transitions: vec![Transition::timed("windIconAngle")],
                ..RenderHints::default()
            },
        }
    }
}

/// Footprint radius of columns and flat markers, in map units.
pub const MARKER_RADIUS: f64 = 18000.0;
pub const WIND_GLYPH: &str = "↑";
pub const TRANSITION_MS: u32 = 1000;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    pub pickable: bool,
    pub auto_highlight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<Glyph>,
    pub transitions: Vec<Transition>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Glyph {
    pub text: String,
    pub size_field: String,
    pub size_scale: f64,
    pub color: Rgba,
    pub pixel_offset: [i32; 2],
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub field: String,
    pub duration_ms: u32,
    pub interpolation: bool,
}

impl Transition {
    fn interpolate(field: &str) -> Self {
        Transition {
            field: field.to_string(),
            duration_ms: TRANSITION_MS,
            interpolation: true,
        }
    }

    /// Plain duration transition; the renderer does not tween the value.
    fn timed(field: &str) -> Self {
        Transition {
            interpolation: false,
            ..Transition::interpolate(field)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    pub id: String,
    pub kind: LayerKind,
    pub primitive: String,
    pub classification: Classification,
    pub draw_order: usize,
    pub records: Vec<EncodedRecord>,
    pub hints: RenderHints,
}

/// The ground layer a record sits on.
pub fn ground_kind(record: &EncodedRecord) -> LayerKind {
    if record.elevation > 0.0 {
        LayerKind::Column
    } else {
        LayerKind::FlatMarker
    }
}

/// Every layer a record participates in, back-to-front.
pub fn kinds_for(record: &EncodedRecord) -> Vec<LayerKind> {
    let mut kinds = vec![ground_kind(record)];
    if record.reading.precipitation > 0.0 {
        kinds.push(LayerKind::PrecipitationRipple);
    }
    kinds.push(LayerKind::WindArrow);
    kinds
}

/// Partition a batch into layer groups, one per (kind, classification) pair
/// present, in draw order. Records keep their batch order within a group.
pub fn compose(records: &[EncodedRecord]) -> Vec<LayerGroup> {
    let mut buckets: BTreeMap<(LayerKind, Classification), Vec<EncodedRecord>> = BTreeMap::new();

    for record in records {
        for kind in kinds_for(record) {
            buckets
                .entry((kind, record.classification))
                .or_default()
                .push(record.clone());
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(draw_order, ((kind, classification), records))| LayerGroup {
            id: format!("{}-{}", kind.slug(), classification.slug()),
            kind,
            primitive: kind.primitive().to_string(),
            classification,
            draw_order,
            records,
            hints: kind.hints(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{ElevationPolicy, Encoder};
    use crate::models::{CityLocation, WeatherReading};
    use crate::style::MapStyle;
    use chrono::NaiveDate;

    fn record(name: &str, temperature: f64, precipitation: f64) -> EncodedRecord {
        record_with(Encoder::default(), name, temperature, precipitation)
    }

    fn record_with(
        encoder: Encoder,
        name: &str,
        temperature: f64,
        precipitation: f64,
    ) -> EncodedRecord {
        let reading = WeatherReading {
            city: CityLocation::new(name, 35.0, 135.0),
            temperature,
            precipitation,
            wind_speed: 8.0,
            wind_direction: 45.0,
            observed_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };
        encoder.encode(&reading, MapStyle::Dark)
    }

    fn names(group: &LayerGroup) -> Vec<&str> {
        group.records.iter().map(|r| r.city_name()).collect()
    }

    #[test]
    fn test_draw_order_is_back_to_front() {
        let linear = Encoder {
            elevation: ElevationPolicy::LINEAR,
            ..Encoder::default()
        };
        let records = vec![
            record("Tokyo", 25.0, 0.0),
            record_with(linear, "Sapporo", -2.0, 1.0),
        ];

        let groups = compose(&records);
        let kinds: Vec<LayerKind> = groups.iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::FlatMarker,
                LayerKind::Column,
                LayerKind::PrecipitationRipple,
                LayerKind::WindArrow,
                LayerKind::WindArrow,
            ]
        );
        let orders: Vec<usize> = groups.iter().map(|g| g.draw_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_dry_record_skips_ripples() {
        let groups = compose(&[record("Tokyo", 25.0, 0.0)]);

        assert!(groups
            .iter()
            .all(|g| g.kind != LayerKind::PrecipitationRipple));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "column-warm-dry");
        assert_eq!(groups[1].id, "wind-warm-dry");
    }

    #[test]
    fn test_wet_record_gets_ripple() {
        let groups = compose(&[record("Sapporo", -2.0, 1.0)]);

        let ripple = groups
            .iter()
            .find(|g| g.kind == LayerKind::PrecipitationRipple)
            .unwrap();
        assert_eq!(ripple.id, "ripple-cold-wet");
        assert_eq!(ripple.primitive, "ripple-circle");
        assert_eq!(ripple.records[0].precipitation_radius, 10000.0);
    }

    #[test]
    fn test_each_record_has_exactly_one_ground_layer() {
        let records = vec![
            record("Naha", 28.0, 0.0),
            record("Fukuoka", 14.0, 2.0),
            record("Sendai", -1.0, 0.0),
            record("Sapporo", -12.0, 0.5),
        ];
        let groups = compose(&records);

        for r in &records {
            let ground = groups
                .iter()
                .filter(|g| matches!(g.kind, LayerKind::Column | LayerKind::FlatMarker))
                .filter(|g| names(g).contains(&r.city_name()))
                .count();
            assert_eq!(ground, 1, "{} ground layers", r.city_name());
        }

        let wind: usize = groups
            .iter()
            .filter(|g| g.kind == LayerKind::WindArrow)
            .map(|g| g.records.len())
            .sum();
        assert_eq!(wind, records.len());
    }

    #[test]
    fn test_groups_partition_by_classification() {
        let records = vec![
            record("Naha", 28.0, 0.0),
            record("Fukuoka", 14.0, 2.0),
            record("Osaka", 20.0, 0.0),
        ];
        let groups = compose(&records);
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "column-warm-dry",
                "column-warm-wet",
                "ripple-warm-wet",
                "wind-warm-dry",
                "wind-warm-wet",
            ]
        );
        assert_eq!(names(&groups[0]), vec!["Naha", "Osaka"]);
    }

    #[test]
    fn test_renderer_hints() {
        let column = LayerKind::Column.hints();
        assert_eq!(column.radius, Some(MARKER_RADIUS));
        assert!(column.auto_highlight);
        assert_eq!(column.transitions.len(), 2);
        assert!(column.transitions.iter().all(|t| t.interpolation));

        let wind = LayerKind::WindArrow.hints();
        assert_eq!(
            wind.transitions,
            vec![Transition {
                field: "windIconAngle".to_string(),
                duration_ms: 1000,
                interpolation: false,
            }]
        );
        let glyph = wind.glyph.unwrap();
        assert_eq!(glyph.text, "↑");
        assert_eq!(glyph.pixel_offset, [0, -30]);
        assert_eq!(glyph.color, Rgba::new(80, 80, 80, 255));
    }

    #[test]
    fn test_empty_batch() {
        assert!(compose(&[]).is_empty());
    }
}
