use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CityLocation {
    pub name: String,
    pub position: LngLat,
}

impl CityLocation {
    pub fn new(name: &str, lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            position: LngLat { lng, lat },
        }
    }
}

/// One city's observed weather for the current fetch cycle.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub city: CityLocation,
    /// Degrees Celsius
    pub temperature: f64,
    /// Millimeters, never negative
    pub precipitation: f64,
    /// km/h, never negative
    pub wind_speed: f64,
    /// Degrees the wind blows from, 0..360
    pub wind_direction: f64,
    pub observed_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }

    pub fn red(&self) -> u8 {
        self.0[0]
    }

    pub fn green(&self) -> u8 {
        self.0[1]
    }

    pub fn blue(&self) -> u8 {
        self.0[2]
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Classification {
    WarmDry,
    WarmWet,
    ColdDry,
    ColdWet,
}

impl Classification {
    pub fn of(temperature: f64, precipitation: f64) -> Self {
        match (temperature > 0.0, precipitation > 0.0) {
            (true, false) => Classification::WarmDry,
            (true, true) => Classification::WarmWet,
            (false, false) => Classification::ColdDry,
            (false, true) => Classification::ColdWet,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Classification::WarmDry => "warm-dry",
            Classification::WarmWet => "warm-wet",
            Classification::ColdDry => "cold-dry",
            Classification::ColdWet => "cold-wet",
        }
    }

    pub fn is_wet(&self) -> bool {
        matches!(self, Classification::WarmWet | Classification::ColdWet)
    }
}

/// A reading plus the visual attributes derived from it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedRecord {
    #[serde(flatten)]
    pub reading: WeatherReading,
    pub fill_color: Rgba,
    pub elevation: f64,
    pub precipitation_radius: f64,
    pub wind_icon_angle: f64,
    pub classification: Classification,
}

impl EncodedRecord {
    pub fn city_name(&self) -> &str {
        &self.reading.city.name
    }

    pub fn position(&self) -> LngLat {
        self.reading.city.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tokyo_reading() -> WeatherReading {
        WeatherReading {
            city: CityLocation::new("Tokyo", 35.6895, 139.6917),
            temperature: 25.0,
            precipitation: 0.0,
            wind_speed: 12.5,
            wind_direction: 90.0,
            observed_at: NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_classification_quadrants() {
        assert_eq!(Classification::of(25.0, 0.0), Classification::WarmDry);
        assert_eq!(Classification::of(25.0, 3.2), Classification::WarmWet);
        assert_eq!(Classification::of(-2.0, 0.0), Classification::ColdDry);
        assert_eq!(Classification::of(-2.0, 1.0), Classification::ColdWet);
    }

    #[test]
    fn test_classification_zero_is_cold() {
        assert_eq!(Classification::of(0.0, 0.0), Classification::ColdDry);
    }

    #[test]
    fn test_encoded_record_flattens_reading() {
        let record = EncodedRecord {
            reading: tokyo_reading(),
            fill_color: Rgba::new(182, 100, 73, 200),
            elevation: 87500.0,
            precipitation_radius: 5000.0,
            wind_icon_angle: 90.0,
            classification: Classification::WarmDry,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["city"]["name"], "Tokyo");
        assert_eq!(json["temperature"], 25.0);
        assert_eq!(json["windSpeed"], 12.5);
        assert_eq!(json["fillColor"], serde_json::json!([182, 100, 73, 200]));
        assert_eq!(json["classification"], "WarmDry");
        assert_eq!(json["observedAt"], "2024-07-01T14:00:00");
    }
}
