use serde::Serialize;
use shared::CityLocation;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub key: String,
    pub name: String,
    pub cities: Vec<CityLocation>,
}

pub fn find(key: &str) -> Option<Region> {
    all().into_iter().find(|region| region.key == key)
}

pub fn all() -> Vec<Region> {
    vec![
        Region {
            key: "japan".to_string(),
            name: "Japan (nationwide)".to_string(),
            cities: vec![
                CityLocation::new("Sapporo", 43.0642, 141.3468),
                CityLocation::new("Sendai", 38.2682, 140.8694),
                CityLocation::new("Tokyo", 35.6895, 139.6917),
                CityLocation::new("Nagoya", 35.1815, 136.9066),
                CityLocation::new("Osaka", 34.6937, 135.5023),
                CityLocation::new("Hiroshima", 34.3853, 132.4553),
                CityLocation::new("Fukuoka", 33.5904, 130.4017),
                CityLocation::new("Naha", 26.2124, 127.6809),
            ],
        },
        Region {
            key: "kyushu".to_string(),
            name: "Kyushu".to_string(),
            cities: vec![
                CityLocation::new("Fukuoka", 33.5904, 130.4017),
                CityLocation::new("Saga", 33.2494, 130.2974),
                CityLocation::new("Nagasaki", 32.7450, 129.8739),
                CityLocation::new("Kumamoto", 32.7900, 130.7420),
                CityLocation::new("Oita", 33.2381, 131.6119),
                CityLocation::new("Miyazaki", 31.9110, 131.4240),
                CityLocation::new("Kagoshima", 31.5600, 130.5580),
            ],
        },
    ]
}
