use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Resolved place for a query, as reported by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(rename = "icon")]
    pub icon_url: String,
    /// Upstream classification code, not interpreted locally.
    pub code: i64,
}

/// Current conditions. Celsius and Fahrenheit values are both supplied by
/// the API and passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "temp_c")]
    pub temperature_c: f64,
    #[serde(rename = "temp_f")]
    pub temperature_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    /// Expected in 0..=100, not enforced.
    #[serde(rename = "humidity")]
    pub humidity_pct: i64,
    #[serde(rename = "feelslike_c")]
    pub feels_like_c: f64,
    #[serde(rename = "feelslike_f")]
    pub feels_like_f: f64,
}

/// Result of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
}

impl WeatherReport {
    /// Parse a `current.json` response body.
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        serde_json::from_str(body).map_err(|e| WeatherError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LONDON: &str = r#"{
        "location": {
            "name": "London",
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "lat": 51.52,
            "localtime": "2024-01-15 14:30"
        },
        "current": {
            "temp_c": 8.0,
            "temp_f": 46.4,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_kph": 20.5,
            "humidity": 72,
            "feelslike_c": 5.0,
            "feelslike_f": 41.0,
            "uv": 1.0
        }
    }"#;

    #[test]
    fn parses_current_json_exactly() {
        let report = WeatherReport::from_json(LONDON).expect("valid payload");

        assert_eq!(report.location.name, "London");
        assert_eq!(report.location.region, "City of London, Greater London");
        assert_eq!(report.location.country, "United Kingdom");
        assert_eq!(report.location.localtime, "2024-01-15 14:30");

        let c = &report.current;
        assert_eq!(c.temperature_c, 8.0);
        assert_eq!(c.temperature_f, 46.4);
        assert_eq!(c.wind_kph, 20.5);
        assert_eq!(c.humidity_pct, 72);
        assert_eq!(c.feels_like_c, 5.0);
        assert_eq!(c.feels_like_f, 41.0);
        assert_eq!(c.condition.text, "Partly cloudy");
        assert_eq!(
            c.condition.icon_url,
            "//cdn.weatherapi.com/weather/64x64/day/116.png"
        );
        assert_eq!(c.condition.code, 1003);
    }

    #[test]
    fn missing_temp_c_is_a_hard_failure() {
        let body = LONDON.replace(r#""temp_c": 8.0,"#, "");
        let err = WeatherReport::from_json(&body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert!(err.to_string().contains("temp_c"));
    }

    #[test]
    fn wrong_json_type_is_rejected() {
        let body = LONDON.replace(r#""humidity": 72"#, r#""humidity": "72""#);
        let err = WeatherReport::from_json(&body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn missing_condition_object_is_rejected() {
        let body = r#"{"location": {"name": "X", "region": "", "country": "", "localtime": ""},
                       "current": {"temp_c": 1.0, "temp_f": 33.8, "wind_kph": 0.0, "humidity": 1,
                                   "feelslike_c": 1.0, "feelslike_f": 33.8}}"#;
        let err = WeatherReport::from_json(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let report = WeatherReport::from_json(LONDON).expect("valid payload");
        let value = serde_json::to_value(&report).expect("serializable");

        assert_eq!(value["current"]["temp_c"], 8.0);
        assert_eq!(
            value["current"]["condition"]["icon"],
            "//cdn.weatherapi.com/weather/64x64/day/116.png"
        );
    }
}
