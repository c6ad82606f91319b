//! Geographic records returned by a city search.
//!
//! Country and state are embedded by value: a `City` is a denormalised
//! join row, never a reference into some other owned collection.

use serde::{Deserialize, Serialize};

/// A city joined with its owning country and state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub lat: f64,
    pub lng: f64,
    pub country: Country,
    pub state: State,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    pub iso2: String,
    pub phonecode: String,
    pub native: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    pub iso2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_json_shape() {
        let city = City {
            id: "1".into(),
            name: "Newcastle".into(),
            country_code: "GB".into(),
            lat: 54.97,
            lng: -1.61,
            country: Country { id: "232".into(), name: "United Kingdom".into(), iso2: "GB".into(), ..Default::default() },
            state: State { id: "2336".into(), name: "England".into(), iso2: "ENG".into() },
        };

        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["country_code"], "GB");
        assert_eq!(json["lat"], 54.97);
        assert_eq!(json["country"]["iso2"], "GB");
        assert_eq!(json["country"]["emoji"], "");
        assert_eq!(json["state"]["name"], "England");
    }
}
