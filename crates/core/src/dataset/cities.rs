//! City prefix lookup.
//!
//! One statement joins cities to countries (inner) and to states (right
//! outer). Both the pattern and the limit are bound parameters.

use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row, types::Value};

use super::connection::Dataset;
use crate::error::DatasetError;
use crate::model::{City, Country, State};
use crate::query::Limit;

/// Cities inner-joined to their country, right-joined to states.
///
/// The right join keeps every state row even when no city links to it, so a
/// city can appear once per matching state row. Rows without a city are then
/// dropped by the `LIKE` predicate, since a NULL name never matches.
const FIND_BY_PREFIX_SQL: &str = "SELECT cities.id, cities.name, cities.country_code,
        cities.latitude, cities.longitude, cities.country_id,
        countries.name AS c_name, countries.iso2 AS c_iso2, countries.phonecode AS c_phonecode,
        countries.native AS c_native, countries.emoji AS c_emoji,
        states.id AS s_id, states.name AS s_name, states.iso2 AS s_iso2
    FROM cities
    INNER JOIN countries ON cities.country_id = countries.id
    RIGHT JOIN states ON cities.state_id = states.id
    WHERE cities.name LIKE ?1 ESCAPE '\\'
    LIMIT ?2";

impl Dataset {
    /// Find cities whose name starts with `prefix`.
    ///
    /// Case sensitivity follows SQLite's `LIKE`, which folds ASCII only.
    /// Returns an empty vector when nothing matches.
    pub async fn find_cities_by_prefix(&self, prefix: &str, limit: Limit) -> Result<Vec<City>, DatasetError> {
        let pattern = like_prefix(prefix);
        let limit = i64::from(limit.get());

        self.with_deadline(async {
            self.conn
                .call(move |conn| -> Result<Vec<City>, DatasetError> {
                    let mut stmt = conn.prepare_cached(FIND_BY_PREFIX_SQL)?;
                    let rows = stmt.query_map(params![pattern, limit], city_from_row)?;
                    let cities = rows.collect::<Result<Vec<_>, _>>()?;
                    Ok(cities)
                })
                .await
                .map_err(DatasetError::from)
        })
        .await
    }
}

/// Build a `LIKE` pattern matching names that start with `prefix`.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    let country = Country {
        id: text(row, 5)?,
        name: text(row, 6)?,
        iso2: text(row, 7)?,
        phonecode: text(row, 8)?,
        native: text(row, 9)?,
        emoji: text(row, 10)?,
    };
    let state = State { id: text(row, 11)?, name: text(row, 12)?, iso2: text(row, 13)? };

    Ok(City {
        id: text(row, 0)?,
        name: text(row, 1)?,
        country_code: text(row, 2)?,
        lat: real(row, 3)?,
        lng: real(row, 4)?,
        country,
        state,
    })
}

/// Column as text; NULL becomes an empty string and numbers are rendered.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
    })
}

/// Column as a float; NULL and unparseable text become 0.
fn real(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => i as f64,
        Value::Real(f) => f,
        Value::Text(s) => s.trim().parse().unwrap_or(0.0),
        Value::Null | Value::Blob(_) => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "
        INSERT INTO countries (id, name, iso2, phonecode, native, emoji) VALUES
            (233, 'United States', 'US', '1', 'United States', '🇺🇸'),
            (232, 'United Kingdom', 'GB', '44', 'United Kingdom', '🇬🇧'),
            (31, 'Brazil', 'BR', '55', 'Brasil', NULL);
        INSERT INTO states (id, name, country_id, iso2) VALUES
            (1452, 'New York', 233, 'NY'),
            (2336, 'England', 232, 'ENG'),
            (2021, 'São Paulo', 31, 'SP'),
            (9999, 'Orphan State', 233, NULL);
        INSERT INTO cities (id, name, state_id, country_id, country_code, latitude, longitude) VALUES
            (1, 'New York City', 1452, 233, 'US', 40.71427, -74.00597),
            (2, 'Newcastle upon Tyne', 2336, 232, 'GB', 54.97328, -1.61396),
            (3, 'Newark', 1452, 233, 'US', 40.73566, -74.17237),
            (4, 'São Paulo', 2021, 31, 'BR', -23.5475, -46.63611),
            (5, 'New Atlantis', 1452, 999, 'XX', 1.0, 2.0),
            (6, 'London', 2336, 232, 'GB', 51.50853, -0.12574),
            (7, 'New Hope', 8888, 233, 'US', 3.0, 4.0);
    ";

    async fn seeded() -> Dataset {
        let db = Dataset::open_in_memory().await.unwrap();
        db.execute_script(FIXTURE).await.unwrap();
        db
    }

    fn limit(n: &str) -> Limit {
        Limit::parse(n, 1000).unwrap()
    }

    fn names(cities: &[City]) -> Vec<&str> {
        let mut names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[tokio::test]
    async fn test_prefix_match_with_joined_metadata() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("New", limit("10")).await.unwrap();

        assert_eq!(names(&cities), vec!["New York City", "Newark", "Newcastle upon Tyne"]);

        let nyc = cities.iter().find(|c| c.id == "1").unwrap();
        assert_eq!(nyc.country_code, "US");
        assert_eq!(nyc.lat, 40.71427);
        assert_eq!(nyc.lng, -74.00597);
        assert_eq!(nyc.country.id, "233");
        assert_eq!(nyc.country.name, "United States");
        assert_eq!(nyc.country.phonecode, "1");
        assert_eq!(nyc.state.id, "1452");
        assert_eq!(nyc.state.iso2, "NY");
    }

    #[tokio::test]
    async fn test_city_without_country_is_excluded() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("New Atl", limit("10")).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_city_without_state_row_is_excluded() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("New Hope", limit("10")).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_state_rows_do_not_match_prefix() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("Orphan", limit("10")).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_limit_caps_rows() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("New", limit("2")).await.unwrap();
        assert_eq!(cities.len(), 2);
    }

    #[tokio::test]
    async fn test_multi_script_prefix() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("São", limit("1")).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "São Paulo");
        assert_eq!(cities[0].country.native, "Brasil");
        assert_eq!(cities[0].country.emoji, "");
    }

    #[tokio::test]
    async fn test_wildcards_are_literal() {
        let db = seeded().await;
        assert!(db.find_cities_by_prefix("%", limit("10")).await.unwrap().is_empty());
        assert!(db.find_cities_by_prefix("N_w", limit("10")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pattern_is_not_interpolated() {
        let db = seeded().await;
        let cities = db.find_cities_by_prefix("x' OR '1'='1", limit("10")).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn test_null_columns_default() {
        let db = Dataset::open_in_memory().await.unwrap();
        let city = db
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT NULL, 'Nowhere', NULL, NULL, '12.5', NULL, NULL, NULL, NULL, NULL, NULL, 7, 'Somewhere', NULL",
                    [],
                    city_from_row,
                )
            })
            .await
            .unwrap();

        assert_eq!(city.id, "");
        assert_eq!(city.name, "Nowhere");
        assert_eq!(city.lat, 0.0);
        assert_eq!(city.lng, 12.5);
        assert_eq!(city.country, Country::default());
        assert_eq!(city.state.id, "7");
        assert_eq!(city.state.name, "Somewhere");
        assert_eq!(city.state.iso2, "");
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("New"), "New%");
        assert_eq!(like_prefix("50%_a\\"), "50\\%\\_a\\\\%");
    }
}
