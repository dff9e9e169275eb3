use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use super::types::AreaMetrics;
use crate::areas::normalize_zipcode;

/// Errors raised while turning an input row into [`AreaMetrics`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    #[error("record has no zip code")]
    MissingZipcode,

    #[error("{zipcode}: field `{field}` is not a finite number")]
    NonFinite {
        zipcode: String,
        field: &'static str,
    },

    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// One input row as it arrives from a JSON or CSV file.
///
/// Every numeric field is optional and loosely typed; [`MetricsRecord::into_area`]
/// applies the ingestion rules: negative counts clamp to 0, absent counts
/// are 0, and NaN or infinite values reject the row.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MetricsRecord {
    #[serde(
        default,
        alias = "zip",
        alias = "zip_code",
        deserialize_with = "deserialize_zipcode"
    )]
    pub zipcode: String,
    #[serde(default, alias = "total_population")]
    pub population: Option<f64>,
    #[serde(default)]
    pub renter_occupied: Option<f64>,
    #[serde(default)]
    pub owner_occupied: Option<f64>,
    #[serde(default)]
    pub median_income: Option<f64>,
    #[serde(default)]
    pub total_listings: Option<f64>,
    #[serde(default, alias = "avg_days_on_market")]
    pub days_on_market: Option<f64>,
    #[serde(default, alias = "rental_growth_yoy")]
    pub rent_growth_yoy: Option<f64>,
    #[serde(default)]
    pub search_volume_index: Option<f64>,
    #[serde(default, alias = "demand_score")]
    pub direct_demand_index: Option<f64>,
    #[serde(default)]
    pub average_rent: Option<f64>,
    #[serde(default)]
    pub data_source: Option<String>,
}

/// Accept zip codes written as strings or as bare numbers. Null, and
/// numbers that are not whole, come out empty and are rejected later.
fn deserialize_zipcode<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ZipcodeVisitor;

    impl<'de> Visitor<'de> for ZipcodeVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a zip code string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Ok(format!("{}", v as u64))
            } else {
                Ok(String::new())
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            deserializer.deserialize_any(ZipcodeVisitor)
        }
    }

    deserializer.deserialize_any(ZipcodeVisitor)
}

impl MetricsRecord {
    pub fn into_area(self) -> Result<(String, AreaMetrics), MetricsError> {
        let zipcode = normalize_zipcode(&self.zipcode);
        if zipcode.is_empty() {
            return Err(MetricsError::MissingZipcode);
        }

        let count = |field: &'static str, value: Option<f64>| -> Result<u64, MetricsError> {
            match value {
                None => Ok(0),
                Some(v) if !v.is_finite() => Err(MetricsError::NonFinite {
                    zipcode: zipcode.clone(),
                    field,
                }),
                Some(v) if v < 0.0 => {
                    log::debug!("{}: negative {} ({}) clamped to 0", zipcode, field, v);
                    Ok(0)
                }
                Some(v) => Ok(v.round() as u64),
            }
        };
        let signal =
            |field: &'static str, value: Option<f64>| -> Result<Option<f64>, MetricsError> {
                match value {
                    Some(v) if !v.is_finite() => Err(MetricsError::NonFinite {
                        zipcode: zipcode.clone(),
                        field,
                    }),
                    other => Ok(other),
                }
            };
        let amount = |field: &'static str, value: Option<f64>| {
            signal(field, value).map(|v| v.map(|v| v.max(0.0)))
        };

        let metrics = AreaMetrics {
            population: count("population", self.population)?,
            renter_occupied: count("renter_occupied", self.renter_occupied)?,
            owner_occupied: count("owner_occupied", self.owner_occupied)?,
            median_income: amount("median_income", self.median_income)?,
            total_listings: count("total_listings", self.total_listings)?,
            days_on_market: signal("days_on_market", self.days_on_market)?,
            rent_growth_yoy: signal("rent_growth_yoy", self.rent_growth_yoy)?,
            search_volume_index: signal("search_volume_index", self.search_volume_index)?,
            direct_demand_index: signal("direct_demand_index", self.direct_demand_index)?,
            average_rent: amount("average_rent", self.average_rent)?,
            data_source: self
                .data_source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };

        Ok((zipcode, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(zipcode: &str) -> MetricsRecord {
        MetricsRecord {
            zipcode: zipcode.to_string(),
            ..MetricsRecord::default()
        }
    }

    #[test]
    fn test_into_area_copies_fields() {
        let mut rec = record("10001");
        rec.population = Some(21_102.0);
        rec.renter_occupied = Some(7_400.0);
        rec.owner_occupied = Some(1_900.0);
        rec.total_listings = Some(180.0);
        rec.days_on_market = Some(21.5);
        rec.rent_growth_yoy = Some(0.04);
        rec.data_source = Some(" rentcast ".to_string());

        let (zipcode, metrics) = rec.into_area().unwrap();
        assert_eq!(zipcode, "10001");
        assert_eq!(metrics.population, 21_102);
        assert_eq!(metrics.renter_occupied, 7_400);
        assert_eq!(metrics.owner_occupied, 1_900);
        assert_eq!(metrics.total_listings, 180);
        assert_eq!(metrics.days_on_market, Some(21.5));
        assert_eq!(metrics.rent_growth_yoy, Some(0.04));
        assert_eq!(metrics.search_volume_index, None);
        assert_eq!(metrics.data_source.as_deref(), Some("rentcast"));
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let (_, metrics) = record("60601").into_area().unwrap();
        assert_eq!(metrics, AreaMetrics::default());
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let mut rec = record("60601");
        rec.population = Some(-150.0);
        rec.total_listings = Some(-3.0);
        rec.median_income = Some(-10.0);

        let (_, metrics) = rec.into_area().unwrap();
        assert_eq!(metrics.population, 0);
        assert_eq!(metrics.total_listings, 0);
        assert_eq!(metrics.median_income, Some(0.0));
    }

    #[test]
    fn test_negative_growth_is_kept() {
        let mut rec = record("60601");
        rec.rent_growth_yoy = Some(-0.12);
        let (_, metrics) = rec.into_area().unwrap();
        assert_eq!(metrics.rent_growth_yoy, Some(-0.12));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut rec = record("98101");
        rec.search_volume_index = Some(f64::NAN);

        let err = rec.into_area().unwrap_err();
        assert_eq!(
            err,
            MetricsError::NonFinite {
                zipcode: "98101".to_string(),
                field: "search_volume_index",
            }
        );
        assert!(err.to_string().contains("search_volume_index"));
    }

    #[test]
    fn test_infinite_count_rejected() {
        let mut rec = record("98101");
        rec.population = Some(f64::INFINITY);
        assert!(matches!(
            rec.into_area(),
            Err(MetricsError::NonFinite { field: "population", .. })
        ));
    }

    #[test]
    fn test_blank_zipcode_rejected() {
        assert_eq!(record("  ").into_area(), Err(MetricsError::MissingZipcode));
    }

    #[test]
    fn test_short_numeric_zipcode_padded() {
        let (zipcode, _) = record("2108").into_area().unwrap();
        assert_eq!(zipcode, "02108");
    }

    #[test]
    fn test_numeric_zipcode_accepted() {
        let rec: MetricsRecord = serde_json::from_str(r#"{"zipcode": 2108}"#).unwrap();
        let (zipcode, _) = rec.into_area().unwrap();
        assert_eq!(zipcode, "02108");
    }

    #[test]
    fn test_missing_or_null_zipcode_rejected() {
        for json in [r#"{"population": 1}"#, r#"{"zipcode": null}"#, r#"{"zipcode": 10001.5}"#] {
            let rec: MetricsRecord = serde_json::from_str(json).unwrap();
            assert_eq!(rec.into_area(), Err(MetricsError::MissingZipcode), "{}", json);
        }
    }

    #[test]
    fn test_original_field_aliases() {
        let json = r#"{
            "zip": "78701",
            "total_population": 12000,
            "avg_days_on_market": 30,
            "rental_growth_yoy": 0.05,
            "demand_score": 0.7
        }"#;
        let rec: MetricsRecord = serde_json::from_str(json).unwrap();
        let (zipcode, metrics) = rec.into_area().unwrap();
        assert_eq!(zipcode, "78701");
        assert_eq!(metrics.population, 12_000);
        assert_eq!(metrics.days_on_market, Some(30.0));
        assert_eq!(metrics.direct_demand_index, Some(0.7));
    }
}
