use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unit the farmer reports their yield in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YieldUnit {
    #[default]
    Quintal,
    Kg,
    Ton,
}

impl YieldUnit {
    pub const ALL: [YieldUnit; 3] = [YieldUnit::Quintal, YieldUnit::Kg, YieldUnit::Ton];

    pub fn name(&self) -> &'static str {
        match self {
            YieldUnit::Quintal => "Quintal",
            YieldUnit::Kg => "Kg",
            YieldUnit::Ton => "Ton",
        }
    }

    /// Converts an amount in this unit into Quintal-equivalents (1 Quintal = 100 kg).
    pub fn to_quintals(&self, amount: f64) -> f64 {
        match self {
            YieldUnit::Quintal => amount,
            YieldUnit::Kg => amount / 100.0,
            YieldUnit::Ton => amount * 10.0,
        }
    }
}

impl fmt::Display for YieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for YieldUnit {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        YieldUnit::ALL
            .into_iter()
            .find(|unit| unit.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FormError::UnknownUnit(trimmed.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CropEntry {
    pub id: String,
    pub name: String,
    pub yield_amount: f64,
    pub yield_unit: YieldUnit,
    /// Total cultivation cost in INR.
    pub estimated_cost: f64,
}

impl CropEntry {
    pub fn new(
        name: impl Into<String>,
        yield_amount: f64,
        yield_unit: YieldUnit,
        estimated_cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            yield_amount,
            yield_unit,
            estimated_cost,
        }
    }

    /// Builds an entry from the raw strings of the input form.
    ///
    /// This is the only place inputs are validated; [`calculate`](super::calculate)
    /// itself accepts any numbers.
    pub fn from_form(
        name: &str,
        yield_amount: &str,
        yield_unit: &str,
        estimated_cost: &str,
    ) -> Result<Self, FormError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        let yield_amount = parse_non_negative(yield_amount, "yield")?;
        let yield_unit = yield_unit.parse::<YieldUnit>()?;
        let estimated_cost = parse_non_negative(estimated_cost, "estimated cost")?;

        Ok(Self::new(name, yield_amount, yield_unit, estimated_cost))
    }
}

fn parse_non_negative(raw: &str, field: &'static str) -> Result<f64, FormError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(FormError::InvalidNumber { field })?;
    if value < 0.0 {
        return Err(FormError::Negative { field });
    }
    Ok(value)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Enter a crop name.")]
    EmptyName,
    #[error("The {field} must be a number.")]
    InvalidNumber { field: &'static str },
    #[error("The {field} cannot be negative.")]
    Negative { field: &'static str },
    #[error("Unknown yield unit \"{0}\". Use Quintal, Kg or Ton.")]
    UnknownUnit(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    Up,
    Down,
    #[default]
    Stable,
}

impl MarketTrend {
    /// Lenient mapping for model output; anything unrecognised reads as `Stable`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "rising" | "bullish" => MarketTrend::Up,
            "down" | "falling" | "bearish" => MarketTrend::Down,
            _ => MarketTrend::Stable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketTrend::Up => "Up",
            MarketTrend::Down => "Down",
            MarketTrend::Stable => "Stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            MarketTrend::Up => "▲",
            MarketTrend::Down => "▼",
            MarketTrend::Stable => "●",
        }
    }
}

/// Price snapshot returned by a market insight provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub crop_name: String,
    /// INR per Quintal.
    pub current_price: f64,
    pub price_unit: String,
    pub source_urls: Vec<String>,
    pub last_updated: String,
    pub market_trend: MarketTrend,
    pub analysis: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Percentage of revenue, 0 when there is no revenue.
    pub profit_margin: f64,
    pub market_data: MarketData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parsing_is_case_insensitive() {
        assert_eq!("kg".parse::<YieldUnit>(), Ok(YieldUnit::Kg));
        assert_eq!(" TON ".parse::<YieldUnit>(), Ok(YieldUnit::Ton));
        assert_eq!("Quintal".parse::<YieldUnit>(), Ok(YieldUnit::Quintal));
        assert_eq!(
            "bushel".parse::<YieldUnit>(),
            Err(FormError::UnknownUnit("bushel".to_string()))
        );
    }

    #[test]
    fn test_from_form_accepts_valid_input() {
        let entry = CropEntry::from_form(" Wheat ", "12.5", "Quintal", "4000").unwrap();
        assert_eq!(entry.name, "Wheat");
        assert_eq!(entry.yield_amount, 12.5);
        assert_eq!(entry.yield_unit, YieldUnit::Quintal);
        assert_eq!(entry.estimated_cost, 4000.0);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_from_form_rejects_bad_input() {
        assert_eq!(
            CropEntry::from_form("  ", "1", "Kg", "1"),
            Err(FormError::EmptyName)
        );
        assert_eq!(
            CropEntry::from_form("Rice", "abc", "Kg", "1"),
            Err(FormError::InvalidNumber { field: "yield" })
        );
        assert_eq!(
            CropEntry::from_form("Rice", "NaN", "Kg", "1"),
            Err(FormError::InvalidNumber { field: "yield" })
        );
        assert_eq!(
            CropEntry::from_form("Rice", "10", "Kg", "-5"),
            Err(FormError::Negative {
                field: "estimated cost"
            })
        );
        assert!(matches!(
            CropEntry::from_form("Rice", "10", "acre", "5"),
            Err(FormError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_entries_get_distinct_ids() {
        let a = CropEntry::new("Maize", 1.0, YieldUnit::Ton, 0.0);
        let b = CropEntry::new("Maize", 1.0, YieldUnit::Ton, 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(MarketTrend::from_label("UP"), MarketTrend::Up);
        assert_eq!(MarketTrend::from_label("down"), MarketTrend::Down);
        assert_eq!(MarketTrend::from_label("sideways"), MarketTrend::Stable);
    }

    #[test]
    fn test_market_data_uses_camel_case() {
        let json = r#"{
            "cropName": "Onion",
            "currentPrice": 1850.0,
            "priceUnit": "INR/Quintal",
            "sourceUrls": ["https://agmarknet.gov.in"],
            "lastUpdated": "2024-05-01T10:00:00Z",
            "marketTrend": "Down",
            "analysis": "Arrivals are high."
        }"#;
        let data: MarketData = serde_json::from_str(json).unwrap();
        assert_eq!(data.crop_name, "Onion");
        assert_eq!(data.market_trend, MarketTrend::Down);
        assert_eq!(data.source_urls.len(), 1);
    }
}
