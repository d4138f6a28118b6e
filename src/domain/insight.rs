//! Seam between the calculator and whatever supplies market prices.

use thiserror::Error;

use super::calculate;
use super::entities::{CalculationResult, CropEntry, MarketData};

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong. Please check your internet connection.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("no API key configured; add one under Settings or set GEMINI_API_KEY")]
    MissingApiKey,
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("unexpected response from market service: {0}")]
    MalformedResponse(String),
}

impl InsightError {
    /// The single user-facing message for any lookup failure.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub trait MarketInsightProvider {
    async fn fetch_market_insights(&self, crop_name: &str) -> Result<MarketData, InsightError>;
}

/// Looks up the market price for `crop` and runs the profit calculation.
///
/// A provider failure aborts the whole calculation; there is no partial result.
pub async fn analyze_crop<P>(
    provider: &P,
    crop: &CropEntry,
) -> Result<CalculationResult, InsightError>
where
    P: MarketInsightProvider,
{
    let market = provider.fetch_market_insights(&crop.name).await?;
    Ok(calculate(crop, market))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{MarketTrend, YieldUnit};

    struct StubProvider {
        price: Option<f64>,
        requested: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn priced(price: f64) -> Self {
            Self {
                price: Some(price),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                price: None,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl MarketInsightProvider for StubProvider {
        async fn fetch_market_insights(&self, crop_name: &str) -> Result<MarketData, InsightError> {
            self.requested.lock().unwrap().push(crop_name.to_string());
            match self.price {
                Some(price) => Ok(MarketData {
                    crop_name: crop_name.to_string(),
                    current_price: price,
                    price_unit: "INR/Quintal".to_string(),
                    source_urls: Vec::new(),
                    last_updated: "2024-05-01T10:00:00Z".to_string(),
                    market_trend: MarketTrend::Stable,
                    analysis: String::new(),
                }),
                None => Err(InsightError::Api("quota exceeded".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_crop_uses_provider_price() {
        let provider = StubProvider::priced(2000.0);
        let crop = CropEntry::new("Soybean", 1000.0, YieldUnit::Kg, 5000.0);

        let result = analyze_crop(&provider, &crop).await.unwrap();

        assert_eq!(result.revenue, 20000.0);
        assert_eq!(result.profit_margin, 75.0);
        assert_eq!(result.market_data.crop_name, "Soybean");
        assert_eq!(*provider.requested.lock().unwrap(), vec!["Soybean".to_string()]);
    }

    #[tokio::test]
    async fn test_analyze_crop_propagates_failure() {
        let provider = StubProvider::failing();
        let crop = CropEntry::new("Cotton", 4.0, YieldUnit::Quintal, 100.0);

        let err = analyze_crop(&provider, &crop).await.unwrap_err();
        assert_eq!(err.display_message(), "quota exceeded");
    }

    #[test]
    fn test_empty_message_falls_back_to_generic_text() {
        assert_eq!(
            InsightError::Api(String::new()).display_message(),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(
            InsightError::Api("   ".to_string()).display_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }
}
