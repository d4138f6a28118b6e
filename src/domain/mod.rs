//! Crop profit domain: entries, market snapshots and the calculation itself.

pub mod app_state;
pub mod calculation;
pub mod entities;
pub mod insight;

pub use app_state::{AppState, PersistedSettings, RequestState};
pub use calculation::{calculate, normalize_yield, MarginBand};
pub use entities::{CalculationResult, CropEntry, MarketData, MarketTrend, YieldUnit};
pub use insight::{analyze_crop, InsightError, MarketInsightProvider};
