use super::entities::{CalculationResult, CropEntry, MarketData, YieldUnit};

/// Yield expressed in Quintals, the unit Mandi prices are quoted in.
pub fn normalize_yield(amount: f64, unit: YieldUnit) -> f64 {
    unit.to_quintals(amount)
}

/// Combines a crop entry with a market snapshot.
///
/// Total over all numeric inputs: negative values are not rejected here, and a
/// zero revenue yields a margin of exactly 0 instead of dividing by zero.
pub fn calculate(crop: &CropEntry, market: MarketData) -> CalculationResult {
    let quintals = normalize_yield(crop.yield_amount, crop.yield_unit);
    let revenue = quintals * market.current_price;
    let profit = revenue - crop.estimated_cost;
    let profit_margin = if revenue > 0.0 {
        (profit / revenue) * 100.0
    } else {
        0.0
    };

    CalculationResult {
        revenue,
        cost: crop.estimated_cost,
        profit,
        profit_margin,
        market_data: market,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarginBand {
    Loss,
    Thin,
    Healthy,
}

impl MarginBand {
    const HEALTHY_THRESHOLD: f64 = 15.0;

    pub fn from_margin(margin: f64) -> Self {
        if margin < 0.0 {
            MarginBand::Loss
        } else if margin < Self::HEALTHY_THRESHOLD {
            MarginBand::Thin
        } else {
            MarginBand::Healthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginBand::Loss => "Loss",
            MarginBand::Thin => "Thin",
            MarginBand::Healthy => "Healthy",
        }
    }
}
