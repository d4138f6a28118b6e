//! Class helpers so pages agree on how trends, margins and toasts are coloured.

use crate::domain::{MarginBand, MarketTrend};

pub const INPUT: &str = "field-input";
pub const LABEL: &str = "field-label";
pub const PANEL: &str = "card";
pub const BTN_PRIMARY: &str = "btn btn-primary";
pub const LINK: &str = "nav-link";
pub const LINK_ACTIVE: &str = "nav-link nav-link-active";

pub fn trend_badge(trend: MarketTrend) -> &'static str {
    match trend {
        MarketTrend::Up => "badge badge-up",
        MarketTrend::Down => "badge badge-down",
        MarketTrend::Stable => "badge badge-stable",
    }
}

pub fn margin_panel(band: MarginBand) -> &'static str {
    match band {
        MarginBand::Loss => "card margin margin-loss",
        MarginBand::Thin => "card margin margin-thin",
        MarginBand::Healthy => "card margin margin-healthy",
    }
}

/// Value colour for a signed amount.
pub fn signed_value(amount: f64) -> &'static str {
    if amount < 0.0 {
        "kpi-value negative"
    } else {
        "kpi-value positive"
    }
}
