use dioxus::prelude::*;

use crate::domain::MarketTrend;
use crate::ui::theme;

#[component]
pub fn TrendBadge(trend: MarketTrend) -> Element {
    rsx! {
        span {
            class: "{theme::trend_badge(trend)}",
            "{trend.arrow()} {trend.label()}"
        }
    }
}
