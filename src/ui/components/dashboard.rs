use dioxus::prelude::*;

use crate::domain::{normalize_yield, CalculationResult, CropEntry};
use crate::ui::components::{
    kpi_card::KpiCard, margin_indicator::MarginIndicator, trend_badge::TrendBadge,
};
use crate::ui::theme;
use crate::util::format::{format_inr, humanize_timestamp};

#[component]
pub fn Dashboard(result: CalculationResult, crop: Option<CropEntry>) -> Element {
    let market = &result.market_data;
    let yield_summary = crop.as_ref().map(|crop| {
        format!(
            "{} {} ≈ {:.2} Quintal at {} / Quintal",
            crop.yield_amount,
            crop.yield_unit,
            normalize_yield(crop.yield_amount, crop.yield_unit),
            format_inr(market.current_price)
        )
    });
    let updated = humanize_timestamp(&market.last_updated);
    let sources = market.source_urls.clone();

    rsx! {
        div { class: "dashboard",
            section { class: "kpi-grid",
                KpiCard {
                    title: "Expected Revenue".to_string(),
                    value: format_inr(result.revenue),
                    description: yield_summary,
                }
                KpiCard {
                    title: "Total Cost".to_string(),
                    value: format_inr(result.cost),
                    description: Some("As entered".to_string()),
                }
                KpiCard {
                    title: "Net Profit".to_string(),
                    value: format_inr(result.profit),
                    description: Some("Revenue minus cost".to_string()),
                    value_class: theme::signed_value(result.profit),
                }
            }

            MarginIndicator { margin: result.profit_margin }

            section { class: "{theme::PANEL}",
                div { class: "row-between",
                    div {
                        h3 { class: "{theme::LABEL}", "Market Price · {market.crop_name}" }
                        p { class: "kpi-value", "{format_inr(market.current_price)}" }
                        p { class: "muted small", "{market.price_unit} · updated {updated}" }
                    }
                    TrendBadge { trend: market.market_trend }
                }
                if !market.analysis.is_empty() {
                    p { class: "analysis", "{market.analysis}" }
                }
            }

            section { class: "{theme::PANEL}",
                h3 { class: "{theme::LABEL}", "Sources" }
                if sources.is_empty() {
                    p { class: "muted small", "The market service did not cite any sources for this estimate." }
                } else {
                    ul { class: "sources",
                        for (idx, url) in sources.into_iter().enumerate() {
                            li { key: "{idx}",
                                a { href: "{url}", target: "_blank", rel: "noopener", "{url}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
