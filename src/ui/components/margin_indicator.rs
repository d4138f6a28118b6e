use dioxus::prelude::*;

use crate::domain::MarginBand;
use crate::ui::theme;
use crate::util::format::format_percent;

#[component]
pub fn MarginIndicator(margin: f64) -> Element {
    let band = MarginBand::from_margin(margin);
    let rationale = match band {
        MarginBand::Loss => "Costs exceed expected revenue at today's price.",
        MarginBand::Thin => "Small cushion; a price dip could erase it.",
        MarginBand::Healthy => "Comfortable margin at current market rates.",
    };

    rsx! {
        div {
            class: "{theme::margin_panel(band)}",
            div { class: "row-between",
                span { class: "{theme::LABEL}", "Profit Margin" }
                span { class: "band-label", "{band.label()}" }
            }
            p { class: "kpi-value", "{format_percent(margin)}" }
            p { class: "small", "{rationale}" }
        }
    }
}
