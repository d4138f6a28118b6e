use dioxus::prelude::*;

use crate::ui::theme;

#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    #[props(default = "kpi-value")] value_class: &'static str,
) -> Element {
    rsx! {
        div {
            class: "{theme::PANEL} kpi",
            h3 { class: "{theme::LABEL}", "{title}" }
            p { class: "{value_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "muted small", "{desc}" }
            }
        }
    }
}
