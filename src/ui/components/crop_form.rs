use dioxus::prelude::*;
use tracing::debug;

use crate::domain::{CropEntry, YieldUnit};
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;

#[component]
pub fn CropForm(is_loading: bool, on_submit: EventHandler<CropEntry>) -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let mut name = use_signal(String::new);
    let mut yield_input = use_signal(String::new);
    let mut unit = use_signal(|| YieldUnit::default().name().to_string());
    let mut cost_input = use_signal(String::new);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if is_loading {
            return;
        }
        match CropEntry::from_form(&name(), &yield_input(), &unit(), &cost_input()) {
            Ok(entry) => on_submit.call(entry),
            Err(err) => {
                debug!("[form] Rejected input: {err}");
                push_toast(toasts, ToastKind::Error, err.to_string());
            }
        }
    };

    let button_label = if is_loading {
        "Fetching market price..."
    } else {
        "Calculate Profit"
    };

    rsx! {
        form {
            class: "{theme::PANEL} crop-form",
            onsubmit: submit,
            h2 { class: "section-title", "Crop Details" }

            div { class: "field",
                label { class: "{theme::LABEL}", "Crop Name" }
                input {
                    class: "{theme::INPUT}",
                    value: name(),
                    oninput: move |evt| name.set(evt.value()),
                    placeholder: "e.g. Wheat, Basmati Rice, Onion",
                }
            }

            div { class: "field-row",
                div { class: "field grow",
                    label { class: "{theme::LABEL}", "Expected Yield" }
                    input {
                        class: "{theme::INPUT}",
                        r#type: "number",
                        min: "0",
                        step: "any",
                        inputmode: "decimal",
                        value: yield_input(),
                        oninput: move |evt| yield_input.set(evt.value()),
                        placeholder: "10",
                    }
                }
                div { class: "field",
                    label { class: "{theme::LABEL}", "Unit" }
                    select {
                        class: "{theme::INPUT}",
                        value: unit(),
                        onchange: move |evt| unit.set(evt.value()),
                        for option_unit in YieldUnit::ALL {
                            option { value: option_unit.name(), "{option_unit}" }
                        }
                    }
                }
            }

            div { class: "field",
                label { class: "{theme::LABEL}", "Estimated Cost (₹)" }
                input {
                    class: "{theme::INPUT}",
                    r#type: "number",
                    min: "0",
                    step: "any",
                    inputmode: "decimal",
                    value: cost_input(),
                    oninput: move |evt| cost_input.set(evt.value()),
                    placeholder: "Seeds, fertiliser, labour, transport",
                }
            }

            button {
                class: "{theme::BTN_PRIMARY}",
                r#type: "submit",
                disabled: is_loading,
                "{button_label}"
            }
        }
    }
}
