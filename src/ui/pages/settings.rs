use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    domain::{AppState, PersistedSettings},
    infra::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::settings::{provider_config, save_settings},
};

#[component]
pub fn SettingsPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let saved = state.with(|st| st.settings.clone());

    let mut api_key_input = use_signal(|| saved.api_key.clone().unwrap_or_default());
    let mut model_input = use_signal(|| saved.model.clone().unwrap_or_default());
    let mut base_url_input = use_signal(|| saved.base_url.clone().unwrap_or_default());

    let effective = provider_config(&saved);
    let key_status = match (&saved.api_key, &effective.api_key) {
        (Some(_), _) => "Using the key saved on this device.",
        (None, Some(_)) => "Using the key from the environment (GEMINI_API_KEY).",
        (None, None) => "No key configured. Market lookups will fail until one is added.",
    };

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let settings = PersistedSettings {
            api_key: optional(api_key_input()),
            model: optional(model_input()),
            base_url: optional(base_url_input()),
        };

        match save_settings(&settings) {
            Ok(()) => {
                info!("[settings] Provider settings updated");
                push_toast(toasts, ToastKind::Success, "Settings saved.");
            }
            Err(err) => {
                warn!("[settings] Failed to save settings: {err}");
                push_toast(
                    toasts,
                    ToastKind::Error,
                    format!("Settings apply to this session only: {err}"),
                );
            }
        }
        state.with_mut(|st| st.apply_persisted(settings));
    };

    let on_reset = move |_| {
        api_key_input.set(String::new());
        model_input.set(String::new());
        base_url_input.set(String::new());
        push_toast(
            toasts,
            ToastKind::Info,
            "Fields cleared. Save to fall back to environment defaults.",
        );
    };

    rsx! {
        div { class: "settings",
            form {
                class: "{theme::PANEL} settings-form",
                onsubmit: on_save,
                h2 { class: "section-title", "Market Data Provider" }
                p { class: "muted small", "{key_status}" }

                div { class: "field",
                    label { class: "{theme::LABEL}", "Gemini API Key" }
                    input {
                        class: "{theme::INPUT}",
                        r#type: "password",
                        autocomplete: "off",
                        value: api_key_input(),
                        oninput: move |evt| api_key_input.set(evt.value()),
                        placeholder: "Leave blank to use GEMINI_API_KEY",
                    }
                }
                div { class: "field",
                    label { class: "{theme::LABEL}", "Model" }
                    input {
                        class: "{theme::INPUT}",
                        value: model_input(),
                        oninput: move |evt| model_input.set(evt.value()),
                        placeholder: DEFAULT_MODEL,
                    }
                }
                div { class: "field",
                    label { class: "{theme::LABEL}", "API Base URL" }
                    input {
                        class: "{theme::INPUT}",
                        value: base_url_input(),
                        oninput: move |evt| base_url_input.set(evt.value()),
                        placeholder: DEFAULT_BASE_URL,
                    }
                }

                p { class: "muted small", "Active model: {effective.model}" }

                div { class: "row-end",
                    button { class: "btn btn-ghost", r#type: "button", onclick: on_reset, "Clear" }
                    button { class: "{theme::BTN_PRIMARY}", r#type: "submit", "Save" }
                }
            }
        }
    }
}

fn optional(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
