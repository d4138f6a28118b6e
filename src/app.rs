use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    domain::{analyze_crop, AppState, CropEntry},
    infra::gemini::GeminiClient,
    ui::{
        components::toast::{Toast, ToastMessage},
        pages::{HomePage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        settings::{load_settings, provider_config},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook(move || {
        let mut state = state;
        if let Some(saved) = load_settings() {
            state.with_mut(|st| st.apply_persisted(saved));
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Starts a market lookup for `crop` and records its outcome once it resolves.
///
/// Every call takes a fresh ticket; a lookup that finishes after a newer one
/// was started is dropped instead of overwriting the newer state.
pub fn submit_crop(mut state: Signal<AppState>, crop: CropEntry) {
    let ticket = state.with_mut(|st| st.begin_request(crop.clone()));
    let config = state.with(|st| provider_config(&st.settings));
    info!(
        "[request] #{} started for {} ({} {})",
        ticket.sequence(),
        crop.name,
        crop.yield_amount,
        crop.yield_unit
    );

    spawn(async move {
        let outcome = match GeminiClient::new(&config) {
            Ok(client) => analyze_crop(&client, &crop).await,
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(result) => info!(
                "[request] #{} finished: revenue {:.2}, profit {:.2}, margin {:.1}%",
                ticket.sequence(),
                result.revenue,
                result.profit,
                result.profit_margin
            ),
            Err(err) => warn!("[request] #{} failed: {err}", ticket.sequence()),
        }

        state.with_mut(|st| st.apply_outcome(ticket, outcome));
    });
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { HomePage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
