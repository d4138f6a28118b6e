use dioxus::prelude::*;

use crate::{
    app::submit_crop,
    domain::{AppState, CropEntry, RequestState},
    ui::components::{
        crop_form::CropForm, dashboard::Dashboard, upload_placeholder::UploadPlaceholder,
    },
};

#[component]
pub fn HomePage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let request = state.with(|st| st.request.clone());
    let crop = state.with(|st| st.last_crop.clone());
    let is_loading = state.with(|st| st.is_loading());

    rsx! {
        header { class: "hero",
            h2 { class: "hero-title",
                "Maximize Your "
                span { class: "accent", "Farm's Profit" }
            }
            p { class: "hero-copy",
                "Enter your crop details and get instant AI-powered revenue calculations "
                "grounded in today's real Mandi prices across India."
            }
        }

        div { class: "layout",
            div { class: "layout-input",
                CropForm {
                    is_loading,
                    on_submit: move |entry: CropEntry| submit_crop(state, entry),
                }
                UploadPlaceholder {}
            }

            div { class: "layout-results",
                match request {
                    RequestState::Idle => rsx! { EmptyState {} },
                    RequestState::Loading { .. } => rsx! { LoadingSkeleton {} },
                    RequestState::Failed(message) => rsx! { ErrorPanel { message } },
                    RequestState::Success(result) => rsx! { Dashboard { result, crop } },
                }
            }
        }
    }
}

#[component]
fn EmptyState() -> Element {
    rsx! {
        div { class: "card empty",
            div { class: "empty-icon", "▥" }
            h3 { "No Analysis Data Yet" }
            p { class: "muted",
                "Fill out the form to start calculating your expected profits using real-time market data."
            }
        }
    }
}

#[component]
fn LoadingSkeleton() -> Element {
    rsx! {
        div { class: "skeleton",
            div { class: "kpi-grid",
                div { class: "skeleton-block short" }
                div { class: "skeleton-block short" }
                div { class: "skeleton-block short" }
            }
            div { class: "skeleton-block tall" }
            div { class: "skeleton-block medium" }
        }
    }
}

#[component]
fn ErrorPanel(message: String) -> Element {
    rsx! {
        div { class: "card error-panel",
            p { class: "error-title", "⛔ Error" }
            p { class: "small", "{message}" }
        }
    }
}
