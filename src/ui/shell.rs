use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                div { class: "container row-between",
                    div { class: "brand",
                        div { class: "brand-mark", "A" }
                        h1 { class: "brand-name", "{APP_NAME}" }
                    }
                    nav { class: "nav",
                        NavButton {
                            active: matches!(current_route, Route::Home {}),
                            onclick: move |_| { nav.push(Route::Home {}); },
                            label: "Market",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Settings {}),
                            onclick: move |_| { nav.push(Route::Settings {}); },
                            label: "Settings",
                        }
                    }
                }
            }
            main { class: "container",
                {children}
            }
            footer { class: "container footer row-between",
                p { class: "muted small",
                    "© {APP_NAME} {version_label()}. Empowering farmers with real-time analytics."
                }
                div { class: "footer-tags",
                    span { class: "tag tag-live", span { class: "pulse" } "Market Live" }
                    span { class: "tag", "Region: India (INR)" }
                }
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { theme::LINK_ACTIVE } else { theme::LINK };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
