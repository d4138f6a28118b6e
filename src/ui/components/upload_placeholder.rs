use dioxus::prelude::*;

/// Batch upload teaser. The file input is intentionally not wired to anything.
#[component]
pub fn UploadPlaceholder() -> Element {
    rsx! {
        div { class: "card upload",
            div { class: "upload-icon", "⇪" }
            p { class: "upload-title", "Or upload CSV data" }
            p { class: "muted small", "Batch calculate multiple crops at once" }
            input { r#type: "file", class: "hidden", id: "csv-upload", accept: ".csv" }
            label { r#for: "csv-upload", class: "btn btn-ghost", "Select File" }
        }
    }
}
