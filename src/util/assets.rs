use std::{borrow::Cow, sync::OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_embed::RustEmbed;
use tracing::error;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();

pub fn main_css() -> &'static str {
    MAIN_CSS
        .get_or_init(|| {
            load_asset("main.css")
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        })
        .as_str()
}

/// Favicon as a `data:` URI so the desktop webview needs no asset server.
pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| {
            load_asset("favicon.svg")
                .map(|bytes| format!("data:image/svg+xml;base64,{}", STANDARD.encode(&bytes)))
                .unwrap_or_default()
        })
        .as_str()
}

fn load_asset(name: &str) -> Option<Cow<'static, [u8]>> {
    let asset = EmbeddedAssets::get(name).map(|file| file.data);
    if asset.is_none() {
        error!("[assets] Missing embedded asset {name}");
    }
    asset
}
