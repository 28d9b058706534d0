/// New Tab Shortcuts - Chrome new tab page with recently visited domains
/// Built with Rust + WASM + Yew

pub mod context;
pub mod domain;
pub mod history;
pub mod recent;
pub mod search;
pub mod settings;
pub mod shortcut;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export domain extraction for JavaScript access
#[wasm_bindgen]
pub fn extract_domain(url: &str) -> Option<String> {
    domain::extract_domain(url)
}

// Start the Yew app for the new tab page
#[wasm_bindgen]
pub fn start_newtab() {
    yew::Renderer::<ui::newtab::App>::new().render();
}
