/// Tab Navigator - Chrome extension popup for navigating the current window's tabs
/// Built with Rust + WASM + Yew

mod anchor;
mod bridge;
mod colors;
mod error;
mod events;
mod geometry;
mod hover;
mod navigation;
mod sections;
mod settings;
mod tab_data;
pub mod ui;

pub use error::BridgeError;
pub use settings::Settings;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_settings() {
    yew::Renderer::<ui::settings_page::SettingsPage>::new().render();
}
