/// UI module exports
pub mod components;
mod dom;
pub mod popup;
mod session;
pub mod settings_page;
