/// UI module exports
pub mod components;
pub mod newtab;
pub mod settings_modal;
pub mod shortcuts;
