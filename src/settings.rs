/// Page appearance settings: prompt text and background

use std::sync::LazyLock;

use regex::Regex;

use crate::storage::{KeyValueStore, keys};

pub const DEFAULT_PROMPT: &str = "Where to next?";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#fafafa";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundMode {
    #[default]
    Color,
    Image,
}

impl BackgroundMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundMode::Color => "color",
            BackgroundMode::Image => "image",
        }
    }

    /// Unknown values fall back to color
    pub fn parse(value: &str) -> BackgroundMode {
        match value {
            "image" => BackgroundMode::Image,
            _ => BackgroundMode::Color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub prompt: String,
    pub background_mode: BackgroundMode,
    pub background_color: String,
    /// Data URI of an uploaded picture
    pub background_image: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prompt: DEFAULT_PROMPT.to_string(),
            background_mode: BackgroundMode::Color,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            background_image: None,
        }
    }
}

impl Settings {
    pub fn load(store: &impl KeyValueStore) -> Settings {
        let color = store.get(keys::BACKGROUND_COLOR, DEFAULT_BACKGROUND_COLOR);

        Settings {
            prompt: store.get(keys::PROMPT_TEXT, DEFAULT_PROMPT),
            background_mode: BackgroundMode::parse(&store.get(keys::BACKGROUND_MODE, "color")),
            background_color: if is_hex_color(&color) {
                color
            } else {
                DEFAULT_BACKGROUND_COLOR.to_string()
            },
            background_image: store.get_opt(keys::BACKGROUND_IMAGE).filter(|uri| !uri.is_empty()),
        }
    }

    pub fn set_prompt(&mut self, store: &impl KeyValueStore, prompt: &str) {
        self.prompt = prompt.to_string();
        store.set(keys::PROMPT_TEXT, prompt);
    }

    pub fn set_background_mode(&mut self, store: &impl KeyValueStore, mode: BackgroundMode) {
        self.background_mode = mode;
        store.set(keys::BACKGROUND_MODE, mode.as_str());
    }

    /// Returns false and keeps the current color if `color` is not `#rrggbb`
    pub fn set_background_color(&mut self, store: &impl KeyValueStore, color: &str) -> bool {
        if !is_hex_color(color) {
            return false;
        }
        self.background_color = color.to_lowercase();
        store.set(keys::BACKGROUND_COLOR, &self.background_color);
        true
    }

    pub fn set_background_image(&mut self, store: &impl KeyValueStore, data_uri: Option<String>) {
        match &data_uri {
            Some(uri) => store.set(keys::BACKGROUND_IMAGE, uri),
            None => store.remove(keys::BACKGROUND_IMAGE),
        }
        self.background_image = data_uri;
    }

    /// Remove every persisted value and return the defaults
    pub fn reset(store: &impl KeyValueStore) -> Settings {
        for key in keys::ALL {
            store.remove(key);
        }
        Settings::default()
    }

    /// Inline CSS for the page background and text
    pub fn page_style(&self) -> String {
        let text = contrast_text_color(&self.background_color);
        match (&self.background_mode, &self.background_image) {
            (BackgroundMode::Image, Some(uri)) => format!(
                "background-color: {}; background-image: url(\"{}\"); background-size: cover; background-position: center; color: {};",
                self.background_color, uri, text
            ),
            _ => format!("background-color: {}; color: {};", self.background_color, text),
        }
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Black or white, whichever reads better on `background`
///
/// Uses YIQ brightness; anything that is not `#rrggbb` gets black text.
pub fn contrast_text_color(background: &str) -> &'static str {
    if !is_hex_color(background) {
        return "#000000";
    }

    let channel = |start: usize| u8::from_str_radix(&background[start..start + 2], 16).unwrap_or(0) as f64;
    let (r, g, b) = (channel(1), channel(3), channel(5));
    let brightness = (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0 / 255.0;

    if brightness > 0.5 { "#000000" } else { "#ffffff" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_defaults() {
        let store = MemoryStore::new();

        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_setters_persist() {
        let store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        settings.set_prompt(&store, "Search the web");
        settings.set_background_mode(&store, BackgroundMode::Image);
        assert!(settings.set_background_color(&store, "#1A2B3C"));
        settings.set_background_image(&store, Some("data:image/png;base64,AAAA".to_string()));

        let reloaded = Settings::load(&store);
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.background_color, "#1a2b3c");
    }

    #[test]
    fn test_invalid_color_rejected() {
        let store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        assert!(!settings.set_background_color(&store, "red"));
        assert!(!settings.set_background_color(&store, "#12345"));
        assert_eq!(settings.background_color, DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let store = MemoryStore::new();
        store.set(keys::BACKGROUND_COLOR, "not-a-color");
        store.set(keys::BACKGROUND_MODE, "video");

        let settings = Settings::load(&store);

        assert_eq!(settings.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(settings.background_mode, BackgroundMode::Color);
    }

    #[test]
    fn test_clearing_background_image() {
        let store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        settings.set_background_image(&store, Some("data:image/png;base64,AAAA".to_string()));

        settings.set_background_image(&store, None);

        assert_eq!(store.get_opt(keys::BACKGROUND_IMAGE), None);
        assert_eq!(Settings::load(&store).background_image, None);
    }

    #[test]
    fn test_reset_removes_everything() {
        let store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        settings.set_prompt(&store, "Custom");
        store.set(keys::RECENT_DOMAINS, "[]");

        let reset = Settings::reset(&store);

        assert_eq!(reset, Settings::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_from_failing_store() {
        let store = MemoryStore::new();
        store.set(keys::PROMPT_TEXT, "Custom");
        store.set_failing(true);

        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(contrast_text_color("#fafafa"), "#000000");
        assert_eq!(contrast_text_color("#ffffff"), "#000000");
        assert_eq!(contrast_text_color("#000000"), "#ffffff");
        assert_eq!(contrast_text_color("#1a237e"), "#ffffff");
        assert_eq!(contrast_text_color("#ffeb3b"), "#000000");
        assert_eq!(contrast_text_color("bogus"), "#000000");
    }

    #[test]
    fn test_background_mode_round_trip() {
        assert_eq!(BackgroundMode::parse(BackgroundMode::Image.as_str()), BackgroundMode::Image);
        assert_eq!(BackgroundMode::parse(BackgroundMode::Color.as_str()), BackgroundMode::Color);
    }

    #[test]
    fn test_page_style() {
        let mut settings = Settings::default();
        assert_eq!(settings.page_style(), "background-color: #fafafa; color: #000000;");

        settings.background_mode = BackgroundMode::Image;
        assert!(!settings.page_style().contains("background-image"));

        settings.background_image = Some("data:image/png;base64,AAAA".to_string());
        assert!(settings.page_style().contains("background-image: url(\"data:image/png;base64,AAAA\")"));
    }
}
