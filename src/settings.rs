/// Preference bag persisted in `chrome.storage.sync`
use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_POPUP_WIDTH: u32 = 400;
pub const MAX_POPUP_WIDTH: u32 = 800;
pub const POPUP_HEIGHT: u32 = 280;
pub const MIN_SCROLL_SPEED: f64 = 0.1;
pub const MAX_SCROLL_SPEED: f64 = 5.0;

/// Display preferences shared by the popup and the settings page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub popup_width: u32,
    pub show_titles: bool,
    pub show_indices: bool,
    pub auto_center: bool,
    pub keyboard_nav: bool,
    pub scroll_speed: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            popup_width: 800,
            show_titles: true,
            show_indices: true,
            auto_center: true,
            keyboard_nav: true,
            scroll_speed: 1.0,
        }
    }
}

impl Settings {
    /// Clamp values a hand-edited or older stored bag may carry out of range
    pub fn normalized(mut self) -> Self {
        self.popup_width = self.popup_width.clamp(MIN_POPUP_WIDTH, MAX_POPUP_WIDTH);
        self.scroll_speed = if self.scroll_speed.is_finite() {
            self.scroll_speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED)
        } else {
            Settings::default().scroll_speed
        };
        self
    }

    /// Width actually applied to the popup surface
    pub fn popup_width_px(&self) -> u32 {
        self.popup_width.clamp(MIN_POPUP_WIDTH, MAX_POPUP_WIDTH)
    }

    /// Decode a stored bag; missing keys fall back to defaults
    pub fn from_stored(value: Value) -> Result<Settings, BridgeError> {
        let settings: Settings = serde_json::from_value(value)?;
        Ok(settings.normalized())
    }

    pub fn to_stored(&self) -> Result<Value, BridgeError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Flat key-value backend the settings bag is written to
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the keys of `defaults`, returning stored values merged over them
    async fn get_with_defaults(&self, defaults: Value) -> Result<Value, BridgeError>;

    async fn set(&self, values: Value) -> Result<(), BridgeError>;
}

/// Settings load / save on top of a [`KeyValueStore`]
pub struct SettingsStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(backend: S) -> Self {
        SettingsStore { backend }
    }

    /// Load settings, using the defaults when the store is unavailable
    pub async fn load(&self) -> Settings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Error loading settings: {}", e);
                Settings::default()
            }
        }
    }

    async fn try_load(&self) -> Result<Settings, BridgeError> {
        let defaults = Settings::default().to_stored()?;
        let stored = self.backend.get_with_defaults(defaults).await?;
        Settings::from_stored(stored)
    }

    /// Overwrite the whole bag
    pub async fn save(&self, settings: &Settings) -> Result<(), BridgeError> {
        let values = settings.to_stored()?;
        self.backend.set(values).await?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Write the compiled-in defaults and return them
    pub async fn reset(&self) -> Result<Settings, BridgeError> {
        let defaults = Settings::default();
        self.save(&defaults).await?;
        Ok(defaults)
    }
}
