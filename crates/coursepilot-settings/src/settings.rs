//! The typed settings document.
//!
//! Keys are stored individually so each process can read just what it needs;
//! [`Settings`] is the aggregate view with the documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::store::SettingsHandle;

/// Storage keys, as they appear on the wire and on disk.
pub mod keys {
    pub const AUTO_LEARN: &str = "autoLearn";
    pub const BACKGROUND_BROWSER: &str = "backgroundBrowser";
    pub const LANGUAGE: &str = "language";
    pub const DARK_MODE: &str = "darkMode";
    pub const LAST_ACTIVE_TAB: &str = "lastActiveTab";
    pub const MENU_POSITION: &str = "menuPosition";
}

/// Saved position of the floating menu, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPosition {
    pub left: f64,
    pub top: f64,
}

/// All persisted settings with their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_learn: bool,
    pub background_browser: bool,
    pub language: String,
    pub dark_mode: bool,
    pub last_active_tab: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_position: Option<MenuPosition>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_learn: false,
            background_browser: false,
            language: "en".to_string(),
            dark_mode: false,
            last_active_tab: "lessons".to_string(),
            menu_position: None,
        }
    }
}

impl Settings {
    /// Load every known key, applying defaults for absent ones.
    pub async fn load(handle: &SettingsHandle) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            auto_learn: handle
                .get_or(keys::AUTO_LEARN, defaults.auto_learn)
                .await?,
            background_browser: handle
                .get_or(keys::BACKGROUND_BROWSER, defaults.background_browser)
                .await?,
            language: handle.get_or(keys::LANGUAGE, defaults.language).await?,
            dark_mode: handle.get_or(keys::DARK_MODE, defaults.dark_mode).await?,
            last_active_tab: handle
                .get_or(keys::LAST_ACTIVE_TAB, defaults.last_active_tab)
                .await?,
            menu_position: handle.get(keys::MENU_POSITION).await?,
        })
    }

    /// Write every key back to the store.
    pub async fn persist(&self, handle: &SettingsHandle) -> Result<(), SettingsError> {
        handle.set(keys::AUTO_LEARN, &self.auto_learn).await?;
        handle
            .set(keys::BACKGROUND_BROWSER, &self.background_browser)
            .await?;
        handle.set(keys::LANGUAGE, &self.language).await?;
        handle.set(keys::DARK_MODE, &self.dark_mode).await?;
        handle
            .set(keys::LAST_ACTIVE_TAB, &self.last_active_tab)
            .await?;
        match &self.menu_position {
            Some(position) => handle.set(keys::MENU_POSITION, position).await?,
            None => handle.remove(keys::MENU_POSITION).await?,
        }
        Ok(())
    }
}
