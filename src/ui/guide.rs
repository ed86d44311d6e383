//! First-visit onboarding guide
//!
//! The guide overlays the map until the user closes it. Closing it persists a
//! flag so later visits start straight on the map; the flag is read once at
//! startup and written at most once.

use crate::{
    core::constants::GUIDE_MAP_OPACITY,
    traits::{FadeSpeed, GuideStore, UiEffects, UiElement},
    Result,
};
#[cfg(feature = "wasm")]
use crate::{core::constants::GUIDE_STORAGE_KEY, MapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

pub struct OnboardingGuide {
    store: Box<dyn GuideStore>,
    visible: bool,
}

impl OnboardingGuide {
    pub fn new(store: Box<dyn GuideStore>) -> Self {
        Self {
            store,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows the guide unless it was dismissed on an earlier visit
    pub fn show_if_first_visit(&mut self, effects: &mut dyn UiEffects) {
        let dismissed = self.store.is_dismissed().unwrap_or_else(|e| {
            log::warn!("could not read onboarding flag, showing guide: {}", e);
            false
        });
        if !dismissed {
            self.show(effects);
        }
    }

    pub fn show(&mut self, effects: &mut dyn UiEffects) {
        effects.fade_in(UiElement::Guide, FadeSpeed::Slow);
        effects.fade_to(UiElement::Map, FadeSpeed::Slow, GUIDE_MAP_OPACITY);
        effects.fade_out(UiElement::GuideIcon, FadeSpeed::Slow);
        effects.set_style(UiElement::Map, "pointer-events", "none");
        self.visible = true;
    }

    pub fn hide(&mut self, effects: &mut dyn UiEffects) {
        effects.fade_out(UiElement::Guide, FadeSpeed::Slow);
        effects.fade_to(UiElement::Map, FadeSpeed::Slow, 1.0);
        effects.fade_in(UiElement::GuideIcon, FadeSpeed::Slow);
        effects.set_style(UiElement::Map, "pointer-events", "auto");
        self.visible = false;
    }

    /// Hides the guide and records the dismissal if it was never recorded.
    ///
    /// The guide is hidden even when the flag cannot be written.
    pub fn dismiss(&mut self, effects: &mut dyn UiEffects) -> Result<()> {
        let result = match self.store.is_dismissed() {
            Ok(true) => Ok(()),
            _ => self.store.mark_dismissed(),
        };
        self.hide(effects);
        result
    }
}

/// Flag kept in memory only.
///
/// Clones share the same flag, so a host can keep one to inspect what the
/// guide wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryGuideStore {
    dismissed: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryGuideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismissed() -> Self {
        let store = Self::default();
        store.dismissed.store(true, Ordering::SeqCst);
        store
    }

    /// Number of times the flag was written
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl GuideStore for MemoryGuideStore {
    fn is_dismissed(&self) -> Result<bool> {
        Ok(self.dismissed.load(Ordering::SeqCst))
    }

    fn mark_dismissed(&mut self) -> Result<()> {
        self.dismissed.store(true, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GuideState {
    #[serde(default)]
    guide_dismissed: bool,
}

/// Flag persisted as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct FileGuideStore {
    path: PathBuf,
}

impl FileGuideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GuideStore for FileGuideStore {
    fn is_dismissed(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let state: GuideState = serde_json::from_str(&json)?;
        Ok(state.guide_dismissed)
    }

    fn mark_dismissed(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let state = GuideState {
            guide_dismissed: true,
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&state)?)?;
        log::debug!("onboarding flag written to {}", self.path.display());
        Ok(())
    }
}

/// Flag kept in the browser's local storage under the `guide` key
#[cfg(feature = "wasm")]
#[derive(Debug, Clone)]
pub struct LocalStorageGuideStore {
    key: String,
}

#[cfg(feature = "wasm")]
impl LocalStorageGuideStore {
    pub fn new() -> Self {
        Self {
            key: GUIDE_STORAGE_KEY.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| MapError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| MapError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| MapError::Storage("local storage unavailable".to_string()))
    }
}

#[cfg(feature = "wasm")]
impl Default for LocalStorageGuideStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "wasm")]
impl GuideStore for LocalStorageGuideStore {
    fn is_dismissed(&self) -> Result<bool> {
        let value = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| MapError::Storage(format!("{:?}", e)))?;
        Ok(value.is_some())
    }

    fn mark_dismissed(&mut self) -> Result<()> {
        Self::storage()?
            .set_item(&self.key, "false")
            .map_err(|e| MapError::Storage(format!("{:?}", e)))
    }
}
