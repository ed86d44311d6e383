pub mod address;
pub mod guide;
pub mod popup;

pub use address::{wrap_address, wrap_address_with};

pub use guide::{FileGuideStore, MemoryGuideStore, OnboardingGuide};

#[cfg(feature = "wasm")]
pub use guide::LocalStorageGuideStore;

pub use popup::InfoPopup;
