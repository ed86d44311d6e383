//! Core constants shared by the controller, the formatters and the animation.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Initial map center (Kraków main square).
pub const DEFAULT_CENTER: (f64, f64) = (50.06465, 19.94498);

/// Initial zoom level of the map view.
pub const DEFAULT_ZOOM: f64 = 14.0;

/// Zoom applied when a searched place has a location but no viewport.
pub const PLACE_ZOOM: f64 = 17.0;

/// Degrees added around a lone marker when fitting the view to all markers.
pub const SINGLE_MARKER_PADDING: f64 = 0.01;

/// Address segments longer than this many characters may be broken.
pub const ADDRESS_SEGMENT_MAX_CHARS: usize = 23;

/// Segments need more than this many words to receive a line break.
pub const ADDRESS_MIN_WORDS: usize = 3;

/// Line break token understood by the info panel.
pub const LINE_BREAK: &str = "<br>";

/// Distances at or above this many meters are shown in kilometers.
pub const KILOMETER_THRESHOLD: f64 = 1000.0;

/// Milliseconds between two arrow animation frames.
pub const ARROW_TICK_MS: u64 = 16;

/// Ticks per percent of arrow travel; one full cycle is `speed * 100` ticks.
pub const ARROW_SPEED: u32 = 4;

/// Largest accepted arrow speed; keeps the cycle length within `u32`
pub const MAX_ARROW_SPEED: u32 = 10_000;

/// Route line color.
pub const ROUTE_COLOR: &str = "#ff4845";

/// Route line width in pixels.
pub const ROUTE_WIDTH: f32 = 6.0;

/// Arrow symbol scale along the route.
pub const ARROW_SCALE: f32 = 5.0;

pub const START_ICON_URL: &str = "https://maps.google.com/mapfiles/kml/paddle/1.png";

pub const DESTINATION_ICON_URL: &str = "https://maps.google.com/mapfiles/kml/paddle/2.png";

/// Local storage key of the onboarding flag.
pub const GUIDE_STORAGE_KEY: &str = "guide";

/// Opacity of the map while the onboarding guide covers it.
pub const GUIDE_MAP_OPACITY: f32 = 0.4;
