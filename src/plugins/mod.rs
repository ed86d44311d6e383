pub mod measure;

pub use measure::{format_distance, RouteMeasure};
