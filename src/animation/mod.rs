pub mod arrow;
pub mod ticker;

// Re-export commonly used types for convenience
pub use arrow::ArrowCycle;
pub use ticker::ManualTicker;

#[cfg(feature = "tokio-runtime")]
pub use ticker::TokioTicker;
