use crate::core::{config::AnimationConfig, constants::MAX_ARROW_SPEED};

/// Cyclic position of the direction arrow along the route.
///
/// Every tick moves the arrow by `1 / speed` percent; after `speed * 100`
/// ticks it is back at the start of the line.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowCycle {
    count: u32,
    speed: u32,
}

impl ArrowCycle {
    pub fn new(speed: u32) -> Self {
        Self {
            count: 0,
            speed: speed.clamp(1, MAX_ARROW_SPEED),
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.speed)
    }

    pub fn period(&self) -> u32 {
        self.speed * 100
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Current offset as a percentage of the line length
    pub fn offset_percent(&self) -> f64 {
        self.count as f64 / self.speed as f64
    }

    /// Advance one tick and return the new offset percentage
    pub fn advance(&mut self) -> f64 {
        self.count = (self.count + 1) % self.period();
        self.offset_percent()
    }
}

impl Default for ArrowCycle {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}
