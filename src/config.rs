//! Construction-time configuration.

/// Distance, in logical positions, between two jump table entries.
pub const JUMP_INCREMENT: usize = 1000;

/// Number of jump table slots a new list starts with.
pub const INITIAL_TABLE_CAPACITY: usize = 10;

/// Tunables fixed when a list is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    increment: usize,
    initial_capacity: usize,
}

impl Config {
    pub fn new() -> Config {
        return Config {
            increment: JUMP_INCREMENT,
            initial_capacity: INITIAL_TABLE_CAPACITY,
        };
    }

    /// Set the jump table increment. Zero is treated as one.
    pub fn with_increment(mut self, increment: usize) -> Config {
        self.increment = increment.max(1);
        self
    }

    /// Set the initial jump table capacity. Zero is treated as one.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Config {
        self.initial_capacity = capacity.max(1);
        self
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.increment(), 1000);
        assert_eq!(config.initial_capacity(), 10);
    }

    #[test]
    fn zero_is_clamped() {
        let config = Config::new().with_increment(0).with_initial_capacity(0);
        assert_eq!(config.increment(), 1);
        assert_eq!(config.initial_capacity(), 1);
    }
}
