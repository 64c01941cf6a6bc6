use serde::{Deserialize, Serialize};

/// Lower bound on the swappable-table capacity.
pub const SWAP_CAPACITY_MIN: usize = 100;
/// Upper bound on the swappable-table capacity.
pub const SWAP_CAPACITY_MAX: usize = 10_000;
/// Default swappable-table capacity.
pub const SWAP_CAPACITY_DEFAULT: usize = 2_000;

/// Environment override for [`CacheOptions::from_env`].
pub const SWAP_CAPACITY_ENV: &str = "ANVIL_INFO_SWAP_CAPACITY";

/// Tunables for a [`crate::ClassInfoCache`].
///
/// Passed explicitly into the cache constructor; there is no process-global
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Maximum number of resolved classes held in the swappable table. Always
    /// clamped to `[SWAP_CAPACITY_MIN, SWAP_CAPACITY_MAX]`.
    #[serde(default = "default_swap_capacity")]
    pub swap_capacity: usize,
}

fn default_swap_capacity() -> usize {
    SWAP_CAPACITY_DEFAULT
}

impl CacheOptions {
    pub fn new(swap_capacity: usize) -> Self {
        Self {
            swap_capacity: swap_capacity.clamp(SWAP_CAPACITY_MIN, SWAP_CAPACITY_MAX),
        }
    }

    /// Read the capacity override from the process environment, falling back
    /// to the default when unset or unparseable.
    pub fn from_env() -> Self {
        match std::env::var(SWAP_CAPACITY_ENV) {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(value) => Self::new(value),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        env = SWAP_CAPACITY_ENV,
                        "ignoring unparseable swap capacity override"
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            swap_capacity: SWAP_CAPACITY_DEFAULT,
        }
    }
}
