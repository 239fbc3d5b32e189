//! Application-level configuration constants.

// Data source
pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const REQUEST_TIMEOUT_MS: u32 = 15_000;

// UI Behavior
pub const DEBOUNCE_MS: u32 = 200;
pub const SUGGESTION_LIMIT: usize = 10;

// Selection limits
pub const MAX_TYPES: usize = 2;
pub const MAX_ABILITIES: usize = 3;
