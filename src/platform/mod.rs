//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Session seeds

pub mod timer;

pub use timer::FixedTimer;

/// Fresh seed for a new session. On wasm32 the entropy comes from
/// getrandom's `wasm_js` backend.
pub fn session_seed() -> u64 {
    rand::random()
}
