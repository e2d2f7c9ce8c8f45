//! Questline - level up your life
//!
//! Real-world tasks become quests. Completing one awards XP and grows the
//! player's stats, which drives levels, ranks, streaks and achievements.
//!
//! ## Layers
//!
//! 1. **Progression**: [`progression::Progression`] holds one player's state
//!    and applies every transition in memory. It never does I/O.
//!
//! 2. **Persistence**: [`store::Persistence`] stores that state per user;
//!    [`store::SqliteStore`] is the SQLite implementation.
//!
//! 3. **Session**: [`session::Session`] pairs the two and only swaps in a new
//!    state once the store has accepted it.
//!
//! The [`oracle`] module generates quests and reads reflections through
//! Gemini, with offline fallbacks.

pub mod config;
pub mod domain;
pub mod oracle;
pub mod progression;
pub mod session;
pub mod store;

pub use domain::*;
