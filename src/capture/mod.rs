//! Keystroke capture: the event types and the adapters that feed a tracker.
//!
//! Nothing here binds to a real input device. Hosts translate their own
//! key-press notifications into `KeyPress` values.

pub mod feed;
pub mod replay;
pub mod types;

// Re-export commonly used types
pub use feed::KeyFeed;
pub use replay::{parse_log, ReplayError};
pub use types::{KeyEvent, KeyPress, Pattern};
