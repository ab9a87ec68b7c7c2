//! Transparency module.
//!
//! Tracks and exposes what the tool recorded and how verifications went.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log_with_persistence, SharedTransparencyLog, TransparencyLog, TransparencyStats,
};
