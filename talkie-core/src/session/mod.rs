//! Session identity, handle, and lifecycle

pub mod handle;
pub mod identity;
pub mod manager;
pub mod refresh;

// Re-export key types for convenience
pub use handle::{SessionHandle, SessionState};
pub use identity::SessionIdentity;
pub use manager::SessionManager;
pub use refresh::{RefreshScheduler, RefreshSink};
