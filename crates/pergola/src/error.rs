//! Error types for host-facing operations.
//!
//! Widget operations themselves never return recoverable errors: contract
//! violations abort, and best-effort I/O degrades to a no-op. The `Result`
//! here covers the recoverable, host-facing surface: structural requests
//! that can fail loudly, like asking for a dialog host that doesn't exist.

use thiserror::Error;

/// Result alias used throughout pergola.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable errors surfaced to the hosting application.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// No ancestor in the parent chain hosts dialogs.
    #[error("no dialog host above {0}")]
    NoDialogHost(String),

    /// No ancestor in the parent chain hosts overlays.
    #[error("no overlay host above {0}")]
    NoOverlayHost(String),

    /// A structural operation referenced a widget that is not in the tree.
    #[error("unknown widget")]
    UnknownWidget,

    /// Internal consistency failure.
    #[error("internal: {0}")]
    Internal(String),
}
