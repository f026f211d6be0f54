//! Window chrome collaborator.

use super::HostError;

/// The part of the UI host that owns views.
///
/// Only the log view is driven from the message protocol; menus, tray and
/// the main window are the host's own business.
pub trait WindowHost: Send + Sync {
    /// Open the log view, or raise it if it is already open.
    fn show_log_view(&self) -> Result<(), HostError>;
}
