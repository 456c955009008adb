//! Best-effort status delivery to the active tab

use crate::host::TabApi;
use crate::models::StatusMessage;

/// Send a status message to the currently active tab. Fire-and-forget: a
/// missing active tab or a delivery failure (no receiving listener) is
/// logged and never escalated to the operation being reported on.
pub fn notify_active_tab(tabs: &dyn TabApi, message: &StatusMessage) {
    match tabs.active_tab() {
        Ok(Some(tab)) => {
            if let Err(e) = tabs.send_message(tab.id, message) {
                log::warn!("status message not delivered to tab {}: {}", tab.id, e);
            }
        }
        Ok(None) => log::debug!("no active tab for status message"),
        Err(e) => log::warn!("could not resolve active tab: {}", e),
    }
}
