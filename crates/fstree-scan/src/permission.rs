//! Access verification for host capabilities.
//!
//! The tree builder assumes access is already granted. Callers use
//! [`verify_permission`] beforehand to query the host and prompt when needed.

use futures::future::BoxFuture;

/// Access requested on a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

/// Host answer to a permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not decided yet; a request will prompt the user.
    Prompt,
}

/// A capability whose access can be queried and requested.
pub trait PermissionHandle: Send + Sync {
    /// Current permission state, without prompting.
    fn query(&self, mode: AccessMode) -> BoxFuture<'_, PermissionState>;

    /// Request permission, prompting interactively if the host does so.
    fn request(&self, mode: AccessMode) -> BoxFuture<'_, PermissionState>;
}

/// Check that `mode` access is granted, requesting it if it is not.
pub async fn verify_permission(handle: &dyn PermissionHandle, mode: AccessMode) -> bool {
    if handle.query(mode).await == PermissionState::Granted {
        return true;
    }
    let granted = handle.request(mode).await == PermissionState::Granted;
    tracing::debug!(?mode, granted, "requested permission");
    granted
}
