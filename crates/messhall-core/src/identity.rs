//! Identity resolver port
//!
//! Resident-facing entry points never take an identifier; they resolve the
//! device's signed-in resident through this port. A device with no identity
//! is a normal state (signed out), not a fault.

use messhall_types::ResidentId;

/// Resolves the resident identity bound to the calling device, if any.
pub trait IdentityResolver: Send + Sync {
    /// The signed-in resident, or `None` when signed out.
    fn current_resident(&self) -> Option<ResidentId>;
}

/// Fixed identity: a device bound to one resident, or to nobody.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<ResidentId>);

impl StaticIdentity {
    /// Device signed in as `resident`.
    #[inline]
    #[must_use]
    pub fn signed_in(resident: ResidentId) -> Self {
        Self(Some(resident))
    }

    /// Device with nobody signed in.
    #[inline]
    #[must_use]
    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityResolver for StaticIdentity {
    fn current_resident(&self) -> Option<ResidentId> {
        self.0.clone()
    }
}
