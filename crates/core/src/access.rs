//! Authorization rules for bookings, rooms and user management.
//!
//! The HTTP layer resolves the caller into an [`Actor`] and asks these
//! functions; none of them look anything up.

use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Forbid,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    fn from_bool(allowed: bool) -> Self {
        if allowed {
            AccessDecision::Allow
        } else {
            AccessDecision::Forbid
        }
    }
}

/// Which bookings a list request may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    OwnedBy(DbId),
}

/// Read-one, update and delete of a booking: admins always, otherwise only
/// the owner.
pub fn authorize_booking_access(actor: &Actor, owner_id: DbId) -> AccessDecision {
    AccessDecision::from_bool(actor.is_admin() || actor.id == owner_id)
}

/// Listing never forbids; non-admins just get their own bookings.
pub fn booking_list_scope(actor: &Actor) -> ListScope {
    if actor.is_admin() {
        ListScope::All
    } else {
        ListScope::OwnedBy(actor.id)
    }
}

/// The room catalog is public, with or without a credential.
pub fn authorize_room_read(_actor: Option<&Actor>) -> AccessDecision {
    AccessDecision::Allow
}

/// Creating, editing and deleting rooms is admin-only.
pub fn authorize_room_write(actor: &Actor) -> AccessDecision {
    AccessDecision::from_bool(actor.is_admin())
}

/// Listing users and changing roles is admin-only.
pub fn authorize_user_admin(actor: &Actor) -> AccessDecision {
    AccessDecision::from_bool(actor.is_admin())
}
