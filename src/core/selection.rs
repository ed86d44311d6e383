//! Start/destination role bookkeeping.
//!
//! Roles point into the controller's marker list by index. The two slots are
//! kept together so the "one marker cannot be both endpoints" rule and the
//! re-indexing on removal live in one place.

use crate::{core::geo::LatLng, layers::marker::MarkerIcon};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Start,
    Destination,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Start => Role::Destination,
            Role::Destination => Role::Start,
        }
    }

    pub fn icon(self) -> MarkerIcon {
        match self {
            Role::Start => MarkerIcon::Start,
            Role::Destination => MarkerIcon::Destination,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Start => write!(f, "start"),
            Role::Destination => write!(f, "destination"),
        }
    }
}

/// One role slot: which marker holds the role and where it was when assigned
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSelection {
    role: Role,
    index: Option<usize>,
    position: Option<LatLng>,
}

impl RoleSelection {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            index: None,
            position: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn position(&self) -> Option<LatLng> {
        self.position
    }

    pub fn icon(&self) -> MarkerIcon {
        self.role.icon()
    }

    pub fn is_assigned(&self) -> bool {
        self.index.is_some()
    }

    fn assign(&mut self, index: usize, position: LatLng) {
        self.index = Some(index);
        self.position = Some(position);
    }

    fn clear(&mut self) {
        self.index = None;
        self.position = None;
    }
}

/// The start and destination slots
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSlots {
    start: RoleSelection,
    destination: RoleSelection,
}

impl RoleSlots {
    pub fn new() -> Self {
        Self {
            start: RoleSelection::new(Role::Start),
            destination: RoleSelection::new(Role::Destination),
        }
    }

    pub fn get(&self, role: Role) -> &RoleSelection {
        match role {
            Role::Start => &self.start,
            Role::Destination => &self.destination,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut RoleSelection {
        match role {
            Role::Start => &mut self.start,
            Role::Destination => &mut self.destination,
        }
    }

    pub fn index(&self, role: Role) -> Option<usize> {
        self.get(role).index
    }

    /// Puts the marker at `index` into `role`.
    ///
    /// Returns the other role if it had to be cleared because the same
    /// marker held it.
    pub fn assign(&mut self, role: Role, index: usize, position: LatLng) -> Option<Role> {
        self.get_mut(role).assign(index, position);

        let other = role.other();
        if self.index(other) == Some(index) {
            self.get_mut(other).clear();
            Some(other)
        } else {
            None
        }
    }

    pub fn clear(&mut self, role: Role) {
        self.get_mut(role).clear();
    }

    /// The role held by the marker at `index`, start taking precedence
    pub fn role_at(&self, index: usize) -> Option<Role> {
        if self.start.index == Some(index) {
            Some(Role::Start)
        } else if self.destination.index == Some(index) {
            Some(Role::Destination)
        } else {
            None
        }
    }

    /// Cached endpoint coordinates when both roles are assigned
    pub fn endpoints(&self) -> Option<(LatLng, LatLng)> {
        if self.start.index.is_none() || self.destination.index.is_none() {
            return None;
        }
        Some((self.start.position?, self.destination.position?))
    }

    pub fn both_assigned(&self) -> bool {
        self.start.is_assigned() && self.destination.is_assigned()
    }

    pub fn any_assigned(&self) -> bool {
        self.start.is_assigned() || self.destination.is_assigned()
    }

    /// Re-indexes both slots before the marker at `removed` leaves the list.
    ///
    /// Slots past the removed index move down by one. A slot still pointing
    /// at the removed marker cannot stay valid and is cleared.
    pub fn shift_for_removal(&mut self, removed: usize) {
        for slot in [&mut self.start, &mut self.destination] {
            match slot.index {
                Some(index) if index > removed => slot.index = Some(index - 1),
                Some(index) if index == removed => slot.clear(),
                _ => {}
            }
        }
    }
}

impl Default for RoleSlots {
    fn default() -> Self {
        Self::new()
    }
}
