//! The venue aggregate state tree.

use std::collections::BTreeMap;

use common::{EntityId, GameClock};
use serde::{Deserialize, Serialize};

use crate::values::{Coins, EquipmentId, RoomId, StaffId, VendorId};

/// Reputation is clamped into this band by the reducer.
pub const REPUTATION_MIN: i32 = -100;
/// See [`REPUTATION_MIN`].
pub const REPUTATION_MAX: i32 = 100;

/// A piece of equipment installed in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// The equipment's identifier within its room.
    pub equipment_id: EquipmentId,

    /// Human-readable name.
    pub name: String,

    /// The price paid at purchase time.
    pub purchase_price: Coins,
}

/// A room (sub-location) owned by the venue.
///
/// Rooms exclusively own their equipment; nothing outside the state tree
/// holds a reference into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// The room's identifier.
    pub room_id: RoomId,

    /// Human-readable name.
    pub name: String,

    /// Nightly rate charged for the room, if one has been set.
    pub nightly_rate: Option<Coins>,

    /// Equipment installed in this room, keyed by equipment ID.
    pub equipment: BTreeMap<EquipmentId, Equipment>,
}

impl Room {
    /// Creates an empty room.
    pub fn new(room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            room_id,
            name: name.into(),
            nightly_rate: None,
            equipment: BTreeMap::new(),
        }
    }
}

/// A staff member on the venue's payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    /// The staff member's identifier.
    pub staff_id: StaffId,

    /// The staff member's name.
    pub name: String,

    /// Wage owed per day.
    pub daily_wage: Coins,
}

/// A signed vendor relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRelation {
    /// The vendor's identifier.
    pub vendor_id: VendorId,

    /// The vendor's name.
    pub name: String,

    /// Discount granted on purchases, in basis points.
    pub discount_bps: u16,
}

/// The materialized state of one venue.
///
/// State is only ever produced by replaying facts over a template initial
/// state; no code path may edit it outside a reducer. Ownership is
/// strictly tree-shaped: the venue owns its rooms, each room owns its
/// equipment, and so on. `BTreeMap` keeps iteration, serialization, and
/// equality deterministic across replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueState {
    /// The owning entity.
    pub entity_id: EntityId,

    /// The venue's name; `None` until the venue is founded.
    pub name: Option<String>,

    /// The coin purse.
    pub balance: Coins,

    /// Reputation score within [`REPUTATION_MIN`]..=[`REPUTATION_MAX`].
    pub reputation: i32,

    /// Logical clock as of the last replayed clock-advance fact.
    pub clock: GameClock,

    /// Rooms keyed by room ID.
    pub rooms: BTreeMap<RoomId, Room>,

    /// Staff keyed by staff ID.
    pub staff: BTreeMap<StaffId, StaffMember>,

    /// Vendor relationships keyed by vendor ID.
    pub vendors: BTreeMap<VendorId, VendorRelation>,
}

impl VenueState {
    /// The template initial state replays start from. The entity ID is a
    /// placeholder; the state builder stamps the real one.
    pub fn template() -> Self {
        Self {
            entity_id: EntityId::from_uuid(uuid::Uuid::nil()),
            name: None,
            balance: Coins::zero(),
            reputation: 0,
            clock: GameClock::genesis(),
            rooms: BTreeMap::new(),
            staff: BTreeMap::new(),
            vendors: BTreeMap::new(),
        }
    }

    /// Returns true once a VenueFounded fact has been applied.
    pub fn is_founded(&self) -> bool {
        self.name.is_some()
    }

    /// Returns a room by ID.
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Returns a staff member by ID.
    pub fn staff_member(&self, staff_id: &StaffId) -> Option<&StaffMember> {
        self.staff.get(staff_id)
    }

    /// Total wages owed per day across all staff.
    pub fn daily_wage_bill(&self) -> Coins {
        self.staff.values().map(|s| s.daily_wage).sum()
    }

    /// The best (largest) discount among signed vendors, in basis points.
    pub fn best_vendor_discount_bps(&self) -> u16 {
        self.vendors
            .values()
            .map(|v| v.discount_bps)
            .max()
            .unwrap_or(0)
    }

    /// Total equipment units across all rooms.
    pub fn equipment_count(&self) -> usize {
        self.rooms.values().map(|r| r.equipment.len()).sum()
    }
}

impl Default for VenueState {
    fn default() -> Self {
        Self::template()
    }
}
