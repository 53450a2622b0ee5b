//! The typed command taxonomy.
//!
//! Every command type carries exactly one typed payload struct. Commands
//! are transient intents: they are validated, possibly turned into facts,
//! and then discarded - never persisted or replayed.

use serde::{Deserialize, Serialize};

use crate::facts::Fact;
use crate::roles::NarratorRole;
use crate::values::{Coins, EquipmentId, RoomId, StaffId, VendorId};

/// Commands that can be executed against a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    /// Found the venue.
    FoundVenue(FoundVenue),

    /// Advance the logical clock by one day.
    AdvanceDay(AdvanceDay),

    /// Add a room.
    AddRoom(AddRoom),

    /// Set a room's nightly rate.
    SetRoomRate(SetRoomRate),

    /// Buy equipment for a room.
    PurchaseEquipment(PurchaseEquipment),

    /// Hire a staff member.
    HireStaff(HireStaff),

    /// Dismiss a staff member.
    DismissStaff(DismissStaff),

    /// Sign a vendor relationship.
    SignVendor(SignVendor),

    /// Add coins to the purse.
    CreditFunds(CreditFunds),

    /// Remove coins from the purse.
    DebitFunds(DebitFunds),

    /// Record an allow-listed fact on behalf of a narrator role.
    RecordNarration(RecordNarration),
}

impl Command {
    /// Every command type in the taxonomy, for exhaustiveness checks.
    pub const COMMAND_TYPES: [&'static str; 11] = [
        "FoundVenue",
        "AdvanceDay",
        "AddRoom",
        "SetRoomRate",
        "PurchaseEquipment",
        "HireStaff",
        "DismissStaff",
        "SignVendor",
        "CreditFunds",
        "DebitFunds",
        "RecordNarration",
    ];

    /// Returns the command's stable type discriminator.
    pub fn command_type(&self) -> &'static str {
        match self {
            Command::FoundVenue(_) => "FoundVenue",
            Command::AdvanceDay(_) => "AdvanceDay",
            Command::AddRoom(_) => "AddRoom",
            Command::SetRoomRate(_) => "SetRoomRate",
            Command::PurchaseEquipment(_) => "PurchaseEquipment",
            Command::HireStaff(_) => "HireStaff",
            Command::DismissStaff(_) => "DismissStaff",
            Command::SignVendor(_) => "SignVendor",
            Command::CreditFunds(_) => "CreditFunds",
            Command::DebitFunds(_) => "DebitFunds",
            Command::RecordNarration(_) => "RecordNarration",
        }
    }
}

/// Payload for FoundVenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundVenue {
    /// The venue's name.
    pub name: String,

    /// The purse the venue opens with.
    pub starting_balance: Coins,
}

/// Payload for AdvanceDay.
///
/// Carries no parameters: the next day is computed from the replayed
/// clock, never from wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvanceDay {}

/// Payload for AddRoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRoom {
    /// The new room's identifier.
    pub room_id: RoomId,

    /// Human-readable room name.
    pub name: String,
}

/// Payload for SetRoomRate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRoomRate {
    /// The room whose rate to set.
    pub room_id: RoomId,

    /// The new nightly rate. Must be non-negative.
    pub nightly_rate: Coins,
}

/// Payload for PurchaseEquipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEquipment {
    /// The room to install the equipment in.
    pub room_id: RoomId,

    /// The equipment's identifier.
    pub equipment_id: EquipmentId,

    /// Human-readable equipment name.
    pub name: String,

    /// The list price before any vendor discount.
    pub list_price: Coins,
}

/// Payload for HireStaff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HireStaff {
    /// The staff member's identifier.
    pub staff_id: StaffId,

    /// The staff member's name.
    pub name: String,

    /// Wage owed per day. Must be non-negative.
    pub daily_wage: Coins,
}

/// Payload for DismissStaff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DismissStaff {
    /// The staff member to dismiss.
    pub staff_id: StaffId,
}

/// Payload for SignVendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignVendor {
    /// The vendor's identifier.
    pub vendor_id: VendorId,

    /// The vendor's name.
    pub name: String,

    /// Discount granted on purchases, in basis points (0..=10000).
    pub discount_bps: u16,
}

/// Payload for CreditFunds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditFunds {
    /// Amount to add. Must be non-negative.
    pub amount: Coins,

    /// Why the coins arrive.
    pub reason: String,
}

/// Payload for DebitFunds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebitFunds {
    /// Amount to remove. Must be non-negative and covered by the purse.
    pub amount: Coins,

    /// Why the coins leave.
    pub reason: String,
}

/// Payload for RecordNarration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordNarration {
    /// The role the narrative collaborator acts under.
    pub role: NarratorRole,

    /// The fact the collaborator wants recorded. Its type tag must be on
    /// the role's allow-list and its payload passes the same validation
    /// as player-driven money movements.
    pub fact: Fact,
}

// Convenience constructors
impl Command {
    /// Creates a FoundVenue command.
    pub fn found_venue(name: impl Into<String>, starting_balance: Coins) -> Self {
        Command::FoundVenue(FoundVenue {
            name: name.into(),
            starting_balance,
        })
    }

    /// Creates an AdvanceDay command.
    pub fn advance_day() -> Self {
        Command::AdvanceDay(AdvanceDay {})
    }

    /// Creates an AddRoom command.
    pub fn add_room(room_id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Command::AddRoom(AddRoom {
            room_id: room_id.into(),
            name: name.into(),
        })
    }

    /// Creates a SetRoomRate command.
    pub fn set_room_rate(room_id: impl Into<RoomId>, nightly_rate: Coins) -> Self {
        Command::SetRoomRate(SetRoomRate {
            room_id: room_id.into(),
            nightly_rate,
        })
    }

    /// Creates a PurchaseEquipment command.
    pub fn purchase_equipment(
        room_id: impl Into<RoomId>,
        equipment_id: impl Into<EquipmentId>,
        name: impl Into<String>,
        list_price: Coins,
    ) -> Self {
        Command::PurchaseEquipment(PurchaseEquipment {
            room_id: room_id.into(),
            equipment_id: equipment_id.into(),
            name: name.into(),
            list_price,
        })
    }

    /// Creates a HireStaff command.
    pub fn hire_staff(
        staff_id: impl Into<StaffId>,
        name: impl Into<String>,
        daily_wage: Coins,
    ) -> Self {
        Command::HireStaff(HireStaff {
            staff_id: staff_id.into(),
            name: name.into(),
            daily_wage,
        })
    }

    /// Creates a DismissStaff command.
    pub fn dismiss_staff(staff_id: impl Into<StaffId>) -> Self {
        Command::DismissStaff(DismissStaff {
            staff_id: staff_id.into(),
        })
    }

    /// Creates a SignVendor command.
    pub fn sign_vendor(
        vendor_id: impl Into<VendorId>,
        name: impl Into<String>,
        discount_bps: u16,
    ) -> Self {
        Command::SignVendor(SignVendor {
            vendor_id: vendor_id.into(),
            name: name.into(),
            discount_bps,
        })
    }

    /// Creates a CreditFunds command.
    pub fn credit_funds(amount: Coins, reason: impl Into<String>) -> Self {
        Command::CreditFunds(CreditFunds {
            amount,
            reason: reason.into(),
        })
    }

    /// Creates a DebitFunds command.
    pub fn debit_funds(amount: Coins, reason: impl Into<String>) -> Self {
        Command::DebitFunds(DebitFunds {
            amount,
            reason: reason.into(),
        })
    }

    /// Creates a RecordNarration command.
    pub fn record_narration(role: NarratorRole, fact: Fact) -> Self {
        Command::RecordNarration(RecordNarration { role, fact })
    }
}
