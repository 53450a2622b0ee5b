//! Domain error taxonomies.

use fact_log::FactId;
use thiserror::Error;

use crate::values::{Coins, EquipmentId, RoomId, StaffId, VendorId};

/// Fatal failures during replay or registry wiring.
///
/// These are not business outcomes: a replay error means the fact history
/// cannot be interpreted and the entity cannot be safely served. Callers
/// must not convert these into ordinary rejections.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A fact in the log has no registered reducer. Distinct from a
    /// business rejection: the log is fine, the wiring is not.
    #[error("no reducer registered for fact type '{type_tag}'")]
    UnregisteredFactType { type_tag: String },

    /// A persisted payload could not be decoded into its typed fact.
    #[error("malformed payload for fact {fact_id} of type '{type_tag}': {source}")]
    MalformedFact {
        type_tag: String,
        fact_id: FactId,
        #[source]
        source: serde_json::Error,
    },

    /// A reducer was invoked with a fact of a different type than it was
    /// registered for.
    #[error("reducer for '{expected}' received a '{actual}' fact")]
    MismatchedReducer {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors raised while wiring registries at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A reducer was registered twice for the same tag. Re-registration
    /// is rejected rather than last-wins so wiring mistakes surface
    /// immediately.
    #[error("reducer already registered for fact type '{type_tag}'")]
    DuplicateReducer { type_tag: &'static str },

    /// A handler was registered twice for the same command type.
    #[error("handler already registered for command type '{command_type}'")]
    DuplicateHandler { command_type: &'static str },
}

/// Business rejections produced by command validation.
///
/// A rejection is an expected outcome, not a fault: it produces zero
/// facts and leaves the log untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandRejection {
    /// The venue has already been founded.
    #[error("venue is already founded")]
    VenueAlreadyFounded,

    /// The venue has not been founded yet.
    #[error("venue has not been founded")]
    VenueNotFounded,

    /// The purse cannot cover the required amount.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Coins, available: Coins },

    /// A monetary amount was negative where only non-negative amounts
    /// are allowed.
    #[error("amount must not be negative: {amount}")]
    NegativeAmount { amount: Coins },

    /// The referenced room does not exist.
    #[error("room not found: {room_id}")]
    RoomNotFound { room_id: RoomId },

    /// A room with this ID already exists.
    #[error("room already exists: {room_id}")]
    DuplicateRoom { room_id: RoomId },

    /// Equipment with this ID is already installed in the room.
    #[error("equipment already installed in {room_id}: {equipment_id}")]
    EquipmentAlreadyInstalled {
        room_id: RoomId,
        equipment_id: EquipmentId,
    },

    /// The referenced staff member does not exist.
    #[error("staff member not found: {staff_id}")]
    StaffNotFound { staff_id: StaffId },

    /// A staff member with this ID is already employed.
    #[error("staff member already employed: {staff_id}")]
    DuplicateStaff { staff_id: StaffId },

    /// A relationship with this vendor already exists.
    #[error("vendor already signed: {vendor_id}")]
    DuplicateVendor { vendor_id: VendorId },

    /// The vendor discount is outside 0..=10000 basis points.
    #[error("invalid discount: {bps} bps")]
    InvalidDiscount { bps: u16 },

    /// A narrator role submitted a fact type outside its allow-list.
    #[error("fact type '{type_tag}' is not allowed for role {role}")]
    FactNotAllowed {
        role: crate::roles::NarratorRole,
        type_tag: String,
    },

    /// A reputation adjustment was outside the permitted band.
    #[error("reputation delta out of range: {delta}")]
    InvalidReputationDelta { delta: i32 },
}
