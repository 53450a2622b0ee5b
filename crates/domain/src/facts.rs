//! The closed taxonomy of venue facts.

use common::GameClock;
use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::values::{Coins, EquipmentId, RoomId, StaffId, VendorId};

/// Facts that can occur in a venue's history.
///
/// Facts are immutable records of something that happened; they are named
/// in past tense and never carry behavior. The serialized form is
/// `{"type": <tag>, "data": {...}}`, matching the persisted log format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Fact {
    /// The venue was founded.
    VenueFounded(VenueFoundedData),

    /// The logical clock advanced to a new day.
    DayAdvanced(DayAdvancedData),

    /// Coins left the venue's purse.
    FundsDebited(FundsDebitedData),

    /// Coins entered the venue's purse.
    FundsCredited(FundsCreditedData),

    /// A room was added to the venue.
    RoomAdded(RoomAddedData),

    /// A room's nightly rate was set.
    RoomRateSet(RoomRateSetData),

    /// A piece of equipment was installed in a room.
    EquipmentPurchased(EquipmentPurchasedData),

    /// A staff member was hired.
    StaffHired(StaffHiredData),

    /// A staff member was dismissed.
    StaffDismissed(StaffDismissedData),

    /// A vendor relationship was signed.
    VendorSigned(VendorSignedData),

    /// The venue's reputation moved.
    ReputationAdjusted(ReputationAdjustedData),
}

impl Fact {
    /// Every type tag in the taxonomy, for exhaustiveness checks.
    pub const TYPE_TAGS: [&'static str; 11] = [
        "VenueFounded",
        "DayAdvanced",
        "FundsDebited",
        "FundsCredited",
        "RoomAdded",
        "RoomRateSet",
        "EquipmentPurchased",
        "StaffHired",
        "StaffDismissed",
        "VendorSigned",
        "ReputationAdjusted",
    ];

    /// Returns the fact's stable type discriminator.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Fact::VenueFounded(_) => "VenueFounded",
            Fact::DayAdvanced(_) => "DayAdvanced",
            Fact::FundsDebited(_) => "FundsDebited",
            Fact::FundsCredited(_) => "FundsCredited",
            Fact::RoomAdded(_) => "RoomAdded",
            Fact::RoomRateSet(_) => "RoomRateSet",
            Fact::EquipmentPurchased(_) => "EquipmentPurchased",
            Fact::StaffHired(_) => "StaffHired",
            Fact::StaffDismissed(_) => "StaffDismissed",
            Fact::VendorSigned(_) => "VendorSigned",
            Fact::ReputationAdjusted(_) => "ReputationAdjusted",
        }
    }

    /// Returns the fact's payload (the `data` object of the serialized
    /// form), for stamping into a fact record.
    pub fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        Ok(value
            .as_object_mut()
            .and_then(|obj| obj.remove("data"))
            .unwrap_or(serde_json::Value::Null))
    }

    /// Reconstructs a typed fact from a persisted record's tag and payload.
    pub fn from_record(record: &fact_log::FactRecord) -> Result<Self, ReplayError> {
        let value = serde_json::json!({
            "type": record.type_tag,
            "data": record.payload,
        });
        serde_json::from_value(value).map_err(|source| ReplayError::MalformedFact {
            type_tag: record.type_tag.clone(),
            fact_id: record.fact_id,
            source,
        })
    }
}

/// Data for the VenueFounded fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueFoundedData {
    /// The venue's name.
    pub name: String,

    /// The purse the venue opens with.
    pub starting_balance: Coins,
}

/// Data for the DayAdvanced fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAdvancedData {
    /// The clock value the venue advanced to.
    pub clock: GameClock,
}

/// Data for the FundsDebited fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsDebitedData {
    /// Amount removed from the purse.
    pub amount: Coins,

    /// Why the coins left.
    pub reason: String,
}

/// Data for the FundsCredited fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsCreditedData {
    /// Amount added to the purse.
    pub amount: Coins,

    /// Why the coins arrived.
    pub reason: String,
}

/// Data for the RoomAdded fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAddedData {
    /// The new room's identifier.
    pub room_id: RoomId,

    /// Human-readable room name.
    pub name: String,
}

/// Data for the RoomRateSet fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRateSetData {
    /// The room whose rate changed.
    pub room_id: RoomId,

    /// The new nightly rate.
    pub nightly_rate: Coins,
}

/// Data for the EquipmentPurchased fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPurchasedData {
    /// The room the equipment was installed in.
    pub room_id: RoomId,

    /// The equipment's identifier.
    pub equipment_id: EquipmentId,

    /// Human-readable equipment name.
    pub name: String,

    /// The price actually paid, after any vendor discount.
    pub price: Coins,
}

/// Data for the StaffHired fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffHiredData {
    /// The staff member's identifier.
    pub staff_id: StaffId,

    /// The staff member's name.
    pub name: String,

    /// Wage owed per day.
    pub daily_wage: Coins,
}

/// Data for the StaffDismissed fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffDismissedData {
    /// The dismissed staff member.
    pub staff_id: StaffId,
}

/// Data for the VendorSigned fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSignedData {
    /// The vendor's identifier.
    pub vendor_id: VendorId,

    /// The vendor's name.
    pub name: String,

    /// Discount granted on purchases, in basis points.
    pub discount_bps: u16,
}

/// Data for the ReputationAdjusted fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationAdjustedData {
    /// Signed reputation change.
    pub delta: i32,

    /// Why the reputation moved.
    pub reason: String,
}

// Convenience constructors
impl Fact {
    /// Creates a VenueFounded fact.
    pub fn venue_founded(name: impl Into<String>, starting_balance: Coins) -> Self {
        Fact::VenueFounded(VenueFoundedData {
            name: name.into(),
            starting_balance,
        })
    }

    /// Creates a DayAdvanced fact.
    pub fn day_advanced(clock: GameClock) -> Self {
        Fact::DayAdvanced(DayAdvancedData { clock })
    }

    /// Creates a FundsDebited fact.
    pub fn funds_debited(amount: Coins, reason: impl Into<String>) -> Self {
        Fact::FundsDebited(FundsDebitedData {
            amount,
            reason: reason.into(),
        })
    }

    /// Creates a FundsCredited fact.
    pub fn funds_credited(amount: Coins, reason: impl Into<String>) -> Self {
        Fact::FundsCredited(FundsCreditedData {
            amount,
            reason: reason.into(),
        })
    }

    /// Creates a RoomAdded fact.
    pub fn room_added(room_id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Fact::RoomAdded(RoomAddedData {
            room_id: room_id.into(),
            name: name.into(),
        })
    }

    /// Creates a RoomRateSet fact.
    pub fn room_rate_set(room_id: impl Into<RoomId>, nightly_rate: Coins) -> Self {
        Fact::RoomRateSet(RoomRateSetData {
            room_id: room_id.into(),
            nightly_rate,
        })
    }

    /// Creates an EquipmentPurchased fact.
    pub fn equipment_purchased(
        room_id: impl Into<RoomId>,
        equipment_id: impl Into<EquipmentId>,
        name: impl Into<String>,
        price: Coins,
    ) -> Self {
        Fact::EquipmentPurchased(EquipmentPurchasedData {
            room_id: room_id.into(),
            equipment_id: equipment_id.into(),
            name: name.into(),
            price,
        })
    }

    /// Creates a StaffHired fact.
    pub fn staff_hired(
        staff_id: impl Into<StaffId>,
        name: impl Into<String>,
        daily_wage: Coins,
    ) -> Self {
        Fact::StaffHired(StaffHiredData {
            staff_id: staff_id.into(),
            name: name.into(),
            daily_wage,
        })
    }

    /// Creates a StaffDismissed fact.
    pub fn staff_dismissed(staff_id: impl Into<StaffId>) -> Self {
        Fact::StaffDismissed(StaffDismissedData {
            staff_id: staff_id.into(),
        })
    }

    /// Creates a VendorSigned fact.
    pub fn vendor_signed(
        vendor_id: impl Into<VendorId>,
        name: impl Into<String>,
        discount_bps: u16,
    ) -> Self {
        Fact::VendorSigned(VendorSignedData {
            vendor_id: vendor_id.into(),
            name: name.into(),
            discount_bps,
        })
    }

    /// Creates a ReputationAdjusted fact.
    pub fn reputation_adjusted(delta: i32, reason: impl Into<String>) -> Self {
        Fact::ReputationAdjusted(ReputationAdjustedData {
            delta,
            reason: reason.into(),
        })
    }
}
