//! Domain layer for the innkeep event-sourcing core.
//!
//! This crate defines:
//! - the closed fact taxonomy (`Fact`) and its reducers
//! - the typed command taxonomy (`Command`) and its validation handlers
//! - the venue aggregate state tree (`VenueState`)
//! - the state builder that replays facts over a template state
//! - narrator roles and their fact allow-lists

pub mod builder;
pub mod commands;
pub mod error;
pub mod facts;
pub mod handlers;
pub mod reducers;
pub mod roles;
pub mod state;
pub mod values;

pub use builder::StateBuilder;
pub use commands::{
    AddRoom, AdvanceDay, Command, CreditFunds, DebitFunds, DismissStaff, FoundVenue, HireStaff,
    PurchaseEquipment, RecordNarration, SetRoomRate, SignVendor,
};
pub use error::{CommandRejection, RegistryError, ReplayError};
pub use facts::Fact;
pub use handlers::HandlerRegistry;
pub use reducers::ReducerRegistry;
pub use roles::NarratorRole;
pub use state::{Equipment, Room, StaffMember, VendorRelation, VenueState};
pub use values::{Coins, EquipmentId, RoomId, StaffId, VendorId};
