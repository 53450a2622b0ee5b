//! Reducers: pure fold steps from fact to state, and their registry.

use std::collections::HashMap;

use fact_log::FactRecord;

use crate::error::{RegistryError, ReplayError};
use crate::facts::Fact;
use crate::state::{Equipment, REPUTATION_MAX, REPUTATION_MIN, Room, StaffMember, VendorRelation, VenueState};

/// A pure fold step: consumes the current state, folds one fact in, and
/// returns the next state.
///
/// Given the same state and fact, a reducer must always produce the same
/// new state, with no side effects. Reducers never reject facts on
/// business grounds - validation happened before the fact was appended.
pub type Reducer = fn(VenueState, &Fact) -> Result<VenueState, ReplayError>;

/// Maps each fact type tag to exactly one reducer.
///
/// The registry is populated once at startup by explicit construction and
/// treated as immutable afterwards. Applying a fact whose tag has no
/// reducer is a fatal [`ReplayError::UnregisteredFactType`], never a
/// silent no-op: skipping a fact would make every later read depend
/// invisibly on registry completeness.
pub struct ReducerRegistry {
    reducers: HashMap<&'static str, Reducer>,
}

impl ReducerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            reducers: HashMap::new(),
        }
    }

    /// Registers a reducer for a fact type tag.
    ///
    /// Re-registering an already-bound tag is rejected so wiring mistakes
    /// surface at startup instead of silently shadowing a reducer.
    pub fn register(&mut self, type_tag: &'static str, reducer: Reducer) -> Result<(), RegistryError> {
        if self.reducers.contains_key(type_tag) {
            return Err(RegistryError::DuplicateReducer { type_tag });
        }
        self.reducers.insert(type_tag, reducer);
        Ok(())
    }

    /// Returns true if a reducer is registered for the tag.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.reducers.contains_key(type_tag)
    }

    /// Number of registered reducers.
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducers are registered.
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    /// Folds one persisted record into the state.
    ///
    /// Looks up the reducer by the record's type tag, reconstructs the
    /// typed fact from the payload, and invokes the reducer.
    pub fn apply(&self, state: VenueState, record: &FactRecord) -> Result<VenueState, ReplayError> {
        let reducer = self.reducers.get(record.type_tag.as_str()).ok_or_else(|| {
            ReplayError::UnregisteredFactType {
                type_tag: record.type_tag.clone(),
            }
        })?;

        let fact = Fact::from_record(record)?;
        reducer(state, &fact)
    }

    /// Builds the standard registry covering the whole fact taxonomy.
    ///
    /// # Panics
    ///
    /// Panics if a tag is wired twice - a programming error that should
    /// abort startup.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let wiring: [(&'static str, Reducer); 11] = [
            ("VenueFounded", apply_venue_founded),
            ("DayAdvanced", apply_day_advanced),
            ("FundsDebited", apply_funds_debited),
            ("FundsCredited", apply_funds_credited),
            ("RoomAdded", apply_room_added),
            ("RoomRateSet", apply_room_rate_set),
            ("EquipmentPurchased", apply_equipment_purchased),
            ("StaffHired", apply_staff_hired),
            ("StaffDismissed", apply_staff_dismissed),
            ("VendorSigned", apply_vendor_signed),
            ("ReputationAdjusted", apply_reputation_adjusted),
        ];
        for (tag, reducer) in wiring {
            registry
                .register(tag, reducer)
                .expect("fact type wired twice in standard registry");
        }
        registry
    }
}

impl Default for ReducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(expected: &'static str, fact: &Fact) -> ReplayError {
    ReplayError::MismatchedReducer {
        expected,
        actual: fact.type_tag(),
    }
}

fn apply_venue_founded(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::VenueFounded(data) = fact else {
        return Err(mismatch("VenueFounded", fact));
    };
    state.name = Some(data.name.clone());
    state.balance = data.starting_balance;
    Ok(state)
}

fn apply_day_advanced(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::DayAdvanced(data) = fact else {
        return Err(mismatch("DayAdvanced", fact));
    };
    state.clock = data.clock;
    Ok(state)
}

fn apply_funds_debited(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::FundsDebited(data) = fact else {
        return Err(mismatch("FundsDebited", fact));
    };
    state.balance -= data.amount;
    Ok(state)
}

fn apply_funds_credited(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::FundsCredited(data) = fact else {
        return Err(mismatch("FundsCredited", fact));
    };
    state.balance += data.amount;
    Ok(state)
}

fn apply_room_added(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::RoomAdded(data) = fact else {
        return Err(mismatch("RoomAdded", fact));
    };
    state.rooms.insert(
        data.room_id.clone(),
        Room::new(data.room_id.clone(), data.name.clone()),
    );
    Ok(state)
}

fn apply_room_rate_set(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::RoomRateSet(data) = fact else {
        return Err(mismatch("RoomRateSet", fact));
    };
    if let Some(room) = state.rooms.get_mut(&data.room_id) {
        room.nightly_rate = Some(data.nightly_rate);
    }
    Ok(state)
}

fn apply_equipment_purchased(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::EquipmentPurchased(data) = fact else {
        return Err(mismatch("EquipmentPurchased", fact));
    };
    if let Some(room) = state.rooms.get_mut(&data.room_id) {
        room.equipment.insert(
            data.equipment_id.clone(),
            Equipment {
                equipment_id: data.equipment_id.clone(),
                name: data.name.clone(),
                purchase_price: data.price,
            },
        );
    }
    Ok(state)
}

fn apply_staff_hired(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::StaffHired(data) = fact else {
        return Err(mismatch("StaffHired", fact));
    };
    state.staff.insert(
        data.staff_id.clone(),
        StaffMember {
            staff_id: data.staff_id.clone(),
            name: data.name.clone(),
            daily_wage: data.daily_wage,
        },
    );
    Ok(state)
}

fn apply_staff_dismissed(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::StaffDismissed(data) = fact else {
        return Err(mismatch("StaffDismissed", fact));
    };
    state.staff.remove(&data.staff_id);
    Ok(state)
}

fn apply_vendor_signed(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::VendorSigned(data) = fact else {
        return Err(mismatch("VendorSigned", fact));
    };
    state.vendors.insert(
        data.vendor_id.clone(),
        VendorRelation {
            vendor_id: data.vendor_id.clone(),
            name: data.name.clone(),
            discount_bps: data.discount_bps,
        },
    );
    Ok(state)
}

fn apply_reputation_adjusted(mut state: VenueState, fact: &Fact) -> Result<VenueState, ReplayError> {
    let Fact::ReputationAdjusted(data) = fact else {
        return Err(mismatch("ReputationAdjusted", fact));
    };
    state.reputation = (state.reputation + data.delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Coins, RoomId, StaffId};
    use common::{EntityId, GameClock};
    use fact_log::Sequence;

    fn record_for(fact: &Fact) -> FactRecord {
        FactRecord::builder()
            .entity_id(EntityId::new())
            .sequence(Sequence::first())
            .clock(GameClock::genesis())
            .type_tag(fact.type_tag())
            .payload_raw(fact.to_payload().unwrap())
            .build()
    }

    #[test]
    fn standard_registry_covers_the_whole_taxonomy() {
        let registry = ReducerRegistry::standard();
        assert_eq!(registry.len(), Fact::TYPE_TAGS.len());
        for tag in Fact::TYPE_TAGS {
            assert!(registry.contains(tag), "no reducer for {tag}");
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ReducerRegistry::standard();
        let result = registry.register("FundsDebited", apply_funds_debited);
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateReducer {
                type_tag: "FundsDebited"
            })
        ));
    }

    #[test]
    fn unregistered_tag_fails_loudly() {
        let registry = ReducerRegistry::new();
        let fact = Fact::funds_debited(Coins::from_copper(100), "test");
        let result = registry.apply(VenueState::template(), &record_for(&fact));
        assert!(matches!(
            result,
            Err(ReplayError::UnregisteredFactType { .. })
        ));
    }

    #[test]
    fn founded_then_debit_updates_balance() {
        let registry = ReducerRegistry::standard();
        let state = VenueState::template();

        let founded = Fact::venue_founded("The Gilded Tankard", Coins::from_gold(100));
        let state = registry.apply(state, &record_for(&founded)).unwrap();
        assert!(state.is_founded());
        assert_eq!(state.balance, Coins::from_gold(100));

        let debit = Fact::funds_debited(Coins::from_copper(500), "wages");
        let state = registry.apply(state, &record_for(&debit)).unwrap();
        assert_eq!(state.balance, Coins::from_copper(9500));
    }

    #[test]
    fn day_advanced_moves_the_clock() {
        let registry = ReducerRegistry::standard();
        let fact = Fact::day_advanced(GameClock::new(2, 3));
        let state = registry
            .apply(VenueState::template(), &record_for(&fact))
            .unwrap();
        assert_eq!(state.clock, GameClock::new(2, 3));
    }

    #[test]
    fn equipment_lands_in_its_room() {
        let registry = ReducerRegistry::standard();
        let mut state = VenueState::template();
        state = registry
            .apply(state, &record_for(&Fact::room_added("taproom", "Taproom")))
            .unwrap();
        state = registry
            .apply(
                state,
                &record_for(&Fact::equipment_purchased(
                    "taproom",
                    "hearth-1",
                    "Stone Hearth",
                    Coins::from_gold(5),
                )),
            )
            .unwrap();

        let room = state.room(&RoomId::new("taproom")).unwrap();
        assert_eq!(room.equipment.len(), 1);
        assert_eq!(state.equipment_count(), 1);
    }

    #[test]
    fn staff_hired_then_dismissed_leaves_no_trace_in_state() {
        let registry = ReducerRegistry::standard();
        let mut state = VenueState::template();
        state = registry
            .apply(
                state,
                &record_for(&Fact::staff_hired("mira", "Mira", Coins::from_copper(80))),
            )
            .unwrap();
        assert!(state.staff_member(&StaffId::new("mira")).is_some());

        state = registry
            .apply(state, &record_for(&Fact::staff_dismissed("mira")))
            .unwrap();
        assert!(state.staff_member(&StaffId::new("mira")).is_none());
    }

    #[test]
    fn reputation_is_clamped() {
        let registry = ReducerRegistry::standard();
        let mut state = VenueState::template();
        state.reputation = 95;

        let state = registry
            .apply(
                state,
                &record_for(&Fact::reputation_adjusted(20, "legendary feast")),
            )
            .unwrap();
        assert_eq!(state.reputation, REPUTATION_MAX);
    }

    #[test]
    fn reducers_reject_mismatched_facts() {
        let fact = Fact::funds_credited(Coins::from_copper(1), "x");
        let result = apply_funds_debited(VenueState::template(), &fact);
        assert!(matches!(
            result,
            Err(ReplayError::MismatchedReducer { .. })
        ));
    }
}
