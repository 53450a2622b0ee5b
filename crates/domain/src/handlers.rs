//! Command handlers: validation functions that turn intents into facts,
//! and their registry.

use std::collections::HashMap;

use crate::commands::Command;
use crate::error::{CommandRejection, RegistryError};
use crate::facts::Fact;
use crate::state::VenueState;
use crate::values::{Coins, FULL_RATE_BPS};

/// The widest reputation swing a narrator may record in one fact.
pub const MAX_NARRATED_REPUTATION_DELTA: i32 = 25;

/// A command handler: reads the state, validates every precondition, and
/// returns the full consequence of the command as an ordered fact batch.
///
/// Handlers never mutate state and never construct a fact before all
/// validation has passed, so a rejection can never leave a half-built
/// batch behind.
pub type Handler = fn(&VenueState, &Command) -> Result<Vec<Fact>, CommandRejection>;

/// Extracts the payload a handler was wired for.
///
/// Dispatch routes by `command_type`, so a mismatch here is a wiring bug,
/// not a runtime condition.
macro_rules! expect_payload {
    ($cmd:expr, $variant:ident) => {
        match $cmd {
            Command::$variant(payload) => payload,
            other => unreachable!(
                "handler for {} dispatched with {}",
                stringify!($variant),
                other.command_type()
            ),
        }
    };
}

/// Maps each command type to exactly one handler.
///
/// Built once at startup by explicit construction and immutable
/// afterwards. An unknown command type is reported by the caller as a
/// distinct outcome, not a business rejection.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler for a command type.
    ///
    /// Re-registering an already-bound type is rejected.
    pub fn register(
        &mut self,
        command_type: &'static str,
        handler: Handler,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(command_type) {
            return Err(RegistryError::DuplicateHandler { command_type });
        }
        self.handlers.insert(command_type, handler);
        Ok(())
    }

    /// Looks up the handler for a command type.
    pub fn get(&self, command_type: &str) -> Option<Handler> {
        self.handlers.get(command_type).copied()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Builds the standard registry covering the whole command taxonomy.
    ///
    /// # Panics
    ///
    /// Panics if a command type is wired twice - a programming error that
    /// should abort startup.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let wiring: [(&'static str, Handler); 11] = [
            ("FoundVenue", handle_found_venue),
            ("AdvanceDay", handle_advance_day),
            ("AddRoom", handle_add_room),
            ("SetRoomRate", handle_set_room_rate),
            ("PurchaseEquipment", handle_purchase_equipment),
            ("HireStaff", handle_hire_staff),
            ("DismissStaff", handle_dismiss_staff),
            ("SignVendor", handle_sign_vendor),
            ("CreditFunds", handle_credit_funds),
            ("DebitFunds", handle_debit_funds),
            ("RecordNarration", handle_record_narration),
        ];
        for (command_type, handler) in wiring {
            registry
                .register(command_type, handler)
                .expect("command type wired twice in standard registry");
        }
        registry
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_founded(state: &VenueState) -> Result<(), CommandRejection> {
    if state.is_founded() {
        Ok(())
    } else {
        Err(CommandRejection::VenueNotFounded)
    }
}

fn require_non_negative(amount: Coins) -> Result<(), CommandRejection> {
    if amount.is_negative() {
        Err(CommandRejection::NegativeAmount { amount })
    } else {
        Ok(())
    }
}

fn require_covered(state: &VenueState, required: Coins) -> Result<(), CommandRejection> {
    if state.balance < required {
        Err(CommandRejection::InsufficientFunds {
            required,
            available: state.balance,
        })
    } else {
        Ok(())
    }
}

fn handle_found_venue(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, FoundVenue);

    if state.is_founded() {
        return Err(CommandRejection::VenueAlreadyFounded);
    }
    require_non_negative(payload.starting_balance)?;

    Ok(vec![Fact::venue_founded(
        payload.name.clone(),
        payload.starting_balance,
    )])
}

fn handle_advance_day(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let _ = expect_payload!(cmd, AdvanceDay);
    require_founded(state)?;

    let next = state.clock.next_day();
    let wages = state.daily_wage_bill();
    if wages.is_positive() {
        require_covered(state, wages)?;
    }

    // The clock-advance fact always leads the batch for the new day.
    let mut facts = vec![Fact::day_advanced(next)];
    if wages.is_positive() {
        facts.push(Fact::funds_debited(wages, format!("daily wages, {next}")));
    }

    Ok(facts)
}

fn handle_add_room(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, AddRoom);
    require_founded(state)?;

    if state.rooms.contains_key(&payload.room_id) {
        return Err(CommandRejection::DuplicateRoom {
            room_id: payload.room_id.clone(),
        });
    }

    Ok(vec![Fact::room_added(
        payload.room_id.clone(),
        payload.name.clone(),
    )])
}

fn handle_set_room_rate(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, SetRoomRate);
    require_founded(state)?;
    require_non_negative(payload.nightly_rate)?;

    if !state.rooms.contains_key(&payload.room_id) {
        return Err(CommandRejection::RoomNotFound {
            room_id: payload.room_id.clone(),
        });
    }

    Ok(vec![Fact::room_rate_set(
        payload.room_id.clone(),
        payload.nightly_rate,
    )])
}

fn handle_purchase_equipment(
    state: &VenueState,
    cmd: &Command,
) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, PurchaseEquipment);
    require_founded(state)?;
    require_non_negative(payload.list_price)?;

    let room = state
        .rooms
        .get(&payload.room_id)
        .ok_or_else(|| CommandRejection::RoomNotFound {
            room_id: payload.room_id.clone(),
        })?;

    if room.equipment.contains_key(&payload.equipment_id) {
        return Err(CommandRejection::EquipmentAlreadyInstalled {
            room_id: payload.room_id.clone(),
            equipment_id: payload.equipment_id.clone(),
        });
    }

    // The effective price is derived deterministically from state: the
    // best signed vendor discount applies.
    let price = payload
        .list_price
        .discounted(state.best_vendor_discount_bps());
    require_covered(state, price)?;

    Ok(vec![
        Fact::equipment_purchased(
            payload.room_id.clone(),
            payload.equipment_id.clone(),
            payload.name.clone(),
            price,
        ),
        Fact::funds_debited(price, format!("purchase of {}", payload.name)),
    ])
}

fn handle_hire_staff(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, HireStaff);
    require_founded(state)?;
    require_non_negative(payload.daily_wage)?;

    if state.staff.contains_key(&payload.staff_id) {
        return Err(CommandRejection::DuplicateStaff {
            staff_id: payload.staff_id.clone(),
        });
    }

    Ok(vec![Fact::staff_hired(
        payload.staff_id.clone(),
        payload.name.clone(),
        payload.daily_wage,
    )])
}

fn handle_dismiss_staff(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, DismissStaff);
    require_founded(state)?;

    if !state.staff.contains_key(&payload.staff_id) {
        return Err(CommandRejection::StaffNotFound {
            staff_id: payload.staff_id.clone(),
        });
    }

    Ok(vec![Fact::staff_dismissed(payload.staff_id.clone())])
}

fn handle_sign_vendor(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, SignVendor);
    require_founded(state)?;

    if payload.discount_bps > FULL_RATE_BPS {
        return Err(CommandRejection::InvalidDiscount {
            bps: payload.discount_bps,
        });
    }
    if state.vendors.contains_key(&payload.vendor_id) {
        return Err(CommandRejection::DuplicateVendor {
            vendor_id: payload.vendor_id.clone(),
        });
    }

    Ok(vec![Fact::vendor_signed(
        payload.vendor_id.clone(),
        payload.name.clone(),
        payload.discount_bps,
    )])
}

fn handle_credit_funds(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, CreditFunds);
    require_founded(state)?;
    require_non_negative(payload.amount)?;

    Ok(vec![Fact::funds_credited(
        payload.amount,
        payload.reason.clone(),
    )])
}

fn handle_debit_funds(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, DebitFunds);
    require_founded(state)?;
    require_non_negative(payload.amount)?;
    require_covered(state, payload.amount)?;

    Ok(vec![Fact::funds_debited(
        payload.amount,
        payload.reason.clone(),
    )])
}

fn handle_record_narration(
    state: &VenueState,
    cmd: &Command,
) -> Result<Vec<Fact>, CommandRejection> {
    let payload = expect_payload!(cmd, RecordNarration);
    require_founded(state)?;

    let tag = payload.fact.type_tag();
    if !payload.role.allows(tag) {
        return Err(CommandRejection::FactNotAllowed {
            role: payload.role,
            type_tag: tag.to_string(),
        });
    }

    // Narrated facts pass the same monetary validation as player commands.
    match &payload.fact {
        Fact::ReputationAdjusted(data) => {
            if data.delta.abs() > MAX_NARRATED_REPUTATION_DELTA {
                return Err(CommandRejection::InvalidReputationDelta { delta: data.delta });
            }
        }
        Fact::FundsCredited(data) => {
            require_non_negative(data.amount)?;
        }
        Fact::FundsDebited(data) => {
            require_non_negative(data.amount)?;
            require_covered(state, data.amount)?;
        }
        other => {
            return Err(CommandRejection::FactNotAllowed {
                role: payload.role,
                type_tag: other.type_tag().to_string(),
            });
        }
    }

    Ok(vec![payload.fact.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::NarratorRole;
    use crate::values::{RoomId, StaffId, VendorId};
    use common::GameClock;

    fn founded_state() -> VenueState {
        let mut state = VenueState::template();
        state.name = Some("The Gilded Tankard".to_string());
        state.balance = Coins::from_copper(10_000);
        state
    }

    fn dispatch(state: &VenueState, cmd: &Command) -> Result<Vec<Fact>, CommandRejection> {
        let registry = HandlerRegistry::standard();
        let handler = registry.get(cmd.command_type()).expect("handler wired");
        handler(state, cmd)
    }

    #[test]
    fn standard_registry_covers_the_whole_taxonomy() {
        let registry = HandlerRegistry::standard();
        assert_eq!(registry.len(), Command::COMMAND_TYPES.len());
        for command_type in Command::COMMAND_TYPES {
            assert!(
                registry.get(command_type).is_some(),
                "no handler for {command_type}"
            );
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::standard();
        let result = registry.register("DebitFunds", handle_debit_funds);
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateHandler {
                command_type: "DebitFunds"
            })
        ));
    }

    #[test]
    fn found_venue_emits_genesis_fact() {
        let cmd = Command::found_venue("The Gilded Tankard", Coins::from_gold(100));
        let facts = dispatch(&VenueState::template(), &cmd).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].type_tag(), "VenueFounded");
    }

    #[test]
    fn found_venue_twice_is_rejected() {
        let cmd = Command::found_venue("Again", Coins::zero());
        let result = dispatch(&founded_state(), &cmd);
        assert_eq!(result, Err(CommandRejection::VenueAlreadyFounded));
    }

    #[test]
    fn commands_before_founding_are_rejected() {
        let cmd = Command::add_room("taproom", "Taproom");
        let result = dispatch(&VenueState::template(), &cmd);
        assert_eq!(result, Err(CommandRejection::VenueNotFounded));
    }

    #[test]
    fn overdraft_debit_is_rejected() {
        let state = founded_state();
        let cmd = Command::debit_funds(Coins::from_copper(12_000), "big spend");
        let result = dispatch(&state, &cmd);
        assert_eq!(
            result,
            Err(CommandRejection::InsufficientFunds {
                required: Coins::from_copper(12_000),
                available: Coins::from_copper(10_000),
            })
        );
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut state = founded_state();
        state.rooms.insert(
            RoomId::new("taproom"),
            crate::state::Room::new(RoomId::new("taproom"), "Taproom"),
        );

        let cmd = Command::set_room_rate("taproom", Coins::from_copper(-1));
        let result = dispatch(&state, &cmd);
        assert_eq!(
            result,
            Err(CommandRejection::NegativeAmount {
                amount: Coins::from_copper(-1)
            })
        );
    }

    #[test]
    fn purchase_emits_paired_facts_in_order() {
        let mut state = founded_state();
        state.balance = Coins::from_copper(1000);
        state.rooms.insert(
            RoomId::new("taproom"),
            crate::state::Room::new(RoomId::new("taproom"), "Taproom"),
        );

        let cmd =
            Command::purchase_equipment("taproom", "hearth-1", "Stone Hearth", Coins::from_copper(500));
        let facts = dispatch(&state, &cmd).unwrap();

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].type_tag(), "EquipmentPurchased");
        assert_eq!(facts[1].type_tag(), "FundsDebited");
        let Fact::FundsDebited(debit) = &facts[1] else {
            panic!("expected FundsDebited");
        };
        assert_eq!(debit.amount, Coins::from_copper(500));
    }

    #[test]
    fn purchase_applies_best_vendor_discount() {
        let mut state = founded_state();
        state.rooms.insert(
            RoomId::new("taproom"),
            crate::state::Room::new(RoomId::new("taproom"), "Taproom"),
        );
        state.vendors.insert(
            VendorId::new("brewery"),
            crate::state::VendorRelation {
                vendor_id: VendorId::new("brewery"),
                name: "Old Toby's Brewery".to_string(),
                discount_bps: 1000,
            },
        );

        let cmd =
            Command::purchase_equipment("taproom", "cask-1", "Oak Cask", Coins::from_copper(1000));
        let facts = dispatch(&state, &cmd).unwrap();

        let Fact::EquipmentPurchased(purchase) = &facts[0] else {
            panic!("expected EquipmentPurchased");
        };
        assert_eq!(purchase.price, Coins::from_copper(900));
    }

    #[test]
    fn purchase_beyond_purse_is_rejected_with_no_facts() {
        let mut state = founded_state();
        state.balance = Coins::from_copper(100);
        state.rooms.insert(
            RoomId::new("taproom"),
            crate::state::Room::new(RoomId::new("taproom"), "Taproom"),
        );

        let cmd =
            Command::purchase_equipment("taproom", "hearth-1", "Stone Hearth", Coins::from_copper(500));
        let result = dispatch(&state, &cmd);
        assert!(matches!(
            result,
            Err(CommandRejection::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn purchase_into_missing_room_is_rejected() {
        let state = founded_state();
        let cmd =
            Command::purchase_equipment("cellar", "rack-1", "Wine Rack", Coins::from_copper(100));
        let result = dispatch(&state, &cmd);
        assert!(matches!(result, Err(CommandRejection::RoomNotFound { .. })));
    }

    #[test]
    fn advance_day_leads_with_the_clock_fact() {
        let mut state = founded_state();
        state.staff.insert(
            StaffId::new("mira"),
            crate::state::StaffMember {
                staff_id: StaffId::new("mira"),
                name: "Mira".to_string(),
                daily_wage: Coins::from_copper(80),
            },
        );

        let facts = dispatch(&state, &Command::advance_day()).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].type_tag(), "DayAdvanced");
        assert_eq!(facts[1].type_tag(), "FundsDebited");

        let Fact::DayAdvanced(advanced) = &facts[0] else {
            panic!("expected DayAdvanced");
        };
        assert_eq!(advanced.clock, GameClock::new(1, 2));
    }

    #[test]
    fn advance_day_without_staff_emits_only_the_clock_fact() {
        let facts = dispatch(&founded_state(), &Command::advance_day()).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].type_tag(), "DayAdvanced");
    }

    #[test]
    fn advance_day_with_uncovered_wages_is_rejected() {
        let mut state = founded_state();
        state.balance = Coins::from_copper(10);
        state.staff.insert(
            StaffId::new("mira"),
            crate::state::StaffMember {
                staff_id: StaffId::new("mira"),
                name: "Mira".to_string(),
                daily_wage: Coins::from_copper(80),
            },
        );

        let result = dispatch(&state, &Command::advance_day());
        assert!(matches!(
            result,
            Err(CommandRejection::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn duplicate_hire_is_rejected() {
        let mut state = founded_state();
        state.staff.insert(
            StaffId::new("mira"),
            crate::state::StaffMember {
                staff_id: StaffId::new("mira"),
                name: "Mira".to_string(),
                daily_wage: Coins::from_copper(80),
            },
        );

        let cmd = Command::hire_staff("mira", "Mira", Coins::from_copper(90));
        let result = dispatch(&state, &cmd);
        assert!(matches!(result, Err(CommandRejection::DuplicateStaff { .. })));
    }

    #[test]
    fn vendor_discount_above_full_rate_is_rejected() {
        let cmd = Command::sign_vendor("brewery", "Old Toby's Brewery", 10_001);
        let result = dispatch(&founded_state(), &cmd);
        assert_eq!(result, Err(CommandRejection::InvalidDiscount { bps: 10_001 }));
    }

    #[test]
    fn narration_outside_allow_list_is_rejected() {
        let cmd = Command::record_narration(
            NarratorRole::World,
            Fact::funds_credited(Coins::from_copper(100), "windfall"),
        );
        let result = dispatch(&founded_state(), &cmd);
        assert!(matches!(
            result,
            Err(CommandRejection::FactNotAllowed { .. })
        ));
    }

    #[test]
    fn rules_narrator_may_move_coins_within_balance() {
        let cmd = Command::record_narration(
            NarratorRole::Rules,
            Fact::funds_debited(Coins::from_copper(300), "fine for a brawl"),
        );
        let facts = dispatch(&founded_state(), &cmd).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].type_tag(), "FundsDebited");
    }

    #[test]
    fn narrated_overdraft_is_rejected() {
        let cmd = Command::record_narration(
            NarratorRole::Rules,
            Fact::funds_debited(Coins::from_copper(999_999), "impossible fine"),
        );
        let result = dispatch(&founded_state(), &cmd);
        assert!(matches!(
            result,
            Err(CommandRejection::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn oversized_reputation_swing_is_rejected() {
        let cmd = Command::record_narration(
            NarratorRole::World,
            Fact::reputation_adjusted(80, "implausible fame"),
        );
        let result = dispatch(&founded_state(), &cmd);
        assert_eq!(
            result,
            Err(CommandRejection::InvalidReputationDelta { delta: 80 })
        );
    }
}
