//! Narrator roles and their fact allow-lists.
//!
//! Narrative collaborators (the world narrator and the rules arbiter) may
//! only record facts whose type tag appears on their role's allow-list.
//! The check is part of command validation, so an out-of-list submission
//! is an ordinary rejection with zero side effects.

use serde::{Deserialize, Serialize};

/// The role a narrative collaborator acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarratorRole {
    /// Describes the world: may color the venue's reputation.
    World,

    /// Arbitrates consequences: may move reputation and coins.
    Rules,
}

impl NarratorRole {
    /// The fact type tags this role is allowed to record.
    pub fn allowed_fact_tags(&self) -> &'static [&'static str] {
        match self {
            NarratorRole::World => &["ReputationAdjusted"],
            NarratorRole::Rules => &["ReputationAdjusted", "FundsCredited", "FundsDebited"],
        }
    }

    /// Returns true if this role may record a fact with the given tag.
    pub fn allows(&self, type_tag: &str) -> bool {
        self.allowed_fact_tags().contains(&type_tag)
    }
}

impl std::fmt::Display for NarratorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarratorRole::World => write!(f, "world"),
            NarratorRole::Rules => write!(f, "rules"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_may_only_adjust_reputation() {
        assert!(NarratorRole::World.allows("ReputationAdjusted"));
        assert!(!NarratorRole::World.allows("FundsDebited"));
        assert!(!NarratorRole::World.allows("EquipmentPurchased"));
    }

    #[test]
    fn rules_may_move_coins() {
        assert!(NarratorRole::Rules.allows("FundsCredited"));
        assert!(NarratorRole::Rules.allows("FundsDebited"));
        assert!(!NarratorRole::Rules.allows("StaffHired"));
    }

    #[test]
    fn allow_lists_only_name_known_tags() {
        use crate::facts::Fact;
        for role in [NarratorRole::World, NarratorRole::Rules] {
            for tag in role.allowed_fact_tags() {
                assert!(Fact::TYPE_TAGS.contains(tag), "unknown tag {tag}");
            }
        }
    }
}
