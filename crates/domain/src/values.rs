//! Value objects for the venue domain.

use serde::{Deserialize, Serialize};

/// Basis points in a whole (100%).
pub const FULL_RATE_BPS: u16 = 10_000;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier for a room (sub-location) within a venue.
    RoomId
}

string_id! {
    /// Identifier for an equipment unit within a room.
    EquipmentId
}

string_id! {
    /// Identifier for a staff member.
    StaffId
}

string_id! {
    /// Identifier for a vendor relationship.
    VendorId
}

/// A coin amount, held in copper pieces to avoid floating point issues.
///
/// 100 copper = 1 gold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coins {
    /// Amount in copper pieces (e.g. 250 = 2 gold 50 copper).
    copper: i64,
}

impl Coins {
    /// Creates a new amount from copper pieces.
    pub fn from_copper(copper: i64) -> Self {
        Self { copper }
    }

    /// Creates a new amount from whole gold pieces.
    pub fn from_gold(gold: i64) -> Self {
        Self { copper: gold * 100 }
    }

    /// Returns zero coins.
    pub fn zero() -> Self {
        Self { copper: 0 }
    }

    /// Returns the amount in copper pieces.
    pub fn copper(&self) -> i64 {
        self.copper
    }

    /// Returns the whole-gold portion.
    pub fn gold(&self) -> i64 {
        self.copper / 100
    }

    /// Returns the copper remainder after whole gold.
    pub fn copper_part(&self) -> i64 {
        self.copper.abs() % 100
    }

    /// Returns true if the amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.copper > 0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.copper == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.copper < 0
    }

    /// Multiplies by a count.
    pub fn multiply(&self, count: u32) -> Coins {
        Coins {
            copper: self.copper * count as i64,
        }
    }

    /// Applies a discount given in basis points, rounding down.
    ///
    /// `discounted(0)` is the full amount; `discounted(10_000)` is zero.
    pub fn discounted(&self, discount_bps: u16) -> Coins {
        let retained = (FULL_RATE_BPS.saturating_sub(discount_bps)) as i64;
        Coins {
            copper: self.copper * retained / FULL_RATE_BPS as i64,
        }
    }
}

impl Default for Coins {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Coins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.copper < 0 {
            write!(f, "-{}g{:02}c", self.gold().abs(), self.copper_part())
        } else {
            write!(f, "{}g{:02}c", self.gold(), self.copper_part())
        }
    }
}

impl std::ops::Add for Coins {
    type Output = Coins;

    fn add(self, rhs: Self) -> Self::Output {
        Coins {
            copper: self.copper + rhs.copper,
        }
    }
}

impl std::ops::Sub for Coins {
    type Output = Coins;

    fn sub(self, rhs: Self) -> Self::Output {
        Coins {
            copper: self.copper - rhs.copper,
        }
    }
}

impl std::ops::AddAssign for Coins {
    fn add_assign(&mut self, rhs: Self) {
        self.copper += rhs.copper;
    }
}

impl std::ops::SubAssign for Coins {
    fn sub_assign(&mut self, rhs: Self) {
        self.copper -= rhs.copper;
    }
}

impl std::iter::Sum for Coins {
    fn sum<I: Iterator<Item = Coins>>(iter: I) -> Self {
        iter.fold(Coins::zero(), |acc, c| acc + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_string_conversion() {
        let id = RoomId::new("taproom");
        assert_eq!(id.as_str(), "taproom");

        let id2: RoomId = "cellar".into();
        assert_eq!(id2.as_str(), "cellar");
    }

    #[test]
    fn coins_from_copper() {
        let coins = Coins::from_copper(1234);
        assert_eq!(coins.copper(), 1234);
        assert_eq!(coins.gold(), 12);
        assert_eq!(coins.copper_part(), 34);
    }

    #[test]
    fn coins_from_gold() {
        let coins = Coins::from_gold(50);
        assert_eq!(coins.copper(), 5000);
        assert_eq!(coins.gold(), 50);
        assert_eq!(coins.copper_part(), 0);
    }

    #[test]
    fn coins_display() {
        assert_eq!(Coins::from_copper(1234).to_string(), "12g34c");
        assert_eq!(Coins::from_copper(5).to_string(), "0g05c");
        assert_eq!(Coins::from_copper(-1234).to_string(), "-12g34c");
    }

    #[test]
    fn coins_arithmetic() {
        let a = Coins::from_copper(1000);
        let b = Coins::from_copper(500);

        assert_eq!((a + b).copper(), 1500);
        assert_eq!((a - b).copper(), 500);
        assert_eq!(a.multiply(3).copper(), 3000);
    }

    #[test]
    fn coins_comparison() {
        assert!(Coins::from_copper(100).is_positive());
        assert!(Coins::from_copper(0).is_zero());
        assert!(Coins::from_copper(-100).is_negative());
    }

    #[test]
    fn coins_discount_rounds_down() {
        let price = Coins::from_copper(999);
        assert_eq!(price.discounted(0).copper(), 999);
        assert_eq!(price.discounted(1000).copper(), 899);
        assert_eq!(price.discounted(10_000).copper(), 0);
    }

    #[test]
    fn coins_sum() {
        let total: Coins = [Coins::from_copper(100), Coins::from_copper(250)]
            .into_iter()
            .sum();
        assert_eq!(total.copper(), 350);
    }

    #[test]
    fn coins_assign_ops() {
        let mut coins = Coins::from_copper(100);
        coins += Coins::from_copper(50);
        assert_eq!(coins.copper(), 150);
        coins -= Coins::from_copper(30);
        assert_eq!(coins.copper(), 120);
    }
}
