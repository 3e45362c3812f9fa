//! PlanetSide 2 entity schemas.
//!
//! Each type maps one census collection onto a [`CensusEntity`] with the
//! collection's default cache sizing. Relations are exposed as methods that
//! take the owning [`Client`](crate::client::Client) and hand back a fresh
//! [`DeferredReference`](crate::reference::DeferredReference); entities only
//! ever store the related ids.
//!
//! [`CensusEntity`]: crate::entity::CensusEntity

pub mod ability;
pub mod item;
pub mod reward;
pub mod weapon;
pub mod world;

pub use ability::{Ability, AbilityType, ResourceType};
pub use item::{Item, ItemCategory, ItemType};
pub use reward::{Reward, RewardType};
pub use weapon::Weapon;
pub use world::World;

use std::time::Duration;

/// Census millisecond counts as durations. Negative values read as absent.
pub(crate) fn millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms).ok().map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis() {
        assert_eq!(millis(1500), Some(Duration::from_millis(1500)));
        assert_eq!(millis(0), Some(Duration::ZERO));
        assert_eq!(millis(-1), None);
    }
}
