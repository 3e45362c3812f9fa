//! Weapon stats.
//!
//! Weapons carry handling data only. Their name and faction live on the
//! [`Item`] linked through the `item_to_weapon` collection.

use crate::client::Client;
use crate::entity::CensusEntity;
use crate::error::Result;
use crate::query::{Join, Query};
use crate::record::Record;
use crate::reference::DeferredReference;
use crate::source::CensusSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{millis, Item};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub weapon_id: i64,
    pub weapon_group_id: i64,
    pub turn_modifier: f64,
    pub move_modifier: f64,
    pub sprint_recovery_ms: i64,
    pub equip_ms: i64,
    pub unequip_ms: i64,
    pub to_iron_sights_ms: i64,
    pub from_iron_sights_ms: i64,
    pub heat_capacity: Option<i64>,
    pub heat_bleed_off_rate: Option<f64>,
    pub heat_overheat_penalty_ms: Option<i64>,
    pub melee_detect_width: Option<f64>,
    pub melee_detect_height: Option<f64>,
}

impl CensusEntity for Weapon {
    type Id = i64;
    const COLLECTION: &'static str = "weapon";
    const ID_FIELD: &'static str = "weapon_id";

    fn id(&self) -> i64 {
        self.weapon_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(Weapon {
            weapon_id: fields.int("weapon_id")?,
            weapon_group_id: fields.int("weapon_group_id")?,
            turn_modifier: fields.float("turn_modifier")?,
            move_modifier: fields.float("move_modifier")?,
            sprint_recovery_ms: fields.int("sprint_recovery_ms")?,
            equip_ms: fields.int("equip_ms")?,
            unequip_ms: fields.int("unequip_ms")?,
            to_iron_sights_ms: fields.int("to_iron_sights_ms")?,
            from_iron_sights_ms: fields.int("from_iron_sights_ms")?,
            heat_capacity: fields.opt_int("heat_capacity")?,
            heat_bleed_off_rate: fields.opt_float("heat_bleed_off_rate")?,
            heat_overheat_penalty_ms: fields.opt_int("heat_overheat_penalty_ms")?,
            melee_detect_width: fields.opt_float("melee_detect_width")?,
            melee_detect_height: fields.opt_float("melee_detect_height")?,
        })
    }
}

impl Weapon {
    /// Look up the weapon of the item with the given localised name.
    pub async fn get_by_name<S: CensusSource>(
        client: &Client<S>,
        name: &str,
        locale: &str,
    ) -> Result<Option<Arc<Weapon>>> {
        let Some(item) = Item::get_by_name(client, name, locale).await? else {
            return Ok(None);
        };
        item.weapon(client).resolve_one().await
    }

    /// The item this weapon belongs to.
    pub fn item<S: CensusSource>(&self, client: &Client<S>) -> DeferredReference<Item, S> {
        let query = Query::new("item_to_weapon")
            .term(Self::ID_FIELD, self.weapon_id)
            .join(Join::new(Item::COLLECTION).on(Item::ID_FIELD));
        client.reference(query)
    }

    /// Equip and unequip times.
    pub fn equip_times(&self) -> Option<(Duration, Duration)> {
        Some((millis(self.equip_ms)?, millis(self.unequip_ms)?))
    }

    /// Times to enter and exit aim-down-sights.
    pub fn ads_times(&self) -> Option<(Duration, Duration)> {
        Some((millis(self.to_iron_sights_ms)?, millis(self.from_iron_sights_ms)?))
    }

    pub fn sprint_recovery(&self) -> Option<Duration> {
        millis(self.sprint_recovery_ms)
    }

    /// Melee detection box as `(width, height)` in metres.
    pub fn melee_hitbox(&self) -> Option<(f64, f64)> {
        let width = self.melee_detect_width?;
        let height = self.melee_detect_height?;
        Some((width / 1000.0, height / 1000.0))
    }
}
