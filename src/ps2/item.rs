//! Items, item categories and item types.

use crate::client::Client;
use crate::entity::CensusEntity;
use crate::error::Result;
use crate::locale::LocaleData;
use crate::query::{Join, Query};
use crate::record::Record;
use crate::reference::DeferredReference;
use crate::source::CensusSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Ability, Weapon};

/// Anything a player can own: weapons, attachments, cosmetics, implants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub item_type_id: Option<i64>,
    pub item_category_id: Option<i64>,
    pub activatable_ability_id: Option<i64>,
    pub passive_ability_id: Option<i64>,
    pub is_vehicle_weapon: bool,
    pub name: LocaleData,
    pub description: Option<LocaleData>,
    pub faction_id: Option<i64>,
    pub max_stack_size: i64,
    pub skill_set_id: Option<i64>,
    pub is_default_attachment: bool,
    pub image_id: Option<i64>,
    pub image_path: Option<String>,
}

impl CensusEntity for Item {
    type Id = i64;
    const COLLECTION: &'static str = "item";
    const ID_FIELD: &'static str = "item_id";

    fn id(&self) -> i64 {
        self.item_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(Item {
            item_id: fields.int("item_id")?,
            item_type_id: fields.opt_int("item_type_id")?,
            item_category_id: fields.opt_int("item_category_id")?,
            activatable_ability_id: fields.opt_int("activatable_ability_id")?,
            passive_ability_id: fields.opt_int("passive_ability_id")?,
            is_vehicle_weapon: fields.boolean("is_vehicle_weapon")?,
            name: fields.locale("name")?,
            description: fields.opt_locale("description")?,
            faction_id: fields.opt_int("faction_id")?,
            max_stack_size: fields.int("max_stack_size")?,
            skill_set_id: fields.opt_int("skill_set_id")?,
            is_default_attachment: fields.boolean("is_default_attachment")?,
            image_id: fields.opt_int("image_id")?,
            image_path: fields.opt_string("image_path")?,
        })
    }
}

impl Item {
    /// Look up an item by its localised name.
    ///
    /// Names are not unique; the first match wins.
    pub async fn get_by_name<S: CensusSource>(
        client: &Client<S>,
        name: &str,
        locale: &str,
    ) -> Result<Option<Arc<Item>>> {
        let query = Query::new(Self::COLLECTION).term(format!("name.{}", locale), name);
        client.find_first::<Item>(query).await
    }

    pub fn category<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> Option<DeferredReference<ItemCategory, S>> {
        self.item_category_id
            .map(|id| client.reference_by_id::<ItemCategory>(id))
    }

    pub fn item_type<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> Option<DeferredReference<ItemType, S>> {
        self.item_type_id
            .map(|id| client.reference_by_id::<ItemType>(id))
    }

    /// The weapon this item represents, through `item_to_weapon`.
    ///
    /// Resolves to nothing for items that are not weapons.
    pub fn weapon<S: CensusSource>(&self, client: &Client<S>) -> DeferredReference<Weapon, S> {
        let query = Query::new("item_to_weapon")
            .term(Self::ID_FIELD, self.item_id)
            .join(Join::new(Weapon::COLLECTION).on(Weapon::ID_FIELD));
        client.reference(query)
    }

    pub fn activatable_ability<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> Option<DeferredReference<Ability, S>> {
        self.activatable_ability_id
            .map(|id| client.reference_by_id::<Ability>(id))
    }

    pub fn passive_ability<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> Option<DeferredReference<Ability, S>> {
        self.passive_ability_id
            .map(|id| client.reference_by_id::<Ability>(id))
    }
}

/// Grouping used by the in-game depot, e.g. "Light Machine Gun".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub item_category_id: i64,
    pub name: LocaleData,
}

impl CensusEntity for ItemCategory {
    type Id = i64;
    const COLLECTION: &'static str = "item_category";
    const ID_FIELD: &'static str = "item_category_id";
    const CACHE_SIZE: usize = 512;
    const CACHE_TTU: std::time::Duration = std::time::Duration::from_secs(3600 * 24);

    fn id(&self) -> i64 {
        self.item_category_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(ItemCategory {
            item_category_id: fields.int("item_category_id")?,
            name: fields.locale("name")?,
        })
    }
}

/// Broad item kind, e.g. `Weapon` or `Attachment`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub item_type_id: i64,
    pub name: String,
    pub code: String,
}

impl CensusEntity for ItemType {
    type Id = i64;
    const COLLECTION: &'static str = "item_type";
    const ID_FIELD: &'static str = "item_type_id";
    const CACHE_SIZE: usize = 32;
    const CACHE_TTU: std::time::Duration = std::time::Duration::from_secs(3600 * 24);

    fn id(&self) -> i64 {
        self.item_type_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(ItemType {
            item_type_id: fields.int("item_type_id")?,
            name: fields.string("name")?,
            code: fields.string("code")?,
        })
    }
}
