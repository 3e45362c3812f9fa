//! Abilities and the types and resources they reference.
//!
//! The numbered `param*`/`string*` fields are generic slots whose meaning is
//! documented by the matching slots of the ability's [`AbilityType`].

use crate::client::Client;
use crate::entity::CensusEntity;
use crate::error::Result;
use crate::locale::LocaleData;
use crate::record::Record;
use crate::reference::DeferredReference;
use crate::source::CensusSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::millis;

/// Persistent, player-bound effect such as an overshield or an AoE heal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub ability_id: i64,
    pub ability_type_id: i64,
    pub distance_max: Option<f64>,
    pub expire_msec: Option<i64>,
    pub first_use_delay_msec: Option<i64>,
    pub flag_toggle: Option<bool>,
    pub next_use_delay_msec: Option<i64>,
    pub radius_max: Option<f64>,
    pub resource_first_cost: Option<i64>,
    pub resource_cost_per_msec: Option<f64>,
    pub resource_type_id: Option<i64>,
    pub reuse_delay_msec: Option<i64>,
    pub params: [Option<String>; 14],
    pub strings: [Option<String>; 4],
}

impl CensusEntity for Ability {
    type Id = i64;
    const COLLECTION: &'static str = "ability";
    const ID_FIELD: &'static str = "ability_id";

    fn id(&self) -> i64 {
        self.ability_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(Ability {
            ability_id: fields.int("ability_id")?,
            ability_type_id: fields.int("ability_type_id")?,
            distance_max: fields.opt_float("distance_max")?,
            expire_msec: fields.opt_int("expire_msec")?,
            first_use_delay_msec: fields.opt_int("first_use_delay_msec")?,
            flag_toggle: fields.opt_boolean("flag_toggle")?,
            next_use_delay_msec: fields.opt_int("next_use_delay_msec")?,
            radius_max: fields.opt_float("radius_max")?,
            resource_first_cost: fields.opt_int("resource_first_cost")?,
            resource_cost_per_msec: fields.opt_float("resource_cost_per_msec")?,
            resource_type_id: fields.opt_int("resource_type_id")?,
            reuse_delay_msec: fields.opt_int("reuse_delay_msec")?,
            params: fields.params("param"),
            strings: fields.params("string"),
        })
    }
}

impl Ability {
    pub fn ability_type<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> DeferredReference<AbilityType, S> {
        client.reference_by_id::<AbilityType>(self.ability_type_id)
    }

    pub fn resource_type<S: CensusSource>(
        &self,
        client: &Client<S>,
    ) -> Option<DeferredReference<ResourceType, S>> {
        self.resource_type_id
            .map(|id| client.reference_by_id::<ResourceType>(id))
    }

    pub fn expires_after(&self) -> Option<Duration> {
        self.expire_msec.and_then(millis)
    }

    pub fn first_use_delay(&self) -> Option<Duration> {
        self.first_use_delay_msec.and_then(millis)
    }

    pub fn next_use_delay(&self) -> Option<Duration> {
        self.next_use_delay_msec.and_then(millis)
    }

    pub fn reuse_delay(&self) -> Option<Duration> {
        self.reuse_delay_msec.and_then(millis)
    }

    /// Resource drained per second while the ability is active.
    pub fn resource_cost_per_second(&self) -> Option<f64> {
        self.resource_cost_per_msec.map(|cost| cost * 1000.0)
    }

    pub fn is_toggle(&self) -> bool {
        self.flag_toggle.unwrap_or(false)
    }
}

/// Groups similar abilities; its slots explain the ability's unnamed fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityType {
    pub ability_type_id: i64,
    pub description: Option<String>,
    pub params: [Option<String>; 14],
    pub strings: [Option<String>; 4],
}

impl CensusEntity for AbilityType {
    type Id = i64;
    const COLLECTION: &'static str = "ability_type";
    const ID_FIELD: &'static str = "ability_type_id";
    const CACHE_SIZE: usize = 64;

    fn id(&self) -> i64 {
        self.ability_type_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(AbilityType {
            ability_type_id: fields.int("ability_type_id")?,
            description: fields.opt_string("description")?,
            params: fields.params("param"),
            strings: fields.params("string"),
        })
    }
}

/// Pool an ability draws from, e.g. shield energy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    pub resource_type_id: i64,
    pub description: Option<String>,
    pub name: Option<LocaleData>,
}

impl CensusEntity for ResourceType {
    type Id = i64;
    const COLLECTION: &'static str = "resource_type";
    const ID_FIELD: &'static str = "resource_type_id";
    const CACHE_SIZE: usize = 64;

    fn id(&self) -> i64 {
        self.resource_type_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(ResourceType {
            resource_type_id: fields.int("resource_type_id")?,
            description: fields.opt_string("description")?,
            name: fields.opt_locale("name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use serde_json::json;

    fn overshield() -> Record {
        Record::from_value(json!({
            "ability_id": "1000",
            "ability_type_id": "3",
            "expire_msec": "0",
            "first_use_delay_msec": "250",
            "flag_toggle": "1",
            "reuse_delay_msec": "12000",
            "resource_cost_per_msec": "0.02",
            "resource_type_id": "4",
            "param1": "200",
            "param14": "x",
            "string2": "shield",
        }))
        .expect("object")
    }

    #[test]
    fn test_ability_from_record() {
        let ability = Ability::from_record(&overshield()).expect("Failed to build ability");

        assert_eq!(ability.ability_id, 1000);
        assert!(ability.is_toggle());
        assert_eq!(ability.params[0].as_deref(), Some("200"));
        assert_eq!(ability.params[1], None);
        assert_eq!(ability.params[13].as_deref(), Some("x"));
        assert_eq!(ability.strings[1].as_deref(), Some("shield"));
        assert_eq!(ability.next_use_delay_msec, None);
    }

    #[test]
    fn test_duration_accessors() {
        let ability = Ability::from_record(&overshield()).expect("Failed to build ability");

        assert_eq!(ability.expires_after(), Some(Duration::ZERO));
        assert_eq!(ability.first_use_delay(), Some(Duration::from_millis(250)));
        assert_eq!(ability.next_use_delay(), None);
        assert_eq!(ability.reuse_delay(), Some(Duration::from_secs(12)));
        let per_second = ability.resource_cost_per_second().expect("cost");
        assert!((per_second - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_type_and_resource_references() {
        let source = InMemorySource::new();
        source.insert("ability", overshield());
        source.insert(
            "ability_type",
            Record::new()
                .with("ability_type_id", "3")
                .with("description", "Shield")
                .with("param1", "Shield amount"),
        );
        source.insert(
            "resource_type",
            Record::new()
                .with("resource_type_id", "4")
                .with("description", "Shield energy"),
        );
        let client = Client::new(source.clone());

        let ability = client
            .get::<Ability>(1000)
            .await
            .expect("Failed to get")
            .expect("Ability not found");

        let ability_type = ability
            .ability_type(&client)
            .resolve_one()
            .await
            .expect("Failed to resolve")
            .expect("Type not found");
        assert_eq!(ability_type.params[0].as_deref(), Some("Shield amount"));

        let resource = ability.resource_type(&client).expect("Has a resource");
        let resource = resource.resolve_one().await.expect("Failed to resolve");
        assert_eq!(
            resource.and_then(|r| r.description.clone()),
            Some("Shield energy".to_string())
        );
    }
}
