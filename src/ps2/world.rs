//! Game servers.

use crate::entity::CensusEntity;
use crate::error::Result;
use crate::locale::LocaleData;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A game server. Its `state` changes often, so it is cached briefly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub world_id: i64,
    pub state: String,
    pub name: LocaleData,
    pub description: Option<LocaleData>,
}

impl CensusEntity for World {
    type Id = i64;
    const COLLECTION: &'static str = "world";
    const ID_FIELD: &'static str = "world_id";
    const CACHE_SIZE: usize = 20;
    const CACHE_TTU: Duration = Duration::from_secs(180);

    fn id(&self) -> i64 {
        self.world_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(World {
            world_id: fields.int("world_id")?,
            state: fields.string("state")?,
            name: fields.locale("name")?,
            description: fields.opt_locale("description")?,
        })
    }
}

impl World {
    pub fn is_online(&self) -> bool {
        self.state == "online"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_world_from_record() {
        let record = Record::from_value(json!({
            "world_id": "17",
            "state": "online",
            "name": {"en": "Emerald", "de": "Emerald", "tr": "Emerald"},
            "description": null,
        }))
        .expect("object");

        let world = World::from_record(&record).expect("Failed to build world");
        assert_eq!(world.world_id, 17);
        assert!(world.is_online());
        assert_eq!(world.name.to_string(), "Emerald");
        assert_eq!(world.description, None);
    }

    #[test]
    fn test_world_cache_defaults() {
        let config = World::cache_config();
        assert_eq!(config.capacity, 20);
        assert_eq!(config.ttu, Duration::from_secs(180));
    }
}
