//! Rewards granted for alerts, achievements and directives.

use crate::client::Client;
use crate::entity::CensusEntity;
use crate::error::Result;
use crate::record::Record;
use crate::reference::DeferredReference;
use crate::source::CensusSource;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub reward_id: i64,
    pub reward_type_id: i64,
    pub count_min: Option<i64>,
    pub count_max: Option<i64>,
    pub params: [Option<String>; 5],
}

impl CensusEntity for Reward {
    type Id = i64;
    const COLLECTION: &'static str = "reward";
    const ID_FIELD: &'static str = "reward_id";

    fn id(&self) -> i64 {
        self.reward_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(Reward {
            reward_id: fields.int("reward_id")?,
            reward_type_id: fields.int("reward_type_id")?,
            count_min: fields.opt_int("count_min")?,
            count_max: fields.opt_int("count_max")?,
            params: fields.params("param"),
        })
    }
}

impl Reward {
    pub fn reward_type<S: CensusSource>(&self, client: &Client<S>) -> DeferredReference<RewardType, S> {
        client.reference_by_id::<RewardType>(self.reward_type_id)
    }
}

/// Kind of reward (experience, items, ...). Its params document the
/// matching params of a [`Reward`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardType {
    pub reward_type_id: i64,
    pub description: String,
    pub count_min: Option<i64>,
    pub count_max: Option<i64>,
    pub params: [Option<String>; 5],
}

impl CensusEntity for RewardType {
    type Id = i64;
    const COLLECTION: &'static str = "reward_type";
    const ID_FIELD: &'static str = "reward_type_id";
    const CACHE_SIZE: usize = 32;

    fn id(&self) -> i64 {
        self.reward_type_id
    }

    fn from_record(record: &Record) -> Result<Self> {
        let fields = record.fields(Self::COLLECTION);
        Ok(RewardType {
            reward_type_id: fields.int("reward_type_id")?,
            description: fields.string("description")?,
            count_min: fields.opt_int("count_min")?,
            count_max: fields.opt_int("count_max")?,
            params: fields.params("param"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::InMemorySource;

    #[test]
    fn test_reward_type_requires_description() {
        let record = Record::new().with("reward_type_id", "1");
        assert!(matches!(
            RewardType::from_record(&record),
            Err(Error::SchemaError { .. })
        ));
    }

    #[tokio::test]
    async fn test_reward_type_reference() {
        let source = InMemorySource::new();
        source.insert(
            "reward",
            Record::new()
                .with("reward_id", "11")
                .with("reward_type_id", "1")
                .with("count_min", "100")
                .with("param1", "experience"),
        );
        source.insert(
            "reward_type",
            Record::new()
                .with("reward_type_id", "1")
                .with("description", "Experience")
                .with("param1", "Experience type"),
        );
        let client = Client::new(source.clone());

        let reward = client
            .get::<Reward>(11)
            .await
            .expect("Failed to get")
            .expect("Reward not found");
        assert_eq!(reward.count_min, Some(100));
        assert_eq!(reward.count_max, None);
        assert_eq!(reward.params[0].as_deref(), Some("experience"));

        let reward_type = reward
            .reward_type(&client)
            .resolve_one()
            .await
            .expect("Failed to resolve")
            .expect("Type not found");
        assert_eq!(reward_type.description, "Experience");
    }
}
