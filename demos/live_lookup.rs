//! Lookups against the live census API.
//!
//! Run with: CENSUS_SERVICE_ID=s:yourid cargo run --example live_lookup --features http

use census_kit::ps2::{Weapon, World};
use census_kit::source::{HttpConfig, HttpSource};
use census_kit::{error::Result, Client};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    let mut config = HttpConfig::default();
    if let Ok(service_id) = std::env::var("CENSUS_SERVICE_ID") {
        config = config.with_service_id(service_id);
    }
    let client = Client::new(HttpSource::new(config)?);

    if let Some(world) = client.get::<World>(17).await? {
        println!("{}: {}", world.name, world.state);
    }

    match Weapon::get_by_name(&client, "Gauss SAW", "en").await? {
        Some(weapon) => println!(
            "Gauss SAW: weapon {}, ADS times {:?}",
            weapon.weapon_id,
            weapon.ads_times()
        ),
        None => println!("Gauss SAW not found"),
    }

    Ok(())
}
