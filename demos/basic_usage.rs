//! Basic usage of the census client against fixture data.

use census_kit::ps2::{Item, Weapon, World};
use census_kit::source::InMemorySource;
use census_kit::{error::Result, CacheStrategy, Client, LogMetrics, Record};
use serde_json::json;

/// Fixture store standing in for the census API
fn fixtures() -> Result<InMemorySource> {
    let source = InMemorySource::new();
    source.insert(
        "weapon",
        Record::from_value(json!({
            "weapon_id": "80",
            "weapon_group_id": "12",
            "turn_modifier": "1",
            "move_modifier": "1",
            "sprint_recovery_ms": "450",
            "equip_ms": "750",
            "unequip_ms": "250",
            "to_iron_sights_ms": "300",
            "from_iron_sights_ms": "300",
        }))?,
    );
    source.insert(
        "item",
        Record::from_value(json!({
            "item_id": "7",
            "is_vehicle_weapon": "0",
            "name": {"en": "Gauss SAW", "de": "Gauss SAW"},
            "max_stack_size": "1",
            "is_default_attachment": "0",
        }))?,
    );
    source.insert(
        "item_to_weapon",
        Record::new().with("item_id", "7").with("weapon_id", "80"),
    );
    source.insert(
        "world",
        Record::from_value(json!({
            "world_id": "17",
            "state": "online",
            "name": {"en": "Emerald"},
        }))?,
    );
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Census Kit - Basic Example ===\n");

    // 1. Initialize client
    println!("1. Initializing client over fixture source...");
    let source = fixtures()?;
    let client = Client::builder(source.clone())
        .with_metrics(Box::new(LogMetrics))
        .build();
    println!("   ✓ Client ready\n");

    // 2. First request - cache miss, fetch from source
    println!("2. First request for weapon 80:");
    if let Some(weapon) = client.get::<Weapon>(80).await? {
        println!("   ✓ Weapon loaded: equip times {:?}\n", weapon.equip_times());
    }

    // 3. Second request - cache hit
    println!("3. Second request for weapon 80:");
    client.get::<Weapon>(80).await?;
    println!(
        "   ✓ Served from cache ({} fetches so far)\n",
        source.fetch_by_id_calls()
    );

    // 4. Missing ids are not cached
    println!("4. Request for a weapon that does not exist (42):");
    if client.get::<Weapon>(42).await?.is_none() {
        println!("   ✓ Not found; the next request will ask again\n");
    }

    // 5. Deferred reference
    println!("5. Resolving the weapon's item:");
    if let Some(weapon) = client.get::<Weapon>(80).await? {
        let item = weapon.item(&client);
        println!("   state before: {}", item.state());
        if let Some(item) = item.resolve_one().await? {
            println!("   ✓ Item: {} (id {})", item.name, item.item_id);
        }
        println!("   state after: {}\n", item.state());
    }

    // 6. Lookup by name
    println!("6. Looking up an item by name:");
    if let Some(item) = Item::get_by_name(&client, "Gauss SAW", "de").await? {
        println!("   ✓ Found item {}\n", item.item_id);
    }

    // 7. Invalidate strategy - force refresh
    println!("7. Invalidate strategy (force refresh of world 17):");
    if let Some(world) = client
        .get_with::<World>(17, CacheStrategy::Invalidate)
        .await?
    {
        println!("   ✓ {} is {}\n", world.name, world.state);
    }

    let stats = client.cache_stats::<Weapon>()?;
    println!(
        "=== Weapon cache: {}/{} entries ===\n",
        stats.live_entries(),
        stats.capacity
    );

    Ok(())
}
