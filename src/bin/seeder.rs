//! signalq Seeder
//!
//! Daily preparation step: ranks the latest monthly scores and seeds the
//! signal queue for each configured strategy preset. Run once per day by
//! the external scheduler, after the scoring producer has written the
//! month's score partition.

use chrono::Local;
use dotenvy::dotenv;
use signalq::config;
use signalq::db::QueueDatabase;
use signalq::logging;
use signalq::seeder::QueueSeeder;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting signalq seeder");
    info!(environment = %env, "Environment");

    let presets = config::seed_presets()?;
    info!(
        preset_count = presets.len(),
        "Seeding {} strategy preset(s)",
        presets.len()
    );

    let database_url = config::get_database_url();
    let db = QueueDatabase::connect(&database_url)
        .await
        .map_err(|e| format!("Failed to connect to database: {}", e))?;
    let seeder = QueueSeeder::new(Arc::new(db));

    // The operator's calendar date stamps both the score partition and
    // date_queued.
    let as_of = Local::now().date_naive();

    for preset in &presets {
        let result = seeder
            .seed(preset.strategy_id, preset.top_n, as_of)
            .await
            .map_err(|e| format!("Seeding failed for strategy {}: {}", preset.strategy_id, e))?;

        info!(
            strategy_id = preset.strategy_id,
            inserted = result.inserted,
            considered = result.considered,
            "Strategy {} seeded: {}/{} new",
            preset.strategy_id,
            result.inserted,
            result.considered
        );
    }

    info!("Seeder finished");
    Ok(())
}
