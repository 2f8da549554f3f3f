use anyhow::Result;

use drone_engine::config::EngineConfig;
use drone_engine::engine::{Engine, NullRenderer};
use drone_engine::world::World;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("=== Drone Engine Starting ===");
    let config = EngineConfig::load_or_default("config/engine.json");

    let mut world = World::new(&config)?;
    world.load_model(&config.scene.base_model_path);

    let engine = Engine::new()?;
    engine.run(world, NullRenderer)?;

    log::info!("Engine shutdown complete.");
    Ok(())
}
