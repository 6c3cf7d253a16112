use anyhow::Context;
use engine::EngineContext;
use game::{GameConfig, ShapesGame};

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load()?;

    // ---- Create engine context (game owns this) ----
    let ctx = EngineContext::new(config.engine.clone()).context("failed to start engine")?;
    ctx.run(ShapesGame::new(config))?;
    Ok(())
}
