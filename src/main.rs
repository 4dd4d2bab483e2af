//! voxelcraft - a deterministic first-person voxel sandbox engine.

mod config;
mod game;

use anyhow::Result;
use config::Config;
use game::{GameAction, GameWorld};
use std::env;
use tracing::info;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    let config = Config::parse(env::args().skip(1));

    tracing_subscriber::fmt()
        .with_env_filter(
            config
                .log_level
                .as_deref()
                .map(tracing_subscriber::EnvFilter::new)
                .unwrap_or_else(|| {
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
                }),
        )
        .init();

    info!("starting voxelcraft v{}", env!("CARGO_PKG_VERSION"));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut game = GameWorld::new(&event_loop, &config)?;

    event_loop.run(move |event, elwt| match game.handle_event(&event, elwt) {
        GameAction::Continue => {}
        GameAction::Quit => {
            info!("voxelcraft shutting down");
            elwt.exit();
        }
    })?;

    Ok(())
}
