mod simulator;

use actor_protocol::{ConnectionStatus, StateSnapshot};
use connection_actors::{Engine, EngineConfig};
use core_types::TilePoint;
use simulator::SimulatedTransport;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const DEVICE_LATENCY: Duration = Duration::from_millis(30);
const RUN_TIMEOUT: Duration = Duration::from_secs(10);

/// An L-shaped route with a detour, in tile units.
fn demo_route(tile: i32) -> Vec<TilePoint> {
    [(0, 0), (1, 0), (1, 2), (3, 2), (3, 0)]
        .into_iter()
        .map(|(x, y)| TilePoint::new(x * tile, y * tile))
        .collect()
}

fn describe(s: &StateSnapshot) -> String {
    format!("link={:?} play={:?} step={}", s.connection, s.play, s.active_step)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let tile = i32::try_from(config.tile_size)?;
    let options = config.frame;

    let mut engine = Engine::start(config, |link| {
        SimulatedTransport::spawn(link, options, DEVICE_LATENCY)
    })?;

    let route = demo_route(tile);
    info!("Playing {} waypoints", route.len());
    engine.request_play(&route)?;

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let deadline = tokio::time::Instant::now() + RUN_TIMEOUT;
    let mut disconnecting = false;
    let mut was_up = false;

    loop {
        ticker.tick().await;
        if tokio::time::Instant::now() > deadline {
            warn!("Timed out: {}", describe(engine.snapshot()));
            break;
        }

        if engine.publish() {
            println!("{}", describe(engine.snapshot()));
        }
        if let Some(message) = engine.take_status_message() {
            println!("  {}", message);
        }

        let snapshot = engine.snapshot();
        if snapshot.connection.is_link_up() {
            was_up = true;
        } else if was_up && snapshot.connection == ConnectionStatus::Closed {
            break;
        }
        if !disconnecting && snapshot.connection.is_link_up() && !snapshot.is_playing() {
            // Route done
            engine.request_disconnect()?;
            disconnecting = true;
        }
    }

    engine.shutdown()?;
    Ok(())
}
