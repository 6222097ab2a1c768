//! # Lattice Cube
//!
//! A 3×3×3 lattice that turns faces, turns as a whole and explodes.
//!
//! Controls:
//! - Left drag: orbit (damped, no pan)
//! - Scroll: zoom between the start distance and 50 units
//! - Controls panel: auto transform, turn speed, manual triggers, bloom,
//!   tone mapping and axes
//!
//! `RUST_LOG=cubist=debug` logs every state machine transition.

use cubist::{scenes::LatticeDemo, AppConfig, CubistApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = CubistApp::new(AppConfig::new("Lattice Cube").with_env())?;
    app.attach_demo(LatticeDemo::new());
    app.run()?;
    Ok(())
}
