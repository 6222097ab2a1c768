//! # Spinning Cube
//!
//! The smallest demo: a white wireframe box tumbling about X, Y and Z.

use cubist::scenes::SpinnerDemo;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    cubist::run_demo("Spinning Cube", SpinnerDemo::new())?;
    Ok(())
}
