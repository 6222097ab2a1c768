//! # Blob
//!
//! A noise-displaced icosphere with cycling colours. The Controls panel
//! tunes scale, wireframe, noise and the three lights.

use cubist::{scenes::BlobDemo, AppConfig, CubistApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = CubistApp::new(AppConfig::new("Blob").with_env())?;
    app.attach_demo(BlobDemo::new());
    app.run()?;
    Ok(())
}
