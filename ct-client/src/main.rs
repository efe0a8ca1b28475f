//! This binary crate runs the Chaos Tree: a Christmas tree of glowing particles that bursts
//! apart when you open your hand in front of the camera and reforms when you make a fist.

mod app;
mod logging;
mod render;

use self::app::App;
use color_eyre::{eyre::eyre, Result};
use ct_geometry::{config_path, SceneConfig};
use ct_vision::ConfigError;
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = logging::init_tracing();

    let config = SceneConfig::from_file(&config_path());
    let config: Result<SceneConfig, ConfigError> =
        config.validate().map(|()| config).map_err(Into::into);
    info!(valid = config.is_ok(), "Loaded scene config");

    let options = eframe::NativeOptions {
        follow_system_theme: true,
        ..Default::default()
    };

    eframe::run_native(
        "The Grand Tree",
        options,
        Box::new(move |cc| Box::new(App::new(cc, config))),
    )
    .map_err(|error| eyre!("Unable to run native eframe app: {error}"))
}
