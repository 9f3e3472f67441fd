use std::path::{Path, PathBuf};

use bevy::{asset::io::file::FileAssetReader, prelude::*};
use controller::ControllerConfig;

/// Tuning file inside the asset folder.
const CONFIG_FILE: &str = "assets/controller.ron";

#[derive(Resource, Debug, Clone)]
pub struct CharacterConfig(pub ControllerConfig);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(CharacterConfig(load(&config_path())));
}

fn config_path() -> PathBuf {
    FileAssetReader::get_base_path().join(CONFIG_FILE)
}

/// Read the tuning file if there is one. A present but broken file is a startup error.
fn load(path: &Path) -> ControllerConfig {
    if !path.exists() {
        info!("{} not found, using default tuning", path.display());
        return ControllerConfig::default();
    }

    let config = ControllerConfig::load(path)
        .unwrap_or_else(|err| panic!("invalid {}: {err}", path.display()));
    info!("loaded tuning from {}", path.display());
    config
}
