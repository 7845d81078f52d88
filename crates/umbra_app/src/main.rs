//! `umbra <scene.gltf|glb> [config.json]`
//!
//! Opens a glTF scene in a window and renders it with ray-traced point light
//! shadows. Logging follows `RUST_LOG`, default `info`.

mod config;
mod viewer;

use std::path::PathBuf;

use anyhow::{Context, bail};
use env_logger::Env;

use crate::{config::ViewerConfig, viewer::Viewer};

const USAGE: &str = "usage: umbra <scene.gltf|glb> [config.json]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    scene: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let parsed = Args {
        scene: args.next().map(PathBuf::from),
        config: args.next().map(PathBuf::from),
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument '{extra}'\n{USAGE}");
    }
    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if args.scene.is_some() {
        config.scene_path = args.scene;
    }

    let Some(scene_path) = config.scene_path.clone() else {
        bail!("no scene given\n{USAGE}");
    };

    let scene = umbra_assets::load_scene(&scene_path)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;

    let settings = config.window_settings();
    umbra_window::run_viewer(settings, Viewer::new(config, scene)).context("viewer stopped with an error")?;

    log::info!("bye");
    Ok(())
}
