//! `constellation [config.json] [constellation|globe|rain]`

use std::env;
use std::path::Path;
use std::process;

use constellation::{AnimationKind, Background, BackgroundConfig};
use log::{error, warn};

fn main() {
    env_logger::init();

    let mut config = BackgroundConfig::default();
    let mut kind = None;

    for arg in env::args().skip(1) {
        if let Ok(parsed) = arg.parse::<AnimationKind>() {
            kind = Some(parsed);
            continue;
        }
        match BackgroundConfig::load(Path::new(&arg)) {
            Ok(loaded) => config = loaded,
            Err(e) => warn!("ignoring config {}: {}; using defaults", arg, e),
        }
    }

    if let Some(kind) = kind {
        config.kind = kind;
    }

    if let Err(e) = Background::from_config(config).run() {
        error!("{}", e);
        process::exit(1);
    }
}
