//! Native demo.
//!
//! ```text
//! emberfield              # embers
//! emberfield ambient      # connected drifting dots
//! emberfield field.json   # any config document
//! ```
//!
//! Set `RUST_LOG=debug` for frame rate reports.

#[cfg(not(target_arch = "wasm32"))]
use emberfield::{isolate, ConfigError, FieldConfig};

#[cfg(not(target_arch = "wasm32"))]
fn config_from_arg(arg: Option<&str>) -> Result<FieldConfig, ConfigError> {
    match arg {
        None | Some("ember") => Ok(FieldConfig::ember()),
        Some("ambient") => Ok(FieldConfig::ambient()),
        Some(path) => FieldConfig::load(path),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1);
    let config = match config_from_arg(arg.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    if !isolate("Particles", || emberfield::run(config)) {
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build is driven from JavaScript through `startField`.
}
