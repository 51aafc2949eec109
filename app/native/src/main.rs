#![allow(clippy::multiple_crate_versions)]

//! Wallswitch - desktop wallpaper rotation from a folder of images.
//!
//! This binary serves as both the tray application and CLI:
//! - When called with no arguments or with `tray`: launches the tray app
//! - When called with other subcommands (e.g., `wallswitch next`): runs CLI commands

fn main() {
    wallswitch_lib::init_tracing();

    if let Err(err) = wallswitch_lib::cli::run() {
        eprintln!("wallswitch: {err}");
        std::process::exit(1);
    }
}
