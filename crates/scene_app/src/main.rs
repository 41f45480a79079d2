//! # scene_tool
//!
//! Command-line front end for scene documents.
//!
//! ```text
//! scene_tool inspect  level.json
//! scene_tool clone    level.json --out level.play.json
//! scene_tool roundtrip level.json
//! scene_tool demo     --out demos/sample_scene.json
//! ```
//!
//! Files ending in `.msgpack` are read and written as MessagePack snapshots;
//! everything else is JSON. Logging honours `RUST_LOG`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scene_tool", about = "Inspect, clone, and round-trip scene documents")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the entity hierarchy with world positions and components.
    Inspect {
        /// Scene document to load.
        path: PathBuf,
    },
    /// Duplicate a scene with fresh identities and write the copy.
    Clone {
        path: PathBuf,
        /// Output path for the cloned document.
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Load and re-save a scene, reporting any difference.
    Roundtrip { path: PathBuf },
    /// Write a small sample scene.
    Demo {
        #[arg(short, long, default_value = "sample_scene.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scene_tool=info".parse()?))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Inspect { path } => commands::inspect(&path),
        Command::Clone { path, out } => commands::clone(&path, &out),
        Command::Roundtrip { path } => commands::roundtrip(&path),
        Command::Demo { out } => commands::demo(&out),
    }
}
