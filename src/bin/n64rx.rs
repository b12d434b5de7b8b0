// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use log::{error, info};
use n64rx::core::error::Result;
use n64rx::core::save_state::SaveState;
use n64rx::core::{EmulatorConfig, System};
use std::path::PathBuf;

/// Environment variable naming a TOML config file
const CONFIG_ENV: &str = "N64RX_CONFIG";

/// N64 CPU/RCP core runner
#[derive(Parser)]
#[command(name = "n64rx")]
#[command(about = "Run a raw VR4300 program image on the N64 core", long_about = None)]
struct Args {
    /// Raw big-endian program image copied into RDRAM
    image: Option<PathBuf>,

    /// Virtual address the image is loaded at and started from
    #[arg(short = 'a', long, default_value = "0x80000400", value_parser = parse_address)]
    load_address: u32,

    /// Cartridge ROM image (.z64, big-endian)
    #[arg(short = 'r', long)]
    rom: Option<String>,

    /// Number of cycles to execute
    #[arg(short = 'n', long, default_value = "100000")]
    cycles: u64,

    /// Run this many frames with the minimal interrupt handler instead of a cycle count
    #[arg(short = 'f', long)]
    frames: Option<u32>,

    /// Treat unimplemented opcodes as no-ops and escape empty exception vectors
    #[arg(long)]
    fast_boot: bool,

    /// TOML configuration file (overrides N64RX_CONFIG)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Restore this save state before running
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Write a save state here after running
    #[arg(long)]
    save_state: Option<PathBuf>,
}

fn parse_address(text: &str) -> std::result::Result<u32, String> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    let digits = digits.replace('_', "");
    u32::from_str_radix(&digits, 16).map_err(|e| format!("invalid address '{}': {}", text, e))
}

fn load_config(args: &Args) -> Result<EmulatorConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            EmulatorConfig::load(&path)?
        }
        None => EmulatorConfig::default(),
    };

    if args.fast_boot {
        config.cpu.fast_boot = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("n64rx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut system = System::with_config(&config);

    if let Some(rom) = &args.rom {
        if let Err(e) = system.load_rom(rom) {
            error!("Failed to load ROM: {}", e);
            return Err(e);
        }
    }

    if let Some(image) = &args.image {
        let bytes = std::fs::read(image)?;
        system.load_image(args.load_address, &bytes)?;
        system.cpu_mut().set_pc(args.load_address);
        info!(
            "Loaded {} ({} bytes) at 0x{:08X}",
            image.display(),
            bytes.len(),
            args.load_address
        );
    }

    if let Some(path) = &args.load_state {
        SaveState::load(path)?.apply(&mut system)?;
        info!("Restored state from {}", path.display());
    }

    info!("Starting emulation...");
    let result = match args.frames {
        Some(frames) => system.run_frame_loop(frames),
        None => system.step_cycles(args.cycles),
    };

    if let Err(e) = result {
        error!("Error at PC=0x{:08X}: {}", system.pc(), e);
        system.cpu().dump_registers();
        return Err(e);
    }

    info!("Total cycles: {}", system.cycles());
    info!("Final PC: 0x{:08X}", system.pc());
    system.cpu().dump_registers();

    if let Some(path) = &args.save_state {
        SaveState::capture(&system).save(path)?;
    }

    Ok(())
}
