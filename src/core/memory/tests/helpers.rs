// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Test helpers for memory bus tests

use super::*;

/// Bus with a small RDRAM so out-of-range paths are easy to reach
pub fn create_small_bus(rdram_size: usize) -> Bus {
    let config = EmulatorConfig {
        rdram_size,
        ..EmulatorConfig::default()
    };
    Bus::with_config(&config)
}

/// Bus with a ROM whose byte `i` is `i as u8`
pub fn create_bus_with_rom(len: usize) -> Bus {
    let mut bus = Bus::new();
    bus.set_rom((0..len).map(|i| i as u8).collect());
    bus
}
