// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory Bus Tests
//!
//! - `basic`: region identification and the fixed segment remap
//! - `bus`: RDRAM reads/writes at every width, endianness, bounds
//! - `mmio`: device routing, sub-word register lanes, ROM and PIF RAM
//! - `helpers`: Common test utilities

use super::*;

mod helpers;
mod mmio;
