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

//! Emulator configuration
//!
//! Configuration is plain data deserialized from TOML. Every field has a
//! default, so an empty file (or no file at all) yields the strict,
//! hardware-faithful setup.
//!
//! # Example
//!
//! ```
//! use n64rx::core::config::EmulatorConfig;
//!
//! let config = EmulatorConfig::from_toml_str(
//!     r#"
//!     [cpu]
//!     fast_boot = true
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.cpu.fast_boot);
//! assert_eq!(config.rdram_size, 0x80_0000);
//! ```

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// RDRAM size in bytes
    pub rdram_size: usize,

    /// CPU behavior switches
    pub cpu: CpuConfig,

    /// System-level scheduling parameters
    pub system: SystemConfig,
}

/// CPU configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Treat unimplemented opcodes as no-ops and arm the exception-vector
    /// spin heuristic. Off by default.
    pub fast_boot: bool,

    /// Map user segment addresses (0x0000_0000-0x7FFF_FFFF) one-to-one
    /// instead of walking the TLB.
    pub identity_map_kuseg: bool,

    /// Stop emulation with an error on unimplemented opcodes.
    /// Takes precedence over `fast_boot`.
    pub halt_on_unknown: bool,

    /// Consecutive steps inside the general exception vector (with EXL set)
    /// before fast-boot forces a return to EPC.
    pub vector_spin_threshold: u32,

    /// PC after reset
    pub reset_pc: u32,
}

/// System configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Cycles (instructions) per video frame for the reference frame loop
    pub cycles_per_frame: u64,

    /// Amount added to Count when the frame loop re-arms Compare
    pub compare_rearm_delta: u32,

    /// Cycles between a PI/AI DMA kick and its completion interrupt.
    /// Zero leaves completion to explicit calls.
    pub dma_latency: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            rdram_size: 0x80_0000,
            cpu: CpuConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            fast_boot: false,
            identity_map_kuseg: false,
            halt_on_unknown: false,
            vector_spin_threshold: 256,
            reset_pc: 0xBFC0_0000,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // 93.75 MHz / 60 Hz, one instruction per cycle
            cycles_per_frame: 1_562_500,
            compare_rearm_delta: 0x0100_0000,
            dma_latency: 0,
        }
    }
}

impl EmulatorConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::Config` on malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a config error
    /// if it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
