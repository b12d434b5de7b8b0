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

//! Save state serialization
//!
//! A save state captures everything needed to resume execution at a cycle
//! boundary:
//! - Metadata (timestamp, cycle, frame count)
//! - CPU state (GPRs, HI/LO, PC, branch in flight, LL link, COP0, TLB, COP1)
//! - RDRAM
//! - RCP device registers, SP DMEM/IMEM and PIF RAM
//!
//! Cartridge ROM, controller input, CPU configuration and queued scheduler
//! callbacks are not captured. Applying a state drops every queued event.
//!
//! # Save State Format
//!
//! States are encoded with bincode's serde support.
//!
//! # Version Compatibility
//!
//! Save states include a version number. Loading a state with a different
//! version fails with `EmulatorError::SaveStateVersion`.
//!
//! # Example
//!
//! ```
//! use n64rx::core::save_state::SaveState;
//! use n64rx::core::System;
//!
//! let mut system = System::new();
//! system.cpu_mut().set_reg(1, 42);
//!
//! let state = SaveState::capture(&system);
//! let bytes = state.to_bytes().unwrap();
//!
//! system.reset();
//! SaveState::from_bytes(&bytes).unwrap().apply(&mut system).unwrap();
//! assert_eq!(system.cpu().reg(1), 42);
//! ```

use crate::core::cpu::{BranchState, TlbEntry, TLB_ENTRIES};
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Bus;
use crate::core::system::System;
use bincode::config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Save state version for compatibility checking
///
/// Incremented whenever the format changes incompatibly.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete emulator save state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    pub metadata: SaveStateMetadata,

    pub cpu: CpuState,

    /// RDRAM contents
    pub rdram: Vec<u8>,

    pub devices: DeviceState,
}

/// When and where in emulated time the state was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    pub timestamp: DateTime<Utc>,

    /// Scheduler cycle at capture
    pub cycle: u64,

    /// VI frame counter at capture
    pub frame_count: u64,
}

/// CPU state (VR4300)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuState {
    pub regs: [u64; 32],
    pub pc: u32,
    pub hi: u64,
    pub lo: u64,
    /// Raw COP0 register file
    pub cop0: [u32; 32],
    pub tlb: [TlbEntry; TLB_ENTRIES],
    pub fpr: [u32; 32],
    pub fcr31: u32,
    /// Branch waiting for its delay slot or its commit
    pub branch: BranchState,
    pub ll_bit: bool,
    pub ll_addr: u32,
    pub ll_len: u32,
}

/// MIPS interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiState {
    pub mode: u32,
    pub intr: u32,
    pub mask: u32,
}

/// Signal processor registers and local memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpState {
    /// DMEM followed by IMEM
    pub mem: Vec<u8>,
    pub mem_addr: u32,
    pub dram_addr: u32,
    pub rd_len: u32,
    pub wr_len: u32,
    pub status: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpState {
    pub start: u32,
    pub end: u32,
    pub current: u32,
    pub status: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViState {
    pub status: u32,
    pub origin: u32,
    pub width: u32,
    pub frame_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    pub dram_addr: u32,
    pub len: u32,
    pub status: u32,
    pub last_buffer: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiState {
    pub dram_addr: u32,
    pub cart_addr: u32,
    pub rd_len: u32,
    pub wr_len: u32,
    pub status: u32,
}

/// Serial interface registers and PIF RAM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiState {
    pub dram_addr: u32,
    pub pif_addr: u32,
    pub status: u32,
    pub pif_ram: Vec<u8>,
}

/// Every RCP device on the bus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub mi: MiState,
    pub sp: SpState,
    pub dp: DpState,
    pub vi: ViState,
    pub ai: AiState,
    pub pi: PiState,
    pub si: SiState,
}

impl DeviceState {
    fn capture(bus: &Bus) -> Self {
        Self {
            mi: bus.mi().to_state(),
            sp: bus.sp.to_state(),
            dp: bus.dp.to_state(),
            vi: bus.vi.to_state(),
            ai: bus.ai.to_state(),
            pi: bus.pi.to_state(),
            si: bus.si.to_state(),
        }
    }

    fn restore(&self, bus: &mut Bus) {
        bus.mi_mut().restore_from_state(&self.mi);
        bus.sp.restore_from_state(&self.sp);
        bus.dp.restore_from_state(&self.dp);
        bus.vi.restore_from_state(&self.vi);
        bus.ai.restore_from_state(&self.ai);
        bus.pi.restore_from_state(&self.pi);
        bus.si.restore_from_state(&self.si);
    }
}

impl SaveState {
    /// Snapshot a system at its current cycle boundary
    pub fn capture(system: &System) -> Self {
        let bus = system.bus();

        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                cycle: system.cycles(),
                frame_count: bus.vi.frame_count(),
            },
            cpu: system.cpu().to_state(),
            rdram: bus.rdram().to_vec(),
            devices: DeviceState::capture(bus),
        }
    }

    /// Restore this state into `system`
    ///
    /// Queued scheduler events are dropped and the clock is set to the
    /// captured cycle.
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::SaveStateMismatch` if the RDRAM size differs;
    /// the system is left untouched in that case.
    pub fn apply(&self, system: &mut System) -> Result<()> {
        let rdram_size = system.bus().rdram().len();
        if self.rdram.len() != rdram_size {
            return Err(EmulatorError::SaveStateMismatch(format!(
                "state has {} bytes of RDRAM, system has {}",
                self.rdram.len(),
                rdram_size
            )));
        }

        system.cpu_mut().restore_from_state(&self.cpu);

        let bus = system.bus_mut();
        bus.rdram_mut().copy_from_slice(&self.rdram);
        self.devices.restore(bus);

        system.scheduler_mut().restore_cycle(self.metadata.cycle);

        log::info!(
            "Save state from {} applied (cycle {})",
            self.metadata.timestamp.to_rfc3339(),
            self.metadata.cycle
        );
        Ok(())
    }

    /// Encode with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serde::encode_to_vec(self, config::standard())?)
    }

    /// Decode and check the version
    ///
    /// # Errors
    ///
    /// `EmulatorError::SaveStateDecode` for malformed input,
    /// `EmulatorError::SaveStateVersion` for a different format version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) =
            bincode::serde::decode_from_slice(bytes, config::standard())?;

        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::SaveStateVersion {
                expected: SAVE_STATE_VERSION,
                got: state.version,
            });
        }

        Ok(state)
    }

    /// Save state to file
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use n64rx::core::{System, save_state::SaveState};
    /// # let system = System::new();
    /// SaveState::capture(&system).save("slot0.state").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        std::fs::write(path.as_ref(), &encoded)?;
        log::info!(
            "Saved state to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load state from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

/// Components that can be saved and restored
///
/// Implemented next to each component so the snapshot can reach its
/// private registers.
///
/// # Example
///
/// ```
/// use n64rx::core::interrupt::{Mi, MiIntr};
/// use n64rx::core::save_state::StateSave;
///
/// let mut mi = Mi::new();
/// mi.raise(MiIntr::VI);
/// let state = mi.to_state();
///
/// let mut restored = Mi::new();
/// restored.restore_from_state(&state);
/// assert_eq!(restored.pending(), MiIntr::VI);
/// ```
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    fn restore_from_state(&mut self, state: &Self::State);
}
