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

//! MIPS Interface (MI) interrupt aggregator
//!
//! The MI collects one pending bit per RCP device and combines it with a
//! per-device mask to drive the CPU's external interrupt line (Cause.IP2).
//!
//! ## Registers (base 0x0430_0000)
//!
//! - **MODE** (0x00): writing 1 to any of bits 5:0 clears that pending bit
//! - **VERSION** (0x04): read-only
//! - **INTR** (0x08): pending bits, read-only
//! - **MASK** (0x0C): bits 5:0 set mask bits, bits 11:6 clear them
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit | Source | Description
//! ----|--------|------------------------------
//! 0   | SP     | Signal processor
//! 1   | SI     | Serial interface (PIF)
//! 2   | AI     | Audio interface
//! 3   | VI     | Video interface (vblank)
//! 4   | PI     | Peripheral interface (cart DMA)
//! 5   | DP     | Display processor
//! ```

use bitflags::bitflags;
use crate::core::save_state::{MiState, StateSave};
use std::cell::RefCell;
use std::rc::Rc;

bitflags! {
    /// MI interrupt source bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MiIntr: u32 {
        const SP = 1 << 0;
        const SI = 1 << 1;
        const AI = 1 << 2;
        const VI = 1 << 3;
        const PI = 1 << 4;
        const DP = 1 << 5;
    }
}

/// Shared handle given to each device so it can raise and clear its bit
pub type MiHandle = Rc<RefCell<Mi>>;

/// MIPS Interface
///
/// # Example
///
/// ```
/// use n64rx::core::interrupt::{Mi, MiIntr};
///
/// let mut mi = Mi::new();
///
/// // Raise VI, then enable it through the mask register
/// mi.raise(MiIntr::VI);
/// assert!(!mi.cpu_int_asserted());
/// mi.write_register(Mi::MASK, MiIntr::VI.bits());
/// assert!(mi.cpu_int_asserted());
///
/// // Clear through MODE (write-one-to-clear)
/// mi.write_register(Mi::MODE, MiIntr::VI.bits());
/// assert!(!mi.cpu_int_asserted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mi {
    /// MODE bits above the clear field (latched, no behavior)
    mode: u32,
    /// Pending bits
    intr: MiIntr,
    /// Enabled bits
    mask: MiIntr,
}

impl Mi {
    /// Physical base address
    pub const BASE: u32 = 0x0430_0000;
    /// Window size in bytes
    pub const SIZE: u32 = 0x10;

    pub const MODE: u32 = 0x00;
    pub const VERSION: u32 = 0x04;
    pub const INTR: u32 = 0x08;
    pub const MASK: u32 = 0x0C;

    /// VERSION register value (RSP, RDP, RAC, IO revisions)
    pub const VERSION_VALUE: u32 = 0x0202_0102;

    /// Create an MI with nothing pending and everything masked
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shareable MI handle
    pub fn shared() -> MiHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set pending bit(s)
    pub fn raise(&mut self, source: MiIntr) {
        self.intr |= source;
        log::trace!("MI raise {:?}, intr={:?}", source, self.intr);
    }

    /// Clear pending bit(s)
    pub fn clear(&mut self, source: MiIntr) {
        self.intr &= !source;
        log::trace!("MI clear {:?}, intr={:?}", source, self.intr);
    }

    /// Current pending bits
    pub fn pending(&self) -> MiIntr {
        self.intr
    }

    /// Current mask bits
    pub fn mask(&self) -> MiIntr {
        self.mask
    }

    /// External interrupt line to the CPU
    #[inline]
    pub fn cpu_int_asserted(&self) -> bool {
        self.intr.intersects(self.mask)
    }

    /// Read a register at `offset` within the MI window
    pub fn read_register(&self, offset: u32) -> u32 {
        match offset & !3 {
            Self::MODE => self.mode,
            Self::VERSION => Self::VERSION_VALUE,
            Self::INTR => self.intr.bits(),
            Self::MASK => self.mask.bits(),
            _ => 0,
        }
    }

    /// Write a register at `offset` within the MI window
    pub fn write_register(&mut self, offset: u32, value: u32) {
        match offset & !3 {
            Self::MODE => {
                self.intr &= !MiIntr::from_bits_truncate(value);
                self.mode = value & !0x3F;
            }
            Self::MASK => {
                // Set first, then clear: a write naming both leaves the bit clear
                self.mask |= MiIntr::from_bits_truncate(value);
                self.mask &= !MiIntr::from_bits_truncate(value >> 6);
                log::trace!("MI mask={:?}", self.mask);
            }
            Self::VERSION | Self::INTR => {
                log::warn!("Ignored write to read-only MI register 0x{:02X}", offset);
            }
            _ => {}
        }
    }
}

impl StateSave for Mi {
    type State = MiState;

    fn to_state(&self) -> MiState {
        MiState {
            mode: self.mode,
            intr: self.intr.bits(),
            mask: self.mask.bits(),
        }
    }

    fn restore_from_state(&mut self, state: &MiState) {
        self.mode = state.mode;
        self.intr = MiIntr::from_bits_truncate(state.intr);
        self.mask = MiIntr::from_bits_truncate(state.mask);
    }
}

#[cfg(test)]
mod tests;
