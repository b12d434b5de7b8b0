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

//! Memory-mapped register device trait
//!
//! Every RCP device exposes a small window of 32-bit registers at a fixed
//! physical base. The bus routes accesses that fall inside a window to the
//! device, passing the offset from the base and a mutable view of RDRAM and
//! the cartridge ROM for devices that perform DMA.
//!
//! Registers are big-endian words; sub-word reads pick a byte lane out of
//! the word, and sub-word writes are delivered as a full word with the value
//! shifted into its lane.
//!
//! # Example
//!
//! ```
//! use n64rx::core::memory::{IODevice, Memory};
//!
//! struct Latch {
//!     value: u32,
//! }
//!
//! impl IODevice for Latch {
//!     fn address_range(&self) -> (u32, u32) {
//!         (0x0470_0000, 0x0470_0003)
//!     }
//!
//!     fn read_register(&self, _offset: u32) -> u32 {
//!         self.value
//!     }
//!
//!     fn write_register(&mut self, _offset: u32, value: u32, _mem: &mut Memory) {
//!         self.value = value;
//!     }
//! }
//!
//! let mut latch = Latch { value: 0 };
//! let mut mem = Memory::new(0x100);
//! latch.write_register(0, 0x1234_5678, &mut mem);
//! assert_eq!(latch.read_register8(0), 0x12);
//! assert_eq!(latch.read_register16(2), 0x5678);
//! ```

use super::Memory;

/// Trait for devices with a memory-mapped register window
pub trait IODevice {
    /// Inclusive physical address range of the register window
    fn address_range(&self) -> (u32, u32);

    /// Check whether a physical address falls inside this device's window
    fn contains(&self, paddr: u32) -> bool {
        let (start, end) = self.address_range();
        (start..=end).contains(&paddr)
    }

    /// Read a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset from the window base (word aligned)
    fn read_register(&self, offset: u32) -> u32;

    /// Write a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset from the window base (word aligned)
    /// * `value` - Value written
    /// * `mem` - RDRAM and ROM, for DMA side effects
    fn write_register(&mut self, offset: u32, value: u32, mem: &mut Memory);

    /// Read a 16-bit half of a register (big-endian lanes)
    fn read_register16(&self, offset: u32) -> u16 {
        let value = self.read_register(offset & !0x03);
        let shift = 16 - (offset & 0x02) * 8;
        (value >> shift) as u16
    }

    /// Read one byte of a register (big-endian lanes)
    fn read_register8(&self, offset: u32) -> u8 {
        let value = self.read_register(offset & !0x03);
        let shift = 24 - (offset & 0x03) * 8;
        (value >> shift) as u8
    }

    /// Write a 16-bit value, shifted into its lane of the aligned word
    ///
    /// No read-modify-write is performed: the device sees a full-word
    /// write with the other lanes zero.
    fn write_register16(&mut self, offset: u32, value: u16, mem: &mut Memory) {
        let shift = 16 - (offset & 0x02) * 8;
        self.write_register(offset & !0x03, (value as u32) << shift, mem);
    }

    /// Write an 8-bit value, shifted into its lane of the aligned word
    fn write_register8(&mut self, offset: u32, value: u8, mem: &mut Memory) {
        let shift = 24 - (offset & 0x03) * 8;
        self.write_register(offset & !0x03, (value as u32) << shift, mem);
    }

    /// Device name for debugging
    fn name(&self) -> &str {
        "Unknown Device"
    }
}
