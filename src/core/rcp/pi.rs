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

//! Peripheral Interface (cartridge bus)
//!
//! ## Registers (base 0x0460_0000)
//!
//! - **DRAM_ADDR** (0x00)
//! - **CART_ADDR** (0x04): cartridge address, ROM starts at 0x1000_0000
//! - **RD_LEN** (0x08): copy `(len & 0xFFFFFF) + 1` bytes ROM -> RDRAM
//!   synchronously and go busy
//! - **WR_LEN** (0x0C): latched only (ROM is read-only)
//! - **STATUS** (0x10): write bit 0 to clear DMA busy and acknowledge the PI
//!   interrupt, bit 1 to clear IO busy

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{PiState, StateSave};

/// Peripheral interface
pub struct Pi {
    dram_addr: u32,
    cart_addr: u32,
    rd_len: u32,
    wr_len: u32,
    status: u32,
    dma_started: bool,
    mi: MiHandle,
}

impl Pi {
    /// Physical base of the register window
    pub const BASE: u32 = 0x0460_0000;
    /// Cartridge address of ROM byte 0
    pub const CART_ROM_BASE: u32 = 0x1000_0000;

    pub const DRAM_ADDR: u32 = 0x00;
    pub const CART_ADDR: u32 = 0x04;
    pub const RD_LEN: u32 = 0x08;
    pub const WR_LEN: u32 = 0x0C;
    pub const STATUS: u32 = 0x10;

    /// STATUS: DMA busy
    pub const DMA_BUSY: u32 = 1 << 0;
    /// STATUS: IO busy
    pub const IO_BUSY: u32 = 1 << 1;

    pub fn new(mi: MiHandle) -> Self {
        Self {
            dram_addr: 0,
            cart_addr: 0,
            rd_len: 0,
            wr_len: 0,
            status: 0,
            dma_started: false,
            mi,
        }
    }

    pub fn reset(&mut self) {
        self.dram_addr = 0;
        self.cart_addr = 0;
        self.rd_len = 0;
        self.wr_len = 0;
        self.status = 0;
        self.dma_started = false;
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    /// Finish the current DMA: clear busy and raise the PI interrupt
    pub fn complete_dma(&mut self) {
        self.status &= !(Self::DMA_BUSY | Self::IO_BUSY);
        self.mi.borrow_mut().raise(MiIntr::PI);
        log::trace!("PI DMA complete");
    }

    /// Report and clear the "DMA started" flag
    pub fn take_dma_started(&mut self) -> bool {
        std::mem::take(&mut self.dma_started)
    }

    fn rom_to_rdram(&mut self, value: u32, mem: &mut Memory) {
        let length = (value & 0x00FF_FFFF) + 1;
        let mut buffer = vec![0u8; length as usize];

        // Cart addresses below the ROM window read as zero
        if let Some(offset) = self.cart_addr.checked_sub(Self::CART_ROM_BASE) {
            mem.read_rom(offset, &mut buffer);
        }
        mem.write_rdram(self.dram_addr, &buffer);

        log::debug!(
            "PI DMA cart 0x{:08X} -> dram 0x{:06X}, {} bytes",
            self.cart_addr,
            self.dram_addr,
            length
        );

        self.dram_addr = self.dram_addr.wrapping_add(length) & 0x00FF_FFFF;
        self.cart_addr = self.cart_addr.wrapping_add(length);
        self.status |= Self::DMA_BUSY | Self::IO_BUSY;
        self.dma_started = true;
    }
}

impl StateSave for Pi {
    type State = PiState;

    fn to_state(&self) -> PiState {
        PiState {
            dram_addr: self.dram_addr,
            cart_addr: self.cart_addr,
            rd_len: self.rd_len,
            wr_len: self.wr_len,
            status: self.status,
        }
    }

    fn restore_from_state(&mut self, state: &PiState) {
        self.dram_addr = state.dram_addr;
        self.cart_addr = state.cart_addr;
        self.rd_len = state.rd_len;
        self.wr_len = state.wr_len;
        self.status = state.status;
        self.dma_started = false;
    }
}

impl IODevice for Pi {
    fn address_range(&self) -> (u32, u32) {
        (Self::BASE, Self::BASE + 0x33)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::DRAM_ADDR => self.dram_addr,
            Self::CART_ADDR => self.cart_addr,
            Self::RD_LEN => self.rd_len,
            Self::WR_LEN => self.wr_len,
            Self::STATUS => self.status,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, mem: &mut Memory) {
        match offset {
            Self::DRAM_ADDR => self.dram_addr = value & 0x00FF_FFFF,
            Self::CART_ADDR => self.cart_addr = value,
            Self::RD_LEN => {
                self.rd_len = value;
                self.rom_to_rdram(value, mem);
            }
            Self::WR_LEN => {
                self.wr_len = value;
                log::debug!("PI WR_LEN 0x{:08X} latched (ROM is read-only)", value);
            }
            Self::STATUS => {
                if value & 1 != 0 {
                    self.status &= !Self::DMA_BUSY;
                    self.mi.borrow_mut().clear(MiIntr::PI);
                }
                if value & 2 != 0 {
                    self.status &= !Self::IO_BUSY;
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "PI"
    }
}
