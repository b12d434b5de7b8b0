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

//! Signal Processor (RSP) interface
//!
//! The RSP itself is not emulated. This device provides the 8 KB of local
//! memory (4 KB DMEM followed by 4 KB IMEM), the DMA engine that copies
//! between RDRAM and that memory, and a start-command stub that raises the
//! SP and DP interrupts as if a task had completed.
//!
//! ## Registers (base 0x0404_0000)
//!
//! - **MEM_ADDR** (0x00): local address; bit 12 selects IMEM. A write with
//!   bit 31 set is the start command.
//! - **DRAM_ADDR** (0x04): RDRAM address
//! - **RD_LEN** (0x08): DMA RDRAM -> local memory
//! - **WR_LEN** (0x0C): DMA local memory -> RDRAM
//! - **STATUS** (0x10): write bit 0 to acknowledge the SP interrupt
//!
//! Length registers: bits 11:0 length-1 (rounded up to 8 bytes), bits 19:12
//! row count-1, bits 31:20 RDRAM skip between rows.

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{SpState, StateSave};

/// Signal processor interface
pub struct Sp {
    /// DMEM (0x000-0xFFF) followed by IMEM (0x1000-0x1FFF)
    mem: Vec<u8>,
    mem_addr: u32,
    dram_addr: u32,
    rd_len: u32,
    wr_len: u32,
    status: u32,
    mi: MiHandle,
}

/// DMA direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ToLocal,
    ToRdram,
}

impl Sp {
    /// Physical base of DMEM/IMEM
    pub const MEM_BASE: u32 = 0x0400_0000;
    /// Size of DMEM + IMEM
    pub const MEM_SIZE: usize = 0x2000;
    /// Physical base of the register window
    pub const REG_BASE: u32 = 0x0404_0000;

    pub const MEM_ADDR: u32 = 0x00;
    pub const DRAM_ADDR: u32 = 0x04;
    pub const RD_LEN: u32 = 0x08;
    pub const WR_LEN: u32 = 0x0C;
    pub const STATUS: u32 = 0x10;

    /// STATUS.HALT, set at reset
    pub const STATUS_HALT: u32 = 1 << 0;
    /// MEM_ADDR bit that marks a start command
    pub const START_COMMAND: u32 = 1 << 31;

    pub fn new(mi: MiHandle) -> Self {
        Self {
            mem: vec![0u8; Self::MEM_SIZE],
            mem_addr: 0,
            dram_addr: 0,
            rd_len: 0,
            wr_len: 0,
            status: Self::STATUS_HALT,
            mi,
        }
    }

    pub fn reset(&mut self) {
        self.mem.fill(0);
        self.mem_addr = 0;
        self.dram_addr = 0;
        self.rd_len = 0;
        self.wr_len = 0;
        self.status = Self::STATUS_HALT;
    }

    /// DMEM + IMEM contents
    pub fn mem(&self) -> &[u8] {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut [u8] {
        &mut self.mem
    }

    pub fn read_mem8(&self, offset: u32) -> u8 {
        self.mem
            .get(offset as usize % Self::MEM_SIZE)
            .copied()
            .unwrap_or(0)
    }

    pub fn write_mem8(&mut self, offset: u32, value: u8) {
        self.mem[offset as usize % Self::MEM_SIZE] = value;
    }

    /// Simulate a completed RSP task: raise SP and DP
    pub fn start(&mut self) {
        log::debug!("SP start command (stub): raising SP and DP");
        self.mi.borrow_mut().raise(MiIntr::SP | MiIntr::DP);
    }

    /// Run a DMA described by a length register value
    fn dma(&mut self, value: u32, direction: Direction, mem: &mut Memory) {
        let length = ((value & 0xFFF) | 7) + 1;
        let count = ((value >> 12) & 0xFF) + 1;
        let skip = value >> 20;

        // Bank select (DMEM/IMEM) stays fixed; the offset wraps inside the bank
        let bank = self.mem_addr & 0x1000;
        let mut local = self.mem_addr & 0xFF8;
        let mut dram = self.dram_addr & 0x00FF_FFF8;

        log::debug!(
            "SP DMA {:?}: local=0x{:04X} dram=0x{:06X} len={} count={} skip={}",
            direction,
            bank | local,
            dram,
            length,
            count,
            skip
        );

        let mut row = vec![0u8; length as usize];
        for _ in 0..count {
            match direction {
                Direction::ToLocal => {
                    mem.read_rdram(dram, &mut row);
                    for (i, byte) in row.iter().enumerate() {
                        let offset = bank | ((local + i as u32) & 0xFFF);
                        self.mem[offset as usize] = *byte;
                    }
                }
                Direction::ToRdram => {
                    for (i, byte) in row.iter_mut().enumerate() {
                        let offset = bank | ((local + i as u32) & 0xFFF);
                        *byte = self.mem[offset as usize];
                    }
                    mem.write_rdram(dram, &row);
                }
            }
            local = (local + length) & 0xFFF;
            dram = dram.wrapping_add(length + skip) & 0x00FF_FFF8;
        }

        self.mem_addr = bank | local;
        self.dram_addr = dram;
    }
}

impl StateSave for Sp {
    type State = SpState;

    fn to_state(&self) -> SpState {
        SpState {
            mem: self.mem.clone(),
            mem_addr: self.mem_addr,
            dram_addr: self.dram_addr,
            rd_len: self.rd_len,
            wr_len: self.wr_len,
            status: self.status,
        }
    }

    fn restore_from_state(&mut self, state: &SpState) {
        let len = self.mem.len().min(state.mem.len());
        self.mem[..len].copy_from_slice(&state.mem[..len]);
        self.mem_addr = state.mem_addr;
        self.dram_addr = state.dram_addr;
        self.rd_len = state.rd_len;
        self.wr_len = state.wr_len;
        self.status = state.status;
    }
}

impl IODevice for Sp {
    fn address_range(&self) -> (u32, u32) {
        (Self::REG_BASE, Self::REG_BASE + 0x1F)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::MEM_ADDR => self.mem_addr,
            Self::DRAM_ADDR => self.dram_addr,
            Self::RD_LEN => self.rd_len,
            Self::WR_LEN => self.wr_len,
            Self::STATUS => self.status,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, mem: &mut Memory) {
        log::trace!("SP write 0x{:02X} = 0x{:08X}", offset, value);
        match offset {
            Self::MEM_ADDR => {
                if value & Self::START_COMMAND != 0 {
                    self.start();
                } else {
                    self.mem_addr = value & 0x1FF8;
                }
            }
            Self::DRAM_ADDR => self.dram_addr = value & 0x00FF_FFF8,
            Self::RD_LEN => {
                self.rd_len = value;
                self.dma(value, Direction::ToLocal, mem);
            }
            Self::WR_LEN => {
                self.wr_len = value;
                self.dma(value, Direction::ToRdram, mem);
            }
            Self::STATUS => {
                if value & 1 != 0 {
                    self.mi.borrow_mut().clear(MiIntr::SP);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "SP"
    }
}
