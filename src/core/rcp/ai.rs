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

//! Audio Interface
//!
//! Writing LEN starts a (simulated) DMA of a sample buffer: the device goes
//! busy and remembers the buffer for a consumer. `complete_dma` finishes it.

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{AiState, StateSave};

/// Audio interface
pub struct Ai {
    dram_addr: u32,
    len: u32,
    status: u32,
    last_buffer: Option<(u32, u32)>,
    dma_started: bool,
    mi: MiHandle,
}

impl Ai {
    /// Physical base of the register window
    pub const BASE: u32 = 0x0450_0000;

    pub const DRAM_ADDR: u32 = 0x00;
    pub const LEN: u32 = 0x04;
    pub const STATUS: u32 = 0x0C;

    /// STATUS: DMA busy
    pub const BUSY: u32 = 1 << 30;

    pub fn new(mi: MiHandle) -> Self {
        Self {
            dram_addr: 0,
            len: 0,
            status: 0,
            last_buffer: None,
            dma_started: false,
            mi,
        }
    }

    pub fn reset(&mut self) {
        self.dram_addr = 0;
        self.len = 0;
        self.status = 0;
        self.last_buffer = None;
        self.dma_started = false;
    }

    pub fn busy(&self) -> bool {
        self.status & Self::BUSY != 0
    }

    /// Finish the current DMA: clear busy and raise the AI interrupt
    pub fn complete_dma(&mut self) {
        self.status &= !Self::BUSY;
        self.mi.borrow_mut().raise(MiIntr::AI);
        log::trace!("AI DMA complete");
    }

    /// Last buffer handed to the AI as (RDRAM address, length)
    pub fn last_buffer(&self) -> Option<(u32, u32)> {
        self.last_buffer
    }

    /// Report and clear the "DMA started" flag
    pub fn take_dma_started(&mut self) -> bool {
        std::mem::take(&mut self.dma_started)
    }
}

impl StateSave for Ai {
    type State = AiState;

    fn to_state(&self) -> AiState {
        AiState {
            dram_addr: self.dram_addr,
            len: self.len,
            status: self.status,
            last_buffer: self.last_buffer,
        }
    }

    fn restore_from_state(&mut self, state: &AiState) {
        self.dram_addr = state.dram_addr;
        self.len = state.len;
        self.status = state.status;
        self.last_buffer = state.last_buffer;
        self.dma_started = false;
    }
}

impl IODevice for Ai {
    fn address_range(&self) -> (u32, u32) {
        (Self::BASE, Self::BASE + 0x17)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::DRAM_ADDR => self.dram_addr,
            Self::LEN => self.len,
            Self::STATUS => self.status,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, _mem: &mut Memory) {
        match offset {
            Self::DRAM_ADDR => self.dram_addr = value & 0x00FF_FFF8,
            Self::LEN => {
                self.len = value & 0x0003_FFF8;
                self.status |= Self::BUSY;
                self.last_buffer = Some((self.dram_addr, self.len));
                self.dma_started = true;
                log::debug!("AI DMA 0x{:06X} len={}", self.dram_addr, self.len);
            }
            Self::STATUS => {
                if value & 1 != 0 {
                    self.status &= !Self::BUSY;
                    self.mi.borrow_mut().clear(MiIntr::AI);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "AI"
    }
}
