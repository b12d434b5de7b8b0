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

//! Display Processor (RDP) command interface
//!
//! Rasterization is out of scope. The registers latch the command buffer
//! pointers and `raise_interrupt` lets a caller signal "display list done".

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{DpState, StateSave};

/// Display processor command interface
pub struct Dp {
    start: u32,
    end: u32,
    current: u32,
    status: u32,
    mi: MiHandle,
}

impl Dp {
    /// Physical base of the register window
    pub const BASE: u32 = 0x0410_0000;

    pub const START: u32 = 0x00;
    pub const END: u32 = 0x04;
    pub const CURRENT: u32 = 0x08;
    pub const STATUS: u32 = 0x10;

    /// STATUS: pipe busy
    pub const PIPE_BUSY: u32 = 1 << 5;
    /// STATUS: command busy
    pub const CMD_BUSY: u32 = 1 << 6;

    pub fn new(mi: MiHandle) -> Self {
        Self {
            start: 0,
            end: 0,
            current: 0,
            status: 0,
            mi,
        }
    }

    pub fn reset(&mut self) {
        self.start = 0;
        self.end = 0;
        self.current = 0;
        self.status = 0;
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    /// Mark the pipeline busy and raise the DP interrupt
    pub fn raise_interrupt(&mut self) {
        self.status |= Self::CMD_BUSY | Self::PIPE_BUSY;
        self.mi.borrow_mut().raise(MiIntr::DP);
    }

    /// Command buffer (start, end)
    pub fn command_range(&self) -> (u32, u32) {
        (self.start, self.end)
    }
}

impl StateSave for Dp {
    type State = DpState;

    fn to_state(&self) -> DpState {
        DpState {
            start: self.start,
            end: self.end,
            current: self.current,
            status: self.status,
        }
    }

    fn restore_from_state(&mut self, state: &DpState) {
        self.start = state.start;
        self.end = state.end;
        self.current = state.current;
        self.status = state.status;
    }
}

impl IODevice for Dp {
    fn address_range(&self) -> (u32, u32) {
        (Self::BASE, Self::BASE + 0x1F)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::START => self.start,
            Self::END => self.end,
            Self::CURRENT => self.current,
            Self::STATUS => self.status,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, _mem: &mut Memory) {
        match offset {
            Self::START => {
                self.start = value & 0x00FF_FFF8;
                self.current = self.start;
            }
            Self::END => {
                self.end = value & 0x00FF_FFF8;
                self.current = self.end;
                log::debug!(
                    "DP command buffer 0x{:06X}-0x{:06X}",
                    self.start,
                    self.end
                );
            }
            Self::STATUS => {
                if value & 1 != 0 {
                    self.status &= !(Self::CMD_BUSY | Self::PIPE_BUSY);
                    self.mi.borrow_mut().clear(MiIntr::DP);
                }
            }
            Self::CURRENT => {
                log::warn!("Ignored write to read-only DP CURRENT register");
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "DP"
    }
}
