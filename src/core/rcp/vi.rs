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

//! Video Interface
//!
//! Holds the framebuffer origin and width and generates the vblank
//! interrupt. Scan-out itself is left to the frontend.

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{StateSave, ViState};

/// Video interface
pub struct Vi {
    status: u32,
    origin: u32,
    width: u32,
    frame_count: u64,
    mi: MiHandle,
}

impl Vi {
    /// Physical base of the register window
    pub const BASE: u32 = 0x0440_0000;

    pub const STATUS: u32 = 0x10;
    pub const ORIGIN: u32 = 0x14;
    pub const WIDTH: u32 = 0x18;

    /// STATUS: vertical interrupt pending
    pub const VINT: u32 = 1 << 0;

    pub fn new(mi: MiHandle) -> Self {
        Self {
            status: 0,
            origin: 0,
            width: 0,
            frame_count: 0,
            mi,
        }
    }

    pub fn reset(&mut self) {
        self.status = 0;
        self.origin = 0;
        self.width = 0;
        self.frame_count = 0;
    }

    /// Signal the start of vertical blank
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::interrupt::{Mi, MiIntr};
    /// use n64rx::core::rcp::Vi;
    ///
    /// let mi = Mi::shared();
    /// let mut vi = Vi::new(mi.clone());
    /// vi.vblank();
    ///
    /// assert!(mi.borrow().pending().contains(MiIntr::VI));
    /// assert_eq!(vi.frame_count(), 1);
    /// ```
    pub fn vblank(&mut self) {
        self.status |= Self::VINT;
        self.frame_count += 1;
        self.mi.borrow_mut().raise(MiIntr::VI);
        log::trace!("VI vblank #{}", self.frame_count);
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    /// Framebuffer origin in RDRAM
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Framebuffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of vblanks signalled since reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl StateSave for Vi {
    type State = ViState;

    fn to_state(&self) -> ViState {
        ViState {
            status: self.status,
            origin: self.origin,
            width: self.width,
            frame_count: self.frame_count,
        }
    }

    fn restore_from_state(&mut self, state: &ViState) {
        self.status = state.status;
        self.origin = state.origin;
        self.width = state.width;
        self.frame_count = state.frame_count;
    }
}

impl IODevice for Vi {
    fn address_range(&self) -> (u32, u32) {
        (Self::BASE, Self::BASE + 0x37)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::STATUS => self.status,
            Self::ORIGIN => self.origin,
            Self::WIDTH => self.width,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, _mem: &mut Memory) {
        match offset {
            Self::STATUS => {
                // Bits other than VINT are control bits and latch as written
                self.status = (self.status & Self::VINT) | (value & !Self::VINT);
                if value & Self::VINT != 0 {
                    self.status &= !Self::VINT;
                    self.mi.borrow_mut().clear(MiIntr::VI);
                }
            }
            Self::ORIGIN => self.origin = value & 0x00FF_FFFF,
            Self::WIDTH => self.width = value & 0xFFF,
            _ => log::trace!("VI write 0x{:02X} = 0x{:08X} ignored", offset, value),
        }
    }

    fn name(&self) -> &str {
        "VI"
    }
}
