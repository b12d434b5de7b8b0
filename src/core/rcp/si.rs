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

//! Serial Interface and PIF RAM
//!
//! The SI moves 64-byte blocks between RDRAM and the PIF's RAM. After a
//! write kick (RDRAM -> PIF) a small command interpreter runs against PIF
//! RAM byte 0, standing in for the PIF microcontroller:
//!
//! | Command | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | 0x00    | no-op                                                      |
//! | 0x01    | acknowledge: `pif[1] = 0x01`                               |
//! | 0x02    | echo: `pif[2] = pif[1]`                                    |
//! | 0x10    | controller status: `pif[1..4] = [0x05, 0x00, 0x02]`        |
//! | 0x11    | controller state for port `pif[63]`: `pif[1] = 0x00`,       |
//! |         | `pif[2..4]` = buttons (BE), `pif[4]` = X, `pif[5]` = Y      |
//!
//! A state request for a disconnected port answers `pif[1] = 0x80`.
//! Both kick directions raise the SI interrupt synchronously.

use crate::core::interrupt::{MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};
use crate::core::save_state::{SiState, StateSave};

/// Size of PIF RAM in bytes
pub const PIF_RAM_SIZE: usize = 64;

/// Number of controller ports
pub const CONTROLLER_PORTS: usize = 4;

/// Input state of one controller port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    pub connected: bool,
    pub buttons: u16,
    pub stick_x: i8,
    pub stick_y: i8,
}

impl ControllerState {
    /// Controller plugged into port 0 at power-on
    pub const fn default_port0() -> Self {
        Self {
            connected: true,
            buttons: 0x1234,
            stick_x: 5,
            stick_y: -5,
        }
    }
}

/// PIF command codes understood by the interpreter
mod command {
    pub const NOP: u8 = 0x00;
    pub const ACK: u8 = 0x01;
    pub const ECHO: u8 = 0x02;
    pub const CONTROLLER_STATUS: u8 = 0x10;
    pub const CONTROLLER_STATE: u8 = 0x11;
}

/// Serial interface
pub struct Si {
    dram_addr: u32,
    pif_addr: u32,
    status: u32,
    pif_ram: [u8; PIF_RAM_SIZE],
    controllers: [ControllerState; CONTROLLER_PORTS],
    mi: MiHandle,
}

impl Si {
    /// Physical base of the register window
    pub const BASE: u32 = 0x0480_0000;
    /// Physical base of PIF RAM
    pub const PIF_RAM_BASE: u32 = 0x1FC0_07C0;

    pub const DRAM_ADDR: u32 = 0x00;
    pub const PIF_RD64: u32 = 0x04;
    pub const PIF_WR64: u32 = 0x10;
    pub const STATUS: u32 = 0x18;

    /// STATUS: interrupt pending
    pub const STATUS_INTERRUPT: u32 = 1 << 12;

    /// Index of the port-select byte
    pub const PORT_SELECT: usize = PIF_RAM_SIZE - 1;

    pub fn new(mi: MiHandle) -> Self {
        let mut controllers = [ControllerState::default(); CONTROLLER_PORTS];
        controllers[0] = ControllerState::default_port0();

        Self {
            dram_addr: 0,
            pif_addr: 0,
            status: 0,
            pif_ram: [0u8; PIF_RAM_SIZE],
            controllers,
            mi,
        }
    }

    /// Reset registers and PIF RAM
    ///
    /// Controller state is input from the host and survives reset.
    pub fn reset(&mut self) {
        self.dram_addr = 0;
        self.pif_addr = 0;
        self.status = 0;
        self.pif_ram = [0u8; PIF_RAM_SIZE];
    }

    pub fn pif_ram(&self) -> &[u8; PIF_RAM_SIZE] {
        &self.pif_ram
    }

    pub fn pif_ram_mut(&mut self) -> &mut [u8; PIF_RAM_SIZE] {
        &mut self.pif_ram
    }

    pub fn read_pif8(&self, offset: u32) -> u8 {
        self.pif_ram[offset as usize % PIF_RAM_SIZE]
    }

    pub fn write_pif8(&mut self, offset: u32, value: u8) {
        self.pif_ram[offset as usize % PIF_RAM_SIZE] = value;
    }

    pub fn dram_addr(&self) -> u32 {
        self.dram_addr
    }

    pub fn set_dram_addr(&mut self, addr: u32) {
        self.dram_addr = addr & 0x00FF_FFFF;
    }

    /// Replace the input state of a port
    ///
    /// Ports outside 0..4 are ignored.
    pub fn set_controller(&mut self, port: usize, state: ControllerState) {
        match self.controllers.get_mut(port) {
            Some(slot) => *slot = state,
            None => log::warn!("SI: controller port {} does not exist", port),
        }
    }

    pub fn controller(&self, port: usize) -> Option<&ControllerState> {
        self.controllers.get(port)
    }

    /// Copy 64 bytes RDRAM -> PIF RAM, run the command, raise SI
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::interrupt::Mi;
    /// use n64rx::core::memory::Memory;
    /// use n64rx::core::rcp::Si;
    ///
    /// let mut mem = Memory::new(0x1000);
    /// let mut si = Si::new(Mi::shared());
    ///
    /// mem.write_rdram(0x100, &[0x11]);
    /// si.set_dram_addr(0x100);
    /// si.kick_write_64b(&mut mem);
    ///
    /// assert_eq!(&si.pif_ram()[1..6], &[0x00, 0x12, 0x34, 0x05, 0xFB]);
    /// ```
    pub fn kick_write_64b(&mut self, mem: &mut Memory) {
        mem.read_rdram(self.dram_addr, &mut self.pif_ram);
        log::debug!("SI: RDRAM 0x{:06X} -> PIF RAM", self.dram_addr);
        self.run_command();
        self.raise();
    }

    /// Copy 64 bytes PIF RAM -> RDRAM and raise SI
    pub fn kick_read_64b(&mut self, mem: &mut Memory) {
        mem.write_rdram(self.dram_addr, &self.pif_ram);
        log::debug!("SI: PIF RAM -> RDRAM 0x{:06X}", self.dram_addr);
        self.raise();
    }

    fn raise(&mut self) {
        self.status |= Self::STATUS_INTERRUPT;
        self.mi.borrow_mut().raise(MiIntr::SI);
    }

    fn run_command(&mut self) {
        let pif = &mut self.pif_ram;
        match pif[0] {
            command::NOP => {}
            command::ACK => pif[1] = 0x01,
            command::ECHO => pif[2] = pif[1],
            command::CONTROLLER_STATUS => pif[1..4].copy_from_slice(&[0x05, 0x00, 0x02]),
            command::CONTROLLER_STATE => {
                let port = pif[Self::PORT_SELECT] as usize;
                match self.controllers.get(port) {
                    Some(state) if state.connected => {
                        let [hi, lo] = state.buttons.to_be_bytes();
                        pif[1] = 0x00;
                        pif[2] = hi;
                        pif[3] = lo;
                        pif[4] = state.stick_x as u8;
                        pif[5] = state.stick_y as u8;
                    }
                    _ => pif[1] = 0x80,
                }
            }
            other => log::trace!("SI: unhandled PIF command 0x{:02X}", other),
        }
    }
}

/// Controller input is host state and is not part of a snapshot
impl StateSave for Si {
    type State = SiState;

    fn to_state(&self) -> SiState {
        SiState {
            dram_addr: self.dram_addr,
            pif_addr: self.pif_addr,
            status: self.status,
            pif_ram: self.pif_ram.to_vec(),
        }
    }

    fn restore_from_state(&mut self, state: &SiState) {
        self.dram_addr = state.dram_addr;
        self.pif_addr = state.pif_addr;
        self.status = state.status;
        let len = state.pif_ram.len().min(PIF_RAM_SIZE);
        self.pif_ram = [0u8; PIF_RAM_SIZE];
        self.pif_ram[..len].copy_from_slice(&state.pif_ram[..len]);
    }
}

impl IODevice for Si {
    fn address_range(&self) -> (u32, u32) {
        (Self::BASE, Self::BASE + 0x1B)
    }

    fn read_register(&self, offset: u32) -> u32 {
        match offset {
            Self::DRAM_ADDR => self.dram_addr,
            Self::PIF_RD64 | Self::PIF_WR64 => self.pif_addr,
            Self::STATUS => self.status,
            _ => 0,
        }
    }

    fn write_register(&mut self, offset: u32, value: u32, mem: &mut Memory) {
        match offset {
            Self::DRAM_ADDR => self.set_dram_addr(value),
            Self::PIF_RD64 => {
                self.pif_addr = value;
                self.kick_read_64b(mem);
            }
            Self::PIF_WR64 => {
                self.pif_addr = value;
                self.kick_write_64b(mem);
            }
            Self::STATUS => {
                if value & 1 != 0 {
                    self.status &= !Self::STATUS_INTERRUPT;
                    self.mi.borrow_mut().clear(MiIntr::SI);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "SI"
    }
}
