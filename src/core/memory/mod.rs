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

//! Memory bus implementation
//!
//! The Bus owns RDRAM, the cartridge ROM and every RCP device, and routes
//! physical accesses to them. All data is big-endian.
//!
//! # Memory Map
//!
//! | Physical Address Range  | Region        | Access |
//! |-------------------------|---------------|--------|
//! | 0x00000000-0x03EFFFFF   | RDRAM         | R/W    |
//! | 0x04000000-0x0403FFFF   | SP DMEM/IMEM  | R/W    |
//! | 0x04040000-0x040FFFFF   | SP registers  | R/W    |
//! | 0x04100000-0x041FFFFF   | DP registers  | R/W    |
//! | 0x04300000-0x043FFFFF   | MI registers  | R/W    |
//! | 0x04400000-0x044FFFFF   | VI registers  | R/W    |
//! | 0x04500000-0x045FFFFF   | AI registers  | R/W    |
//! | 0x04600000-0x046FFFFF   | PI registers  | R/W    |
//! | 0x04800000-0x048FFFFF   | SI registers  | R/W    |
//! | 0x10000000-0x1FBFFFFF   | Cartridge ROM | R only |
//! | 0x1FC007C0-0x1FC007FF   | PIF RAM       | R/W    |
//!
//! Accesses outside every region, or beyond the end of RDRAM/ROM, read as
//! zero and discard writes. The bus never faults: alignment and segment
//! checks happen in the CPU.
//!
//! # Example
//!
//! ```
//! use n64rx::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//!
//! // Write to RDRAM via KSEG0
//! bus.write32(0x8000_0000, 0x1234_5678);
//!
//! // Read the same location via KSEG1 and physically
//! assert_eq!(bus.read32(0xA000_0000), 0x1234_5678);
//! assert_eq!(bus.read32_phys(0x0000_0000), 0x1234_5678);
//! ```

mod io_device;
mod region;

#[cfg(test)]
mod tests;

pub use io_device::IODevice;
pub use region::MemoryRegion;

use crate::core::bitops;
use crate::core::config::EmulatorConfig;
use crate::core::error::{EmulatorError, Result};
use crate::core::interrupt::{Mi, MiHandle, MiIntr};
use crate::core::rcp::{Ai, Dp, Pi, Si, Sp, Vi};
use std::cell::{Ref, RefMut};

/// RDRAM and cartridge ROM storage
///
/// Handed to devices on register writes so DMA engines can copy to and
/// from main memory without holding a reference to the whole bus.
pub struct Memory {
    rdram: Vec<u8>,
    rom: Vec<u8>,
}

impl Memory {
    /// Create zeroed RDRAM of `rdram_size` bytes and an empty ROM
    pub fn new(rdram_size: usize) -> Self {
        Self {
            rdram: vec![0u8; rdram_size],
            rom: Vec::new(),
        }
    }

    pub fn rdram(&self) -> &[u8] {
        &self.rdram
    }

    pub fn rdram_mut(&mut self) -> &mut [u8] {
        &mut self.rdram
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    pub fn set_rom(&mut self, data: Vec<u8>) {
        self.rom = data;
    }

    /// Fill `buf` from RDRAM starting at `addr`
    ///
    /// Bytes past the end of RDRAM read as zero.
    pub fn read_rdram(&self, addr: u32, buf: &mut [u8]) {
        copy_out(&self.rdram, addr as usize, buf);
    }

    /// Copy `data` into RDRAM starting at `addr`
    ///
    /// Bytes past the end of RDRAM are discarded.
    pub fn write_rdram(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        if start >= self.rdram.len() {
            log::trace!("RDRAM write at 0x{:08X} out of range, discarded", addr);
            return;
        }
        let len = data.len().min(self.rdram.len() - start);
        self.rdram[start..start + len].copy_from_slice(&data[..len]);
    }

    /// Fill `buf` from ROM starting at `offset`; bytes past the end read as zero
    pub fn read_rom(&self, offset: u32, buf: &mut [u8]) {
        copy_out(&self.rom, offset as usize, buf);
    }

    fn clear_rdram(&mut self) {
        self.rdram.fill(0);
    }
}

fn copy_out(src: &[u8], start: usize, buf: &mut [u8]) {
    match src.get(start..start.saturating_add(buf.len())) {
        Some(slice) => buf.copy_from_slice(slice),
        None => {
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = src.get(start + i).copied().unwrap_or(0);
            }
        }
    }
}

/// Memory bus managing all memory accesses
///
/// The devices are public so callers can drive transactions directly
/// (`bus.vi.vblank()`, `bus.dp.raise_interrupt()`). Each device holds a
/// handle to the shared MI so raising a pending bit is visible to
/// [`Bus::interrupt_asserted`] immediately.
pub struct Bus {
    /// RDRAM and cartridge ROM
    pub mem: Memory,

    mi: MiHandle,

    pub sp: Sp,
    pub dp: Dp,
    pub vi: Vi,
    pub ai: Ai,
    pub pi: Pi,
    pub si: Si,
}

impl Bus {
    pub(crate) const RDRAM_START: u32 = 0x0000_0000;
    pub(crate) const RDRAM_END: u32 = 0x03EF_FFFF;

    pub(crate) const SP_MEM_START: u32 = Sp::MEM_BASE;
    pub(crate) const SP_MEM_END: u32 = 0x0403_FFFF;

    pub(crate) const SP_REGS_START: u32 = Sp::REG_BASE;
    pub(crate) const SP_REGS_END: u32 = 0x040F_FFFF;

    pub(crate) const DP_REGS_START: u32 = Dp::BASE;
    pub(crate) const DP_REGS_END: u32 = 0x041F_FFFF;

    pub(crate) const MI_REGS_START: u32 = Mi::BASE;
    pub(crate) const MI_REGS_END: u32 = 0x043F_FFFF;

    pub(crate) const VI_REGS_START: u32 = Vi::BASE;
    pub(crate) const VI_REGS_END: u32 = 0x044F_FFFF;

    pub(crate) const AI_REGS_START: u32 = Ai::BASE;
    pub(crate) const AI_REGS_END: u32 = 0x045F_FFFF;

    pub(crate) const PI_REGS_START: u32 = Pi::BASE;
    pub(crate) const PI_REGS_END: u32 = 0x046F_FFFF;

    pub(crate) const SI_REGS_START: u32 = Si::BASE;
    pub(crate) const SI_REGS_END: u32 = 0x048F_FFFF;

    pub(crate) const ROM_START: u32 = Pi::CART_ROM_BASE;
    pub(crate) const ROM_END: u32 = 0x1FBF_FFFF;

    pub(crate) const PIF_RAM_START: u32 = Si::PIF_RAM_BASE;
    pub(crate) const PIF_RAM_END: u32 = 0x1FC0_07FF;

    /// Create a new Bus with the default configuration (8 MB RDRAM)
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::Bus;
    ///
    /// let bus = Bus::new();
    /// assert_eq!(bus.rdram().len(), 8 * 1024 * 1024);
    /// ```
    pub fn new() -> Self {
        Self::with_config(&EmulatorConfig::default())
    }

    /// Create a new Bus sized according to `config`
    pub fn with_config(config: &EmulatorConfig) -> Self {
        let mi = Mi::shared();

        Self {
            mem: Memory::new(config.rdram_size),
            sp: Sp::new(mi.clone()),
            dp: Dp::new(mi.clone()),
            vi: Vi::new(mi.clone()),
            ai: Ai::new(mi.clone()),
            pi: Pi::new(mi.clone()),
            si: Si::new(mi.clone()),
            mi,
        }
    }

    /// Reset the bus to its initial state
    ///
    /// Clears RDRAM and resets every device and the MI.
    /// ROM contents and controller input are preserved.
    pub fn reset(&mut self) {
        self.mem.clear_rdram();
        self.mi.borrow_mut().reset();
        self.sp.reset();
        self.dp.reset();
        self.vi.reset();
        self.ai.reset();
        self.pi.reset();
        self.si.reset();
    }

    /// Load a cartridge ROM image from a file
    ///
    /// The image is used as-is (big-endian byte order expected).
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::RomNotFound` if the file cannot be opened.
    pub fn load_rom(&mut self, path: &str) -> Result<()> {
        let data =
            std::fs::read(path).map_err(|_| EmulatorError::RomNotFound(path.to_string()))?;
        log::info!("Loaded ROM {} ({} bytes)", path, data.len());
        self.mem.set_rom(data);
        Ok(())
    }

    /// Replace the cartridge ROM contents
    pub fn set_rom(&mut self, data: Vec<u8>) {
        self.mem.set_rom(data);
    }

    pub fn rdram(&self) -> &[u8] {
        self.mem.rdram()
    }

    pub fn rdram_mut(&mut self) -> &mut [u8] {
        self.mem.rdram_mut()
    }

    /// Borrow the MI
    pub fn mi(&self) -> Ref<'_, Mi> {
        self.mi.borrow()
    }

    /// Mutably borrow the MI
    pub fn mi_mut(&self) -> RefMut<'_, Mi> {
        self.mi.borrow_mut()
    }

    /// Shared MI handle, for components built outside the bus
    pub fn mi_handle(&self) -> MiHandle {
        self.mi.clone()
    }

    /// State of the CPU's external interrupt line (MI pending & mask)
    pub fn interrupt_asserted(&self) -> bool {
        self.mi.borrow().cpu_int_asserted()
    }

    /// Drop every MI pending bit without touching device status registers
    pub fn clear_all_interrupts(&mut self) {
        self.mi.borrow_mut().clear(MiIntr::all());
    }

    /// RDRAM -> PIF RAM transfer followed by the PIF command
    pub fn si_kick_write_64b(&mut self) {
        self.si.kick_write_64b(&mut self.mem);
    }

    /// PIF RAM -> RDRAM transfer
    pub fn si_kick_read_64b(&mut self) {
        self.si.kick_read_64b(&mut self.mem);
    }

    /// Devices whose DMA was started since the last call
    ///
    /// Only PI and AI report kicks; their completion is left to the caller
    /// (see `System`).
    pub fn take_dma_kicks(&mut self) -> MiIntr {
        let mut kicks = MiIntr::empty();
        if self.pi.take_dma_started() {
            kicks |= MiIntr::PI;
        }
        if self.ai.take_dma_started() {
            kicks |= MiIntr::AI;
        }
        kicks
    }

    // Virtual-adjacent accessors: fixed KSEG0/KSEG1 remap, then physical.

    pub fn read8(&self, vaddr: u32) -> u8 {
        self.read8_phys(Self::virt_to_phys(vaddr))
    }

    pub fn read16(&self, vaddr: u32) -> u16 {
        self.read16_phys(Self::virt_to_phys(vaddr))
    }

    /// Read a 32-bit word through the fixed segment remap
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.write32(0xA000_0100, 0xDEAD_BEEF);
    /// assert_eq!(bus.read32(0x8000_0100), 0xDEAD_BEEF);
    /// assert_eq!(bus.read16(0x8000_0102), 0xBEEF);
    /// assert_eq!(bus.read8(0x8000_0100), 0xDE);
    /// ```
    pub fn read32(&self, vaddr: u32) -> u32 {
        self.read32_phys(Self::virt_to_phys(vaddr))
    }

    pub fn write8(&mut self, vaddr: u32, value: u8) {
        self.write8_phys(Self::virt_to_phys(vaddr), value);
    }

    pub fn write16(&mut self, vaddr: u32, value: u16) {
        self.write16_phys(Self::virt_to_phys(vaddr), value);
    }

    pub fn write32(&mut self, vaddr: u32, value: u32) {
        self.write32_phys(Self::virt_to_phys(vaddr), value);
    }

    // Physical accessors

    pub fn read8_phys(&self, paddr: u32) -> u8 {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        match region {
            MemoryRegion::MiRegs => {
                let word = self.mi.borrow().read_register(offset & !0x03);
                (word >> (24 - (offset & 0x03) * 8)) as u8
            }
            _ => match self.device(region) {
                Some(device) => device.read_register8(offset),
                None => {
                    let mut buf = [0u8; 1];
                    self.read_bytes(region, offset, &mut buf);
                    buf[0]
                }
            },
        }
    }

    pub fn read16_phys(&self, paddr: u32) -> u16 {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        match region {
            MemoryRegion::MiRegs => {
                let word = self.mi.borrow().read_register(offset & !0x03);
                (word >> (16 - (offset & 0x02) * 8)) as u16
            }
            _ => match self.device(region) {
                Some(device) => device.read_register16(offset),
                None => {
                    let mut buf = [0u8; 2];
                    self.read_bytes(region, offset, &mut buf);
                    bitops::read_be_u16(&buf, 0)
                }
            },
        }
    }

    pub fn read32_phys(&self, paddr: u32) -> u32 {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        match region {
            MemoryRegion::MiRegs => self.mi.borrow().read_register(offset & !0x03),
            _ => match self.device(region) {
                Some(device) => device.read_register(offset & !0x03),
                None => {
                    let mut buf = [0u8; 4];
                    self.read_bytes(region, offset, &mut buf);
                    bitops::read_be_u32(&buf, 0)
                }
            },
        }
    }

    /// Read a doubleword as two big-endian words
    pub fn read64_phys(&self, paddr: u32) -> u64 {
        let hi = self.read32_phys(paddr);
        let lo = self.read32_phys(paddr.wrapping_add(4));
        bitops::join_u64(hi, lo)
    }

    pub fn write8_phys(&mut self, paddr: u32, value: u8) {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        match region {
            MemoryRegion::MiRegs => {
                let word = (value as u32) << (24 - (offset & 0x03) * 8);
                self.mi.borrow_mut().write_register(offset & !0x03, word);
            }
            _ if Self::is_device(region) => {
                self.with_device(region, |device, mem| {
                    device.write_register8(offset, value, mem)
                });
            }
            _ => self.write_bytes(region, offset, &[value]),
        }
    }

    pub fn write16_phys(&mut self, paddr: u32, value: u16) {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        match region {
            MemoryRegion::MiRegs => {
                let word = (value as u32) << (16 - (offset & 0x02) * 8);
                self.mi.borrow_mut().write_register(offset & !0x03, word);
            }
            _ if Self::is_device(region) => {
                self.with_device(region, |device, mem| {
                    device.write_register16(offset, value, mem)
                });
            }
            _ => self.write_bytes(region, offset, &value.to_be_bytes()),
        }
    }

    pub fn write32_phys(&mut self, paddr: u32, value: u32) {
        let region = Self::identify_region(paddr);
        let offset = paddr - region.base();
        log::trace!("write32 0x{:08X} = 0x{:08X} ({:?})", paddr, value, region);
        match region {
            MemoryRegion::MiRegs => self.mi.borrow_mut().write_register(offset & !0x03, value),
            _ if Self::is_device(region) => {
                self.with_device(region, |device, mem| {
                    device.write_register(offset & !0x03, value, mem)
                });
            }
            _ => self.write_bytes(region, offset, &value.to_be_bytes()),
        }
    }

    /// Write a doubleword as two big-endian words
    pub fn write64_phys(&mut self, paddr: u32, value: u64) {
        let (hi, lo) = bitops::split_u64(value);
        self.write32_phys(paddr, hi);
        self.write32_phys(paddr.wrapping_add(4), lo);
    }

    fn is_device(region: MemoryRegion) -> bool {
        matches!(
            region,
            MemoryRegion::SpRegs
                | MemoryRegion::DpRegs
                | MemoryRegion::ViRegs
                | MemoryRegion::AiRegs
                | MemoryRegion::PiRegs
                | MemoryRegion::SiRegs
        )
    }

    fn device(&self, region: MemoryRegion) -> Option<&dyn IODevice> {
        match region {
            MemoryRegion::SpRegs => Some(&self.sp),
            MemoryRegion::DpRegs => Some(&self.dp),
            MemoryRegion::ViRegs => Some(&self.vi),
            MemoryRegion::AiRegs => Some(&self.ai),
            MemoryRegion::PiRegs => Some(&self.pi),
            MemoryRegion::SiRegs => Some(&self.si),
            _ => None,
        }
    }

    fn with_device<F>(&mut self, region: MemoryRegion, f: F)
    where
        F: FnOnce(&mut dyn IODevice, &mut Memory),
    {
        let mem = &mut self.mem;
        let device: &mut dyn IODevice = match region {
            MemoryRegion::SpRegs => &mut self.sp,
            MemoryRegion::DpRegs => &mut self.dp,
            MemoryRegion::ViRegs => &mut self.vi,
            MemoryRegion::AiRegs => &mut self.ai,
            MemoryRegion::PiRegs => &mut self.pi,
            MemoryRegion::SiRegs => &mut self.si,
            _ => return,
        };
        f(device, mem);
    }

    /// Byte-addressable regions (RDRAM, SP memory, ROM, PIF RAM)
    fn read_bytes(&self, region: MemoryRegion, offset: u32, buf: &mut [u8]) {
        match region {
            MemoryRegion::Rdram => self.mem.read_rdram(offset, buf),
            MemoryRegion::Rom => self.mem.read_rom(offset, buf),
            MemoryRegion::SpMem => {
                for (i, byte) in buf.iter_mut().enumerate() {
                    *byte = self.sp.read_mem8(offset + i as u32);
                }
            }
            MemoryRegion::PifRam => {
                for (i, byte) in buf.iter_mut().enumerate() {
                    *byte = self.si.read_pif8(offset + i as u32);
                }
            }
            _ => {
                log::trace!("Unmapped read at 0x{:08X}", region.base() + offset);
                buf.fill(0);
            }
        }
    }

    fn write_bytes(&mut self, region: MemoryRegion, offset: u32, data: &[u8]) {
        match region {
            MemoryRegion::Rdram => self.mem.write_rdram(offset, data),
            MemoryRegion::SpMem => {
                for (i, byte) in data.iter().enumerate() {
                    self.sp.write_mem8(offset + i as u32, *byte);
                }
            }
            MemoryRegion::PifRam => {
                for (i, byte) in data.iter().enumerate() {
                    self.si.write_pif8(offset + i as u32, *byte);
                }
            }
            MemoryRegion::Rom => {
                log::trace!("Write to ROM offset 0x{:08X} ignored", offset);
            }
            _ => {
                log::trace!("Unmapped write at 0x{:08X}", region.base() + offset);
            }
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
