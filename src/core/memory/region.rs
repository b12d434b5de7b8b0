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

//! Physical memory map and the fixed segment remap
//!
//! Only the direct-mapped kernel segments are handled here. KSEG0 and
//! KSEG1 alias the low 512 MB of physical space; every other address is
//! passed through unchanged and is expected to be physical already (the
//! CPU resolves mapped segments through its TLB before calling the bus).

use super::Bus;

/// Memory region identification
///
/// Used to identify which device or memory a physical address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// RDRAM (0x0000_0000-0x03EF_FFFF)
    Rdram,
    /// SP DMEM/IMEM (0x0400_0000-0x0403_FFFF, mirrored every 8 KB)
    SpMem,
    /// SP registers
    SpRegs,
    /// DP command registers
    DpRegs,
    /// MIPS interface
    MiRegs,
    /// Video interface
    ViRegs,
    /// Audio interface
    AiRegs,
    /// Peripheral interface
    PiRegs,
    /// Serial interface
    SiRegs,
    /// Cartridge ROM (read-only)
    Rom,
    /// PIF RAM (64 bytes)
    PifRam,
    /// Unmapped region
    Unmapped,
}

impl MemoryRegion {
    /// Physical base address of the region
    pub fn base(self) -> u32 {
        match self {
            MemoryRegion::Rdram => Bus::RDRAM_START,
            MemoryRegion::SpMem => Bus::SP_MEM_START,
            MemoryRegion::SpRegs => Bus::SP_REGS_START,
            MemoryRegion::DpRegs => Bus::DP_REGS_START,
            MemoryRegion::MiRegs => Bus::MI_REGS_START,
            MemoryRegion::ViRegs => Bus::VI_REGS_START,
            MemoryRegion::AiRegs => Bus::AI_REGS_START,
            MemoryRegion::PiRegs => Bus::PI_REGS_START,
            MemoryRegion::SiRegs => Bus::SI_REGS_START,
            MemoryRegion::Rom => Bus::ROM_START,
            MemoryRegion::PifRam => Bus::PIF_RAM_START,
            MemoryRegion::Unmapped => 0,
        }
    }
}

impl Bus {
    /// Apply the fixed KSEG0/KSEG1 remap
    ///
    /// - 0x8000_0000-0x9FFF_FFFF (KSEG0) -> `vaddr - 0x8000_0000`
    /// - 0xA000_0000-0xBFFF_FFFF (KSEG1) -> `vaddr - 0xA000_0000`
    /// - anything else is returned unchanged
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::Bus;
    ///
    /// assert_eq!(Bus::virt_to_phys(0x8000_1234), 0x0000_1234);
    /// assert_eq!(Bus::virt_to_phys(0xA460_0010), 0x0460_0010);
    /// assert_eq!(Bus::virt_to_phys(0x0000_1234), 0x0000_1234);
    /// ```
    #[inline(always)]
    pub fn virt_to_phys(vaddr: u32) -> u32 {
        match vaddr >> 28 {
            0x8 | 0x9 => vaddr - 0x8000_0000,
            0xA | 0xB => vaddr - 0xA000_0000,
            _ => vaddr,
        }
    }

    /// Identify the region containing a physical address
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::{Bus, MemoryRegion};
    ///
    /// assert_eq!(Bus::identify_region(0x0000_0000), MemoryRegion::Rdram);
    /// assert_eq!(Bus::identify_region(0x0430_0008), MemoryRegion::MiRegs);
    /// assert_eq!(Bus::identify_region(0x1000_0040), MemoryRegion::Rom);
    /// assert_eq!(Bus::identify_region(0x1FC0_07FF), MemoryRegion::PifRam);
    /// assert_eq!(Bus::identify_region(0x0470_0000), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(paddr: u32) -> MemoryRegion {
        match paddr {
            Self::RDRAM_START..=Self::RDRAM_END => MemoryRegion::Rdram,
            Self::SP_MEM_START..=Self::SP_MEM_END => MemoryRegion::SpMem,
            Self::SP_REGS_START..=Self::SP_REGS_END => MemoryRegion::SpRegs,
            Self::DP_REGS_START..=Self::DP_REGS_END => MemoryRegion::DpRegs,
            Self::MI_REGS_START..=Self::MI_REGS_END => MemoryRegion::MiRegs,
            Self::VI_REGS_START..=Self::VI_REGS_END => MemoryRegion::ViRegs,
            Self::AI_REGS_START..=Self::AI_REGS_END => MemoryRegion::AiRegs,
            Self::PI_REGS_START..=Self::PI_REGS_END => MemoryRegion::PiRegs,
            Self::SI_REGS_START..=Self::SI_REGS_END => MemoryRegion::SiRegs,
            Self::ROM_START..=Self::ROM_END => MemoryRegion::Rom,
            Self::PIF_RAM_START..=Self::PIF_RAM_END => MemoryRegion::PifRam,
            _ => MemoryRegion::Unmapped,
        }
    }
}
