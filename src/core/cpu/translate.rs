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

//! Virtual address translation and CPU-side memory access
//!
//! # Segments
//!
//! ```text
//! Region  Virtual range              Mapping
//! 0x0-0x7 0x0000_0000-0x7FFF_FFFF    kuseg: TLB (or identity when configured)
//! 0x8-0x9 0x8000_0000-0x9FFF_FFFF    kseg0: vaddr - 0x8000_0000 (cached)
//! 0xA-0xB 0xA000_0000-0xBFFF_FFFF    kseg1: vaddr - 0xA000_0000 (uncached)
//! 0xC-0xF 0xC000_0000-0xFFFF_FFFF    ksseg/kseg3: TLB
//! ```
//!
//! All loads and stores check natural alignment before translating, so a
//! misaligned access reports an address error rather than a TLB fault.

use super::{AccessKind, CpuException, Exec, ExceptionCause, CPU};
use crate::core::memory::Bus;

impl AccessKind {
    fn address_error(self) -> ExceptionCause {
        match self {
            AccessKind::Write => ExceptionCause::AddressErrorStore,
            AccessKind::Read | AccessKind::Execute => ExceptionCause::AddressErrorLoad,
        }
    }

    fn tlb_error(self) -> ExceptionCause {
        match self {
            AccessKind::Write => ExceptionCause::TlbStore,
            AccessKind::Read | AccessKind::Execute => ExceptionCause::TlbLoad,
        }
    }
}

impl CPU {
    /// Translate a virtual address to a physical address
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address
    /// * `kind` - Access kind, used to pick the exception class on failure
    ///
    /// # Returns
    ///
    /// The physical address, or the exception the access raises
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::cpu::{AccessKind, CPU};
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.translate_address(0x8000_1234, AccessKind::Read).unwrap(), 0x1234);
    /// assert_eq!(cpu.translate_address(0xA400_0000, AccessKind::Write).unwrap(), 0x0400_0000);
    /// ```
    pub fn translate_address(&self, vaddr: u32, kind: AccessKind) -> Result<u32, CpuException> {
        let region = vaddr >> 28;

        if region >= 0x8 && self.cop0.user_mode() {
            return Err(CpuException::with_address(kind.address_error(), vaddr));
        }

        match region {
            0x0..=0x7 if self.config.identity_map_kuseg => Ok(vaddr),
            0x8 | 0x9 => Ok(vaddr - 0x8000_0000),
            0xA | 0xB => Ok(vaddr - 0xA000_0000),
            _ => self.translate_mapped(vaddr, kind),
        }
    }

    fn translate_mapped(&self, vaddr: u32, kind: AccessKind) -> Result<u32, CpuException> {
        let hit = self
            .tlb
            .lookup(vaddr, self.cop0.asid())
            .ok_or_else(|| CpuException::tlb_miss(kind.tlb_error(), vaddr))?;

        if !hit.page.valid {
            return Err(CpuException::with_address(kind.tlb_error(), vaddr));
        }

        if kind == AccessKind::Write && !hit.page.dirty {
            return Err(CpuException::with_address(ExceptionCause::TlbModified, vaddr));
        }

        Ok(hit.paddr)
    }

    /// Check natural alignment, then translate
    #[inline]
    fn resolve(&self, vaddr: u32, size: u32, kind: AccessKind) -> Exec<u32> {
        if vaddr & (size - 1) != 0 {
            return Err(CpuException::with_address(kind.address_error(), vaddr).into());
        }
        Ok(self.translate_address(vaddr, kind)?)
    }

    pub(crate) fn load8(&mut self, bus: &mut Bus, vaddr: u32) -> Exec<u8> {
        let paddr = self.resolve(vaddr, 1, AccessKind::Read)?;
        Ok(bus.read8_phys(paddr))
    }

    pub(crate) fn load16(&mut self, bus: &mut Bus, vaddr: u32) -> Exec<u16> {
        let paddr = self.resolve(vaddr, 2, AccessKind::Read)?;
        Ok(bus.read16_phys(paddr))
    }

    pub(crate) fn load32(&mut self, bus: &mut Bus, vaddr: u32) -> Exec<u32> {
        let paddr = self.resolve(vaddr, 4, AccessKind::Read)?;
        Ok(bus.read32_phys(paddr))
    }

    pub(crate) fn load64(&mut self, bus: &mut Bus, vaddr: u32) -> Exec<u64> {
        let paddr = self.resolve(vaddr, 8, AccessKind::Read)?;
        Ok(bus.read64_phys(paddr))
    }

    pub(crate) fn store8(&mut self, bus: &mut Bus, vaddr: u32, value: u8) -> Exec {
        let paddr = self.resolve(vaddr, 1, AccessKind::Write)?;
        self.break_link(paddr, 1);
        bus.write8_phys(paddr, value);
        Ok(())
    }

    pub(crate) fn store16(&mut self, bus: &mut Bus, vaddr: u32, value: u16) -> Exec {
        let paddr = self.resolve(vaddr, 2, AccessKind::Write)?;
        self.break_link(paddr, 2);
        bus.write16_phys(paddr, value);
        Ok(())
    }

    pub(crate) fn store32(&mut self, bus: &mut Bus, vaddr: u32, value: u32) -> Exec {
        let paddr = self.resolve(vaddr, 4, AccessKind::Write)?;
        self.break_link(paddr, 4);
        bus.write32_phys(paddr, value);
        Ok(())
    }

    pub(crate) fn store64(&mut self, bus: &mut Bus, vaddr: u32, value: u64) -> Exec {
        let paddr = self.resolve(vaddr, 8, AccessKind::Write)?;
        self.break_link(paddr, 8);
        bus.write64_phys(paddr, value);
        Ok(())
    }

    /// Arm the LL/SC link on the aligned block holding `paddr`
    pub(crate) fn set_link(&mut self, paddr: u32, len: u32) {
        self.ll_bit = true;
        self.ll_addr = paddr & !(len - 1);
        self.ll_len = len;
        self.cop0.write(super::COP0::LL_ADDR, paddr >> 4);
    }

    /// Check the link for SC/SCD and consume it
    pub(crate) fn take_link(&mut self, paddr: u32) -> bool {
        let linked = self.ll_bit && (paddr & !(self.ll_len - 1)) == self.ll_addr;
        self.ll_bit = false;
        linked
    }

    /// Any store touching the linked aligned word invalidates the link
    fn break_link(&mut self, paddr: u32, len: u32) {
        if !self.ll_bit {
            return;
        }
        let start = paddr & !3;
        let end = paddr.wrapping_add(len);
        let linked_end = self.ll_addr.wrapping_add(self.ll_len);
        if start < linked_end && self.ll_addr < end {
            self.ll_bit = false;
        }
    }

    /// LL/SC link state
    pub fn ll_bit(&self) -> bool {
        self.ll_bit
    }
}
