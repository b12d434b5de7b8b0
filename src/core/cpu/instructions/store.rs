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

use super::super::decode::decode_i_type;
use super::super::{AccessKind, CpuException, Exec, ExceptionCause, CPU};
use crate::core::bitops::{merge_sdl, merge_sdr, merge_swl, merge_swr};
use crate::core::memory::Bus;

impl CPU {
    // === Store Instructions ===

    /// SW: Store Word (32-bit)
    ///
    /// Stores the low word of rt. The address must be 4-byte aligned.
    ///
    /// Format: sw rt, offset(rs)
    /// Operation: memory[rs + sign_extend(offset)] = rt[31:0]
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    /// * `bus` - Memory bus for writing
    ///
    /// # Returns
    ///
    /// Ok(()) on success, AddressErrorStore on misalignment, TLB faults on
    /// mapped addresses
    pub(in crate::core::cpu) fn op_sw(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store32(bus, addr, self.reg32(rt))
    }

    /// SH: Store Halfword (16-bit)
    pub(in crate::core::cpu) fn op_sh(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store16(bus, addr, self.reg(rt) as u16)
    }

    /// SB: Store Byte (8-bit)
    pub(in crate::core::cpu) fn op_sb(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store8(bus, addr, self.reg(rt) as u8)
    }

    /// SD: Store Doubleword
    pub(in crate::core::cpu) fn op_sd(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store64(bus, addr, self.reg(rt))
    }

    /// SWL: Store Word Left (unaligned store, big-endian)
    ///
    /// Stores the most significant bytes of rt from the effective address to
    /// the end of its aligned word. Paired with SWR at address + 3.
    ///
    /// Format: swl rt, offset(rs)
    pub(in crate::core::cpu) fn op_swl(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        let aligned = addr & !3;

        // Translate for write first so a clean page faults before any read
        self.translate_address(aligned, AccessKind::Write)?;
        let word = self.load32(bus, aligned)?;
        self.store32(bus, aligned, merge_swl(word, self.reg32(rt), addr & 3))
    }

    /// SWR: Store Word Right (unaligned store, big-endian)
    pub(in crate::core::cpu) fn op_swr(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        let aligned = addr & !3;

        self.translate_address(aligned, AccessKind::Write)?;
        let word = self.load32(bus, aligned)?;
        self.store32(bus, aligned, merge_swr(word, self.reg32(rt), addr & 3))
    }

    /// SDL: Store Doubleword Left
    pub(in crate::core::cpu) fn op_sdl(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        let aligned = addr & !7;

        self.translate_address(aligned, AccessKind::Write)?;
        let dword = self.load64(bus, aligned)?;
        self.store64(bus, aligned, merge_sdl(dword, self.reg(rt), addr & 7))
    }

    /// SDR: Store Doubleword Right
    pub(in crate::core::cpu) fn op_sdr(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        let aligned = addr & !7;

        self.translate_address(aligned, AccessKind::Write)?;
        let dword = self.load64(bus, aligned)?;
        self.store64(bus, aligned, merge_sdr(dword, self.reg(rt), addr & 7))
    }

    /// SC: Store Conditional (word)
    ///
    /// Stores only if the link set by LL is still intact, and writes 1 (success)
    /// or 0 (failure) to rt. The link is consumed either way.
    pub(in crate::core::cpu) fn op_sc(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        if addr & 3 != 0 {
            return Err(CpuException::with_address(ExceptionCause::AddressErrorStore, addr).into());
        }
        let paddr = self.translate_address(addr, AccessKind::Write)?;

        let success = self.take_link(paddr);
        if success {
            self.store32(bus, addr, self.reg32(rt))?;
        }
        self.set_reg(rt, success as u64);
        Ok(())
    }

    /// SCD: Store Conditional Doubleword
    pub(in crate::core::cpu) fn op_scd(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        if addr & 7 != 0 {
            return Err(CpuException::with_address(ExceptionCause::AddressErrorStore, addr).into());
        }
        let paddr = self.translate_address(addr, AccessKind::Write)?;

        let success = self.take_link(paddr);
        if success {
            self.store64(bus, addr, self.reg(rt))?;
        }
        self.set_reg(rt, success as u64);
        Ok(())
    }

    /// SWC1: Store Word from FPU register
    pub(in crate::core::cpu) fn op_swc1(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, ft, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store32(bus, addr, self.fpu.reg(ft))
    }

    /// SDC1: Store Doubleword from FPU register pair
    pub(in crate::core::cpu) fn op_sdc1(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, ft, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);
        self.store64(bus, addr, self.fpu.reg64(ft))
    }
}
