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
use super::super::{AccessKind, Exec, CPU};
use crate::core::bitops::{merge_ldl, merge_ldr, merge_lwl, merge_lwr, sext16, sext8};
use crate::core::memory::Bus;

impl CPU {
    // === Load Instructions ===

    /// LW: Load Word (32-bit, sign-extended)
    ///
    /// The address must be 4-byte aligned.
    ///
    /// Format: lw rt, offset(rs)
    /// Operation: rt = sign_extend(memory[rs + sign_extend(offset)])
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    /// * `bus` - Memory bus for reading
    ///
    /// # Returns
    ///
    /// Ok(()) on success, AddressErrorLoad on misalignment, TLB faults on
    /// mapped addresses without a valid entry
    pub(in crate::core::cpu) fn op_lw(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load32(bus, addr)?;
        self.set_reg32(rt, value);
        Ok(())
    }

    /// LWU: Load Word Unsigned (zero-extended)
    pub(in crate::core::cpu) fn op_lwu(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load32(bus, addr)?;
        self.set_reg(rt, value as u64);
        Ok(())
    }

    /// LH: Load Halfword (16-bit, sign-extended)
    ///
    /// The address must be 2-byte aligned.
    pub(in crate::core::cpu) fn op_lh(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load16(bus, addr)?;
        self.set_reg(rt, sext16(value));
        Ok(())
    }

    /// LHU: Load Halfword Unsigned (16-bit, zero-extended)
    pub(in crate::core::cpu) fn op_lhu(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load16(bus, addr)?;
        self.set_reg(rt, value as u64);
        Ok(())
    }

    /// LB: Load Byte (sign-extended)
    pub(in crate::core::cpu) fn op_lb(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load8(bus, addr)?;
        self.set_reg(rt, sext8(value));
        Ok(())
    }

    /// LBU: Load Byte Unsigned (zero-extended)
    pub(in crate::core::cpu) fn op_lbu(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load8(bus, addr)?;
        self.set_reg(rt, value as u64);
        Ok(())
    }

    /// LD: Load Doubleword
    ///
    /// The address must be 8-byte aligned.
    pub(in crate::core::cpu) fn op_ld(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load64(bus, addr)?;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LWL: Load Word Left (unaligned load, big-endian)
    ///
    /// Loads the bytes from the effective address to the end of its aligned
    /// word into the most significant lanes of rt. Paired with LWR at
    /// address + 3 to load an unaligned word.
    ///
    /// Format: lwl rt, offset(rs)
    ///
    /// # Example
    ///
    /// ```text
    /// LWL r1, 0(r2)   ; r2 = 0x1001 -> bytes 1..3 land in r1[31:8]
    /// LWR r1, 3(r2)   ; address 0x1004 -> byte 0 lands in r1[7:0]
    /// ```
    pub(in crate::core::cpu) fn op_lwl(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let word = self.load32(bus, addr & !3)?;
        let merged = merge_lwl(self.reg32(rt), word, addr & 3);
        self.set_reg32(rt, merged);
        Ok(())
    }

    /// LWR: Load Word Right (unaligned load, big-endian)
    ///
    /// Loads the bytes from the start of the aligned word up to the
    /// effective address into the least significant lanes of rt.
    pub(in crate::core::cpu) fn op_lwr(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let word = self.load32(bus, addr & !3)?;
        let merged = merge_lwr(self.reg32(rt), word, addr & 3);
        self.set_reg32(rt, merged);
        Ok(())
    }

    /// LDL: Load Doubleword Left
    pub(in crate::core::cpu) fn op_ldl(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let dword = self.load64(bus, addr & !7)?;
        self.set_reg(rt, merge_ldl(self.reg(rt), dword, addr & 7));
        Ok(())
    }

    /// LDR: Load Doubleword Right
    pub(in crate::core::cpu) fn op_ldr(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let dword = self.load64(bus, addr & !7)?;
        self.set_reg(rt, merge_ldr(self.reg(rt), dword, addr & 7));
        Ok(())
    }

    /// LL: Load Linked (word)
    ///
    /// Loads like LW and arms the link on the loaded word for a following SC.
    pub(in crate::core::cpu) fn op_ll(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load32(bus, addr)?;
        let paddr = self.translate_address(addr, AccessKind::Read)?;
        self.set_link(paddr, 4);
        self.set_reg32(rt, value);
        Ok(())
    }

    /// LLD: Load Linked Doubleword
    pub(in crate::core::cpu) fn op_lld(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, rt, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load64(bus, addr)?;
        let paddr = self.translate_address(addr, AccessKind::Read)?;
        self.set_link(paddr, 8);
        self.set_reg(rt, value);
        Ok(())
    }

    /// LWC1: Load Word to FPU register
    pub(in crate::core::cpu) fn op_lwc1(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, ft, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load32(bus, addr)?;
        self.fpu.set_reg(ft, value);
        Ok(())
    }

    /// LDC1: Load Doubleword to FPU register pair
    pub(in crate::core::cpu) fn op_ldc1(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        let (_, _, ft, _) = decode_i_type(instruction);
        let addr = self.effective_address(instruction);

        let value = self.load64(bus, addr)?;
        self.fpu.set_reg64(ft, value);
        Ok(())
    }
}
