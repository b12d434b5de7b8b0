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
use super::super::{Exec, CPU};

impl CPU {
    // === Logical Instructions ===

    /// LUI: Load Upper Immediate
    ///
    /// Loads a 16-bit immediate value into the upper 16 bits of the low
    /// word and sign-extends the result to 64 bits.
    ///
    /// Format: lui rt, imm
    /// Operation: rt = sign_extend(imm << 16)
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    ///
    /// # Returns
    ///
    /// Ok(()) on success
    pub(in crate::core::cpu) fn op_lui(&mut self, instruction: u32) -> Exec {
        let (_, _, rt, imm) = decode_i_type(instruction);
        self.set_reg32(rt, (imm as u32) << 16);
        Ok(())
    }

    /// AND: Bitwise AND
    ///
    /// Format: and rd, rs, rt
    /// Operation: rd = rs & rt
    pub(in crate::core::cpu) fn op_and(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, self.reg(rs) & self.reg(rt));
        Ok(())
    }

    /// OR: Bitwise OR
    pub(in crate::core::cpu) fn op_or(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, self.reg(rs) | self.reg(rt));
        Ok(())
    }

    /// XOR: Bitwise XOR
    pub(in crate::core::cpu) fn op_xor(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, self.reg(rs) ^ self.reg(rt));
        Ok(())
    }

    /// NOR: Bitwise NOR
    pub(in crate::core::cpu) fn op_nor(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, !(self.reg(rs) | self.reg(rt)));
        Ok(())
    }

    /// ANDI: Bitwise AND Immediate
    ///
    /// The immediate is zero-extended, so the high bits of the result are
    /// always cleared.
    ///
    /// Format: andi rt, rs, imm
    /// Operation: rt = rs & zero_extend(imm)
    pub(in crate::core::cpu) fn op_andi(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, self.reg(rs) & imm as u64);
        Ok(())
    }

    /// ORI: Bitwise OR Immediate (zero-extended)
    pub(in crate::core::cpu) fn op_ori(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, self.reg(rs) | imm as u64);
        Ok(())
    }

    /// XORI: Bitwise XOR Immediate (zero-extended)
    pub(in crate::core::cpu) fn op_xori(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, self.reg(rs) ^ imm as u64);
        Ok(())
    }
}
