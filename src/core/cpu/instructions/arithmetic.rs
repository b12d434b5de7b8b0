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
use super::super::{CpuException, Exec, ExceptionCause, CPU};
use crate::core::bitops::sext16;

impl CPU {
    // === Arithmetic Instructions ===

    /// ADD: Add (with overflow exception)
    ///
    /// Adds the low words of two registers with signed overflow detection.
    /// On overflow the destination is left untouched.
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = sign_extend(rs[31:0] + rt[31:0])
    ///
    /// # Arguments
    ///
    /// * `rs` - First source register
    /// * `rt` - Second source register
    /// * `rd` - Destination register
    ///
    /// # Returns
    ///
    /// Ok(()) on success, Overflow exception on signed overflow
    pub(in crate::core::cpu) fn op_add(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let a = self.reg32(rs) as i32;
        let b = self.reg32(rt) as i32;

        let result = a
            .checked_add(b)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg32(rd, result as u32);
        Ok(())
    }

    /// ADDU: Add Unsigned (no overflow exception)
    ///
    /// Format: addu rd, rs, rt
    /// Operation: rd = sign_extend(rs[31:0] + rt[31:0]) (wrapping)
    pub(in crate::core::cpu) fn op_addu(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let result = self.reg32(rs).wrapping_add(self.reg32(rt));
        self.set_reg32(rd, result);
        Ok(())
    }

    /// ADDI: Add Immediate (with overflow exception)
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = sign_extend(rs[31:0] + sign_extend(imm))
    pub(in crate::core::cpu) fn op_addi(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let a = self.reg32(rs) as i32;

        let result = a
            .checked_add(imm as i16 as i32)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg32(rt, result as u32);
        Ok(())
    }

    /// ADDIU: Add Immediate Unsigned (no overflow exception)
    ///
    /// Despite the name "unsigned", the immediate is sign-extended.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = sign_extend(rs[31:0] + sign_extend(imm))
    pub(in crate::core::cpu) fn op_addiu(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg32(rs).wrapping_add(imm as i16 as u32);
        self.set_reg32(rt, result);
        Ok(())
    }

    /// SUB: Subtract (with overflow exception)
    ///
    /// Format: sub rd, rs, rt
    /// Operation: rd = sign_extend(rs[31:0] - rt[31:0])
    pub(in crate::core::cpu) fn op_sub(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let a = self.reg32(rs) as i32;
        let b = self.reg32(rt) as i32;

        let result = a
            .checked_sub(b)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg32(rd, result as u32);
        Ok(())
    }

    /// SUBU: Subtract Unsigned (no overflow exception)
    pub(in crate::core::cpu) fn op_subu(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let result = self.reg32(rs).wrapping_sub(self.reg32(rt));
        self.set_reg32(rd, result);
        Ok(())
    }

    /// DADD: Doubleword Add (with overflow exception)
    ///
    /// Format: dadd rd, rs, rt
    /// Operation: rd = rs + rt (64-bit)
    pub(in crate::core::cpu) fn op_dadd(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let a = self.reg(rs) as i64;
        let b = self.reg(rt) as i64;

        let result = a
            .checked_add(b)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg(rd, result as u64);
        Ok(())
    }

    /// DADDU: Doubleword Add Unsigned
    pub(in crate::core::cpu) fn op_daddu(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, self.reg(rs).wrapping_add(self.reg(rt)));
        Ok(())
    }

    /// DADDI: Doubleword Add Immediate (with overflow exception)
    pub(in crate::core::cpu) fn op_daddi(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let a = self.reg(rs) as i64;

        let result = a
            .checked_add(imm as i16 as i64)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg(rt, result as u64);
        Ok(())
    }

    /// DADDIU: Doubleword Add Immediate Unsigned
    pub(in crate::core::cpu) fn op_daddiu(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, self.reg(rs).wrapping_add(sext16(imm)));
        Ok(())
    }

    /// DSUB: Doubleword Subtract (with overflow exception)
    pub(in crate::core::cpu) fn op_dsub(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let a = self.reg(rs) as i64;
        let b = self.reg(rt) as i64;

        let result = a
            .checked_sub(b)
            .ok_or(CpuException::new(ExceptionCause::Overflow))?;
        self.set_reg(rd, result as u64);
        Ok(())
    }

    /// DSUBU: Doubleword Subtract Unsigned
    pub(in crate::core::cpu) fn op_dsubu(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        self.set_reg(rd, self.reg(rs).wrapping_sub(self.reg(rt)));
        Ok(())
    }

    /// SLT: Set on Less Than (signed)
    ///
    /// Compares the full 64-bit registers as signed integers.
    ///
    /// Format: slt rd, rs, rt
    /// Operation: rd = (rs < rt) ? 1 : 0
    pub(in crate::core::cpu) fn op_slt(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let result = (self.reg(rs) as i64) < (self.reg(rt) as i64);
        self.set_reg(rd, result as u64);
        Ok(())
    }

    /// SLTU: Set on Less Than Unsigned
    pub(in crate::core::cpu) fn op_sltu(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let result = self.reg(rs) < self.reg(rt);
        self.set_reg(rd, result as u64);
        Ok(())
    }

    /// SLTI: Set on Less Than Immediate (signed)
    ///
    /// Format: slti rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    pub(in crate::core::cpu) fn op_slti(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = (self.reg(rs) as i64) < (imm as i16 as i64);
        self.set_reg(rt, result as u64);
        Ok(())
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared as unsigned.
    pub(in crate::core::cpu) fn op_sltiu(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) < sext16(imm);
        self.set_reg(rt, result as u64);
        Ok(())
    }
}
