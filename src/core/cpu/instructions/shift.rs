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

use super::super::{Exec, CPU};

impl CPU {
    // === Shift Instructions ===

    /// SLL: Shift Left Logical
    ///
    /// Shifts the low word of rt left and sign-extends the 32-bit result.
    /// Note: SLL with all fields = 0 is NOP.
    ///
    /// Format: sll rd, rt, shamt
    /// Operation: rd = sign_extend(rt[31:0] << shamt)
    ///
    /// # Arguments
    ///
    /// * `rt` - Source register
    /// * `rd` - Destination register
    /// * `shamt` - Shift amount (0-31)
    ///
    /// # Returns
    ///
    /// Ok(()) on success
    pub(in crate::core::cpu) fn op_sll(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        self.set_reg32(rd, self.reg32(rt) << shamt);
        Ok(())
    }

    /// SRL: Shift Right Logical (zero-fill within the low word)
    pub(in crate::core::cpu) fn op_srl(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        self.set_reg32(rd, self.reg32(rt) >> shamt);
        Ok(())
    }

    /// SRA: Shift Right Arithmetic (sign-fill)
    ///
    /// Operates on the full register and keeps the low word, which matches
    /// hardware when the source is not a sign-extended 32-bit value.
    pub(in crate::core::cpu) fn op_sra(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        let value = (self.reg(rt) as i64 >> shamt) as u32;
        self.set_reg32(rd, value);
        Ok(())
    }

    /// SLLV: Shift Left Logical Variable (amount = rs & 0x1F)
    pub(in crate::core::cpu) fn op_sllv(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x1F;
        self.set_reg32(rd, self.reg32(rt) << shift);
        Ok(())
    }

    /// SRLV: Shift Right Logical Variable
    pub(in crate::core::cpu) fn op_srlv(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x1F;
        self.set_reg32(rd, self.reg32(rt) >> shift);
        Ok(())
    }

    /// SRAV: Shift Right Arithmetic Variable
    pub(in crate::core::cpu) fn op_srav(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x1F;
        let value = (self.reg(rt) as i64 >> shift) as u32;
        self.set_reg32(rd, value);
        Ok(())
    }

    /// DSLL / DSLL32: Doubleword Shift Left Logical
    ///
    /// The dispatcher adds 32 to `shamt` for the *32 forms.
    pub(in crate::core::cpu) fn op_dsll(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        self.set_reg(rd, self.reg(rt) << shamt);
        Ok(())
    }

    /// DSRL / DSRL32: Doubleword Shift Right Logical
    pub(in crate::core::cpu) fn op_dsrl(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        self.set_reg(rd, self.reg(rt) >> shamt);
        Ok(())
    }

    /// DSRA / DSRA32: Doubleword Shift Right Arithmetic
    pub(in crate::core::cpu) fn op_dsra(&mut self, rt: u8, rd: u8, shamt: u8) -> Exec {
        self.set_reg(rd, (self.reg(rt) as i64 >> shamt) as u64);
        Ok(())
    }

    /// DSLLV: Doubleword Shift Left Logical Variable (amount = rs & 0x3F)
    pub(in crate::core::cpu) fn op_dsllv(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x3F;
        self.set_reg(rd, self.reg(rt) << shift);
        Ok(())
    }

    /// DSRLV: Doubleword Shift Right Logical Variable
    pub(in crate::core::cpu) fn op_dsrlv(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x3F;
        self.set_reg(rd, self.reg(rt) >> shift);
        Ok(())
    }

    /// DSRAV: Doubleword Shift Right Arithmetic Variable
    pub(in crate::core::cpu) fn op_dsrav(&mut self, rs: u8, rt: u8, rd: u8) -> Exec {
        let shift = self.reg32(rs) & 0x3F;
        self.set_reg(rd, (self.reg(rt) as i64 >> shift) as u64);
        Ok(())
    }
}
