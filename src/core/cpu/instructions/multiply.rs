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
use crate::core::bitops::{div_i32, div_i64, div_u32, div_u64, mul_i64, mul_u64, sext32};

impl CPU {
    // === Multiply/Divide Instructions ===

    /// MULT: Multiply (signed)
    ///
    /// Multiplies the low words of two registers. Each half of the 64-bit
    /// product is sign-extended into HI and LO.
    ///
    /// Format: mult rs, rt
    /// Operation: (HI, LO) = rs[31:0] * rt[31:0]
    ///
    /// # Arguments
    ///
    /// * `rs` - First source register
    /// * `rt` - Second source register
    ///
    /// # Returns
    ///
    /// Ok(()) on success
    ///
    /// # Example
    ///
    /// ```ignore
    /// // Multiply 100 * 200 = 20000
    /// // LO = 20000 (0x4E20), HI = 0
    /// cpu.set_reg(1, 100);
    /// cpu.set_reg(2, 200);
    /// cpu.op_mult(1, 2);
    /// ```
    pub(in crate::core::cpu) fn op_mult(&mut self, rs: u8, rt: u8) -> Exec {
        let a = self.reg32(rs) as i32 as i64;
        let b = self.reg32(rt) as i32 as i64;
        let result = a * b;

        self.lo = sext32(result as u32);
        self.hi = sext32((result >> 32) as u32);
        Ok(())
    }

    /// MULTU: Multiply Unsigned
    ///
    /// Format: multu rs, rt
    /// Operation: (HI, LO) = rs[31:0] * rt[31:0] (unsigned)
    pub(in crate::core::cpu) fn op_multu(&mut self, rs: u8, rt: u8) -> Exec {
        let result = self.reg32(rs) as u64 * self.reg32(rt) as u64;

        self.lo = sext32(result as u32);
        self.hi = sext32((result >> 32) as u32);
        Ok(())
    }

    /// DIV: Divide (signed)
    ///
    /// Division by zero does not trap: LO = all ones, HI = dividend.
    ///
    /// Format: div rs, rt
    /// Operation: LO = rs / rt, HI = rs % rt
    pub(in crate::core::cpu) fn op_div(&mut self, rs: u8, rt: u8) -> Exec {
        let (quotient, remainder) = div_i32(self.reg32(rs) as i32, self.reg32(rt) as i32);

        self.lo = sext32(quotient as u32);
        self.hi = sext32(remainder as u32);
        Ok(())
    }

    /// DIVU: Divide Unsigned
    pub(in crate::core::cpu) fn op_divu(&mut self, rs: u8, rt: u8) -> Exec {
        let (quotient, remainder) = div_u32(self.reg32(rs), self.reg32(rt));

        self.lo = sext32(quotient);
        self.hi = sext32(remainder);
        Ok(())
    }

    /// DMULT: Doubleword Multiply (signed, 128-bit product)
    pub(in crate::core::cpu) fn op_dmult(&mut self, rs: u8, rt: u8) -> Exec {
        let (hi, lo) = mul_i64(self.reg(rs) as i64, self.reg(rt) as i64);
        self.hi = hi;
        self.lo = lo;
        Ok(())
    }

    /// DMULTU: Doubleword Multiply Unsigned
    pub(in crate::core::cpu) fn op_dmultu(&mut self, rs: u8, rt: u8) -> Exec {
        let (hi, lo) = mul_u64(self.reg(rs), self.reg(rt));
        self.hi = hi;
        self.lo = lo;
        Ok(())
    }

    /// DDIV: Doubleword Divide (signed)
    pub(in crate::core::cpu) fn op_ddiv(&mut self, rs: u8, rt: u8) -> Exec {
        let (quotient, remainder) = div_i64(self.reg(rs) as i64, self.reg(rt) as i64);
        self.lo = quotient as u64;
        self.hi = remainder as u64;
        Ok(())
    }

    /// DDIVU: Doubleword Divide Unsigned
    pub(in crate::core::cpu) fn op_ddivu(&mut self, rs: u8, rt: u8) -> Exec {
        let (quotient, remainder) = div_u64(self.reg(rs), self.reg(rt));
        self.lo = quotient;
        self.hi = remainder;
        Ok(())
    }

    /// MFHI: Move From HI
    pub(in crate::core::cpu) fn op_mfhi(&mut self, rd: u8) -> Exec {
        self.set_reg(rd, self.hi);
        Ok(())
    }

    /// MFLO: Move From LO
    pub(in crate::core::cpu) fn op_mflo(&mut self, rd: u8) -> Exec {
        self.set_reg(rd, self.lo);
        Ok(())
    }

    /// MTHI: Move To HI
    pub(in crate::core::cpu) fn op_mthi(&mut self, rs: u8) -> Exec {
        self.hi = self.reg(rs);
        Ok(())
    }

    /// MTLO: Move To LO
    pub(in crate::core::cpu) fn op_mtlo(&mut self, rs: u8) -> Exec {
        self.lo = self.reg(rs);
        Ok(())
    }
}
