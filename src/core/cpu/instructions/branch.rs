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

//! Conditional branches
//!
//! Every conditional branch ends up in one of three places:
//! - taken: the delay slot runs, then the target commits
//! - not taken: the delay slot runs, then execution continues after it
//! - not taken, likely form: the delay slot is skipped outright

use super::super::decode::{branch_offset, decode_i_type};
use super::super::{Exec, CPU};

impl CPU {
    // === Branch Instructions ===

    /// Resolve a conditional branch
    ///
    /// # Arguments
    ///
    /// * `instruction` - The branch instruction (for the offset)
    /// * `taken` - Branch condition
    /// * `likely` - Branch-likely form (nullify the delay slot when not taken)
    fn conditional_branch(&mut self, instruction: u32, taken: bool, likely: bool) {
        // self.pc is the delay slot address
        let delay_slot = self.pc;

        if taken {
            self.branch_to(delay_slot.wrapping_add(branch_offset(instruction)));
        } else if likely {
            self.pc = delay_slot.wrapping_add(4);
        } else {
            self.branch_to(delay_slot.wrapping_add(4));
        }
    }

    /// Handle REGIMM sign-test branches
    ///
    /// BLTZ, BGEZ, their likely forms and the linking variants. The link is
    /// written whether or not the branch is taken.
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    /// * `gez` - Test `rs >= 0` (otherwise `rs < 0`)
    /// * `link` - Write the return address to r31
    /// * `likely` - Branch-likely form
    pub(in crate::core::cpu) fn op_bcondz(
        &mut self,
        instruction: u32,
        gez: bool,
        link: bool,
        likely: bool,
    ) -> Exec {
        let (_, rs, _, _) = decode_i_type(instruction);

        // Read before linking: `bltzal r31` tests the old value
        let non_negative = (self.reg(rs) as i64) >= 0;
        let taken = if gez { non_negative } else { !non_negative };

        if link {
            self.set_reg32(31, self.current_pc.wrapping_add(8));
        }

        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }

    /// BEQ / BEQL: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    /// Operation: if (rs == rt) PC = PC + 4 + (sign_extend(offset) << 2)
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    /// * `likely` - Branch-likely form
    ///
    /// # Returns
    ///
    /// Ok(()) on success
    pub(in crate::core::cpu) fn op_beq(&mut self, instruction: u32, likely: bool) -> Exec {
        let (_, rs, rt, _) = decode_i_type(instruction);
        let taken = self.reg(rs) == self.reg(rt);
        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }

    /// BNE / BNEL: Branch on Not Equal
    pub(in crate::core::cpu) fn op_bne(&mut self, instruction: u32, likely: bool) -> Exec {
        let (_, rs, rt, _) = decode_i_type(instruction);
        let taken = self.reg(rs) != self.reg(rt);
        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }

    /// BLEZ / BLEZL: Branch on Less Than or Equal to Zero
    pub(in crate::core::cpu) fn op_blez(&mut self, instruction: u32, likely: bool) -> Exec {
        let (_, rs, _, _) = decode_i_type(instruction);
        let taken = (self.reg(rs) as i64) <= 0;
        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }

    /// BGTZ / BGTZL: Branch on Greater Than Zero
    pub(in crate::core::cpu) fn op_bgtz(&mut self, instruction: u32, likely: bool) -> Exec {
        let (_, rs, _, _) = decode_i_type(instruction);
        let taken = (self.reg(rs) as i64) > 0;
        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }

    /// BC1F / BC1T / BC1FL / BC1TL: Branch on FPU condition
    ///
    /// Bit 16 selects true/false, bit 17 the likely form.
    pub(in crate::core::cpu) fn op_bc1(&mut self, instruction: u32) -> Exec {
        let on_true = instruction & (1 << 16) != 0;
        let likely = instruction & (1 << 17) != 0;
        let taken = self.fpu.condition() == on_true;
        self.conditional_branch(instruction, taken, likely);
        Ok(())
    }
}
