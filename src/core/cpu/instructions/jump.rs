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

use super::super::decode::decode_j_type;
use super::super::{Exec, CPU};

impl CPU {
    // === Jump Instructions ===

    /// J: Jump
    ///
    /// Unconditional jump to target address.
    /// The target address is formed by combining the upper 4 bits of the
    /// delay slot address with the 26-bit target field shifted left by 2.
    ///
    /// Format: j target
    /// Operation: PC = (PC & 0xF0000000) | (target << 2)
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    ///
    /// # Returns
    ///
    /// Ok(()) on success
    pub(in crate::core::cpu) fn op_j(&mut self, instruction: u32) -> Exec {
        let (_, target) = decode_j_type(instruction);
        // self.pc already points at the delay slot
        let pc_high = self.pc & 0xF000_0000;
        self.branch_to(pc_high | (target << 2));
        Ok(())
    }

    /// JAL: Jump and Link
    ///
    /// The return address is the address of the instruction after the delay slot.
    ///
    /// Format: jal target
    /// Operation: r31 = PC + 8; PC = (PC & 0xF0000000) | (target << 2)
    pub(in crate::core::cpu) fn op_jal(&mut self, instruction: u32) -> Exec {
        let (_, target) = decode_j_type(instruction);
        self.set_reg32(31, self.current_pc.wrapping_add(8));

        let pc_high = self.pc & 0xF000_0000;
        self.branch_to(pc_high | (target << 2));
        Ok(())
    }

    /// JR: Jump Register
    ///
    /// Format: jr rs
    /// Operation: PC = rs
    pub(in crate::core::cpu) fn op_jr(&mut self, rs: u8) -> Exec {
        self.branch_to(self.reg32(rs));
        Ok(())
    }

    /// JALR: Jump And Link Register
    ///
    /// The target is read before the link is written, so `jalr rX, rX`
    /// jumps to the old value.
    ///
    /// Format: jalr rd, rs
    /// Operation: rd = PC + 8; PC = rs
    pub(in crate::core::cpu) fn op_jalr(&mut self, rs: u8, rd: u8) -> Exec {
        let target = self.reg32(rs);
        self.set_reg32(rd, self.current_pc.wrapping_add(8));
        self.branch_to(target);
        Ok(())
    }
}
