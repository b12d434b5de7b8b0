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

//! Exception-triggering instructions

use super::super::decode::decode_i_type;
use super::super::{CpuException, Exec, ExceptionCause, CPU};
use crate::core::bitops::sext16;

impl CPU {
    /// SYSCALL: System Call
    ///
    /// Triggers a system call exception, transferring control to the
    /// exception handler.
    ///
    /// # Arguments
    ///
    /// * `_instruction` - The full 32-bit instruction (unused)
    ///
    /// # Exception
    ///
    /// Always triggers ExceptionCause::Syscall
    ///
    /// # Example
    ///
    /// ```text
    /// SYSCALL  # Trigger system call exception
    /// ```
    pub(in crate::core::cpu) fn op_syscall(&mut self, _instruction: u32) -> Exec {
        Err(CpuException::new(ExceptionCause::Syscall).into())
    }

    /// BREAK: Breakpoint
    ///
    /// # Exception
    ///
    /// Always triggers ExceptionCause::Breakpoint
    pub(in crate::core::cpu) fn op_break(&mut self, _instruction: u32) -> Exec {
        Err(CpuException::new(ExceptionCause::Breakpoint).into())
    }

    /// TGE / TGEU / TLT / TLTU / TEQ / TNE: register-register traps
    ///
    /// # Arguments
    ///
    /// * `funct` - Function field (0x30-0x36)
    /// * `rs` - First operand register
    /// * `rt` - Second operand register
    pub(in crate::core::cpu) fn op_trap_reg(&mut self, funct: u8, rs: u8, rt: u8) -> Exec {
        let a = self.reg(rs);
        let b = self.reg(rt);

        let trap = match funct {
            0x30 => (a as i64) >= (b as i64), // TGE
            0x31 => a >= b,                   // TGEU
            0x32 => (a as i64) < (b as i64),  // TLT
            0x33 => a < b,                    // TLTU
            0x34 => a == b,                   // TEQ
            0x36 => a != b,                   // TNE
            _ => return self.unimplemented(self.current_instruction),
        };

        if trap {
            return Err(CpuException::new(ExceptionCause::Trap).into());
        }
        Ok(())
    }

    /// TGEI / TGEIU / TLTI / TLTIU / TEQI / TNEI: register-immediate traps
    ///
    /// The immediate is sign-extended for both signed and unsigned forms.
    pub(in crate::core::cpu) fn op_trap_imm(&mut self, instruction: u32, rs: u8, rt: u8) -> Exec {
        let (_, _, _, imm) = decode_i_type(instruction);
        let a = self.reg(rs);
        let b = sext16(imm);

        let trap = match rt {
            0x08 => (a as i64) >= (b as i64), // TGEI
            0x09 => a >= b,                   // TGEIU
            0x0A => (a as i64) < (b as i64),  // TLTI
            0x0B => a < b,                    // TLTIU
            0x0C => a == b,                   // TEQI
            0x0E => a != b,                   // TNEI
            _ => return self.unimplemented(instruction),
        };

        if trap {
            return Err(CpuException::new(ExceptionCause::Trap).into());
        }
        Ok(())
    }
}
