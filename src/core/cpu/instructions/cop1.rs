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

//! Coprocessor 1 (FPU) register moves

use super::super::decode::decode_r_type;
use super::super::{Exec, CPU};

impl CPU {
    /// MFC1: Move word from FPU register (sign-extended)
    ///
    /// # Format
    ///
    /// MFC1 rt, fs
    pub(in crate::core::cpu) fn op_mfc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        self.set_reg32(rt, self.fpu.reg(fs));
        Ok(())
    }

    /// DMFC1: Move doubleword from FPU register pair
    pub(in crate::core::cpu) fn op_dmfc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        self.set_reg(rt, self.fpu.reg64(fs));
        Ok(())
    }

    /// CFC1: Move from FPU control register
    pub(in crate::core::cpu) fn op_cfc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        self.set_reg32(rt, self.fpu.read_control(fs));
        Ok(())
    }

    /// MTC1: Move word to FPU register
    pub(in crate::core::cpu) fn op_mtc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        let value = self.reg32(rt);
        self.fpu.set_reg(fs, value);
        Ok(())
    }

    /// DMTC1: Move doubleword to FPU register pair
    pub(in crate::core::cpu) fn op_dmtc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        let value = self.reg(rt);
        self.fpu.set_reg64(fs, value);
        Ok(())
    }

    /// CTC1: Move to FPU control register (only FCR31 is writable)
    pub(in crate::core::cpu) fn op_ctc1(&mut self, instruction: u32) -> Exec {
        let (_, rt, fs, _, _) = decode_r_type(instruction);
        let value = self.reg32(rt);
        self.fpu.write_control(fs, value);
        Ok(())
    }
}
