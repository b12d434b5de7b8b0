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

//! Coprocessor 0 (System Control) instructions

use super::super::cop0::COP0;
use super::super::decode::decode_r_type;
use super::super::tlb::TlbEntry;
use super::super::{CpuException, Exec, ExceptionCause, CPU};

/// Index.P: set by TLBP when no entry matched
const INDEX_PROBE_FAILURE: u32 = 1 << 31;

impl CPU {
    /// MFC0: Move From Coprocessor 0
    ///
    /// Moves the contents of a COP0 register to a general-purpose register,
    /// sign-extended.
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    ///
    /// # Format
    ///
    /// MFC0 rt, rd
    ///
    /// # Example
    ///
    /// ```text
    /// MFC0 $t0, $12  # Move Status Register to $t0
    /// ```
    pub(in crate::core::cpu) fn op_mfc0(&mut self, instruction: u32) -> Exec {
        let (_, rt, rd, _, _) = decode_r_type(instruction);
        let value = self.cop0.read(rd as usize);
        self.set_reg32(rt, value);
        Ok(())
    }

    /// DMFC0: Doubleword Move From Coprocessor 0
    ///
    /// COP0 registers are held as 32-bit values; the result is sign-extended.
    pub(in crate::core::cpu) fn op_dmfc0(&mut self, instruction: u32) -> Exec {
        self.op_mfc0(instruction)
    }

    /// MTC0: Move To Coprocessor 0
    ///
    /// The write goes through the per-register masks, so read-only fields
    /// are preserved.
    ///
    /// # Format
    ///
    /// MTC0 rt, rd
    ///
    /// # Example
    ///
    /// ```text
    /// MTC0 $t0, $12  # Move $t0 to Status Register
    /// ```
    pub(in crate::core::cpu) fn op_mtc0(&mut self, instruction: u32) -> Exec {
        let (_, rt, rd, _, _) = decode_r_type(instruction);
        let value = self.reg32(rt);
        self.cop0.write(rd as usize, value);
        Ok(())
    }

    /// DMTC0: Doubleword Move To Coprocessor 0 (low word is written)
    pub(in crate::core::cpu) fn op_dmtc0(&mut self, instruction: u32) -> Exec {
        self.op_mtc0(instruction)
    }

    /// TLBR: Read the TLB entry selected by Index into PageMask/EntryHi/EntryLo
    pub(in crate::core::cpu) fn op_tlbr(&mut self) -> Exec {
        let index = (self.cop0.read(COP0::INDEX) & 0x1F) as usize;
        let entry = *self.tlb.entry(index);

        self.cop0.write(COP0::PAGE_MASK, entry.page_mask);
        self.cop0.write(COP0::ENTRY_HI, entry.entry_hi());
        self.cop0
            .write(COP0::ENTRY_LO0, entry.pages[0].to_entry_lo(entry.global));
        self.cop0
            .write(COP0::ENTRY_LO1, entry.pages[1].to_entry_lo(entry.global));
        Ok(())
    }

    /// Build an entry from the current COP0 MMU registers
    fn tlb_entry_from_cop0(&self) -> TlbEntry {
        TlbEntry::from_registers(
            self.cop0.read(COP0::PAGE_MASK),
            self.cop0.read(COP0::ENTRY_HI),
            self.cop0.read(COP0::ENTRY_LO0),
            self.cop0.read(COP0::ENTRY_LO1),
        )
    }

    /// TLBWI: Write the TLB entry selected by Index
    pub(in crate::core::cpu) fn op_tlbwi(&mut self) -> Exec {
        let index = (self.cop0.read(COP0::INDEX) & 0x1F) as usize;
        let entry = self.tlb_entry_from_cop0();
        self.tlb.write(index, entry);
        Ok(())
    }

    /// TLBWR: Write the TLB entry selected by Random
    pub(in crate::core::cpu) fn op_tlbwr(&mut self) -> Exec {
        let index = (self.cop0.read(COP0::RANDOM) & 0x1F) as usize;
        let entry = self.tlb_entry_from_cop0();
        self.tlb.write(index, entry);
        Ok(())
    }

    /// TLBP: Probe the TLB for an entry matching EntryHi
    ///
    /// Index receives the matching slot, or has its P bit set on a miss.
    pub(in crate::core::cpu) fn op_tlbp(&mut self) -> Exec {
        let entry_hi = self.cop0.read(COP0::ENTRY_HI);

        self.cop0.regs[COP0::INDEX] = match self.tlb.probe(entry_hi) {
            Some(index) => index as u32,
            None => INDEX_PROBE_FAILURE,
        };
        Ok(())
    }

    /// ERET: Return from exception
    ///
    /// Clears EXL and resumes at EPC; any branch in flight is discarded.
    /// ERET has no delay slot.
    ///
    /// # Exception
    ///
    /// ReservedInstruction when EXL is already clear
    ///
    /// # Example
    ///
    /// ```text
    /// ERET  # Return from exception handler
    /// ```
    pub(in crate::core::cpu) fn op_eret(&mut self) -> Exec {
        if !self.cop0.exl() {
            return Err(CpuException::new(ExceptionCause::ReservedInstruction).into());
        }
        self.return_from_exception();
        Ok(())
    }
}
