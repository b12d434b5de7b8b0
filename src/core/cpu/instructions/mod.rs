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

//! CPU instruction implementations
//!
//! This module contains the MIPS III (VR4300) instruction implementations,
//! organized by instruction type. Handlers return [`Exec`]; an `Err`
//! unwinds the current instruction and is delivered as an exception by
//! [`CPU::step`].

use super::decode::{cop_sub_op, decode_i_type, decode_r_type};
use super::{Exec, CPU};
use crate::core::memory::Bus;

// Instruction modules organized by type
mod arithmetic;
mod branch;
mod cop0;
mod cop1;
mod exception;
mod jump;
mod load;
mod logical;
mod multiply;
mod shift;
mod store;

impl CPU {
    /// Decode and execute one instruction
    ///
    /// This method dispatches the instruction to the appropriate handler
    /// based on its opcode (upper 6 bits).
    ///
    /// # Arguments
    ///
    /// * `instruction` - The fetched 32-bit instruction
    /// * `bus` - Memory bus for memory operations
    ///
    /// # Returns
    ///
    /// Ok(()) on success, or the fault raised by the instruction
    pub(super) fn execute_instruction(&mut self, instruction: u32, bus: &mut Bus) -> Exec {
        // Extract opcode (upper 6 bits)
        let opcode = instruction >> 26;

        match opcode {
            0x00 => self.execute_special(instruction),
            0x01 => self.execute_regimm(instruction),
            0x02 => self.op_j(instruction),           // J
            0x03 => self.op_jal(instruction),         // JAL
            0x04 => self.op_beq(instruction, false),  // BEQ
            0x05 => self.op_bne(instruction, false),  // BNE
            0x06 => self.op_blez(instruction, false), // BLEZ
            0x07 => self.op_bgtz(instruction, false), // BGTZ
            0x08 => self.op_addi(instruction),        // ADDI
            0x09 => self.op_addiu(instruction),       // ADDIU
            0x0A => self.op_slti(instruction),        // SLTI
            0x0B => self.op_sltiu(instruction),       // SLTIU
            0x0C => self.op_andi(instruction),        // ANDI
            0x0D => self.op_ori(instruction),         // ORI
            0x0E => self.op_xori(instruction),        // XORI
            0x0F => self.op_lui(instruction),         // LUI
            0x10 => self.execute_cop0(instruction),   // COP0
            0x11 => self.execute_cop1(instruction),   // COP1
            0x14 => self.op_beq(instruction, true),   // BEQL
            0x15 => self.op_bne(instruction, true),   // BNEL
            0x16 => self.op_blez(instruction, true),  // BLEZL
            0x17 => self.op_bgtz(instruction, true),  // BGTZL
            0x18 => self.op_daddi(instruction),       // DADDI
            0x19 => self.op_daddiu(instruction),      // DADDIU
            0x1A => self.op_ldl(instruction, bus),    // LDL
            0x1B => self.op_ldr(instruction, bus),    // LDR
            0x20 => self.op_lb(instruction, bus),     // LB
            0x21 => self.op_lh(instruction, bus),     // LH
            0x22 => self.op_lwl(instruction, bus),    // LWL
            0x23 => self.op_lw(instruction, bus),     // LW
            0x24 => self.op_lbu(instruction, bus),    // LBU
            0x25 => self.op_lhu(instruction, bus),    // LHU
            0x26 => self.op_lwr(instruction, bus),    // LWR
            0x27 => self.op_lwu(instruction, bus),    // LWU
            0x28 => self.op_sb(instruction, bus),     // SB
            0x29 => self.op_sh(instruction, bus),     // SH
            0x2A => self.op_swl(instruction, bus),    // SWL
            0x2B => self.op_sw(instruction, bus),     // SW
            0x2C => self.op_sdl(instruction, bus),    // SDL
            0x2D => self.op_sdr(instruction, bus),    // SDR
            0x2E => self.op_swr(instruction, bus),    // SWR
            0x2F => Ok(()),                           // CACHE
            0x30 => self.op_ll(instruction, bus),     // LL
            0x31 => self.op_lwc1(instruction, bus),   // LWC1
            0x34 => self.op_lld(instruction, bus),    // LLD
            0x35 => self.op_ldc1(instruction, bus),   // LDC1
            0x37 => self.op_ld(instruction, bus),     // LD
            0x38 => self.op_sc(instruction, bus),     // SC
            0x39 => self.op_swc1(instruction, bus),   // SWC1
            0x3C => self.op_scd(instruction, bus),    // SCD
            0x3D => self.op_sdc1(instruction, bus),   // SDC1
            0x3F => self.op_sd(instruction, bus),     // SD
            _ => self.unimplemented(instruction),
        }
    }

    /// Effective address of a load/store: rs + sign_extend(offset)
    ///
    /// Addresses are 32-bit; the upper half of rs is ignored.
    #[inline(always)]
    fn effective_address(&self, instruction: u32) -> u32 {
        let (_, rs, _, imm) = decode_i_type(instruction);
        self.reg32(rs).wrapping_add(imm as i16 as u32)
    }

    /// Handle SPECIAL instructions (opcode 0x00)
    ///
    /// SPECIAL instructions use the lower 6 bits (funct field) to determine
    /// the specific operation.
    fn execute_special(&mut self, instruction: u32) -> Exec {
        let (rs, rt, rd, shamt, funct) = decode_r_type(instruction);

        match funct {
            0x00 => self.op_sll(rt, rd, shamt),    // SLL
            0x02 => self.op_srl(rt, rd, shamt),    // SRL
            0x03 => self.op_sra(rt, rd, shamt),    // SRA
            0x04 => self.op_sllv(rs, rt, rd),      // SLLV
            0x06 => self.op_srlv(rs, rt, rd),      // SRLV
            0x07 => self.op_srav(rs, rt, rd),      // SRAV
            0x08 => self.op_jr(rs),                // JR
            0x09 => self.op_jalr(rs, rd),          // JALR
            0x0C => self.op_syscall(instruction),  // SYSCALL
            0x0D => self.op_break(instruction),    // BREAK
            0x0F => Ok(()),                        // SYNC
            0x10 => self.op_mfhi(rd),              // MFHI
            0x11 => self.op_mthi(rs),              // MTHI
            0x12 => self.op_mflo(rd),              // MFLO
            0x13 => self.op_mtlo(rs),              // MTLO
            0x14 => self.op_dsllv(rs, rt, rd),     // DSLLV
            0x16 => self.op_dsrlv(rs, rt, rd),     // DSRLV
            0x17 => self.op_dsrav(rs, rt, rd),     // DSRAV
            0x18 => self.op_mult(rs, rt),          // MULT
            0x19 => self.op_multu(rs, rt),         // MULTU
            0x1A => self.op_div(rs, rt),           // DIV
            0x1B => self.op_divu(rs, rt),          // DIVU
            0x1C => self.op_dmult(rs, rt),         // DMULT
            0x1D => self.op_dmultu(rs, rt),        // DMULTU
            0x1E => self.op_ddiv(rs, rt),          // DDIV
            0x1F => self.op_ddivu(rs, rt),         // DDIVU
            0x20 => self.op_add(rs, rt, rd),       // ADD
            0x21 => self.op_addu(rs, rt, rd),      // ADDU
            0x22 => self.op_sub(rs, rt, rd),       // SUB
            0x23 => self.op_subu(rs, rt, rd),      // SUBU
            0x24 => self.op_and(rs, rt, rd),       // AND
            0x25 => self.op_or(rs, rt, rd),        // OR
            0x26 => self.op_xor(rs, rt, rd),       // XOR
            0x27 => self.op_nor(rs, rt, rd),       // NOR
            0x2A => self.op_slt(rs, rt, rd),       // SLT
            0x2B => self.op_sltu(rs, rt, rd),      // SLTU
            0x2C => self.op_dadd(rs, rt, rd),      // DADD
            0x2D => self.op_daddu(rs, rt, rd),     // DADDU
            0x2E => self.op_dsub(rs, rt, rd),      // DSUB
            0x2F => self.op_dsubu(rs, rt, rd),     // DSUBU
            0x30..=0x36 => self.op_trap_reg(funct, rs, rt), // TGE/TGEU/TLT/TLTU/TEQ/TNE
            0x38 => self.op_dsll(rt, rd, shamt),   // DSLL
            0x3A => self.op_dsrl(rt, rd, shamt),   // DSRL
            0x3B => self.op_dsra(rt, rd, shamt),   // DSRA
            0x3C => self.op_dsll(rt, rd, shamt + 32), // DSLL32
            0x3E => self.op_dsrl(rt, rd, shamt + 32), // DSRL32
            0x3F => self.op_dsra(rt, rd, shamt + 32), // DSRA32
            _ => self.unimplemented(instruction),
        }
    }

    /// Handle REGIMM instructions (opcode 0x01)
    ///
    /// The rt field selects the operation: sign-test branches (with link
    /// and likely variants) and immediate traps.
    fn execute_regimm(&mut self, instruction: u32) -> Exec {
        let (_, rs, rt, _) = decode_i_type(instruction);

        match rt {
            0x00 => self.op_bcondz(instruction, false, false, false), // BLTZ
            0x01 => self.op_bcondz(instruction, true, false, false),  // BGEZ
            0x02 => self.op_bcondz(instruction, false, false, true),  // BLTZL
            0x03 => self.op_bcondz(instruction, true, false, true),   // BGEZL
            0x08..=0x0C | 0x0E => self.op_trap_imm(instruction, rs, rt), // TGEI..TNEI
            0x10 => self.op_bcondz(instruction, false, true, false),  // BLTZAL
            0x11 => self.op_bcondz(instruction, true, true, false),   // BGEZAL
            0x12 => self.op_bcondz(instruction, false, true, true),   // BLTZALL
            0x13 => self.op_bcondz(instruction, true, true, true),    // BGEZALL
            _ => self.unimplemented(instruction),
        }
    }

    /// Handle COP0 instructions (opcode 0x10)
    ///
    /// COP0 instructions are used to interact with Coprocessor 0 (System Control).
    fn execute_cop0(&mut self, instruction: u32) -> Exec {
        match cop_sub_op(instruction) {
            0x00 => self.op_mfc0(instruction),  // MFC0
            0x01 => self.op_dmfc0(instruction), // DMFC0
            0x04 => self.op_mtc0(instruction),  // MTC0
            0x05 => self.op_dmtc0(instruction), // DMTC0
            0x10..=0x1F => match instruction & 0x3F {
                0x01 => self.op_tlbr(),  // TLBR
                0x02 => self.op_tlbwi(), // TLBWI
                0x06 => self.op_tlbwr(), // TLBWR
                0x08 => self.op_tlbp(),  // TLBP
                0x18 => self.op_eret(),  // ERET
                _ => self.unimplemented(instruction),
            },
            _ => self.unimplemented(instruction),
        }
    }

    /// Handle COP1 instructions (opcode 0x11)
    ///
    /// Only register moves and branch-on-condition are modeled; the
    /// arithmetic formats (S/D/W/L) are reported as unimplemented.
    fn execute_cop1(&mut self, instruction: u32) -> Exec {
        match cop_sub_op(instruction) {
            0x00 => self.op_mfc1(instruction),  // MFC1
            0x01 => self.op_dmfc1(instruction), // DMFC1
            0x02 => self.op_cfc1(instruction),  // CFC1
            0x04 => self.op_mtc1(instruction),  // MTC1
            0x05 => self.op_dmtc1(instruction), // DMTC1
            0x06 => self.op_ctc1(instruction),  // CTC1
            0x08 => self.op_bc1(instruction),   // BC1F/BC1T/BC1FL/BC1TL
            _ => self.unimplemented(instruction),
        }
    }
}
