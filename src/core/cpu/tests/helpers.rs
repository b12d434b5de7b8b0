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

//! Instruction encoders and program setup shared by the CPU tests

#![allow(dead_code)]

use super::super::*;

/// Where test programs are loaded (KSEG0, physical 0)
pub const PROGRAM_BASE: u32 = 0x8000_0000;

/// Load `program` at physical 0 and point the CPU at it
pub fn setup(program: &[u32]) -> (CPU, Bus) {
    setup_with_config(CpuConfig::default(), program)
}

pub fn setup_with_config(config: CpuConfig, program: &[u32]) -> (CPU, Bus) {
    let mut cpu = CPU::with_config(config);
    let mut bus = Bus::new();
    for (i, word) in program.iter().enumerate() {
        bus.write32_phys((i * 4) as u32, *word);
    }
    cpu.set_pc(PROGRAM_BASE);
    (cpu, bus)
}

/// Run a single instruction with the given register values
pub fn exec(instruction: u32, regs: &[(u8, u64)]) -> CPU {
    let (mut cpu, mut bus) = setup(&[instruction]);
    for &(index, value) in regs {
        cpu.set_reg(index, value);
    }
    cpu.step(&mut bus).unwrap();
    cpu
}

/// ExcCode latched in Cause
pub fn exc_code(cpu: &CPU) -> u32 {
    cpu.cop0().exc_code()
}

/// Step `n` times, panicking on a fatal error
pub fn run(cpu: &mut CPU, bus: &mut Bus, n: usize) {
    for _ in 0..n {
        cpu.step(bus).unwrap();
    }
}

pub fn r_type(funct: u32, rs: u32, rt: u32, rd: u32, shamt: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (shamt << 6) | funct
}

pub fn i_type(op: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | imm as u32
}

pub fn nop() -> u32 {
    0
}

pub fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(0x09, rs, rt, imm as u16)
}

pub fn addi(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(0x08, rs, rt, imm as u16)
}

pub fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    i_type(0x0D, rs, rt, imm)
}

pub fn lui(rt: u32, imm: u16) -> u32 {
    i_type(0x0F, 0, rt, imm)
}

pub fn lw(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x23, base, rt, offset as u16)
}

pub fn sw(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x2B, base, rt, offset as u16)
}

pub fn beq(rs: u32, rt: u32, offset: i16) -> u32 {
    i_type(0x04, rs, rt, offset as u16)
}

pub fn bne(rs: u32, rt: u32, offset: i16) -> u32 {
    i_type(0x05, rs, rt, offset as u16)
}

pub fn beql(rs: u32, rt: u32, offset: i16) -> u32 {
    i_type(0x14, rs, rt, offset as u16)
}

pub fn bnel(rs: u32, rt: u32, offset: i16) -> u32 {
    i_type(0x15, rs, rt, offset as u16)
}

pub fn j(target: u32) -> u32 {
    (0x02 << 26) | ((target >> 2) & 0x03FF_FFFF)
}

pub fn jal(target: u32) -> u32 {
    (0x03 << 26) | ((target >> 2) & 0x03FF_FFFF)
}

pub fn jr(rs: u32) -> u32 {
    r_type(0x08, rs, 0, 0, 0)
}

pub fn syscall() -> u32 {
    0x0000_000C
}

pub fn mtc0(rt: u32, rd: u32) -> u32 {
    (0x10 << 26) | (0x04 << 21) | (rt << 16) | (rd << 11)
}

pub fn mfc0(rt: u32, rd: u32) -> u32 {
    (0x10 << 26) | (rt << 16) | (rd << 11)
}

pub fn cop0_function(funct: u32) -> u32 {
    (0x10 << 26) | (1 << 25) | funct
}

pub fn eret() -> u32 {
    cop0_function(0x18)
}

/// An opcode with no decoding (primary opcode 0x1C)
pub fn reserved() -> u32 {
    0x1C << 26
}
