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

//! ALU, shift, multiply/divide and 64-bit instruction tests

use super::super::*;
use super::helpers::*;

fn special(funct: u32, rs: u32, rt: u32, rd: u32) -> u32 {
    r_type(funct, rs, rt, rd, 0)
}

fn shift(funct: u32, rt: u32, rd: u32, shamt: u32) -> u32 {
    r_type(funct, 0, rt, rd, shamt)
}

// === Arithmetic ===

#[test]
fn test_add_basic() {
    let cpu = exec(special(0x20, 1, 2, 3), &[(1, 10), (2, 32)]);
    assert_eq!(cpu.reg(3), 42);
}

#[test]
fn test_add_overflow_traps_and_keeps_rd() {
    let cpu = exec(
        special(0x20, 1, 2, 3),
        &[(1, 0x7FFF_FFFF), (2, 1), (3, 0x55)],
    );

    assert_eq!(exc_code(&cpu), ExceptionCause::Overflow as u32);
    assert_eq!(cpu.reg(3), 0x55);
    assert_eq!(cpu.cop0().read(COP0::EPC), PROGRAM_BASE);
}

#[test]
fn test_addu_wraps_and_sign_extends() {
    let cpu = exec(special(0x21, 1, 2, 3), &[(1, 0x7FFF_FFFF), (2, 1)]);

    assert_eq!(cpu.reg(3), 0xFFFF_FFFF_8000_0000);
    assert!(!cpu.cop0().exl());
}

#[test]
fn test_addi_overflow() {
    let cpu = exec(addi(2, 1, -1), &[(1, 0xFFFF_FFFF_8000_0000)]);
    assert_eq!(exc_code(&cpu), ExceptionCause::Overflow as u32);
    assert_eq!(cpu.reg(2), 0);
}

#[test]
fn test_addiu_negative_immediate() {
    let cpu = exec(addiu(2, 1, -5), &[(1, 3)]);
    assert_eq!(cpu.reg(2), (-2i64) as u64);
}

#[test]
fn test_sub_and_subu() {
    let cpu = exec(special(0x22, 1, 2, 3), &[(1, 5), (2, 7)]);
    assert_eq!(cpu.reg(3), (-2i64) as u64);

    let cpu = exec(special(0x22, 1, 2, 3), &[(1, 0xFFFF_FFFF_8000_0000), (2, 1)]);
    assert_eq!(exc_code(&cpu), ExceptionCause::Overflow as u32);

    let cpu = exec(special(0x23, 1, 2, 3), &[(1, 0xFFFF_FFFF_8000_0000), (2, 1)]);
    assert_eq!(cpu.reg(3), 0x7FFF_FFFF);
}

#[test]
fn test_set_less_than() {
    let minus_one = (-1i64) as u64;

    assert_eq!(exec(special(0x2A, 1, 2, 3), &[(1, minus_one), (2, 1)]).reg(3), 1);
    assert_eq!(exec(special(0x2B, 1, 2, 3), &[(1, minus_one), (2, 1)]).reg(3), 0);
    assert_eq!(exec(i_type(0x0A, 1, 2, 0xFFFF), &[(1, (-2i64) as u64)]).reg(2), 1);
    // SLTIU compares against the sign-extended immediate, unsigned
    assert_eq!(exec(i_type(0x0B, 1, 2, 0xFFFF), &[(1, 5)]).reg(2), 1);
}

#[test]
fn test_dadd_family() {
    let cpu = exec(special(0x2D, 1, 2, 3), &[(1, 0x0000_0001_0000_0000), (2, 0xFFFF_FFFF)]);
    assert_eq!(cpu.reg(3), 0x0000_0001_FFFF_FFFF);

    let cpu = exec(special(0x2C, 1, 2, 3), &[(1, i64::MAX as u64), (2, 1)]);
    assert_eq!(exc_code(&cpu), ExceptionCause::Overflow as u32);

    let cpu = exec(i_type(0x19, 1, 2, 0xFFFF), &[(1, 0x1_0000_0000)]);
    assert_eq!(cpu.reg(2), 0xFFFF_FFFF);

    let cpu = exec(special(0x2F, 1, 2, 3), &[(1, 0), (2, 1)]);
    assert_eq!(cpu.reg(3), u64::MAX);
}

// === Logical ===

#[test]
fn test_lui_sign_extends() {
    let cpu = exec(lui(1, 0x8000), &[]);
    assert_eq!(cpu.reg(1), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn test_logical_immediates_zero_extend() {
    assert_eq!(exec(ori(1, 0, 0xFFFF), &[]).reg(1), 0xFFFF);
    assert_eq!(exec(i_type(0x0C, 1, 2, 0x00F0), &[(1, u64::MAX)]).reg(2), 0xF0);
    assert_eq!(exec(i_type(0x0E, 1, 2, 0xFFFF), &[(1, 0xFF)]).reg(2), 0xFF00);
}

#[test]
fn test_register_logical_ops() {
    let regs = [(1, 0b1100u64), (2, 0b1010u64)];
    assert_eq!(exec(special(0x24, 1, 2, 3), &regs).reg(3), 0b1000);
    assert_eq!(exec(special(0x25, 1, 2, 3), &regs).reg(3), 0b1110);
    assert_eq!(exec(special(0x26, 1, 2, 3), &regs).reg(3), 0b0110);
    assert_eq!(exec(special(0x27, 1, 2, 3), &regs).reg(3), !0b1110u64);
}

// === Shifts ===

#[test]
fn test_32bit_shifts_sign_extend() {
    assert_eq!(
        exec(shift(0x00, 1, 2, 4), &[(1, 0x0800_0000)]).reg(2),
        0xFFFF_FFFF_8000_0000
    );
    assert_eq!(
        exec(shift(0x02, 1, 2, 4), &[(1, 0xFFFF_FFFF_8000_0000)]).reg(2),
        0x0800_0000
    );
    assert_eq!(
        exec(shift(0x03, 1, 2, 4), &[(1, 0xFFFF_FFFF_8000_0000)]).reg(2),
        0xFFFF_FFFF_F800_0000
    );
}

#[test]
fn test_variable_shifts_use_low_bits() {
    // SLLV uses rs & 0x1F
    let cpu = exec(special(0x04, 1, 2, 3), &[(1, 33), (2, 1)]);
    assert_eq!(cpu.reg(3), 2);
}

#[test]
fn test_doubleword_shifts() {
    assert_eq!(exec(shift(0x38, 1, 2, 4), &[(1, 1)]).reg(2), 1 << 4);
    assert_eq!(exec(shift(0x3C, 1, 2, 0), &[(1, 1)]).reg(2), 1 << 32);
    assert_eq!(
        exec(shift(0x3E, 1, 2, 0), &[(1, 0x8000_0000_0000_0000)]).reg(2),
        0x8000_0000
    );
    assert_eq!(
        exec(shift(0x3F, 1, 2, 0), &[(1, 0x8000_0000_0000_0000)]).reg(2),
        0xFFFF_FFFF_8000_0000
    );
    assert_eq!(
        exec(special(0x17, 1, 2, 3), &[(1, 63), (2, 0x8000_0000_0000_0000)]).reg(3),
        u64::MAX
    );
}

// === Multiply / Divide ===

#[test]
fn test_mult_signed() {
    let cpu = exec(special(0x18, 1, 2, 0), &[(1, (-2i64) as u64), (2, 3)]);
    assert_eq!(cpu.lo(), (-6i64) as u64);
    assert_eq!(cpu.hi(), u64::MAX);
}

#[test]
fn test_multu() {
    let cpu = exec(special(0x19, 1, 2, 0), &[(1, 0xFFFF_FFFF), (2, 2)]);
    assert_eq!(cpu.lo(), 0xFFFF_FFFF_FFFF_FFFE);
    assert_eq!(cpu.hi(), 1);
}

#[test]
fn test_div_and_divu() {
    let cpu = exec(special(0x1A, 1, 2, 0), &[(1, 7), (2, (-2i64) as u64)]);
    assert_eq!(cpu.lo(), (-3i64) as u64);
    assert_eq!(cpu.hi(), 1);

    let cpu = exec(special(0x1B, 1, 2, 0), &[(1, 0xFFFF_FFFF), (2, 0x10)]);
    assert_eq!(cpu.lo() as u32, 0x0FFF_FFFF);
    assert_eq!(cpu.hi() as u32, 0xF);
}

#[test]
fn test_divide_by_zero() {
    let cpu = exec(special(0x1A, 1, 0, 0), &[(1, 1234)]);
    assert_eq!(cpu.lo() as u32, 0xFFFF_FFFF);
    assert_eq!(cpu.hi() as u32, 1234);
    assert!(!cpu.cop0().exl());

    let cpu = exec(special(0x1B, 1, 0, 0), &[(1, 0x8000_0001)]);
    assert_eq!(cpu.lo() as u32, 0xFFFF_FFFF);
    assert_eq!(cpu.hi() as u32, 0x8000_0001);
}

#[test]
fn test_doubleword_multiply_divide() {
    let cpu = exec(special(0x1D, 1, 2, 0), &[(1, 1 << 63), (2, 4)]);
    assert_eq!(cpu.hi(), 2);
    assert_eq!(cpu.lo(), 0);

    let cpu = exec(special(0x1C, 1, 2, 0), &[(1, (-1i64) as u64), (2, 5)]);
    assert_eq!(cpu.lo(), (-5i64) as u64);
    assert_eq!(cpu.hi(), u64::MAX);

    let cpu = exec(special(0x1E, 1, 2, 0), &[(1, (-9i64) as u64), (2, 2)]);
    assert_eq!(cpu.lo(), (-4i64) as u64);
    assert_eq!(cpu.hi(), (-1i64) as u64);

    let cpu = exec(special(0x1F, 1, 0, 0), &[(1, 99)]);
    assert_eq!(cpu.lo(), u64::MAX);
    assert_eq!(cpu.hi(), 99);
}

#[test]
fn test_hi_lo_moves() {
    let (mut cpu, mut bus) = setup(&[
        special(0x11, 1, 0, 0), // MTHI r1
        special(0x13, 2, 0, 0), // MTLO r2
        special(0x10, 0, 0, 3), // MFHI r3
        special(0x12, 0, 0, 4), // MFLO r4
    ]);
    cpu.set_reg(1, 0x1111_2222_3333_4444);
    cpu.set_reg(2, 0x5555);

    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.reg(3), 0x1111_2222_3333_4444);
    assert_eq!(cpu.reg(4), 0x5555);
}

#[test]
fn test_cache_and_sync_are_nops() {
    let (mut cpu, mut bus) = setup(&[0xBC00_0000, 0x0000_000F, nop()]);

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.pc(), PROGRAM_BASE + 8);
    assert!(!cpu.cop0().exl());
}
