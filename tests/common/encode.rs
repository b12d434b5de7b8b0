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

//! Instruction encoders for hand-assembled test programs

#![allow(dead_code)]

pub fn r_type(funct: u32, rs: u32, rt: u32, rd: u32, shamt: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (shamt << 6) | funct
}

pub fn i_type(op: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | imm as u32
}

pub fn nop() -> u32 {
    0
}

pub fn add(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x20, rs, rt, rd, 0)
}

pub fn addu(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x21, rs, rt, rd, 0)
}

pub fn addi(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(0x08, rs, rt, imm as u16)
}

pub fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(0x09, rs, rt, imm as u16)
}

pub fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    i_type(0x0D, rs, rt, imm)
}

pub fn lui(rt: u32, imm: u16) -> u32 {
    i_type(0x0F, 0, rt, imm)
}

pub fn div(rs: u32, rt: u32) -> u32 {
    r_type(0x1A, rs, rt, 0, 0)
}

pub fn divu(rs: u32, rt: u32) -> u32 {
    r_type(0x1B, rs, rt, 0, 0)
}

pub fn lw(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x23, base, rt, offset as u16)
}

pub fn lwl(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x22, base, rt, offset as u16)
}

pub fn lwr(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x26, base, rt, offset as u16)
}

pub fn sw(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x2B, base, rt, offset as u16)
}

pub fn swl(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x2A, base, rt, offset as u16)
}

pub fn swr(rt: u32, base: u32, offset: i16) -> u32 {
    i_type(0x2E, base, rt, offset as u16)
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

pub fn mtc0(rt: u32, rd: u32) -> u32 {
    (0x10 << 26) | (0x04 << 21) | (rt << 16) | (rd << 11)
}

pub fn eret() -> u32 {
    (0x10 << 26) | (1 << 25) | 0x18
}
