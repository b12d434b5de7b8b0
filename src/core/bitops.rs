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

//! Bit-level helpers shared by the CPU, bus and devices
//!
//! - Sign/zero extension into 64-bit register values
//! - Big-endian packing of words into byte buffers
//! - 64x64 -> 128-bit multiply and 64-bit divide with MIPS conventions
//! - Byte-lane merges used by the unaligned LWL/LWR/SWL/SWR family

/// Sign-extend a byte to 64 bits
#[inline(always)]
pub fn sext8(value: u8) -> u64 {
    value as i8 as i64 as u64
}

/// Sign-extend a halfword to 64 bits
#[inline(always)]
pub fn sext16(value: u16) -> u64 {
    value as i16 as i64 as u64
}

/// Sign-extend a word to 64 bits
///
/// This is the MIPS64 rule for every instruction producing a 32-bit result:
/// bit 31 is replicated into the upper half.
///
/// # Example
///
/// ```
/// use n64rx::core::bitops::sext32;
///
/// assert_eq!(sext32(0x8000_0000), 0xFFFF_FFFF_8000_0000);
/// assert_eq!(sext32(0x7FFF_FFFF), 0x0000_0000_7FFF_FFFF);
/// ```
#[inline(always)]
pub fn sext32(value: u32) -> u64 {
    value as i32 as i64 as u64
}

/// Sign-extend a 16-bit immediate to a 32-bit value
#[inline(always)]
pub fn imm_sext32(imm: u16) -> u32 {
    imm as i16 as i32 as u32
}

/// Read a big-endian u16 from `buf` at `offset`
#[inline(always)]
pub fn read_be_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

/// Read a big-endian u32 from `buf` at `offset`
#[inline(always)]
pub fn read_be_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Write a big-endian u16 into `buf` at `offset`
#[inline(always)]
pub fn write_be_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Write a big-endian u32 into `buf` at `offset`
#[inline(always)]
pub fn write_be_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Split a 64-bit value into its (high, low) 32-bit halves
#[inline(always)]
pub fn split_u64(value: u64) -> (u32, u32) {
    ((value >> 32) as u32, value as u32)
}

/// Join (high, low) 32-bit halves into a 64-bit value
#[inline(always)]
pub fn join_u64(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// Signed 64x64 -> 128-bit multiply, returned as (hi, lo)
#[inline]
pub fn mul_i64(a: i64, b: i64) -> (u64, u64) {
    let product = (a as i128).wrapping_mul(b as i128) as u128;
    ((product >> 64) as u64, product as u64)
}

/// Unsigned 64x64 -> 128-bit multiply, returned as (hi, lo)
#[inline]
pub fn mul_u64(a: u64, b: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128);
    ((product >> 64) as u64, product as u64)
}

/// Signed 32-bit division with the MIPS divide-by-zero convention
///
/// Returns (quotient, remainder). A zero divisor yields an all-ones quotient
/// and the dividend as remainder; `i32::MIN / -1` wraps.
///
/// # Example
///
/// ```
/// use n64rx::core::bitops::div_i32;
///
/// assert_eq!(div_i32(7, 2), (3, 1));
/// assert_eq!(div_i32(-7, 0), (-1, -7));
/// ```
#[inline]
pub fn div_i32(dividend: i32, divisor: i32) -> (i32, i32) {
    if divisor == 0 {
        (-1, dividend)
    } else {
        (dividend.wrapping_div(divisor), dividend.wrapping_rem(divisor))
    }
}

/// Unsigned 32-bit division with the MIPS divide-by-zero convention
#[inline]
pub fn div_u32(dividend: u32, divisor: u32) -> (u32, u32) {
    if divisor == 0 {
        (u32::MAX, dividend)
    } else {
        (dividend / divisor, dividend % divisor)
    }
}

/// Signed 64-bit division with the MIPS divide-by-zero convention
#[inline]
pub fn div_i64(dividend: i64, divisor: i64) -> (i64, i64) {
    if divisor == 0 {
        (-1, dividend)
    } else {
        (dividend.wrapping_div(divisor), dividend.wrapping_rem(divisor))
    }
}

/// Unsigned 64-bit division with the MIPS divide-by-zero convention
#[inline]
pub fn div_u64(dividend: u64, divisor: u64) -> (u64, u64) {
    if divisor == 0 {
        (u64::MAX, dividend)
    } else {
        (dividend / divisor, dividend % divisor)
    }
}

/// LWL merge: `mem` is the aligned word, `k` the byte offset (0-3)
///
/// The bytes from `k` to the end of the word land in the most significant
/// lanes of the register; the low `k` bytes of the register are kept.
#[inline]
pub fn merge_lwl(reg: u32, mem: u32, k: u32) -> u32 {
    let shift = 8 * (k & 3);
    let keep = ((1u64 << shift) - 1) as u32;
    (reg & keep) | (mem << shift)
}

/// LWR merge: bytes from the start of the word up to `k` land in the least
/// significant lanes of the register
#[inline]
pub fn merge_lwr(reg: u32, mem: u32, k: u32) -> u32 {
    let shift = 8 * (3 - (k & 3));
    let replace = u32::MAX >> shift;
    (reg & !replace) | (mem >> shift)
}

/// SWL merge: returns the new memory word
#[inline]
pub fn merge_swl(mem: u32, reg: u32, k: u32) -> u32 {
    let shift = 8 * (k & 3);
    let replace = u32::MAX >> shift;
    (mem & !replace) | (reg >> shift)
}

/// SWR merge: returns the new memory word
#[inline]
pub fn merge_swr(mem: u32, reg: u32, k: u32) -> u32 {
    let shift = 8 * (3 - (k & 3));
    let replace = u32::MAX << shift;
    (mem & !replace) | (reg << shift)
}

/// LDL merge over a doubleword, `k` in 0-7
#[inline]
pub fn merge_ldl(reg: u64, mem: u64, k: u32) -> u64 {
    let shift = 8 * (k & 7);
    let keep = ((1u128 << shift) - 1) as u64;
    (reg & keep) | (mem << shift)
}

/// LDR merge over a doubleword, `k` in 0-7
#[inline]
pub fn merge_ldr(reg: u64, mem: u64, k: u32) -> u64 {
    let shift = 8 * (7 - (k & 7));
    let replace = u64::MAX >> shift;
    (reg & !replace) | (mem >> shift)
}

/// SDL merge: returns the new memory doubleword
#[inline]
pub fn merge_sdl(mem: u64, reg: u64, k: u32) -> u64 {
    let shift = 8 * (k & 7);
    let replace = u64::MAX >> shift;
    (mem & !replace) | (reg >> shift)
}

/// SDR merge: returns the new memory doubleword
#[inline]
pub fn merge_sdr(mem: u64, reg: u64, k: u32) -> u64 {
    let shift = 8 * (7 - (k & 7));
    let replace = u64::MAX << shift;
    (mem & !replace) | (reg << shift)
}
