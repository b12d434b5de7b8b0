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

/// Coprocessor 1 register file
///
/// Only moves are modeled: 32 single-width registers plus the implementation
/// and control/status registers. No arithmetic is performed.
#[derive(Debug, Clone)]
pub struct FPU {
    /// Floating-point general registers
    pub(crate) fpr: [u32; 32],
    /// FCR31 control/status
    pub(crate) fcr31: u32,
}

impl FPU {
    /// FCR0: implementation/revision (read-only)
    pub const FCR0_VALUE: u32 = 0x0000_0A00;
    /// FCR31 compare condition bit
    pub const CONDITION: u32 = 1 << 23;

    pub fn new() -> Self {
        Self {
            fpr: [0u32; 32],
            fcr31: 0,
        }
    }

    pub fn reset(&mut self) {
        self.fpr = [0u32; 32];
        self.fcr31 = 0;
    }

    #[inline]
    pub fn reg(&self, index: u8) -> u32 {
        self.fpr[(index & 0x1F) as usize]
    }

    #[inline]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        self.fpr[(index & 0x1F) as usize] = value;
    }

    /// 64-bit view of an even/odd register pair (even register holds the low word)
    pub fn reg64(&self, index: u8) -> u64 {
        let even = index & 0x1E;
        ((self.reg(even + 1) as u64) << 32) | self.reg(even) as u64
    }

    pub fn set_reg64(&mut self, index: u8, value: u64) {
        let even = index & 0x1E;
        self.set_reg(even, value as u32);
        self.set_reg(even + 1, (value >> 32) as u32);
    }

    /// Read a control register (CFC1)
    pub fn read_control(&self, index: u8) -> u32 {
        match index {
            0 => Self::FCR0_VALUE,
            31 => self.fcr31,
            _ => 0,
        }
    }

    /// Write a control register (CTC1); only FCR31 is writable
    pub fn write_control(&mut self, index: u8, value: u32) {
        if index == 31 {
            self.fcr31 = value;
        }
    }

    /// Compare condition flag tested by BC1T/BC1F
    #[inline]
    pub fn condition(&self) -> bool {
        self.fcr31 & Self::CONDITION != 0
    }
}

impl Default for FPU {
    fn default() -> Self {
        Self::new()
    }
}
