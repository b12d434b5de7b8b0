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

//! Custom assertions for emulator testing

use n64rx::core::cpu::{COP0, CPU};
use n64rx::core::memory::Bus;

/// Assert that a CPU register has the expected 64-bit value
#[allow(dead_code)]
pub fn assert_cpu_reg(cpu: &CPU, reg: u8, expected: u64) {
    let actual = cpu.reg(reg);
    assert_eq!(
        actual, expected,
        "Register r{} mismatch: expected 0x{:016X}, got 0x{:016X}",
        reg, expected, actual
    );
}

/// Assert that PC has the expected value
#[allow(dead_code)]
pub fn assert_cpu_pc(cpu: &CPU, expected: u32) {
    let actual = cpu.pc();
    assert_eq!(
        actual, expected,
        "PC mismatch: expected 0x{:08X}, got 0x{:08X}",
        expected, actual
    );
}

/// Assert that a memory word has the expected value
#[allow(dead_code)]
pub fn assert_memory_word(bus: &Bus, addr: u32, expected: u32) {
    let actual = bus.read32(addr);
    assert_eq!(
        actual, expected,
        "Memory mismatch at 0x{:08X}: expected 0x{:08X}, got 0x{:08X}",
        addr, expected, actual
    );
}

/// Assert that the CPU has just entered the general exception vector
#[allow(dead_code)]
pub fn assert_exception(cpu: &CPU, exc_code: u32, epc: u32) {
    assert_eq!(
        cpu.cop0().exc_code(),
        exc_code,
        "ExcCode mismatch, Cause=0x{:08X}",
        cpu.cop0().cause()
    );
    assert_eq!(
        cpu.cop0().read(COP0::EPC),
        epc,
        "EPC mismatch: expected 0x{:08X}",
        epc
    );
    assert!(cpu.cop0().exl(), "EXL not set after exception");
    assert_cpu_pc(cpu, cpu.general_exception_vector());
}
