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

//! Test fixtures for common test scenarios

use n64rx::core::config::EmulatorConfig;
use n64rx::core::cpu::CPU;
use n64rx::core::memory::Bus;
use n64rx::core::system::System;

/// Where test programs are loaded (KSEG0)
#[allow(dead_code)]
pub const PROGRAM_BASE: u32 = 0x8000_0400;

/// Scratch data area used by load/store tests (KSEG0)
#[allow(dead_code)]
pub const DATA_BASE: u32 = 0x8000_1000;

/// Sign-extend a 32-bit value the way the CPU stores it
#[allow(dead_code)]
pub fn sext(value: u32) -> u64 {
    value as i32 as i64 as u64
}

/// Load a test program into memory at specified address
#[allow(dead_code)]
pub fn load_test_program(bus: &mut Bus, start_addr: u32, program: &[u32]) {
    for (i, &instruction) in program.iter().enumerate() {
        bus.write32(start_addr + i as u32 * 4, instruction);
    }
}

/// Create a CPU and bus with `program` loaded at [`PROGRAM_BASE`]
#[allow(dead_code)]
pub fn cpu_with_program(program: &[u32]) -> (CPU, Bus) {
    let mut cpu = CPU::new();
    let mut bus = Bus::new();
    load_test_program(&mut bus, PROGRAM_BASE, program);
    cpu.set_pc(PROGRAM_BASE);
    (cpu, bus)
}

/// Execute N CPU instructions
#[allow(dead_code)]
pub fn execute_n_instructions(cpu: &mut CPU, bus: &mut Bus, n: usize) {
    for _ in 0..n {
        cpu.step(bus).expect("CPU step failed");
    }
}

/// Run one instruction with the given register values
#[allow(dead_code)]
pub fn exec_one(instruction: u32, regs: &[(u8, u64)]) -> (CPU, Bus) {
    let (mut cpu, mut bus) = cpu_with_program(&[instruction]);
    for &(index, value) in regs {
        cpu.set_reg(index, value);
    }
    cpu.step(&mut bus).expect("CPU step failed");
    (cpu, bus)
}

/// Create a System with `program` loaded and the PC at [`PROGRAM_BASE`]
#[allow(dead_code)]
pub fn system_with_program(program: &[u32]) -> System {
    system_with_config(&EmulatorConfig::default(), program)
}

#[allow(dead_code)]
pub fn system_with_config(config: &EmulatorConfig, program: &[u32]) -> System {
    let mut system = System::with_config(config);
    system
        .load_program(PROGRAM_BASE, program)
        .expect("program fits in RDRAM");
    system.cpu_mut().set_pc(PROGRAM_BASE);
    system
}
