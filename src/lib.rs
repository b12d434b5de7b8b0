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

//! Nintendo 64 emulator core library
//!
//! This library provides the core emulation components for an N64-style
//! machine: the VR4300 CPU with its COP0 exception/interrupt controller and
//! TLB, the physical memory bus, the RCP interface devices and a
//! deterministic cycle scheduler.
//!
//! # Example
//!
//! ```
//! use n64rx::core::cpu::CPU;
//! use n64rx::core::memory::Bus;
//!
//! let mut cpu = CPU::new();
//! let mut bus = Bus::new();
//!
//! // ori r1, r0, 0x2A at the start of RDRAM
//! bus.write32(0x8000_0000, 0x3401_002A);
//! cpu.set_pc(0x8000_0000);
//!
//! cpu.step(&mut bus).unwrap();
//! assert_eq!(cpu.reg(1), 0x2A);
//! ```

pub mod core;
