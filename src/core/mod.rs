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

//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - CPU (NEC VR4300) with COP0, TLB and a COP1 register stub
//! - Memory bus (RDRAM, cartridge ROM, MMIO dispatch)
//! - MIPS interface (interrupt aggregation)
//! - RCP devices (SP, DP, VI, AI, PI, SI)
//! - Event scheduler
//! - System integration and save states

pub mod bitops;
pub mod config;
pub mod cpu;
pub mod error;
pub mod interrupt;
pub mod memory;
pub mod rcp;
pub mod save_state;
pub mod system;
pub mod timing;

// Re-export commonly used types
pub use config::EmulatorConfig;
pub use cpu::CPU;
pub use error::{EmulatorError, Result};
pub use memory::Bus;
pub use system::System;
