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

//! Reality Co-Processor interface devices
//!
//! Each device owns a small register window at a fixed physical base and a
//! shared [`MiHandle`](crate::core::interrupt::MiHandle) for raising and
//! acknowledging its MI pending bit.
//!
//! | Device | Base          | Purpose                                   |
//! |--------|---------------|-------------------------------------------|
//! | SP     | 0x0404_0000   | RSP registers, DMEM/IMEM at 0x0400_0000   |
//! | DP     | 0x0410_0000   | RDP command registers                     |
//! | VI     | 0x0440_0000   | Video output, vblank interrupt            |
//! | AI     | 0x0450_0000   | Audio DMA                                 |
//! | PI     | 0x0460_0000   | Cartridge DMA                             |
//! | SI     | 0x0480_0000   | PIF RAM DMA and controller commands       |

mod ai;
mod dp;
mod pi;
mod si;
mod sp;
mod vi;

#[cfg(test)]
mod tests;

pub use ai::Ai;
pub use dp::Dp;
pub use pi::Pi;
pub use si::{ControllerState, Si, CONTROLLER_PORTS, PIF_RAM_SIZE};
pub use sp::Sp;
pub use vi::Vi;
