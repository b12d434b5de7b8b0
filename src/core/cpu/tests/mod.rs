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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, PC handling
//! - `instructions`: ALU, shift, multiply/divide and 64-bit instructions
//! - `memory_access`: loads, stores, unaligned pairs, LL/SC
//! - `branch`: delay slots, likely branches, jumps and links
//! - `exceptions`: synchronous exceptions, vectors, ERET, diagnostics
//! - `interrupts`: interrupt sampling and the branch-commit window
//! - `cop0`: COP0 register moves and write masks
//! - `cop1`: COP1 register-move stub and BC1
//! - `tlb`: TLB instructions and mapped translation
//! - `decode`: Instruction decoding
//! - `helpers`: instruction encoders and program setup

#[cfg(test)]
mod helpers;


#[cfg(test)]
mod instructions;
