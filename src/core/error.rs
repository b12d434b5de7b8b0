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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Architectural CPU exceptions are not represented here: they are
/// delivered through COP0 state. These errors describe host-side failures
/// and conditions the emulator refuses to continue from.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("ROM file not found: {0}")]
    RomNotFound(String),

    #[error("Program image too large: {size} bytes at 0x{address:08X}")]
    ImageTooLarge { address: u32, size: usize },

    #[error("Unsupported instruction: 0x{instruction:08X} at PC=0x{pc:08X}")]
    UnsupportedInstruction { instruction: u32, pc: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Save state encode error: {0}")]
    SaveStateEncode(#[from] bincode::error::EncodeError),

    #[error("Save state decode error: {0}")]
    SaveStateDecode(#[from] bincode::error::DecodeError),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    SaveStateVersion { expected: u32, got: u32 },

    #[error("Save state does not match this system: {0}")]
    SaveStateMismatch(String),
}
