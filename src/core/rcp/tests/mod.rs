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

//! RCP device tests
//!
//! Each device is driven through its `IODevice` register interface with a
//! private MI handle and a small `Memory`.

use super::*;
use crate::core::interrupt::{Mi, MiHandle, MiIntr};
use crate::core::memory::{IODevice, Memory};

mod pi;
mod sp;
mod vi;

/// MI with every source unmasked, so `cpu_int_asserted` tracks pending
fn unmasked_mi() -> MiHandle {
    let mi = Mi::shared();
    mi.borrow_mut().write_register(Mi::MASK, MiIntr::all().bits());
    mi
}
