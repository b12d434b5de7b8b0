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

//! VI vblank and register tests

use super::*;

#[test]
fn test_vblank_sets_vint_and_pending() {
    let mi = unmasked_mi();
    let mut vi = Vi::new(mi.clone());

    vi.vblank();

    assert_eq!(vi.status() & Vi::VINT, Vi::VINT);
    assert!(mi.borrow().pending().contains(MiIntr::VI));
    assert_eq!(vi.frame_count(), 1);
}

#[test]
fn test_ack_clears_vint_and_pending() {
    let mi = unmasked_mi();
    let mut vi = Vi::new(mi.clone());
    let mut mem = Memory::new(0);
    vi.vblank();

    vi.write_register(Vi::STATUS, Vi::VINT, &mut mem);

    assert_eq!(vi.status() & Vi::VINT, 0);
    assert!(!mi.borrow().cpu_int_asserted());
}

#[test]
fn test_status_control_bits_latch() {
    let mut vi = Vi::new(Mi::shared());
    let mut mem = Memory::new(0);

    vi.write_register(Vi::STATUS, 0x0000_3202, &mut mem);

    assert_eq!(vi.read_register(Vi::STATUS), 0x0000_3202);
}

#[test]
fn test_origin_and_width() {
    let mut vi = Vi::new(Mi::shared());
    let mut mem = Memory::new(0);

    vi.write_register(Vi::ORIGIN, 0xA010_0000, &mut mem);
    vi.write_register(Vi::WIDTH, 640, &mut mem);

    assert_eq!(vi.origin(), 0x0010_0000);
    assert_eq!(vi.width(), 640);
}
