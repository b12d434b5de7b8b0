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

//! SP DMA and start-command tests

use super::*;

#[test]
fn test_sp_reset_status_halted() {
    let sp = Sp::new(Mi::shared());
    assert_eq!(sp.read_register(Sp::STATUS) & Sp::STATUS_HALT, Sp::STATUS_HALT);
}

#[test]
fn test_start_command_raises_sp_and_dp() {
    let mi = unmasked_mi();
    let mut sp = Sp::new(mi.clone());
    let mut mem = Memory::new(0x1000);

    sp.write_register(Sp::MEM_ADDR, 0x8000_0000, &mut mem);

    assert_eq!(mi.borrow().pending(), MiIntr::SP | MiIntr::DP);
    // The start command does not latch into MEM_ADDR
    assert_eq!(sp.read_register(Sp::MEM_ADDR), 0);
}

#[test]
fn test_status_ack_clears_sp() {
    let mi = unmasked_mi();
    let mut sp = Sp::new(mi.clone());
    let mut mem = Memory::new(0);
    sp.start();

    sp.write_register(Sp::STATUS, 1, &mut mem);

    assert_eq!(mi.borrow().pending(), MiIntr::DP);
}

#[test]
fn test_dma_rdram_to_dmem() {
    let mut sp = Sp::new(Mi::shared());
    let mut mem = Memory::new(0x1000);
    mem.write_rdram(0x200, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

    sp.write_register(Sp::MEM_ADDR, 0x0010, &mut mem);
    sp.write_register(Sp::DRAM_ADDR, 0x200, &mut mem);
    // Length 5 rounds up to 8
    sp.write_register(Sp::RD_LEN, 4, &mut mem);

    assert_eq!(&sp.mem()[0x10..0x18], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(sp.mem()[0x18], 0);
}

#[test]
fn test_dma_selects_imem() {
    let mut sp = Sp::new(Mi::shared());
    let mut mem = Memory::new(0x100);
    mem.write_rdram(0, &[0xAA; 8]);

    sp.write_register(Sp::MEM_ADDR, 0x1000, &mut mem);
    sp.write_register(Sp::DRAM_ADDR, 0, &mut mem);
    sp.write_register(Sp::RD_LEN, 7, &mut mem);

    assert_eq!(&sp.mem()[0x1000..0x1008], &[0xAA; 8]);
    assert!(sp.mem()[..0x1000].iter().all(|&b| b == 0));
}

#[test]
fn test_dma_dmem_to_rdram_with_rows_and_skip() {
    let mut sp = Sp::new(Mi::shared());
    let mut mem = Memory::new(0x100);
    for (i, byte) in sp.mem_mut()[..16].iter_mut().enumerate() {
        *byte = i as u8 + 1;
    }

    sp.write_register(Sp::MEM_ADDR, 0, &mut mem);
    sp.write_register(Sp::DRAM_ADDR, 0x40, &mut mem);
    // Two rows of 8 bytes, skip 8 bytes between them in RDRAM
    sp.write_register(Sp::WR_LEN, (8 << 20) | (1 << 12) | 7, &mut mem);

    assert_eq!(&mem.rdram()[0x40..0x48], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(&mem.rdram()[0x48..0x50], &[0; 8]);
    assert_eq!(&mem.rdram()[0x50..0x58], &[9, 10, 11, 12, 13, 14, 15, 16]);
}
