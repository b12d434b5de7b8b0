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

//! PI cartridge DMA tests

use super::*;

fn memory_with_rom() -> Memory {
    let mut mem = Memory::new(0x1000);
    mem.set_rom((0..=255u8).collect());
    mem
}

#[test]
fn test_rd_len_copies_rom_and_sets_busy() {
    let mut pi = Pi::new(Mi::shared());
    let mut mem = memory_with_rom();

    pi.write_register(Pi::DRAM_ADDR, 0x100, &mut mem);
    pi.write_register(Pi::CART_ADDR, 0x1000_0040, &mut mem);
    pi.write_register(Pi::RD_LEN, 0x0F, &mut mem);

    let expected: Vec<u8> = (0x40..0x50).collect();
    assert_eq!(&mem.rdram()[0x100..0x110], expected.as_slice());
    assert_eq!(pi.status(), Pi::DMA_BUSY | Pi::IO_BUSY);
}

#[test]
fn test_rd_len_past_rom_end_reads_zero() {
    let mut pi = Pi::new(Mi::shared());
    let mut mem = memory_with_rom();
    mem.write_rdram(0, &[0xFF; 8]);

    pi.write_register(Pi::DRAM_ADDR, 0, &mut mem);
    pi.write_register(Pi::CART_ADDR, 0x1000_00FC, &mut mem);
    pi.write_register(Pi::RD_LEN, 7, &mut mem);

    assert_eq!(&mem.rdram()[0..8], &[0xFC, 0xFD, 0xFE, 0xFF, 0, 0, 0, 0]);
}

#[test]
fn test_complete_and_ack() {
    let mi = unmasked_mi();
    let mut pi = Pi::new(mi.clone());
    let mut mem = memory_with_rom();
    pi.write_register(Pi::RD_LEN, 3, &mut mem);

    pi.complete_dma();
    assert_eq!(pi.status(), 0);
    assert!(mi.borrow().cpu_int_asserted());

    pi.write_register(Pi::STATUS, 1, &mut mem);
    assert!(!mi.borrow().cpu_int_asserted());
}

#[test]
fn test_status_bits_clear_independently() {
    let mut pi = Pi::new(Mi::shared());
    let mut mem = memory_with_rom();
    pi.write_register(Pi::RD_LEN, 3, &mut mem);

    pi.write_register(Pi::STATUS, 2, &mut mem);
    assert_eq!(pi.status(), Pi::DMA_BUSY);

    pi.write_register(Pi::STATUS, 1, &mut mem);
    assert_eq!(pi.status(), 0);
}

#[test]
fn test_wr_len_only_latches() {
    let mut pi = Pi::new(Mi::shared());
    let mut mem = memory_with_rom();

    pi.write_register(Pi::WR_LEN, 0x7F, &mut mem);

    assert_eq!(pi.read_register(Pi::WR_LEN), 0x7F);
    assert_eq!(pi.status(), 0);
    assert!(mem.rdram().iter().all(|&b| b == 0));
}
