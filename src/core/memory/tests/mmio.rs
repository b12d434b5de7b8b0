// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! MMIO routing tests

use super::*;

#[test]
fn test_mi_register_routing() {
    let mut bus = Bus::new();

    assert_eq!(bus.read32(0xA430_0004), Mi::VERSION_VALUE);

    bus.write32(0xA430_000C, MiIntr::VI.bits());
    bus.vi.vblank();

    assert_eq!(bus.read32(0xA430_0008), MiIntr::VI.bits());
    assert!(bus.interrupt_asserted());
}

#[test]
fn test_mi_sub_word_read() {
    let bus = Bus::new();

    // VERSION = 0x02020102
    assert_eq!(bus.read16_phys(0x0430_0004), 0x0202);
    assert_eq!(bus.read16_phys(0x0430_0006), 0x0102);
    assert_eq!(bus.read8_phys(0x0430_0007), 0x02);
}

#[test]
fn test_device_register_routing() {
    let mut bus = Bus::new();

    bus.write32(0xA440_0014, 0x0010_0000);
    bus.write32(0xA440_0018, 320);

    assert_eq!(bus.vi.origin(), 0x0010_0000);
    assert_eq!(bus.vi.width(), 320);
    assert_eq!(bus.read32(0xA440_0014), 0x0010_0000);
}

#[test]
fn test_device_sub_word_lanes() {
    let mut bus = Bus::new();

    bus.write32(0xA440_0018, 0x0000_0280);

    assert_eq!(bus.read16(0xA440_001A), 0x0280);
    assert_eq!(bus.read16(0xA440_0018), 0x0000);
    assert_eq!(bus.read8(0xA440_001B), 0x80);

    // Byte write lands in its lane; other lanes are written as zero
    bus.write8(0xA440_001A, 0x01);
    assert_eq!(bus.vi.width(), 0x100);
}

#[test]
fn test_sub_word_ack_write() {
    let mut bus = Bus::new();
    bus.vi.vblank();
    assert!(bus.mi().pending().contains(MiIntr::VI));

    // Low byte of STATUS carries VINT
    bus.write8(0xA440_0013, 0x01);

    assert!(!bus.mi().pending().contains(MiIntr::VI));
}

#[test]
fn test_rom_read_only() {
    let mut bus = helpers::create_bus_with_rom(8);

    assert_eq!(bus.read32(0xB000_0000), 0x0001_0203);
    assert_eq!(bus.read16(0xB000_0006), 0x0607);

    bus.write32(0xB000_0000, 0xFFFF_FFFF);
    assert_eq!(bus.read32(0xB000_0000), 0x0001_0203);

    // Past the end of the image
    assert_eq!(bus.read32(0xB000_0008), 0);
}

#[test]
fn test_pif_ram_window() {
    let mut bus = Bus::new();

    bus.write32(0xBFC0_07FC, 0x0000_0001);

    assert_eq!(bus.si.pif_ram()[63], 0x01);
    assert_eq!(bus.read8(0xBFC0_07FF), 0x01);
}

#[test]
fn test_sp_memory_window() {
    let mut bus = Bus::new();

    bus.write32(0xA400_0000, 0xDEAD_BEEF);
    bus.write32(0xA400_1000, 0x0BAD_F00D);

    assert_eq!(&bus.sp.mem()[0..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(&bus.sp.mem()[0x1000..0x1004], &[0x0B, 0xAD, 0xF0, 0x0D]);
    assert_eq!(bus.read32(0xA400_0000), 0xDEAD_BEEF);
}

#[test]
fn test_pi_dma_through_bus() {
    let mut bus = helpers::create_bus_with_rom(0x100);

    bus.write32(0xA460_0000, 0x0000_1000);
    bus.write32(0xA460_0004, 0x1000_0010);
    bus.write32(0xA460_0008, 7);

    assert_eq!(bus.read32(0x8000_1000), 0x1011_1213);
    assert_eq!(bus.read32(0x8000_1004), 0x1415_1617);
    assert_eq!(bus.take_dma_kicks(), MiIntr::PI);
    assert_eq!(bus.take_dma_kicks(), MiIntr::empty());
}

#[test]
fn test_clear_all_interrupts() {
    let mut bus = Bus::new();
    bus.mi_mut().raise(MiIntr::all());

    bus.clear_all_interrupts();

    assert!(bus.mi().pending().is_empty());
}

#[test]
fn test_load_rom_missing_file() {
    let mut bus = Bus::new();

    let result = bus.load_rom("/nonexistent/path/game.z64");

    assert!(matches!(result, Err(EmulatorError::RomNotFound(_))));
}
