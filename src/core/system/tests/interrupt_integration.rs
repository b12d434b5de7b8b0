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

//! Interrupt delivery and the minimal handler

use super::super::*;
use crate::core::config::EmulatorConfig;
use crate::core::cpu::status;
use crate::core::interrupt::Mi;

const BASE: u32 = 0x8000_0400;
const VECTOR: u32 = 0x8000_0180;
const IM2: u32 = 1 << 10;
const IM7: u32 = 1 << 15;

/// NOP program at BASE, runtime vectors, RCP line unmasked for `sources`
fn setup_interrupts(config: &EmulatorConfig, sources: MiIntr) -> System {
    let mut system = System::with_config(config);
    system.cpu_mut().set_pc(BASE);
    system
        .cpu_mut()
        .cop0_mut()
        .write(COP0::STATUS, status::IE | IM2 | IM7);
    system
        .bus_mut()
        .write32_phys(Mi::BASE + Mi::MASK, sources.bits());
    system
}

fn setup_default(sources: MiIntr) -> System {
    setup_interrupts(&EmulatorConfig::default(), sources)
}

#[test]
fn test_scheduled_vblank_interrupts_at_next_fetch() {
    let mut system = setup_default(MiIntr::VI);
    system.schedule_at(3, |_cpu, bus| bus.vi.vblank());

    system.step_cycles(3).unwrap();
    assert_eq!(system.pc(), BASE + 12);
    assert!(!system.cpu().cop0().exl());

    system.step().unwrap();

    let cop0 = system.cpu().cop0();
    assert_eq!(system.pc(), VECTOR);
    assert!(cop0.exl());
    assert_eq!(cop0.exc_code(), 0);
    assert_ne!(cop0.cause() & cause::IP2, 0);
    assert_eq!(cop0.read(COP0::EPC), BASE + 12);
}

#[test]
fn test_service_interrupt_acks_vi_and_resumes() {
    let mut system = setup_default(MiIntr::VI);
    system.bus_mut().vi.vblank();
    system.step().unwrap();
    assert_eq!(system.pc(), VECTOR);

    assert!(system.service_interrupt());

    assert_eq!(system.pc(), BASE);
    assert!(!system.cpu().cop0().exl());
    assert!(system.bus().mi().pending().is_empty());
    assert_eq!(system.bus().vi.status() & Vi::VINT, 0);

    // Resumed code runs normally
    system.step().unwrap();
    assert_eq!(system.pc(), BASE + 4);
}

#[test]
fn test_service_interrupt_keeps_vi_control_bits() {
    let mut system = setup_default(MiIntr::VI);
    system.bus_mut().write32_phys(Vi::BASE + Vi::STATUS, 0x0000_3002);
    system.bus_mut().vi.vblank();
    system.step().unwrap();

    system.service_interrupt();

    assert_eq!(system.bus().vi.status(), 0x0000_3002);
}

#[test]
fn test_service_interrupt_outside_vector_does_nothing() {
    let mut system = setup_default(MiIntr::VI);
    system.step().unwrap();

    assert!(!system.service_interrupt());
    assert_eq!(system.pc(), BASE + 4);
}

#[test]
fn test_service_interrupt_acks_every_pending_device() {
    let all = MiIntr::SP | MiIntr::SI | MiIntr::AI | MiIntr::VI | MiIntr::PI | MiIntr::DP;
    let mut system = setup_default(all);
    {
        let bus = system.bus_mut();
        bus.vi.vblank();
        bus.dp.raise_interrupt();
        bus.pi.complete_dma();
        bus.ai.complete_dma();
        bus.si_kick_read_64b();
        bus.write32_phys(Sp::REG_BASE + Sp::MEM_ADDR, Sp::START_COMMAND);
    }
    assert_eq!(system.bus().mi().pending(), all);

    system.step().unwrap();
    assert!(system.service_interrupt());

    assert!(system.bus().mi().pending().is_empty());
    assert!(!system.bus().interrupt_asserted());
    assert_eq!(system.bus().dp.status() & (Dp::CMD_BUSY | Dp::PIPE_BUSY), 0);
    assert_eq!(
        system.bus().read32_phys(Si::BASE + Si::STATUS) & Si::STATUS_INTERRUPT,
        0
    );
}

#[test]
fn test_timer_interrupt_rearms_compare() {
    let mut system = setup_default(MiIntr::empty());
    system.cpu_mut().cop0_mut().write(COP0::COMPARE, 5);

    system.step_cycles(5).unwrap();

    assert_eq!(system.pc(), VECTOR);
    assert_ne!(system.cpu().cop0().cause() & cause::IP7, 0);
    assert_eq!(system.cpu().cop0().read(COP0::EPC), BASE + 16);

    assert!(system.service_interrupt());

    let cop0 = system.cpu().cop0();
    assert_eq!(cop0.cause() & cause::IP7, 0);
    assert_eq!(
        cop0.read(COP0::COMPARE),
        cop0.read(COP0::COUNT) + system.config().compare_rearm_delta
    );
    assert_eq!(system.pc(), BASE + 16);
}

#[test]
fn test_frame_loop_services_vblank_each_frame() {
    let mut config = EmulatorConfig::default();
    config.system.cycles_per_frame = 8;
    let mut system = setup_interrupts(&config, MiIntr::VI);

    system.run_frame_loop(2).unwrap();

    // One step per frame is spent taking the interrupt
    assert_eq!(system.pc(), BASE + 14 * 4);
    assert_eq!(system.cycles(), 16);
    assert_eq!(system.bus().vi.frame_count(), 2);
    assert!(system.bus().mi().pending().is_empty());
    assert!(!system.cpu().cop0().exl());
}

#[test]
fn test_frame_loop_services_scheduled_dp_interrupt() {
    let mut config = EmulatorConfig::default();
    config.system.cycles_per_frame = 16;
    let mut system = setup_interrupts(&config, MiIntr::DP);
    system.schedule_at(5, |_cpu, bus| bus.dp.raise_interrupt());

    system.run_frame_loop(1).unwrap();

    assert_eq!(system.bus().dp.status() & Dp::CMD_BUSY, 0);
    // The masked vblank is acknowledged along with DP
    assert!(system.bus().mi().pending().is_empty());
    assert!(!system.cpu().cop0().exl());
    assert_eq!(system.pc(), BASE + 15 * 4);
}

#[test]
fn test_interrupt_at_branch_commit_through_system() {
    // beq r0, r0, +4 ; addiu r1, r0, 1 ; nop ; nop ; nop ; addiu r2, r0, 2
    let program = [
        0x1000_0004,
        0x2401_0001,
        0x0000_0000,
        0x0000_0000,
        0x0000_0000,
        0x0000_0000,
        0x2402_0002,
    ];
    let mut system = setup_default(MiIntr::VI);
    system.load_program(BASE, &program).unwrap();
    // Raised after the delay slot ran, before the branch commits
    system.schedule_at(2, |_cpu, bus| bus.vi.vblank());

    system.step_cycles(3).unwrap();

    let cop0 = system.cpu().cop0();
    assert_eq!(system.pc(), VECTOR);
    assert_eq!(cop0.read(COP0::EPC), BASE);
    assert_ne!(cop0.cause() & cause::BD, 0);
    assert_eq!(system.cpu().reg(1), 1);

    // The handler returns to the branch, which runs again
    assert!(system.service_interrupt());
    system.step_cycles(4).unwrap();
    assert_eq!(system.pc(), BASE + 0x18);
    system.step().unwrap();
    assert_eq!(system.cpu().reg(2), 2);
}

#[test]
fn test_exception_with_exl_not_taken_again() {
    let mut system = setup_default(MiIntr::VI);
    system.bus_mut().vi.vblank();
    system.step().unwrap();
    assert_eq!(system.pc(), VECTOR);

    // Without servicing, the handler code runs with the line still asserted
    system.step_cycles(2).unwrap();
    assert_eq!(system.pc(), VECTOR + 8);
    assert_eq!(system.cpu().cop0().read(COP0::EPC), BASE);
}
