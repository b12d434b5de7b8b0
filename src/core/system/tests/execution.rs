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

//! Cycle loop and event ordering

use super::super::*;
use crate::core::config::EmulatorConfig;
use std::cell::RefCell;
use std::rc::Rc;

const BASE: u32 = 0x8000_0400;

fn setup(program: &[u32]) -> System {
    let mut system = System::new();
    system.load_program(BASE, program).unwrap();
    system.cpu_mut().set_pc(BASE);
    system
}

#[test]
fn test_step_runs_one_instruction_per_cycle() {
    // addiu r1, r0, 1 ; addiu r1, r1, 1 ; addiu r1, r1, 1
    let mut system = setup(&[0x2401_0001, 0x2421_0001, 0x2421_0001]);

    assert_eq!(system.step().unwrap(), 1);
    assert_eq!(system.cpu().reg(1), 1);
    assert_eq!(system.cycles(), 1);

    system.step_cycles(2).unwrap();
    assert_eq!(system.cpu().reg(1), 3);
    assert_eq!(system.cycles(), 3);
    assert_eq!(system.pc(), BASE + 12);
}

#[test]
fn test_event_runs_before_cpu_step_of_its_cycle() {
    // nop ; addu r3, r2, r0
    let mut system = setup(&[0x0000_0000, 0x0040_1821]);
    system.schedule_at(1, |cpu, _bus| cpu.set_reg(2, 5));

    system.step_cycles(2).unwrap();

    assert_eq!(system.cpu().reg(3), 5);
}

#[test]
fn test_event_not_seen_by_earlier_cycle() {
    // addu r3, r2, r0 ; nop
    let mut system = setup(&[0x0040_1821, 0x0000_0000]);
    system.schedule_at(1, |cpu, _bus| cpu.set_reg(2, 5));

    system.step_cycles(2).unwrap();

    assert_eq!(system.cpu().reg(3), 0);
    assert_eq!(system.cpu().reg(2), 5);
}

#[test]
fn test_events_same_cycle_fifo() {
    let mut system = setup(&[]);
    let order = Rc::new(RefCell::new(Vec::new()));

    for id in 0..4 {
        let order = Rc::clone(&order);
        system.schedule_at(3, move |_cpu, _bus| order.borrow_mut().push(id));
    }
    let early = Rc::clone(&order);
    system.schedule_at(2, move |_cpu, _bus| early.borrow_mut().push(99));

    system.step_cycles(4).unwrap();

    assert_eq!(*order.borrow(), vec![99, 0, 1, 2, 3]);
    assert_eq!(system.scheduler().pending_events(), 0);
}

#[test]
fn test_schedule_every_fires_count_times() {
    let mut system = setup(&[]);
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);

    system.schedule_every(0, 10, 3, move |_cpu, _bus| sink.borrow_mut().push(()));

    system.step_cycles(25).unwrap();
    assert_eq!(fired.borrow().len(), 3);

    system.step_cycles(100).unwrap();
    assert_eq!(fired.borrow().len(), 3);
}

#[test]
fn test_event_in_the_past_runs_next_cycle() {
    let mut system = setup(&[]);
    system.step_cycles(10).unwrap();

    system.schedule_at(2, |cpu, _bus| cpu.set_reg(7, 0x77));
    system.step().unwrap();

    assert_eq!(system.cpu().reg(7), 0x77);
}

#[test]
fn test_event_drives_device_through_bus() {
    let mut system = setup(&[]);
    system.schedule_at(0, |_cpu, bus| bus.vi.vblank());

    system.step().unwrap();

    assert_eq!(system.bus().vi.frame_count(), 1);
    assert!(system.bus().mi().pending().contains(MiIntr::VI));
}

#[test]
fn test_count_follows_cycles() {
    let mut system = setup(&[]);

    system.step_cycles(50).unwrap();

    assert_eq!(system.cpu().cop0().read(COP0::COUNT), 50);
}

#[test]
fn test_fatal_error_stops_step_cycles() {
    let mut config = EmulatorConfig::default();
    config.cpu.halt_on_unknown = true;
    let mut system = System::with_config(&config);
    // nop ; reserved opcode 0x1C ; addiu r1, r0, 1
    system
        .load_program(BASE, &[0x0000_0000, 0x7000_0000, 0x2401_0001])
        .unwrap();
    system.cpu_mut().set_pc(BASE);

    let result = system.step_cycles(3);

    match result {
        Err(EmulatorError::UnsupportedInstruction { instruction, pc }) => {
            assert_eq!(instruction, 0x7000_0000);
            assert_eq!(pc, BASE + 4);
        }
        other => panic!("expected UnsupportedInstruction, got {:?}", other),
    }
    assert_eq!(system.cpu().reg(1), 0);
    assert_eq!(system.cycles(), 1);
}

#[test]
fn test_unknown_opcode_is_reserved_instruction_by_default() {
    let mut system = setup(&[0x7000_0000]);
    system.cpu_mut().cop0_mut().write(COP0::STATUS, 0);

    system.step().unwrap();

    assert!(system.cpu().cop0().exl());
    assert_eq!(system.cpu().cop0().exc_code(), 10);
    assert_eq!(system.pc(), 0x8000_0180);
    assert_eq!(system.cpu().cop0().read(COP0::EPC), BASE);
}
