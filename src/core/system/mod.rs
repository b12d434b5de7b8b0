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

//! System integration module
//!
//! This module ties the CPU, the bus and the event scheduler together and
//! provides the cycle loop. Every cycle runs the callbacks due at that
//! cycle first, then exactly one CPU step.
//!
//! [`System::run_frame_loop`] is the reference driver: it signals vblank at
//! the start of each frame and services every exception that lands on the
//! general vector with the minimal handler in [`System::service_interrupt`].

use super::config::{EmulatorConfig, SystemConfig};
use super::cpu::{cause, COP0, CPU};
use super::error::{EmulatorError, Result};
use super::interrupt::MiIntr;
use super::memory::Bus;
use super::rcp::{Ai, Dp, Pi, Si, Sp, Vi};
use super::timing::{Cycle, Scheduler};

/// N64 System
///
/// Owns one CPU, one bus with its devices, and the scheduler that orders
/// device events against CPU steps.
///
/// # Example
///
/// ```
/// use n64rx::core::system::System;
///
/// let mut system = System::new();
/// // addiu r1, r0, 7 ; followed by NOPs
/// system.load_program(0x8000_0000, &[0x2401_0007]).unwrap();
/// system.cpu_mut().set_pc(0x8000_0000);
///
/// system.step_cycles(2).unwrap();
/// assert_eq!(system.cpu().reg(1), 7);
/// assert_eq!(system.cycles(), 2);
/// ```
pub struct System {
    /// CPU instance
    cpu: CPU,
    /// Memory bus and devices
    bus: Bus,
    /// Event queue and virtual clock
    scheduler: Scheduler,
    /// Frame loop and DMA timing
    config: SystemConfig,
}

impl System {
    /// Create a new System with the default configuration
    pub fn new() -> Self {
        Self::with_config(&EmulatorConfig::default())
    }

    /// Create a new System from `config`
    pub fn with_config(config: &EmulatorConfig) -> Self {
        log::info!(
            "System created: {} KiB RDRAM, fast_boot={}",
            config.rdram_size / 1024,
            config.cpu.fast_boot
        );

        Self {
            cpu: CPU::with_config(config.cpu.clone()),
            bus: Bus::with_config(config),
            scheduler: Scheduler::new(),
            config: config.system.clone(),
        }
    }

    /// Reset CPU, bus and scheduler
    ///
    /// Queued events are dropped and the clock restarts at cycle 0.
    /// ROM contents and controller input are kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.scheduler.reset();
        log::info!("System reset, PC=0x{:08X}", self.cpu.pc());
    }

    /// Load a cartridge ROM image from a file
    pub fn load_rom(&mut self, path: &str) -> Result<()> {
        self.bus.load_rom(path)
    }

    /// Copy big-endian instruction words into RDRAM
    ///
    /// `address` goes through the fixed segment remap, so KSEG0/KSEG1
    /// addresses are accepted. The PC is not changed.
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::ImageTooLarge` if the words do not fit in RDRAM.
    pub fn load_program(&mut self, address: u32, words: &[u32]) -> Result<()> {
        let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        self.load_image(address, &bytes)
    }

    /// Copy a raw big-endian image into RDRAM
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::ImageTooLarge` if the image does not fit in RDRAM.
    pub fn load_image(&mut self, address: u32, image: &[u8]) -> Result<()> {
        let start = Bus::virt_to_phys(address) as usize;
        let rdram = self.bus.rdram_mut();

        let end = start
            .checked_add(image.len())
            .filter(|&end| end <= rdram.len())
            .ok_or(EmulatorError::ImageTooLarge {
                address,
                size: image.len(),
            })?;

        rdram[start..end].copy_from_slice(image);
        log::debug!("Loaded {} bytes at 0x{:08X}", image.len(), address);
        Ok(())
    }

    /// Run one cycle
    ///
    /// Fires every event due at the current cycle, executes one CPU step,
    /// schedules completion of any DMA the step started, then advances the
    /// clock.
    ///
    /// # Returns
    ///
    /// Number of CPU cycles consumed by the step
    pub fn step(&mut self) -> Result<u32> {
        self.scheduler.run_due(&mut self.cpu, &mut self.bus);

        let cycles = self.cpu.step(&mut self.bus)?;

        let kicks = self.bus.take_dma_kicks();
        if self.config.dma_latency > 0 && !kicks.is_empty() {
            self.schedule_dma_completion(kicks);
        }

        self.scheduler.advance();
        Ok(cycles)
    }

    /// Run `n` cycles
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::system::System;
    ///
    /// let mut system = System::new();
    /// system.cpu_mut().set_pc(0x8000_0000);
    /// system.step_cycles(100).unwrap();
    /// assert_eq!(system.cpu().pc(), 0x8000_0000 + 400);
    /// ```
    pub fn step_cycles(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Queue `callback` to run at the start of `cycle`
    pub fn schedule_at<F>(&mut self, cycle: Cycle, callback: F)
    where
        F: FnMut(&mut CPU, &mut Bus) + 'static,
    {
        self.scheduler.schedule_at(cycle, callback);
    }

    /// Queue `callback` at `first`, `first + interval`, ... (`count` times)
    pub fn schedule_every<F>(&mut self, first: Cycle, interval: Cycle, count: usize, callback: F)
    where
        F: FnMut(&mut CPU, &mut Bus) + 'static,
    {
        self.scheduler.schedule_every(first, interval, count, callback);
    }

    fn schedule_dma_completion(&mut self, kicks: MiIntr) {
        let due = self.scheduler.current_cycle() + self.config.dma_latency;

        if kicks.contains(MiIntr::PI) {
            self.scheduler
                .schedule_at(due, |_cpu, bus: &mut Bus| bus.pi.complete_dma());
        }
        if kicks.contains(MiIntr::AI) {
            self.scheduler
                .schedule_at(due, |_cpu, bus: &mut Bus| bus.ai.complete_dma());
        }
        log::trace!("DMA completion {:?} scheduled at cycle {}", kicks, due);
    }

    /// Minimal exception handler
    ///
    /// If the CPU sits at the general exception vector with EXL set:
    /// acknowledges every pending MI source through its device STATUS
    /// register, re-arms Compare past Count when the timer interrupt is
    /// pending, then clears EXL and resumes at EPC.
    ///
    /// # Returns
    ///
    /// `true` if the handler ran
    pub fn service_interrupt(&mut self) -> bool {
        let cop0 = self.cpu.cop0();
        if !cop0.exl() || self.cpu.pc() != self.cpu.general_exception_vector() {
            return false;
        }

        let pending = self.bus.mi().pending();
        for source in pending.iter() {
            self.acknowledge(source);
        }

        if self.cpu.cop0().cause() & cause::IP7 != 0 {
            let count = self.cpu.cop0().read(COP0::COUNT);
            let compare = count.wrapping_add(self.config.compare_rearm_delta);
            self.cpu.cop0_mut().write(COP0::COMPARE, compare);
        }

        log::trace!(
            "Serviced exception (code {}), MI {:?}, resuming at 0x{:08X}",
            self.cpu.cop0().exc_code(),
            pending,
            self.cpu.cop0().read(COP0::EPC)
        );
        self.cpu.return_from_exception();
        true
    }

    /// Write the STATUS ack bit of the device owning `source`
    fn acknowledge(&mut self, source: MiIntr) {
        let (address, value) = if source == MiIntr::SP {
            (Sp::REG_BASE + Sp::STATUS, 1)
        } else if source == MiIntr::SI {
            (Si::BASE + Si::STATUS, 1)
        } else if source == MiIntr::AI {
            (Ai::BASE + Ai::STATUS, 1)
        } else if source == MiIntr::VI {
            (Vi::BASE + Vi::STATUS, self.bus.vi.status() | Vi::VINT)
        } else if source == MiIntr::PI {
            (Pi::BASE + Pi::STATUS, 1)
        } else if source == MiIntr::DP {
            (Dp::BASE + Dp::STATUS, 1)
        } else {
            return;
        };

        self.bus.write32_phys(address, value);
    }

    /// Run `frames` frames with the minimal handler installed
    ///
    /// Each frame raises vblank, then runs `cycles_per_frame` cycles,
    /// servicing the general vector after every step.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::config::EmulatorConfig;
    /// use n64rx::core::system::System;
    ///
    /// let mut config = EmulatorConfig::default();
    /// config.system.cycles_per_frame = 16;
    ///
    /// let mut system = System::with_config(&config);
    /// system.cpu_mut().set_pc(0x8000_0000);
    /// system.run_frame_loop(3).unwrap();
    ///
    /// assert_eq!(system.bus().vi.frame_count(), 3);
    /// assert_eq!(system.cycles(), 48);
    /// ```
    pub fn run_frame_loop(&mut self, frames: u32) -> Result<()> {
        for _ in 0..frames {
            self.bus.vi.vblank();
            for _ in 0..self.config.cycles_per_frame {
                self.step()?;
                self.service_interrupt();
            }
        }
        Ok(())
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Cycles executed since reset
    pub fn cycles(&self) -> Cycle {
        self.scheduler.current_cycle()
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
