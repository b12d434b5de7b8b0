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

use crate::core::bitops::sext32;
use crate::core::config::CpuConfig;
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Bus;
use crate::core::save_state::{CpuState, StateSave};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// CPU (NEC VR4300, MIPS III) emulation implementation
///
/// # Specifications
/// - Architecture: MIPS III (64-bit registers, 32-bit addressing)
/// - Registers: 32 64-bit general-purpose registers + HI/LO
/// - COP0 with a 32-entry TLB, COP1 register-move stub
///
/// # Branches
///
/// A taken or not-taken branch does not redirect immediately. The next
/// step executes the delay slot and leaves the branch commit-pending; the
/// step after that commits it, unless an interrupt arrives first, in which
/// case the exception is reported against the branch with BD=1.
///
/// # Example
/// ```
/// use n64rx::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// ```
pub struct CPU {
    /// General purpose registers (r0-r31)
    ///
    /// r0 is hardwired to always return 0
    regs: [u64; 32],

    /// Program counter (next fetch address)
    pc: u32,

    /// HI register (multiplication high / division remainder)
    hi: u64,

    /// LO register (multiplication low / division quotient)
    lo: u64,

    /// Coprocessor 0 (System Control Unit)
    cop0: COP0,

    /// Translation lookaside buffer
    tlb: Tlb,

    /// Coprocessor 1 register stub
    fpu: FPU,

    /// Delayed branch state machine
    branch: BranchState,

    /// Branch address while the current instruction is a delay slot
    delay_slot_of: Option<u32>,

    /// Set by ERET so a delay-slot ERET does not commit the branch
    discard_branch: bool,

    /// Address of the instruction being executed
    current_pc: u32,

    /// Current instruction (for debugging)
    current_instruction: u32,

    /// LL/SC link flag
    ll_bit: bool,

    /// Physical address and width covered by the link
    ll_addr: u32,
    ll_len: u32,

    /// Behavior switches
    config: CpuConfig,

    /// Signatures of unimplemented encodings already reported
    reported_unknown: HashSet<String>,

    /// Receiver for unimplemented-instruction reports
    diagnostic_handler: Option<Box<dyn FnMut(&Diagnostic)>>,

    /// Consecutive steps spent inside the general vector (fast boot)
    vector_spin: u32,
}

/// Delayed branch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchState {
    /// No branch in flight
    None,
    /// Branch decoded; its delay slot runs on the next step
    DelaySlot { branch_pc: u32, target: u32 },
    /// Delay slot done; the branch commits on the next step
    CommitPending { branch_pc: u32, target: u32 },
}

/// Memory access kind used for translation and fault classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
    Execute,
}

/// An architectural exception raised while executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{cause:?} exception (bad vaddr: {bad_vaddr:08X?})")]
pub struct CpuException {
    /// Exception class
    pub cause: ExceptionCause,
    /// Faulting virtual address, for address and TLB exceptions
    pub bad_vaddr: Option<u32>,
    /// TLB miss eligible for the refill vector
    pub refill: bool,
}

impl CpuException {
    pub fn new(cause: ExceptionCause) -> Self {
        Self {
            cause,
            bad_vaddr: None,
            refill: false,
        }
    }

    pub fn with_address(cause: ExceptionCause, vaddr: u32) -> Self {
        Self {
            cause,
            bad_vaddr: Some(vaddr),
            refill: false,
        }
    }

    pub fn tlb_miss(cause: ExceptionCause, vaddr: u32) -> Self {
        Self {
            cause,
            bad_vaddr: Some(vaddr),
            refill: true,
        }
    }
}

/// Outcome of a failed fetch/execute
#[derive(Debug)]
pub(crate) enum Fault {
    /// Architectural exception, delivered through COP0
    Exception(CpuException),
    /// Unrecoverable condition, surfaced to the caller
    Fatal(EmulatorError),
}

impl From<CpuException> for Fault {
    fn from(exception: CpuException) -> Self {
        Fault::Exception(exception)
    }
}

impl From<EmulatorError> for Fault {
    fn from(error: EmulatorError) -> Self {
        Fault::Fatal(error)
    }
}

/// Result of the fetch/execute path
pub(crate) type Exec<T = ()> = std::result::Result<T, Fault>;

/// Report of an unimplemented instruction encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable signature (opcode group and function fields)
    pub signature: String,
    /// Address of the instruction
    pub pc: u32,
    /// Raw instruction word
    pub instruction: u32,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unimplemented {} (0x{:08X}) at PC=0x{:08X}",
            self.signature, self.instruction, self.pc
        )
    }
}

// Module declarations
mod cop0;
mod decode;
mod fpu;
mod instructions;
#[cfg(test)]
mod tests;
mod tlb;
mod translate;

// Re-exports
pub use cop0::{cause, status, ExceptionCause, COP0};
pub use fpu::FPU;
pub use tlb::{PageHalf, Tlb, TlbEntry, TlbHit, TLB_ENTRIES};

impl CPU {
    /// Base of the exception vectors when BEV=0
    pub const VECTOR_BASE: u32 = 0x8000_0000;
    /// Base of the exception vectors when BEV=1
    pub const VECTOR_BASE_BEV: u32 = 0xBFC0_0000;
    /// Offset of the general exception vector
    pub const GENERAL_VECTOR_OFFSET: u32 = 0x180;

    /// Create a new CPU instance with the default configuration
    ///
    /// # Example
    /// ```
    /// use n64rx::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.pc(), 0xBFC0_0000);
    /// ```
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    /// Create a new CPU instance
    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            regs: [0u64; 32],
            pc: config.reset_pc,
            hi: 0,
            lo: 0,
            cop0: COP0::new(),
            tlb: Tlb::new(),
            fpu: FPU::new(),
            branch: BranchState::None,
            delay_slot_of: None,
            discard_branch: false,
            current_pc: config.reset_pc,
            current_instruction: 0,
            ll_bit: false,
            ll_addr: 0,
            ll_len: 0,
            config,
            reported_unknown: HashSet::new(),
            diagnostic_handler: None,
            vector_spin: 0,
        }
    }

    /// Reset CPU to initial state
    ///
    /// Diagnostic de-duplication and the installed handler survive reset.
    pub fn reset(&mut self) {
        self.regs = [0u64; 32];
        self.pc = self.config.reset_pc;
        self.hi = 0;
        self.lo = 0;
        self.cop0.reset();
        self.tlb.reset();
        self.fpu.reset();
        self.branch = BranchState::None;
        self.delay_slot_of = None;
        self.discard_branch = false;
        self.current_pc = self.config.reset_pc;
        self.current_instruction = 0;
        self.ll_bit = false;
        self.vector_spin = 0;
    }

    /// Read a general purpose register (64-bit)
    ///
    /// # Example
    /// ```
    /// use n64rx::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(0, 0xDEAD_BEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u64 {
        if index == 0 {
            0
        } else {
            self.regs[(index & 0x1F) as usize]
        }
    }

    /// Low 32 bits of a register
    #[inline(always)]
    pub fn reg32(&self, index: u8) -> u32 {
        self.reg(index) as u32
    }

    /// Write a full 64-bit value; writes to r0 are discarded
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u64) {
        if index != 0 {
            self.regs[(index & 0x1F) as usize] = value;
        }
    }

    /// Write a 32-bit result, sign-extending bit 31 into the high half
    ///
    /// # Example
    /// ```
    /// use n64rx::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg32(2, 0x8000_0000);
    /// assert_eq!(cpu.reg(2), 0xFFFF_FFFF_8000_0000);
    /// ```
    #[inline(always)]
    pub fn set_reg32(&mut self, index: u8, value: u32) {
        self.set_reg(index, sext32(value));
    }

    /// Get current PC value (next fetch address)
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Redirect execution, discarding any branch in flight
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.branch = BranchState::None;
    }

    pub fn hi(&self) -> u64 {
        self.hi
    }

    pub fn lo(&self) -> u64 {
        self.lo
    }

    pub fn cop0(&self) -> &COP0 {
        &self.cop0
    }

    pub fn cop0_mut(&mut self) -> &mut COP0 {
        &mut self.cop0
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    pub fn tlb_mut(&mut self) -> &mut Tlb {
        &mut self.tlb
    }

    pub fn fpu(&self) -> &FPU {
        &self.fpu
    }

    pub fn fpu_mut(&mut self) -> &mut FPU {
        &mut self.fpu
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Branch state machine position
    pub fn branch_state(&self) -> BranchState {
        self.branch
    }

    /// Check if the instruction being executed is a delay slot
    pub fn in_delay_slot(&self) -> bool {
        self.delay_slot_of.is_some()
    }

    /// Last fetched instruction word
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Install a receiver for unimplemented-instruction reports
    ///
    /// Each distinct encoding signature is reported once per CPU instance.
    /// Without a handler, reports go to `log::warn!`.
    pub fn set_diagnostic_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Diagnostic) + 'static,
    {
        self.diagnostic_handler = Some(Box::new(handler));
    }

    /// General exception vector for the current BEV setting
    pub fn general_exception_vector(&self) -> u32 {
        self.vector_base() + Self::GENERAL_VECTOR_OFFSET
    }

    fn vector_base(&self) -> u32 {
        if self.cop0.bev() {
            Self::VECTOR_BASE_BEV
        } else {
            Self::VECTOR_BASE
        }
    }

    /// Execute one step
    ///
    /// One step is exactly one of:
    /// 1. Commit a commit-pending branch, unless an interrupt preempts it
    /// 2. Execute the delay slot of a pending branch
    /// 3. Sample interrupts, then fetch and execute the next instruction
    ///
    /// COP0 Count advances once per step.
    ///
    /// # Returns
    ///
    /// Number of cycles consumed (always 1)
    ///
    /// # Errors
    ///
    /// Architectural exceptions are delivered through COP0 and never
    /// returned. Only fatal conditions (e.g. an unimplemented opcode with
    /// `halt_on_unknown`) produce an error.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::cpu::CPU;
    /// use n64rx::core::memory::Bus;
    ///
    /// let mut cpu = CPU::new();
    /// let mut bus = Bus::new();
    /// cpu.set_pc(0x8000_0000); // NOP in RDRAM
    ///
    /// assert_eq!(cpu.step(&mut bus).unwrap(), 1);
    /// assert_eq!(cpu.pc(), 0x8000_0004);
    /// ```
    pub fn step(&mut self, bus: &mut Bus) -> Result<u32> {
        self.cop0.tick();

        match self.branch {
            BranchState::CommitPending { branch_pc, target } => {
                self.branch = BranchState::None;
                if self.sample_interrupts(bus) {
                    self.raise_exception(CpuException::new(ExceptionCause::Interrupt), branch_pc, true);
                } else {
                    self.pc = target;
                }
            }
            BranchState::DelaySlot { branch_pc, target } => {
                self.branch = BranchState::None;
                self.delay_slot_of = Some(branch_pc);
                self.discard_branch = false;
                let result = self.fetch_and_execute(bus);
                self.delay_slot_of = None;

                match result {
                    Ok(()) if self.discard_branch => {}
                    Ok(()) => {
                        if let BranchState::DelaySlot { branch_pc: inner, .. } = self.branch {
                            log::debug!(
                                "Branch at 0x{:08X} in delay slot of 0x{:08X} ignored",
                                inner,
                                branch_pc
                            );
                        }
                        self.branch = BranchState::CommitPending { branch_pc, target };
                    }
                    Err(fault) => self.handle_fault(fault, branch_pc, true)?,
                }
            }
            BranchState::None => {
                if self.check_vector_spin(bus) {
                    return Ok(1);
                }

                if self.sample_interrupts(bus) {
                    let epc = self.pc;
                    self.raise_exception(CpuException::new(ExceptionCause::Interrupt), epc, false);
                    return Ok(1);
                }

                if let Err(fault) = self.fetch_and_execute(bus) {
                    let epc = self.current_pc;
                    self.handle_fault(fault, epc, false)?;
                }
            }
        }

        Ok(1)
    }

    /// Refresh Cause.IP2 from the MI line and decide whether to trap
    fn sample_interrupts(&mut self, bus: &Bus) -> bool {
        self.cop0.set_rcp_interrupt(bus.interrupt_asserted());
        self.cop0.interrupt_pending()
    }

    fn fetch_and_execute(&mut self, bus: &mut Bus) -> Exec {
        let pc = self.pc;
        self.current_pc = pc;

        if pc & 0x3 != 0 {
            return Err(CpuException::with_address(ExceptionCause::AddressErrorLoad, pc).into());
        }

        let paddr = self.translate_address(pc, AccessKind::Execute)?;
        let instruction = bus.read32_phys(paddr);
        self.current_instruction = instruction;
        self.pc = pc.wrapping_add(4);

        self.execute_instruction(instruction, bus)
    }

    fn handle_fault(&mut self, fault: Fault, epc: u32, in_delay_slot: bool) -> Result<()> {
        match fault {
            Fault::Exception(exception) => {
                self.raise_exception(exception, epc, in_delay_slot);
                Ok(())
            }
            Fault::Fatal(error) => {
                log::error!("Fatal CPU error at PC=0x{:08X}: {}", self.current_pc, error);
                Err(error)
            }
        }
    }

    /// Enter an exception
    ///
    /// Fills EntryHi/Context for TLB faults, records the exception in COP0
    /// and vectors. TLB misses taken with EXL clear use the refill vector at
    /// the base; everything else uses base + 0x180.
    pub fn raise_exception(&mut self, exception: CpuException, epc: u32, in_delay_slot: bool) {
        let exl_at_fault = self.cop0.exl();

        if let (
            ExceptionCause::TlbLoad | ExceptionCause::TlbStore | ExceptionCause::TlbModified,
            Some(vaddr),
        ) = (exception.cause, exception.bad_vaddr)
        {
            self.cop0.set_tlb_fault(vaddr);
        }

        self.cop0
            .set_exception(exception.cause, epc, exception.bad_vaddr, in_delay_slot);

        let base = self.vector_base();
        let vector = if exception.refill && !exl_at_fault {
            base
        } else {
            base + Self::GENERAL_VECTOR_OFFSET
        };

        if exception.cause == ExceptionCause::Interrupt {
            log::trace!(
                "Interrupt: EPC=0x{:08X} BD={} Cause=0x{:08X}",
                epc,
                in_delay_slot,
                self.cop0.cause()
            );
        } else {
            log::debug!(
                "EXCEPTION: cause={:?}, EPC=0x{:08X}, vector=0x{:08X}, in_delay={}, instruction=0x{:08X}",
                exception.cause,
                epc,
                vector,
                in_delay_slot,
                self.current_instruction
            );
        }

        self.pc = vector;
        self.branch = BranchState::None;
        self.discard_branch = true;
    }

    /// Leave exception level and resume at EPC
    ///
    /// Clears EXL, drops any branch in flight and the LL link.
    pub fn return_from_exception(&mut self) {
        self.cop0.clear_exl();
        self.pc = self.cop0.read(COP0::EPC);
        self.branch = BranchState::None;
        self.discard_branch = true;
        self.ll_bit = false;
        self.vector_spin = 0;
    }

    /// Fast-boot escape from exception handlers that are not modeled
    ///
    /// When the CPU has been sitting inside the general vector with EXL set
    /// for `vector_spin_threshold` steps, all MI interrupts are dropped, the
    /// timer interrupt is acknowledged and execution resumes at EPC.
    fn check_vector_spin(&mut self, bus: &mut Bus) -> bool {
        if !self.config.fast_boot {
            return false;
        }

        let vector = self.general_exception_vector();
        if !(self.cop0.exl() && (vector..vector + 0x80).contains(&self.pc)) {
            self.vector_spin = 0;
            return false;
        }

        self.vector_spin += 1;
        if self.vector_spin < self.config.vector_spin_threshold {
            return false;
        }

        log::warn!(
            "Fast boot: leaving exception vector after {} steps, resuming at 0x{:08X}",
            self.vector_spin,
            self.cop0.read(COP0::EPC)
        );
        bus.clear_all_interrupts();
        let compare = self.cop0.read(COP0::COMPARE);
        self.cop0.write(COP0::COMPARE, compare);
        self.return_from_exception();
        true
    }

    /// Report an unimplemented encoding and decide what it does
    pub(crate) fn unimplemented(&mut self, instruction: u32) -> Exec {
        let signature = decode::unknown_signature(instruction);
        if self.reported_unknown.insert(signature.clone()) {
            let diagnostic = Diagnostic {
                signature,
                pc: self.current_pc,
                instruction,
            };
            match self.diagnostic_handler.as_mut() {
                Some(handler) => handler(&diagnostic),
                None => log::warn!("{}", diagnostic),
            }
        }

        if self.config.halt_on_unknown {
            return Err(EmulatorError::UnsupportedInstruction {
                instruction,
                pc: self.current_pc,
            }
            .into());
        }

        if self.config.fast_boot {
            Ok(())
        } else {
            Err(CpuException::new(ExceptionCause::ReservedInstruction).into())
        }
    }

    /// Schedule a branch to `target` after the delay slot
    #[inline]
    pub(crate) fn branch_to(&mut self, target: u32) {
        self.branch = BranchState::DelaySlot {
            branch_pc: self.current_pc,
            target,
        };
    }

    /// Dump all CPU registers for debugging
    pub fn dump_registers(&self) {
        println!("CPU Registers:");
        println!("PC: 0x{:08X}  Branch: {:?}", self.pc, self.branch);
        println!("HI: 0x{:016X}  LO: 0x{:016X}", self.hi, self.lo);
        println!();

        for i in 0..32u8 {
            if i % 4 == 0 && i > 0 {
                println!();
            }
            print!("r{:2}: 0x{:016X}  ", i, self.reg(i));
        }
        println!("\n");

        println!("COP0 Registers:");
        println!("Status:   0x{:08X}", self.cop0.read(COP0::STATUS));
        println!("Cause:    0x{:08X}", self.cop0.read(COP0::CAUSE));
        println!("EPC:      0x{:08X}", self.cop0.read(COP0::EPC));
        println!("BadVAddr: 0x{:08X}", self.cop0.read(COP0::BAD_VADDR));
        println!("Count:    0x{:08X}", self.cop0.read(COP0::COUNT));
        println!("Compare:  0x{:08X}", self.cop0.read(COP0::COMPARE));
        println!("EntryHi:  0x{:08X}", self.cop0.read(COP0::ENTRY_HI));
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSave for CPU {
    type State = CpuState;

    fn to_state(&self) -> CpuState {
        CpuState {
            regs: self.regs,
            pc: self.pc,
            hi: self.hi,
            lo: self.lo,
            cop0: self.cop0.regs,
            tlb: *self.tlb.entries(),
            fpr: self.fpu.fpr,
            fcr31: self.fpu.fcr31,
            branch: self.branch,
            ll_bit: self.ll_bit,
            ll_addr: self.ll_addr,
            ll_len: self.ll_len,
        }
    }

    /// Configuration, diagnostics and the handler are host-side and kept
    fn restore_from_state(&mut self, state: &CpuState) {
        self.regs = state.regs;
        self.regs[0] = 0;
        self.pc = state.pc;
        self.hi = state.hi;
        self.lo = state.lo;
        self.cop0.regs = state.cop0;
        self.tlb.load_entries(state.tlb);
        self.fpu.fpr = state.fpr;
        self.fpu.fcr31 = state.fcr31;
        self.branch = state.branch;
        self.delay_slot_of = None;
        self.discard_branch = false;
        self.current_pc = state.pc;
        self.current_instruction = 0;
        self.ll_bit = state.ll_bit;
        self.ll_addr = state.ll_addr;
        self.ll_len = state.ll_len;
        self.vector_spin = 0;
    }
}
