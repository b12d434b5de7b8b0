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

/// Status register bit fields
pub mod status {
    /// Interrupt enable
    pub const IE: u32 = 1 << 0;
    /// Exception level
    pub const EXL: u32 = 1 << 1;
    /// Error level
    pub const ERL: u32 = 1 << 2;
    /// Kernel/supervisor/user mode field (bits 4:3)
    pub const KSU_MASK: u32 = 0b11 << 3;
    /// KSU value for user mode
    pub const KSU_USER: u32 = 0b10 << 3;
    /// Interrupt mask (bits 15:8)
    pub const IM_MASK: u32 = 0xFF << 8;
    /// Bootstrap exception vectors
    pub const BEV: u32 = 1 << 22;
    /// Coprocessor usable (bits 31:28)
    pub const CU_MASK: u32 = 0xF << 28;

    /// Bits a software write may change
    pub const WRITE_MASK: u32 = IE | EXL | KSU_MASK | IM_MASK | BEV | CU_MASK;
}

/// Cause register bit fields
pub mod cause {
    /// Exception code field (bits 6:2)
    pub const EXC_CODE_MASK: u32 = 0x1F << 2;
    /// Software interrupt pending bits IP0/IP1
    pub const IP_SOFTWARE: u32 = 0b11 << 8;
    /// RCP interrupt line (MI)
    pub const IP2: u32 = 1 << 10;
    /// Timer interrupt (Count == Compare)
    pub const IP7: u32 = 1 << 15;
    /// All interrupt pending bits
    pub const IP_MASK: u32 = 0xFF << 8;
    /// Branch delay
    pub const BD: u32 = 1 << 31;
}

/// Coprocessor 0 (System Control)
///
/// COP0 holds the exception, interrupt, timer and MMU control registers.
/// It applies the per-register write masks and the side effects of
/// exception entry, but it never decides where execution continues;
/// vectoring belongs to the CPU.
///
/// # Example
///
/// ```
/// use n64rx::core::cpu::{COP0, ExceptionCause};
///
/// let mut cop0 = COP0::new();
/// cop0.set_exception(ExceptionCause::Syscall, 0x8000_0100, None, false);
///
/// assert_eq!(cop0.read(COP0::EPC), 0x8000_0100);
/// assert!(cop0.exl());
/// ```
#[derive(Debug, Clone)]
pub struct COP0 {
    /// COP0 registers (32 registers)
    pub(crate) regs: [u32; 32],
}

impl COP0 {
    /// TLB index (P bit 31, index 5:0)
    pub const INDEX: usize = 0;
    /// TLB random index
    pub const RANDOM: usize = 1;
    /// Even page mapping
    pub const ENTRY_LO0: usize = 2;
    /// Odd page mapping
    pub const ENTRY_LO1: usize = 3;
    /// Page table pointer with BadVPN2
    pub const CONTEXT: usize = 4;
    /// TLB page size mask
    pub const PAGE_MASK: usize = 5;
    /// Number of wired TLB entries
    pub const WIRED: usize = 6;
    /// Bad Virtual Address
    pub const BAD_VADDR: usize = 8;
    /// Timer count
    pub const COUNT: usize = 9;
    /// VPN2 and ASID
    pub const ENTRY_HI: usize = 10;
    /// Timer compare
    pub const COMPARE: usize = 11;
    /// Status Register
    pub const STATUS: usize = 12;
    /// Cause Register
    pub const CAUSE: usize = 13;
    /// Exception PC
    pub const EPC: usize = 14;
    /// Processor ID
    pub const PRID: usize = 15;
    /// Configuration
    pub const CONFIG: usize = 16;
    /// Load-linked address
    pub const LL_ADDR: usize = 17;
    /// Error exception PC
    pub const ERROR_EPC: usize = 30;

    const PRID_VR4300: u32 = 0x0000_0B22;
    const CONFIG_RESET: u32 = 0x7006_E463;
    const TLB_ENTRIES: u32 = 32;

    /// Create a new COP0 instance
    ///
    /// # Returns
    /// Initialized COP0 instance with reset values
    pub fn new() -> Self {
        let mut cop0 = Self { regs: [0u32; 32] };
        cop0.reset();
        cop0
    }

    /// Reset COP0 registers to initial state
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.regs[Self::STATUS] = status::BEV;
        self.regs[Self::PRID] = Self::PRID_VR4300;
        self.regs[Self::CONFIG] = Self::CONFIG_RESET;
        self.regs[Self::RANDOM] = Self::TLB_ENTRIES - 1;
    }

    /// Read a COP0 register
    #[inline]
    pub fn read(&self, reg: usize) -> u32 {
        self.regs[reg & 0x1F]
    }

    /// Write a COP0 register through its software write mask
    ///
    /// - Status: only IE, EXL, KSU, IM, BEV and CU change
    /// - Cause: only the two software interrupt bits change
    /// - Compare: clears the timer interrupt (IP7)
    /// - Wired: resets Random to the top entry
    /// - Random, BadVAddr, PRId: read-only
    pub fn write(&mut self, reg: usize, value: u32) {
        let reg = reg & 0x1F;
        match reg {
            Self::INDEX => {
                self.regs[reg] = (self.regs[reg] & 0x8000_0000) | (value & 0x3F);
            }
            Self::RANDOM | Self::BAD_VADDR | Self::PRID => {
                log::warn!(
                    "Ignoring write of 0x{:08X} to read-only COP0 register {}",
                    value,
                    reg
                );
            }
            Self::ENTRY_LO0 | Self::ENTRY_LO1 => self.regs[reg] = value & 0x3FFF_FFFF,
            Self::CONTEXT => {
                self.regs[reg] = (self.regs[reg] & 0x007F_FFF0) | (value & 0xFF80_0000);
            }
            Self::PAGE_MASK => self.regs[reg] = value & 0x01FF_E000,
            Self::WIRED => {
                self.regs[reg] = value & 0x3F;
                self.regs[Self::RANDOM] = Self::TLB_ENTRIES - 1;
            }
            Self::ENTRY_HI => self.regs[reg] = value & 0xFFFF_E0FF,
            Self::COMPARE => {
                self.regs[reg] = value;
                self.regs[Self::CAUSE] &= !cause::IP7;
            }
            Self::STATUS => {
                let old = self.regs[reg];
                self.regs[reg] = (old & !status::WRITE_MASK) | (value & status::WRITE_MASK);
            }
            Self::CAUSE => {
                let old = self.regs[reg];
                self.regs[reg] = (old & !cause::IP_SOFTWARE) | (value & cause::IP_SOFTWARE);
            }
            _ => self.regs[reg] = value,
        }
    }

    /// Advance the timer by one CPU step
    ///
    /// Increments Count and raises IP7 when Count becomes equal to Compare.
    /// Random walks down from 31 to Wired and wraps.
    pub fn tick(&mut self) {
        let count = self.regs[Self::COUNT].wrapping_add(1);
        self.regs[Self::COUNT] = count;
        if count == self.regs[Self::COMPARE] {
            self.regs[Self::CAUSE] |= cause::IP7;
        }

        let wired = self.regs[Self::WIRED] & 0x1F;
        let random = self.regs[Self::RANDOM];
        self.regs[Self::RANDOM] = if random <= wired {
            Self::TLB_ENTRIES - 1
        } else {
            random - 1
        };
    }

    /// Record exception state
    ///
    /// Sets EXL, writes ExcCode and BD into Cause, and stores EPC and
    /// (when present) BadVAddr. The caller picks the vector.
    pub fn set_exception(
        &mut self,
        cause: ExceptionCause,
        epc: u32,
        bad_vaddr: Option<u32>,
        in_delay_slot: bool,
    ) {
        self.regs[Self::STATUS] |= status::EXL;

        let mut value = self.regs[Self::CAUSE] & !(cause::EXC_CODE_MASK | cause::BD);
        value |= (cause as u32) << 2;
        if in_delay_slot {
            value |= cause::BD;
        }
        self.regs[Self::CAUSE] = value;

        self.regs[Self::EPC] = epc;
        if let Some(vaddr) = bad_vaddr {
            self.regs[Self::BAD_VADDR] = vaddr;
        }
    }

    /// Fill EntryHi and Context.BadVPN2 from a TLB fault address
    pub fn set_tlb_fault(&mut self, vaddr: u32) {
        let asid = self.asid() as u32;
        self.regs[Self::ENTRY_HI] = (vaddr & 0xFFFF_E000) | asid;

        let bad_vpn2 = (vaddr >> 13) << 4;
        self.regs[Self::CONTEXT] = (self.regs[Self::CONTEXT] & 0xFF80_0000) | (bad_vpn2 & 0x007F_FFF0);
    }

    /// Drive Cause.IP2 from the RCP interrupt line
    #[inline]
    pub fn set_rcp_interrupt(&mut self, asserted: bool) {
        if asserted {
            self.regs[Self::CAUSE] |= cause::IP2;
        } else {
            self.regs[Self::CAUSE] &= !cause::IP2;
        }
    }

    /// True when an interrupt would be taken at the next sampling point
    #[inline]
    pub fn interrupt_pending(&self) -> bool {
        let sr = self.regs[Self::STATUS];
        let pending = self.regs[Self::CAUSE] & sr & cause::IP_MASK;
        (sr & status::IE) != 0 && (sr & (status::EXL | status::ERL)) == 0 && pending != 0
    }

    /// Status register value
    #[inline]
    pub fn status(&self) -> u32 {
        self.regs[Self::STATUS]
    }

    /// Cause register value
    #[inline]
    pub fn cause(&self) -> u32 {
        self.regs[Self::CAUSE]
    }

    /// Exception level flag
    #[inline]
    pub fn exl(&self) -> bool {
        self.regs[Self::STATUS] & status::EXL != 0
    }

    /// Clear EXL (exception return)
    #[inline]
    pub fn clear_exl(&mut self) {
        self.regs[Self::STATUS] &= !status::EXL;
    }

    /// Bootstrap exception vectors selected
    #[inline]
    pub fn bev(&self) -> bool {
        self.regs[Self::STATUS] & status::BEV != 0
    }

    /// User mode outside of exception level
    #[inline]
    pub fn user_mode(&self) -> bool {
        let sr = self.regs[Self::STATUS];
        (sr & status::KSU_MASK) == status::KSU_USER && (sr & (status::EXL | status::ERL)) == 0
    }

    /// Current address space identifier
    #[inline]
    pub fn asid(&self) -> u8 {
        self.regs[Self::ENTRY_HI] as u8
    }

    /// Exception code currently latched in Cause
    #[inline]
    pub fn exc_code(&self) -> u32 {
        (self.regs[Self::CAUSE] & cause::EXC_CODE_MASK) >> 2
    }
}

impl Default for COP0 {
    fn default() -> Self {
        Self::new()
    }
}

/// Exception cause codes for the VR4300
///
/// These correspond to the exception codes stored in the CAUSE register
/// when a CPU exception occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Interrupt (external or internal)
    Interrupt = 0,
    /// Store to a clean (D=0) TLB page
    TlbModified = 1,
    /// TLB miss or invalid entry on load or fetch
    TlbLoad = 2,
    /// TLB miss or invalid entry on store
    TlbStore = 3,
    /// Address error on load
    AddressErrorLoad = 4,
    /// Address error on store
    AddressErrorStore = 5,
    /// Syscall instruction executed
    Syscall = 8,
    /// Breakpoint instruction executed
    Breakpoint = 9,
    /// Reserved or illegal instruction
    ReservedInstruction = 10,
    /// Arithmetic overflow
    Overflow = 12,
    /// Trap instruction condition met
    Trap = 13,
}
