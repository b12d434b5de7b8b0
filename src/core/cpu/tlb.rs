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

//! Translation lookaside buffer
//!
//! 32 fully-associative entries, each mapping an even/odd pair of pages.
//! Page size is variable per entry and encoded by the PageMask register:
//!
//! ```text
//! PageMask    Page size
//! 0x0000_0000 4 KB
//! 0x0000_6000 16 KB
//! 0x0001_E000 64 KB
//! 0x0007_E000 256 KB
//! 0x001F_E000 1 MB
//! 0x007F_E000 4 MB
//! 0x01FF_E000 16 MB
//! ```
//!
//! EntryLo layout: PFN[29:6] C[5:3] D[2] V[1] G[0].
//! EntryHi layout: VPN2[31:13] ASID[7:0].

use serde::{Deserialize, Serialize};

/// Number of TLB entries
pub const TLB_ENTRIES: usize = 32;

/// One half (even or odd page) of a TLB entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHalf {
    /// Physical frame number (4 KB units)
    pub pfn: u32,
    /// Cache attribute
    pub cache: u8,
    /// Writable
    pub dirty: bool,
    /// Mapping present
    pub valid: bool,
}

impl PageHalf {
    /// Decode an EntryLo register value
    pub fn from_entry_lo(value: u32) -> Self {
        Self {
            pfn: (value >> 6) & 0x00FF_FFFF,
            cache: ((value >> 3) & 0x7) as u8,
            dirty: value & 0x4 != 0,
            valid: value & 0x2 != 0,
        }
    }

    /// Encode back to an EntryLo value, with the entry's global flag
    pub fn to_entry_lo(self, global: bool) -> u32 {
        (self.pfn << 6)
            | ((self.cache as u32) << 3)
            | ((self.dirty as u32) << 2)
            | ((self.valid as u32) << 1)
            | global as u32
    }
}

/// A single TLB entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlbEntry {
    /// PageMask register value (bits 24:13)
    pub page_mask: u32,
    /// VPN2 tag as an address (bits 31:13)
    pub vpn2: u32,
    /// Address space identifier
    pub asid: u8,
    /// Match regardless of ASID
    pub global: bool,
    /// Even and odd page mappings
    pub pages: [PageHalf; 2],
}

impl TlbEntry {
    /// Build an entry from the COP0 MMU registers
    pub fn from_registers(page_mask: u32, entry_hi: u32, entry_lo0: u32, entry_lo1: u32) -> Self {
        let page_mask = page_mask & 0x01FF_E000;
        Self {
            page_mask,
            vpn2: entry_hi & !(page_mask | 0x1FFF),
            asid: entry_hi as u8,
            global: (entry_lo0 & entry_lo1 & 1) != 0,
            pages: [
                PageHalf::from_entry_lo(entry_lo0),
                PageHalf::from_entry_lo(entry_lo1),
            ],
        }
    }

    /// Size in bytes of one page of this entry
    #[inline]
    pub fn page_size(&self) -> u32 {
        ((self.page_mask >> 1) | 0x0FFF) + 1
    }

    /// Tag comparison mask over the virtual address
    #[inline]
    fn tag_mask(&self) -> u32 {
        !(self.page_mask | 0x1FFF)
    }

    /// True when this entry maps `vaddr` for `asid`
    #[inline]
    pub fn matches(&self, vaddr: u32, asid: u8) -> bool {
        (self.global || self.asid == asid) && (vaddr & self.tag_mask()) == (self.vpn2 & self.tag_mask())
    }

    /// An entry whose tag lies in unmapped kernel space, so it never matches
    pub fn unmapped() -> Self {
        Self {
            vpn2: 0x8000_0000,
            ..Self::default()
        }
    }

    /// EntryHi value for TLBR
    pub fn entry_hi(&self) -> u32 {
        (self.vpn2 & self.tag_mask()) | self.asid as u32
    }
}

/// Result of a successful TLB match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbHit {
    /// Matching entry index
    pub index: usize,
    /// Page half selected by the address
    pub page: PageHalf,
    /// Physical address (meaningful only when the page is valid)
    pub paddr: u32,
}

/// Translation lookaside buffer
#[derive(Debug, Clone)]
pub struct Tlb {
    entries: [TlbEntry; TLB_ENTRIES],
}

impl Tlb {
    /// Create a TLB with every entry unmapped
    pub fn new() -> Self {
        Self {
            entries: [TlbEntry::unmapped(); TLB_ENTRIES],
        }
    }

    /// Unmap all entries
    pub fn reset(&mut self) {
        self.entries = [TlbEntry::unmapped(); TLB_ENTRIES];
    }

    /// Entry at `index`
    #[inline]
    pub fn entry(&self, index: usize) -> &TlbEntry {
        &self.entries[index % TLB_ENTRIES]
    }

    /// All entries
    pub fn entries(&self) -> &[TlbEntry; TLB_ENTRIES] {
        &self.entries
    }

    /// Replace entry at `index` (TLBWI/TLBWR)
    pub fn write(&mut self, index: usize, entry: TlbEntry) {
        let index = index % TLB_ENTRIES;
        log::debug!(
            "TLB[{:2}] <- vpn2=0x{:08X} asid={:02X} g={} mask=0x{:08X} pfn0=0x{:06X}{}{} pfn1=0x{:06X}{}{}",
            index,
            entry.vpn2,
            entry.asid,
            entry.global,
            entry.page_mask,
            entry.pages[0].pfn,
            if entry.pages[0].valid { " V" } else { "" },
            if entry.pages[0].dirty { "D" } else { "" },
            entry.pages[1].pfn,
            if entry.pages[1].valid { " V" } else { "" },
            if entry.pages[1].dirty { "D" } else { "" },
        );
        self.entries[index] = entry;
    }

    /// Replace every entry at once
    pub(crate) fn load_entries(&mut self, entries: [TlbEntry; TLB_ENTRIES]) {
        self.entries = entries;
    }

    /// Look up a virtual address
    ///
    /// The first entry whose tag and ASID match wins. The page half is
    /// chosen by the address bit just above the page offset.
    pub fn lookup(&self, vaddr: u32, asid: u8) -> Option<TlbHit> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.matches(vaddr, asid))
            .map(|(index, entry)| {
                let size = entry.page_size();
                let page = entry.pages[((vaddr & size) != 0) as usize];
                let offset_mask = size - 1;
                let paddr = ((page.pfn << 12) & !offset_mask) | (vaddr & offset_mask);
                TlbHit { index, page, paddr }
            })
    }

    /// Search for an entry matching an EntryHi value (TLBP)
    pub fn probe(&self, entry_hi: u32) -> Option<usize> {
        let asid = entry_hi as u8;
        self.entries
            .iter()
            .position(|entry| entry.matches(entry_hi & 0xFFFF_E000, asid))
    }
}

impl Default for Tlb {
    fn default() -> Self {
        Self::new()
    }
}
