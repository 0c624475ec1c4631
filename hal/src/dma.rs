//! # Bulk Transfer (DMA)
//!
//! Channel 3 is the general-purpose block-copy engine. Writing the control
//! word with `ENABLE` set halts the CPU until the copy is done, so a
//! transfer started here has always finished by the time `copy16` returns.
//!
//! ```ignore
//! let dma = unsafe { Dma3::new() };
//! // move the shadow sprite table into OAM in one go
//! unsafe { dma.copy16(0x0700_0000 as *mut u16, table.as_ptr(), 512) };
//! ```
//!
//! Game code goes through [`Hardware::bulk_copy`](crate::hw::Hardware::bulk_copy)
//! instead of touching this module.

use volatile_register::WO;

bitflags::bitflags! {
    /// DMA control word (upper half of the count register).
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DmaControl: u32 {
        const DEST_INCREMENT = 0b00 << 21;
        const DEST_DECREMENT = 0b01 << 21;
        const DEST_FIXED     = 0b10 << 21;
        const DEST_RELOAD    = 0b11 << 21;
        const SRC_INCREMENT  = 0b00 << 23;
        const SRC_DECREMENT  = 0b01 << 23;
        const SRC_FIXED      = 0b10 << 23;
        const REPEAT         = 1 << 25;
        /// Transfer 32-bit words instead of half-words.
        const WORD32         = 1 << 26;
        const START_VBLANK   = 0b01 << 28;
        const START_HBLANK   = 0b10 << 28;
        /// Raise an interrupt when the transfer ends.
        const IRQ            = 1 << 30;
        const ENABLE         = 1 << 31;
    }
}

/// Units per transfer are held in 16 bits; 0 means 0x10000 on channel 3.
pub const MAX_UNITS: usize = 0x1_0000;

/// Count-and-control word for an immediate transfer of `units` items.
pub const fn control_word(units: usize, flags: DmaControl) -> u32 {
    (units as u32 & 0xFFFF) | flags.bits()
}

#[repr(C)]
pub struct Dma3 {
    pub source: WO<u32>,
    pub dest: WO<u32>,
    pub count: WO<u32>,
}

impl Dma3 {
    /// # Safety
    /// Only on the console, and only while no other reference to the block
    /// exists.
    pub unsafe fn new() -> &'static mut Dma3 {
        unsafe { &mut *(0x0400_00D4 as *mut Dma3) }
    }

    /// Copy `units` half-words from `src` to `dst`.
    ///
    /// A zero-length copy does nothing; the hardware would read 0 as 0x10000.
    #[inline(always)]
    pub unsafe fn copy16(&mut self, dst: *mut u16, src: *const u16, units: usize) {
        if units == 0 {
            return;
        }
        debug_assert!(units <= MAX_UNITS);
        unsafe {
            self.source.write(src as usize as u32);
            self.dest.write(dst as usize as u32);
            self.count.write(control_word(units, DmaControl::ENABLE));
        }
    }

    /// Copy `units` 32-bit words from `src` to `dst`. Both must be word aligned.
    #[inline(always)]
    pub unsafe fn copy32(&mut self, dst: *mut u32, src: *const u32, units: usize) {
        if units == 0 {
            return;
        }
        debug_assert!(units <= MAX_UNITS);
        unsafe {
            self.source.write(src as usize as u32);
            self.dest.write(dst as usize as u32);
            self.count.write(control_word(units, DmaControl::ENABLE | DmaControl::WORD32));
        }
    }
}
