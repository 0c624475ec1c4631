//! # Memory-Mapped Registers
//!
//! Register blocks are overlaid on their fixed addresses with
//! `volatile-register` cells. [`Mmio`] ties them together and implements
//! [`Hardware`], so nothing above this module sees a raw pointer.
//!
//! Scroll registers are write-only on hardware; `Mmio` keeps a shadow copy
//! so they can be read back.

use volatile_register::{RO, RW, WO};

use crate::{
    display::Layer,
    dma::Dma3,
    hw::{Hardware, Port, Region},
};

/// LCD I/O block at `$0400_0000`.
#[repr(C)]
pub struct DisplayRegs {
    pub control: RW<u16>,
    pub green_swap: RW<u16>,
    pub status: RW<u16>,
    pub vcount: RO<u16>,
    pub bg_control: [RW<u16>; 4],
    /// `[hofs, vofs]` per layer.
    pub bg_offset: [[WO<u16>; 2]; 4],
}

impl DisplayRegs {
    /// # Safety
    /// Only on the console, and only while no other reference to the block
    /// exists.
    pub unsafe fn new() -> &'static mut DisplayRegs {
        unsafe { &mut *(0x0400_0000 as *mut DisplayRegs) }
    }
}

/// Keypad block at `$0400_0130`.
#[repr(C)]
pub struct KeypadRegs {
    /// Active-low: a clear bit is a held button.
    pub input: RO<u16>,
    pub control: RW<u16>,
}

impl KeypadRegs {
    /// # Safety
    /// Only on the console, and only while no other reference to the block
    /// exists.
    pub unsafe fn new() -> &'static mut KeypadRegs {
        unsafe { &mut *(0x0400_0130 as *mut KeypadRegs) }
    }
}

/// The real console.
pub struct Mmio {
    display: &'static mut DisplayRegs,
    keypad: &'static mut KeypadRegs,
    dma: &'static mut Dma3,
    /// Shadow copy of the write-only scroll registers
    scroll_shadow: [[u16; 2]; 4],
}

impl Mmio {
    /// # Safety
    /// Must only be called once, on the console itself.
    pub unsafe fn new() -> Mmio {
        unsafe {
            Mmio {
                display: DisplayRegs::new(),
                keypad: KeypadRegs::new(),
                dma: Dma3::new(),
                scroll_shadow: [[0; 2]; 4],
            }
        }
    }

    fn write_scroll(&mut self, layer: Layer, axis: usize, value: u16) {
        let value = value & 0x1FF;
        self.scroll_shadow[layer.index()][axis] = value;
        unsafe { self.display.bg_offset[layer.index()][axis].write(value) };
    }
}

impl Hardware for Mmio {
    fn read(&self, port: Port) -> u16 {
        match port {
            Port::DisplayControl => self.display.control.read(),
            Port::DisplayStatus => self.display.status.read(),
            Port::Scanline => self.display.vcount.read(),
            Port::BgControl(layer) => self.display.bg_control[layer.index()].read(),
            Port::BgHScroll(layer) => self.scroll_shadow[layer.index()][0],
            Port::BgVScroll(layer) => self.scroll_shadow[layer.index()][1],
            Port::KeyInput => self.keypad.input.read(),
        }
    }

    fn write(&mut self, port: Port, value: u16) {
        match port {
            Port::DisplayControl => unsafe { self.display.control.write(value) },
            Port::DisplayStatus => unsafe { self.display.status.write(value) },
            Port::BgControl(layer) => unsafe { self.display.bg_control[layer.index()].write(value) },
            Port::BgHScroll(layer) => self.write_scroll(layer, 0, value),
            Port::BgVScroll(layer) => self.write_scroll(layer, 1, value),
            Port::Scanline | Port::KeyInput => {
                log::warn!("ignored write of {value:#06x} to read-only port {port:?}");
            }
        }
    }

    fn bulk_copy(&mut self, region: Region, offset: usize, src: &[u16]) {
        if !region.is_valid() || offset + src.len() > region.halfwords() {
            log::error!(
                "bulk copy of {} half-words at {offset} overruns {region:?}",
                src.len()
            );
            return;
        }
        let dst = region.address() + offset * 2;
        let word_aligned = (dst | src.as_ptr() as usize) & 3 == 0 && src.len() % 2 == 0;
        unsafe {
            if word_aligned {
                self.dma.copy32(dst as *mut u32, src.as_ptr().cast(), src.len() / 2);
            } else {
                self.dma.copy16(dst as *mut u16, src.as_ptr(), src.len());
            }
        }
    }
}
