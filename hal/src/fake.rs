//! In-memory console for host-side tests.
//!
//! Every port write, bulk copy and vblank wait is appended to
//! [`FakeHardware::events`], so tests can check *ordering* as well as
//! final memory contents.

use heapless::Vec;

use crate::{
    VBLANK_LINE,
    display::Layer,
    hw::{BG_VRAM_HALFWORDS, Hardware, OBJ_VRAM_HALFWORDS, Port, Region},
    input::{Button, KEY_MASK},
};

pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Port, u16),
    BulkCopy { region: Region, offset: usize, len: usize },
    VBlank,
}

pub struct FakeHardware {
    pub oam: [u16; 512],
    pub bg_palette: [u16; 256],
    pub obj_palette: [u16; 256],
    /// Background VRAM followed by sprite tile VRAM.
    pub vram: [u16; BG_VRAM_HALFWORDS + OBJ_VRAM_HALFWORDS],
    pub display_control: u16,
    pub display_status: u16,
    pub bg_control: [u16; 4],
    /// `[h, v]` per layer.
    pub scroll: [[u16; 2]; 4],
    /// Raw, active-low key register.
    pub keys: u16,
    pub scanline: u16,
    /// Oldest events are kept; anything past capacity is dropped.
    pub events: Vec<Event, EVENT_CAPACITY>,
    pub frames: u32,
}

impl Default for FakeHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHardware {
    pub fn new() -> Self {
        Self {
            oam: [0; 512],
            bg_palette: [0; 256],
            obj_palette: [0; 256],
            vram: [0; BG_VRAM_HALFWORDS + OBJ_VRAM_HALFWORDS],
            display_control: 0,
            display_status: 0,
            bg_control: [0; 4],
            scroll: [[0; 2]; 4],
            keys: KEY_MASK,
            scanline: VBLANK_LINE,
            events: Vec::new(),
            frames: 0,
        }
    }

    pub fn press(&mut self, button: Button) {
        self.keys &= !button.mask();
    }

    pub fn release(&mut self, button: Button) {
        self.keys |= button.mask();
    }

    /// Hold exactly `buttons`; everything else is released.
    pub fn set_keys(&mut self, buttons: &[Button]) {
        self.keys = KEY_MASK;
        for &button in buttons {
            self.press(button);
        }
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Scroll offset last written for `layer`.
    pub fn scroll_of(&self, layer: Layer) -> (u16, u16) {
        let [h, v] = self.scroll[layer.index()];
        (h, v)
    }

    fn record(&mut self, event: Event) {
        let _ = self.events.push(event);
    }

    fn memory(&mut self, region: Region) -> &mut [u16] {
        match region {
            Region::Oam => &mut self.oam,
            Region::BgPalette => &mut self.bg_palette,
            Region::ObjPalette => &mut self.obj_palette,
            Region::CharBlock(_) | Region::ScreenBlock(_) | Region::ObjTiles => {
                let start = region.vram_offset();
                &mut self.vram[start..start + region.halfwords()]
            }
        }
    }
}

impl Hardware for FakeHardware {
    fn read(&self, port: Port) -> u16 {
        match port {
            Port::DisplayControl => self.display_control,
            Port::DisplayStatus => self.display_status,
            Port::Scanline => self.scanline,
            Port::BgControl(layer) => self.bg_control[layer.index()],
            Port::BgHScroll(layer) => self.scroll[layer.index()][0],
            Port::BgVScroll(layer) => self.scroll[layer.index()][1],
            Port::KeyInput => self.keys,
        }
    }

    fn write(&mut self, port: Port, value: u16) {
        self.record(Event::Write(port, value));
        match port {
            Port::DisplayControl => self.display_control = value,
            Port::DisplayStatus => self.display_status = value,
            Port::BgControl(layer) => self.bg_control[layer.index()] = value,
            Port::BgHScroll(layer) => self.scroll[layer.index()][0] = value & 0x1FF,
            Port::BgVScroll(layer) => self.scroll[layer.index()][1] = value & 0x1FF,
            Port::Scanline | Port::KeyInput => {}
        }
    }

    /// Panics on an out-of-range copy, where the real console would log and skip it.
    fn bulk_copy(&mut self, region: Region, offset: usize, src: &[u16]) {
        assert!(region.is_valid(), "invalid region {region:?}");
        self.record(Event::BulkCopy { region, offset, len: src.len() });
        let memory = self.memory(region);
        assert!(
            offset + src.len() <= memory.len(),
            "copy of {} half-words at {offset} overruns {region:?}",
            src.len()
        );
        memory[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Returns immediately; every call counts as one frame.
    fn wait_vblank(&mut self) {
        self.record(Event::VBlank);
        self.frames += 1;
    }
}
