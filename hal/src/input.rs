use bit_field::BitField;

use crate::hw::{Hardware, Port};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
    R,
    L,
}

impl Button {
    /// Bit position in the key input register.
    pub const fn idx(&self) -> usize {
        match self {
            Button::A => 0,
            Button::B => 1,
            Button::Select => 2,
            Button::Start => 3,
            Button::Right => 4,
            Button::Left => 5,
            Button::Up => 6,
            Button::Down => 7,
            Button::R => 8,
            Button::L => 9,
        }
    }

    pub const fn mask(&self) -> u16 {
        1 << self.idx()
    }
}

/// Bits of the key input register that carry buttons.
pub const KEY_MASK: u16 = 0x03FF;

/// Button state for the current and previous frame.
///
/// Stored active-high: a set bit is a held button.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pub buttons: u16,
    pub buttons_last: u16,
}

impl Keypad {
    pub const fn new() -> Self {
        Self { buttons: 0, buttons_last: 0 }
    }

    /// Read the keypad once. Call exactly once per frame.
    #[inline]
    pub fn sample<H: Hardware + ?Sized>(&mut self, hw: &H) {
        self.latch(hw.read(Port::KeyInput));
    }

    /// Latch a raw, active-low register value.
    #[inline]
    pub fn latch(&mut self, raw: u16) {
        self.buttons_last = self.buttons;
        self.buttons = !raw & KEY_MASK;
    }

    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons.get_bit(button.idx())
    }

    #[inline]
    pub fn was_pressed(&self, button: Button) -> bool {
        self.buttons_last.get_bit(button.idx())
    }

    /// Returns true only on the frame the button was first pressed (edge-trigger).
    #[inline]
    pub fn just_pressed(&self, button: Button) -> bool {
        self.is_pressed(button) && !self.was_pressed(button)
    }

    /// Returns true only on the frame the button was released (edge-trigger).
    #[inline]
    pub fn just_released(&self, button: Button) -> bool {
        !self.is_pressed(button) && self.was_pressed(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_active_low() {
        let mut keypad = Keypad::new();
        keypad.latch(KEY_MASK & !Button::A.mask());
        assert!(keypad.is_pressed(Button::A));
        assert!(!keypad.is_pressed(Button::Left));

        keypad.latch(KEY_MASK);
        assert!(!keypad.is_pressed(Button::A));
    }

    #[test]
    fn edges() {
        let mut keypad = Keypad::new();
        keypad.latch(KEY_MASK & !Button::Right.mask());
        assert!(keypad.just_pressed(Button::Right));

        keypad.latch(KEY_MASK & !Button::Right.mask());
        assert!(keypad.is_pressed(Button::Right));
        assert!(!keypad.just_pressed(Button::Right));

        keypad.latch(KEY_MASK);
        assert!(keypad.just_released(Button::Right));
    }

    #[test]
    fn unused_high_bits_are_ignored() {
        let mut keypad = Keypad::new();
        keypad.latch(0xFC00 | KEY_MASK);
        assert_eq!(keypad.buttons, 0);
    }
}
