//! `log` backend for the emulator debug console.
//!
//! mGBA exposes a message buffer at `$04FF_F600`. Enabling it is a
//! handshake: write `0xC0DE` to `$04FF_F780` and the emulator answers
//! `0x1DEA`. On real hardware (or an emulator without the feature) the
//! handshake fails and nothing is installed.

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

const ENABLE: *mut u16 = 0x04FF_F780 as *mut u16;
const FLAGS: *mut u16 = 0x04FF_F700 as *mut u16;
const BUFFER: *mut u8 = 0x04FF_F600 as *mut u8;

/// Bytes per message; anything longer is cut.
pub const LINE_CAPACITY: usize = 255;

/// Send flag; the low bits carry the level.
const SEND: u16 = 0x100;

/// Level numbering used by the debug console.
pub const fn level_code(level: Level) -> u16 {
    match level {
        Level::Error => 1,
        Level::Warn => 2,
        Level::Info => 3,
        Level::Debug | Level::Trace => 4,
    }
}

pub struct DebugLogger {
    pub max_level: LevelFilter,
}

pub static LOGGER: DebugLogger = DebugLogger { max_level: LevelFilter::Debug };

impl DebugLogger {
    /// Perform the enable handshake. Returns whether the console answered.
    ///
    /// # Safety
    /// Writes to emulator-only I/O; must run on the console (or an emulator).
    pub unsafe fn detect() -> bool {
        unsafe {
            ENABLE.write_volatile(0xC0DE);
            ENABLE.read_volatile() == 0x1DEA
        }
    }
}

/// Writes bytes straight into the message buffer.
struct LineWriter {
    len: usize,
}

impl Write for LineWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.len == LINE_CAPACITY {
                return Err(fmt::Error);
            }
            unsafe { BUFFER.add(self.len).write_volatile(byte) };
            self.len += 1;
        }
        Ok(())
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = LineWriter { len: 0 };
        // a truncated line is still sent
        let _ = write!(line, "[{}] {}", record.target(), record.args());
        unsafe { FLAGS.write_volatile(level_code(record.level()) | SEND) };
    }

    fn flush(&self) {}
}
