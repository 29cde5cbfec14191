//! Colour value type and the shared current-colour snapshot.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::channels::LedChannel;

/// An 8-bit-per-channel RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Intensity of one channel.
    pub const fn channel(self, channel: LedChannel) -> u8 {
        match channel {
            LedChannel::Red => self.red,
            LedChannel::Green => self.green,
            LedChannel::Blue => self.blue,
        }
    }

    const fn to_bits(self) -> u32 {
        (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    const fn from_bits(bits: u32) -> Self {
        Self::new((bits >> 16) as u8, (bits >> 8) as u8, bits as u8)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

// ── Shared snapshot ───────────────────────────────────────────
//
// Written by the caller's task, read by the fade tasks.  The whole colour
// lives in one atomic word, so a reader always sees a colour that was
// actually stored.

/// Lock-free holder for the last colour requested by the caller.
pub struct SharedColor(AtomicU32);

impl SharedColor {
    pub const fn new(color: Color) -> Self {
        Self(AtomicU32::new(color.to_bits()))
    }

    pub fn load(&self) -> Color {
        Color::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, color: Color) {
        self.0.store(color.to_bits(), Ordering::Release);
    }
}

impl Default for SharedColor {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}
