//! Signed fixed point with 8 fractional bits (256 = 1.0).
//!
//! Velocities are kept in this format so gravity, which is well under a
//! pixel per frame, accumulates without drift.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

pub const FRAC_BITS: u32 = 8;
pub const ONE: i32 = 1 << FRAC_BITS;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    #[inline(always)]
    pub const fn from_int(v: i32) -> Fixed {
        Fixed(v << FRAC_BITS)
    }

    #[inline(always)]
    pub const fn from_raw(raw: i32) -> Fixed {
        Fixed(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whole pixels, rounded toward negative infinity (arithmetic shift).
    #[inline(always)]
    pub const fn int_part(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Whole pixels, rounded toward zero.
    #[inline(always)]
    pub const fn trunc(self) -> i32 {
        self.0 / ONE
    }

    #[inline(always)]
    pub const fn abs(self) -> Fixed {
        Fixed(self.0.abs())
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline(always)]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline(always)]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline(always)]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}
