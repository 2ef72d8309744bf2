//! Per-width numeric operations.
//!
//! A [`WidthStrategy`] performs every numeric operation for one storage
//! width by reinterpreting raw bit patterns as that width's native integer.
//! The eight implementations are [`NativeStrategy<T>`] instantiated for each
//! [`NativeInt`]; [`Width::strategy`](crate::Width::strategy) hands out the
//! static instance.
//!
//! Ordering is the native ordering of the exact width and signedness: for
//! `u8` the pattern `0xC8` (200) is greater than `0x64` (100), for `i8` the
//! same pattern reads as -56 and is less.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use crate::width::{NativeInt, RawBits, Width};

/// Numeric operations for one storage width.
///
/// All operations are total. Inputs may carry garbage above the width;
/// outputs never do.
pub trait WidthStrategy: Send + Sync + fmt::Debug {
    fn width(&self) -> Width;

    /// Clear any bits above the storage width.
    fn normalize(&self, value: RawBits) -> RawBits;

    fn and(&self, a: RawBits, b: RawBits) -> RawBits;

    fn or(&self, a: RawBits, b: RawBits) -> RawBits;

    fn xor(&self, a: RawBits, b: RawBits) -> RawBits;

    fn not(&self, value: RawBits) -> RawBits;

    /// True iff every bit set in `flag` is also set in `value`.
    ///
    /// The all-zero-bits flag is present in every value.
    fn has_flag(&self, value: RawBits, flag: RawBits) -> bool;

    /// Three-way comparison in the width's native ordering.
    fn compare(&self, a: RawBits, b: RawBits) -> Ordering;

    /// Exact numeric value in the width's signedness.
    fn to_numeric(&self, value: RawBits) -> i128;

    /// Bit pattern of a numeric value, truncated to the width.
    fn from_numeric(&self, value: i128) -> RawBits;

    /// Decimal rendering in the width's signedness.
    fn format(&self, value: RawBits) -> String;

    #[inline]
    fn less(&self, a: RawBits, b: RawBits) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    #[inline]
    fn greater(&self, a: RawBits, b: RawBits) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    #[inline]
    fn equal(&self, a: RawBits, b: RawBits) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

impl<'a> dyn WidthStrategy + 'a {
    /// Fold a sequence with bitwise OR.
    ///
    /// The empty sequence yields the all-zero-bits pattern.
    pub fn or_all<I>(&self, values: I) -> RawBits
    where
        I: IntoIterator<Item = RawBits>,
    {
        values
            .into_iter()
            .fold(RawBits::ZERO, |acc, value| self.or(acc, value))
    }

    /// True iff any of `flags` is present in `value`.
    ///
    /// Stops at the first match; false on an empty sequence.
    pub fn has_any_flag<I>(&self, value: RawBits, flags: I) -> bool
    where
        I: IntoIterator<Item = RawBits>,
    {
        flags.into_iter().any(|flag| self.has_flag(value, flag))
    }

    /// Comparison as a signed integer: -1, 0 or 1.
    #[inline]
    pub fn compare_to(&self, a: RawBits, b: RawBits) -> i32 {
        match self.compare(a, b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

/// Strategy backed by the native integer `T`.
pub struct NativeStrategy<T> {
    _native: PhantomData<fn() -> T>,
}

impl<T> NativeStrategy<T> {
    pub const fn new() -> Self {
        NativeStrategy {
            _native: PhantomData,
        }
    }
}

impl<T> Default for NativeStrategy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NativeInt> fmt::Debug for NativeStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeStrategy<{}>", T::WIDTH)
    }
}

impl<T: NativeInt> WidthStrategy for NativeStrategy<T> {
    #[inline]
    fn width(&self) -> Width {
        T::WIDTH
    }

    #[inline]
    fn normalize(&self, value: RawBits) -> RawBits {
        RawBits::new(value.get() & T::WIDTH.mask())
    }

    #[inline]
    fn and(&self, a: RawBits, b: RawBits) -> RawBits {
        (T::from_raw(a) & T::from_raw(b)).to_raw()
    }

    #[inline]
    fn or(&self, a: RawBits, b: RawBits) -> RawBits {
        (T::from_raw(a) | T::from_raw(b)).to_raw()
    }

    #[inline]
    fn xor(&self, a: RawBits, b: RawBits) -> RawBits {
        (T::from_raw(a) ^ T::from_raw(b)).to_raw()
    }

    #[inline]
    fn not(&self, value: RawBits) -> RawBits {
        (!T::from_raw(value)).to_raw()
    }

    #[inline]
    fn has_flag(&self, value: RawBits, flag: RawBits) -> bool {
        let flag = T::from_raw(flag);
        T::from_raw(value) & flag == flag
    }

    #[inline]
    fn compare(&self, a: RawBits, b: RawBits) -> Ordering {
        T::from_raw(a).cmp(&T::from_raw(b))
    }

    #[inline]
    fn to_numeric(&self, value: RawBits) -> i128 {
        T::from_raw(value).into()
    }

    #[inline]
    fn from_numeric(&self, value: i128) -> RawBits {
        T::from_numeric(value).to_raw()
    }

    fn format(&self, value: RawBits) -> String {
        T::from_raw(value).to_string()
    }
}
