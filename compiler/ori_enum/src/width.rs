//! Storage widths and raw bit patterns.
//!
//! Every enumeration value is carried as a [`RawBits`]: its storage bit
//! pattern zero-extended to 64 bits. The [`Width`] tag says how many of those
//! bits are meaningful and whether they are read as a signed or unsigned
//! integer. [`NativeInt`] is the fixed table mapping each tag to its native
//! integer type; reading and writing goes through a byte reinterpretation of
//! exactly the width's size, never an arithmetic conversion.

use std::fmt;
use std::mem::size_of;

use crate::strategy::{NativeStrategy, WidthStrategy};

/// Integer width and signedness of an enumeration's storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Width {
    /// 8-bit unsigned.
    U8 = 0,
    /// 8-bit signed.
    I8 = 1,
    /// 16-bit unsigned.
    U16 = 2,
    /// 16-bit signed.
    I16 = 3,
    /// 32-bit unsigned.
    U32 = 4,
    /// 32-bit signed.
    I32 = 5,
    /// 64-bit unsigned.
    U64 = 6,
    /// 64-bit signed.
    I64 = 7,
}

impl Width {
    /// All supported widths.
    pub const ALL: [Width; 8] = [
        Width::U8,
        Width::I8,
        Width::U16,
        Width::I16,
        Width::U32,
        Width::I32,
        Width::U64,
        Width::I64,
    ];

    /// Number of bits in the storage.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Width::U8 | Width::I8 => 8,
            Width::U16 | Width::I16 => 16,
            Width::U32 | Width::I32 => 32,
            Width::U64 | Width::I64 => 64,
        }
    }

    /// Number of bytes in the storage.
    #[inline]
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Width::I8 | Width::I16 | Width::I32 | Width::I64)
    }

    /// Mask selecting the meaningful bits of a [`RawBits`].
    #[inline]
    pub const fn mask(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }

    /// Storage layout described by this width.
    #[inline]
    pub const fn storage(self) -> Storage {
        Storage::new(self.bytes(), self.is_signed())
    }

    /// Width matching a declared storage layout, if one is supported.
    pub const fn from_storage(storage: Storage) -> Option<Width> {
        match (storage.bytes, storage.signed) {
            (1, false) => Some(Width::U8),
            (1, true) => Some(Width::I8),
            (2, false) => Some(Width::U16),
            (2, true) => Some(Width::I16),
            (4, false) => Some(Width::U32),
            (4, true) => Some(Width::I32),
            (8, false) => Some(Width::U64),
            (8, true) => Some(Width::I64),
            _ => None,
        }
    }

    /// The strategy implementing this width's operations.
    ///
    /// Strategies are stateless statics; the returned handle is resolved
    /// once per type and stored in its descriptor.
    pub fn strategy(self) -> &'static dyn WidthStrategy {
        static U8: NativeStrategy<u8> = NativeStrategy::new();
        static I8: NativeStrategy<i8> = NativeStrategy::new();
        static U16: NativeStrategy<u16> = NativeStrategy::new();
        static I16: NativeStrategy<i16> = NativeStrategy::new();
        static U32: NativeStrategy<u32> = NativeStrategy::new();
        static I32: NativeStrategy<i32> = NativeStrategy::new();
        static U64: NativeStrategy<u64> = NativeStrategy::new();
        static I64: NativeStrategy<i64> = NativeStrategy::new();

        match self {
            Width::U8 => &U8,
            Width::I8 => &I8,
            Width::U16 => &U16,
            Width::I16 => &I16,
            Width::U32 => &U32,
            Width::I32 => &I32,
            Width::U64 => &U64,
            Width::I64 => &I64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Width::U8 => "u8",
            Width::I8 => "i8",
            Width::U16 => "u16",
            Width::I16 => "i16",
            Width::U32 => "u32",
            Width::I32 => "i32",
            Width::U64 => "u64",
            Width::I64 => "i64",
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage layout as declared by an enumeration type.
///
/// Unlike [`Width`] this can describe layouts with no strategy (a 128-bit
/// backing integer, say); those are rejected when the descriptor is built.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storage {
    pub bytes: usize,
    pub signed: bool,
}

impl Storage {
    #[inline]
    pub const fn new(bytes: usize, signed: bool) -> Self {
        Storage { bytes, signed }
    }
}

/// Opaque bit pattern of an enumeration value.
///
/// Holds the storage bits zero-extended to 64 bits. Bits above the storage
/// width are ignored by every strategy operation and cleared in its results.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawBits(u64);

impl RawBits {
    /// The all-zero-bits pattern.
    pub const ZERO: RawBits = RawBits(0);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        RawBits(bits)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for RawBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawBits({:#x})", self.0)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// One of the eight native integers an enumeration can be stored as.
///
/// This trait is sealed: the set of widths is closed.
pub trait NativeInt:
    Copy
    + Ord
    + fmt::Display
    + std::ops::BitAnd<Output = Self>
    + std::ops::BitOr<Output = Self>
    + std::ops::BitXor<Output = Self>
    + std::ops::Not<Output = Self>
    + Into<i128>
    + Send
    + Sync
    + sealed::Sealed
    + 'static
{
    /// The width tag of this native type.
    const WIDTH: Width;

    /// Reinterpret the low bytes of a raw pattern as this type.
    fn from_raw(raw: RawBits) -> Self;

    /// Reinterpret this value's bytes as a zero-extended raw pattern.
    fn to_raw(self) -> RawBits;

    /// Two's-complement truncation of a wide numeric value to this type.
    fn from_numeric(value: i128) -> Self;
}

macro_rules! impl_native_int {
    ($($ty:ty => $width:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl NativeInt for $ty {
            const WIDTH: Width = Width::$width;

            #[inline]
            fn from_raw(raw: RawBits) -> Self {
                let mut bytes = [0u8; size_of::<$ty>()];
                bytes.copy_from_slice(&raw.0.to_le_bytes()[..size_of::<$ty>()]);
                <$ty>::from_le_bytes(bytes)
            }

            #[inline]
            fn to_raw(self) -> RawBits {
                let mut wide = [0u8; 8];
                wide[..size_of::<$ty>()].copy_from_slice(&self.to_le_bytes());
                RawBits(u64::from_le_bytes(wide))
            }

            #[inline]
            fn from_numeric(value: i128) -> Self {
                let mut bytes = [0u8; size_of::<$ty>()];
                bytes.copy_from_slice(&value.to_le_bytes()[..size_of::<$ty>()]);
                <$ty>::from_le_bytes(bytes)
            }
        }
    )*};
}

impl_native_int! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
}
