//! The enumeration declaration trait and the macro that implements it.

use crate::cache::DescriptorSlot;
use crate::width::{RawBits, Storage};

/// A closed set of named integer constants.
///
/// This is the whole external declaration of a type: its storage layout,
/// whether it is used as a bit set, its named values in declaration order,
/// and the conversion to and from its raw bit pattern. Any value of the
/// storage integer is representable, named or not.
///
/// Usually implemented through [`enumeration!`](crate::enumeration).
pub trait Enumeration: Copy + 'static {
    /// Storage width and signedness.
    const STORAGE: Storage;

    /// Whether values combine as bit sets.
    const FLAG_STYLE: bool;

    /// Named values in declaration order. Names may alias one pattern.
    fn named_values() -> &'static [(&'static str, Self)];

    /// Storage bits, zero-extended.
    fn to_raw(self) -> RawBits;

    /// Value from storage bits.
    fn from_raw(raw: RawBits) -> Self;

    /// Slot caching this type's descriptor without locking.
    ///
    /// Must return the same `static` on every call:
    ///
    /// ```ignore
    /// fn descriptor_slot() -> &'static DescriptorSlot {
    ///     static SLOT: DescriptorSlot = DescriptorSlot::new();
    ///     &SLOT
    /// }
    /// ```
    fn descriptor_slot() -> &'static DescriptorSlot;
}

/// Declare an enumeration type.
///
/// Expands to a `Copy` newtype over the storage integer with one associated
/// constant per named value, an [`Enumeration`] impl, the bitwise operator
/// traits, ordering by the storage's native ordering, and a `Debug` impl
/// showing the value's names.
///
/// Use `enum` for discrete values and `flags` for bit sets:
///
/// ```
/// ori_enum::enumeration! {
///     pub flags Access: u8 {
///         NONE = 0,
///         READ = 1,
///         WRITE = 2,
///     }
/// }
///
/// let rw = Access::READ | Access::WRITE;
/// assert!(ori_enum::is_defined(rw));
/// assert!(!ori_enum::is_atomic(rw));
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        @declare $flag_style:literal;
        $(#[$meta:meta])* $vis:vis $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        $vis struct $name(pub $repr);

        #[allow(non_upper_case_globals, reason = "names are declared by the caller")]
        impl $name {
            $(
                $(#[$vmeta])*
                pub const $variant: Self = Self($value);
            )*
        }

        impl $crate::Enumeration for $name {
            const STORAGE: $crate::Storage =
                <$repr as $crate::NativeInt>::WIDTH.storage();
            const FLAG_STYLE: bool = $flag_style;

            fn named_values() -> &'static [(&'static str, Self)] {
                const VALUES: &[(&str, $name)] = &[
                    $( (stringify!($variant), $name::$variant) ),*
                ];
                VALUES
            }

            #[inline]
            fn to_raw(self) -> $crate::RawBits {
                <$repr as $crate::NativeInt>::to_raw(self.0)
            }

            #[inline]
            fn from_raw(raw: $crate::RawBits) -> Self {
                Self(<$repr as $crate::NativeInt>::from_raw(raw))
            }

            #[inline]
            fn descriptor_slot() -> &'static $crate::DescriptorSlot {
                static SLOT: $crate::DescriptorSlot = $crate::DescriptorSlot::new();
                &SLOT
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                $crate::and(self, rhs)
            }
        }

        impl ::std::ops::BitAndAssign for $name {
            #[inline]
            fn bitand_assign(&mut self, rhs: Self) {
                *self = $crate::and(*self, rhs);
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                $crate::or(self, rhs)
            }
        }

        impl ::std::ops::BitOrAssign for $name {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                *self = $crate::or(*self, rhs);
            }
        }

        impl ::std::ops::BitXor for $name {
            type Output = Self;

            #[inline]
            fn bitxor(self, rhs: Self) -> Self {
                $crate::xor(self, rhs)
            }
        }

        impl ::std::ops::BitXorAssign for $name {
            #[inline]
            fn bitxor_assign(&mut self, rhs: Self) {
                *self = $crate::xor(*self, rhs);
            }
        }

        impl ::std::ops::Not for $name {
            type Output = Self;

            #[inline]
            fn not(self) -> Self {
                $crate::not(self)
            }
        }

        impl ::std::cmp::PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(::std::cmp::Ord::cmp(self, other))
            }
        }

        impl ::std::cmp::Ord for $name {
            #[inline]
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                $crate::compare(*self, *other)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), $crate::format_flags(*self))
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),* $(,)?
        }
    ) => {
        $crate::enumeration! {
            @declare false;
            $(#[$meta])* $vis $name : $repr {
                $( $(#[$vmeta])* $variant = $value ),*
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis flags $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),* $(,)?
        }
    ) => {
        $crate::enumeration! {
            @declare true;
            $(#[$meta])* $vis $name : $repr {
                $( $(#[$vmeta])* $variant = $value ),*
            }
        }
    };
}
