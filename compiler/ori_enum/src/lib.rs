//! Ori Enum - width-agnostic enumeration algebra
//!
//! Bitwise, comparison, membership and flag-decomposition operations over
//! any closed set of named integer constants, without the caller naming the
//! storage integer:
//! - `and`/`or`/`xor`/`not`, flag tests and comparisons in the storage's
//!   native width and signedness
//! - `is_defined`/`is_atomic` under discrete or bit-set semantics
//! - `get_flags`: decomposition into atomic named flags
//!
//! # Design
//!
//! - **Descriptor per type**: a type's named values are summarized once into
//!   an immutable [`TypeDescriptor`] (width strategy, atomic set, range).
//! - **Strategy per width**: one [`WidthStrategy`] per native integer,
//!   selected when the descriptor is built, never re-dispatched.
//! - **Reinterpret, don't convert**: values travel as [`RawBits`] and every
//!   operation reads them as the exact native integer.
//! - **Build once, read forever**: descriptors live in the process-wide
//!   [`DescriptorCache`] from first use to process exit.
//!
//! # Declaring types
//!
//! ```
//! use ori_enum::{enumeration, get_flags, is_defined};
//!
//! enumeration! {
//!     pub flags Perm: u8 {
//!         READ = 1,
//!         WRITE = 2,
//!         EXEC = 4,
//!     }
//! }
//!
//! let rw = Perm::READ | Perm::WRITE;
//! assert!(is_defined(rw));
//! assert_eq!(get_flags(rw).into_iter().flatten().count(), 2);
//! assert!(!is_defined(Perm(8)));
//! ```

mod cache;
mod descriptor;
mod enumeration;
mod error;
mod format;
mod iter;
mod ops;
mod strategy;
mod width;

pub use cache::{descriptor, try_descriptor, DescriptorCache, DescriptorSlot};
pub use descriptor::{Declaration, NamedValue, TypeDescriptor};
pub use enumeration::Enumeration;
pub use error::{EnumError, Result};
pub use format::{format_flags, from_name, name_of};
pub use iter::{AllValues, Flags, PresentFlags, Values};
pub use ops::{
    and, compare, compare_to, equal, from_numeric, get_all_values, get_atomic_values, get_flags,
    get_names, greater, has_any_flag, has_flag, is_atomic, is_defined, less, not, or, or_all,
    present_flags,
    remove_flag, to_numeric, toggle_flag, underlying_width, xor,
};
pub use strategy::{NativeStrategy, WidthStrategy};
pub use width::{NativeInt, RawBits, Storage, Width};
