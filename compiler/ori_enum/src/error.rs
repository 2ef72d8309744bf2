//! Errors surfaced by descriptor construction and the facade.

use thiserror::Error;

/// Error raised by an enumeration operation.
///
/// Every variant is a deterministic function of the type declaration or the
/// call's arguments, so none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumError {
    /// A required collection argument was absent.
    #[error("flag sequence argument is absent")]
    NullSequence,

    /// Flag decomposition was requested on a type not declared flag-style.
    #[error("`{type_name}` is not a flag-style enumeration")]
    NotFlagStyle { type_name: &'static str },

    /// The declared storage has no matching width strategy.
    #[error(
        "`{type_name}` declares {bytes}-byte {} storage; only 8, 16, 32 and 64-bit integers are supported",
        signedness(.signed)
    )]
    UnsupportedWidth {
        type_name: &'static str,
        bytes: usize,
        signed: bool,
    },
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes fields by reference"
)]
fn signedness(signed: &bool) -> &'static str {
    if *signed {
        "signed"
    } else {
        "unsigned"
    }
}

/// Result alias for enumeration operations.
pub type Result<T> = std::result::Result<T, EnumError>;
