//! Name lookup and human-readable rendering.

use crate::cache::descriptor;
use crate::enumeration::Enumeration;

/// First declared name whose pattern equals `value`.
pub fn name_of<E: Enumeration>(value: E) -> Option<&'static str> {
    descriptor::<E>().name_of(value.to_raw())
}

/// First value of `E` declared under `name`. Case-sensitive.
pub fn from_name<E: Enumeration>(name: &str) -> Option<E> {
    descriptor::<E>().value_of(name).map(E::from_raw)
}

/// Render `value` by name.
///
/// A named value prints its first declared name. A defined flag-style
/// combination prints its atomic flags joined with `" | "` in declaration
/// order. Anything else prints its number in the storage's signedness.
pub fn format_flags<E: Enumeration>(value: E) -> String {
    let descriptor = descriptor::<E>();
    let raw = value.to_raw();

    if let Some(name) = descriptor.name_of(raw) {
        return name.to_owned();
    }

    if descriptor.is_flag_style() && descriptor.is_defined(raw) {
        let names: Vec<&str> = descriptor
            .flags_in(raw)
            .filter_map(|flag| descriptor.name_of(flag))
            .collect();
        return names.join(" | ");
    }

    descriptor.strategy().format(raw)
}
