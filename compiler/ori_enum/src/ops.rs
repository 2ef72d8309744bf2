//! Generic entry points.
//!
//! Every function resolves the type's descriptor (built on first use, then a
//! cached handle) and forwards to its width strategy. Callers never name the
//! storage width.
//!
//! Functions without a failure mode resolve through [`descriptor`] and
//! therefore panic if the type declares an unsupported width; the first
//! call reports it. [`underlying_width`] and [`try_descriptor`] surface the
//! same condition as an error.

use std::cmp::Ordering;

use crate::cache::{descriptor, try_descriptor};
use crate::enumeration::Enumeration;
use crate::error::{EnumError, Result};
use crate::iter::{AllValues, Flags, PresentFlags, Values};
use crate::width::Width;

// Bitwise operations

#[inline]
pub fn and<E: Enumeration>(a: E, b: E) -> E {
    E::from_raw(descriptor::<E>().strategy().and(a.to_raw(), b.to_raw()))
}

#[inline]
pub fn or<E: Enumeration>(a: E, b: E) -> E {
    E::from_raw(descriptor::<E>().strategy().or(a.to_raw(), b.to_raw()))
}

/// OR of every value in `values`; all-zero-bits when empty.
pub fn or_all<E, I>(values: I) -> E
where
    E: Enumeration,
    I: IntoIterator<Item = E>,
{
    let strategy = descriptor::<E>().strategy();
    E::from_raw(strategy.or_all(values.into_iter().map(E::to_raw)))
}

#[inline]
pub fn xor<E: Enumeration>(a: E, b: E) -> E {
    E::from_raw(descriptor::<E>().strategy().xor(a.to_raw(), b.to_raw()))
}

#[inline]
pub fn not<E: Enumeration>(value: E) -> E {
    E::from_raw(descriptor::<E>().strategy().not(value.to_raw()))
}

/// `value` with every bit of `flag` cleared.
pub fn remove_flag<E: Enumeration>(value: E, flag: E) -> E {
    let strategy = descriptor::<E>().strategy();
    E::from_raw(strategy.and(value.to_raw(), strategy.not(flag.to_raw())))
}

/// `value` with every bit of `flag` flipped.
#[inline]
pub fn toggle_flag<E: Enumeration>(value: E, flag: E) -> E {
    xor(value, flag)
}

// Flag tests

/// True iff every bit of `flag` is set in `value`.
#[inline]
pub fn has_flag<E: Enumeration>(value: E, flag: E) -> bool {
    descriptor::<E>()
        .strategy()
        .has_flag(value.to_raw(), flag.to_raw())
}

/// True iff any of `flags` is present in `value`.
///
/// Fails with [`EnumError::NullSequence`] when `flags` is absent.
pub fn has_any_flag<E, I>(value: E, flags: Option<I>) -> Result<bool>
where
    E: Enumeration,
    I: IntoIterator<Item = E>,
{
    let flags = flags.ok_or(EnumError::NullSequence)?;
    let strategy = descriptor::<E>().strategy();
    Ok(strategy.has_any_flag(value.to_raw(), flags.into_iter().map(E::to_raw)))
}

/// The elements of `flags` present in `value`, lazily, in input order with
/// duplicates kept.
///
/// Fails with [`EnumError::NullSequence`] when `flags` is absent; the check
/// happens before any element is read.
pub fn present_flags<E, I>(value: E, flags: Option<I>) -> Result<PresentFlags<E, I::IntoIter>>
where
    E: Enumeration,
    I: IntoIterator<Item = E>,
{
    let flags = flags.ok_or(EnumError::NullSequence)?;
    let strategy = descriptor::<E>().strategy();
    Ok(PresentFlags::new(value.to_raw(), strategy, flags.into_iter()))
}

// Comparisons

/// Three-way comparison in the storage's native ordering.
#[inline]
pub fn compare<E: Enumeration>(a: E, b: E) -> Ordering {
    descriptor::<E>().strategy().compare(a.to_raw(), b.to_raw())
}

/// Three-way comparison as -1, 0 or 1.
#[inline]
pub fn compare_to<E: Enumeration>(a: E, b: E) -> i32 {
    descriptor::<E>().strategy().compare_to(a.to_raw(), b.to_raw())
}

#[inline]
pub fn less<E: Enumeration>(a: E, b: E) -> bool {
    descriptor::<E>().strategy().less(a.to_raw(), b.to_raw())
}

#[inline]
pub fn greater<E: Enumeration>(a: E, b: E) -> bool {
    descriptor::<E>().strategy().greater(a.to_raw(), b.to_raw())
}

#[inline]
pub fn equal<E: Enumeration>(a: E, b: E) -> bool {
    descriptor::<E>().strategy().equal(a.to_raw(), b.to_raw())
}

// Membership and decomposition

/// Whether `value` is a legal value of its type.
#[inline]
pub fn is_defined<E: Enumeration>(value: E) -> bool {
    descriptor::<E>().is_defined(value.to_raw())
}

/// Whether `value` is one of its type's atomic values.
#[inline]
pub fn is_atomic<E: Enumeration>(value: E) -> bool {
    descriptor::<E>().is_atomic(value.to_raw())
}

/// The atomic flags present in `value`, lazily.
///
/// Fails with [`EnumError::NotFlagStyle`] for types not declared flag-style.
pub fn get_flags<E: Enumeration>(value: E) -> Result<Flags<E>> {
    let descriptor = try_descriptor::<E>()?;
    descriptor.require_flag_style()?;
    Ok(Flags::new(
        value.to_raw(),
        descriptor.strategy(),
        descriptor.atomic_values(),
    ))
}

/// Atomic values of `E`; every distinct named value for non-flag types.
pub fn get_atomic_values<E: Enumeration>() -> Values<E> {
    Values::new(descriptor::<E>().atomic_values())
}

/// Every declared value of `E` in declaration order, aliases included.
pub fn get_all_values<E: Enumeration>() -> AllValues<E> {
    AllValues::new(descriptor::<E>().named_values())
}

/// Every declared name of `E` in declaration order.
pub fn get_names<E: Enumeration>() -> impl ExactSizeIterator<Item = &'static str> + Clone {
    descriptor::<E>().named_values().iter().map(|named| named.name)
}

// Type information

/// Storage width and signedness of `E`.
pub fn underlying_width<E: Enumeration>() -> Result<Width> {
    try_descriptor::<E>().map(|descriptor| descriptor.width())
}

/// Exact numeric value of `value` in its storage's signedness.
#[inline]
pub fn to_numeric<E: Enumeration>(value: E) -> i128 {
    descriptor::<E>().strategy().to_numeric(value.to_raw())
}

/// Value of `E` with the given number, truncated to its storage width.
#[inline]
pub fn from_numeric<E: Enumeration>(value: i128) -> E {
    E::from_raw(descriptor::<E>().strategy().from_numeric(value))
}
