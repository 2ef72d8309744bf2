//! Per-type representation descriptors.
//!
//! A [`TypeDescriptor`] is computed once from a type's [`Declaration`] and
//! answers every query that needs more than a single strategy call:
//! definedness, atomicity, flag decomposition and name lookup.
//!
//! # Atomic values
//!
//! For flag-style types a non-zero named pattern `v` is atomic unless the OR
//! of the *other* distinct named patterns contained in `v` reproduces `v`
//! exactly. Aliases (other names with the same pattern) are never counted
//! as sub-flags, and a pattern with one bit no smaller named flag covers
//! stays atomic even if smaller flags overlap the rest of it.
//!
//! # Contiguous ranges
//!
//! For other types, if the distinct named values sorted numerically have no
//! gaps, membership becomes a bound check on the inclusive `[low, high]`.

use rustc_hash::FxHashSet;

use crate::enumeration::Enumeration;
use crate::error::{EnumError, Result};
use crate::strategy::WidthStrategy;
use crate::width::{RawBits, Storage, Width};

/// A declared (name, bit pattern) pair.
///
/// Two named values with the same pattern are aliases: distinct entries,
/// bitwise equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedValue {
    pub name: &'static str,
    pub bits: RawBits,
}

impl NamedValue {
    #[inline]
    pub const fn new(name: &'static str, bits: RawBits) -> Self {
        NamedValue { name, bits }
    }
}

/// Everything a descriptor is built from.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub type_name: &'static str,
    pub storage: Storage,
    pub flag_style: bool,
    /// Named values in declaration order.
    pub values: Vec<NamedValue>,
}

impl Declaration {
    /// Read the declaration of an enumeration type.
    pub fn of<E: Enumeration>() -> Self {
        Declaration {
            type_name: std::any::type_name::<E>(),
            storage: E::STORAGE,
            flag_style: E::FLAG_STYLE,
            values: E::named_values()
                .iter()
                .map(|&(name, value)| NamedValue::new(name, value.to_raw()))
                .collect(),
        }
    }
}

/// Immutable summary of one enumeration type.
#[derive(Debug)]
pub struct TypeDescriptor {
    type_name: &'static str,
    width: Width,
    strategy: &'static dyn WidthStrategy,
    flag_style: bool,
    named: Vec<NamedValue>,
    /// Distinct named patterns, first occurrence order.
    distinct: Vec<RawBits>,
    named_set: FxHashSet<RawBits>,
    /// Atomic patterns in declaration order.
    atomic: Vec<RawBits>,
    atomic_set: FxHashSet<RawBits>,
    range: Option<(i128, i128)>,
}

impl TypeDescriptor {
    /// Build a descriptor.
    ///
    /// Fails with [`EnumError::UnsupportedWidth`] if the declared storage is
    /// not one of the eight standard integers.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = decl.type_name))]
    pub fn build(decl: Declaration) -> Result<Self> {
        let Some(width) = Width::from_storage(decl.storage) else {
            tracing::warn!(
                bytes = decl.storage.bytes,
                signed = decl.storage.signed,
                "no width strategy for declared storage"
            );
            return Err(EnumError::UnsupportedWidth {
                type_name: decl.type_name,
                bytes: decl.storage.bytes,
                signed: decl.storage.signed,
            });
        };
        let strategy = width.strategy();

        let named: Vec<NamedValue> = decl
            .values
            .into_iter()
            .map(|value| NamedValue::new(value.name, strategy.normalize(value.bits)))
            .collect();

        let mut named_set = FxHashSet::default();
        let distinct: Vec<RawBits> = named
            .iter()
            .map(|value| value.bits)
            .filter(|&bits| named_set.insert(bits))
            .collect();

        let (atomic, range) = if decl.flag_style {
            (atomic_patterns(strategy, &distinct), None)
        } else {
            (distinct.clone(), contiguous_range(strategy, &distinct))
        };
        let atomic_set = atomic.iter().copied().collect();

        tracing::debug!(
            %width,
            flag_style = decl.flag_style,
            named = named.len(),
            atomic = atomic.len(),
            ?range,
            "built enumeration descriptor"
        );

        Ok(TypeDescriptor {
            type_name: decl.type_name,
            width,
            strategy,
            flag_style: decl.flag_style,
            named,
            distinct,
            named_set,
            atomic,
            atomic_set,
            range,
        })
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn strategy(&self) -> &'static dyn WidthStrategy {
        self.strategy
    }

    #[inline]
    pub fn is_flag_style(&self) -> bool {
        self.flag_style
    }

    /// Named values in declaration order, aliases included.
    #[inline]
    pub fn named_values(&self) -> &[NamedValue] {
        &self.named
    }

    /// Distinct named bit patterns in first-declared order.
    #[inline]
    pub fn distinct_values(&self) -> &[RawBits] {
        &self.distinct
    }

    /// Atomic patterns in declaration order.
    ///
    /// For non-flag types this is every distinct named pattern.
    #[inline]
    pub fn atomic_values(&self) -> &[RawBits] {
        &self.atomic
    }

    /// Inclusive numeric bounds, when the named values form a gap-free run.
    #[inline]
    pub fn contiguous_range(&self) -> Option<(i128, i128)> {
        self.range
    }

    /// Fail with [`EnumError::NotFlagStyle`] unless this type is flag-style.
    pub fn require_flag_style(&self) -> Result<()> {
        if self.flag_style {
            Ok(())
        } else {
            Err(EnumError::NotFlagStyle {
                type_name: self.type_name,
            })
        }
    }

    /// True iff `value` is exactly one of the named patterns.
    pub fn is_named(&self, value: RawBits) -> bool {
        self.named_set.contains(&self.strategy.normalize(value))
    }

    /// Whether `value` is a legal value of this type.
    ///
    /// Flag-style: a named pattern, or a non-zero value whose every set bit
    /// belongs to some atomic flag it contains. Zero is legal only when
    /// named. Otherwise: inside the contiguous range when there is one,
    /// else exactly named.
    pub fn is_defined(&self, value: RawBits) -> bool {
        let value = self.strategy.normalize(value);
        if self.flag_style {
            self.named_set.contains(&value)
                || (!value.is_zero() && self.strategy.or_all(self.flags_in(value)) == value)
        } else if let Some((low, high)) = self.range {
            (low..=high).contains(&self.strategy.to_numeric(value))
        } else {
            self.named_set.contains(&value)
        }
    }

    /// Flag-style: `value` is one of the atomic patterns. Otherwise the same
    /// as [`is_defined`](Self::is_defined).
    pub fn is_atomic(&self, value: RawBits) -> bool {
        if self.flag_style {
            self.atomic_set.contains(&self.strategy.normalize(value))
        } else {
            self.is_defined(value)
        }
    }

    /// Atomic patterns present in `value`, lazily, in declaration order.
    pub fn flags_in(&self, value: RawBits) -> impl Iterator<Item = RawBits> + Clone + '_ {
        let strategy = self.strategy;
        let value = strategy.normalize(value);
        self.atomic
            .iter()
            .copied()
            .filter(move |&flag| strategy.has_flag(value, flag))
    }

    /// First declared name carrying exactly `value`.
    pub fn name_of(&self, value: RawBits) -> Option<&'static str> {
        let value = self.strategy.normalize(value);
        self.named
            .iter()
            .find(|named| named.bits == value)
            .map(|named| named.name)
    }

    /// Pattern of the first value declared under `name`.
    pub fn value_of(&self, name: &str) -> Option<RawBits> {
        self.named
            .iter()
            .find(|named| named.name == name)
            .map(|named| named.bits)
    }
}

/// Non-zero distinct patterns not covered by their named sub-patterns.
fn atomic_patterns(strategy: &dyn WidthStrategy, distinct: &[RawBits]) -> Vec<RawBits> {
    distinct
        .iter()
        .copied()
        .filter(|&value| !value.is_zero() && !is_covered(strategy, value, distinct))
        .collect()
}

/// True iff the OR of every other non-zero named pattern contained in
/// `value` equals `value`.
fn is_covered(strategy: &dyn WidthStrategy, value: RawBits, distinct: &[RawBits]) -> bool {
    let sub_flags = distinct
        .iter()
        .copied()
        .filter(|&other| other != value && !other.is_zero() && strategy.has_flag(value, other));
    strategy.or_all(sub_flags) == value
}

fn contiguous_range(strategy: &dyn WidthStrategy, distinct: &[RawBits]) -> Option<(i128, i128)> {
    let mut numbers: Vec<i128> = distinct
        .iter()
        .map(|&value| strategy.to_numeric(value))
        .collect();
    numbers.sort_unstable();

    let low = *numbers.first()?;
    let high = *numbers.last()?;
    numbers
        .windows(2)
        .all(|pair| pair[1] - pair[0] == 1)
        .then_some((low, high))
}
