//! Lazy value sequences handed out by the facade.
//!
//! None of these materialize anything. Each is `Clone` when its source is,
//! so a sequence is restartable exactly when its input is.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::slice;

use crate::descriptor::NamedValue;
use crate::enumeration::Enumeration;
use crate::strategy::WidthStrategy;
use crate::width::RawBits;

/// Elements of a caller-supplied sequence present in a value.
///
/// Keeps the input order and its duplicates.
#[derive(Clone, Debug)]
pub struct PresentFlags<E, I> {
    value: RawBits,
    strategy: &'static dyn WidthStrategy,
    flags: I,
    _marker: PhantomData<fn() -> E>,
}

impl<E, I> PresentFlags<E, I> {
    pub(crate) fn new(value: RawBits, strategy: &'static dyn WidthStrategy, flags: I) -> Self {
        PresentFlags {
            value,
            strategy,
            flags,
            _marker: PhantomData,
        }
    }
}

impl<E, I> Iterator for PresentFlags<E, I>
where
    E: Enumeration,
    I: Iterator<Item = E>,
{
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let (value, strategy) = (self.value, self.strategy);
        self.flags
            .find(|flag| strategy.has_flag(value, flag.to_raw()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.flags.size_hint().1)
    }
}

impl<E, I> FusedIterator for PresentFlags<E, I>
where
    E: Enumeration,
    I: FusedIterator<Item = E>,
{
}

/// Atomic flags of a type present in a value, in declaration order.
#[derive(Clone, Debug)]
pub struct Flags<E> {
    value: RawBits,
    strategy: &'static dyn WidthStrategy,
    atomic: slice::Iter<'static, RawBits>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Flags<E> {
    pub(crate) fn new(
        value: RawBits,
        strategy: &'static dyn WidthStrategy,
        atomic: &'static [RawBits],
    ) -> Self {
        Flags {
            value: strategy.normalize(value),
            strategy,
            atomic: atomic.iter(),
            _marker: PhantomData,
        }
    }
}

impl<E: Enumeration> Iterator for Flags<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let (value, strategy) = (self.value, self.strategy);
        self.atomic
            .find(|&&flag| strategy.has_flag(value, flag))
            .map(|&flag| E::from_raw(flag))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.atomic.len()))
    }
}

impl<E: Enumeration> FusedIterator for Flags<E> {}

/// Raw patterns of a type viewed as typed values.
#[derive(Clone, Debug)]
pub struct Values<E> {
    raw: slice::Iter<'static, RawBits>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Values<E> {
    pub(crate) fn new(raw: &'static [RawBits]) -> Self {
        Values {
            raw: raw.iter(),
            _marker: PhantomData,
        }
    }
}

impl<E: Enumeration> Iterator for Values<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        self.raw.next().map(|&raw| E::from_raw(raw))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<E: Enumeration> ExactSizeIterator for Values<E> {}

impl<E: Enumeration> DoubleEndedIterator for Values<E> {
    #[inline]
    fn next_back(&mut self) -> Option<E> {
        self.raw.next_back().map(|&raw| E::from_raw(raw))
    }
}

impl<E: Enumeration> FusedIterator for Values<E> {}

/// Every declared value of a type, aliases included, in declaration order.
#[derive(Clone, Debug)]
pub struct AllValues<E> {
    named: slice::Iter<'static, NamedValue>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> AllValues<E> {
    pub(crate) fn new(named: &'static [NamedValue]) -> Self {
        AllValues {
            named: named.iter(),
            _marker: PhantomData,
        }
    }
}

impl<E: Enumeration> Iterator for AllValues<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        self.named.next().map(|named| E::from_raw(named.bits))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.named.size_hint()
    }
}

impl<E: Enumeration> ExactSizeIterator for AllValues<E> {}

impl<E: Enumeration> DoubleEndedIterator for AllValues<E> {
    #[inline]
    fn next_back(&mut self) -> Option<E> {
        self.named.next_back().map(|named| E::from_raw(named.bits))
    }
}

impl<E: Enumeration> FusedIterator for AllValues<E> {}
