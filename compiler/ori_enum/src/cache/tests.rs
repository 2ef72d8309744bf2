use std::sync::atomic::AtomicUsize;
use std::sync::OnceLock;

use pretty_assertions::assert_eq;

use crate::error::EnumError;
use crate::width::{NativeInt, RawBits, Storage, Width};

use super::*;

crate::enumeration! {
    flags Cached: u16 {
        A = 1,
        B = 2,
    }
}

/// Declared by hand rather than through the macro.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Manual(u32);

impl Enumeration for Manual {
    const STORAGE: Storage = Width::U32.storage();
    const FLAG_STYLE: bool = false;

    fn named_values() -> &'static [(&'static str, Self)] {
        const VALUES: &[(&str, Manual)] = &[("ZERO", Manual(0)), ("ONE", Manual(1))];
        VALUES
    }

    fn to_raw(self) -> RawBits {
        RawBits::new(u64::from(self.0))
    }

    fn from_raw(raw: RawBits) -> Self {
        Manual(u32::from_raw(raw))
    }

    fn descriptor_slot() -> &'static DescriptorSlot {
        static SLOT: DescriptorSlot = DescriptorSlot::new();
        &SLOT
    }
}

/// Named values computed from another enumeration on first use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Composite(u16);

impl Enumeration for Composite {
    const STORAGE: Storage = Width::U16.storage();
    const FLAG_STYLE: bool = false;

    fn named_values() -> &'static [(&'static str, Self)] {
        static VALUES: OnceLock<Vec<(&'static str, Composite)>> = OnceLock::new();
        VALUES.get_or_init(|| {
            let both = crate::or(Cached::A, Cached::B);
            vec![("NONE", Composite(0)), ("BOTH", Composite(both.0))]
        })
    }

    fn to_raw(self) -> RawBits {
        self.0.to_raw()
    }

    fn from_raw(raw: RawBits) -> Self {
        Composite(u16::from_raw(raw))
    }

    fn descriptor_slot() -> &'static DescriptorSlot {
        static SLOT: DescriptorSlot = DescriptorSlot::new();
        &SLOT
    }
}

/// Backed by a 128-bit integer, which has no strategy.
#[derive(Copy, Clone, Debug)]
struct Wide;

impl Enumeration for Wide {
    const STORAGE: Storage = Storage::new(16, false);
    const FLAG_STYLE: bool = true;

    fn named_values() -> &'static [(&'static str, Self)] {
        const VALUES: &[(&str, Wide)] = &[("ONLY", Wide)];
        VALUES
    }

    fn to_raw(self) -> RawBits {
        RawBits::new(1)
    }

    fn from_raw(_: RawBits) -> Self {
        Wide
    }

    fn descriptor_slot() -> &'static DescriptorSlot {
        static SLOT: DescriptorSlot = DescriptorSlot::new();
        &SLOT
    }
}

fn array_id<const N: usize>() -> TypeId {
    TypeId::of::<[u8; N]>()
}

/// Two distinct keys that land in the same shard.
fn same_shard_ids() -> (TypeId, TypeId) {
    // One more key than there are shards
    let ids = [
        array_id::<0>(),
        array_id::<1>(),
        array_id::<2>(),
        array_id::<3>(),
        array_id::<4>(),
        array_id::<5>(),
        array_id::<6>(),
        array_id::<7>(),
        array_id::<8>(),
        array_id::<9>(),
        array_id::<10>(),
        array_id::<11>(),
        array_id::<12>(),
        array_id::<13>(),
        array_id::<14>(),
        array_id::<15>(),
        array_id::<16>(),
    ];
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            if DescriptorCache::shard_for(a) == DescriptorCache::shard_for(b) {
                return (a, b);
            }
        }
    }
    panic!("{} keys cannot occupy distinct shards", ids.len())
}

fn built_descriptor(width: Width) -> Result<TypeDescriptor> {
    TypeDescriptor::build(Declaration {
        type_name: "Built",
        storage: width.storage(),
        flag_style: false,
        values: Vec::new(),
    })
}

#[test]
fn resolve_builds_once_and_returns_same_descriptor() {
    let cache = DescriptorCache::new();
    assert!(cache.is_empty());

    let first = cache.resolve::<Manual>();
    let second = cache.resolve::<Manual>();
    match (first, second) {
        (Ok(first), Ok(second)) => assert!(std::ptr::eq(first, second)),
        other => panic!("resolution failed: {other:?}"),
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn builder_runs_at_most_once_per_key() {
    let cache = DescriptorCache::new();
    let builds = AtomicUsize::new(0);
    let id = TypeId::of::<u8>();

    for _ in 0..3 {
        let resolved = cache.get_or_try_insert_with(id, || {
            builds.fetch_add(1, Ordering::Relaxed);
            built_descriptor(Width::U8)
        });
        assert!(resolved.is_ok());
    }
    assert_eq!(builds.load(Ordering::Relaxed), 1);
    assert!(cache.get(id).is_some());
}

#[test]
fn failed_build_publishes_nothing() {
    let cache = DescriptorCache::new();
    assert_eq!(
        cache.resolve::<Wide>().map(TypeDescriptor::width),
        Err(EnumError::UnsupportedWidth {
            type_name: std::any::type_name::<Wide>(),
            bytes: 16,
            signed: false,
        })
    );
    assert!(cache.get(TypeId::of::<Wide>()).is_none());
    assert!(cache.is_empty());

    // Failure is deterministic on every attempt
    assert!(cache.resolve::<Wide>().is_err());
}

#[test]
fn distinct_types_get_distinct_descriptors() {
    let cache = DescriptorCache::new();
    let manual = cache.resolve::<Manual>().map(TypeDescriptor::width);
    let cached = cache.resolve::<Cached>().map(TypeDescriptor::width);
    assert_eq!(manual, Ok(Width::U32));
    assert_eq!(cached, Ok(Width::U16));
    assert_eq!(cache.len(), 2);
}

#[test]
fn slot_is_filled_on_first_resolution() {
    let resolved = try_descriptor::<Cached>();
    match (resolved, Cached::descriptor_slot().get()) {
        (Ok(resolved), Some(slotted)) => assert!(std::ptr::eq(resolved, slotted)),
        other => panic!("slot not filled: {other:?}"),
    }
}

#[test]
fn slot_matches_global_cache() {
    let via_slot = descriptor::<Cached>();
    let via_cache = DescriptorCache::global().get(TypeId::of::<Cached>());
    assert!(via_cache.is_some_and(|d| std::ptr::eq(d, via_slot)));
}

#[test]
fn hand_written_types_fill_their_slot() {
    let d = descriptor::<Manual>();
    assert_eq!(d.width(), Width::U32);
    assert_eq!(d.contiguous_range(), Some((0, 1)));
    assert!(Manual::descriptor_slot()
        .get()
        .is_some_and(|slotted| std::ptr::eq(slotted, d)));
}

#[test]
fn failed_resolution_leaves_slot_empty() {
    assert!(try_descriptor::<Wide>().is_err());
    assert!(Wide::descriptor_slot().get().is_none());
}

#[test]
fn builder_may_resolve_another_key_in_the_same_shard() {
    let cache = DescriptorCache::new();
    let (outer, inner) = same_shard_ids();

    let resolved = cache.get_or_try_insert_with(outer, || {
        cache.get_or_try_insert_with(inner, || built_descriptor(Width::U16))?;
        built_descriptor(Width::U8)
    });
    assert_eq!(resolved.map(TypeDescriptor::width), Ok(Width::U8));
    assert_eq!(cache.get(inner).map(TypeDescriptor::width), Some(Width::U16));
    assert_eq!(cache.len(), 2);
}

#[test]
fn named_values_may_use_other_enumerations() {
    assert!(crate::is_defined(Composite(3)));
    assert!(!crate::is_defined(Composite(1)));
    assert_eq!(
        descriptor::<Composite>().value_of("BOTH"),
        Some(RawBits::new(3))
    );
}

#[test]
fn slot_keeps_first_publication() {
    let slot = DescriptorSlot::new();
    let first: &'static TypeDescriptor = match built_descriptor(Width::U8) {
        Ok(d) => Box::leak(Box::new(d)),
        Err(e) => panic!("{e}"),
    };
    let second: &'static TypeDescriptor = match built_descriptor(Width::I8) {
        Ok(d) => Box::leak(Box::new(d)),
        Err(e) => panic!("{e}"),
    };
    assert!(std::ptr::eq(slot.publish(first), first));
    assert!(std::ptr::eq(slot.publish(second), first));
    assert_eq!(slot.get().map(TypeDescriptor::width), Some(Width::U8));
}

#[test]
#[should_panic(expected = "only 8, 16, 32 and 64-bit integers are supported")]
fn descriptor_panics_on_unsupported_width() {
    let _ = descriptor::<Wide>();
}
