//! Process-wide descriptor cache.
//!
//! Descriptors are built lazily on first query, leaked to `'static`, and
//! live for the rest of the process. The cache is append-only.
//!
//! # Concurrency
//!
//! The map is sharded by [`TypeId`] hash, each shard behind a `RwLock`, and
//! holds one leaked entry per type. Shard locks only guard finding or
//! inserting that entry; no declaration code runs under them, so a type's
//! `named_values` may itself resolve other enumerations.
//!
//! A build takes the entry's own mutex and checks again before running, so
//! concurrent first access to one type builds exactly one descriptor; the
//! other threads block on that mutex and then find it. A failed build
//! publishes nothing.
//!
//! Every [`Enumeration`] also carries a [`DescriptorSlot`]. Once filled,
//! resolving the type is a single atomic load with no lock at all.

use std::any::TypeId;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::descriptor::{Declaration, TypeDescriptor};
use crate::enumeration::Enumeration;
use crate::error::Result;

/// Number of shards in the descriptor cache.
const NUM_SHARDS: usize = 16;

/// One type's cache cell.
struct Entry {
    descriptor: OnceLock<&'static TypeDescriptor>,
    /// Held while this type's descriptor is being built.
    building: Mutex<()>,
}

impl Entry {
    fn new() -> Self {
        Entry {
            descriptor: OnceLock::new(),
            building: Mutex::new(()),
        }
    }
}

type Shard = FxHashMap<TypeId, &'static Entry>;

/// Memoized map from enumeration type to its descriptor.
pub struct DescriptorCache {
    shards: [RwLock<Shard>; NUM_SHARDS],
    /// Published descriptors across all shards.
    count: AtomicUsize,
}

impl DescriptorCache {
    pub fn new() -> Self {
        DescriptorCache {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
            count: AtomicUsize::new(0),
        }
    }

    /// The cache shared by the whole process.
    pub fn global() -> &'static DescriptorCache {
        static GLOBAL: OnceLock<DescriptorCache> = OnceLock::new();
        GLOBAL.get_or_init(DescriptorCache::new)
    }

    #[inline]
    fn shard_for(id: TypeId) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        id.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash_usize = hasher.finish() as usize;
        hash_usize % NUM_SHARDS
    }

    /// Entry for `id`, inserting an empty one on first request.
    fn entry(&self, id: TypeId) -> &'static Entry {
        let shard = &self.shards[Self::shard_for(id)];

        // Fast path: entry exists
        if let Some(&entry) = shard.read().get(&id) {
            return entry;
        }

        // Slow path: the map entry API re-checks under the write lock
        *shard
            .write()
            .entry(id)
            .or_insert_with(|| &*Box::leak(Box::new(Entry::new())))
    }

    /// Descriptor already published for `id`, if any.
    pub fn get(&self, id: TypeId) -> Option<&'static TypeDescriptor> {
        self.shards[Self::shard_for(id)]
            .read()
            .get(&id)
            .and_then(|entry| entry.descriptor.get().copied())
    }

    /// Descriptor for `id`, building it with `build` on first request.
    ///
    /// `build` runs at most once per successful publication and never
    /// concurrently for the same key. It runs with no shard lock held and
    /// may resolve other keys, but must not resolve `id` itself.
    pub fn get_or_try_insert_with<F>(&self, id: TypeId, build: F) -> Result<&'static TypeDescriptor>
    where
        F: FnOnce() -> Result<TypeDescriptor>,
    {
        let entry = self.entry(id);

        // Fast path: already built
        if let Some(&descriptor) = entry.descriptor.get() {
            return Ok(descriptor);
        }

        let _building = entry.building.lock();

        // Double-check after acquiring the build lock
        if let Some(&descriptor) = entry.descriptor.get() {
            return Ok(descriptor);
        }

        let built: &'static TypeDescriptor = Box::leak(Box::new(build()?));
        let descriptor = *entry.descriptor.get_or_init(|| built);
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(ty = descriptor.type_name(), total, "published enumeration descriptor");

        Ok(descriptor)
    }

    /// Descriptor for the enumeration type `E`.
    pub fn resolve<E: Enumeration>(&self) -> Result<&'static TypeDescriptor> {
        self.get_or_try_insert_with(TypeId::of::<E>(), || {
            TypeDescriptor::build(Declaration::of::<E>())
        })
    }

    /// Number of published descriptors (O(1)).
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-type, lock-free handle to a descriptor published in the global cache.
///
/// Each [`Enumeration`] owns one in a `static`.
pub struct DescriptorSlot(OnceLock<&'static TypeDescriptor>);

impl DescriptorSlot {
    pub const fn new() -> Self {
        DescriptorSlot(OnceLock::new())
    }

    #[inline]
    pub fn get(&self) -> Option<&'static TypeDescriptor> {
        self.0.get().copied()
    }

    /// Fill the slot; a slot already filled keeps its descriptor.
    pub fn publish(&self, descriptor: &'static TypeDescriptor) -> &'static TypeDescriptor {
        self.0.get_or_init(|| descriptor)
    }
}

impl Default for DescriptorSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the descriptor of `E` through its slot, then the global cache.
pub fn try_descriptor<E: Enumeration>() -> Result<&'static TypeDescriptor> {
    let slot = E::descriptor_slot();
    if let Some(descriptor) = slot.get() {
        return Ok(descriptor);
    }

    let descriptor = DescriptorCache::global().resolve::<E>()?;
    Ok(slot.publish(descriptor))
}

/// Resolve the descriptor of `E`.
///
/// # Panics
/// Panics if `E` declares a storage width with no strategy. Use
/// [`try_descriptor`] to handle that case.
#[inline]
pub fn descriptor<E: Enumeration>() -> &'static TypeDescriptor {
    try_descriptor::<E>().unwrap_or_else(|e| panic!("{e}"))
}

#[cfg(test)]
mod tests;
