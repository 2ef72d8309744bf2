#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test code — panics provide clear failure messages"
)]

//! Concurrent first access to descriptors.
//!
//! Many threads resolve the same type at once; exactly one descriptor may be
//! built, and every thread must observe that one, fully built.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=ori_enum=debug cargo test -p ori_enum --test concurrency
//! ```

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use ori_enum::{
    descriptor, enumeration, get_flags, is_defined, Declaration, DescriptorCache, TypeDescriptor,
};
use tracing_subscriber::EnvFilter;

const THREADS: usize = 16;

enumeration! {
    pub flags Contended: u64 {
        LOW = 1,
        HIGH = 1 << 63,
        BOTH = 1 | 1 << 63,
    }
}

enumeration! {
    pub enum Racing: i16 {
        NEG = -1,
        ZERO = 0,
        POS = 1,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn concurrent_first_build_runs_once() {
    init_tracing();
    let cache = DescriptorCache::new();
    let builds = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let resolved: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    let descriptor = cache
                        .get_or_try_insert_with(TypeId::of::<Contended>(), || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            // Widen the window for racing threads
                            thread::sleep(Duration::from_millis(20));
                            TypeDescriptor::build(Declaration::of::<Contended>())
                        })
                        .unwrap();
                    assert_eq!(descriptor.atomic_values().len(), 2);
                    std::ptr::from_ref(descriptor) as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
    assert!(resolved.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn global_resolution_converges_on_one_descriptor() {
    init_tracing();
    let barrier = Barrier::new(THREADS);

    let resolved: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    assert!(is_defined(Racing::NEG));
                    assert!(!is_defined(Racing(2)));
                    std::ptr::from_ref(descriptor::<Racing>()) as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(resolved.windows(2).all(|pair| pair[0] == pair[1]));
    let cached = DescriptorCache::global().get(TypeId::of::<Racing>()).unwrap();
    assert_eq!(std::ptr::from_ref(cached) as usize, resolved[0]);
}

#[test]
fn readers_never_see_partial_descriptors() {
    init_tracing();
    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..100 {
                    let flags: Vec<Contended> = get_flags(Contended::BOTH).unwrap().collect();
                    assert_eq!(flags, vec![Contended::LOW, Contended::HIGH]);
                }
            });
        }
    });
}
