// tests/lifetime_spec.rs
//
// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Handle ownership against hand-built vtables: every owner releases exactly
// once, a released handle never reaches the vtable again, and the Releaser
// drains in reverse order.

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use wincom::{
    ComRc, IUnknown, IUnknownRaw, IUnknownVtbl, Interface, Releaser, Variant, E_NOINTERFACE, GUID,
    HRESULT,
};

static TEST_LOCK: Mutex<()> = Mutex::new(());
static ADD_REF_CALLS: AtomicU32 = AtomicU32::new(0);
static RELEASE_CALLS: AtomicU32 = AtomicU32::new(0);
static RELEASE_ORDER: Mutex<Vec<u32>> = Mutex::new(Vec::new());

/// A foreign object that never frees itself; tests own its storage.
#[repr(C)]
struct Fake {
    lpVtbl: *const IUnknownVtbl,
    count: AtomicU32,
    tag: u32,
}

impl Fake {
    fn new(tag: u32) -> Self {
        Self {
            lpVtbl: &FAKE_VTBL,
            count: AtomicU32::new(1),
            tag,
        }
    }

    fn as_raw(&self) -> *mut c_void {
        self as *const Self as *mut c_void
    }

    fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

unsafe extern "system" fn fake_query_interface(
    _this: *mut c_void,
    _riid: *const GUID,
    ppv: *mut *mut c_void,
) -> HRESULT {
    unsafe { *ppv = core::ptr::null_mut() };
    E_NOINTERFACE
}

unsafe extern "system" fn fake_add_ref(this: *mut c_void) -> u32 {
    ADD_REF_CALLS.fetch_add(1, Ordering::SeqCst);
    let fake = unsafe { &*(this as *const Fake) };
    fake.count.fetch_add(1, Ordering::SeqCst) + 1
}

unsafe extern "system" fn fake_release(this: *mut c_void) -> u32 {
    RELEASE_CALLS.fetch_add(1, Ordering::SeqCst);
    let fake = unsafe { &*(this as *const Fake) };
    RELEASE_ORDER.lock().unwrap().push(fake.tag);
    fake.count.fetch_sub(1, Ordering::SeqCst) - 1
}

static FAKE_VTBL: IUnknownVtbl = IUnknownVtbl {
    QueryInterface: fake_query_interface,
    AddRef: fake_add_ref,
    Release: fake_release,
};

fn reset() {
    ADD_REF_CALLS.store(0, Ordering::SeqCst);
    RELEASE_CALLS.store(0, Ordering::SeqCst);
    RELEASE_ORDER.lock().unwrap().clear();
}

#[test]
fn release_runs_once_and_clears_the_handle() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(1);

    let mut unknown = unsafe { IUnknown::from_raw(fake.as_raw()) }.unwrap();
    assert_eq!(unknown.release(), Some(0));
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 1);
    assert!(unknown.is_null());
    assert!(unknown.as_raw().is_null());

    assert_eq!(unknown.release(), None);
    drop(unknown);
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(fake.count(), 0);
}

#[test]
fn dropping_an_owner_releases_it() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(1);

    let rc = unsafe { ComRc::<IUnknownRaw>::from_raw(fake.as_raw() as *mut IUnknownRaw) }.unwrap();
    drop(rc);
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(fake.count(), 0);
}

#[test]
fn clones_are_independent_owners() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(1);

    let mut first = unsafe { IUnknown::from_raw(fake.as_raw()) }.unwrap();
    let second = first.clone();
    assert_eq!(ADD_REF_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(fake.count(), 2);

    assert_eq!(first.release(), Some(1));
    assert_eq!(second.as_raw(), fake.as_raw());
    drop(second);
    drop(first);

    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 2);
    assert_eq!(fake.count(), 0);
}

#[test]
fn borrowed_pointers_add_their_own_reference() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(1);

    let borrowed = unsafe { IUnknown::from_raw_addref(fake.as_raw()) }.unwrap();
    assert_eq!(fake.count(), 2);
    drop(borrowed);
    assert_eq!(fake.count(), 1);

    assert!(unsafe { IUnknown::from_raw_addref(core::ptr::null_mut()) }.is_none());
    assert_eq!(ADD_REF_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn into_raw_hands_the_reference_back() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(1);

    let unknown = unsafe { IUnknown::from_raw(fake.as_raw()) }.unwrap();
    let raw = unknown.into_raw();
    assert_eq!(raw, fake.as_raw());
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 0);

    drop(unsafe { IUnknown::from_raw(raw) });
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn releaser_drains_in_reverse_and_only_once() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fakes = [Fake::new(1), Fake::new(2), Fake::new(3)];

    let mut releaser = Releaser::new();
    for fake in &fakes {
        releaser.add(unsafe { IUnknown::from_raw(fake.as_raw()) }.unwrap());
    }
    releaser.release();
    assert_eq!(*RELEASE_ORDER.lock().unwrap(), vec![3, 2, 1]);

    releaser.release();
    drop(releaser);
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 3);
    assert!(fakes.iter().all(|fake| fake.count() == 0));
}

#[test]
fn releaser_clears_variants_after_handles() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let held = Fake::new(7);
    let boxed = Fake::new(8);
    let plain = Fake::new(9);

    {
        let mut releaser = Releaser::new();
        let value = Variant::from_unknown(unsafe { IUnknown::from_raw(boxed.as_raw()) }.unwrap());
        releaser.add_variant(value);
        releaser.add(unsafe { IUnknown::from_raw(held.as_raw()) }.unwrap());
        releaser.add(unsafe { IUnknown::from_raw(plain.as_raw()) }.unwrap());
        assert_eq!(releaser.len(), 3);
    }

    assert_eq!(*RELEASE_ORDER.lock().unwrap(), vec![9, 7, 8]);
}

#[test]
fn released_items_may_be_released_again_through_the_releaser() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset();
    let fake = Fake::new(4);

    let mut unknown = unsafe { IUnknown::from_raw(fake.as_raw()) }.unwrap();
    unknown.release();

    let mut releaser = Releaser::new();
    releaser.add(unknown);
    releaser.release();
    assert_eq!(RELEASE_CALLS.load(Ordering::SeqCst), 1);
}
