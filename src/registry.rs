// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide set of addresses handed out to COM by hosted objects.
//!
//! An address enters when `ComObject::new` hands it to COM and leaves only
//! in the Release trampoline on the transition to zero. The lock covers a
//! single set operation; callers never run native or drop code under it.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

static RETAINED: Mutex<BTreeSet<usize>> = Mutex::new(BTreeSet::new());

#[inline]
fn lock() -> MutexGuard<'static, BTreeSet<usize>> {
    // Every critical section is a single set operation, so a poisoned set is still whole.
    RETAINED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks `addr` as held by COM. Returns `false` if it was already present.
pub fn retain<T>(addr: *const T) -> bool {
    lock().insert(addr as *const () as usize)
}

/// Drops the mark for `addr`. Returns `true` if it was present.
pub fn forget<T>(addr: *const T) -> bool {
    lock().remove(&(addr as *const () as usize))
}

pub fn is_retained<T>(addr: *const T) -> bool {
    lock().contains(&(addr as *const () as usize))
}

pub fn retained_count() -> usize {
    lock().len()
}
