// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference count arithmetic for hosted objects.
//!
//! With `refcount-hardening`, a count that would pass `i32::MAX` or drop
//! below zero aborts the process instead of wrapping into a use-after-free.

use core::sync::atomic::{AtomicU32, Ordering};

const MAX_REFCOUNT: u32 = i32::MAX as u32;

#[cold]
#[inline(never)]
fn refcount_violation(count: u32) -> ! {
    tracing::error!(count, "COM reference count overflow or underflow");
    std::process::abort()
}

/// AddRef. Returns the new count.
#[inline]
pub(crate) fn add(ref_count: &AtomicU32) -> u32 {
    if !cfg!(feature = "refcount-hardening") {
        return ref_count.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
    }
    let next = ref_count.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |curr| {
        (curr < MAX_REFCOUNT).then_some(curr + 1)
    });
    match next {
        Ok(prev) => prev + 1,
        Err(curr) => refcount_violation(curr),
    }
}

/// Release. Returns the new count; the caller frees the object at zero.
#[inline]
pub(crate) fn sub(ref_count: &AtomicU32) -> u32 {
    if !cfg!(feature = "refcount-hardening") {
        return ref_count.fetch_sub(1, Ordering::Release).wrapping_sub(1);
    }
    match ref_count.fetch_update(Ordering::Release, Ordering::Relaxed, |curr| curr.checked_sub(1)) {
        Ok(prev) => prev - 1,
        Err(curr) => refcount_violation(curr),
    }
}
