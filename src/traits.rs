// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;

use crate::iunknown::GUID;
use crate::vtable::InterfaceVtable;

/// Implementation logic for a COM interface hosted by this process.
///
/// The OS calls back into the object through `VTABLE`; `ComObject` supplies
/// the IUnknown slots and recovers `&Self` inside each trampoline.
pub trait ComImpl<V: InterfaceVtable>: Sized + Send + Sync + 'static {
    /// The VTable instance that delegates to `ComObject` shims.
    const VTABLE: &'static V;

    /// IID of the interface `VTABLE` implements.
    const IID: GUID;

    /// Checks if this object supports the interface `riid`.
    /// Returns a pointer to the *interface VTable* (not the inner object) if supported.
    ///
    /// The `ComObject` wrapper handles `IUnknown` itself. The default answers
    /// for `Self::IID` with `this`, since the primary vtable sits at offset 0.
    #[inline]
    fn query_interface(&self, this: *mut c_void, riid: &GUID) -> Option<*mut c_void> {
        if *riid == Self::IID {
            Some(this)
        } else {
            None
        }
    }
}
