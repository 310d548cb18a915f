// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::hresult::{E_NOINTERFACE, E_POINTER, HRESULT, S_OK};
use crate::iunknown::{IUnknownVtbl, GUID, IID_IUNKNOWN};
use crate::refcount;
use crate::registry;
use crate::smart_ptr::{ComRc, Interface};
use crate::traits::ComImpl;
use crate::vtable::InterfaceVtable;

/// A COM object hosted by this process.
///
/// The vtable pointer is the first field, so the object's address is the
/// interface pointer COM sees. The allocation lives until the reference
/// count drops to zero inside `shim_release`; the address stays in the
/// retention registry for exactly that span.
#[repr(C)]
pub struct ComObject<T, V>
where
    T: ComImpl<V>,
    V: InterfaceVtable,
{
    vtable: &'static V,
    ref_count: AtomicU32,
    pub inner: T,
}

impl<T, V> ComObject<T, V>
where
    T: ComImpl<V>,
    V: InterfaceVtable,
{
    /// Allocates the object with a reference count of one and returns the
    /// interface pointer that owns that reference.
    pub fn new(inner: T) -> *mut c_void {
        let ptr = Box::into_raw(Box::new(Self {
            vtable: T::VTABLE,
            ref_count: AtomicU32::new(1),
            inner,
        }));
        registry::retain(ptr);
        tracing::debug!(iid = %T::IID, addr = ?ptr, "hosted COM object created");
        ptr as *mut c_void
    }

    /// Creates the object and returns a client wrapper that owns the initial reference.
    #[inline]
    pub fn new_rc<I>(inner: T) -> I
    where
        I: Interface<Vtable = V>,
    {
        let ptr = Self::new(inner);
        // SAFETY: `ptr` is a freshly created COM pointer with refcount 1.
        I::from_rc(unsafe { ComRc::from_raw_unchecked(ptr as *mut I::Raw) })
    }

    #[inline]
    pub fn inner_ref(&self) -> &T {
        &self.inner
    }

    /// Current reference count, for diagnostics.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.ref_count.load(Ordering::Acquire)
    }

    #[inline(always)]
    /// # Safety
    /// `ptr` must be a valid pointer to a `ComObject<T, V>` allocated by this crate.
    /// The pointer must remain valid for the returned lifetime.
    pub unsafe fn from_ptr<'a>(ptr: *mut c_void) -> &'a Self {
        unsafe { &*(ptr as *const Self) }
    }

    #[allow(non_snake_case)]
    /// # Safety
    /// `this` must be a valid COM pointer created by `ComObject` for `T`.
    pub unsafe extern "system" fn shim_add_ref(this: *mut c_void) -> u32 {
        let wrapper = unsafe { Self::from_ptr(this) };
        refcount::add(&wrapper.ref_count)
    }

    #[allow(non_snake_case)]
    /// # Safety
    /// `this` must be a valid COM pointer created by `ComObject` for `T`.
    pub unsafe extern "system" fn shim_release(this: *mut c_void) -> u32 {
        let wrapper = unsafe { Self::from_ptr(this) };
        let count = refcount::sub(&wrapper.ref_count);

        if count == 0 {
            core::sync::atomic::fence(Ordering::Acquire);
            let ptr = this as *mut Self;
            registry::forget(ptr);
            tracing::debug!(iid = %T::IID, addr = ?ptr, "hosted COM object destroyed");
            drop(unsafe { Box::from_raw(ptr) });
        }

        count
    }

    #[allow(non_snake_case)]
    /// # Safety
    /// `this` must be a valid COM pointer created by `ComObject` for `T`.
    pub unsafe extern "system" fn shim_query_interface(
        this: *mut c_void,
        riid: *const GUID,
        ppv: *mut *mut c_void,
    ) -> HRESULT {
        if ppv.is_null() {
            return E_POINTER;
        }
        if riid.is_null() {
            unsafe { *ppv = core::ptr::null_mut() };
            return E_POINTER;
        }

        let wrapper = unsafe { Self::from_ptr(this) };
        let riid = unsafe { &*riid };

        if *riid == IID_IUNKNOWN {
            unsafe { Self::shim_add_ref(this) };
            unsafe { *ppv = this };
            return S_OK;
        }

        if let Some(ptr) = wrapper.inner.query_interface(this, riid) {
            let vtbl = unsafe { *(ptr as *mut *mut IUnknownVtbl) };
            unsafe { ((*vtbl).AddRef)(ptr) };
            unsafe { *ppv = ptr };
            return S_OK;
        }

        unsafe { *ppv = core::ptr::null_mut() };
        E_NOINTERFACE
    }
}
