// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::hresult::{ComResult, HResult};
use crate::iunknown::{IUnknown, IUnknownVtbl, GUID};
use crate::vtable::ComInterfaceInfo;

/// Marker trait for types that are valid COM interfaces.
///
/// # Safety
/// Implementors guarantee that:
/// 1. The type is `Sized` (no fat pointers allowed).
/// 2. The type is `#[repr(C)]` or `#[repr(transparent)]` and has the same memory layout
///    as a COM interface pointer (the first field is a pointer to the vtable).
/// 3. The vtable begins with the `IUnknown` methods.
pub unsafe trait ComInterface: Sized {}

/// Marker trait for COM interfaces that are free-threaded and safe to share.
///
/// # Safety
/// Implementors guarantee that the underlying COM object supports concurrent
/// calls from multiple threads and that reference counting is thread-safe.
pub unsafe trait ThreadSafeComInterface: ComInterface {}

/// Owning COM interface pointer.
///
/// Holds exactly one reference. `release` (or `Drop`) gives it back once and
/// clears the pointer, so a released handle never touches a vtable again.
/// `Clone` goes through `AddRef` and yields a second, independent owner.
///
/// # Thread Safety
/// This type does not implement `Send` or `Sync` by default because many COM
/// interfaces are thread-affine. For free-threaded interfaces, implement
/// [`ThreadSafeComInterface`] and `ComRc` will become `Send + Sync`.
#[repr(transparent)]
pub struct ComRc<T: ComInterface> {
    ptr: Option<NonNull<T>>,
    _phantom: PhantomData<T>,
}

unsafe impl<T: ThreadSafeComInterface> Send for ComRc<T> {}
unsafe impl<T: ThreadSafeComInterface> Sync for ComRc<T> {}

impl<T: ComInterface> ComRc<T> {
    /// An empty handle; releasing it is a no-op.
    #[inline]
    pub const fn null() -> Self {
        Self {
            ptr: None,
            _phantom: PhantomData,
        }
    }

    /// Takes ownership of a raw COM pointer without calling `AddRef`.
    ///
    /// # Safety
    /// `ptr` must be a valid COM interface pointer and the caller must own
    /// the reference it carries (typically because a COM call just returned it).
    pub unsafe fn from_raw(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr: Some(ptr),
            _phantom: PhantomData,
        })
    }

    /// Takes ownership of a non-null raw COM pointer without calling `AddRef`.
    ///
    /// # Safety
    /// `ptr` must be a valid, non-null COM interface pointer.
    pub unsafe fn from_raw_unchecked(ptr: *mut T) -> Self {
        Self {
            ptr: Some(unsafe { NonNull::new_unchecked(ptr) }),
            _phantom: PhantomData,
        }
    }

    /// Takes ownership of a raw COM pointer or returns `E_POINTER` if null.
    ///
    /// # Safety
    /// `ptr` must be a valid COM interface pointer when non-null.
    pub unsafe fn from_raw_or_status(ptr: *mut T) -> ComResult<Self> {
        unsafe { Self::from_raw(ptr) }.ok_or(HResult::POINTER)
    }

    /// Borrows a raw COM pointer by calling `AddRef` first.
    ///
    /// # Safety
    /// `ptr` must be a valid COM interface pointer.
    pub unsafe fn from_raw_addref(ptr: *mut T) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        // SAFETY: caller guarantees `ptr` is a valid COM interface pointer.
        unsafe { add_ref(ptr as *mut c_void) };
        // SAFETY: the reference taken above is handed to the new owner.
        unsafe { Self::from_raw(ptr) }
    }

    /// Returns the interface pointer, or null once released.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.map_or(core::ptr::null_mut(), NonNull::as_ptr)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Gives up ownership without releasing.
    #[inline]
    pub fn into_raw(self) -> *mut T {
        let ptr = self.as_ptr();
        core::mem::forget(self);
        ptr
    }

    /// Calls the native `Release` once and clears the handle.
    ///
    /// Returns the count reported by the object, or `None` when the handle
    /// was already empty; in that case no vtable is touched.
    pub fn release(&mut self) -> Option<u32> {
        let ptr = self.ptr.take()?;
        // SAFETY: a non-null handle owns one reference to a live object.
        Some(unsafe { release(ptr.as_ptr() as *mut c_void) })
    }

    /// Asks the object for `iid`. On success the returned pointer carries its
    /// own reference.
    pub fn query_interface_raw(&self, iid: &GUID) -> ComResult<*mut c_void> {
        let Some(ptr) = self.ptr else {
            return Err(HResult::POINTER);
        };
        let mut out = core::ptr::null_mut();
        let this = ptr.as_ptr() as *mut c_void;
        // SAFETY: the handle is live and its vtable starts with IUnknown.
        let status = unsafe { ((*vtbl_of(this)).QueryInterface)(this, iid, &mut out) };
        HResult::from_raw(status).to_result()?;
        if out.is_null() {
            return Err(HResult::POINTER);
        }
        Ok(out)
    }

    /// Queries for another COM interface and returns a smart pointer on success.
    pub fn query_interface<U>(&self) -> ComResult<ComRc<U>>
    where
        U: ComInterface + ComInterfaceInfo,
    {
        let out = self.query_interface_raw(&U::IID)?;
        // SAFETY: `out` is a new reference for `U::IID`.
        unsafe { ComRc::<U>::from_raw_or_status(out as *mut U) }
    }

    /// Reinterprets the handle as another raw interface type.
    ///
    /// # Safety
    /// The object's vtable must be valid for `U`.
    #[inline]
    pub unsafe fn cast<U: ComInterface>(self) -> ComRc<U> {
        let ptr = self.into_raw();
        ComRc {
            ptr: NonNull::new(ptr as *mut U),
            _phantom: PhantomData,
        }
    }
}

impl<T: ComInterface> Clone for ComRc<T> {
    fn clone(&self) -> Self {
        if let Some(ptr) = self.ptr {
            // SAFETY: the handle is live.
            unsafe { add_ref(ptr.as_ptr() as *mut c_void) };
        }
        Self {
            ptr: self.ptr,
            _phantom: PhantomData,
        }
    }
}

impl<T: ComInterface> Drop for ComRc<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: ComInterface> fmt::Debug for ComRc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComRc").field(&self.as_ptr()).finish()
    }
}

#[inline]
unsafe fn vtbl_of(this: *mut c_void) -> *const IUnknownVtbl {
    unsafe { *(this as *const *const IUnknownVtbl) }
}

unsafe fn add_ref(this: *mut c_void) -> u32 {
    unsafe { ((*vtbl_of(this)).AddRef)(this) }
}

unsafe fn release(this: *mut c_void) -> u32 {
    unsafe { ((*vtbl_of(this)).Release)(this) }
}

/// A typed, method-bearing COM handle.
///
/// Implemented by `IUnknown` and by every wrapper `com_interface!` generates.
///
/// # Safety
/// The implementor must be `#[repr(transparent)]` over `ComRc<Self::Raw>`,
/// and `Self::Vtable` must describe the object's real vtable.
pub unsafe trait Interface: ComInterfaceInfo + Sized {
    type Raw: ComInterface;

    fn from_rc(rc: ComRc<Self::Raw>) -> Self;
    fn as_rc(&self) -> &ComRc<Self::Raw>;
    fn as_rc_mut(&mut self) -> &mut ComRc<Self::Raw>;
    fn into_rc(self) -> ComRc<Self::Raw>;

    #[inline]
    fn null() -> Self {
        Self::from_rc(ComRc::null())
    }

    /// Wraps a pointer returned by a COM call, taking over its reference.
    ///
    /// # Safety
    /// `ptr` must be null or a valid pointer to this interface that the
    /// caller owns one reference to.
    #[inline]
    unsafe fn from_raw(ptr: *mut c_void) -> Option<Self> {
        unsafe { ComRc::from_raw(ptr as *mut Self::Raw) }.map(Self::from_rc)
    }

    /// Wraps a borrowed pointer, adding a reference first.
    ///
    /// # Safety
    /// `ptr` must be null or a valid pointer to this interface.
    #[inline]
    unsafe fn from_raw_addref(ptr: *mut c_void) -> Option<Self> {
        unsafe { ComRc::from_raw_addref(ptr as *mut Self::Raw) }.map(Self::from_rc)
    }

    #[inline]
    fn as_raw(&self) -> *mut c_void {
        self.as_rc().as_ptr() as *mut c_void
    }

    #[inline]
    fn into_raw(self) -> *mut c_void {
        self.into_rc().into_raw() as *mut c_void
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.as_rc().is_null()
    }

    #[inline]
    fn release(&mut self) -> Option<u32> {
        self.as_rc_mut().release()
    }

    /// The object's vtable, or `None` for a released handle.
    #[inline]
    fn vtable(&self) -> Option<&Self::Vtable> {
        let this = self.as_raw();
        if this.is_null() {
            return None;
        }
        // SAFETY: a live handle points at a pointer to `Self::Vtable`.
        unsafe { (*(this as *const *const Self::Vtable)).as_ref() }
    }

    /// Queries for `U`. The result is an independent owner.
    fn query_interface<U: Interface>(&self) -> ComResult<U> {
        let out = self.as_rc().query_interface_raw(&U::IID)?;
        // SAFETY: `out` is a new reference for `U::IID`.
        unsafe { U::from_raw(out) }.ok_or(HResult::POINTER)
    }

    /// Queries for an interface known only by IID.
    fn query_iid(&self, iid: &GUID) -> ComResult<IUnknown> {
        let out = self.as_rc().query_interface_raw(iid)?;
        // SAFETY: every interface begins with IUnknown.
        unsafe { IUnknown::from_raw(out) }.ok_or(HResult::POINTER)
    }

    /// A second owner viewed as `IUnknown` (one `AddRef`).
    #[inline]
    fn to_unknown(&self) -> IUnknown {
        // SAFETY: every interface begins with IUnknown.
        unsafe { IUnknown::from_raw_addref(self.as_raw()) }.unwrap_or_else(IUnknown::null)
    }

    /// Moves this reference into an `IUnknown` handle.
    #[inline]
    fn into_unknown(self) -> IUnknown {
        // SAFETY: every interface begins with IUnknown.
        IUnknown::from_rc(unsafe { self.into_rc().cast() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iunknown::IUnknownRaw;
    use crate::wrapper::ComObject;
    use crate::traits::ComImpl;
    use core::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    static DROP_COUNT: AtomicU32 = AtomicU32::new(0);
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    struct Dummy;

    impl Drop for Dummy {
        fn drop(&mut self) {
            DROP_COUNT.fetch_add(1, Ordering::Relaxed);
        }
    }

    impl ComImpl<IUnknownVtbl> for Dummy {
        const VTABLE: &'static IUnknownVtbl = &IUnknownVtbl::new::<Dummy, IUnknownVtbl>();
        const IID: GUID = crate::IID_IUNKNOWN;
    }

    #[test]
    fn from_raw_addref_balances_release() {
        let _guard = TEST_LOCK.lock().unwrap();
        DROP_COUNT.store(0, Ordering::Relaxed);
        let raw = ComObject::<Dummy, IUnknownVtbl>::new(Dummy);

        let com = unsafe { ComRc::<IUnknownRaw>::from_raw_addref(raw as *mut IUnknownRaw).unwrap() };
        drop(com);

        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 0);

        unsafe {
            assert_eq!(ComObject::<Dummy, IUnknownVtbl>::shim_release(raw), 0);
        }

        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn release_clears_and_is_idempotent() {
        let _guard = TEST_LOCK.lock().unwrap();
        DROP_COUNT.store(0, Ordering::Relaxed);
        let raw = ComObject::<Dummy, IUnknownVtbl>::new(Dummy);

        let mut com = unsafe { ComRc::<IUnknownRaw>::from_raw(raw as *mut IUnknownRaw).unwrap() };
        assert_eq!(com.release(), Some(0));
        assert!(com.is_null());
        assert!(com.as_ptr().is_null());
        assert_eq!(com.release(), None);
        drop(com);

        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn clone_adds_reference() {
        let _guard = TEST_LOCK.lock().unwrap();
        DROP_COUNT.store(0, Ordering::Relaxed);
        let raw = ComObject::<Dummy, IUnknownVtbl>::new(Dummy);

        let com = unsafe { ComRc::<IUnknownRaw>::from_raw(raw as *mut IUnknownRaw).unwrap() };
        let com_clone = com.clone();
        assert_eq!(com.as_ptr(), com_clone.as_ptr());
        drop(com);

        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 0);
        drop(com_clone);
        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn null_handle_queries_fail_without_a_vtable() {
        let com = ComRc::<IUnknownRaw>::null();
        assert_eq!(com.query_interface_raw(&crate::IID_IUNKNOWN), Err(HResult::POINTER));
        let cloned = com.clone();
        assert!(cloned.is_null());
    }

    #[test]
    fn from_raw_or_status_rejects_null() {
        let err = unsafe { ComRc::<IUnknownRaw>::from_raw_or_status(core::ptr::null_mut()) };
        assert!(matches!(err, Err(HResult::POINTER)));
    }
}
