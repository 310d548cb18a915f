// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::{c_void, CStr};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicPtr, Ordering};

use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

use crate::error::Result;
use crate::sys::error::last_error;
use crate::wstr::WideString;

/// A system DLL export resolved by name on first use.
///
/// `F` is the export's `unsafe extern "system" fn` type. The module stays
/// loaded for the life of the process once resolved.
pub struct Proc<F> {
    dll: &'static str,
    name: &'static CStr,
    cache: AtomicPtr<c_void>,
    _signature: PhantomData<F>,
}

impl<F: Copy> Proc<F> {
    pub const fn new(dll: &'static str, name: &'static CStr) -> Self {
        Self {
            dll,
            name,
            cache: AtomicPtr::new(core::ptr::null_mut()),
            _signature: PhantomData,
        }
    }

    /// The export's address, loading the DLL if needed.
    pub fn get(&self) -> Result<F> {
        const { assert!(core::mem::size_of::<F>() == core::mem::size_of::<*mut c_void>()) };

        let mut ptr = self.cache.load(Ordering::Acquire);
        if ptr.is_null() {
            ptr = self.resolve()?;
            self.cache.store(ptr, Ordering::Release);
        }
        // SAFETY: `F` is a function pointer type matching the export.
        Ok(unsafe { core::mem::transmute_copy::<*mut c_void, F>(&ptr) })
    }

    fn resolve(&self) -> Result<*mut c_void> {
        let dll = WideString::new(self.dll)?;
        let module = unsafe { LoadLibraryW(dll.as_ptr()) };
        if module.is_null() {
            return Err(last_error("LoadLibraryW"));
        }
        let Some(export) = (unsafe { GetProcAddress(module, self.name.as_ptr() as *const u8) }) else {
            return Err(last_error("GetProcAddress"));
        };
        tracing::trace!(dll = self.dll, name = ?self.name, "resolved export");
        Ok(export as *mut c_void)
    }
}
