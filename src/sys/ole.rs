// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! COM runtime entry points: apartment setup, activation and the shared
//! allocators (task memory, BSTR, VARIANT).

use core::ffi::c_void;
use core::marker::PhantomData;

use crate::error::{Error, Result};
use crate::hresult::{HResult, E_OUTOFMEMORY, HRESULT};
use crate::iunknown::{CLSID, GUID};
use crate::smart_ptr::Interface;
use crate::sys::dll::Proc;
use crate::variant::Variant;

pub const COINIT_MULTITHREADED: u32 = 0x0;
pub const COINIT_APARTMENTTHREADED: u32 = 0x2;
pub const COINIT_DISABLE_OLE1DDE: u32 = 0x4;

pub const CLSCTX_INPROC_SERVER: u32 = 0x1;
pub const CLSCTX_INPROC_HANDLER: u32 = 0x2;
pub const CLSCTX_LOCAL_SERVER: u32 = 0x4;
pub const CLSCTX_REMOTE_SERVER: u32 = 0x10;
pub const CLSCTX_ALL: u32 =
    CLSCTX_INPROC_SERVER | CLSCTX_INPROC_HANDLER | CLSCTX_LOCAL_SERVER | CLSCTX_REMOTE_SERVER;

pub const RPC_E_CHANGED_MODE: HRESULT = 0x8001_0106u32 as i32;

type CoInitializeExFn = unsafe extern "system" fn(*const c_void, u32) -> HRESULT;
type CoUninitializeFn = unsafe extern "system" fn();
type CoCreateInstanceFn =
    unsafe extern "system" fn(*const GUID, *mut c_void, u32, *const GUID, *mut *mut c_void) -> HRESULT;
type CoTaskMemFreeFn = unsafe extern "system" fn(*const c_void);
type VariantClearFn = unsafe extern "system" fn(*mut Variant) -> HRESULT;
type SysAllocStringLenFn = unsafe extern "system" fn(*const u16, u32) -> *mut u16;
type SysFreeStringFn = unsafe extern "system" fn(*const u16);

static CO_INITIALIZE_EX: Proc<CoInitializeExFn> = Proc::new("ole32.dll", c"CoInitializeEx");
static CO_UNINITIALIZE: Proc<CoUninitializeFn> = Proc::new("ole32.dll", c"CoUninitialize");
static CO_CREATE_INSTANCE: Proc<CoCreateInstanceFn> = Proc::new("ole32.dll", c"CoCreateInstance");
static CO_TASK_MEM_FREE: Proc<CoTaskMemFreeFn> = Proc::new("ole32.dll", c"CoTaskMemFree");
static VARIANT_CLEAR: Proc<VariantClearFn> = Proc::new("oleaut32.dll", c"VariantClear");
static SYS_ALLOC_STRING_LEN: Proc<SysAllocStringLenFn> =
    Proc::new("oleaut32.dll", c"SysAllocStringLen");
static SYS_FREE_STRING: Proc<SysFreeStringFn> = Proc::new("oleaut32.dll", c"SysFreeString");

/// Threading model for `ComGuard`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Apartment {
    /// Single-threaded apartment; required by UI objects such as drop targets.
    #[default]
    SingleThreaded,
    MultiThreaded,
}

impl Apartment {
    const fn coinit(self) -> u32 {
        match self {
            Self::SingleThreaded => COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE,
            Self::MultiThreaded => COINIT_MULTITHREADED | COINIT_DISABLE_OLE1DDE,
        }
    }
}

/// Initializes COM on the current thread and uninitializes it on drop.
///
/// A thread already initialized with the other model keeps working; the
/// guard then leaves `CoUninitialize` to whoever initialized it first.
pub struct ComGuard {
    uninit: bool,
    apartment: Apartment,
    // CoUninitialize must run on the initializing thread.
    _thread_bound: PhantomData<*mut ()>,
}

impl ComGuard {
    pub fn new(apartment: Apartment) -> Result<Self> {
        let co_initialize_ex = CO_INITIALIZE_EX.get()?;
        let hr = HResult(unsafe { co_initialize_ex(core::ptr::null(), apartment.coinit()) });
        let uninit = match hr {
            hr if hr.is_success() => true,
            HResult(RPC_E_CHANGED_MODE) => false,
            hr => return Err(Error::Com(hr)),
        };
        tracing::debug!(?apartment, %hr, uninit, "COM initialized");
        Ok(Self {
            uninit,
            apartment,
            _thread_bound: PhantomData,
        })
    }

    #[inline]
    pub fn apartment(&self) -> Apartment {
        self.apartment
    }

    /// Whether dropping the guard calls `CoUninitialize`.
    #[inline]
    pub fn owns_initialization(&self) -> bool {
        self.uninit
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if !self.uninit {
            return;
        }
        match CO_UNINITIALIZE.get() {
            Ok(co_uninitialize) => {
                unsafe { co_uninitialize() };
                tracing::debug!("COM uninitialized");
            }
            Err(err) => tracing::warn!(error = %err, "CoUninitialize unavailable"),
        }
    }
}

/// Activates `clsid` and asks it for `I` in one call.
pub fn create_instance<I: Interface>(clsid: &CLSID, context: u32) -> Result<I> {
    let co_create_instance = CO_CREATE_INSTANCE.get()?;
    let mut out = core::ptr::null_mut();
    let hr = HResult(unsafe {
        co_create_instance(clsid, core::ptr::null_mut(), context, &I::IID, &mut out)
    });
    if hr.is_error() {
        tracing::debug!(%clsid, iid = %I::IID, %hr, "CoCreateInstance failed");
        return Err(Error::Com(hr));
    }
    unsafe { I::from_raw(out) }.ok_or(Error::Com(HResult::POINTER))
}

/// Frees memory a COM call returned from the task allocator.
///
/// # Safety
/// `ptr` must be null or a task allocation nobody else frees.
pub unsafe fn co_task_mem_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    match CO_TASK_MEM_FREE.get() {
        Ok(free) => unsafe { free(ptr) },
        Err(err) => tracing::warn!(error = %err, "CoTaskMemFree unavailable, leaking"),
    }
}

/// `VariantClear`: releases the payload and sets `VT_EMPTY`.
pub fn variant_clear(value: &mut Variant) -> Result<()> {
    let clear = VARIANT_CLEAR.get()?;
    HResult(unsafe { clear(value.as_mut_ptr()) }).to_result()?;
    Ok(())
}

/// Allocates a BSTR copy of `value`. Interior NULs are kept; BSTRs are
/// length-prefixed.
pub fn sys_alloc_string(value: &str) -> Result<*mut u16> {
    let alloc = SYS_ALLOC_STRING_LEN.get()?;
    let units: Vec<u16> = value.encode_utf16().collect();
    let bstr = unsafe { alloc(units.as_ptr(), units.len() as u32) };
    crate::ensure!(
        !bstr.is_null(),
        Error::Com(HResult(E_OUTOFMEMORY)),
        "SysAllocStringLen failed for {} units",
        units.len()
    );
    Ok(bstr)
}

/// # Safety
/// `bstr` must be null or a BSTR the caller owns.
pub unsafe fn sys_free_string(bstr: *mut u16) {
    if bstr.is_null() {
        return;
    }
    match SYS_FREE_STRING.get() {
        Ok(free) => unsafe { free(bstr) },
        Err(err) => tracing::warn!(error = %err, "SysFreeString unavailable, leaking"),
    }
}
