// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A minimal VARIANT: enough to carry scalars and interface pointers through
//! `IDispatch::Invoke` and to be cleared by a `Releaser`.

use core::ffi::c_void;
use core::fmt;

use crate::interfaces::dispatch::IDispatch;
use crate::iunknown::IUnknown;
use crate::smart_ptr::Interface;

pub type VARTYPE = u16;

pub const VT_EMPTY: VARTYPE = 0;
pub const VT_NULL: VARTYPE = 1;
pub const VT_I2: VARTYPE = 2;
pub const VT_I4: VARTYPE = 3;
pub const VT_R8: VARTYPE = 5;
pub const VT_BSTR: VARTYPE = 8;
pub const VT_DISPATCH: VARTYPE = 9;
pub const VT_ERROR: VARTYPE = 10;
pub const VT_BOOL: VARTYPE = 11;
pub const VT_VARIANT: VARTYPE = 12;
pub const VT_UNKNOWN: VARTYPE = 13;
pub const VT_I8: VARTYPE = 20;
pub const VT_BYREF: VARTYPE = 0x4000;

pub const VARIANT_TRUE: i16 = -1;
pub const VARIANT_FALSE: i16 = 0;

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(non_snake_case)]
union VariantData {
    llVal: i64,
    lVal: i32,
    iVal: i16,
    boolVal: i16,
    dblVal: f64,
    bstrVal: *mut u16,
    punkVal: *mut c_void,
    // BRECORD is two pointers and sets the union's size.
    record: [*mut c_void; 2],
}

/// `VARIANT` with the SDK layout: 16 bytes on 32-bit targets, 24 on 64-bit.
#[repr(C)]
pub struct Variant {
    vt: VARTYPE,
    reserved: [u16; 3],
    data: VariantData,
}

impl Variant {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            vt: VT_EMPTY,
            reserved: [0; 3],
            data: VariantData { record: [core::ptr::null_mut(); 2] },
        }
    }

    #[inline]
    fn with(vt: VARTYPE, data: VariantData) -> Self {
        let mut v = Self::empty();
        v.vt = vt;
        v.data = data;
        v
    }

    pub fn from_i32(value: i32) -> Self {
        Self::with(VT_I4, VariantData { lVal: value })
    }

    pub fn from_i64(value: i64) -> Self {
        Self::with(VT_I8, VariantData { llVal: value })
    }

    pub fn from_f64(value: f64) -> Self {
        Self::with(VT_R8, VariantData { dblVal: value })
    }

    pub fn from_bool(value: bool) -> Self {
        let raw = if value { VARIANT_TRUE } else { VARIANT_FALSE };
        Self::with(VT_BOOL, VariantData { boolVal: raw })
    }

    /// Moves the reference into the variant; clearing it releases the object.
    pub fn from_unknown(value: IUnknown) -> Self {
        Self::with(VT_UNKNOWN, VariantData { punkVal: value.into_raw() })
    }

    pub fn from_dispatch(value: IDispatch) -> Self {
        Self::with(VT_DISPATCH, VariantData { punkVal: value.into_raw() })
    }

    /// Allocates a BSTR holding `value`.
    #[cfg(windows)]
    pub fn from_string(value: &str) -> crate::Result<Self> {
        let bstr = crate::sys::ole::sys_alloc_string(value)?;
        Ok(Self::with(VT_BSTR, VariantData { bstrVal: bstr }))
    }

    #[inline]
    pub fn vt(&self) -> VARTYPE {
        self.vt
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vt == VT_EMPTY
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.vt {
            // SAFETY: the tag says which field is live.
            VT_I4 | VT_ERROR => Some(unsafe { self.data.lVal }),
            VT_I2 => Some(unsafe { self.data.iVal } as i32),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.vt {
            VT_I8 => Some(unsafe { self.data.llVal }),
            _ => self.as_i32().map(i64::from),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.vt {
            VT_R8 => Some(unsafe { self.data.dblVal }),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.vt {
            VT_BOOL => Some(unsafe { self.data.boolVal } != VARIANT_FALSE),
            _ => None,
        }
    }

    /// Reads a `VT_BSTR` payload.
    pub fn as_string(&self) -> Option<String> {
        match self.vt {
            // SAFETY: a VT_BSTR variant holds a BSTR or null.
            VT_BSTR => Some(unsafe { bstr_to_string(self.data.bstrVal) }),
            _ => None,
        }
    }

    /// A new reference to the `VT_UNKNOWN` or `VT_DISPATCH` payload.
    pub fn as_unknown(&self) -> Option<IUnknown> {
        match self.vt {
            // SAFETY: the payload is an interface pointer owned by the variant.
            VT_UNKNOWN | VT_DISPATCH => unsafe { IUnknown::from_raw_addref(self.data.punkVal) },
            _ => None,
        }
    }

    pub fn as_dispatch(&self) -> Option<IDispatch> {
        match self.vt {
            VT_DISPATCH => unsafe { IDispatch::from_raw_addref(self.data.punkVal) },
            _ => None,
        }
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut Variant {
        self
    }

    /// Frees whatever the variant owns and resets it to `VT_EMPTY`.
    pub fn clear(&mut self) {
        if self.vt == VT_EMPTY {
            return;
        }
        #[cfg(windows)]
        {
            match crate::sys::ole::variant_clear(self) {
                Ok(()) => return,
                Err(err) => {
                    tracing::warn!(error = %err, vt = self.vt, "VariantClear failed, clearing in place");
                }
            }
        }
        self.clear_in_place();
    }

    fn clear_in_place(&mut self) {
        if self.vt & VT_BYREF == 0 {
            match self.vt {
                VT_UNKNOWN | VT_DISPATCH => {
                    // SAFETY: the variant owns one reference to the payload.
                    let unknown = unsafe { IUnknown::from_raw(self.data.punkVal) };
                    drop(unknown);
                }
                VT_BSTR => unsafe { free_bstr(self.data.bstrVal) },
                _ => {}
            }
        }
        self.vt = VT_EMPTY;
        self.data = VariantData { record: [core::ptr::null_mut(); 2] };
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for Variant {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Variant");
        d.field("vt", &self.vt);
        if let Some(v) = self.as_i64() {
            d.field("value", &v);
        } else if let Some(v) = self.as_f64() {
            d.field("value", &v);
        } else if let Some(v) = self.as_bool() {
            d.field("value", &v);
        }
        d.finish()
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

/// Decodes a BSTR using its length prefix. Null reads as empty.
///
/// # Safety
/// `bstr` must be null or a valid BSTR.
pub unsafe fn bstr_to_string(bstr: *const u16) -> String {
    if bstr.is_null() {
        return String::new();
    }
    // The byte length sits in the four bytes before the first unit.
    let bytes = unsafe { (bstr as *const u32).sub(1).read_unaligned() } as usize;
    let units = unsafe { core::slice::from_raw_parts(bstr, bytes / 2) };
    String::from_utf16_lossy(units)
}

/// Frees a BSTR handed over by a COM call.
///
/// Host builds never receive system-allocated BSTRs, so there it does nothing.
///
/// # Safety
/// `bstr` must be null or a BSTR the caller owns.
pub unsafe fn free_bstr(bstr: *mut u16) {
    if bstr.is_null() {
        return;
    }
    #[cfg(windows)]
    unsafe {
        crate::sys::ole::sys_free_string(bstr);
    }
}
