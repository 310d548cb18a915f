// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `IDispatch` late-bound automation.
//!
//! Arguments go in left to right; `invoke` reverses them into the
//! right-to-left order `DISPPARAMS` expects. An automation exception becomes
//! [`Error::Dispatch`] carrying the server's `EXCEPINFO`.

use core::ffi::c_void;
use core::fmt;

use crate::error::{Error, Result};
use crate::hresult::{HResult, DISP_E_EXCEPTION, HRESULT};
use crate::iunknown::{IUnknown, GUID};
use crate::types::{DISPID, LCID};
use crate::variant::{bstr_to_string, free_bstr, Variant};
use crate::wstr::WideString;

pub const DISPATCH_METHOD: u16 = 0x1;
pub const DISPATCH_PROPERTYGET: u16 = 0x2;
pub const DISPATCH_PROPERTYPUT: u16 = 0x4;
pub const DISPATCH_PROPERTYPUTREF: u16 = 0x8;

pub const DISPID_UNKNOWN: DISPID = -1;
pub const DISPID_VALUE: DISPID = 0;
pub const DISPID_PROPERTYPUT: DISPID = -3;

pub const LOCALE_SYSTEM_DEFAULT: LCID = 0x0800;
pub const LOCALE_USER_DEFAULT: LCID = 0x0400;

#[repr(C)]
#[allow(non_snake_case)]
pub struct DISPPARAMS {
    pub rgvarg: *mut Variant,
    pub rgdispidNamedArgs: *mut DISPID,
    pub cArgs: u32,
    pub cNamedArgs: u32,
}

#[repr(C)]
#[allow(non_snake_case)]
pub struct EXCEPINFO {
    pub wCode: u16,
    pub wReserved: u16,
    pub bstrSource: *mut u16,
    pub bstrDescription: *mut u16,
    pub bstrHelpFile: *mut u16,
    pub dwHelpContext: u32,
    pub pvReserved: *mut c_void,
    pub pfnDeferredFillIn: Option<unsafe extern "system" fn(*mut EXCEPINFO) -> HRESULT>,
    pub scode: HRESULT,
}

impl Default for EXCEPINFO {
    fn default() -> Self {
        Self {
            wCode: 0,
            wReserved: 0,
            bstrSource: core::ptr::null_mut(),
            bstrDescription: core::ptr::null_mut(),
            bstrHelpFile: core::ptr::null_mut(),
            dwHelpContext: 0,
            pvReserved: core::ptr::null_mut(),
            pfnDeferredFillIn: None,
            scode: 0,
        }
    }
}

/// An automation exception, copied out of `EXCEPINFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub wcode: u16,
    pub scode: HResult,
    pub source: String,
    pub description: String,
    pub help_file: String,
    pub help_context: u32,
}

impl ExceptionInfo {
    /// Runs the deferred fill-in if present, copies the strings out and
    /// frees the BSTRs the server allocated.
    ///
    /// # Safety
    /// `raw` must have been filled by a server's `Invoke`; its BSTR fields
    /// are null or owned by the caller.
    pub unsafe fn take(raw: &mut EXCEPINFO) -> Self {
        if let Some(fill_in) = raw.pfnDeferredFillIn.take() {
            unsafe { fill_in(raw) };
        }
        let read = |field: &mut *mut u16| {
            let bstr = core::mem::replace(field, core::ptr::null_mut());
            let text = unsafe { bstr_to_string(bstr) };
            unsafe { free_bstr(bstr) };
            text
        };
        Self {
            wcode: raw.wCode,
            scode: HResult(raw.scode),
            source: read(&mut raw.bstrSource),
            description: read(&mut raw.bstrDescription),
            help_file: read(&mut raw.bstrHelpFile),
            help_context: raw.dwHelpContext,
        }
    }

    /// The failing code: `scode` when the server set one, `DISP_E_EXCEPTION`
    /// when it only filled `wCode`.
    pub fn code(&self) -> HResult {
        if self.scode.is_error() {
            self.scode
        } else {
            HResult(DISP_E_EXCEPTION)
        }
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        if !self.source.is_empty() {
            write!(f, " ({})", self.source)?;
        }
        Ok(())
    }
}

crate::com_interface! {
    /// Late-bound automation access to a COM object.
    pub interface IDispatch: IUnknown {
        const IID: GUID = GUID::from_u128(0x00020400_0000_0000_c000_000000000046);

        fn GetTypeInfoCount(&self, pctinfo: *mut u32) -> HRESULT;
        fn GetTypeInfo(&self, itinfo: u32, lcid: LCID, pptinfo: *mut *mut c_void) -> HRESULT;
        fn GetIDsOfNames(
            &self,
            riid: *const GUID,
            names: *const *const u16,
            count: u32,
            lcid: LCID,
            dispids: *mut DISPID
        ) -> HRESULT;
        fn Invoke(
            &self,
            dispid: DISPID,
            riid: *const GUID,
            lcid: LCID,
            flags: u16,
            params: *mut DISPPARAMS,
            result: *mut Variant,
            excepinfo: *mut EXCEPINFO,
            arg_err: *mut u32
        ) -> HRESULT;
    }
}

impl IDispatch {
    /// 0 or 1: whether the object offers type information.
    pub fn type_info_count(&self) -> Result<u32> {
        let mut count = 0;
        unsafe { self.GetTypeInfoCount(&mut count) }.to_result()?;
        Ok(count)
    }

    /// Resolves a member name to its DISPID.
    pub fn id_of_name(&self, name: &str) -> Result<DISPID> {
        let wide = WideString::new(name)?;
        let names = [wide.as_ptr()];
        let mut id = DISPID_UNKNOWN;
        unsafe {
            self.GetIDsOfNames(&GUID::NULL, names.as_ptr(), 1, LOCALE_USER_DEFAULT, &mut id)
        }
        .to_result()?;
        Ok(id)
    }

    /// Calls `Invoke` with positional `args` given left to right.
    ///
    /// Property puts pass the value as the single named `DISPID_PROPERTYPUT`
    /// argument, as automation servers require.
    pub fn invoke(&self, dispid: DISPID, flags: u16, mut args: Vec<Variant>) -> Result<Variant> {
        args.reverse();
        let mut put_id = DISPID_PROPERTYPUT;
        let mut params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                core::ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: core::ptr::null_mut(),
            cArgs: args.len() as u32,
            cNamedArgs: 0,
        };
        if flags & (DISPATCH_PROPERTYPUT | DISPATCH_PROPERTYPUTREF) != 0 {
            params.rgdispidNamedArgs = &mut put_id;
            params.cNamedArgs = 1;
        }

        let mut result = Variant::empty();
        let mut excep = EXCEPINFO::default();
        let mut arg_err = 0u32;
        let hr = unsafe {
            self.Invoke(
                dispid,
                &GUID::NULL,
                LOCALE_USER_DEFAULT,
                flags,
                &mut params,
                result.as_mut_ptr(),
                &mut excep,
                &mut arg_err,
            )
        };

        if hr.0 == DISP_E_EXCEPTION {
            let info = unsafe { ExceptionInfo::take(&mut excep) };
            tracing::debug!(dispid, code = %info.code(), "automation exception");
            return Err(Error::Dispatch(Box::new(info)));
        }
        hr.to_result()?;
        Ok(result)
    }

    pub fn get_property(&self, name: &str) -> Result<Variant> {
        let id = self.id_of_name(name)?;
        self.invoke(id, DISPATCH_PROPERTYGET, Vec::new())
    }

    pub fn put_property(&self, name: &str, value: Variant) -> Result<()> {
        let id = self.id_of_name(name)?;
        self.invoke(id, DISPATCH_PROPERTYPUT, vec![value]).map(drop)
    }

    pub fn call_method(&self, name: &str, args: Vec<Variant>) -> Result<Variant> {
        let id = self.id_of_name(name)?;
        self.invoke(id, DISPATCH_METHOD, args)
    }
}
