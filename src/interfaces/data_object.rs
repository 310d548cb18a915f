// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `IDataObject`, declared with its full slot list but used opaquely: drop
//! targets receive one and can ask which formats it carries.

use core::ffi::c_void;

use crate::hresult::S_OK;
use crate::iunknown::{IUnknown, GUID};
use crate::types::BOOL;

pub const CF_TEXT: u16 = 1;
pub const CF_BITMAP: u16 = 2;
pub const CF_UNICODETEXT: u16 = 13;
pub const CF_HDROP: u16 = 15;

pub const DVASPECT_CONTENT: u32 = 1;

pub const TYMED_HGLOBAL: u32 = 1;
pub const TYMED_FILE: u32 = 2;
pub const TYMED_ISTREAM: u32 = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct FORMATETC {
    pub cfFormat: u16,
    pub ptd: *mut c_void,
    pub dwAspect: u32,
    pub lindex: i32,
    pub tymed: u32,
}

impl FORMATETC {
    /// Whole-content format on any of the `tymed` media.
    pub const fn new(format: u16, tymed: u32) -> Self {
        Self {
            cfFormat: format,
            ptd: core::ptr::null_mut(),
            dwAspect: DVASPECT_CONTENT,
            lindex: -1,
            tymed,
        }
    }
}

crate::com_interface! {
    pub interface IDataObject: IUnknown {
        const IID: GUID = GUID::from_u128(0x0000010e_0000_0000_c000_000000000046);

        fn GetData(&self, format: *const FORMATETC, medium: *mut c_void) -> HRESULT;
        fn GetDataHere(&self, format: *const FORMATETC, medium: *mut c_void) -> HRESULT;
        fn QueryGetData(&self, format: *const FORMATETC) -> HRESULT;
        fn GetCanonicalFormatEtc(&self, format_in: *const FORMATETC, format_out: *mut FORMATETC) -> HRESULT;
        fn SetData(&self, format: *const FORMATETC, medium: *mut c_void, release: BOOL) -> HRESULT;
        fn EnumFormatEtc(&self, direction: u32, enumerator: *mut *mut c_void) -> HRESULT;
        fn DAdvise(&self, format: *const FORMATETC, advf: u32, sink: *mut c_void, connection: *mut u32) -> HRESULT;
        fn DUnadvise(&self, connection: u32) -> HRESULT;
        fn EnumDAdvise(&self, enumerator: *mut *mut c_void) -> HRESULT;
    }
}

impl IDataObject {
    /// Whether `GetData` would succeed for `format`. Only `S_OK` counts;
    /// `S_FALSE` and errors both mean no.
    pub fn has_format(&self, format: &FORMATETC) -> bool {
        unsafe { self.QueryGetData(format) }.0 == S_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vtable::InterfaceVtable;

    #[test]
    fn vtable_has_twelve_slots() {
        assert_eq!(IDataObjectVtbl::SLOTS, 12);
    }

    #[test]
    fn released_data_objects_report_no_formats() {
        use crate::Interface;
        let data = IDataObject::null();
        assert!(!data.has_format(&FORMATETC::new(CF_HDROP, TYMED_HGLOBAL)));
    }
}
