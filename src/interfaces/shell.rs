// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::ffi::c_void;

use crate::error::{Error, Result};
use crate::hresult::HResult;
use crate::iunknown::{IUnknown, GUID};
use crate::smart_ptr::Interface;
use crate::wstr;

pub type SIGDN = i32;

pub const SIGDN_NORMALDISPLAY: SIGDN = 0;
pub const SIGDN_PARENTRELATIVEPARSING: SIGDN = 0x8001_8001u32 as i32;
pub const SIGDN_DESKTOPABSOLUTEPARSING: SIGDN = 0x8002_8000u32 as i32;
pub const SIGDN_PARENTRELATIVEEDITING: SIGDN = 0x8003_1001u32 as i32;
pub const SIGDN_DESKTOPABSOLUTEEDITING: SIGDN = 0x8004_c000u32 as i32;
pub const SIGDN_FILESYSPATH: SIGDN = 0x8005_8000u32 as i32;
pub const SIGDN_URL: SIGDN = 0x8006_8000u32 as i32;
pub const SIGDN_PARENTRELATIVEFORADDRESSBAR: SIGDN = 0x8007_c001u32 as i32;
pub const SIGDN_PARENTRELATIVE: SIGDN = 0x8008_0001u32 as i32;
pub const SIGDN_PARENTRELATIVEFORUI: SIGDN = 0x8009_4001u32 as i32;

pub const SICHINT_DISPLAY: u32 = 0;
pub const SICHINT_CANONICAL: u32 = 0x1000_0000;
pub const SICHINT_TEST_FILESYSPATH_IF_NOT_EQUAL: u32 = 0x2000_0000;
pub const SICHINT_ALLFIELDS: u32 = 0x8000_0000;

pub const SFGAO_CANCOPY: u32 = 0x1;
pub const SFGAO_LINK: u32 = 0x1_0000;
pub const SFGAO_READONLY: u32 = 0x4_0000;
pub const SFGAO_HIDDEN: u32 = 0x8_0000;
pub const SFGAO_STREAM: u32 = 0x40_0000;
pub const SFGAO_FOLDER: u32 = 0x2000_0000;
pub const SFGAO_FILESYSTEM: u32 = 0x4000_0000;
pub const SFGAO_HASSUBFOLDER: u32 = 0x8000_0000;

pub const BHID_SF_OBJECT: GUID = GUID::from_u128(0x3981e224_f559_11d3_8e3a_00c04f6837d5);
pub const BHID_STREAM: GUID = GUID::from_u128(0x1cebb3ab_7c10_499a_a417_92ca16c4cb83);

crate::com_interface! {
    /// A Shell namespace item (file, folder, virtual object).
    pub interface IShellItem: IUnknown {
        const IID: GUID = GUID::from_u128(0x43826d1e_e718_42ee_bc55_a1e261c37bfe);

        fn BindToHandler(
            &self,
            bind_ctx: *mut c_void,
            bhid: *const GUID,
            riid: *const GUID,
            ppv: *mut *mut c_void
        ) -> HRESULT;
        fn GetParent(&self, parent: *mut *mut c_void) -> HRESULT;
        fn GetDisplayName(&self, sigdn: SIGDN, name: *mut *mut u16) -> HRESULT;
        fn GetAttributes(&self, mask: u32, attributes: *mut u32) -> HRESULT;
        fn Compare(&self, other: *mut c_void, hint: u32, order: *mut i32) -> HRESULT;
    }
}

impl IShellItem {
    /// Binds to a handler such as `BHID_SF_OBJECT` and returns it as `I`.
    pub fn bind_to_handler<I: Interface>(&self, bhid: &GUID) -> Result<I> {
        let mut out = core::ptr::null_mut();
        unsafe { self.BindToHandler(core::ptr::null_mut(), bhid, &I::IID, &mut out) }
            .to_result()?;
        unsafe { I::from_raw(out) }.ok_or(Error::Com(HResult::POINTER))
    }

    /// The item's parent; the desktop has none and reports `S_FALSE`.
    pub fn parent(&self) -> Result<Option<IShellItem>> {
        let mut out = core::ptr::null_mut();
        unsafe { self.GetParent(&mut out) }.to_result()?;
        Ok(unsafe { IShellItem::from_raw(out) })
    }

    pub fn display_name(&self, sigdn: SIGDN) -> Result<String> {
        let mut name = core::ptr::null_mut();
        unsafe { self.GetDisplayName(sigdn, &mut name) }.to_result()?;
        let text = unsafe { wstr::from_wide_ptr(name) };
        unsafe { free_task_string(name) };
        Ok(text?)
    }

    /// The subset of `mask` that applies to this item.
    pub fn attributes(&self, mask: u32) -> Result<u32> {
        let mut attributes = 0;
        unsafe { self.GetAttributes(mask, &mut attributes) }.to_result()?;
        Ok(attributes & mask)
    }

    /// Orders this item against `other` using an `SICHINT_*` hint.
    pub fn compare(&self, other: &IShellItem, hint: u32) -> Result<Ordering> {
        let mut order = 0;
        unsafe { self.Compare(other.as_raw(), hint, &mut order) }.to_result()?;
        Ok(order.cmp(&0))
    }
}

/// Frees a string the shell allocated with `CoTaskMemAlloc`.
///
/// On hosts other than Windows only test doubles hand out strings and they
/// own their storage.
unsafe fn free_task_string(ptr: *mut u16) {
    if ptr.is_null() {
        return;
    }
    #[cfg(windows)]
    unsafe {
        crate::sys::ole::co_task_mem_free(ptr as *mut c_void)
    };
}
