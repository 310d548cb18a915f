// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;

use crate::error::{Error, Result};
use crate::hresult::{HResult, HRESULT};
use crate::interfaces::shell::IShellItem;
use crate::interfaces::taskbar::{ITaskbarList3, CLSID_TASKBAR_LIST};
use crate::iunknown::GUID;
use crate::smart_ptr::Interface;
use crate::sys::dll::Proc;
use crate::sys::ole::{create_instance, CLSCTX_INPROC_SERVER};
use crate::vtable::ComInterfaceInfo;
use crate::wstr::WideString;

type ShCreateItemFromParsingNameFn =
    unsafe extern "system" fn(*const u16, *mut c_void, *const GUID, *mut *mut c_void) -> HRESULT;

static SH_CREATE_ITEM_FROM_PARSING_NAME: Proc<ShCreateItemFromParsingNameFn> =
    Proc::new("shell32.dll", c"SHCreateItemFromParsingName");

/// Resolves a parsing name (a file system path or `::{CLSID}` form) to a
/// Shell item.
pub fn create_item_from_parsing_name(path: &str) -> Result<IShellItem> {
    let create = SH_CREATE_ITEM_FROM_PARSING_NAME.get()?;
    let wide = WideString::new(path)?;
    let mut out = core::ptr::null_mut();
    let hr = HResult(unsafe {
        create(wide.as_ptr(), core::ptr::null_mut(), &IShellItem::IID, &mut out)
    });
    if hr.is_error() {
        tracing::debug!(path, %hr, "SHCreateItemFromParsingName failed");
        return Err(Error::Com(hr));
    }
    unsafe { IShellItem::from_raw(out) }.ok_or(Error::Com(HResult::POINTER))
}

/// Creates the taskbar object and runs `HrInit` on it.
pub fn taskbar_list() -> Result<ITaskbarList3> {
    let taskbar: ITaskbarList3 = create_instance(&CLSID_TASKBAR_LIST, CLSCTX_INPROC_SERVER)?;
    taskbar.init()?;
    Ok(taskbar)
}
