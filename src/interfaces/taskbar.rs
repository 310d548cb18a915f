// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Taskbar buttons: tabs, progress, overlays and thumbnail toolbars.
//!
//! `ITaskbarList3` extends `ITaskbarList2` which extends `ITaskbarList`, so a
//! `ITaskbarList3` handle reaches every method through `Deref`.

use core::ffi::c_void;

use crate::error::Result;
use crate::iunknown::{IUnknown, CLSID, GUID};
use crate::types::{BOOL, HICON, HWND, RECT};
use crate::wstr::WideString;

pub const CLSID_TASKBAR_LIST: CLSID = GUID::from_u128(0x56fdf344_fd6d_11d0_958a_006097c9a090);

/// `TBPF_*` progress states.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskbarProgress {
    #[default]
    NoProgress = 0,
    Indeterminate = 0x1,
    Normal = 0x2,
    Error = 0x4,
    Paused = 0x8,
}

pub const THB_BITMAP: u32 = 0x1;
pub const THB_ICON: u32 = 0x2;
pub const THB_TOOLTIP: u32 = 0x4;
pub const THB_FLAGS: u32 = 0x8;

pub const THBF_ENABLED: u32 = 0x0;
pub const THBF_DISABLED: u32 = 0x1;
pub const THBF_DISMISSONCLICK: u32 = 0x2;
pub const THBF_NOBACKGROUND: u32 = 0x4;
pub const THBF_HIDDEN: u32 = 0x8;
pub const THBF_NONINTERACTIVE: u32 = 0x10;

/// One thumbnail toolbar button.
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(non_snake_case)]
pub struct THUMBBUTTON {
    pub dwMask: u32,
    pub iId: u32,
    pub iBitmap: u32,
    pub hIcon: HICON,
    pub szTip: [u16; 260],
    pub dwFlags: u32,
}

impl THUMBBUTTON {
    /// An icon button with an optional tooltip, truncated to fit.
    pub fn with_icon(id: u32, icon: HICON, tip: Option<&str>) -> Result<Self> {
        let mut button = Self {
            dwMask: THB_ICON | THB_FLAGS,
            iId: id,
            iBitmap: 0,
            hIcon: icon,
            szTip: [0; 260],
            dwFlags: THBF_ENABLED,
        };
        if let Some(tip) = tip {
            let wide = WideString::new(tip)?;
            let units = wide.as_utf16();
            let len = units.len().min(button.szTip.len() - 1);
            button.szTip[..len].copy_from_slice(&units[..len]);
            button.dwMask |= THB_TOOLTIP;
        }
        Ok(button)
    }
}

crate::com_interface! {
    pub interface ITaskbarList: IUnknown {
        const IID: GUID = GUID::from_u128(0x56fdf342_fd6d_11d0_958a_006097c9a090);

        fn HrInit(&self) -> HRESULT;
        fn AddTab(&self, hwnd: HWND) -> HRESULT;
        fn DeleteTab(&self, hwnd: HWND) -> HRESULT;
        fn ActivateTab(&self, hwnd: HWND) -> HRESULT;
        fn SetActiveAlt(&self, hwnd: HWND) -> HRESULT;
    }
}

crate::com_interface! {
    pub interface ITaskbarList2: ITaskbarList {
        const IID: GUID = GUID::from_u128(0x602d4995_b13a_429b_a66e_1935e44f4317);

        fn MarkFullscreenWindow(&self, hwnd: HWND, fullscreen: BOOL) -> HRESULT;
    }
}

crate::com_interface! {
    pub interface ITaskbarList3: ITaskbarList2 {
        const IID: GUID = GUID::from_u128(0xea1afb91_9e28_4b86_90e9_9e9f8a5eefaf);

        fn SetProgressValue(&self, hwnd: HWND, completed: u64, total: u64) -> HRESULT;
        fn SetProgressState(&self, hwnd: HWND, flags: i32) -> HRESULT;
        fn RegisterTab(&self, tab: HWND, mdi: HWND) -> HRESULT;
        fn UnregisterTab(&self, tab: HWND) -> HRESULT;
        fn SetTabOrder(&self, tab: HWND, insert_before: HWND) -> HRESULT;
        fn SetTabActive(&self, tab: HWND, mdi: HWND, reserved: u32) -> HRESULT;
        fn ThumbBarAddButtons(&self, hwnd: HWND, count: u32, buttons: *const THUMBBUTTON) -> HRESULT;
        fn ThumbBarUpdateButtons(&self, hwnd: HWND, count: u32, buttons: *const THUMBBUTTON) -> HRESULT;
        fn ThumbBarSetImageList(&self, hwnd: HWND, image_list: *mut c_void) -> HRESULT;
        fn SetOverlayIcon(&self, hwnd: HWND, icon: HICON, description: *const u16) -> HRESULT;
        fn SetThumbnailTooltip(&self, hwnd: HWND, tip: *const u16) -> HRESULT;
        fn SetThumbnailClip(&self, hwnd: HWND, clip: *const RECT) -> HRESULT;
    }
}

impl ITaskbarList {
    /// Must succeed before any other method is called.
    pub fn init(&self) -> Result<()> {
        Ok(unsafe { self.HrInit() }.to_result()?)
    }

    pub fn add_tab(&self, hwnd: HWND) -> Result<()> {
        Ok(unsafe { self.AddTab(hwnd) }.to_result()?)
    }

    pub fn delete_tab(&self, hwnd: HWND) -> Result<()> {
        Ok(unsafe { self.DeleteTab(hwnd) }.to_result()?)
    }

    pub fn activate_tab(&self, hwnd: HWND) -> Result<()> {
        Ok(unsafe { self.ActivateTab(hwnd) }.to_result()?)
    }

    pub fn set_active_alt(&self, hwnd: HWND) -> Result<()> {
        Ok(unsafe { self.SetActiveAlt(hwnd) }.to_result()?)
    }
}

impl ITaskbarList2 {
    pub fn mark_fullscreen(&self, hwnd: HWND, fullscreen: bool) -> Result<()> {
        Ok(unsafe { self.MarkFullscreenWindow(hwnd, fullscreen as BOOL) }.to_result()?)
    }
}

impl ITaskbarList3 {
    /// Shows `completed` out of `total` and switches the button out of
    /// `NoProgress` if needed.
    pub fn set_progress_value(&self, hwnd: HWND, completed: u64, total: u64) -> Result<()> {
        Ok(unsafe { self.SetProgressValue(hwnd, completed, total) }.to_result()?)
    }

    pub fn set_progress_state(&self, hwnd: HWND, state: TaskbarProgress) -> Result<()> {
        Ok(unsafe { self.SetProgressState(hwnd, state as i32) }.to_result()?)
    }

    /// Sets or, with `HICON::NULL`, removes the overlay badge.
    pub fn set_overlay_icon(&self, hwnd: HWND, icon: HICON, description: Option<&str>) -> Result<()> {
        let description = description.map(WideString::new).transpose()?;
        let ptr = description.as_ref().map_or(core::ptr::null(), WideString::as_ptr);
        Ok(unsafe { self.SetOverlayIcon(hwnd, icon, ptr) }.to_result()?)
    }

    pub fn set_thumbnail_tooltip(&self, hwnd: HWND, tip: Option<&str>) -> Result<()> {
        let tip = tip.map(WideString::new).transpose()?;
        let ptr = tip.as_ref().map_or(core::ptr::null(), WideString::as_ptr);
        Ok(unsafe { self.SetThumbnailTooltip(hwnd, ptr) }.to_result()?)
    }

    /// Restricts the thumbnail to `clip`; `None` shows the whole window.
    pub fn set_thumbnail_clip(&self, hwnd: HWND, clip: Option<&RECT>) -> Result<()> {
        let ptr = clip.map_or(core::ptr::null(), |rect| rect as *const RECT);
        Ok(unsafe { self.SetThumbnailClip(hwnd, ptr) }.to_result()?)
    }

    pub fn register_tab(&self, tab: HWND, mdi: HWND) -> Result<()> {
        Ok(unsafe { self.RegisterTab(tab, mdi) }.to_result()?)
    }

    pub fn unregister_tab(&self, tab: HWND) -> Result<()> {
        Ok(unsafe { self.UnregisterTab(tab) }.to_result()?)
    }

    pub fn set_tab_order(&self, tab: HWND, insert_before: HWND) -> Result<()> {
        Ok(unsafe { self.SetTabOrder(tab, insert_before) }.to_result()?)
    }

    pub fn set_tab_active(&self, tab: HWND, mdi: HWND) -> Result<()> {
        Ok(unsafe { self.SetTabActive(tab, mdi, 0) }.to_result()?)
    }

    /// Adds up to seven buttons; the toolbar cannot shrink afterwards.
    pub fn thumb_bar_add_buttons(&self, hwnd: HWND, buttons: &[THUMBBUTTON]) -> Result<()> {
        Ok(unsafe { self.ThumbBarAddButtons(hwnd, buttons.len() as u32, buttons.as_ptr()) }
            .to_result()?)
    }

    pub fn thumb_bar_update_buttons(&self, hwnd: HWND, buttons: &[THUMBBUTTON]) -> Result<()> {
        Ok(unsafe { self.ThumbBarUpdateButtons(hwnd, buttons.len() as u32, buttons.as_ptr()) }
            .to_result()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hresult::{E_INVALIDARG, HRESULT, S_OK};
    use crate::traits::ComImpl;
    use crate::vtable::{ComInterfaceInfo, InterfaceVtable};
    use crate::wrapper::ComObject;
    use crate::{IUnknownVtbl, Interface};
    use std::sync::Mutex;

    /// Records each call as (slot name, first integer argument).
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(&'static str, i64)>>,
    }

    fn recorder(this: *mut c_void) -> &'static Recorder {
        &unsafe { ComObject::<Recorder, ITaskbarList3Vtbl>::from_ptr(this) }.inner
    }

    fn record(this: *mut c_void, name: &'static str, value: i64) -> HRESULT {
        recorder(this).calls.lock().unwrap().push((name, value));
        S_OK
    }

    unsafe extern "system" fn hr_init(this: *mut c_void) -> HRESULT {
        record(this, "HrInit", 0)
    }
    unsafe extern "system" fn tab(this: *mut c_void, _hwnd: HWND) -> HRESULT {
        record(this, "tab", 0)
    }
    unsafe extern "system" fn mark_fullscreen(this: *mut c_void, _hwnd: HWND, on: BOOL) -> HRESULT {
        record(this, "MarkFullscreenWindow", on as i64)
    }
    unsafe extern "system" fn progress_value(this: *mut c_void, _hwnd: HWND, done: u64, _total: u64) -> HRESULT {
        record(this, "SetProgressValue", done as i64)
    }
    unsafe extern "system" fn progress_state(this: *mut c_void, _hwnd: HWND, flags: i32) -> HRESULT {
        record(this, "SetProgressState", flags as i64)
    }
    unsafe extern "system" fn two_tabs(this: *mut c_void, _a: HWND, _b: HWND) -> HRESULT {
        record(this, "two_tabs", 0)
    }
    unsafe extern "system" fn set_tab_active(this: *mut c_void, _a: HWND, _b: HWND, _r: u32) -> HRESULT {
        record(this, "SetTabActive", 0)
    }
    unsafe extern "system" fn buttons(this: *mut c_void, _hwnd: HWND, count: u32, _b: *const THUMBBUTTON) -> HRESULT {
        record(this, "buttons", count as i64)
    }
    unsafe extern "system" fn image_list(_this: *mut c_void, _hwnd: HWND, _l: *mut c_void) -> HRESULT {
        E_INVALIDARG
    }
    unsafe extern "system" fn overlay(this: *mut c_void, _hwnd: HWND, _icon: HICON, text: *const u16) -> HRESULT {
        let len = unsafe { crate::wstr::wide_ptr_as_slice(text) }.len();
        record(this, "SetOverlayIcon", len as i64)
    }
    unsafe extern "system" fn tooltip(this: *mut c_void, _hwnd: HWND, tip: *const u16) -> HRESULT {
        record(this, "SetThumbnailTooltip", tip.is_null() as i64)
    }
    unsafe extern "system" fn clip(this: *mut c_void, _hwnd: HWND, rect: *const RECT) -> HRESULT {
        let width = unsafe { rect.as_ref() }.map_or(-1, |r| r.width());
        record(this, "SetThumbnailClip", width as i64)
    }

    impl ComImpl<ITaskbarList3Vtbl> for Recorder {
        const VTABLE: &'static ITaskbarList3Vtbl = &ITaskbarList3Vtbl {
            parent: ITaskbarList2Vtbl {
                parent: ITaskbarListVtbl {
                    parent: IUnknownVtbl::new::<Recorder, ITaskbarList3Vtbl>(),
                    HrInit: hr_init,
                    AddTab: tab,
                    DeleteTab: tab,
                    ActivateTab: tab,
                    SetActiveAlt: tab,
                },
                MarkFullscreenWindow: mark_fullscreen,
            },
            SetProgressValue: progress_value,
            SetProgressState: progress_state,
            RegisterTab: two_tabs,
            UnregisterTab: tab,
            SetTabOrder: two_tabs,
            SetTabActive: set_tab_active,
            ThumbBarAddButtons: buttons,
            ThumbBarUpdateButtons: buttons,
            ThumbBarSetImageList: image_list,
            SetOverlayIcon: overlay,
            SetThumbnailTooltip: tooltip,
            SetThumbnailClip: clip,
        };
        const IID: GUID = ITaskbarList3::IID;
    }

    fn calls(taskbar: &ITaskbarList3) -> Vec<(&'static str, i64)> {
        recorder(taskbar.as_raw()).calls.lock().unwrap().clone()
    }

    #[test]
    fn inherited_slots_are_reachable_through_deref() {
        let taskbar: ITaskbarList3 = ComObject::<Recorder, ITaskbarList3Vtbl>::new_rc(Recorder::default());
        taskbar.init().unwrap();
        taskbar.mark_fullscreen(HWND::NULL, true).unwrap();
        taskbar.set_progress_state(HWND::NULL, TaskbarProgress::Paused).unwrap();
        taskbar.set_progress_value(HWND::NULL, 30, 100).unwrap();

        assert_eq!(
            calls(&taskbar),
            vec![
                ("HrInit", 0),
                ("MarkFullscreenWindow", 1),
                ("SetProgressState", 8),
                ("SetProgressValue", 30),
            ]
        );
    }

    #[test]
    fn optional_strings_and_rects_pass_null() {
        let taskbar: ITaskbarList3 = ComObject::<Recorder, ITaskbarList3Vtbl>::new_rc(Recorder::default());
        taskbar.set_overlay_icon(HWND::NULL, HICON::NULL, Some("busy")).unwrap();
        taskbar.set_thumbnail_tooltip(HWND::NULL, None).unwrap();
        taskbar.set_thumbnail_clip(HWND::NULL, Some(&RECT::new(0, 0, 64, 32))).unwrap();
        taskbar.set_thumbnail_clip(HWND::NULL, None).unwrap();

        assert_eq!(
            calls(&taskbar),
            vec![
                ("SetOverlayIcon", 4),
                ("SetThumbnailTooltip", 1),
                ("SetThumbnailClip", 64),
                ("SetThumbnailClip", -1),
            ]
        );
    }

    #[test]
    fn failures_surface_as_com_errors() {
        let taskbar: ITaskbarList3 = ComObject::<Recorder, ITaskbarList3Vtbl>::new_rc(Recorder::default());
        let err = unsafe { taskbar.ThumbBarSetImageList(HWND::NULL, core::ptr::null_mut()) };
        assert_eq!(err.0, E_INVALIDARG);
    }

    #[test]
    fn released_handles_return_e_pointer() {
        let mut taskbar: ITaskbarList3 = ComObject::<Recorder, ITaskbarList3Vtbl>::new_rc(Recorder::default());
        assert_eq!(taskbar.release(), Some(0));
        let err = taskbar.set_progress_state(HWND::NULL, TaskbarProgress::Normal).unwrap_err();
        assert_eq!(err.code(), crate::HResult::POINTER);
        let err = taskbar.init().unwrap_err();
        assert_eq!(err.code(), crate::HResult::POINTER);
    }

    #[test]
    fn vtables_grow_by_prefixing() {
        assert_eq!(ITaskbarListVtbl::SLOTS, 8);
        assert_eq!(ITaskbarList2Vtbl::SLOTS, 9);
        assert_eq!(ITaskbarList3Vtbl::SLOTS, 21);
        assert_eq!(core::mem::offset_of!(ITaskbarList3Vtbl, SetProgressValue), 9 * core::mem::size_of::<usize>());
    }

    #[test]
    fn thumb_button_tooltip_is_truncated() {
        let long = "t".repeat(300);
        let button = THUMBBUTTON::with_icon(1, HICON::NULL, Some(&long)).unwrap();
        assert_eq!(button.szTip[258], b't' as u16);
        assert_eq!(button.szTip[259], 0);
        assert_ne!(button.dwMask & THB_TOOLTIP, 0);
    }
}
