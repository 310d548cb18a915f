// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An `IFileDialogEvents` sink backed by closures, for `IFileDialog::Advise`.
//!
//! The dialog is handed to each callback as `IUnknown`; query it for the
//! dialog interface you need.

use core::ffi::c_void;

use crate::hresult::{ComResult, IntoHResult, E_INVALIDARG, E_NOTIMPL, HRESULT, S_FALSE, S_OK};
use crate::interfaces::shell::IShellItem;
use crate::iunknown::{IUnknown, IUnknownVtbl, GUID};
use crate::smart_ptr::Interface;
use crate::traits::ComImpl;
use crate::vtable::ComInterfaceInfo;
use crate::wrapper::ComObject;

/// Answer to a share violation or an overwrite prompt
/// (`FDE_SHAREVIOLATION_RESPONSE`, `FDE_OVERWRITE_RESPONSE`).
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FdeResponse {
    /// Let the dialog apply its usual behaviour.
    #[default]
    Default = 0,
    Accept = 1,
    Refuse = 2,
}

crate::com_interface! {
    pub interface IFileDialogEvents: IUnknown {
        const IID: GUID = GUID::from_u128(0x973510db_7d7f_452b_8975_74a85828d354);

        fn OnFileOk(&self, dialog: *mut c_void) -> HRESULT;
        fn OnFolderChanging(&self, dialog: *mut c_void, folder: *mut c_void) -> HRESULT;
        fn OnFolderChange(&self, dialog: *mut c_void) -> HRESULT;
        fn OnSelectionChange(&self, dialog: *mut c_void) -> HRESULT;
        fn OnShareViolation(&self, dialog: *mut c_void, item: *mut c_void, response: *mut i32) -> HRESULT;
        fn OnTypeChange(&self, dialog: *mut c_void) -> HRESULT;
        fn OnOverwrite(&self, dialog: *mut c_void, item: *mut c_void, response: *mut i32) -> HRESULT;
    }
}

type FileOkFn = dyn Fn(&IUnknown) -> bool + Send + Sync;
type DialogFn = dyn Fn(&IUnknown) -> ComResult + Send + Sync;
type ItemFn = dyn Fn(&IUnknown, Option<&IShellItem>) -> ComResult + Send + Sync;
type ResponseFn = dyn Fn(&IUnknown, Option<&IShellItem>) -> FdeResponse + Send + Sync;

/// Closure-backed dialog event sink.
///
/// Unset notifications return `S_OK`. Unset share-violation and overwrite
/// handlers return `E_NOTIMPL` so the dialog falls back to its own prompt.
#[derive(Default)]
pub struct FileDialogEvents {
    file_ok: Option<Box<FileOkFn>>,
    folder_changing: Option<Box<ItemFn>>,
    folder_change: Option<Box<DialogFn>>,
    selection_change: Option<Box<DialogFn>>,
    share_violation: Option<Box<ResponseFn>>,
    type_change: Option<Box<DialogFn>>,
    overwrite: Option<Box<ResponseFn>>,
}

impl FileDialogEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `false` to keep the dialog open.
    pub fn on_file_ok<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown) -> bool + Send + Sync + 'static,
    {
        self.file_ok = Some(Box::new(f));
        self
    }

    /// Return an error to stop the navigation.
    pub fn on_folder_changing<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown, Option<&IShellItem>) -> ComResult + Send + Sync + 'static,
    {
        self.folder_changing = Some(Box::new(f));
        self
    }

    pub fn on_folder_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown) -> ComResult + Send + Sync + 'static,
    {
        self.folder_change = Some(Box::new(f));
        self
    }

    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown) -> ComResult + Send + Sync + 'static,
    {
        self.selection_change = Some(Box::new(f));
        self
    }

    pub fn on_share_violation<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown, Option<&IShellItem>) -> FdeResponse + Send + Sync + 'static,
    {
        self.share_violation = Some(Box::new(f));
        self
    }

    pub fn on_type_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown) -> ComResult + Send + Sync + 'static,
    {
        self.type_change = Some(Box::new(f));
        self
    }

    pub fn on_overwrite<F>(mut self, f: F) -> Self
    where
        F: Fn(&IUnknown, Option<&IShellItem>) -> FdeResponse + Send + Sync + 'static,
    {
        self.overwrite = Some(Box::new(f));
        self
    }

    pub fn into_com(self) -> IFileDialogEvents {
        ComObject::<Self, IFileDialogEventsVtbl>::new_rc(self)
    }

    unsafe fn from_this<'a>(this: *mut c_void) -> &'a Self {
        unsafe { &ComObject::<Self, IFileDialogEventsVtbl>::from_ptr(this).inner }
    }

    /// Runs `f` with the dialog borrowed as `IUnknown`; a null dialog is
    /// `E_INVALIDARG`.
    unsafe fn with_dialog(dialog: *mut c_void, f: impl FnOnce(&IUnknown) -> HRESULT) -> HRESULT {
        match unsafe { IUnknown::from_raw_addref(dialog) } {
            Some(dialog) => f(&dialog),
            None => E_INVALIDARG,
        }
    }

    unsafe fn notify(callback: Option<&DialogFn>, dialog: *mut c_void) -> HRESULT {
        let Some(callback) = callback else {
            return S_OK;
        };
        unsafe { Self::with_dialog(dialog, |dialog| callback(dialog).into_hresult()) }
    }

    unsafe fn respond(
        callback: Option<&ResponseFn>,
        dialog: *mut c_void,
        item: *mut c_void,
        response: *mut i32,
    ) -> HRESULT {
        let Some(callback) = callback else {
            return E_NOTIMPL;
        };
        let Some(response) = (unsafe { response.as_mut() }) else {
            return E_INVALIDARG;
        };
        let item = unsafe { IShellItem::from_raw_addref(item) };
        unsafe {
            Self::with_dialog(dialog, |dialog| {
                *response = callback(dialog, item.as_ref()) as i32;
                S_OK
            })
        }
    }

    unsafe extern "system" fn file_ok(this: *mut c_void, dialog: *mut c_void) -> HRESULT {
        tracing::trace!("OnFileOk");
        let sink = unsafe { Self::from_this(this) };
        let Some(callback) = sink.file_ok.as_deref() else {
            return S_OK;
        };
        unsafe { Self::with_dialog(dialog, |dialog| if callback(dialog) { S_OK } else { S_FALSE }) }
    }

    unsafe extern "system" fn folder_changing(
        this: *mut c_void,
        dialog: *mut c_void,
        folder: *mut c_void,
    ) -> HRESULT {
        let sink = unsafe { Self::from_this(this) };
        let Some(callback) = sink.folder_changing.as_deref() else {
            return S_OK;
        };
        let folder = unsafe { IShellItem::from_raw_addref(folder) };
        unsafe { Self::with_dialog(dialog, |dialog| callback(dialog, folder.as_ref()).into_hresult()) }
    }

    unsafe extern "system" fn folder_change(this: *mut c_void, dialog: *mut c_void) -> HRESULT {
        let sink = unsafe { Self::from_this(this) };
        unsafe { Self::notify(sink.folder_change.as_deref(), dialog) }
    }

    unsafe extern "system" fn selection_change(this: *mut c_void, dialog: *mut c_void) -> HRESULT {
        let sink = unsafe { Self::from_this(this) };
        unsafe { Self::notify(sink.selection_change.as_deref(), dialog) }
    }

    unsafe extern "system" fn share_violation(
        this: *mut c_void,
        dialog: *mut c_void,
        item: *mut c_void,
        response: *mut i32,
    ) -> HRESULT {
        tracing::trace!("OnShareViolation");
        let sink = unsafe { Self::from_this(this) };
        unsafe { Self::respond(sink.share_violation.as_deref(), dialog, item, response) }
    }

    unsafe extern "system" fn type_change(this: *mut c_void, dialog: *mut c_void) -> HRESULT {
        let sink = unsafe { Self::from_this(this) };
        unsafe { Self::notify(sink.type_change.as_deref(), dialog) }
    }

    unsafe extern "system" fn overwrite(
        this: *mut c_void,
        dialog: *mut c_void,
        item: *mut c_void,
        response: *mut i32,
    ) -> HRESULT {
        tracing::trace!("OnOverwrite");
        let sink = unsafe { Self::from_this(this) };
        unsafe { Self::respond(sink.overwrite.as_deref(), dialog, item, response) }
    }
}

impl ComImpl<IFileDialogEventsVtbl> for FileDialogEvents {
    const VTABLE: &'static IFileDialogEventsVtbl = &IFileDialogEventsVtbl {
        parent: IUnknownVtbl::new::<FileDialogEvents, IFileDialogEventsVtbl>(),
        OnFileOk: FileDialogEvents::file_ok,
        OnFolderChanging: FileDialogEvents::folder_changing,
        OnFolderChange: FileDialogEvents::folder_change,
        OnSelectionChange: FileDialogEvents::selection_change,
        OnShareViolation: FileDialogEvents::share_violation,
        OnTypeChange: FileDialogEvents::type_change,
        OnOverwrite: FileDialogEvents::overwrite,
    };
    const IID: GUID = <IFileDialogEvents as ComInterfaceInfo>::IID;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hresult::HResult;
    use crate::vtable::InterfaceVtable;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FakeDialog;

    impl ComImpl<IUnknownVtbl> for FakeDialog {
        const VTABLE: &'static IUnknownVtbl = &IUnknownVtbl::new::<FakeDialog, IUnknownVtbl>();
        const IID: GUID = GUID::from_u128(0x42f85136_db7e_439c_85f1_e4075d135fc8);
    }

    fn dialog() -> IUnknown {
        ComObject::<FakeDialog, IUnknownVtbl>::new_rc(FakeDialog)
    }

    #[test]
    fn defaults_accept_notifications_and_decline_prompts() {
        let sink = FileDialogEvents::new().into_com();
        let dlg = dialog();
        let mut response = -1;

        unsafe {
            assert_eq!(sink.OnFileOk(dlg.as_raw()), HResult::OK);
            assert_eq!(sink.OnFolderChange(dlg.as_raw()), HResult::OK);
            assert_eq!(sink.OnSelectionChange(dlg.as_raw()), HResult::OK);
            assert_eq!(sink.OnTypeChange(dlg.as_raw()), HResult::OK);
            assert_eq!(
                sink.OnFolderChanging(dlg.as_raw(), core::ptr::null_mut()),
                HResult::OK
            );
            assert_eq!(
                sink.OnShareViolation(dlg.as_raw(), core::ptr::null_mut(), &mut response),
                HResult::NOTIMPL
            );
            assert_eq!(
                sink.OnOverwrite(dlg.as_raw(), core::ptr::null_mut(), &mut response),
                HResult::NOTIMPL
            );
        }
        assert_eq!(response, -1);
    }

    #[test]
    fn file_ok_false_keeps_the_dialog_open() {
        let sink = FileDialogEvents::new().on_file_ok(|_dialog| false).into_com();
        let dlg = dialog();
        assert_eq!(unsafe { sink.OnFileOk(dlg.as_raw()) }, HResult::FALSE);
    }

    #[test]
    fn overwrite_response_is_written_back() {
        let sink = FileDialogEvents::new()
            .on_overwrite(|_dialog, item| {
                assert!(item.is_none());
                FdeResponse::Refuse
            })
            .into_com();
        let dlg = dialog();
        let mut response = 0;
        let hr = unsafe { sink.OnOverwrite(dlg.as_raw(), core::ptr::null_mut(), &mut response) };
        assert_eq!(hr, HResult::OK);
        assert_eq!(response, FdeResponse::Refuse as i32);
    }

    #[test]
    fn callbacks_borrow_the_dialog_without_leaking_references() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let sink = FileDialogEvents::new()
            .on_selection_change(move |dialog| {
                assert!(!dialog.is_null());
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .on_type_change(|_dialog| Err(HResult::FAIL))
            .into_com();
        let mut dlg = dialog();

        unsafe {
            assert_eq!(sink.OnSelectionChange(dlg.as_raw()), HResult::OK);
            assert_eq!(sink.OnSelectionChange(dlg.as_raw()), HResult::OK);
            assert_eq!(sink.OnTypeChange(dlg.as_raw()), HResult::FAIL);
            assert_eq!(sink.OnSelectionChange(core::ptr::null_mut()).0, E_INVALIDARG);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Only the test's own reference is left.
        assert_eq!(dlg.release(), Some(0));
    }

    #[test]
    fn vtable_has_ten_slots() {
        assert_eq!(IFileDialogEventsVtbl::SLOTS, 10);
    }
}
