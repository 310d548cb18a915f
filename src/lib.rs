// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! COM vtable dispatch, object lifetime and Win32 data layouts.
//!
//! Interface pointers are driven through `#[repr(C)]` vtables declared with
//! [`com_interface!`]; client handles own one reference each and release it
//! exactly once. Objects the OS calls back into are hosted by
//! [`ComObject`], which keeps them in a retention registry until their last
//! reference is gone. Everything that talks to the operating system lives in
//! [`sys`] and is only built for Windows.

pub mod error;
pub mod hresult;
pub mod interfaces;
pub mod iunknown;
pub mod macros;
pub(crate) mod refcount;
pub mod registry;
pub mod releaser;
pub mod smart_ptr;
#[cfg(windows)]
pub mod sys;
pub mod traits;
pub mod types;
pub mod variant;
pub mod vtable;
pub mod wrapper;
pub mod wstr;

pub use error::{Error, Result};
pub use hresult::{
    ComResult, HResult, IntoHResult, E_ABORT, E_ACCESSDENIED, E_FAIL, E_INVALIDARG,
    E_NOINTERFACE, E_NOTIMPL, E_OUTOFMEMORY, E_POINTER, E_UNEXPECTED, HRESULT, S_FALSE, S_OK,
};
pub use interfaces::{
    DropTarget, FdeResponse, FileDialogEvents, IDataObject, IDispatch, IDropTarget, IFileDialogEvents,
    IPicture, IShellItem, ITaskbarList, ITaskbarList2, ITaskbarList3,
};
pub use iunknown::{IUnknown, IUnknownRaw, IUnknownVtbl, CLSID, GUID, IID, IID_IUNKNOWN};
pub use paste;
pub use releaser::Releaser;
pub use smart_ptr::{ComInterface, ComRc, Interface, ThreadSafeComInterface};
pub use traits::ComImpl;
pub use types::*;
pub use variant::Variant;
pub use vtable::{ComInterfaceInfo, InterfaceVtable};
pub use wrapper::ComObject;
pub use wstr::{WideString, WideStringError};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
