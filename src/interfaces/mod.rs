// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client wrappers for the system interfaces the binding layer uses, plus the
//! two callback servers (`DropTarget`, `FileDialogEvents`).

pub mod data_object;
pub mod dispatch;
pub mod drop_target;
pub mod file_dialog;
pub mod picture;
pub mod shell;
pub mod taskbar;

pub use data_object::{IDataObject, IDataObjectVtbl, FORMATETC};
pub use dispatch::{ExceptionInfo, IDispatch, IDispatchVtbl, DISPPARAMS, EXCEPINFO};
pub use drop_target::{DropTarget, IDropTarget, IDropTargetVtbl};
pub use file_dialog::{FdeResponse, FileDialogEvents, IFileDialogEvents, IFileDialogEventsVtbl};
pub use picture::{IPicture, IPictureVtbl, PictureType};
pub use shell::{IShellItem, IShellItemVtbl, SIGDN};
pub use taskbar::{
    ITaskbarList, ITaskbarList2, ITaskbarList2Vtbl, ITaskbarList3, ITaskbarList3Vtbl,
    ITaskbarListVtbl, TaskbarProgress, CLSID_TASKBAR_LIST,
};
