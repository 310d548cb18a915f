// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An `IDropTarget` server backed by closures.
//!
//! ```
//! use wincom::interfaces::drop_target::{DropTarget, DROPEFFECT_COPY};
//!
//! let target = DropTarget::new()
//!     .on_drag_enter(|_event, effect| {
//!         *effect = DROPEFFECT_COPY;
//!         Ok(())
//!     })
//!     .into_com();
//! // Hand `target` to RegisterDragDrop; the registry keeps the object alive
//! // until the shell releases it.
//! # drop(target);
//! ```

use core::ffi::c_void;

use crate::hresult::{ComResult, IntoHResult, E_INVALIDARG, HRESULT, S_OK};
use crate::interfaces::data_object::IDataObject;
use crate::iunknown::{IUnknown, IUnknownVtbl, GUID};
use crate::smart_ptr::Interface;
use crate::traits::ComImpl;
use crate::types::POINTL;
use crate::vtable::ComInterfaceInfo;
use crate::wrapper::ComObject;

pub const DROPEFFECT_NONE: u32 = 0;
pub const DROPEFFECT_COPY: u32 = 1;
pub const DROPEFFECT_MOVE: u32 = 2;
pub const DROPEFFECT_LINK: u32 = 4;
pub const DROPEFFECT_SCROLL: u32 = 0x8000_0000;

pub const MK_LBUTTON: u32 = 0x1;
pub const MK_RBUTTON: u32 = 0x2;
pub const MK_SHIFT: u32 = 0x4;
pub const MK_CONTROL: u32 = 0x8;
pub const MK_MBUTTON: u32 = 0x10;
pub const MK_ALT: u32 = 0x20;

crate::com_interface! {
    pub interface IDropTarget: IUnknown {
        const IID: GUID = GUID::from_u128(0x00000122_0000_0000_c000_000000000046);

        fn DragEnter(&self, data: *mut c_void, key_state: u32, pt: POINTL, effect: *mut u32) -> HRESULT;
        fn DragOver(&self, key_state: u32, pt: POINTL, effect: *mut u32) -> HRESULT;
        fn DragLeave(&self) -> HRESULT;
        fn Drop(&self, data: *mut c_void, key_state: u32, pt: POINTL, effect: *mut u32) -> HRESULT;
    }
}

/// What the shell reports with each drag notification.
pub struct DragEvent<'a> {
    /// The dragged data; `DragOver` carries none.
    pub data: Option<&'a IDataObject>,
    /// `MK_*` modifier and button flags.
    pub key_state: u32,
    /// Cursor position in screen coordinates.
    pub point: POINTL,
}

type DragFn = dyn Fn(&DragEvent<'_>, &mut u32) -> ComResult + Send + Sync;
type LeaveFn = dyn Fn() -> ComResult + Send + Sync;

/// Closure-backed drop target. Unset callbacks accept the notification with
/// `S_OK` and leave the proposed effect unchanged.
#[derive(Default)]
pub struct DropTarget {
    drag_enter: Option<Box<DragFn>>,
    drag_over: Option<Box<DragFn>>,
    drag_leave: Option<Box<LeaveFn>>,
    drop: Option<Box<DragFn>>,
}

impl DropTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_drag_enter<F>(mut self, f: F) -> Self
    where
        F: Fn(&DragEvent<'_>, &mut u32) -> ComResult + Send + Sync + 'static,
    {
        self.drag_enter = Some(Box::new(f));
        self
    }

    pub fn on_drag_over<F>(mut self, f: F) -> Self
    where
        F: Fn(&DragEvent<'_>, &mut u32) -> ComResult + Send + Sync + 'static,
    {
        self.drag_over = Some(Box::new(f));
        self
    }

    pub fn on_drag_leave<F>(mut self, f: F) -> Self
    where
        F: Fn() -> ComResult + Send + Sync + 'static,
    {
        self.drag_leave = Some(Box::new(f));
        self
    }

    pub fn on_drop<F>(mut self, f: F) -> Self
    where
        F: Fn(&DragEvent<'_>, &mut u32) -> ComResult + Send + Sync + 'static,
    {
        self.drop = Some(Box::new(f));
        self
    }

    /// Moves the callbacks into a hosted COM object and returns the owning
    /// reference.
    pub fn into_com(self) -> IDropTarget {
        ComObject::<Self, IDropTargetVtbl>::new_rc(self)
    }

    unsafe fn from_this<'a>(this: *mut c_void) -> &'a Self {
        unsafe { &ComObject::<Self, IDropTargetVtbl>::from_ptr(this).inner }
    }

    unsafe fn dispatch(
        callback: Option<&DragFn>,
        data: *mut c_void,
        key_state: u32,
        point: POINTL,
        effect: *mut u32,
    ) -> HRESULT {
        let Some(effect) = (unsafe { effect.as_mut() }) else {
            return E_INVALIDARG;
        };
        let Some(callback) = callback else {
            return S_OK;
        };
        // Borrowed from the caller for the duration of the call.
        let data = unsafe { IDataObject::from_raw_addref(data) };
        let event = DragEvent {
            data: data.as_ref(),
            key_state,
            point,
        };
        callback(&event, effect).into_hresult()
    }

    unsafe extern "system" fn drag_enter(
        this: *mut c_void,
        data: *mut c_void,
        key_state: u32,
        pt: POINTL,
        effect: *mut u32,
    ) -> HRESULT {
        tracing::trace!(key_state, x = pt.x, y = pt.y, "DragEnter");
        let target = unsafe { Self::from_this(this) };
        unsafe { Self::dispatch(target.drag_enter.as_deref(), data, key_state, pt, effect) }
    }

    unsafe extern "system" fn drag_over(
        this: *mut c_void,
        key_state: u32,
        pt: POINTL,
        effect: *mut u32,
    ) -> HRESULT {
        let target = unsafe { Self::from_this(this) };
        unsafe {
            Self::dispatch(target.drag_over.as_deref(), core::ptr::null_mut(), key_state, pt, effect)
        }
    }

    unsafe extern "system" fn drag_leave(this: *mut c_void) -> HRESULT {
        tracing::trace!("DragLeave");
        let target = unsafe { Self::from_this(this) };
        match &target.drag_leave {
            Some(callback) => callback().into_hresult(),
            None => S_OK,
        }
    }

    unsafe extern "system" fn drop_data(
        this: *mut c_void,
        data: *mut c_void,
        key_state: u32,
        pt: POINTL,
        effect: *mut u32,
    ) -> HRESULT {
        tracing::trace!(key_state, x = pt.x, y = pt.y, "Drop");
        let target = unsafe { Self::from_this(this) };
        unsafe { Self::dispatch(target.drop.as_deref(), data, key_state, pt, effect) }
    }
}

impl ComImpl<IDropTargetVtbl> for DropTarget {
    const VTABLE: &'static IDropTargetVtbl = &IDropTargetVtbl {
        parent: IUnknownVtbl::new::<DropTarget, IDropTargetVtbl>(),
        DragEnter: DropTarget::drag_enter,
        DragOver: DropTarget::drag_over,
        DragLeave: DropTarget::drag_leave,
        Drop: DropTarget::drop_data,
    };
    const IID: GUID = <IDropTarget as ComInterfaceInfo>::IID;
}
