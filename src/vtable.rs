// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::iunknown::GUID;

/// Trait marking a struct as a VTable layout.
/// # Safety
/// The struct must be `#[repr(C)]` and list exactly the slots of the COM
/// interface, base interface first, in published declaration order.
pub unsafe trait InterfaceVtable: Sized + 'static {
    /// Number of function-pointer slots, including the inherited ones.
    const SLOTS: usize = core::mem::size_of::<Self>() / core::mem::size_of::<usize>();
}

/// Metadata associated with a COM interface (IID, VTable type).
pub trait ComInterfaceInfo {
    type Vtable: InterfaceVtable;
    const IID: GUID;
    const NAME: &'static str;
}
