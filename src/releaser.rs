// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::iunknown::IUnknown;
use crate::smart_ptr::Interface;
use crate::variant::Variant;

/// Collects COM handles and VARIANTs for one scope and releases them in
/// reverse order of addition when the scope ends.
///
/// Objects obtained later in a scope usually depend on earlier ones (an item
/// enumerated from a folder, a folder from a desktop), so children go first.
/// `add` moves the reference in; clone (AddRef) first if the caller needs to
/// keep using the object after handing it over.
///
/// ```
/// use wincom::{IUnknown, Interface, Releaser};
///
/// let mut releaser = Releaser::new();
/// releaser.add(IUnknown::null());
/// releaser.release();
/// assert!(releaser.is_empty());
/// ```
#[derive(Default)]
pub struct Releaser {
    handles: Vec<IUnknown>,
    variants: Vec<Variant>,
}

impl Releaser {
    #[inline]
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Appends a handle to the pending list.
    pub fn add<I: Interface>(&mut self, obj: I) {
        self.handles.push(obj.into_unknown());
    }

    /// Appends several handles, keeping their order.
    pub fn extend<I, It>(&mut self, objs: It)
    where
        I: Interface,
        It: IntoIterator<Item = I>,
    {
        self.handles.extend(objs.into_iter().map(Interface::into_unknown));
    }

    /// Appends a VARIANT to its own pending list.
    pub fn add_variant(&mut self, value: Variant) {
        self.variants.push(value);
    }

    pub fn extend_variants<It>(&mut self, values: It)
    where
        It: IntoIterator<Item = Variant>,
    {
        self.variants.extend(values);
    }

    /// Pending handles plus pending variants.
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len() + self.variants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty() && self.variants.is_empty()
    }

    /// Releases handles last-in-first-out, then clears variants
    /// last-in-first-out. Both lists end up empty, so a second call does nothing.
    pub fn release(&mut self) {
        if self.is_empty() {
            return;
        }
        tracing::trace!(
            handles = self.handles.len(),
            variants = self.variants.len(),
            "releasing scope"
        );
        while let Some(mut handle) = self.handles.pop() {
            handle.release();
        }
        while let Some(mut value) = self.variants.pop() {
            value.clear();
        }
    }
}

impl Drop for Releaser {
    fn drop(&mut self) {
        self.release();
    }
}

impl core::fmt::Debug for Releaser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Releaser")
            .field("handles", &self.handles.len())
            .field("variants", &self.variants.len())
            .finish()
    }
}
