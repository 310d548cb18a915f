// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;
use core::fmt;

use crate::error::Error;
use crate::hresult::HRESULT;
use crate::smart_ptr::{ComInterface, ComRc, Interface};
use crate::traits::ComImpl;
use crate::vtable::{ComInterfaceInfo, InterfaceVtable};
use crate::wrapper::ComObject;

#[repr(C)]
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct GUID {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

pub type IID = GUID;
pub type CLSID = GUID;

impl GUID {
    pub const NULL: GUID = GUID::from_u128(0);

    /// Builds a GUID from its 128-bit big-endian value, e.g.
    /// `0x00000000_0000_0000_c000_000000000046`.
    pub const fn from_u128(value: u128) -> Self {
        Self {
            data1: (value >> 96) as u32,
            data2: (value >> 80) as u16,
            data3: (value >> 64) as u16,
            data4: (value as u64).to_be_bytes(),
        }
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | (u64::from_be_bytes(self.data4) as u128)
    }

    /// Parses the registry form `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`.
    /// The braces are optional.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidGuid(text.into());
        let trimmed = text.trim();
        let body = match (trimmed.strip_prefix('{'), trimmed.strip_suffix('}')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => return Err(invalid()),
        };

        let groups: [usize; 5] = [8, 4, 4, 4, 12];
        let mut value: u128 = 0;
        let mut parts = body.split('-');
        for len in groups {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != len || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let n = u64::from_str_radix(part, 16).map_err(|_| invalid())?;
            value = (value << (len * 4)) | n as u128;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::from_u128(value))
    }
}

impl fmt::Display for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl fmt::Debug for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GUID({})", self)
    }
}

pub const IID_IUNKNOWN: GUID = GUID::from_u128(0x00000000_0000_0000_c000_000000000046);

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(non_snake_case)]
pub struct IUnknownVtbl {
    pub QueryInterface:
        unsafe extern "system" fn(*mut c_void, *const GUID, *mut *mut c_void) -> HRESULT,
    pub AddRef: unsafe extern "system" fn(*mut c_void) -> u32,
    pub Release: unsafe extern "system" fn(*mut c_void) -> u32,
}

unsafe impl InterfaceVtable for IUnknownVtbl {}

impl IUnknownVtbl {
    /// Compile-time construction of the IUnknown slots for a hosted COM type.
    pub const fn new<T, V>() -> Self
    where
        T: ComImpl<V>,
        V: InterfaceVtable,
    {
        Self {
            QueryInterface: ComObject::<T, V>::shim_query_interface,
            AddRef: ComObject::<T, V>::shim_add_ref,
            Release: ComObject::<T, V>::shim_release,
        }
    }
}

#[repr(C)]
#[allow(non_snake_case)]
pub struct IUnknownRaw {
    pub lpVtbl: *const IUnknownVtbl,
}

unsafe impl ComInterface for IUnknownRaw {}

impl ComInterfaceInfo for IUnknownRaw {
    type Vtable = IUnknownVtbl;
    const IID: GUID = IID_IUNKNOWN;
    const NAME: &'static str = "IUnknown";
}

/// Owned reference to any COM object.
#[repr(transparent)]
#[derive(Clone)]
pub struct IUnknown(ComRc<IUnknownRaw>);

impl ComInterfaceInfo for IUnknown {
    type Vtable = IUnknownVtbl;
    const IID: GUID = IID_IUNKNOWN;
    const NAME: &'static str = "IUnknown";
}

unsafe impl Interface for IUnknown {
    type Raw = IUnknownRaw;

    #[inline]
    fn from_rc(rc: ComRc<IUnknownRaw>) -> Self {
        Self(rc)
    }

    #[inline]
    fn as_rc(&self) -> &ComRc<IUnknownRaw> {
        &self.0
    }

    #[inline]
    fn as_rc_mut(&mut self) -> &mut ComRc<IUnknownRaw> {
        &mut self.0
    }

    #[inline]
    fn into_rc(self) -> ComRc<IUnknownRaw> {
        self.0
    }
}

impl fmt::Debug for IUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IUnknown").field(&self.0.as_ptr()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_parse_accepts_registry_form() {
        let guid = GUID::parse("{00000000-0000-0000-C000-000000000046}").unwrap();
        assert_eq!(guid, IID_IUNKNOWN);
        let bare = GUID::parse("ea1afb91-9e28-4b86-90e9-9e9f8a5eefaf").unwrap();
        assert_eq!(bare, GUID::from_u128(0xea1afb91_9e28_4b86_90e9_9e9f8a5eefaf));
    }

    #[test]
    fn guid_parse_rejects_malformed_text() {
        assert!(GUID::parse("{00000000-0000-0000-C000-000000000046").is_err());
        assert!(GUID::parse("00000000-0000-0000-C000-00000000004").is_err());
        assert!(GUID::parse("00000000-0000-0000-C000-000000000046-00").is_err());
        assert!(GUID::parse("0000000g-0000-0000-C000-000000000046").is_err());
    }

    #[test]
    fn guid_display_round_trips() {
        let text = IID_IUNKNOWN.to_string();
        assert_eq!(text, "{00000000-0000-0000-C000-000000000046}");
        assert_eq!(GUID::parse(&text).unwrap(), IID_IUNKNOWN);
        assert_eq!(IID_IUNKNOWN.to_u128(), 0x00000000_0000_0000_c000_000000000046);
    }

    #[test]
    fn guid_layout_is_sixteen_bytes() {
        assert_eq!(core::mem::size_of::<GUID>(), 16);
        assert_eq!(core::mem::align_of::<GUID>(), 4);
        assert_eq!(
            core::mem::size_of::<IUnknownVtbl>(),
            3 * core::mem::size_of::<usize>()
        );
    }
}
