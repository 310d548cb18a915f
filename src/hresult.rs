// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

pub type HRESULT = i32;

pub const S_OK: HRESULT = 0;
pub const S_FALSE: HRESULT = 1;
pub const E_NOTIMPL: HRESULT = 0x8000_4001u32 as i32;
pub const E_NOINTERFACE: HRESULT = 0x8000_4002u32 as i32;
pub const E_POINTER: HRESULT = 0x8000_4003u32 as i32;
pub const E_ABORT: HRESULT = 0x8000_4004u32 as i32;
pub const E_FAIL: HRESULT = 0x8000_4005u32 as i32;
pub const E_UNEXPECTED: HRESULT = 0x8000_FFFFu32 as i32;
pub const E_ACCESSDENIED: HRESULT = 0x8007_0005u32 as i32;
pub const E_OUTOFMEMORY: HRESULT = 0x8007_000Eu32 as i32;
pub const E_INVALIDARG: HRESULT = 0x8007_0057u32 as i32;
pub const CLASS_E_NOAGGREGATION: HRESULT = 0x8004_0110u32 as i32;
pub const REGDB_E_CLASSNOTREG: HRESULT = 0x8004_0154u32 as i32;
pub const DISP_E_UNKNOWNNAME: HRESULT = 0x8002_0006u32 as i32;
pub const DISP_E_MEMBERNOTFOUND: HRESULT = 0x8002_0003u32 as i32;
pub const DISP_E_EXCEPTION: HRESULT = 0x8002_0009u32 as i32;

pub const FACILITY_WIN32: u16 = 7;

/// A COM status code.
///
/// Non-negative values are successes, so `S_FALSE` is a success just like
/// `S_OK`. Everything with the severity bit set is a failure.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct HResult(pub HRESULT);

impl HResult {
    pub const OK: HResult = HResult(S_OK);
    pub const FALSE: HResult = HResult(S_FALSE);
    pub const NOTIMPL: HResult = HResult(E_NOTIMPL);
    pub const NOINTERFACE: HResult = HResult(E_NOINTERFACE);
    pub const POINTER: HResult = HResult(E_POINTER);
    pub const FAIL: HResult = HResult(E_FAIL);
    pub const UNEXPECTED: HResult = HResult(E_UNEXPECTED);
    pub const OUTOFMEMORY: HResult = HResult(E_OUTOFMEMORY);
    pub const INVALIDARG: HResult = HResult(E_INVALIDARG);

    #[inline]
    pub const fn from_raw(raw: HRESULT) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> HRESULT {
        self.0
    }

    /// Maps a Win32 error code into an HRESULT the way `HRESULT_FROM_WIN32` does.
    #[inline]
    pub const fn from_win32(code: u32) -> Self {
        if code as i32 <= 0 {
            Self(code as i32)
        } else {
            Self(((code & 0xFFFF) | ((FACILITY_WIN32 as u32) << 16) | 0x8000_0000) as i32)
        }
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn facility(self) -> u16 {
        ((self.0 as u32 >> 16) & 0x1FFF) as u16
    }

    #[inline]
    pub const fn code(self) -> u16 {
        (self.0 as u32 & 0xFFFF) as u16
    }

    #[inline]
    pub fn to_result(self) -> Result<(), HResult> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HResult({:#010X})", self.0 as u32)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0 as u32)
    }
}

impl From<HRESULT> for HResult {
    #[inline]
    fn from(value: HRESULT) -> Self {
        HResult(value)
    }
}

impl From<HResult> for HRESULT {
    #[inline]
    fn from(value: HResult) -> Self {
        value.0
    }
}

pub type ComResult<T = ()> = Result<T, HResult>;

/// Converts callback results into the raw code handed back to COM.
pub trait IntoHResult {
    fn into_hresult(self) -> HRESULT;
}

impl IntoHResult for HRESULT {
    #[inline]
    fn into_hresult(self) -> HRESULT {
        self
    }
}

impl IntoHResult for HResult {
    #[inline]
    fn into_hresult(self) -> HRESULT {
        self.0
    }
}

impl<T, E> IntoHResult for Result<T, E>
where
    E: Into<HResult>,
{
    #[inline]
    fn into_hresult(self) -> HRESULT {
        match self {
            Ok(_) => S_OK,
            Err(err) => err.into().0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_false_is_a_success() {
        assert!(HResult::FALSE.is_success());
        assert_eq!(HResult::FALSE.to_result(), Ok(()));
        assert_eq!(HResult::NOINTERFACE.to_result(), Err(HResult::NOINTERFACE));
    }

    #[test]
    fn win32_codes_map_into_facility_win32() {
        let hr = HResult::from_win32(5);
        assert_eq!(hr.0, E_ACCESSDENIED);
        assert_eq!(hr.facility(), FACILITY_WIN32);
        assert_eq!(hr.code(), 5);
        assert_eq!(HResult::from_win32(0), HResult::OK);
    }

    #[test]
    fn results_collapse_to_raw_codes() {
        let ok: Result<u32, HResult> = Ok(7);
        assert_eq!(ok.into_hresult(), S_OK);
        let err: Result<u32, HResult> = Err(HResult::NOTIMPL);
        assert_eq!(err.into_hresult(), E_NOTIMPL);
    }
}
