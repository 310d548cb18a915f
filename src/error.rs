// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::hresult::{HResult, HRESULT};
use crate::interfaces::dispatch::ExceptionInfo;
use crate::wstr::WideStringError;

/// Result type alias for binding-layer calls.
pub type Result<T> = core::result::Result<T, Error>;

/// Every failure the binding layer reports.
///
/// Each variant keeps the native numeric code; turning it into text is left
/// to the caller (see `sys::error::format_message` on Windows).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A Win32 call signalled failure through its return value and the
    /// thread's last-error slot held `code`.
    #[error("{function} failed with Win32 error {code}")]
    Win32 { function: &'static str, code: u32 },

    /// A COM call returned a failing HRESULT.
    #[error("COM call failed with HRESULT {0}")]
    Com(HResult),

    /// `IDispatch::Invoke` raised an automation exception.
    #[error("automation exception {0}")]
    Dispatch(Box<ExceptionInfo>),

    /// A string could not cross the UTF-16 boundary.
    #[error(transparent)]
    Utf16(#[from] WideStringError),

    /// A byte buffer did not match a native struct's size.
    #[error("{type_name} needs {expected} bytes, got {actual}")]
    Layout {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("not a GUID: {0:?}")]
    InvalidGuid(String),
}

impl Error {
    /// The native code as an HRESULT. Win32 codes go through
    /// `HRESULT_FROM_WIN32`; automation exceptions report their `scode`.
    pub fn code(&self) -> HResult {
        match self {
            Self::Win32 { code, .. } => HResult::from_win32(*code),
            Self::Com(hr) => *hr,
            Self::Dispatch(info) => info.code(),
            Self::Utf16(_) | Self::Layout { .. } | Self::InvalidGuid(_) => HResult::INVALIDARG,
        }
    }
}

impl From<HResult> for Error {
    #[inline]
    fn from(value: HResult) -> Self {
        Self::Com(value)
    }
}

impl From<Error> for HResult {
    #[inline]
    fn from(value: Error) -> Self {
        value.code()
    }
}

impl From<Error> for HRESULT {
    #[inline]
    fn from(value: Error) -> Self {
        value.code().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hresult::{E_ACCESSDENIED, E_NOINTERFACE};

    #[test]
    fn win32_errors_carry_their_code() {
        let err = Error::Win32 { function: "LoadLibraryW", code: 5 };
        assert_eq!(err.code().0, E_ACCESSDENIED);
        assert_eq!(err.to_string(), "LoadLibraryW failed with Win32 error 5");
    }

    #[test]
    fn com_errors_convert_both_ways() {
        let err: Error = HResult::NOINTERFACE.into();
        assert!(matches!(err, Error::Com(HResult::NOINTERFACE)));
        let raw: HRESULT = err.into();
        assert_eq!(raw, E_NOINTERFACE);
    }
}
