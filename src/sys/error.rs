// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::Diagnostics::Debug::{
    FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
};

use crate::error::Error;
use crate::wstr;

/// Captures the calling thread's last-error code for `function`.
///
/// Call it right after the failing API, before anything else can overwrite
/// the slot.
pub fn last_error(function: &'static str) -> Error {
    let code = unsafe { GetLastError() };
    tracing::debug!(function, code, "Win32 call failed");
    Error::Win32 { function, code }
}

/// The system's text for a Win32 code or HRESULT, without the trailing
/// line break. `None` when the system has no message for it.
pub fn format_message(code: u32) -> Option<String> {
    let mut buffer = [0u16; 512];
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            core::ptr::null(),
            code,
            0,
            buffer.as_mut_ptr(),
            buffer.len() as u32,
            core::ptr::null(),
        )
    } as usize;
    if len == 0 {
        return None;
    }
    let text = wstr::from_wide_lossy(&buffer[..len.min(buffer.len())]);
    Some(text.trim_end().to_owned())
}

/// `format_message` for any crate error, falling back to its `Display`.
pub fn describe(err: &Error) -> String {
    let code = match err {
        Error::Win32 { code, .. } => *code,
        other => other.code().0 as u32,
    };
    format_message(code).unwrap_or_else(|| err.to_string())
}
