// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::slice;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WideStringError {
    /// The input contains a NUL that would truncate it on the native side.
    #[error("string contains NUL at UTF-16 offset {position}")]
    InteriorNul { position: usize },
    /// The UTF-16 data contains an unpaired surrogate.
    #[error("invalid UTF-16 data")]
    InvalidUtf16,
}

/// An owned, NUL-terminated UTF-16 buffer for passing strings into Win32.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WideString {
    buffer: Vec<u16>,
}

impl WideString {
    pub fn new(value: &str) -> Result<Self, WideStringError> {
        let mut buffer: Vec<u16> = value.encode_utf16().collect();
        if let Some(position) = buffer.iter().position(|&unit| unit == 0) {
            return Err(WideStringError::InteriorNul { position });
        }
        buffer.push(0);
        Ok(Self { buffer })
    }

    /// Pointer to the first unit; valid while `self` is alive.
    #[inline]
    pub fn as_ptr(&self) -> *const u16 {
        self.buffer.as_ptr()
    }

    /// Mutable pointer for APIs typed `LPWSTR` that do not write through it.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u16 {
        self.buffer.as_mut_ptr()
    }

    /// The string's units without the terminator.
    #[inline]
    pub fn as_utf16(&self) -> &[u16] {
        &self.buffer[..self.buffer.len() - 1]
    }

    #[inline]
    pub fn as_utf16_with_nul(&self) -> &[u16] {
        &self.buffer
    }

    /// Length in UTF-16 units, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(self.as_utf16())
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideString({:?})", self.to_string_lossy())
    }
}

impl TryFrom<&str> for WideString {
    type Error = WideStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Returns the prefix of `units` before the first NUL, or all of it.
#[inline]
pub fn truncate_at_nul(units: &[u16]) -> &[u16] {
    let end = units.iter().position(|&unit| unit == 0).unwrap_or(units.len());
    &units[..end]
}

/// Decodes a fixed-size or length-known buffer, stopping at the first NUL.
pub fn from_wide(units: &[u16]) -> Result<String, WideStringError> {
    String::from_utf16(truncate_at_nul(units)).map_err(|_| WideStringError::InvalidUtf16)
}

pub fn from_wide_lossy(units: &[u16]) -> String {
    String::from_utf16_lossy(truncate_at_nul(units))
}

/// Returns the UTF-16 slice of a NUL-terminated string, without the terminator.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated UTF-16 string that stays
/// valid for reads during `'a`.
pub unsafe fn wide_ptr_as_slice<'a>(ptr: *const u16) -> &'a [u16] {
    if ptr.is_null() {
        return &[];
    }
    let mut len = 0;
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    unsafe { slice::from_raw_parts(ptr, len) }
}

/// Converts a NUL-terminated UTF-16 string into an owned Rust String.
/// A null pointer yields an empty string.
///
/// # Safety
/// See [`wide_ptr_as_slice`].
pub unsafe fn from_wide_ptr(ptr: *const u16) -> Result<String, WideStringError> {
    let units = unsafe { wide_ptr_as_slice(ptr) };
    String::from_utf16(units).map_err(|_| WideStringError::InvalidUtf16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_string_is_nul_terminated() {
        let wide = WideString::new("héllo").unwrap();
        assert_eq!(wide.len(), 5);
        assert_eq!(*wide.as_utf16_with_nul().last().unwrap(), 0);
        assert_eq!(unsafe { from_wide_ptr(wide.as_ptr()) }.unwrap(), "héllo");
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = WideString::new("ab\0cd").unwrap_err();
        assert_eq!(err, WideStringError::InteriorNul { position: 2 });
    }

    #[test]
    fn fixed_buffers_stop_at_first_nul() {
        let mut buffer = [0u16; 32];
        for (slot, unit) in buffer.iter_mut().zip("Segoe UI".encode_utf16()) {
            *slot = unit;
        }
        assert_eq!(from_wide(&buffer).unwrap(), "Segoe UI");
        assert_eq!(from_wide(&[0x0041, 0x0042]).unwrap(), "AB");
    }

    #[test]
    fn surrogates_survive_and_lone_ones_fail() {
        let wide = WideString::new("𝄞").unwrap();
        assert_eq!(wide.len(), 2);
        assert_eq!(from_wide(wide.as_utf16()).unwrap(), "𝄞");
        assert_eq!(from_wide(&[0xD834]), Err(WideStringError::InvalidUtf16));
        assert_eq!(from_wide_lossy(&[0x41, 0xD834]), "A\u{FFFD}");
    }

    #[test]
    fn null_pointer_decodes_empty() {
        assert_eq!(unsafe { from_wide_ptr(core::ptr::null()) }.unwrap(), "");
    }
}
