// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native struct layouts and handle types.
//!
//! Every struct here matches Microsoft's published definition byte for byte:
//! field order, integer widths and embedded fixed-size arrays.

use core::mem::size_of;

use crate::error::{Error, Result};
use crate::wstr::{self, WideStringError};

crate::declare_handle! {
    /// Window handle.
    HWND,
    /// Device context.
    HDC,
    HMENU,
    HICON,
    HBITMAP,
    HFONT,
    HBRUSH,
    HINSTANCE,
    /// Generic kernel object handle.
    HANDLE,
}

pub type HMODULE = HINSTANCE;
pub type BOOL = i32;
pub type WPARAM = usize;
pub type LPARAM = isize;
pub type LRESULT = isize;
pub type LCID = u32;
pub type DISPID = i32;

pub const LF_FACESIZE: usize = 32;

/// Structs whose native layout has no padding, so their bytes can be copied
/// to and from the wire verbatim.
///
/// # Safety
/// The implementor must be `#[repr(C)]`, contain no padding bytes, and accept
/// any bit pattern in every field.
pub unsafe trait NativeLayout: Copy + Sized {
    const TYPE_NAME: &'static str;

    /// The struct's bytes in native (little-endian on Windows) order.
    fn to_native_bytes(&self) -> Vec<u8> {
        // SAFETY: no padding, so every byte is initialized.
        let bytes = unsafe {
            core::slice::from_raw_parts(self as *const Self as *const u8, size_of::<Self>())
        };
        bytes.to_vec()
    }

    /// Reads a struct back from exactly `size_of::<Self>()` bytes.
    fn from_native_bytes(bytes: &[u8]) -> Result<Self> {
        crate::ensure!(
            bytes.len() == size_of::<Self>(),
            Error::Layout {
                type_name: Self::TYPE_NAME,
                expected: size_of::<Self>(),
                actual: bytes.len(),
            }
        );
        // SAFETY: length checked; any bit pattern is valid for `Self`.
        Ok(unsafe { core::ptr::read_unaligned(bytes.as_ptr() as *const Self) })
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct POINT {
    pub x: i32,
    pub y: i32,
}

/// `POINTL` has the same layout as `POINT`; OLE drag and drop uses it.
pub type POINTL = POINT;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SIZE {
    pub cx: i32,
    pub cy: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RECT {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RECT {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Widened so any pair of in-range edges fits.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.right as i64 - self.left as i64
    }

    #[inline]
    pub const fn height(&self) -> i64 {
        self.bottom as i64 - self.top as i64
    }

    #[inline]
    pub const fn contains(&self, pt: POINT) -> bool {
        pt.x >= self.left && pt.x < self.right && pt.y >= self.top && pt.y < self.bottom
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct FILETIME {
    pub dwLowDateTime: u32,
    pub dwHighDateTime: u32,
}

impl FILETIME {
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        ((self.dwHighDateTime as u64) << 32) | self.dwLowDateTime as u64
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct LOGFONTW {
    pub lfHeight: i32,
    pub lfWidth: i32,
    pub lfEscapement: i32,
    pub lfOrientation: i32,
    pub lfWeight: i32,
    pub lfItalic: u8,
    pub lfUnderline: u8,
    pub lfStrikeOut: u8,
    pub lfCharSet: u8,
    pub lfOutPrecision: u8,
    pub lfClipPrecision: u8,
    pub lfQuality: u8,
    pub lfPitchAndFamily: u8,
    pub lfFaceName: [u16; LF_FACESIZE],
}

impl Default for LOGFONTW {
    fn default() -> Self {
        Self {
            lfHeight: 0,
            lfWidth: 0,
            lfEscapement: 0,
            lfOrientation: 0,
            lfWeight: 0,
            lfItalic: 0,
            lfUnderline: 0,
            lfStrikeOut: 0,
            lfCharSet: 0,
            lfOutPrecision: 0,
            lfClipPrecision: 0,
            lfQuality: 0,
            lfPitchAndFamily: 0,
            lfFaceName: [0; LF_FACESIZE],
        }
    }
}

impl LOGFONTW {
    /// Reads the face name up to its terminator.
    pub fn face_name(&self) -> core::result::Result<String, WideStringError> {
        wstr::from_wide(&self.lfFaceName)
    }

    /// Stores `name`, truncated so one unit is left for the terminator.
    /// The cut never splits a surrogate pair.
    pub fn set_face_name(&mut self, name: &str) -> core::result::Result<(), WideStringError> {
        let wide = wstr::WideString::new(name)?;
        let units = wide.as_utf16();
        let mut len = units.len().min(LF_FACESIZE - 1);
        if len < units.len() && (0xD800..=0xDBFF).contains(&units[len - 1]) {
            len -= 1;
        }
        self.lfFaceName = [0; LF_FACESIZE];
        self.lfFaceName[..len].copy_from_slice(&units[..len]);
        Ok(())
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct OSVERSIONINFOEXW {
    pub dwOSVersionInfoSize: u32,
    pub dwMajorVersion: u32,
    pub dwMinorVersion: u32,
    pub dwBuildNumber: u32,
    pub dwPlatformId: u32,
    pub szCSDVersion: [u16; 128],
    pub wServicePackMajor: u16,
    pub wServicePackMinor: u16,
    pub wSuiteMask: u16,
    pub wProductType: u8,
    pub wReserved: u8,
}

impl Default for OSVERSIONINFOEXW {
    /// Zeroed, with `dwOSVersionInfoSize` already filled in.
    fn default() -> Self {
        Self {
            dwOSVersionInfoSize: size_of::<Self>() as u32,
            dwMajorVersion: 0,
            dwMinorVersion: 0,
            dwBuildNumber: 0,
            dwPlatformId: 0,
            szCSDVersion: [0; 128],
            wServicePackMajor: 0,
            wServicePackMinor: 0,
            wSuiteMask: 0,
            wProductType: 0,
            wReserved: 0,
        }
    }
}

/// Notification header sent with `WM_NOTIFY`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct NMHDR {
    pub hwndFrom: HWND,
    pub idFrom: usize,
    pub code: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct MSG {
    pub hwnd: HWND,
    pub message: u32,
    pub wParam: WPARAM,
    pub lParam: LPARAM,
    pub time: u32,
    pub pt: POINT,
    pub lPrivate: u32,
}

unsafe impl NativeLayout for POINT {
    const TYPE_NAME: &'static str = "POINT";
}

unsafe impl NativeLayout for SIZE {
    const TYPE_NAME: &'static str = "SIZE";
}

unsafe impl NativeLayout for RECT {
    const TYPE_NAME: &'static str = "RECT";
}

unsafe impl NativeLayout for FILETIME {
    const TYPE_NAME: &'static str = "FILETIME";
}

unsafe impl NativeLayout for LOGFONTW {
    const TYPE_NAME: &'static str = "LOGFONTW";
}

unsafe impl NativeLayout for OSVERSIONINFOEXW {
    const TYPE_NAME: &'static str = "OSVERSIONINFOEXW";
}
