// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;

use crate::error::Result;
use crate::iunknown::{IUnknown, GUID};
use crate::types::{BOOL, HDC, RECT, SIZE};

/// HIMETRIC units per inch (0.01 mm each).
pub const HIMETRIC_PER_INCH: i32 = 2540;

/// `PICTYPE_*`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PictureType {
    Uninitialized,
    None,
    Bitmap,
    Metafile,
    Icon,
    EnhMetafile,
    Other(i16),
}

impl From<i16> for PictureType {
    fn from(value: i16) -> Self {
        match value {
            -1 => Self::Uninitialized,
            0 => Self::None,
            1 => Self::Bitmap,
            2 => Self::Metafile,
            3 => Self::Icon,
            4 => Self::EnhMetafile,
            other => Self::Other(other),
        }
    }
}

crate::com_interface! {
    /// An OLE picture object (bitmap, icon or metafile).
    pub interface IPicture: IUnknown {
        const IID: GUID = GUID::from_u128(0x7bf80980_bf32_101a_8bbb_00aa00300cab);

        fn get_Handle(&self, handle: *mut u32) -> HRESULT;
        fn get_hPal(&self, palette: *mut u32) -> HRESULT;
        fn get_Type(&self, kind: *mut i16) -> HRESULT;
        fn get_Width(&self, width: *mut i32) -> HRESULT;
        fn get_Height(&self, height: *mut i32) -> HRESULT;
        fn Render(
            &self,
            hdc: HDC,
            x: i32,
            y: i32,
            cx: i32,
            cy: i32,
            x_src: i32,
            y_src: i32,
            cx_src: i32,
            cy_src: i32,
            bounds: *const RECT
        ) -> HRESULT;
        fn set_hPal(&self, palette: u32) -> HRESULT;
        fn get_CurDC(&self, hdc: *mut HDC) -> HRESULT;
        fn SelectPicture(&self, hdc_in: HDC, hdc_out: *mut HDC, bitmap_out: *mut u32) -> HRESULT;
        fn get_KeepOriginalFormat(&self, keep: *mut BOOL) -> HRESULT;
        fn put_KeepOriginalFormat(&self, keep: BOOL) -> HRESULT;
        fn PictureChanged(&self) -> HRESULT;
        fn SaveAsFile(&self, stream: *mut c_void, save_copy: BOOL, size: *mut i32) -> HRESULT;
        fn get_Attributes(&self, attributes: *mut u32) -> HRESULT;
    }
}

impl IPicture {
    /// The GDI handle (`OLE_HANDLE`, always 32 bits wide).
    pub fn handle(&self) -> Result<u32> {
        let mut handle = 0;
        unsafe { self.get_Handle(&mut handle) }.to_result()?;
        Ok(handle)
    }

    pub fn kind(&self) -> Result<PictureType> {
        let mut kind = 0;
        unsafe { self.get_Type(&mut kind) }.to_result()?;
        Ok(kind.into())
    }

    /// Width in HIMETRIC.
    pub fn width(&self) -> Result<i32> {
        let mut width = 0;
        unsafe { self.get_Width(&mut width) }.to_result()?;
        Ok(width)
    }

    /// Height in HIMETRIC.
    pub fn height(&self) -> Result<i32> {
        let mut height = 0;
        unsafe { self.get_Height(&mut height) }.to_result()?;
        Ok(height)
    }

    /// Size in pixels at `dpi`.
    pub fn pixel_size(&self, dpi: i32) -> Result<SIZE> {
        Ok(SIZE {
            cx: himetric_to_pixels(self.width()?, dpi),
            cy: himetric_to_pixels(self.height()?, dpi),
        })
    }
}

/// Rounds to the nearest pixel, like `MulDiv(himetric, dpi, 2540)`.
pub fn himetric_to_pixels(himetric: i32, dpi: i32) -> i32 {
    let scaled = i64::from(himetric) * i64::from(dpi);
    let half = i64::from(HIMETRIC_PER_INCH / 2);
    let rounded = if scaled >= 0 { scaled + half } else { scaled - half };
    (rounded / i64::from(HIMETRIC_PER_INCH)) as i32
}
