// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

#[macro_export]
/// Returns early with `Err(err)` when `cond` is false.
///
/// The message form also reports the failure through `tracing` in debug builds.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
    ($cond:expr, $err:expr, $($msg:tt)+) => {
        if !$cond {
            #[cfg(debug_assertions)]
            $crate::__private::tracing::debug!(
                file = file!(),
                line = line!(),
                "wincom error: {}",
                format_args!($($msg)+)
            );
            return Err($err.into());
        }
    };
}

#[macro_export]
/// Declares opaque OS handle types (`HWND`, `HDC`, ...).
macro_rules! declare_handle {
    ($($(#[$attr:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$attr])*
            #[repr(transparent)]
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub struct $name(pub *mut core::ffi::c_void);

            impl $name {
                pub const NULL: Self = Self(core::ptr::null_mut());

                #[inline]
                pub fn is_null(self) -> bool {
                    self.0.is_null()
                }
            }

            impl Default for $name {
                #[inline]
                fn default() -> Self {
                    Self::NULL
                }
            }
        )+
    };
}

#[macro_export]
/// Declares a client-side COM interface.
///
/// Generates, for `interface IFoo: IBase`:
/// * `IFooVtbl`: `#[repr(C)]`, `parent: IBaseVtbl` first, then one slot per
///   method in declaration order. The order must match the published
///   interface exactly; native code indexes slots by position.
/// * `IFooRaw`: the `{ lpVtbl }` layout COM pointers point at.
/// * `IFoo`: an owning, `Clone`-via-`AddRef` wrapper that derefs to `IBase`
///   and exposes each slot as an `unsafe` method returning `HResult`.
///   Calling a slot on a released handle returns `E_POINTER` without
///   touching memory.
macro_rules! com_interface {
    (
        $(#[$attr:meta])*
        $vis:vis interface $name:ident: $parent:ident {
            const IID: GUID = $iid:expr;
            $(
                $(#[$method_attr:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) -> HRESULT;
            )*
        }
    ) => {
        $crate::paste::paste! {
            #[repr(C)]
            #[derive(Clone, Copy)]
            #[allow(non_snake_case)]
            $vis struct [<$name Vtbl>] {
                pub parent: <$parent as $crate::vtable::ComInterfaceInfo>::Vtable,
                $(
                    pub $method: unsafe extern "system" fn(
                        this: *mut core::ffi::c_void
                        $(, $arg: $arg_ty)*
                    ) -> $crate::HRESULT,
                )*
            }

            unsafe impl $crate::vtable::InterfaceVtable for [<$name Vtbl>] {}

            #[repr(C)]
            #[allow(non_snake_case)]
            $vis struct [<$name Raw>] {
                pub lpVtbl: *const [<$name Vtbl>],
            }

            unsafe impl $crate::ComInterface for [<$name Raw>] {}

            impl $crate::vtable::ComInterfaceInfo for [<$name Raw>] {
                type Vtable = [<$name Vtbl>];
                const IID: $crate::GUID = $iid;
                const NAME: &'static str = stringify!($name);
            }

            $(#[$attr])*
            #[repr(transparent)]
            #[derive(Clone)]
            $vis struct $name($crate::ComRc<[<$name Raw>]>);

            impl $crate::vtable::ComInterfaceInfo for $name {
                type Vtable = [<$name Vtbl>];
                const IID: $crate::GUID = $iid;
                const NAME: &'static str = stringify!($name);
            }

            unsafe impl $crate::Interface for $name {
                type Raw = [<$name Raw>];

                #[inline]
                fn from_rc(rc: $crate::ComRc<[<$name Raw>]>) -> Self {
                    Self(rc)
                }

                #[inline]
                fn as_rc(&self) -> &$crate::ComRc<[<$name Raw>]> {
                    &self.0
                }

                #[inline]
                fn as_rc_mut(&mut self) -> &mut $crate::ComRc<[<$name Raw>]> {
                    &mut self.0
                }

                #[inline]
                fn into_rc(self) -> $crate::ComRc<[<$name Raw>]> {
                    self.0
                }
            }

            impl core::ops::Deref for $name {
                type Target = $parent;

                #[inline]
                fn deref(&self) -> &$parent {
                    // SAFETY: both wrappers are transparent over one COM pointer and
                    // this interface's vtable begins with the parent's.
                    unsafe { &*(self as *const Self as *const $parent) }
                }
            }

            impl From<$name> for $parent {
                #[inline]
                fn from(value: $name) -> $parent {
                    let rc = $crate::Interface::into_rc(value);
                    // SAFETY: the vtable begins with the parent's.
                    <$parent as $crate::Interface>::from_rc(unsafe { rc.cast() })
                }
            }

            impl core::fmt::Debug for $name {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.debug_tuple(stringify!($name))
                        .field(&$crate::Interface::as_raw(self))
                        .finish()
                }
            }

            #[allow(non_snake_case, dead_code, clippy::too_many_arguments)]
            impl $name {
                $(
                    $(#[$method_attr])*
                    ///
                    /// # Safety
                    /// Pointer arguments must satisfy the native method's contract.
                    #[inline]
                    pub unsafe fn $method(&self $(, $arg: $arg_ty)*) -> $crate::HResult {
                        let Some(vtbl) = $crate::Interface::vtable(self) else {
                            return $crate::HResult::POINTER;
                        };
                        let this = $crate::Interface::as_raw(self);
                        $crate::HResult(unsafe { (vtbl.$method)(this $(, $arg)*) })
                    }
                )*
            }
        }
    };
}
