// benches/comparison.rs
//
// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use wincom::{
    com_interface, ComImpl, ComInterfaceInfo, ComObject, IUnknown, IUnknownVtbl, Interface,
    Releaser, GUID, HRESULT, S_OK,
};

com_interface! {
    pub interface IStatus: IUnknown {
        const IID: GUID = GUID::from_u128(0x11112222_3333_4444_5566_778899aabbcc);

        fn GetStatus(&self, status: *mut i32) -> HRESULT;
    }
}

struct Status {
    calls: AtomicU32,
}

impl Status {
    unsafe extern "system" fn get_status(this: *mut c_void, status: *mut i32) -> HRESULT {
        let inner = unsafe { &ComObject::<Self, IStatusVtbl>::from_ptr(this).inner };
        inner.calls.fetch_add(1, Ordering::Relaxed);
        unsafe { *status = 1 };
        S_OK
    }
}

impl ComImpl<IStatusVtbl> for Status {
    const VTABLE: &'static IStatusVtbl = &IStatusVtbl {
        parent: IUnknownVtbl::new::<Status, IStatusVtbl>(),
        GetStatus: Status::get_status,
    };
    const IID: GUID = <IStatus as ComInterfaceInfo>::IID;
}

fn status() -> IStatus {
    ComObject::<Status, IStatusVtbl>::new_rc(Status {
        calls: AtomicU32::new(0),
    })
}

// Allocation, registry insert and final release of a hosted object.
fn bench_hosted_lifetime(c: &mut Criterion) {
    c.bench_function("hosted_object_new_release", |b| {
        b.iter(|| {
            let obj = status();
            black_box(obj.as_raw());
        })
    });

    c.bench_function("box_new_baseline", |b| {
        b.iter(|| {
            let obj = Box::new(AtomicU32::new(0));
            black_box(obj);
        })
    });
}

fn bench_vtable_call(c: &mut Criterion) {
    let obj = status();

    c.bench_function("wrapper_method_call", |b| {
        b.iter(|| {
            let mut value = 0;
            let hr = unsafe { obj.GetStatus(&mut value) };
            black_box((hr, value));
        })
    });

    c.bench_function("raw_vtable_call", |b| {
        let raw = obj.as_raw() as *mut IStatusRaw;
        b.iter(|| {
            let mut value = 0;
            unsafe {
                let vtbl = (*raw).lpVtbl;
                black_box(((*vtbl).GetStatus)(raw as *mut c_void, &mut value));
            }
            black_box(value);
        })
    });
}

fn bench_release_scope(c: &mut Criterion) {
    const HANDLES: usize = 32;

    c.bench_function("releaser_drain", |b| {
        b.iter_batched(
            || {
                let mut releaser = Releaser::new();
                releaser.extend((0..HANDLES).map(|_| status()));
                releaser
            },
            |mut releaser| releaser.release(),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("manual_release", |b| {
        b.iter_batched(
            || (0..HANDLES).map(|_| status().into_unknown()).collect::<Vec<IUnknown>>(),
            |mut handles| {
                while let Some(mut handle) = handles.pop() {
                    black_box(handle.release());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_hosted_lifetime, bench_vtable_call, bench_release_scope);
criterion_main!(benches);
