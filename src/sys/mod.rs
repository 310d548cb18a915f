// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calls into the operating system. Everything else in the crate is plain
//! memory layout and runs on any host.

pub mod dll;
pub mod error;
pub mod ole;
pub mod shell;

pub use error::{describe, format_message, last_error};
pub use ole::{create_instance, Apartment, ComGuard};
pub use shell::{create_item_from_parsing_name, taskbar_list};
