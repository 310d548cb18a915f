// Copyright (c) 2026 Exveria
// SPDX-License-Identifier: MIT OR Apache-2.0

// Test-only crate for exercising wincom from a host environment.
