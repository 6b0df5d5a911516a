// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod admin;
pub mod logging;
pub mod memory_admin;
pub mod session;
