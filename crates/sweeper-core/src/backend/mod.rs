// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backend module - inventory, notification and deletion collaborators.

mod log_notifier;
pub mod mock;
mod traits;

pub use log_notifier::LogNotifier;
pub use mock::{MockBackend, MockNotifier};
pub use traits::*;
