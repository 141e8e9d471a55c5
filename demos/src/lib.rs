// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the examples.

use tracing_subscriber::EnvFilter;
use understory_gesture::listeners::{InputHost, ListenerHandle, ListenerKind, ListenerScope};

/// Install a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Stand-in for the platform: hands out listener handles and logs them.
#[derive(Debug, Default)]
pub struct LoggingHost {
    next: u64,
    live: usize,
}

impl LoggingHost {
    /// Listeners registered and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl InputHost for LoggingHost {
    fn listen(&mut self, scope: ListenerScope, kind: ListenerKind) -> ListenerHandle {
        self.next += 1;
        self.live += 1;
        tracing::debug!(?scope, ?kind, handle = self.next, "listen");
        ListenerHandle(self.next)
    }

    fn unlisten(&mut self, handle: ListenerHandle) {
        self.live = self.live.saturating_sub(1);
        tracing::debug!(handle = handle.0, "unlisten");
    }
}
