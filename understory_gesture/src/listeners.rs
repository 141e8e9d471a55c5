// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ownership of native input listener registrations.
//!
//! An [`Attachment`] records every listener registered with the host for one
//! capture surface. Keyboard listeners are registered on the document, so they
//! outlive the surface unless they are released explicitly: call
//! [`Attachment::detach`] on teardown. Dropping an attachment that still holds
//! handles logs a warning, since the host cannot be reached from `Drop`.

use alloc::vec::Vec;

/// Where a listener is registered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// On the capture surface; goes away with it.
    Surface,
    /// On the document; must be released explicitly.
    Document,
}

/// Native event families the normalizer consumes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer down, move, up and cancel.
    Pointer,
    /// Mouse move.
    MouseMove,
    /// Mouse enter.
    MouseEnter,
    /// Mouse leave.
    MouseLeave,
    /// Context menu request.
    ContextMenu,
    /// Wheel.
    Wheel,
    /// Key down.
    KeyDown,
    /// Key up.
    KeyUp,
}

impl ListenerKind {
    /// Every listener an attachment registers, in registration order.
    pub const ALL: [Self; 8] = [
        Self::Pointer,
        Self::MouseMove,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::ContextMenu,
        Self::Wheel,
        Self::KeyDown,
        Self::KeyUp,
    ];

    /// Scope this kind is registered in.
    pub const fn scope(self) -> ListenerScope {
        match self {
            Self::KeyDown | Self::KeyUp => ListenerScope::Document,
            _ => ListenerScope::Surface,
        }
    }
}

/// Host-issued token for one registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// The platform side of listener registration.
pub trait InputHost {
    /// Register a listener for `kind` in `scope`.
    fn listen(&mut self, scope: ListenerScope, kind: ListenerKind) -> ListenerHandle;

    /// Release a listener previously returned by [`InputHost::listen`].
    fn unlisten(&mut self, handle: ListenerHandle);
}

/// The listeners registered for one capture surface.
#[derive(Debug)]
pub struct Attachment {
    handles: Vec<(ListenerKind, ListenerHandle)>,
}

impl Attachment {
    /// Register every [`ListenerKind`] with `host`.
    pub fn attach(host: &mut dyn InputHost) -> Self {
        let handles = ListenerKind::ALL
            .iter()
            .map(|&kind| (kind, host.listen(kind.scope(), kind)))
            .collect();
        Self { handles }
    }

    /// Registered listeners, in registration order.
    pub fn handles(&self) -> impl Iterator<Item = (ListenerKind, ListenerHandle)> + '_ {
        self.handles.iter().copied()
    }

    /// Number of registrations held in `scope`.
    pub fn count_in(&self, scope: ListenerScope) -> usize {
        self.handles
            .iter()
            .filter(|(kind, _)| kind.scope() == scope)
            .count()
    }

    /// Release every listener with `host`. Document listeners go first.
    pub fn detach(mut self, host: &mut dyn InputHost) {
        let mut handles = core::mem::take(&mut self.handles);
        handles.sort_by_key(|(kind, _)| kind.scope() != ListenerScope::Document);
        for (_, handle) in handles {
            host.unlisten(handle);
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            tracing::warn!(
                listeners = self.handles.len(),
                document = self.count_in(ListenerScope::Document),
                "input attachment dropped without detach"
            );
        }
    }
}
