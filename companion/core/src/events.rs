//! Completions
//!
//! Results of spawned backend calls, posted back to the [`Studio`](crate::Studio)
//! over its internal channel. Every completion carries the [`ViewId`] of the
//! view mount that issued it so results for retired views can be discarded.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{ChatReply, ChatSession};
use crate::error::BackendResult;
use crate::profile::AvatarImage;

/// Identity of one mount of a creation or chat view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    /// A fresh, unique id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is plenty to tell mounts apart in logs
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Result of a spawned backend call
pub enum Completion {
    /// Avatar generation settled
    Avatar {
        /// Creation view that asked
        view: ViewId,
        /// Generated image or failure
        result: BackendResult<AvatarImage>,
    },

    /// Chat initialization settled
    ChatReady {
        /// Chat view that asked
        view: ViewId,
        /// Opened session; `None` when opening failed
        session: Option<Arc<dyn ChatSession>>,
        /// Greeting reply, or the first failure of open/greeting
        greeting: BackendResult<ChatReply>,
    },

    /// A user turn settled
    Turn {
        /// Chat view that asked
        view: ViewId,
        /// Reply or failure
        result: BackendResult<ChatReply>,
    },
}

impl Completion {
    /// Issuing view
    #[must_use]
    pub fn view(&self) -> ViewId {
        match self {
            Self::Avatar { view, .. } | Self::ChatReady { view, .. } | Self::Turn { view, .. } => {
                *view
            }
        }
    }

    /// Short label for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Avatar { .. } => "avatar",
            Self::ChatReady { .. } => "chat-ready",
            Self::Turn { .. } => "turn",
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avatar { view, result } => f
                .debug_struct("Avatar")
                .field("view", view)
                .field("ok", &result.is_ok())
                .finish(),
            Self::ChatReady {
                view,
                session,
                greeting,
            } => f
                .debug_struct("ChatReady")
                .field("view", view)
                .field("session", &session.is_some())
                .field("greeting", greeting)
                .finish(),
            Self::Turn { view, result } => f
                .debug_struct("Turn")
                .field("view", view)
                .field("result", result)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    #[test]
    fn test_view_ids_are_unique() {
        let a = ViewId::new();
        let b = ViewId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 8);
    }

    #[test]
    fn test_completion_view_and_kind() {
        let view = ViewId::new();
        let completion = Completion::Turn {
            view,
            result: Err(BackendError::NoSession),
        };
        assert_eq!(completion.view(), view);
        assert_eq!(completion.kind(), "turn");
        assert!(format!("{completion:?}").contains("NoSession"));
    }
}
