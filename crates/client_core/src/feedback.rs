use std::time::{Duration, Instant};

/// How long a feedback message stays visible once set.
pub const FEEDBACK_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub text: String,
    pub expires_at: Instant,
}

/// Transient success/error messages with timed expiry.
///
/// At most one message per kind; both kinds are displayable at once. Setting
/// a message overwrites the previous one of that kind and re-arms its
/// deadline. Expiry is driven by the caller's `tick` — the board holds no
/// timer of its own, so the owning layer decides the cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackBoard {
    success: Option<FeedbackMessage>,
    error: Option<FeedbackMessage>,
}

impl FeedbackBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: FeedbackKind, text: impl Into<String>, now: Instant) {
        let message = FeedbackMessage {
            kind,
            text: text.into(),
            expires_at: now + FEEDBACK_TTL,
        };
        match kind {
            FeedbackKind::Success => self.success = Some(message),
            FeedbackKind::Error => self.error = Some(message),
        }
    }

    /// Drops expired messages; returns true when anything was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for slot in [&mut self.success, &mut self.error] {
            if slot.as_ref().is_some_and(|m| m.expires_at <= now) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }

    pub fn visible(&self, now: Instant) -> Vec<&FeedbackMessage> {
        [self.success.as_ref(), self.error.as_ref()]
            .into_iter()
            .flatten()
            .filter(|m| m.expires_at > now)
            .collect()
    }

    pub fn clear(&mut self) {
        self.success = None;
        self.error = None;
    }
}
