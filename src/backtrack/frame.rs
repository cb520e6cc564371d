use super::Checkpoint;
use crate::ClauseId;

/// Decision point which can be retried once with the opposite value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// State of the formula before the decision has been applied
    pub checkpoint: Checkpoint,
    /// The clause whose first literal has been branched on
    pub clause: ClauseId,
    /// `true` once the false branch is being tried
    pub flipped: bool,
}

impl Frame {
    pub fn new(checkpoint: Checkpoint, clause: ClauseId) -> Self {
        Self {
            checkpoint,
            clause,
            flipped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStack(Vec<Frame>);

impl FrameStack {
    /// Number of pending decisions
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stack a new frame in the decide step
    pub fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }

    pub fn top(&self) -> Option<&Frame> {
        self.0.last()
    }

    /// Switch the innermost frame to its false branch
    pub fn mark_flipped(&mut self) {
        let top = self.0.last_mut().expect("Flip with an empty frame stack");
        debug_assert!(!top.flipped, "Frame is flipped twice");
        top.flipped = true;
    }

    /// Discard the innermost frame whose both branches have failed
    pub fn pop(&mut self) -> Option<Frame> {
        self.0.pop()
    }
}
