// Discrete control signals sampled once per frame.

/// Current state of every control the simulator understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    pub pause: bool,
    pub reset: bool,
    pub quit: bool,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn fire() -> Self {
        Self { fire: true, ..Self::default() }
    }

    pub fn thrust() -> Self {
        Self { thrust: true, ..Self::default() }
    }
}

/// Source of input snapshots, polled by the outer loop each frame.
///
/// Implement this to drive the simulator from a keyboard, a replay file,
/// or a test script.
pub trait InputProvider {
    fn poll(&mut self) -> InputSnapshot;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Replays a fixed list of snapshots, then reports idle input forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<InputSnapshot>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputSnapshot>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        let snapshot = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        snapshot
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
