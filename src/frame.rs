//! Frame loop
//!
//! Every display refresh runs one tick: the stage updates, then renders.

/// What a frame does.
pub trait FrameStage {
    /// Advance time-dependent state by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// Draw the frame.
    fn render(&mut self) -> anyhow::Result<()>;
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule the next frame.
    Continue,
}

/// Drives a [`FrameStage`] once per frame.
#[derive(Debug, Default)]
pub struct FrameLoop {
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update then render. Render errors are logged and the loop goes on.
    pub fn tick(&mut self, stage: &mut impl FrameStage, dt: f32) -> Tick {
        stage.update(dt);
        if let Err(err) = stage.render() {
            tracing::error!(error = %err, frame = self.frames, "frame render failed");
        }
        self.frames += 1;
        Tick::Continue
    }

    /// Ticks run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
