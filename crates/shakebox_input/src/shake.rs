//! Window-shake tracking
//!
//! The window's on-screen position is sampled from move events; the pixel
//! delta between two consecutive samples is the shake signal.

/// Turns window move events into a per-frame velocity signal
#[derive(Clone, Debug)]
pub struct ShakeTracker {
    last_position: Option<[i32; 2]>,
    velocity: [f32; 2],
    /// Signals at or below this magnitude are not reported
    pub threshold: f32,
}

impl Default for ShakeTracker {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl ShakeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            last_position: None,
            velocity: [0.0; 2],
            threshold,
        }
    }

    /// Record a window move
    ///
    /// Moves are ignored entirely while `tracking` is false (nothing to push).
    /// The first tracked move only establishes the reference position.
    pub fn on_window_moved(&mut self, x: i32, y: i32, tracking: bool) {
        if !tracking {
            return;
        }
        if let Some([last_x, last_y]) = self.last_position {
            self.velocity = [(x - last_x) as f32, (y - last_y) as f32];
        }
        self.last_position = Some([x, y]);
    }

    /// Pending velocity, without consuming it
    pub fn velocity(&self) -> [f32; 2] {
        self.velocity
    }

    /// Take the pending signal if it exceeds the threshold
    ///
    /// A reported signal is reset to zero; a weaker one is left in place
    /// until the next move overwrites it.
    pub fn take(&mut self) -> Option<[f32; 2]> {
        let [x, y] = self.velocity;
        if (x * x + y * y).sqrt() > self.threshold {
            self.velocity = [0.0; 2];
            Some([x, y])
        } else {
            None
        }
    }
}
