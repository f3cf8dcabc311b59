/// Game loop timing
///
/// Implements a fixed timestep frame driver. The embedding application
/// measures how much wall time passed and hands it to `begin_frame`, which
/// answers how many fixed controller steps to run. Nothing here reads a
/// clock, so a recorded sequence of frame times always replays the same way.
use std::time::Duration;

/// Target controller update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of steps per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Length of one fixed step
    timestep: Duration,

    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,
}

impl GameLoop {
    /// Create a game loop stepping at [`FIXED_TIMESTEP`]
    pub fn new() -> Self {
        Self::with_timestep(FIXED_TIMESTEP_DURATION)
    }

    /// Create a game loop with a custom step length
    pub fn with_timestep(timestep: Duration) -> Self {
        let timestep = if timestep.is_zero() {
            log::warn!("Zero timestep requested, using {:?}", FIXED_TIMESTEP_DURATION);
            FIXED_TIMESTEP_DURATION
        } else {
            timestep
        };

        Self {
            timestep,
            accumulator: Duration::ZERO,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new frame that lasted `frame_time`, returns the number of fixed updates to run
    pub fn begin_frame(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= self.timestep && updates < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.timestep;
            updates += 1;
        }

        // Drop the backlog instead of carrying it into the next frame
        if updates == MAX_STEPS_PER_FRAME && self.accumulator >= self.timestep {
            log::debug!("Frame of {:?} hit the step cap", frame_time);
            self.accumulator = Duration::ZERO;
        }

        self.update_count += u64::from(updates);
        updates
    }

    /// Get the fixed timestep (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        self.timestep.as_secs_f32()
    }

    /// Get the interpolation alpha between the last two fixed steps
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.timestep.as_secs_f32()
    }

    /// Total time simulated by fixed steps
    pub fn simulated_time(&self) -> Duration {
        let nanos = self.timestep.as_nanos() * u128::from(self.update_count);
        let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
        // Remainder is below one second
        let subsec = (nanos % NANOS_PER_SEC) as u32;
        Duration::new(secs, subsec)
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert_eq!(game_loop.simulated_time(), Duration::ZERO);
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_step_counting() {
        let mut game_loop = GameLoop::with_timestep(Duration::from_millis(10));

        assert_eq!(game_loop.begin_frame(Duration::from_millis(25)), 2);
        assert!((game_loop.alpha() - 0.5).abs() < 1.0e-4);

        // Leftover 5ms plus 5ms completes one more step
        assert_eq!(game_loop.begin_frame(Duration::from_millis(5)), 1);
        assert_eq!(game_loop.update_count(), 3);
        assert_eq!(game_loop.simulated_time(), Duration::from_millis(30));
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut game_loop = GameLoop::with_timestep(Duration::from_millis(10));

        assert_eq!(game_loop.begin_frame(Duration::from_millis(4)), 0);
        assert_eq!(game_loop.begin_frame(Duration::from_millis(4)), 0);
        assert_eq!(game_loop.begin_frame(Duration::from_millis(4)), 1);
        assert_eq!(game_loop.frame_count(), 3);
    }

    #[test]
    fn test_max_steps_limit() {
        let mut game_loop = GameLoop::with_timestep(Duration::from_millis(10));

        // 300ms would allow 30 updates
        assert_eq!(game_loop.begin_frame(Duration::from_millis(300)), MAX_STEPS_PER_FRAME);
        assert_eq!(game_loop.alpha(), 0.0);
    }

    #[test]
    fn test_simulated_time_past_u32_updates() {
        let mut game_loop = GameLoop::with_timestep(Duration::from_millis(10));
        game_loop.update_count = u64::from(u32::MAX) + 2;

        assert_eq!(
            game_loop.simulated_time(),
            Duration::from_millis(10 * (u64::from(u32::MAX) + 2))
        );
    }

    #[test]
    fn test_zero_timestep_falls_back() {
        let game_loop = GameLoop::with_timestep(Duration::ZERO);
        assert!(game_loop.fixed_timestep() > 0.0);
    }
}
