//! Frame lifecycle.
//!
//! A [`Game`] receives a [`Context`] in every callback and records its drawing
//! into the context's command buffer. The [`FrameDriver`] calls the game once
//! per frame and flushes the buffer to the executor afterwards.

use std::time::Instant;

use crate::commands::{CommandBuffer, CommandExecutor};
use crate::error::{BaconError, Result};

/// State handed to the game during a frame.
#[derive(Debug, Default)]
pub struct Context {
    commands: CommandBuffer,
    timestep: f32,
    quit: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer drawing calls are recorded into for this frame.
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut self.commands
    }

    /// Seconds elapsed since the previous frame. Zero on the first frame.
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Stops the driver once the current frame has been flushed.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }
}

/// Application callbacks.
pub trait Game {
    /// Called once, before the first tick.
    fn on_init(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Called once per frame.
    fn on_tick(&mut self, ctx: &mut Context) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriverState {
    Starting,
    Running,
    Stopped,
}

/// Drives a [`Game`] frame by frame against a [`CommandExecutor`].
///
/// Errors during the first frame (including `on_init`) stop the driver.
/// Errors in later frames discard that frame's commands and are returned,
/// but the driver keeps running.
#[derive(Debug)]
pub struct FrameDriver<E> {
    executor: E,
    context: Context,
    state: DriverState,
}

impl<E: CommandExecutor> FrameDriver<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            context: Context::new(),
            state: DriverState::Starting,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn is_running(&self) -> bool {
        self.state != DriverState::Stopped
    }

    /// Stops the driver without running another frame.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    /// Runs one frame with the given timestep, in seconds.
    ///
    /// Returns [`BaconError::NotLooping`] once the driver has stopped.
    pub fn tick<G: Game + ?Sized>(&mut self, game: &mut G, timestep: f32) -> Result<()> {
        self.context.timestep = timestep;

        let result = match self.state {
            DriverState::Stopped => return Err(BaconError::NotLooping),
            DriverState::Starting => {
                log::debug!("starting game");
                let result = game
                    .on_init(&mut self.context)
                    .and_then(|()| self.frame(game));
                match &result {
                    Ok(()) => self.state = DriverState::Running,
                    Err(e) => {
                        log::error!("game failed to start: {e}");
                        self.context.commands.clear();
                        self.state = DriverState::Stopped;
                    }
                }
                result
            }
            DriverState::Running => {
                let result = self.frame(game);
                if let Err(e) = &result {
                    log::error!("frame failed: {e}");
                }
                result
            }
        };

        if self.context.quit {
            log::debug!("game requested quit");
            self.state = DriverState::Stopped;
        }
        result
    }

    /// Ticks until the game quits, measuring timesteps with the wall clock.
    ///
    /// Errors from frames after the first are already logged by
    /// [`Self::tick`] and do not end the loop. A startup error is returned.
    pub fn run<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<()> {
        if !self.is_running() {
            return Err(BaconError::NotLooping);
        }

        let mut last = Instant::now();
        let mut timestep = 0.0;
        while self.is_running() {
            let started = self.state == DriverState::Starting;
            if let Err(e) = self.tick(game, timestep) {
                if started {
                    return Err(e);
                }
            }

            let now = Instant::now();
            timestep = now.duration_since(last).as_secs_f32();
            last = now;
        }
        Ok(())
    }

    fn frame<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<()> {
        let result = game
            .on_tick(&mut self.context)
            .and_then(|()| self.context.commands.flush(&mut self.executor));
        if result.is_err() {
            self.context.commands.clear();
        }
        result
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RecordingExecutor;
    use crate::error::ErrorCode;
    use crate::native::Command;

    #[derive(Default)]
    struct Script {
        inits: usize,
        ticks: usize,
        fail_init: bool,
        fail_tick: Option<usize>,
        quit_tick: Option<usize>,
        timesteps: Vec<f32>,
    }

    impl Game for Script {
        fn on_init(&mut self, ctx: &mut Context) -> Result<()> {
            self.inits += 1;
            ctx.commands().push_color();
            if self.fail_init {
                return Err(BaconError::InvalidArgument);
            }
            Ok(())
        }

        fn on_tick(&mut self, ctx: &mut Context) -> Result<()> {
            self.ticks += 1;
            self.timesteps.push(ctx.timestep());
            ctx.commands().translate(self.ticks as f32, 0.0);
            if self.fail_tick == Some(self.ticks) {
                return Err(BaconError::InvalidHandle);
            }
            if self.quit_tick == Some(self.ticks) {
                ctx.quit();
            }
            Ok(())
        }
    }

    #[test]
    fn test_first_tick_runs_init_and_flushes_once() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script::default();

        driver.tick(&mut game, 0.0).unwrap();
        assert_eq!(game.inits, 1);
        assert_eq!(game.ticks, 1);

        let batches = driver.executor().batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0].commands,
            vec![Command::PushColor.to_raw(), Command::Translate.to_raw()]
        );
        assert_eq!(batches[0].data, vec![1.0, 0.0]);

        driver.tick(&mut game, 0.5).unwrap();
        assert_eq!(game.inits, 1);
        assert_eq!(game.timesteps, vec![0.0, 0.5]);
    }

    #[test]
    fn test_startup_error_is_fatal() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script {
            fail_init: true,
            ..Script::default()
        };

        let err = driver.tick(&mut game, 0.0).unwrap_err();
        assert!(matches!(err, BaconError::InvalidArgument));
        assert!(!driver.is_running());
        assert_eq!(game.ticks, 0);
        assert!(driver.executor().batches().is_empty());
        assert!(driver.context.commands.is_empty());

        let err = driver.tick(&mut game, 0.0).unwrap_err();
        assert!(matches!(err, BaconError::NotLooping));
    }

    #[test]
    fn test_startup_flush_failure_is_fatal() {
        let mut executor = RecordingExecutor::new();
        executor.fail_next(ErrorCode::InvalidHandle);
        let mut driver = FrameDriver::new(executor);

        let err = driver.tick(&mut Script::default(), 0.0).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidHandle));
        assert!(!driver.is_running());
    }

    #[test]
    fn test_frame_error_discards_commands_and_keeps_running() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script {
            fail_tick: Some(2),
            ..Script::default()
        };

        driver.tick(&mut game, 0.0).unwrap();
        assert!(matches!(
            driver.tick(&mut game, 0.0),
            Err(BaconError::InvalidHandle)
        ));
        assert!(driver.is_running());
        driver.tick(&mut game, 0.0).unwrap();

        let batches = driver.executor().batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].commands, vec![Command::Translate.to_raw()]);
        assert_eq!(batches[1].data, vec![3.0, 0.0]);
    }

    #[test]
    fn test_flush_failure_after_startup_keeps_running() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script::default();
        driver.tick(&mut game, 0.0).unwrap();

        driver.executor_mut().fail_next_raw(999);
        assert!(matches!(
            driver.tick(&mut game, 0.0),
            Err(BaconError::Unrecognized(999))
        ));
        assert!(driver.is_running());

        driver.tick(&mut game, 0.0).unwrap();
        let batches = driver.executor().batches();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].data, vec![3.0, 0.0]);
    }

    #[test]
    fn test_quit_stops_after_flush() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script {
            quit_tick: Some(2),
            ..Script::default()
        };

        driver.tick(&mut game, 0.0).unwrap();
        driver.tick(&mut game, 0.0).unwrap();
        assert!(!driver.is_running());
        assert_eq!(driver.executor().batches().len(), 2);
        assert!(matches!(
            driver.tick(&mut game, 0.0),
            Err(BaconError::NotLooping)
        ));
    }

    #[test]
    fn test_run_until_quit() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script {
            fail_tick: Some(2),
            quit_tick: Some(4),
            ..Script::default()
        };

        driver.run(&mut game).unwrap();
        assert_eq!(game.ticks, 4);
        assert_eq!(game.timesteps[0], 0.0);
        assert!(game.timesteps.iter().all(|t| *t >= 0.0));
        assert_eq!(driver.executor().batches().len(), 3);

        assert!(matches!(
            driver.run(&mut game),
            Err(BaconError::NotLooping)
        ));
    }

    #[test]
    fn test_run_returns_startup_error() {
        let mut driver = FrameDriver::new(RecordingExecutor::new());
        let mut game = Script {
            fail_init: true,
            ..Script::default()
        };
        assert!(matches!(
            driver.run(&mut game),
            Err(BaconError::InvalidArgument)
        ));
    }
}
