/// Wall-clock driver for a session
use std::future::Future;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::time::MissedTickBehavior;

use crate::frame::Frame;
use crate::input::Key;
use crate::piece::Rotation;
use crate::session::Session;

/// Commands that can be sent to the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start or restart the game
    Start,
    /// Stop a running game
    Stop,
    /// Key pressed
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
    /// Key pressed and released after the next tick, for inputs without release events
    Press(Key),
    /// Queue a rotation in an explicit direction
    Rotate(Rotation),
    /// Stop the run loop
    Quit,
}

/// Result of one runner step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The screen needs repainting
    Redraw(Frame),
    /// Nothing visible changed
    Idle,
    /// The runner was asked to quit
    Stop,
}

/// Source of scheduler ticks
pub trait Ticker: Send {
    /// Resolves at the next tick
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Fixed-period ticker on the tokio clock
pub struct IntervalTicker {
    interval: tokio::time::Interval,
}

impl IntervalTicker {
    /// Must be called from within a tokio runtime
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker fired by hand through a channel
///
/// Once every sender is gone the ticker never fires again.
pub struct ChannelTicker {
    rx: flume::Receiver<()>,
}

impl ChannelTicker {
    pub fn new() -> (flume::Sender<()>, Self) {
        let (tx, rx) = flume::unbounded();
        (tx, Self { rx })
    }
}

impl Ticker for ChannelTicker {
    async fn tick(&mut self) {
        if self.rx.recv_async().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Owns the session and is the only place it gets mutated
///
/// Key events and UI commands arrive over a channel and are applied between
/// ticks, so input never races with the game loop.
pub struct Runner<T = IntervalTicker, R = StdRng> {
    session: Session<R>,
    ticker: T,
    command_rx: flume::Receiver<Command>,
    command_tx: flume::Sender<Command>,
    // Keys to release after the next tick
    taps: Vec<Key>,
}

impl<R: Rng> Runner<IntervalTicker, R> {
    /// Runner ticking at the session's configured period.
    /// Must be called from within a tokio runtime.
    pub fn new(session: Session<R>) -> Self {
        let ticker = IntervalTicker::new(session.config().tick_interval());
        Self::with_ticker(session, ticker)
    }
}

impl<T: Ticker, R: Rng> Runner<T, R> {
    pub fn with_ticker(session: Session<R>, ticker: T) -> Self {
        let (command_tx, command_rx) = flume::unbounded();
        Self {
            session,
            ticker,
            command_rx,
            command_tx,
            taps: Vec::new(),
        }
    }

    /// Get a sender for sending commands to this runner
    pub fn sender(&self) -> flume::Sender<Command> {
        self.command_tx.clone()
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Wait for the next command or tick and apply it
    ///
    /// Pending commands are always handled before a tick.
    pub async fn step(&mut self) -> StepResult {
        tokio::select! {
            biased;
            command = self.command_rx.recv_async() => match command {
                Err(_) | Ok(Command::Quit) => {
                    tracing::info!("runner quitting");
                    StepResult::Stop
                }
                Ok(command) => self.apply(command),
            },
            () = self.ticker.tick() => {
                let outcome = self.session.tick();
                for key in self.taps.drain(..) {
                    self.session.key_up(key);
                }
                if outcome.redraw {
                    StepResult::Redraw(self.session.frame())
                } else {
                    StepResult::Idle
                }
            }
        }
    }

    fn apply(&mut self, command: Command) -> StepResult {
        tracing::debug!(?command, "applying command");
        match command {
            Command::Start => {
                self.taps.clear();
                self.session.start();
                StepResult::Redraw(self.session.frame())
            }
            Command::Stop => {
                self.session.stop();
                StepResult::Redraw(self.session.frame())
            }
            Command::KeyDown(key) => {
                self.session.key_down(key);
                StepResult::Idle
            }
            Command::KeyUp(key) => {
                self.session.key_up(key);
                StepResult::Idle
            }
            Command::Press(key) => {
                self.session.key_down(key);
                self.taps.push(key);
                StepResult::Idle
            }
            Command::Rotate(rotation) => {
                self.session.request_rotation(rotation);
                StepResult::Idle
            }
            Command::Quit => StepResult::Stop,
        }
    }
}
