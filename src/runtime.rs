use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::food::FoodId;
use crate::game::{GameOver, GameOverCause, GameState, TickOutcome};
use crate::input::Signal;
use crate::snake::Direction;
use crate::term::Screen;

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub tick: Duration,
    pub food_ttl: Duration,
    /// How long the game-over message stays up.
    pub linger: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            tick: Duration::from_millis(50),
            food_ttl: Duration::from_secs(5),
            linger: Duration::from_millis(1500),
        }
    }
}

/// Forwards OS interrupts to the driver loop.
pub fn spawn_interrupt_handler(signals: mpsc::UnboundedSender<Signal>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("unable to listen for interrupts: {}", e);
                return;
            }
            info!("interrupt received");
            if signals.send(Signal::Interrupt).is_err() {
                return;
            }
        }
    });
}

fn schedule_expiry(id: FoodId, ttl: Duration, expired: mpsc::UnboundedSender<FoodId>) {
    let deadline = Instant::now() + ttl;
    tokio::spawn(async move {
        time::sleep_until(deadline).await;
        let _ = expired.send(id);
    });
}

/// Ticks `game` at a fixed cadence until it ends, then shows the final
/// score. All game mutation happens on this task.
pub async fn run<S: Screen>(
    game: &mut GameState,
    screen: &mut S,
    mut heading: watch::Receiver<Option<Direction>>,
    mut signals: mpsc::UnboundedReceiver<Signal>,
    config: &RunConfig,
) -> Result<GameOver> {
    let (expired_tx, mut expired_rx) = mpsc::unbounded_channel();
    let mut signals_open = true;

    let mut interval = time::interval(config.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let over = loop {
        tokio::select! {
            biased;

            signal = signals.recv(), if signals_open => match signal {
                Some(Signal::Interrupt) => {
                    if let Some(over) = game.end(GameOverCause::Interrupted) {
                        break over;
                    }
                }
                Some(Signal::InputFailed(err)) => return Err(err),
                None => signals_open = false,
            },

            Some(id) = expired_rx.recv() => game.expire_food(id),

            _ = interval.tick() => {
                if heading.has_changed().unwrap_or(false) {
                    if let Some(dir) = *heading.borrow_and_update() {
                        game.request_direction(dir);
                    }
                }

                let board = screen.board()?;
                match game.tick(&board) {
                    TickOutcome::Running { .. } => {
                        screen.draw_frame(&board, &game.snapshot())?;
                        for id in game.arm_observed_food() {
                            debug!("arming expiry for food {:?}", id);
                            schedule_expiry(id, config.food_ttl, expired_tx.clone());
                        }
                    }
                    TickOutcome::GameOver(over) => break over,
                }
            }
        }
    };

    screen.show_game_over(&over)?;
    time::sleep(config.linger).await;
    Ok(over)
}
