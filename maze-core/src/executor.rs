use log::{debug, info, warn};
use maze_grid::GridGraph;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::generator::{Generator, GeneratorError, GeneratorKind, Highlight};

/// Receives one batch of touched entities after every engine advance.
///
/// The renderer only observes: it re-reads wall state from the graph it is
/// handed and never mutates it. An empty batch means the engine advanced
/// with nothing new to show, as when stepping an already finished run.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer {
    /// Called with the current graph and the entities touched since the
    /// previous call, in the order the algorithm touched them.
    fn render(&mut self, graph: &GridGraph, highlights: &[Highlight]);
}

/// Schedules engine continuations on an external timing source.
///
/// The engine mints a fresh [`TickToken`] for every continuation it wants
/// and expects the environment to call [`Executor::tick`] with that token
/// when the pacing source fires. `cancel` withdraws a token that must no
/// longer fire. What "later" means (a timer, an animation frame, an
/// immediate queue) is entirely up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait TickScheduler {
    /// Asks for `tick(token)` to be delivered when the pacing source fires.
    fn schedule(&mut self, token: TickToken);
    /// Withdraws a previously scheduled token before it fires.
    fn cancel(&mut self, token: TickToken);
}

/// Identifies one scheduled continuation.
///
/// Tokens are unique within an engine. A token delivered after `stop`,
/// after `reset`, or after the continuation it belonged to was superseded
/// no longer matches the pending one and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickToken(u64);

/// Lifecycle of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutorState {
    /// No algorithm instance exists yet.
    #[default]
    Idle,
    /// An instance exists and has not exhausted its step sequence.
    Running,
    /// The instance finished; terminal until `reset`.
    Finished,
}

/// Configuration options for the executor.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutorConfig {
    /// Which algorithm to run.
    pub kind: GeneratorKind,
    /// Atomic reports consumed per `run`/`tick` advance.
    pub steps_per_tick: usize,
    /// Seed for the generator's randomness; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl ExecutorConfig {
    /// Creates a new builder for `ExecutorConfig`.
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::default(),
            steps_per_tick: 1,
            seed: None,
        }
    }
}

/// Builder for `ExecutorConfig`.
#[derive(Default)]
pub struct ExecutorConfigBuilder {
    kind: Option<GeneratorKind>,
    steps_per_tick: Option<usize>,
    seed: Option<u64>,
}

impl ExecutorConfigBuilder {
    /// Sets the algorithm to run.
    pub fn kind(mut self, kind: GeneratorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets how many atomic reports one `run`/`tick` advance consumes.
    /// Clamped to at least 1.
    pub fn steps_per_tick(mut self, steps: usize) -> Self {
        self.steps_per_tick = Some(steps);
        self
    }

    /// Sets the seed for the generator's randomness.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the `ExecutorConfig` instance.
    pub fn build(self) -> ExecutorConfig {
        ExecutorConfig {
            kind: self.kind.unwrap_or_default(),
            steps_per_tick: self.steps_per_tick.unwrap_or(1).max(1),
            seed: self.seed,
        }
    }
}

/// Drives one generation algorithm a few atomic reports at a time.
///
/// The executor owns the grid, both collaborators, and at most one live
/// algorithm instance, built lazily on the first advance. Every control
/// operation takes `&mut self`, so two drivers cannot interleave inside an
/// advance; a continuation that fires out of turn is caught by its stale
/// token instead.
pub struct Executor {
    graph: GridGraph,
    renderer: Box<dyn Renderer>,
    scheduler: Box<dyn TickScheduler>,
    config: ExecutorConfig,
    generator: Option<Box<dyn Generator>>,
    state: ExecutorState,
    autoplay: bool,
    pending: Option<TickToken>,
    next_token: u64,
    steps: u64,
}

impl Executor {
    /// Creates an idle executor that will generate into `graph`.
    pub fn new(
        graph: GridGraph,
        renderer: Box<dyn Renderer>,
        scheduler: Box<dyn TickScheduler>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            graph,
            renderer,
            scheduler,
            config,
            generator: None,
            state: ExecutorState::Idle,
            autoplay: false,
            pending: None,
            next_token: 0,
            steps: 0,
        }
    }

    /// Advances the run by `n` atomic reports (fewer if it finishes first)
    /// and renders the combined batch.
    ///
    /// Stepping a finished run renders an empty batch and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the generator's error unchanged; nothing is rendered for a
    /// failed advance.
    pub fn step(&mut self, n: usize) -> Result<(), GeneratorError> {
        self.advance(n)
    }

    /// Starts autoplay: advances one batch immediately, then keeps
    /// requesting continuations from the scheduler until the run finishes
    /// or [`Executor::stop`] is called.
    ///
    /// Calling `run` while autoplay is already engaged does nothing.
    pub fn run(&mut self) -> Result<(), GeneratorError> {
        if self.autoplay {
            debug!("run requested while already running");
            return Ok(());
        }
        self.autoplay = true;
        self.advance(self.config.steps_per_tick)
    }

    /// Delivers a scheduled continuation.
    ///
    /// Only the currently pending token advances the run; any other token
    /// belongs to a cancelled or superseded continuation and is dropped.
    pub fn tick(&mut self, token: TickToken) -> Result<(), GeneratorError> {
        match self.pending {
            Some(pending) if pending == token => {
                self.pending = None;
                self.advance(self.config.steps_per_tick)
            }
            _ => {
                warn!("ignoring stale tick token {:?}", token);
                Ok(())
            }
        }
    }

    /// Cancels any pending continuation without discarding progress.
    ///
    /// A later `run` or `step` resumes exactly where stepping left off.
    pub fn stop(&mut self) {
        self.autoplay = false;
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
            debug!("cancelled pending tick {:?}", token);
        }
    }

    /// Stops the run, discards the algorithm instance, and reopens every
    /// wall, returning the executor to `Idle`.
    ///
    /// One cleared frame is rendered so the collaborator observes the
    /// wipe.
    pub fn reset(&mut self) {
        self.stop();
        self.generator = None;
        self.state = ExecutorState::Idle;
        self.steps = 0;
        self.graph.set_all_walls(false);
        debug!("executor reset to idle");
        self.renderer.render(&self.graph, &[]);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Whether autoplay is engaged.
    pub fn is_running(&self) -> bool {
        self.autoplay
    }

    /// Atomic reports consumed so far in this run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The grid being generated into.
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    fn advance(&mut self, n: usize) -> Result<(), GeneratorError> {
        if self.state == ExecutorState::Finished {
            self.autoplay = false;
            self.renderer.render(&self.graph, &[]);
            return Ok(());
        }

        if self.generator.is_none() {
            let rng: Box<dyn RngCore> = match self.config.seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(StdRng::from_entropy()),
            };
            self.generator = Some(self.config.kind.build(rng));
            self.state = ExecutorState::Running;
            info!(
                "starting {:?} generation on a {}x{} grid",
                self.config.kind, self.graph.width, self.graph.height
            );
        }

        let mut batch: Vec<Highlight> = Vec::new();
        let mut finished = false;
        if let Some(generator) = self.generator.as_mut() {
            for _ in 0..n {
                match generator.step(&mut self.graph)? {
                    Some(touched) => {
                        self.steps += 1;
                        batch.extend(touched);
                    }
                    None => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        self.renderer.render(&self.graph, &batch);

        if finished {
            self.state = ExecutorState::Finished;
            self.autoplay = false;
            self.generator = None;
            // A continuation can still be pending when a manual step
            // finishes the run; it must never fire.
            if let Some(stale) = self.pending.take() {
                self.scheduler.cancel(stale);
            }
            info!("generation finished after {} reports", self.steps);
        } else if self.autoplay {
            if let Some(superseded) = self.pending.take() {
                self.scheduler.cancel(superseded);
            }
            let token = self.mint_token();
            self.pending = Some(token);
            self.scheduler.schedule(token);
        }
        Ok(())
    }

    fn mint_token(&mut self) -> TickToken {
        self.next_token += 1;
        TickToken(self.next_token)
    }
}
