//! Core library for step-driven maze generation.
//! Defines the generation algorithms and the engine that advances one of
//! them a few atomic reports at a time, forwarding each batch of touched
//! entities to an external renderer.
//!
//! Everything here is single threaded and cooperatively scheduled: an
//! algorithm suspends after every atomic mutation, and the only source of
//! asynchronous resumption is the caller-supplied pacing collaborator that
//! decides when the next tick fires.

// Module declarations (keep public if they contain public items)
/// The execution engine driving one algorithm instance.
pub mod executor;
/// The maze generation algorithms and their shared step contract.
pub mod generator;

// Re-export core public items

/// The step-driving engine.
pub use crate::executor::Executor;
/// Engine configuration and its builder.
pub use crate::executor::{ExecutorConfig, ExecutorConfigBuilder};
/// Lifecycle state of an engine.
pub use crate::executor::ExecutorState;
/// Collaborator seams the environment implements.
pub use crate::executor::{Renderer, TickScheduler, TickToken};
/// The resumable algorithm contract.
pub use crate::generator::Generator;
/// Error type for generator steps.
pub use crate::generator::GeneratorError;
/// Names of the available algorithms.
pub use crate::generator::GeneratorKind;
/// One touched entity in a report batch.
pub use crate::generator::Highlight;

// The grid types appear in nearly every signature above, so spare callers
// the second import.
pub use maze_grid::{Boundary, CellId, GridError, GridGraph};
