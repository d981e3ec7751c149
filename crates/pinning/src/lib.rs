//! Pinning orchestration: strategy dispatch, bounded retry, delayed-pin
//! queueing, and independent backup fan-out.

pub mod coordinator;
pub mod error;
pub mod processor;
pub mod queue;

pub use coordinator::{
    BackupOutcome, PinOptions, PinOutcome, PinStatusReport, PinningCoordinator, UnpinOptions,
    UnpinOutcome,
};
pub use error::{PinError, PinResult};
pub use processor::{spawn_processor, ProcessorHandle};
pub use queue::PinQueue;
