//! Partitioned, concurrent batch generation.
//!
//! A [`DispatchPlan`] fixes the total count, the batch unit and the selected
//! versions. The [`Dispatcher`] validates it up front, then runs
//! `total / batch_unit` blocking workers per version and hands every finished
//! [`crate::Shard`] to a [`crate::ShardSink`].

mod dispatcher;
mod plan;
mod report;

pub use dispatcher::*;
pub use plan::*;
pub use report::*;
