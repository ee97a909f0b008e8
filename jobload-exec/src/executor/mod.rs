mod coordinator;
pub mod events;
mod generator_loop;
pub mod reporter;
mod result;
mod types;

pub use coordinator::Coordinator;
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
pub use reporter::{AggregateStats, ResultReporter, VariantTotals};
pub use result::{CoordinatorError, GeneratorError};
pub use types::{GeneratorOutcome, RunReport, StopReason};
