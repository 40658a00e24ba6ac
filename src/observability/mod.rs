//! Observability for evstats
//!
//! - Structured JSON logs on stderr
//! - Typed lifecycle events
//! - Begin/complete scopes for long-running operations
//!
//! Observability is read-only: it never changes a result and never fails
//! an operation.
//!
//! ```ignore
//! use evstats::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LoadBatchFlushed, &[("batch", "3")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
