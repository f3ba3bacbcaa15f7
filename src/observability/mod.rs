//! Observability for sheetapi
//!
//! Structured single-line JSON logs for lifecycle events, requests and
//! table mutations.
//!
//! ```ignore
//! use sheetapi::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RowAppended, &[("row", "4")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if event.is_error() {
        Logger::error(event.as_str(), fields);
    } else if event.is_warning() {
        Logger::warn(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}
