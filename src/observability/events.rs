//! Observable events
//!
//! Every line the service logs names one of these.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    /// No config file found, defaults in use
    ConfigDefaulted,
    ServerListening,
    ShutdownStart,
    ShutdownComplete,

    // Requests
    RequestHandled,

    // Table mutations
    RowAppended,
    RowUpdated,
    RowDeleted,
    /// Keyed lookup matched nothing
    RowNotFound,
    TableReplaced,
    TableInitialized,
    /// Configured table file absent at boot
    TableMissing,
    /// Store failure surfaced to a client as a server error
    TableError,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RequestHandled => "REQUEST_HANDLED",
            Event::RowAppended => "ROW_APPENDED",
            Event::RowUpdated => "ROW_UPDATED",
            Event::RowDeleted => "ROW_DELETED",
            Event::RowNotFound => "ROW_NOT_FOUND",
            Event::TableReplaced => "TABLE_REPLACED",
            Event::TableInitialized => "TABLE_INITIALIZED",
            Event::TableMissing => "TABLE_MISSING",
            Event::TableError => "TABLE_ERROR",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Event::TableError)
    }

    /// Returns true if this event reports a degraded but running state
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::TableMissing | Event::RowNotFound)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
