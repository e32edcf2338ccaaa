//! One logging method per syslog severity.
//!
//! Each method forwards to [`GelfLogger::log`] with a fixed level.

use crate::field_value::FieldValue;
use crate::gelf_handler::DatagramSink;
use crate::level::GelfLevel;

use super::GelfLogger;

macro_rules! severity_methods {
    ($($(#[$meta:meta])* $name:ident => $level:expr;)*) => {
        impl<S: DatagramSink> GelfLogger<S> {
            $(
                $(#[$meta])*
                pub fn $name<I, K, V>(&self, message: &str, context: I) -> bool
                where
                    I: IntoIterator<Item = (K, V)>,
                    K: AsRef<str>,
                    V: Into<FieldValue>,
                {
                    self.log($level, message, context)
                }
            )*
        }
    };
}

severity_methods! {
    /// System is unusable.
    emergency => GelfLevel::Emergency;
    /// Action must be taken immediately.
    alert => GelfLevel::Alert;
    /// Critical conditions, such as an unavailable component.
    critical => GelfLevel::Critical;
    /// Runtime errors that need monitoring but no immediate action.
    error => GelfLevel::Error;
    /// Exceptional occurrences that are not errors.
    warning => GelfLevel::Warning;
    /// Normal but significant events.
    notice => GelfLevel::Notice;
    /// Interesting events.
    info => GelfLevel::Info;
    /// Detailed debug information.
    debug => GelfLevel::Debug;
}
