//! Structured security event logging.
//!
//! Every security-relevant transition in the service emits one event
//! through the [`security_event!`](crate::security_event) macro, which tags
//! the log record with the event name, its category, and a severity that
//! picks the tracing level. Filtering `security_event` in log aggregation
//! gives a complete audit trail without scraping free-form messages.

use std::fmt;

/// The security-relevant transitions this service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    /// A bearer token was verified and its identity attached.
    AuthenticationSuccess,
    /// Credentials or a bearer token were rejected.
    AuthenticationFailure,
    /// The admin gate refused a request.
    AccessDenied,
    /// Login succeeded and a token was signed.
    TokenIssued,
    /// A new account entered the directory.
    UserRegistered,
    /// An account left the directory.
    UserDeleted,
    /// An account's password was overwritten.
    PasswordChanged,
    /// The service began listening.
    SystemStartup,
    /// The service is draining and stopping.
    SystemShutdown,
}

impl SecurityEvent {
    /// Grouping key for filtering related events.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess | Self::AuthenticationFailure | Self::TokenIssued => {
                "authentication"
            }
            Self::AccessDenied => "authorization",
            Self::UserRegistered | Self::UserDeleted | Self::PasswordChanged => "user_management",
            Self::SystemStartup | Self::SystemShutdown => "system",
        }
    }

    /// How loudly the event should be logged.
    pub fn severity(&self) -> Severity {
        match self {
            Self::AuthenticationFailure | Self::AccessDenied => Severity::High,
            Self::AuthenticationSuccess
            | Self::TokenIssued
            | Self::UserRegistered
            | Self::UserDeleted
            | Self::PasswordChanged => Severity::Medium,
            Self::SystemStartup | Self::SystemShutdown => Severity::Low,
        }
    }

    /// Stable snake_case name recorded in the log field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess => "authentication_success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::AccessDenied => "access_denied",
            Self::TokenIssued => "token_issued",
            Self::UserRegistered => "user_registered",
            Self::UserDeleted => "user_deleted",
            Self::PasswordChanged => "password_changed",
            Self::SystemStartup => "system_startup",
            Self::SystemShutdown => "system_shutdown",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Severity tiers, ordered from routine to urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Emit a security event with structured fields.
///
/// The record always carries `security_event`, `category`, and `severity`;
/// callers add whatever context they have (`username`, `reason`, `path`).
/// Severity picks the tracing level: high → warn, medium → info, low →
/// debug.
///
/// ```ignore
/// security_event!(
///     SecurityEvent::AuthenticationFailure,
///     reason = "bad credentials",
///     username = username.as_str()
/// );
/// ```
#[macro_export]
macro_rules! security_event {
    ($event:expr $(, $($field:tt)*)?) => {{
        let event = $event;
        match event.severity() {
            $crate::observability::Severity::High => {
                ::tracing::warn!(
                    security_event = event.name(),
                    category = event.category(),
                    severity = "high",
                    $($($field)*)?
                );
            }
            $crate::observability::Severity::Medium => {
                ::tracing::info!(
                    security_event = event.name(),
                    category = event.category(),
                    severity = "medium",
                    $($($field)*)?
                );
            }
            $crate::observability::Severity::Low => {
                ::tracing::debug!(
                    security_event = event.name(),
                    category = event.category(),
                    severity = "low",
                    $($($field)*)?
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_high_severity() {
        assert_eq!(SecurityEvent::AuthenticationFailure.severity(), Severity::High);
        assert_eq!(SecurityEvent::AccessDenied.severity(), Severity::High);
    }

    #[test]
    fn names_are_snake_case() {
        for event in [
            SecurityEvent::AuthenticationSuccess,
            SecurityEvent::AuthenticationFailure,
            SecurityEvent::AccessDenied,
            SecurityEvent::TokenIssued,
            SecurityEvent::UserRegistered,
            SecurityEvent::UserDeleted,
            SecurityEvent::PasswordChanged,
            SecurityEvent::SystemStartup,
            SecurityEvent::SystemShutdown,
        ] {
            let name = event.name();
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
            assert_eq!(event.to_string(), name);
        }
    }

    #[test]
    fn severity_ordering_is_usable_for_thresholds() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn categories_cover_all_events() {
        assert_eq!(SecurityEvent::TokenIssued.category(), "authentication");
        assert_eq!(SecurityEvent::AccessDenied.category(), "authorization");
        assert_eq!(SecurityEvent::UserDeleted.category(), "user_management");
        assert_eq!(SecurityEvent::SystemStartup.category(), "system");
    }
}
