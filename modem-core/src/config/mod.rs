//! Modem configuration record consumed by the power controller.
//!
//! The record mirrors the attribute set of the external configuration source:
//! an optional `power` switch and an optional `at_protocol` switch that
//! defaults to on. How the attributes reach this record (config files, debug
//! console) is the host's concern.

/// Snapshot of the configuration attributes relevant to power control.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ModemConfig {
    /// Operator-requested power state, absent when the operator does not care.
    pub power: Option<bool>,
    /// Whether the AT command protocol path is expected to be up.
    pub at_protocol: Option<bool>,
}

impl ModemConfig {
    /// Configuration with neither attribute present.
    #[must_use]
    pub const fn unspecified() -> Self {
        Self {
            power: None,
            at_protocol: None,
        }
    }

    /// Configuration requesting the modem powered on.
    #[must_use]
    pub const fn power_on() -> Self {
        Self {
            power: Some(true),
            at_protocol: None,
        }
    }

    /// Configuration requesting a hard power-down.
    ///
    /// Powering down via the power key is honored only while the AT protocol
    /// path is disabled, so the hard-off request clears both attributes.
    #[must_use]
    pub const fn power_off() -> Self {
        Self {
            power: Some(false),
            at_protocol: Some(false),
        }
    }

    /// Replaces the `at_protocol` attribute.
    #[must_use]
    pub const fn with_at_protocol(mut self, enabled: bool) -> Self {
        self.at_protocol = Some(enabled);
        self
    }

    /// Effective `at_protocol` value, defaulting to enabled when absent.
    #[must_use]
    pub const fn at_protocol(&self) -> bool {
        match self.at_protocol {
            Some(value) => value,
            None => true,
        }
    }
}
