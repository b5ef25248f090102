//! Unified error types for the shutter firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level boot path's error handling uniform. All variants are `Copy` so
//! they can be handed to the event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A component was configured with a channel outside the legal range.
    Channel(ChannelError),
    /// The host link failed or refused to accept output.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "channel: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The requested output/input channel does not exist on this chip.
    OutOfRange { channel: u8, max: u8 },
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { channel, max } => {
                write!(f, "channel {channel} out of range (max {max})")
            }
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The transport never reported enough free buffer space.
    TxTimeout,
    /// The wait for buffer space was cancelled.
    TxCancelled,
    /// The transport rejected or truncated a write.
    WriteFailed,
    /// The host never answered the `CONNECT` announcement.
    HandshakeTimeout,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TxTimeout => write!(f, "transmit buffer never drained"),
            Self::TxCancelled => write!(f, "transmit wait cancelled"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::HandshakeTimeout => write!(f, "host handshake timed out"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

impl From<crate::app::ports::ConfigError> for Error {
    fn from(e: crate::app::ports::ConfigError) -> Self {
        use crate::app::ports::ConfigError;
        Self::Config(match e {
            ConfigError::NotFound => "not found",
            ConfigError::Corrupted => "corrupted",
            ConfigError::ValidationFailed(msg) => msg,
            ConfigError::IoError => "storage I/O",
        })
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_error_converts_and_displays() {
        let e: Error = ChannelError::OutOfRange { channel: 60, max: 48 }.into();
        assert_eq!(e.to_string(), "channel: channel 60 out of range (max 48)");
    }

    #[test]
    fn comms_error_converts() {
        let e: Error = CommsError::TxTimeout.into();
        assert!(matches!(e, Error::Comms(CommsError::TxTimeout)));
    }

    #[test]
    fn config_validation_message_is_kept() {
        use crate::app::ports::ConfigError;
        let e: Error = ConfigError::ValidationFailed("baud").into();
        assert_eq!(e, Error::Config("baud"));
    }
}
