//! Command decoding — one whitespace-delimited integer token per poll.
//!
//! Wire format (ASCII):
//! ```text
//!   8\n          → OpenAll        (codes are configurable)
//!   16           → CloseAll       (undelimited: completes after read_timeout_ms)
//!   7            → ERROR: invalid value received... got '7'
//!   1000000      → ERROR: unknown command id: 1000000
//! ```
//!
//! Only positive even integers are command codes; odd and non-positive
//! values are reserved, so anything else is treated as line noise.
//!
//! The channel keeps no state between polls. Bytes are pulled one at a
//! time, so whatever follows the current token stays in the transport for
//! the next cycle.

use core::fmt::{self, Write as _};

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};
use log::{debug, warn};

use crate::app::commands::Command;
use crate::config::{CommandCodes, LineEnding, SerialConfig};

use super::transport::Transport;
use super::write_line;

/// Longest token kept for decoding; longer runs are drained and classified
/// from their shape. Wide enough for any `i128` with a sign.
pub const MAX_TOKEN_LEN: usize = 40;

/// Id echoed in an unknown-command report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandId {
    Value(i128),
    /// Leading digits of a code too large for `i128`.
    Digits(String<MAX_TOKEN_LEN>),
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Digits(d) => write!(f, "{}...", d),
        }
    }
}

/// Why an inbound token was not executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Not an integer, not positive, or odd. Carries a printable copy of
    /// the token (truncated to [`MAX_TOKEN_LEN`]).
    InvalidValue(String<MAX_TOKEN_LEN>),
    /// Positive and even but not a recognised command code.
    UnknownCommand(CommandId),
}

impl ProtocolError {
    fn invalid(token: &[u8]) -> Self {
        let mut printable = String::new();
        for &b in token.iter().take(MAX_TOKEN_LEN) {
            let c = if b.is_ascii_graphic() { b as char } else { '?' };
            // Bounded by the take() above.
            let _ = printable.push(c);
        }
        Self::InvalidValue(printable)
    }

    /// A positive digit run past `i128`: parity comes from the last digit.
    fn long_digits(prefix: &[u8], last: u8) -> Self {
        if (last - b'0') % 2 != 0 {
            return Self::invalid(prefix);
        }
        let digits = prefix.strip_prefix(b"+").unwrap_or(prefix);
        let start = digits.iter().position(|&b| b != b'0').unwrap_or(digits.len());
        let mut id = String::new();
        for &b in digits[start..].iter().take(MAX_TOKEN_LEN) {
            // Bounded by the take() above.
            let _ = id.push(b as char);
        }
        Self::UnknownCommand(CommandId::Digits(id))
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(token) => {
                write!(f, "ERROR: invalid value received... got '{}'", token)
            }
            Self::UnknownCommand(id) => write!(f, "ERROR: unknown command id: {}", id),
        }
    }
}

/// Digit-run shape of a token, tracked byte by byte.
#[derive(Debug, Clone, Copy)]
struct Shape {
    len: usize,
    digits_only: bool,
    nonzero: bool,
    last: u8,
}

impl Shape {
    const fn new() -> Self {
        Self {
            len: 0,
            digits_only: true,
            nonzero: false,
            last: 0,
        }
    }

    fn of(token: &[u8]) -> Self {
        let mut shape = Self::new();
        for &b in token {
            shape.push(b);
        }
        shape
    }

    fn push(&mut self, b: u8) {
        let sign = self.len == 0 && b == b'+';
        self.digits_only &= sign || b.is_ascii_digit();
        self.nonzero |= matches!(b, b'1'..=b'9');
        self.last = b;
        self.len += 1;
    }

    /// Positive integer written with digits only (optional leading `+`).
    fn is_positive_digits(&self) -> bool {
        self.digits_only && self.nonzero
    }
}

/// Decode one complete token against the configured command codes.
pub fn decode_token(token: &[u8], codes: &CommandCodes) -> Result<Command, ProtocolError> {
    let value = core::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<i128>().ok());

    match value {
        Some(v) if v > 0 && v % 2 == 0 => u32::try_from(v)
            .ok()
            .and_then(|code| codes.lookup(code))
            .ok_or(ProtocolError::UnknownCommand(CommandId::Value(v))),
        Some(_) => Err(ProtocolError::invalid(token)),
        None => {
            let shape = Shape::of(token);
            if shape.is_positive_digits() {
                Err(ProtocolError::long_digits(token, shape.last))
            } else {
                Err(ProtocolError::invalid(token))
            }
        }
    }
}

/// Raw token as pulled from the transport.
struct Token {
    bytes: Vec<u8, MAX_TOKEN_LEN>,
    shape: Shape,
}

impl Token {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            shape: Shape::new(),
        }
    }

    fn push(&mut self, b: u8) {
        // Bytes past the buffer only update the shape.
        let _ = self.bytes.push(b);
        self.shape.push(b);
    }

    fn is_empty(&self) -> bool {
        self.shape.len == 0
    }

    fn decode(&self, codes: &CommandCodes) -> Result<Command, ProtocolError> {
        if self.shape.len <= MAX_TOKEN_LEN {
            return decode_token(&self.bytes, codes);
        }
        if self.shape.is_positive_digits() {
            Err(ProtocolError::long_digits(&self.bytes, self.shape.last))
        } else {
            Err(ProtocolError::invalid(&self.bytes))
        }
    }
}

/// Polls the host link for the next command.
pub struct CommandChannel {
    codes: CommandCodes,
    read_timeout_ms: u32,
    line_ending: LineEnding,
}

impl CommandChannel {
    pub fn new(codes: CommandCodes, serial: &SerialConfig) -> Self {
        Self {
            codes,
            read_timeout_ms: serial.read_timeout_ms,
            line_ending: serial.line_ending,
        }
    }

    /// Decode at most one pending command.
    ///
    /// * nothing pending → `Ok(Command::None)`, no output, no wait
    /// * recognised code → `Ok(command)`
    /// * rejected token → the matching `ERROR:` line is written to the
    ///   host and the error is returned; the caller treats it as `None`
    pub fn poll<T: Transport>(
        &self,
        serial: &mut T,
        delay: &mut impl DelayNs,
    ) -> Result<Command, ProtocolError> {
        let token = match self.read_token(serial, delay) {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(Command::None),
            Err(e) => {
                warn!("CommandChannel: read failed: {:?}", e);
                return Ok(Command::None);
            }
        };

        match token.decode(&self.codes) {
            Ok(cmd) => {
                debug!("CommandChannel: decoded {:?}", cmd);
                Ok(cmd)
            }
            Err(err) => {
                self.report(serial, &err);
                Err(err)
            }
        }
    }

    pub fn codes(&self) -> &CommandCodes {
        &self.codes
    }

    fn read_token<T: Transport>(
        &self,
        serial: &mut T,
        delay: &mut impl DelayNs,
    ) -> Result<Option<Token>, T::Error> {
        let mut token = Token::new();
        let mut idle_ms = 0;

        loop {
            let mut byte = [0u8; 1];
            if serial.read(&mut byte)? == 0 {
                // An undelimited token gets read_timeout_ms for its next byte.
                if token.is_empty() || idle_ms >= self.read_timeout_ms {
                    break;
                }
                delay.delay_ms(1);
                idle_ms += 1;
                continue;
            }
            idle_ms = 0;

            if byte[0].is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                break;
            }
            token.push(byte[0]);
        }

        Ok(if token.is_empty() { None } else { Some(token) })
    }

    fn report<T: Transport>(&self, serial: &mut T, err: &ProtocolError) {
        let mut line: String<80> = String::new();
        if write!(line, "{}", err).is_err() {
            warn!("CommandChannel: error line truncated");
        }
        if let Err(e) = write_line(serial, &line, self.line_ending) {
            warn!("CommandChannel: could not report '{}': {}", line, e);
        }
    }
}
