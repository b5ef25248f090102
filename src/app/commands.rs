//! Inbound commands to the application service.
//!
//! Decoded from the host link by the
//! [`CommandChannel`](crate::serial::command::CommandChannel), one per cycle.

use crate::config::CommandCodes;

/// Commands the host can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing pending (or the pending input was rejected).
    None,
    /// Open every shutter fully.
    OpenAll,
    /// Close every shutter fully.
    CloseAll,
    /// Report temperature and light on the host link.
    SendInfo,
}

impl CommandCodes {
    /// Map a wire code to its command, if it is recognised.
    pub fn lookup(&self, code: u32) -> Option<Command> {
        if code == self.open_all {
            Some(Command::OpenAll)
        } else if code == self.close_all {
            Some(Command::CloseAll)
        } else if code == self.send_info {
            Some(Command::SendInfo)
        } else {
            None
        }
    }

    /// Wire code for `command`; `None` has no encoding.
    pub fn code_for(&self, command: Command) -> Option<u32> {
        match command {
            Command::None => None,
            Command::OpenAll => Some(self.open_all),
            Command::CloseAll => Some(self.close_all),
            Command::SendInfo => Some(self.send_info),
        }
    }
}
