//! Send command implementation.

use super::{print_record, Session};
use sealsync_protocol::Record;

/// Runs the send command.
pub fn run(session: &Session, data: String) -> Result<(), Box<dyn std::error::Error>> {
    let channel = session.open()?;
    let stored = channel.send(&Record::new(data))?;
    print_record(&stored)
}
