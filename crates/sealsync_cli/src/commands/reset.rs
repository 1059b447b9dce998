//! Reset command implementation.

use super::{print_record, Session};

/// Runs the reset command.
pub fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let channel = session.open()?;
    let established = channel.reset()?;
    println!("Local state cleared; new signing key generated.");
    print_record(&established.record)
}
