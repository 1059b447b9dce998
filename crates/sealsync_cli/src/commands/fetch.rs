//! Fetch command implementation.

use super::{print_record, Session};
use sealsync_client::SecureChannel;
use sealsync_protocol::Record;

/// Runs the fetch command.
pub fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let established = SecureChannel::<_, Record>::establish(
        session.config().clone(),
        session.client(),
        session.state()?,
    )?;
    print_record(&established.record)
}
