//! Verify command implementation.

use super::{print_record, Session};
use sealsync_client::Reconciler;

/// Runs the verify command.
///
/// With `restore`, a diverged local record is resubmitted as the
/// authoritative one.
pub fn run(session: &Session, restore: bool) -> Result<(), Box<dyn std::error::Error>> {
    let channel = session.open()?;
    let Some(local) = channel.local_record()? else {
        println!("No local record; run `sealsync fetch` first.");
        return Ok(());
    };
    let mut reconciler = Reconciler::with_channel(channel, local);

    match reconciler.check() {
        Ok(true) => {
            println!("Local record matches the server.");
            return Ok(());
        }
        Ok(false) => println!("Local record failed verification."),
        Err(e) if e.is_integrity_violation() => println!("Local record diverged: {e}"),
        Err(e) => return Err(e.into()),
    }

    if let Some(last_known) = reconciler.validity().last_known_record() {
        println!("Last known record:");
        print_record(&last_known)?;
    }
    if !restore {
        println!("Run `sealsync verify --restore` to resubmit it.");
        return Err("local record is out of sync".into());
    }

    match reconciler.restore()? {
        Some(record) => {
            println!("Restored:");
            print_record(record)
        }
        None => Ok(()),
    }
}
