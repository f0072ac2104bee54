//! Line-based PIN pad
//!
//! Drives a reveal session from stdin: a line of digits is typed into the
//! pad and submitted, `f` asks to delete the record once the pad is locked
//! and `q` closes the session. Details are printed on verification and
//! hidden again when the disclosure window closes.

use anyhow::Result;
use cardvault_core::{notice, RecordId, PIN_LENGTH};
use cardvault_reveal::{rejection_text, PadResponse, RevealDriver, RevealEvent, RevealHandle};
use cardvault_store::{StoreClient, StoredRecord};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::output;

/// Lockout countdown is announced at this interval
const ANNOUNCE_EVERY_SECS: u64 = 10;

pub async fn run(client: &StoreClient, id: RecordId) -> Result<()> {
    let stored = client.get(id).await?;
    let Some(pin) = client.record_pin(id).await? else {
        // Documents stored without a PIN have no gate
        output::print_details(&stored, true);
        return Ok(());
    };

    let policy = client.reveal_policy();
    let (handle, mut events) = RevealDriver::spawn(id, pin, policy);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("Enter the 4-digit PIN for \"{}\"", stored.record.name());
    println!("  (f = forgot PIN once locked, q = close)");

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => on_input(&handle, &mut lines, line.trim()).await?,
                    None => {
                        stdin_open = false;
                        let _ = handle.cancel().await;
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                if on_event(client, &stored, event).await? {
                    break;
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn on_input<R>(
    handle: &RevealHandle,
    lines: &mut tokio::io::Lines<R>,
    input: &str,
) -> Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    match input {
        "" => {}
        "q" | "quit" => {
            let _ = handle.cancel().await;
        }
        "f" | "forgot" => {
            if !handle.view().forgot_pin_available {
                println!("Forgot PIN is only available while the pad is locked");
                return Ok(());
            }
            println!("Delete this record permanently? [y/N]");
            let answer = lines.next_line().await?.unwrap_or_default();
            if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                let _ = handle.forgot_pin().await;
            } else {
                println!("Kept. Wait for the lock to lift and try again.");
            }
        }
        digits if digits.chars().all(|c| c.is_ascii_digit()) => {
            let view = handle.view();
            if view.locked {
                println!(
                    "Locked. Try again in {} seconds.",
                    view.lock_remaining_seconds
                );
                return Ok(());
            }
            match submit_line(handle, digits).await {
                None | Some(PadResponse::Ignored) => {
                    println!("Enter exactly {} digits", PIN_LENGTH)
                }
                Some(_) => {}
            }
        }
        _ => println!("Type 4 digits, f or q"),
    }
    Ok(())
}

/// Type a whole line into the pad and submit it
///
/// Lines that are not exactly [`PIN_LENGTH`] digits never reach the pad.
async fn submit_line(handle: &RevealHandle, digits: &str) -> Option<PadResponse> {
    if digits.len() != PIN_LENGTH {
        return None;
    }
    if handle.view().visible {
        let _ = handle.reopen_pad().await;
    }
    let _ = handle.clear().await;
    let _ = handle.enter_pin(digits).await;
    handle.submit().await.ok()
}

/// Returns `true` once the session is over
async fn on_event(
    client: &StoreClient,
    stored: &StoredRecord,
    event: RevealEvent,
) -> Result<bool> {
    let kind = stored.record.kind();
    match event {
        RevealEvent::Verified => {
            output::print_notice(&notice::verified(
                kind,
                client.reveal_policy().disclosure.visibility.as_secs(),
            ));
            output::print_details(stored, true);
            println!("(q = hide now)");
        }
        RevealEvent::Rejected { attempts_remaining } => {
            println!("{}", rejection_text(attempts_remaining));
        }
        RevealEvent::Lockout { remaining_seconds } => {
            let full = client.reveal_policy().lockout.lockout_secs();
            if remaining_seconds == full {
                println!("Too many failed attempts. Locked for {} seconds.", full);
                println!("Forgot your PIN? Type f to delete this record.");
            } else if remaining_seconds % ANNOUNCE_EVERY_SECS == 0 {
                println!("  {} seconds remaining", remaining_seconds);
            }
        }
        RevealEvent::Unlocked => println!("Unlocked. Enter the PIN:"),
        RevealEvent::DisclosureExpired => {
            output::print_notice(&notice::expired(kind));
            output::print_details(stored, false);
        }
        RevealEvent::DeleteRequested { record_id } => {
            match client.delete(record_id).await {
                Ok(()) => output::print_notice(&notice::deleted(kind)),
                Err(e) => {
                    warn!("Delete failed: {}", e);
                    println!("Failed to delete the record: {}", e);
                }
            }
            return Ok(true);
        }
        RevealEvent::Cancelled => return Ok(true),
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::Pin;
    use cardvault_reveal::RevealPolicy;

    #[tokio::test]
    async fn test_line_longer_than_pin_is_not_submitted() {
        let (handle, _events) = RevealDriver::spawn(
            RecordId::new(),
            Pin::new("4321").unwrap(),
            RevealPolicy::default(),
        );

        assert_eq!(submit_line(&handle, "43219").await, None);
        assert_eq!(submit_line(&handle, "432").await, None);
        let view = handle.view();
        assert_eq!(view.attempt_count, 0);
        assert_eq!(view.entered_digit_count, 0);
        assert!(!view.visible);

        assert_eq!(
            submit_line(&handle, "4321").await,
            Some(PadResponse::Verified)
        );
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_line_counts_one_attempt() {
        let (handle, _events) = RevealDriver::spawn(
            RecordId::new(),
            Pin::new("4321").unwrap(),
            RevealPolicy::default(),
        );

        assert_eq!(
            submit_line(&handle, "1234").await,
            Some(PadResponse::Rejected {
                attempts_remaining: 2
            })
        );
        assert_eq!(handle.view().attempt_count, 1);
        handle.shutdown().await;
    }
}
