use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::ERROR_COOLDOWN_SECS;
use crate::api::{DiscogsClient, FetchError};
use crate::config::Credentials;
use crate::notify::{Notifier, Priority};
use crate::types::Listing;

/// Notification title for a newly listed copy.
const LISTING_TITLE: &str = "💿 New Mk.gee - Fool Vinyl Listed!";

/// Notification title for the startup message.
const STARTUP_TITLE: &str = "Discogs Monitor Started";

/// Polls the marketplace and notifies on listings not seen before.
///
/// Owns all mutable state: the seen-set grows for the process lifetime and
/// resets on restart, so a relisted id never re-notifies within one run but
/// may after a restart. The running flag is written only by the signal
/// listener and read here at the top of each cycle and once per sleep second.
pub struct Monitor {
    api: DiscogsClient,
    notifier: Notifier,
    seen: HashSet<String>,
    running: Arc<AtomicBool>,
    release_id: String,
    poll_interval_secs: u64,
}

impl Monitor {
    pub fn new(
        credentials: &Credentials,
        running: Arc<AtomicBool>,
        release_id: String,
        poll_interval_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            api: DiscogsClient::new(&credentials.discogs_api_key)?,
            notifier: Notifier::new(credentials),
            seen: HashSet::new(),
            running,
            release_id,
            poll_interval_secs,
        })
    }

    /// Run until the running flag clears.
    pub async fn run(&mut self) {
        info!("Starting monitor for release ID {}", self.release_id);
        self.notifier
            .send(
                STARTUP_TITLE,
                &format!(
                    "Successfully deployed and monitoring release {} for new vinyl listings",
                    self.release_id
                ),
                None,
                Priority::Silent,
            )
            .await;

        while self.running.load(Ordering::Relaxed) {
            match self.poll_cycle().await {
                Ok(()) => self.sleep_interruptible(self.poll_interval_secs).await,
                Err(e) => {
                    error!("Unexpected error: {e:#}");
                    self.sleep_interruptible(ERROR_COOLDOWN_SECS).await;
                }
            }
        }

        info!("Monitor stopped");
    }

    /// One fetch-and-process pass.
    ///
    /// Transport and HTTP-status failures are absorbed here and the loop
    /// keeps its normal schedule; anything else escapes to the caller, which
    /// applies the error cooldown instead.
    async fn poll_cycle(&mut self) -> Result<()> {
        let listings = match self.api.fetch_listings(&self.release_id).await {
            Ok(listings) => listings,
            Err(e @ (FetchError::Transport(_) | FetchError::Status { .. })) => {
                error!("Error checking listings: {e}");
                return Ok(());
            }
            Err(e @ FetchError::Decode(_)) => return Err(e.into()),
        };

        if listings.is_empty() {
            info!("No listings found for release {}", self.release_id);
            return Ok(());
        }

        self.process_listings(listings).await;
        Ok(())
    }

    /// Notify for every listing not seen before, in API order.
    async fn process_listings(&mut self, listings: Vec<Listing>) {
        info!("Found {} listings", listings.len());

        for listing in self.filter_new(listings) {
            info!("New listing found: {}", listing.id);
            self.notifier
                .send(
                    LISTING_TITLE,
                    &listing_message(&listing),
                    listing.url.as_deref(),
                    Priority::High,
                )
                .await;
        }
    }

    /// Drop listings whose id is already in the seen-set, recording the rest.
    /// Membership is permanent for the process lifetime.
    fn filter_new(&mut self, listings: Vec<Listing>) -> Vec<Listing> {
        listings
            .into_iter()
            .filter(|listing| self.seen.insert(listing.id.clone()))
            .collect()
    }

    /// Sleep for `secs`, waking every second to honor a shutdown request.
    async fn sleep_interruptible(&self, secs: u64) {
        for _ in 0..secs {
            if !self.running.load(Ordering::Relaxed) {
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// Three-line notification body for a listing.
fn listing_message(listing: &Listing) -> String {
    format!(
        "Price: {} {}\nCondition: {}\nShips from: {}",
        listing.price.amount, listing.price.currency, listing.condition, listing.ships_from
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RELEASE_ID;
    use crate::types::Price;

    fn test_monitor() -> Monitor {
        let credentials = Credentials {
            discogs_api_key: "dg-key".to_string(),
            pushover_token: "po-token".to_string(),
            pushover_user: "po-user".to_string(),
        };
        Monitor::new(
            &credentials,
            Arc::new(AtomicBool::new(true)),
            RELEASE_ID.to_string(),
            300,
        )
        .expect("client construction")
    }

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            price: Price {
                amount: "25.00".to_string(),
                currency: "USD".to_string(),
            },
            condition: "Very Good Plus (VG+)".to_string(),
            ships_from: "United States".to_string(),
            url: None,
        }
    }

    // ── filter_new ─────────────────────────────────────────────────

    #[test]
    fn all_new_pass_through_in_order() {
        let mut monitor = test_monitor();
        let new = monitor.filter_new(vec![listing("a"), listing("b")]);
        assert_eq!(new.len(), 2);
        assert_eq!(new[0].id, "a");
        assert_eq!(new[1].id, "b");
    }

    #[test]
    fn seen_id_never_returned_again() {
        let mut monitor = test_monitor();
        assert_eq!(monitor.filter_new(vec![listing("a")]).len(), 1);
        assert!(monitor.filter_new(vec![listing("a")]).is_empty());
        assert!(monitor.filter_new(vec![listing("a")]).is_empty());
    }

    #[test]
    fn duplicate_within_one_batch_counted_once() {
        let mut monitor = test_monitor();
        let new = monitor.filter_new(vec![listing("a"), listing("a")]);
        assert_eq!(new.len(), 1);
    }

    #[test]
    fn overlapping_cycles_notify_each_id_once() {
        // Cycle 1 returns [a, b]; cycle 2 returns [b, c]. Exactly three
        // listings come through in total, b on cycle 1 only.
        let mut monitor = test_monitor();
        let first = monitor.filter_new(vec![listing("a"), listing("b")]);
        let second = monitor.filter_new(vec![listing("b"), listing("c")]);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "c");
    }

    // ── listing_message ────────────────────────────────────────────

    #[test]
    fn message_has_three_lines() {
        let message = listing_message(&listing("a"));
        assert_eq!(
            message,
            "Price: 25.00 USD\nCondition: Very Good Plus (VG+)\nShips from: United States"
        );
    }

    #[test]
    fn message_with_defaulted_fields() {
        let bare = Listing {
            id: "x".to_string(),
            price: Price {
                amount: "0".to_string(),
                currency: "USD".to_string(),
            },
            condition: "Not specified".to_string(),
            ships_from: "Unknown".to_string(),
            url: None,
        };
        assert_eq!(
            listing_message(&bare),
            "Price: 0 USD\nCondition: Not specified\nShips from: Unknown"
        );
    }

    // ── sleep_interruptible ────────────────────────────────────────

    #[tokio::test]
    async fn cleared_flag_skips_sleep() {
        let monitor = test_monitor();
        monitor.running.store(false, Ordering::Relaxed);
        // Would take hours if the flag were ignored.
        monitor.sleep_interruptible(10_000).await;
    }
}
