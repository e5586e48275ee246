// ── Debounced lookups ──
//
// Autocomplete and dynamic selects fetch their options asynchronously.
// Each new query for a field supersedes the previous one: the older
// ticket's token is cancelled and its request id stops being current, so
// a late response can be recognised and dropped.

use std::collections::HashMap;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Debounce applied to search-as-you-type lookups.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle for one in-flight lookup.
#[derive(Debug, Clone)]
pub struct LookupTicket {
    field: String,
    request_id: u64,
    query: String,
    token: CancellationToken,
}

impl LookupTicket {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait out the debounce window. Returns `false` if a newer query or
    /// the dialog closing cancelled this ticket first.
    pub async fn debounce(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.token.cancelled() => false,
            () = tokio::time::sleep(delay) => true,
        }
    }
}

/// Per-dialog bookkeeping of the latest request id per field.
#[derive(Debug)]
pub(crate) struct LookupTracker {
    next_id: u64,
    pending: HashMap<String, (u64, CancellationToken)>,
    /// Parent of every ticket token; cancelled when the dialog closes.
    parent: CancellationToken,
}

impl LookupTracker {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
            parent: CancellationToken::new(),
        }
    }

    /// Issue a ticket for `field`, cancelling whatever was pending for it.
    pub(crate) fn begin(&mut self, field: &str, query: &str) -> LookupTicket {
        self.next_id += 1;
        let token = self.parent.child_token();
        if let Some((_, previous)) = self
            .pending
            .insert(field.to_owned(), (self.next_id, token.clone()))
        {
            previous.cancel();
        }
        LookupTicket {
            field: field.to_owned(),
            request_id: self.next_id,
            query: query.to_owned(),
            token,
        }
    }

    pub(crate) fn is_current(&self, ticket: &LookupTicket) -> bool {
        !ticket.is_cancelled()
            && self
                .pending
                .get(&ticket.field)
                .is_some_and(|(id, _)| *id == ticket.request_id)
    }

    /// Retire a ticket once its result was applied.
    pub(crate) fn complete(&mut self, ticket: &LookupTicket) {
        if self.is_current(ticket) {
            self.pending.remove(&ticket.field);
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        self.parent.cancel();
        self.pending.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut tracker = LookupTracker::new();
        let first = tracker.begin("siteId", "ma");
        let second = tracker.begin("siteId", "main");

        assert!(first.is_cancelled());
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(second.request_id() > first.request_id());
    }

    #[test]
    fn fields_are_tracked_independently() {
        let mut tracker = LookupTracker::new();
        let site = tracker.begin("siteId", "");
        let profile = tracker.begin("radiusProfileId", "");
        assert!(tracker.is_current(&site));
        assert!(tracker.is_current(&profile));

        tracker.complete(&site);
        assert!(!tracker.is_current(&site));
        assert!(tracker.is_current(&profile));
    }

    #[test]
    fn cancel_all_cancels_outstanding_tickets() {
        let mut tracker = LookupTracker::new();
        let ticket = tracker.begin("siteId", "x");
        tracker.cancel_all();
        assert!(ticket.is_cancelled());
        assert!(!tracker.is_current(&ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_completes_after_delay() {
        let mut tracker = LookupTracker::new();
        let ticket = tracker.begin("siteId", "main");
        assert!(ticket.debounce(DEFAULT_DEBOUNCE).await);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_ticket_stops_waiting() {
        let mut tracker = LookupTracker::new();
        let first = tracker.begin("siteId", "m");

        let waiter = tokio::spawn({
            let first = first.clone();
            async move { first.debounce(DEFAULT_DEBOUNCE).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _second = tracker.begin("siteId", "ma");

        assert!(!waiter.await.unwrap());
    }
}
