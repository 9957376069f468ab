use super::debounce::Debouncer;
use crate::github::types::{SearchPage, UserResult};
use std::time::Duration;
use tokio::time::Instant;

/// A search that left the debouncer and should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// What happened to a finished request.
#[derive(Debug)]
pub enum Completion {
    /// Result set replaced with `count` users found for `query`.
    Applied { query: String, count: usize },
    /// A newer request was sent, or the query was cleared, after this one.
    Stale,
    /// The request for `query` failed; the previous result set is kept.
    Failed { query: String, error: anyhow::Error },
}

/// Query text, result set and request bookkeeping for one search box.
///
/// Every dispatched request gets the next sequence number. Only a response
/// carrying the latest number is applied; clearing the query also bumps the
/// number so nothing already in flight can repopulate the table.
#[derive(Debug)]
pub struct SearchSession {
    debouncer: Debouncer,
    query: String,
    results: Vec<UserResult>,
    total_count: u64,
    seq: u64,
    awaiting: Option<SearchRequest>,
}

impl SearchSession {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            query: String::new(),
            results: Vec::new(),
            total_count: 0,
            seq: 0,
            awaiting: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[UserResult] {
        &self.results
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// A request for the current query is in flight.
    pub fn is_searching(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Record new input text. Empty text clears results right away and never
    /// reaches the network.
    pub fn input(&mut self, text: String, now: Instant) {
        if text.is_empty() {
            self.debouncer.cancel();
            self.results.clear();
            self.total_count = 0;
            self.seq += 1;
            self.awaiting = None;
        } else {
            self.debouncer.input(text.clone(), now);
        }
        self.query = text;
    }

    /// Hand out the pending search once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.debouncer.poll(now)?;
        self.seq += 1;
        let req = SearchRequest { seq: self.seq, query };
        self.awaiting = Some(req.clone());
        Some(req)
    }

    pub fn complete(&mut self, seq: u64, outcome: anyhow::Result<SearchPage>) -> Completion {
        let query = match self.awaiting.take() {
            Some(req) if req.seq == seq => req.query,
            other => {
                self.awaiting = other;
                return Completion::Stale;
            }
        };
        match outcome {
            Ok(page) => {
                self.total_count = page.total_count;
                self.results = page.items;
                Completion::Applied { query, count: self.results.len() }
            }
            Err(error) => Completion::Failed { query, error },
        }
    }
}
