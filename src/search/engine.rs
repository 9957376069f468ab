use super::session::{Completion, SearchRequest, SearchSession};
use crate::github::types::SearchPage;
use crate::github::UserSearch;
use crate::tui::state::AppState;
use crate::tui::TuiCommand;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};

type Finished = (u64, Result<SearchPage>);

/// Owns the search session and turns TUI commands into searches.
pub struct SearchEngine {
    client: Arc<dyn UserSearch>,
    session: SearchSession,
    state_tx: watch::Sender<AppState>,
}

impl SearchEngine {
    pub fn new(client: Arc<dyn UserSearch>, debounce: Duration, state_tx: watch::Sender<AppState>) -> Self {
        Self {
            client,
            session: SearchSession::new(debounce),
            state_tx,
        }
    }

    /// Runs until `Quit` arrives or the command channel closes.
    pub async fn run(mut self, mut cmd_rx: mpsc::Receiver<TuiCommand>) {
        let (done_tx, mut done_rx) = mpsc::channel::<Finished>(16);

        loop {
            let deadline = self.session.deadline();

            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(TuiCommand::QueryChanged(text)) => {
                        if text.is_empty() {
                            self.state_tx.send_modify(|s| s.last_updated = None);
                        }
                        self.session.input(text, Instant::now());
                        self.publish();
                    }
                    Some(TuiCommand::SelectNext) => self.state_tx.send_modify(|s| s.select_next()),
                    Some(TuiCommand::SelectPrev) => self.state_tx.send_modify(|s| s.select_prev()),
                    Some(TuiCommand::Quit) | None => {
                        tracing::debug!("search engine stopping");
                        return;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(req) = self.session.poll(Instant::now()) {
                        self.dispatch(req, done_tx.clone());
                        self.publish();
                    }
                }
                Some((seq, outcome)) = done_rx.recv() => {
                    self.finish(seq, outcome);
                }
            }
        }
    }

    /// In-flight requests are never cancelled; late ones are dropped in `finish`.
    fn dispatch(&self, req: SearchRequest, done_tx: mpsc::Sender<Finished>) {
        tracing::debug!(seq = req.seq, query = %req.query, "dispatching search");
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = client.search_users(&req.query).await;
            let _ = done_tx.send((req.seq, outcome)).await;
        });
    }

    fn finish(&mut self, seq: u64, outcome: Result<SearchPage>) {
        match self.session.complete(seq, outcome) {
            Completion::Applied { query, count } => {
                tracing::info!(seq, query = %query, count, "search results applied");
                let updated = chrono::Local::now().format("%H:%M:%S").to_string();
                self.state_tx.send_modify(|s| {
                    s.last_updated = Some(updated);
                    s.selected = 0;
                });
                self.publish();
            }
            Completion::Stale => {
                tracing::debug!(seq, "discarding stale search response");
            }
            Completion::Failed { query, error } => {
                tracing::warn!(seq, query = %query, "search failed: {:#}", error);
                self.publish();
            }
        }
    }

    fn publish(&self) {
        let session = &self.session;
        self.state_tx.send_modify(|s| {
            s.query = session.query().to_string();
            s.results = session.results().to_vec();
            s.total_count = session.total_count();
            s.searching = session.is_searching();
            s.clamp_selection();
        });
    }
}
