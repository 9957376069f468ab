// End-to-end behaviour of the search engine against a scripted backend,
// driven on tokio's paused clock.

use anyhow::Result;
use async_trait::async_trait;
use gh_user_search::github::types::{SearchPage, UserResult};
use gh_user_search::github::UserSearch;
use gh_user_search::search::SearchEngine;
use gh_user_search::tui::render::{self, NO_DATA};
use gh_user_search::tui::state::AppState;
use gh_user_search::tui::TuiCommand;
use ratatui::{backend::TestBackend, Terminal};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

const DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Clone)]
enum Reply {
    Users { delay: Duration, logins: Vec<&'static str> },
    Fail,
}

#[derive(Clone, Default)]
struct ScriptedSearch {
    calls: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<HashMap<String, Reply>>>,
}

impl ScriptedSearch {
    fn reply(&self, query: &str, logins: Vec<&'static str>) -> &Self {
        self.reply_after(query, Duration::ZERO, logins)
    }

    fn reply_after(&self, query: &str, delay: Duration, logins: Vec<&'static str>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(query.to_string(), Reply::Users { delay, logins });
        self
    }

    fn fail(&self, query: &str) -> &Self {
        self.replies.lock().unwrap().insert(query.to_string(), Reply::Fail);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserSearch for ScriptedSearch {
    async fn search_users(&self, query: &str) -> Result<SearchPage> {
        self.calls.lock().unwrap().push(query.to_string());
        let reply = self.replies.lock().unwrap().get(query).cloned();
        match reply {
            Some(Reply::Users { delay, logins }) => {
                sleep(delay).await;
                Ok(SearchPage {
                    total_count: logins.len() as u64,
                    items: logins
                        .into_iter()
                        .map(|l| UserResult {
                            login: l.to_string(),
                            avatar_url: format!("https://example.com/{}.jpg", l),
                            html_url: None,
                        })
                        .collect(),
                })
            }
            Some(Reply::Fail) => anyhow::bail!("GitHub search failed (503 Service Unavailable)"),
            None => Ok(SearchPage::default()),
        }
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<TuiCommand>,
    state_rx: watch::Receiver<AppState>,
    handle: JoinHandle<()>,
}

impl Harness {
    fn start(backend: &ScriptedSearch) -> Self {
        let (state_tx, state_rx) = watch::channel(AppState::new());
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let engine = SearchEngine::new(Arc::new(backend.clone()), DEBOUNCE, state_tx);
        let handle = tokio::spawn(engine.run(cmd_rx));
        Self { cmd_tx, state_rx, handle }
    }

    async fn type_query(&self, text: &str) {
        self.cmd_tx
            .send(TuiCommand::QueryChanged(text.to_string()))
            .await
            .unwrap();
    }

    fn state(&self) -> AppState {
        self.state_rx.borrow().clone()
    }

    fn logins(&self) -> Vec<String> {
        self.state().results.into_iter().map(|u| u.login).collect()
    }
}

fn screen(state: &AppState) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
    terminal.draw(|f| render::draw(f, state, 0)).unwrap();
    let buf = terminal.backend().buffer().clone();
    (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}

fn rendered_rows(state: &AppState) -> usize {
    screen(state)
        .iter()
        .filter(|l| l.contains("https://example.com/"))
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_no_input_shows_no_data() {
    let backend = ScriptedSearch::default();
    let h = Harness::start(&backend);
    sleep(DEBOUNCE * 3).await;

    assert!(backend.calls().is_empty());
    let state = h.state();
    assert!(state.results.is_empty());
    assert!(screen(&state).join("\n").contains(NO_DATA));
}

#[tokio::test(start_paused = true)]
async fn test_results_render_after_debounce() {
    let backend = ScriptedSearch::default();
    backend.reply("testuser", vec!["user1", "user2"]);
    let h = Harness::start(&backend);

    h.type_query("testuser").await;
    sleep(Duration::from_millis(500)).await;
    assert!(backend.calls().is_empty(), "request sent before the quiet period ended");
    assert_eq!(h.state().query, "testuser");

    sleep(Duration::from_millis(600)).await;
    assert_eq!(backend.calls(), vec!["testuser"]);
    assert_eq!(h.logins(), vec!["user1", "user2"]);

    let state = h.state();
    assert!(!state.searching);
    assert!(state.last_updated.is_some());
    assert_eq!(rendered_rows(&state), 2);
    assert!(!screen(&state).join("\n").contains(NO_DATA));
}

#[tokio::test(start_paused = true)]
async fn test_empty_items_shows_no_data() {
    let backend = ScriptedSearch::default();
    backend.reply("nonexistentuser", vec![]);
    let h = Harness::start(&backend);

    h.type_query("nonexistentuser").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;

    assert_eq!(backend.calls(), vec!["nonexistentuser"]);
    let state = h.state();
    assert_eq!(rendered_rows(&state), 0);
    assert!(screen(&state).join("\n").contains(NO_DATA));
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_sends_one_request_for_final_value() {
    let backend = ScriptedSearch::default();
    backend.reply("octo", vec!["octocat"]);
    let h = Harness::start(&backend);

    for text in ["o", "oc", "oct", "octo"] {
        h.type_query(text).await;
        sleep(Duration::from_millis(300)).await;
    }
    sleep(DEBOUNCE * 3).await;

    assert_eq!(backend.calls(), vec!["octo"]);
    assert_eq!(h.logins(), vec!["octocat"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_does_not_overwrite_newer() {
    let backend = ScriptedSearch::default();
    backend
        .reply_after("slow", Duration::from_secs(3), vec!["slow1", "slow2", "slow3"])
        .reply_after("fast", Duration::from_millis(100), vec!["fast1"]);
    let h = Harness::start(&backend);

    h.type_query("slow").await;
    sleep(Duration::from_millis(1100)).await;
    assert!(h.state().searching);

    h.type_query("fast").await;
    sleep(Duration::from_millis(1200)).await;
    assert_eq!(h.logins(), vec!["fast1"]);

    // The slow request is still out; let it land.
    sleep(Duration::from_secs(3)).await;
    assert_eq!(backend.calls(), vec!["slow", "fast"]);
    assert_eq!(h.logins(), vec!["fast1"]);
    assert_eq!(rendered_rows(&h.state()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_previous_results() {
    let backend = ScriptedSearch::default();
    backend.reply("octo", vec!["octocat", "octodog"]).fail("octop");
    let h = Harness::start(&backend);

    h.type_query("octo").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert_eq!(h.logins().len(), 2);

    h.type_query("octop").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;

    assert_eq!(backend.calls(), vec!["octo", "octop"]);
    let state = h.state();
    assert_eq!(state.query, "octop");
    assert!(!state.searching);
    assert_eq!(rendered_rows(&state), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_query_empties_table_and_drops_in_flight() {
    let backend = ScriptedSearch::default();
    backend
        .reply("octo", vec!["octocat"])
        .reply_after("octoc", Duration::from_secs(2), vec!["octocat", "octocorp"]);
    let h = Harness::start(&backend);

    h.type_query("octo").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert_eq!(h.logins(), vec!["octocat"]);

    h.type_query("octoc").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert!(h.state().searching);

    h.type_query("").await;
    sleep(Duration::from_millis(10)).await;
    let state = h.state();
    assert!(state.results.is_empty());
    assert!(!state.searching);

    sleep(Duration::from_secs(5)).await;
    assert!(h.state().results.is_empty());
    assert_eq!(backend.calls(), vec!["octo", "octoc"]);
    assert!(screen(&h.state()).join("\n").contains(NO_DATA));
}

#[tokio::test(start_paused = true)]
async fn test_selection_follows_commands() {
    let backend = ScriptedSearch::default();
    backend.reply("user", vec!["user1", "user2", "user3"]);
    let h = Harness::start(&backend);

    h.type_query("user").await;
    sleep(DEBOUNCE + Duration::from_millis(100)).await;

    for _ in 0..5 {
        h.cmd_tx.send(TuiCommand::SelectNext).await.unwrap();
    }
    h.cmd_tx.send(TuiCommand::SelectPrev).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(h.state().selected, 1);
}

#[tokio::test(start_paused = true)]
async fn test_quit_stops_engine() {
    let backend = ScriptedSearch::default();
    let h = Harness::start(&backend);
    h.cmd_tx.send(TuiCommand::Quit).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), h.handle)
        .await
        .expect("engine did not stop")
        .unwrap();
}
