//! Application state and its transitions.
//!
//! `App` is owned by the event loop. Every transition takes the current
//! instant explicitly and returns the side effects it wants performed.

use crate::config::{Environment, TuiConfig};
use crate::debounce::Debouncer;
use crate::events::TuiEvent;
use crate::fetch::{FetchKind, FetchOutcome, FetchRequest, FetchTicket, FetchTracker};
use crate::inspector::InspectorState;
use crate::intent::Intent;
use crate::keys::{map_key, Action};
use crate::layout;
use crate::list::ListState;
use crate::nav::Focus;
use crate::notifications::{Notification, NotificationAction, NotificationLevel, Notifications};
use crate::poll::{PollScheduler, PollStatus};
use crate::search::SearchInput;
use crate::theme::HedgehogTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lazyhog_core::{DataError, Record, Resource};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Flags are not paginated by the backend; this caps a single listing.
pub const FLAG_LIST_LIMIT: usize = 100;

/// How long the "Copied ..." hint stays in the inspector title.
pub const CLIPBOARD_FEEDBACK_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    Search(SearchInput),
    ConfirmFlagToggle(FlagToggleConfirm),
}

/// A flag toggle awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagToggleConfirm {
    pub flag_id: i64,
    pub key: String,
    pub current: bool,
    pub production: bool,
}

impl FlagToggleConfirm {
    pub fn verb(&self) -> &'static str {
        if self.current {
            "disable"
        } else {
            "enable"
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClipboardFeedback {
    pub message: String,
    pub at: Instant,
}

#[derive(Debug, Clone)]
pub struct App {
    pub config: TuiConfig,
    pub theme: HedgehogTheme,
    pub environment: Environment,
    pub focus: Focus,
    /// Highlighted row in the selector; may run ahead of the active resource
    /// while a debounced switch is pending.
    pub selector_cursor: usize,
    pub list: ListState,
    pub inspector: InspectorState,
    pub debouncer: Debouncer,
    pub poller: PollScheduler,
    pub fetches: FetchTracker,
    pub notifications: Notifications,
    pub modal: Option<Modal>,
    pub last_interaction: Instant,
    pub clipboard_feedback: Option<ClipboardFeedback>,
    pub viewport: (u16, u16),
}

impl App {
    pub fn new(config: TuiConfig, now: Instant) -> Self {
        let environment = config.environment();
        let debouncer = Debouncer::new(config.debounce());
        let poller = PollScheduler::new(config.poll_interval(), config.poll_pause());
        Self {
            config,
            theme: HedgehogTheme::hedgehog(),
            environment,
            focus: Focus::Selector,
            selector_cursor: Resource::Events.index(),
            list: ListState::new(Resource::Events),
            inspector: InspectorState::new(),
            debouncer,
            poller,
            fetches: FetchTracker::new(),
            notifications: Notifications::new(),
            modal: None,
            last_interaction: now,
            clipboard_feedback: None,
            viewport: (0, 0),
        }
    }

    /// Intents to run once the loop starts: load the live feed.
    pub fn start(&mut self) -> Vec<Intent> {
        vec![self.request_list(Resource::Events)]
    }

    pub fn active_resource(&self) -> Resource {
        self.list.resource()
    }

    pub fn poll_status(&self, now: Instant) -> PollStatus {
        self.poller
            .status(self.active_resource(), self.focus, self.last_interaction, now)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    pub fn handle_event(&mut self, event: TuiEvent, now: Instant) -> Vec<Intent> {
        match event {
            TuiEvent::Input(key) => self.handle_key(key, now),
            TuiEvent::Resize { width, height } => {
                self.viewport = (width, height);
                self.inspector
                    .set_viewport_height(layout::inspector_viewport_height(height));
                Vec::new()
            }
            TuiEvent::Tick => self.on_tick(now),
            TuiEvent::DebounceElapsed(generation) => match self.debouncer.fire(generation) {
                Some(target) => self.select_resource(target),
                None => {
                    debug!(generation, "superseded debounce token");
                    Vec::new()
                }
            },
            TuiEvent::FetchCompleted { ticket, outcome } => {
                self.on_fetch_completed(ticket, *outcome)
            }
        }
    }

    fn on_tick(&mut self, now: Instant) -> Vec<Intent> {
        if let Ok(ttl) = chrono::Duration::from_std(self.config.notification_ttl()) {
            self.notifications.prune(chrono::Utc::now(), ttl);
        }
        if let Some(feedback) = &self.clipboard_feedback {
            if now.saturating_duration_since(feedback.at) >= CLIPBOARD_FEEDBACK_TTL {
                self.clipboard_feedback = None;
            }
        }

        let resource = self.active_resource();
        if !self
            .poller
            .should_poll(resource, self.focus, self.last_interaction, now)
        {
            return Vec::new();
        }
        if self.fetches.in_flight(FetchKind::List(resource)) {
            debug!(%resource, "poll skipped, previous fetch still running");
            return Vec::new();
        }
        vec![self.request_list(resource)]
    }

    // ========================================================================
    // Key handling
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Intent> {
        self.last_interaction = now;

        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        let Some(action) = map_key(key) else {
            return Vec::new();
        };

        match action {
            Action::Quit => return vec![Intent::Quit],
            Action::ToggleHelp => {
                self.modal = Some(Modal::Help);
                return Vec::new();
            }
            Action::Dismiss => {
                self.notifications.dismiss_latest();
                return Vec::new();
            }
            Action::FocusRight => return self.focus_right(),
            Action::FocusLeft => {
                self.focus = self.focus.left();
                return Vec::new();
            }
            Action::Back => {
                if self.focus == Focus::List && self.list.is_filtered() {
                    self.list.clear_filter();
                    self.sync_inspector_from_cursor();
                } else {
                    self.focus = self.focus.left();
                }
                return Vec::new();
            }
            _ => {}
        }

        match self.focus {
            Focus::Selector => self.handle_selector_action(action, now),
            Focus::List => self.handle_list_action(action),
            Focus::Inspector => self.handle_inspector_action(action),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        let Some(modal) = self.modal.take() else {
            return Vec::new();
        };

        match modal {
            Modal::Help => {
                if !matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                    self.modal = Some(Modal::Help);
                }
                Vec::new()
            }
            Modal::Search(mut input) => {
                match key.code {
                    KeyCode::Esc => {
                        self.list.clear_filter();
                        self.sync_inspector_from_cursor();
                    }
                    KeyCode::Enter => {
                        self.list.apply_filter(input.query());
                        self.sync_inspector_from_cursor();
                    }
                    KeyCode::Backspace => {
                        input.backspace();
                        self.modal = Some(Modal::Search(input));
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        input.clear();
                        self.modal = Some(Modal::Search(input));
                    }
                    KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        input.push(ch);
                        self.modal = Some(Modal::Search(input));
                    }
                    _ => self.modal = Some(Modal::Search(input)),
                }
                Vec::new()
            }
            Modal::ConfirmFlagToggle(confirm) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    vec![self.request_flag_toggle(confirm.flag_id, !confirm.current)]
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Vec::new(),
                _ => {
                    self.modal = Some(Modal::ConfirmFlagToggle(confirm));
                    Vec::new()
                }
            },
        }
    }

    fn focus_right(&mut self) -> Vec<Intent> {
        let intents = if self.focus == Focus::Selector {
            self.commit_pending_selection()
        } else {
            Vec::new()
        };
        self.focus = self.focus.right();
        intents
    }

    fn handle_selector_action(&mut self, action: Action, now: Instant) -> Vec<Intent> {
        match action {
            Action::MoveUp => self.move_selector(-1, now),
            Action::MoveDown => self.move_selector(1, now),
            Action::QuickSelect(index) => match Resource::from_index(index) {
                Some(resource) => {
                    self.debouncer.cancel();
                    self.select_resource(resource)
                }
                None => Vec::new(),
            },
            Action::Select => {
                let intents = self.commit_pending_selection();
                self.focus = Focus::List;
                intents
            }
            Action::Refresh => vec![self.request_list(self.active_resource())],
            _ => Vec::new(),
        }
    }

    fn handle_list_action(&mut self, action: Action) -> Vec<Intent> {
        match action {
            Action::MoveUp => {
                self.list.move_cursor(-1);
                self.sync_inspector_from_cursor();
                Vec::new()
            }
            Action::MoveDown => {
                self.list.move_cursor(1);
                self.sync_inspector_from_cursor();
                Vec::new()
            }
            Action::Top => {
                self.list.jump_to_top();
                self.sync_inspector_from_cursor();
                Vec::new()
            }
            Action::Bottom => {
                self.list.jump_to_live();
                self.sync_inspector_from_cursor();
                Vec::new()
            }
            Action::OpenSearch => {
                let current = self
                    .list
                    .filter()
                    .map(|filter| filter.query.clone())
                    .unwrap_or_default();
                self.modal = Some(Modal::Search(SearchInput::with_text(current)));
                Vec::new()
            }
            Action::Select => self.drill_down(),
            Action::Pivot => self.request_pivot(),
            Action::Refresh => vec![self.request_list(self.active_resource())],
            Action::ToggleFlag => {
                self.open_flag_confirm();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_inspector_action(&mut self, action: Action) -> Vec<Intent> {
        match action {
            Action::MoveUp => self.inspector.scroll_by(-1),
            Action::MoveDown => self.inspector.scroll_by(1),
            Action::HalfPageUp => self.inspector.half_page_up(),
            Action::HalfPageDown => self.inspector.half_page_down(),
            Action::Top => self.inspector.scroll_to_top(),
            Action::Bottom => self.inspector.scroll_to_bottom(),
            Action::ToggleFold => {
                self.inspector.toggle_fold_at_scroll();
            }
            Action::ToggleFoldAll => self.inspector.toggle_fold_all(),
            Action::CopyJson => return self.copy_payload(),
            Action::CopyId => return self.copy_id(),
            Action::Pivot => return self.request_pivot(),
            Action::ToggleFlag => self.open_flag_confirm(),
            Action::Refresh => return vec![self.request_list(self.active_resource())],
            _ => {}
        }
        Vec::new()
    }

    // ========================================================================
    // Resource selection
    // ========================================================================

    fn move_selector(&mut self, delta: isize, now: Instant) -> Vec<Intent> {
        let last = Resource::all().len() as isize - 1;
        let next = (self.selector_cursor as isize + delta).clamp(0, last) as usize;
        if next == self.selector_cursor {
            return Vec::new();
        }
        self.selector_cursor = next;
        let Some(target) = Resource::from_index(next) else {
            return Vec::new();
        };
        let token = self.debouncer.issue(target, now);
        vec![Intent::ScheduleDebounce {
            generation: token.generation,
            delay: self.debouncer.delay(),
        }]
    }

    /// Switch right away to a target that is still waiting on its debounce.
    fn commit_pending_selection(&mut self) -> Vec<Intent> {
        let Some(token) = self.debouncer.pending().copied() else {
            return Vec::new();
        };
        self.debouncer.cancel();
        if token.target == self.active_resource() {
            return Vec::new();
        }
        self.select_resource(token.target)
    }

    /// Make `resource` active and fetch it. Selecting the active resource
    /// again refreshes it in place.
    pub fn select_resource(&mut self, resource: Resource) -> Vec<Intent> {
        self.selector_cursor = resource.index();
        if resource != self.active_resource() {
            info!(%resource, "switching resource");
            self.list.reset(resource);
            self.inspector.clear();
            self.fetches.invalidate(FetchKind::Detail);
            self.fetches.invalidate(FetchKind::Pivot);
        }
        vec![self.request_list(resource)]
    }

    pub fn request_list(&mut self, resource: Resource) -> Intent {
        let limit = match resource {
            Resource::Events => self.config.event_limit,
            Resource::Persons => self.config.person_limit,
            Resource::Flags => FLAG_LIST_LIMIT,
        };
        if self.list.items().is_empty() {
            self.list.set_loading(true);
        }
        let ticket = self.fetches.issue(FetchKind::List(resource));
        debug!(%resource, seq = ticket.seq, "requesting list");
        Intent::Fetch {
            ticket,
            request: FetchRequest::List { resource, limit },
        }
    }

    // ========================================================================
    // Inspector coordination
    // ========================================================================

    /// Point the inspector at the item under the list cursor.
    pub fn sync_inspector_from_cursor(&mut self) {
        match self.list.selected() {
            Some(record) => {
                let id = record.id();
                if self.inspector.selected_id() != Some(id.as_str()) {
                    self.fetches.invalidate(FetchKind::Detail);
                }
                self.inspector.set_selection(&id, record.payload());
            }
            None => {
                self.fetches.invalidate(FetchKind::Detail);
                self.inspector.clear();
            }
        }
    }

    fn drill_down(&mut self) -> Vec<Intent> {
        let Some(record) = self.list.selected() else {
            return Vec::new();
        };
        let resource = record.resource();
        let id = record.id();
        let payload = record.payload();

        self.inspector.set_selection(&id, payload);
        self.inspector.set_loading(true);
        self.focus = Focus::Inspector;

        let ticket = self.fetches.issue(FetchKind::Detail);
        vec![Intent::Fetch {
            ticket,
            request: FetchRequest::Detail { resource, id },
        }]
    }

    fn copy_payload(&mut self) -> Vec<Intent> {
        let Some(payload) = self.inspector.payload() else {
            return Vec::new();
        };
        let text = match serde_json::to_string_pretty(payload) {
            Ok(text) => text,
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("Copy failed: {e}"));
                return Vec::new();
            }
        };
        self.clipboard_feedback = Some(ClipboardFeedback {
            message: "Copied JSON".to_string(),
            at: self.last_interaction,
        });
        vec![Intent::CopyToClipboard { text }]
    }

    fn copy_id(&mut self) -> Vec<Intent> {
        let Some(id) = self.inspector.selected_id().map(str::to_string) else {
            return Vec::new();
        };
        self.clipboard_feedback = Some(ClipboardFeedback {
            message: format!("Copied ID: {id}"),
            at: self.last_interaction,
        });
        vec![Intent::CopyToClipboard { text: id }]
    }

    // ========================================================================
    // Flag toggling
    // ========================================================================

    fn open_flag_confirm(&mut self) {
        let Some(Record::Flag(flag)) = self.list.selected() else {
            return;
        };
        self.modal = Some(Modal::ConfirmFlagToggle(FlagToggleConfirm {
            flag_id: flag.id,
            key: flag.key.clone(),
            current: flag.active,
            production: self.environment.is_production(),
        }));
    }

    fn request_flag_toggle(&mut self, id: i64, active: bool) -> Intent {
        info!(flag_id = id, active, "toggling flag");
        let ticket = self.fetches.issue(FetchKind::FlagToggle(id));
        Intent::Fetch {
            ticket,
            request: FetchRequest::FlagToggle { id, active },
        }
    }

    fn apply_flag_toggle(
        &mut self,
        id: i64,
        active: bool,
        result: Result<(), DataError>,
    ) -> Vec<Intent> {
        if let Err(e) = result {
            warn!(flag_id = id, error = %e, "flag toggle failed");
            self.notify(NotificationLevel::Error, format!("Failed to toggle flag: {e}"));
            return Vec::new();
        }

        let updated = self.list.items().iter().find_map(|record| match record {
            Record::Flag(flag) if flag.id == id => {
                let mut flag = flag.clone();
                flag.active = active;
                Some(flag)
            }
            _ => None,
        });
        let key = updated
            .as_ref()
            .map(|flag| flag.key.clone())
            .unwrap_or_else(|| id.to_string());
        if let Some(flag) = updated {
            let record = Record::Flag(flag);
            if self.inspector.selected_id() == Some(record.id().as_str()) {
                self.inspector.set_selection(&record.id(), record.payload());
            }
            self.list.update_item(record);
        }

        let state = if active { "enabled" } else { "disabled" };
        self.notify(NotificationLevel::Success, format!("Flag '{key}' {state}"));

        if self.active_resource() == Resource::Flags {
            vec![self.request_list(Resource::Flags)]
        } else {
            Vec::new()
        }
    }

    // ========================================================================
    // Fetch completion
    // ========================================================================

    fn on_fetch_completed(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> Vec<Intent> {
        if !self.fetches.complete(&ticket) {
            return Vec::new();
        }

        match outcome {
            FetchOutcome::List { resource, result } => {
                if resource != self.active_resource() {
                    debug!(%resource, "discarding list for inactive resource");
                    return Vec::new();
                }
                match result {
                    Ok(items) => {
                        let before = self.list.selected().map(Record::id);
                        self.list.replace_items(items);
                        let after = self.list.selected().map(Record::id);
                        if before != after || self.inspector.selected_id().is_none() {
                            self.sync_inspector_from_cursor();
                        }
                    }
                    Err(e) => {
                        warn!(%resource, error = %e, "list fetch failed");
                        self.list.set_error(e.to_string());
                        self.notifications.push(
                            Notification::new(
                                NotificationLevel::Error,
                                format!("Failed to load {resource}: {e}"),
                            )
                            .with_action(NotificationAction::Retry),
                        );
                    }
                }
                Vec::new()
            }
            FetchOutcome::Detail { id, result } => {
                self.inspector.set_loading(false);
                match result {
                    Ok(record) => {
                        if self.inspector.selected_id() == Some(id.as_str()) {
                            self.inspector.set_selection(&id, record.payload());
                        }
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "detail fetch failed");
                        self.notify(
                            NotificationLevel::Error,
                            format!("Failed to load details: {e}"),
                        );
                    }
                }
                Vec::new()
            }
            FetchOutcome::Pivot(result) => {
                self.apply_pivot(result);
                Vec::new()
            }
            FetchOutcome::FlagToggle { id, active, result } => {
                self.apply_flag_toggle(id, active, result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::PivotResult;
    use lazyhog_test_utils::fixtures;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn app() -> (App, Instant) {
        let now = Instant::now();
        let config = TuiConfig {
            api_key: "phx_test".to_string(),
            ..TuiConfig::default()
        };
        let mut app = App::new(config, now);
        app.handle_event(TuiEvent::Resize { width: 120, height: 40 }, now);
        (app, now)
    }

    fn only_fetch(intents: &[Intent]) -> (FetchTicket, FetchRequest) {
        assert_eq!(intents.len(), 1, "expected one intent, got {intents:?}");
        match &intents[0] {
            Intent::Fetch { ticket, request } => (*ticket, request.clone()),
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    fn complete_list(app: &mut App, ticket: FetchTicket, resource: Resource, items: Vec<Record>) {
        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::List {
                    resource,
                    result: Ok(items),
                }),
            },
            Instant::now(),
        );
    }

    fn events(count: usize) -> Vec<Record> {
        fixtures::event_stream(count)
            .into_iter()
            .map(Record::Event)
            .collect()
    }

    /// App with `count` events loaded and focus on the list.
    fn loaded(count: usize) -> (App, Instant) {
        let (mut app, now) = app();
        let (ticket, _) = only_fetch(&app.start());
        complete_list(&mut app, ticket, Resource::Events, events(count));
        app.focus = Focus::List;
        (app, now)
    }

    // ========================================================================
    // Startup and focus
    // ========================================================================

    #[test]
    fn test_poll_interval_comes_from_config() {
        let config = TuiConfig {
            api_key: "phx_test".to_string(),
            poll_interval_ms: 750,
            ..TuiConfig::default()
        };
        let app = App::new(config, Instant::now());
        assert_eq!(app.poller.interval(), Duration::from_millis(750));
    }

    #[test]
    fn test_start_requests_live_feed() {
        let (mut app, _) = app();
        let (_, request) = only_fetch(&app.start());
        assert_eq!(
            request,
            FetchRequest::List {
                resource: Resource::Events,
                limit: 50
            }
        );
        assert!(app.list.is_loading());
    }

    #[test]
    fn test_focus_moves_linearly() {
        let (mut app, now) = app();
        app.handle_key(key(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::List);
        app.handle_key(ch('l'), now);
        assert_eq!(app.focus, Focus::Inspector);
        app.handle_key(key(KeyCode::Right), now);
        assert_eq!(app.focus, Focus::Inspector);
        app.handle_key(ch('h'), now);
        app.handle_key(key(KeyCode::Esc), now);
        assert_eq!(app.focus, Focus::Selector);
    }

    #[test]
    fn test_quit_from_any_pane() {
        let (mut app, now) = app();
        for focus in Focus::all() {
            app.focus = *focus;
            assert_eq!(app.handle_key(ch('q'), now), vec![Intent::Quit]);
        }
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c, now), vec![Intent::Quit]);
    }

    #[test]
    fn test_every_key_records_interaction() {
        let (mut app, now) = app();
        let later = now + Duration::from_secs(7);
        app.handle_key(ch('z'), later);
        assert_eq!(app.last_interaction, later);
    }

    // ========================================================================
    // Selector and debounce
    // ========================================================================

    #[test]
    fn test_selector_movement_is_debounced() {
        let (mut app, now) = app();
        let first = app.handle_key(ch('j'), now);
        let second = app.handle_key(ch('j'), now + Duration::from_millis(50));
        assert_eq!(app.selector_cursor, 2);
        assert_eq!(app.active_resource(), Resource::Events);

        let generation = |intents: &[Intent]| match intents {
            [Intent::ScheduleDebounce { generation, delay }] => {
                assert_eq!(*delay, Duration::from_millis(200));
                *generation
            }
            other => panic!("unexpected {other:?}"),
        };
        let stale = generation(&first);
        let latest = generation(&second);

        assert!(app.handle_event(TuiEvent::DebounceElapsed(stale), now).is_empty());
        let (_, request) = only_fetch(&app.handle_event(TuiEvent::DebounceElapsed(latest), now));
        assert_eq!(
            request,
            FetchRequest::List {
                resource: Resource::Flags,
                limit: FLAG_LIST_LIMIT
            }
        );
        assert_eq!(app.active_resource(), Resource::Flags);
    }

    #[test]
    fn test_selector_edge_issues_no_token() {
        let (mut app, now) = app();
        assert!(app.handle_key(ch('k'), now).is_empty());
        assert!(app.debouncer.pending().is_none());
    }

    #[test]
    fn test_quick_select_cancels_pending_token() {
        let (mut app, now) = app();
        let intents = app.handle_key(ch('j'), now);
        let Intent::ScheduleDebounce { generation, .. } = intents[0] else {
            panic!("expected debounce");
        };
        let (_, request) = only_fetch(&app.handle_key(ch('3'), now));
        assert!(matches!(request, FetchRequest::List { resource: Resource::Flags, .. }));
        assert!(app.handle_event(TuiEvent::DebounceElapsed(generation), now).is_empty());
        assert_eq!(app.selector_cursor, 2);
    }

    #[test]
    fn test_reselecting_active_resource_refreshes() {
        let (mut app, now) = loaded(5);
        app.focus = Focus::Selector;
        let (_, request) = only_fetch(&app.handle_key(ch('1'), now));
        assert!(matches!(request, FetchRequest::List { resource: Resource::Events, .. }));
        assert_eq!(app.list.items().len(), 5);
    }

    #[test]
    fn test_enter_commits_pending_selection() {
        let (mut app, now) = app();
        app.handle_key(ch('j'), now);
        let (_, request) = only_fetch(&app.handle_key(key(KeyCode::Enter), now));
        assert!(matches!(request, FetchRequest::List { resource: Resource::Persons, .. }));
        assert_eq!(app.focus, Focus::List);
        assert!(app.debouncer.pending().is_none());
    }

    // ========================================================================
    // List and inspector
    // ========================================================================

    #[test]
    fn test_stale_list_result_is_discarded() {
        let (mut app, now) = app();
        let (old, _) = only_fetch(&app.start());
        let (new, _) = only_fetch(&app.handle_key(ch('r'), now));
        complete_list(&mut app, old, Resource::Events, events(3));
        assert!(app.list.items().is_empty());
        complete_list(&mut app, new, Resource::Events, events(4));
        assert_eq!(app.list.items().len(), 4);
    }

    #[test]
    fn test_list_result_for_inactive_resource_is_discarded() {
        let (mut app, now) = app();
        let (events_ticket, _) = only_fetch(&app.start());
        app.handle_key(ch('2'), now);
        complete_list(&mut app, events_ticket, Resource::Events, events(3));
        assert_eq!(app.active_resource(), Resource::Persons);
        assert!(app.list.items().is_empty());
    }

    #[test]
    fn test_cursor_movement_updates_inspector() {
        let (mut app, now) = loaded(5);
        assert_eq!(app.inspector.selected_id(), Some("evt-4"));
        app.handle_key(ch('k'), now);
        assert_eq!(app.inspector.selected_id(), Some("evt-3"));
        assert!(!app.list.auto_scroll());
    }

    #[test]
    fn test_poll_keeps_detached_cursor() {
        let (mut app, now) = loaded(50);
        for _ in 0..39 {
            app.handle_key(ch('k'), now);
        }
        assert_eq!(app.list.cursor(), 10);

        let (ticket, _) = only_fetch(&app.handle_event(TuiEvent::Tick, now));
        complete_list(&mut app, ticket, Resource::Events, events(55));
        assert_eq!(app.list.cursor(), 10);
        assert_eq!(app.list.new_item_count(), 5);
        assert_eq!(app.inspector.selected_id(), Some("evt-10"));
    }

    #[test]
    fn test_search_flow() {
        let (mut app, now) = app();
        let (ticket, _) = only_fetch(&app.start());
        complete_list(
            &mut app,
            ticket,
            Resource::Events,
            fixtures::labelled_events(&["page_view:u1", "click:u2", "page_view:u3"]),
        );
        app.focus = Focus::List;

        app.handle_key(ch('/'), now);
        for c in "page_view".chars() {
            app.handle_key(ch(c), now);
        }
        // Keys go to the search buffer, not to the list.
        assert_eq!(app.focus, Focus::List);
        app.handle_key(key(KeyCode::Enter), now);

        assert!(app.modal.is_none());
        assert_eq!(app.list.effective_len(), 2);
        assert_eq!(app.list.cursor(), 0);
        assert_eq!(app.inspector.selected_id(), Some("evt-0"));

        app.handle_key(ch('j'), now);
        app.handle_key(key(KeyCode::Esc), now);
        assert!(!app.list.is_filtered());
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.list.selected().map(Record::id), Some("evt-2".to_string()));
    }

    #[test]
    fn test_search_escape_clears_active_filter() {
        let (mut app, now) = loaded(3);
        app.list.apply_filter("u1");
        assert_eq!(app.list.effective_len(), 1);
        app.handle_key(ch('/'), now);
        app.handle_key(ch('x'), now);
        app.handle_key(key(KeyCode::Esc), now);
        assert!(app.modal.is_none());
        assert!(!app.list.is_filtered());
        assert_eq!(app.list.effective_len(), 3);
        assert_eq!(app.inspector.selected_id(), app.list.selected().map(Record::id).as_deref());
    }

    #[test]
    fn test_drill_down_fetches_detail_and_focuses_inspector() {
        let (mut app, now) = loaded(3);
        let (ticket, request) = only_fetch(&app.handle_key(key(KeyCode::Enter), now));
        assert_eq!(
            request,
            FetchRequest::Detail {
                resource: Resource::Events,
                id: "evt-2".to_string()
            }
        );
        assert_eq!(app.focus, Focus::Inspector);

        let mut detailed = fixtures::event("evt-2", "$pageview", "u2");
        detailed
            .properties
            .insert("$browser".to_string(), serde_json::json!("Firefox"));
        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::Detail {
                    id: "evt-2".to_string(),
                    result: Ok(Record::Event(detailed)),
                }),
            },
            now,
        );
        let payload = app.inspector.payload().unwrap();
        assert_eq!(payload["properties"]["$browser"], "Firefox");
        assert!(!app.inspector.is_loading());
    }

    #[test]
    fn test_detail_for_moved_cursor_is_dropped() {
        let (mut app, now) = loaded(3);
        let (ticket, _) = only_fetch(&app.handle_key(key(KeyCode::Enter), now));
        app.focus = Focus::List;
        app.handle_key(ch('k'), now);
        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::Detail {
                    id: "evt-2".to_string(),
                    result: Ok(Record::Event(fixtures::event("evt-2", "late", "u2"))),
                }),
            },
            now,
        );
        assert_eq!(app.inspector.selected_id(), Some("evt-1"));
    }

    #[test]
    fn test_list_failure_sets_error_and_notifies() {
        let (mut app, _) = app();
        let (ticket, _) = only_fetch(&app.start());
        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::List {
                    resource: Resource::Events,
                    result: Err(DataError::Timeout { timeout_ms: 10_000 }),
                }),
            },
            Instant::now(),
        );
        assert!(app.list.error().is_some());
        let note = app.notifications.latest().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.action, Some(NotificationAction::Retry));
    }

    // ========================================================================
    // Polling
    // ========================================================================

    #[test]
    fn test_tick_polls_when_list_focused() {
        let (mut app, now) = loaded(3);
        let (_, request) = only_fetch(&app.handle_event(TuiEvent::Tick, now));
        assert!(matches!(request, FetchRequest::List { resource: Resource::Events, .. }));
    }

    #[test]
    fn test_tick_skips_while_fetch_in_flight() {
        let (mut app, now) = loaded(3);
        only_fetch(&app.handle_event(TuiEvent::Tick, now));
        assert!(app.handle_event(TuiEvent::Tick, now).is_empty());
    }

    #[test]
    fn test_inspector_focus_pauses_polling() {
        let (mut app, now) = loaded(3);
        app.handle_key(key(KeyCode::Tab), now);
        assert_eq!(app.focus, Focus::Inspector);
        let soon = now + Duration::from_secs(5);
        assert!(app.handle_event(TuiEvent::Tick, soon).is_empty());
        assert_eq!(app.poll_status(soon), PollStatus::Paused);

        let idle = now + Duration::from_secs(31);
        assert_eq!(app.handle_event(TuiEvent::Tick, idle).len(), 1);
    }

    #[test]
    fn test_non_live_resource_never_polls() {
        let (mut app, now) = app();
        app.handle_key(ch('2'), now);
        assert_eq!(app.poll_status(now), PollStatus::Paused);
        assert!(app.handle_event(TuiEvent::Tick, now).is_empty());
    }

    // ========================================================================
    // Inspector keys and clipboard
    // ========================================================================

    #[test]
    fn test_inspector_keys_scroll_and_fold() {
        let (mut app, now) = loaded(3);
        app.focus = Focus::Inspector;
        app.handle_key(KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT), now);
        assert!(app.inspector.folds().all_folded());
        assert_eq!(app.inspector.content_len(), 1);
        app.handle_key(ch(' '), now);
        assert!(!app.inspector.folds().is_folded("$"));
    }

    #[test]
    fn test_copy_id_emits_clipboard_intent() {
        let (mut app, now) = loaded(3);
        app.focus = Focus::Inspector;
        let intents = app.handle_key(ch('c'), now);
        assert_eq!(
            intents,
            vec![Intent::CopyToClipboard {
                text: "evt-2".to_string()
            }]
        );
        assert!(app.clipboard_feedback.is_some());
        app.handle_event(TuiEvent::Tick, now + Duration::from_secs(3));
        assert!(app.clipboard_feedback.is_none());
    }

    #[test]
    fn test_copy_json_is_pretty_payload() {
        let (mut app, now) = loaded(1);
        app.focus = Focus::Inspector;
        let intents = app.handle_key(ch('y'), now);
        let [Intent::CopyToClipboard { text }] = intents.as_slice() else {
            panic!("expected clipboard intent");
        };
        assert!(text.contains("\"event\": \"$pageview\""));
    }

    // ========================================================================
    // Flags
    // ========================================================================

    fn flags_app() -> (App, Instant) {
        let (mut app, now) = app();
        let (ticket, _) = only_fetch(&app.handle_key(ch('3'), now));
        complete_list(
            &mut app,
            ticket,
            Resource::Flags,
            vec![
                Record::Flag(fixtures::flag(1, "new_onboarding", true)),
                Record::Flag(fixtures::flag(2, "beta_search", false)),
            ],
        );
        app.focus = Focus::List;
        (app, now)
    }

    #[test]
    fn test_flag_toggle_requires_confirmation() {
        let (mut app, now) = flags_app();
        app.handle_key(ch('j'), now);
        assert!(app.handle_key(ch('t'), now).is_empty());
        let Some(Modal::ConfirmFlagToggle(confirm)) = &app.modal else {
            panic!("expected confirmation");
        };
        assert_eq!(confirm.key, "beta_search");
        assert_eq!(confirm.verb(), "enable");
        assert!(confirm.production);

        let (ticket, request) = only_fetch(&app.handle_key(ch('y'), now));
        assert_eq!(request, FetchRequest::FlagToggle { id: 2, active: true });
        assert!(app.modal.is_none());

        let intents = app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::FlagToggle {
                    id: 2,
                    active: true,
                    result: Ok(()),
                }),
            },
            now,
        );
        assert!(matches!(&app.list.items()[1], Record::Flag(f) if f.active));
        assert_eq!(app.notifications.latest().unwrap().level, NotificationLevel::Success);
        assert_eq!(intents.len(), 1);
    }

    #[test]
    fn test_flag_toggle_cancel() {
        let (mut app, now) = flags_app();
        app.handle_key(ch('t'), now);
        assert!(app.handle_key(key(KeyCode::Esc), now).is_empty());
        assert!(app.modal.is_none());
        assert!(!app.fetches.in_flight(FetchKind::FlagToggle(1)));
    }

    #[test]
    fn test_overlapping_flag_toggles_both_reported() {
        let (mut app, now) = flags_app();
        app.handle_key(ch('t'), now);
        let (first, _) = only_fetch(&app.handle_key(ch('y'), now));
        app.handle_key(ch('j'), now);
        app.handle_key(ch('t'), now);
        let (second, _) = only_fetch(&app.handle_key(ch('y'), now));
        assert_ne!(first.kind, second.kind);

        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket: first,
                outcome: Box::new(FetchOutcome::FlagToggle {
                    id: 1,
                    active: false,
                    result: Err(DataError::Timeout { timeout_ms: 100 }),
                }),
            },
            now,
        );
        let failure = app.notifications.latest().unwrap();
        assert_eq!(failure.level, NotificationLevel::Error);
        assert!(failure.message.contains("Failed to toggle flag"));

        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket: second,
                outcome: Box::new(FetchOutcome::FlagToggle {
                    id: 2,
                    active: true,
                    result: Ok(()),
                }),
            },
            now,
        );
        assert_eq!(app.notifications.latest().unwrap().level, NotificationLevel::Success);
        assert!(matches!(&app.list.items()[0], Record::Flag(f) if f.active));
        assert!(matches!(&app.list.items()[1], Record::Flag(f) if f.active));
    }

    #[test]
    fn test_flag_toggle_ignored_outside_flags() {
        let (mut app, now) = loaded(2);
        app.handle_key(ch('t'), now);
        assert!(app.modal.is_none());
    }

    // ========================================================================
    // Pivot
    // ========================================================================

    #[test]
    fn test_pivot_applies_atomically() {
        let (mut app, now) = loaded(3);
        let (ticket, request) = only_fetch(&app.handle_key(ch('p'), now));
        assert_eq!(
            request,
            FetchRequest::Pivot {
                correlation_key: "u2".to_string(),
                related_limit: 20
            }
        );

        let result = PivotResult {
            person: fixtures::person("u2", "Grace"),
            related: vec![fixtures::event("evt-2", "$pageview", "u2")],
            related_error: None,
        };
        app.handle_event(
            TuiEvent::FetchCompleted {
                ticket,
                outcome: Box::new(FetchOutcome::Pivot(Ok(result))),
            },
            now,
        );
        assert_eq!(app.active_resource(), Resource::Persons);
        assert_eq!(app.selector_cursor, Resource::Persons.index());
        assert_eq!(app.list.items().len(), 1);
        assert_eq!(app.focus, Focus::Inspector);
        assert_eq!(app.inspector.selected_id(), Some("u2"));
        assert_eq!(app.inspector.related().map(|r| r.len()), Some(1));
    }
}
