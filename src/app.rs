use chrono::{DateTime, Utc};
use eframe::egui;
use egui::{CornerRadius, RichText, ScrollArea, Ui};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::hn_client::SearchApi;
use crate::models::{FetchState, Story};
use crate::orchestrator::FetchOrchestrator;
use crate::reducer::{Action, FetchStore};
use crate::search::{filter_by_title, SearchState};
use crate::storage::{KeyValueStore, PersistedValue};
use crate::theme::AppTheme;

pub const DARK_MODE_KEY: &str = "is_dark_mode";

/// Things the user asked for while a frame was drawn, applied once drawing is done.
enum UiCommand {
    Draft(String),
    Submit,
    Remove(String),
    Filter(String),
    ToggleFilter,
    ToggleTheme,
    OpenLink(String),
}

pub struct HackerStoriesApp<A> {
    store: FetchStore,
    search: SearchState,
    search_term: PersistedValue,
    dark_mode: PersistedValue,
    orchestrator: FetchOrchestrator<A>,
    theme: AppTheme,
    // Narrows loaded stories by title without fetching
    filter: String,
    show_filter: bool,
}

impl<A: SearchApi> HackerStoriesApp<A> {
    /// Restores persisted values and starts the round-trip for the persisted term.
    pub fn new<S: KeyValueStore + ?Sized>(
        config: &AppConfig,
        storage: Option<&S>,
        orchestrator: FetchOrchestrator<A>,
    ) -> Self {
        let search_term = PersistedValue::read(storage, &config.storage_key, &config.default_term);
        let dark_mode = PersistedValue::read(storage, DARK_MODE_KEY, &config.dark_mode.to_string());
        let is_dark = dark_mode.value().parse::<bool>().unwrap_or(config.dark_mode);

        let mut app = Self {
            store: FetchStore::new(),
            search: SearchState::new(search_term.value()),
            search_term,
            dark_mode,
            orchestrator,
            theme: AppTheme::for_mode(is_dark),
            filter: String::new(),
            show_filter: false,
        };

        info!(term = %app.search.committed_term, "restored search term");
        app.orchestrator.sync(&app.search.committed_term, &mut app.store);
        app
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.store.state()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn on_draft_change(&mut self, text: &str) {
        self.search.set_draft(text);
    }

    /// Commits the draft, persists it, and starts a round-trip when the target changed
    /// or when the last one failed. Returns whether a round-trip was started.
    pub fn on_submit<S: KeyValueStore + ?Sized>(&mut self, storage: Option<&mut S>) -> bool {
        self.search.submit();
        self.search_term.commit(storage, &self.search.committed_term);

        if self.orchestrator.sync(&self.search.committed_term, &mut self.store) {
            return true;
        }
        if self.store.state().is_error {
            info!(term = %self.search.committed_term, "resubmitted after failure");
            return self.orchestrator.refetch(&mut self.store);
        }
        false
    }

    pub fn on_remove(&mut self, id: &str) -> bool {
        self.store.dispatch(Action::RemoveItem { id: id.to_string() })
    }

    pub fn toggle_theme<S: KeyValueStore + ?Sized>(&mut self, storage: Option<&mut S>) {
        let is_dark = !self.theme.is_dark;
        self.theme = AppTheme::for_mode(is_dark);
        self.dark_mode.commit(storage, &is_dark.to_string());
    }

    /// Feeds finished round-trips into the store.
    pub fn pump(&mut self) -> bool {
        self.orchestrator.pump(&mut self.store)
    }

    #[cfg(test)]
    async fn settle(&mut self) -> bool {
        self.orchestrator.settle(&mut self.store).await
    }

    fn apply(&mut self, command: UiCommand, frame: &mut eframe::Frame) {
        match command {
            UiCommand::Draft(text) => self.on_draft_change(&text),
            UiCommand::Submit => {
                self.on_submit(frame.storage_mut());
            }
            UiCommand::Remove(id) => {
                self.on_remove(&id);
            }
            UiCommand::Filter(text) => self.filter = text,
            UiCommand::ToggleFilter => {
                self.show_filter = !self.show_filter;
                if !self.show_filter {
                    self.filter.clear();
                }
            }
            UiCommand::ToggleTheme => self.toggle_theme(frame.storage_mut()),
            UiCommand::OpenLink(url) => {
                if let Err(e) = open::that(&url) {
                    warn!(%url, error = %e, "failed to open URL");
                }
            }
        }
    }

    fn render_header(&self, ui: &mut Ui, commands: &mut Vec<UiCommand>) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("My Hacker Stories")
                    .color(self.theme.highlight)
                    .size(24.0)
                    .strong(),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("with {} comments", self.store.comment_total()))
                    .color(self.theme.secondary_text)
                    .size(14.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.theme.is_dark { "☀" } else { "🌙" };
                let theme_btn = ui.add(
                    egui::Button::new(
                        RichText::new(theme_icon)
                            .color(self.theme.button_foreground)
                            .size(18.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
                );
                if theme_btn.clicked() {
                    commands.push(UiCommand::ToggleTheme);
                }

                let filter_btn = ui.add(
                    egui::Button::new(
                        RichText::new("Filter")
                            .color(if self.show_filter {
                                self.theme.highlight
                            } else {
                                self.theme.button_foreground
                            })
                            .size(14.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
                );
                if filter_btn.clicked() {
                    commands.push(UiCommand::ToggleFilter);
                }
            });
        });
    }

    fn render_search_form(&self, ui: &mut Ui, commands: &mut Vec<UiCommand>) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Search:").color(self.theme.text).size(16.0));
            ui.add_space(8.0);

            let mut draft = self.search.draft_term.clone();
            let text_edit = ui.add_sized(
                [ui.available_width() - 100.0, 32.0],
                egui::TextEdit::singleline(&mut draft)
                    .hint_text("Search Hacker News...")
                    .text_color(self.theme.text)
                    .id(egui::Id::new("search_input")),
            );
            if text_edit.changed() {
                commands.push(UiCommand::Draft(draft.clone()));
            }

            let can_submit = !draft.is_empty();
            let enter_pressed =
                text_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            let submit_btn = ui.add_enabled(
                can_submit,
                egui::Button::new(
                    RichText::new("Submit")
                        .color(self.theme.button_foreground)
                        .size(14.0),
                )
                .min_size(egui::Vec2::new(80.0, 28.0))
                .fill(self.theme.button_background),
            );

            if can_submit && (submit_btn.clicked() || enter_pressed) {
                commands.push(UiCommand::Submit);
            }
        });

        ui.horizontal(|ui| {
            if let Some(target) = self.orchestrator.active_target() {
                ui.label(
                    RichText::new(format!("Results for '{}'", target.term()))
                        .color(self.theme.secondary_text)
                        .size(13.0)
                        .italics(),
                );
            }
            if self.search.has_uncommitted_edits() {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Press Enter to search")
                        .color(self.theme.secondary_text)
                        .size(13.0),
                );
            }
        });

        if self.show_filter {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Filter:").color(self.theme.secondary_text).size(14.0));
                ui.add_space(8.0);
                let mut filter = self.filter.clone();
                let filter_edit = ui.add_sized(
                    [ui.available_width() - 100.0, 26.0],
                    egui::TextEdit::singleline(&mut filter)
                        .hint_text("Narrow loaded stories by title...")
                        .text_color(self.theme.text),
                );
                if filter_edit.changed() {
                    commands.push(UiCommand::Filter(filter));
                }
            });
        }
    }

    fn render_stories(&self, ui: &mut Ui, now: DateTime<Utc>, commands: &mut Vec<UiCommand>) {
        let state = self.store.state();

        if state.is_error {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new("Something went wrong ...")
                        .color(self.theme.error)
                        .size(18.0),
                );
                ui.label(
                    RichText::new("Submit again to retry.")
                        .color(self.theme.secondary_text)
                        .size(14.0)
                        .italics(),
                );
                ui.add_space(12.0);
            });
        }

        if state.is_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                ui.spinner();
                ui.add_space(20.0);
                let pending = self.orchestrator.in_flight();
                let text = if pending > 1 {
                    format!("Loading ... ({} requests pending)", pending)
                } else {
                    "Loading ...".to_string()
                };
                ui.label(RichText::new(text).color(self.theme.secondary_text).size(18.0));
            });
            return;
        }

        let visible = filter_by_title(&state.items, &self.filter);
        if visible.is_empty() && !state.is_error {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new("No stories to show")
                        .color(self.theme.secondary_text)
                        .size(16.0)
                        .italics(),
                );
            });
            return;
        }

        ScrollArea::vertical().show(ui, |ui| {
            for story in visible {
                self.render_story(ui, story, now, commands);
            }
        });
    }

    fn render_story(&self, ui: &mut Ui, story: &Story, now: DateTime<Utc>, commands: &mut Vec<UiCommand>) {
        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(8))
            .stroke(self.theme.card_stroke(story.points))
            .inner_margin(12.0)
            .outer_margin(egui::vec2(8.0, 6.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let title_label = ui.add(
                        egui::Label::new(
                            RichText::new(&story.title)
                                .color(self.theme.text)
                                .size(16.0)
                                .strong(),
                        )
                        .sense(egui::Sense::click()),
                    );

                    if let Some(url) = &story.url {
                        if title_label.clicked() {
                            commands.push(UiCommand::OpenLink(url.clone()));
                        }
                        if title_label.hovered() {
                            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                        }
                    }

                    if let Some(domain) = story.domain() {
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(format!("({})", domain))
                                .color(self.theme.secondary_text)
                                .italics(),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} pts", story.points))
                                .color(self.theme.points_color(story.points))
                                .strong(),
                        );
                    });
                });

                ui.horizontal(|ui| {
                    if let Some(author) = &story.author {
                        ui.label(RichText::new("by").color(self.theme.secondary_text).size(14.0));
                        ui.label(RichText::new(author).color(self.theme.text).size(14.0));
                        ui.add_space(8.0);
                    }
                    if let Some(time_ago) = story.time_ago(now) {
                        ui.label(RichText::new(time_ago).color(self.theme.secondary_text).size(14.0));
                        ui.add_space(8.0);
                    }
                    ui.label(
                        RichText::new(format!("{} comments", story.comment_count))
                            .color(self.theme.secondary_text)
                            .size(14.0),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let dismiss_btn = ui.add(
                            egui::Button::new(
                                RichText::new("Dismiss")
                                    .color(self.theme.button_foreground)
                                    .size(13.0),
                            )
                            .corner_radius(CornerRadius::same(4))
                            .fill(self.theme.button_background),
                        );
                        if dismiss_btn.clicked() {
                            commands.push(UiCommand::Remove(story.id.clone()));
                        }
                    });
                });
            });
    }
}

impl<A: SearchApi> eframe::App for HackerStoriesApp<A> {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);
        self.pump();

        let now = Utc::now();
        let mut commands = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui, &mut commands);
            ui.add(egui::Separator::default().spacing(12.0));
            self.render_search_form(ui, &mut commands);
            ui.add(egui::Separator::default().spacing(12.0));
            self.render_stories(ui, now, &mut commands);
        });

        let needs_repaint = !commands.is_empty();
        for command in commands {
            self.apply(command, frame);
        }
        if needs_repaint {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StalePolicy;
    use crate::test_support::{server_error, story, MemoryStore, MockSearchApi, PREFIX};
    use tokio::runtime::Handle;

    fn config() -> AppConfig {
        AppConfig {
            endpoint: PREFIX.to_string(),
            ..AppConfig::default()
        }
    }

    fn app(api: &MockSearchApi, storage: &MemoryStore) -> HackerStoriesApp<MockSearchApi> {
        let orchestrator =
            FetchOrchestrator::new(api.clone(), Handle::current(), PREFIX, StalePolicy::default());
        HackerStoriesApp::new(&config(), Some(storage), orchestrator)
    }

    #[tokio::test]
    async fn startup_fetches_persisted_term() {
        let api = MockSearchApi::default();
        let storage = MemoryStore::with("search", "React");
        let app = app(&api, &storage);

        assert_eq!(api.calls(), vec![format!("{}React", PREFIX)]);
        assert!(app.fetch_state().is_loading);
        assert_eq!(app.search_state().draft_term, "React");
    }

    #[tokio::test]
    async fn startup_without_persisted_term_uses_default() {
        let api = MockSearchApi::default();
        let mut config = config();
        config.default_term = "rust".to_string();
        let orchestrator =
            FetchOrchestrator::new(api.clone(), Handle::current(), PREFIX, StalePolicy::default());
        let app = HackerStoriesApp::new(&config, None::<&MemoryStore>, orchestrator);

        assert_eq!(api.calls(), vec![format!("{}rust", PREFIX)]);
        assert_eq!(app.search_state().committed_term, "rust");
    }

    #[tokio::test]
    async fn typing_never_fetches() {
        let api = MockSearchApi::default();
        let storage = MemoryStore::with("search", "React");
        let mut app = app(&api, &storage);
        app.settle().await;

        for text in ["r", "re", "red", "redu", "redux"] {
            app.on_draft_change(text);
        }

        assert_eq!(api.calls().len(), 1);
        assert_eq!(app.search_state().committed_term, "React");
        assert_eq!(app.search_state().draft_term, "redux");
    }

    #[tokio::test]
    async fn submit_fetches_committed_term_once() {
        let api = MockSearchApi::default();
        api.respond(Ok(vec![story("0", "React")]));
        api.respond(Ok(vec![story("1", "Redux"), story("2", "Redux Toolkit")]));
        let mut storage = MemoryStore::with("search", "React");
        let mut app = app(&api, &storage);
        app.settle().await;

        app.on_draft_change("redux");
        assert!(app.on_submit(Some(&mut storage)));
        assert_eq!(api.calls()[1], format!("{}redux", PREFIX));
        assert!(app.fetch_state().is_loading);

        app.settle().await;
        let ids: Vec<_> = app.fetch_state().items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(storage.get("search").as_deref(), Some("redux"));

        assert!(!app.on_submit(Some(&mut storage)));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn resubmitting_after_failure_starts_a_fresh_round_trip() {
        let api = MockSearchApi::default();
        api.respond(Err(server_error()));
        api.respond(Ok(vec![story("0", "React")]));
        let mut storage = MemoryStore::with("search", "React");
        let mut app = app(&api, &storage);
        app.settle().await;

        let state = app.fetch_state();
        assert!(state.is_error);
        assert!(!state.is_loading);
        assert!(state.items.is_empty());

        assert!(app.on_submit(Some(&mut storage)));
        app.settle().await;
        assert_eq!(app.fetch_state().items, vec![story("0", "React")]);
        assert!(!app.fetch_state().is_error);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn dismiss_removes_locally_without_fetching() {
        let api = MockSearchApi::default();
        api.respond(Ok(vec![story("0", "React"), story("1", "Redux")]));
        let storage = MemoryStore::with("search", "React");
        let mut app = app(&api, &storage);
        app.settle().await;

        assert!(app.on_remove("1"));
        assert_eq!(app.fetch_state().items, vec![story("0", "React")]);
        assert!(!app.on_remove("1"));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn theme_choice_is_persisted() {
        let api = MockSearchApi::default();
        let mut storage = MemoryStore::with(DARK_MODE_KEY, "false");
        let mut app = app(&api, &storage);
        assert!(!app.theme.is_dark);

        app.toggle_theme(Some(&mut storage));
        assert!(app.theme.is_dark);
        assert_eq!(storage.get(DARK_MODE_KEY).as_deref(), Some("true"));
    }
}
