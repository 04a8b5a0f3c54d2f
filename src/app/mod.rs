use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui::{self, Context, Pos2, Rect, Sense, pos2, vec2};
use log::{info, warn};

use crate::store::{StoreClient, WorkspaceRecord};
use crate::workspace::{LayoutSnapshot, MatrixMeta, Workspace};

mod controls;
mod draw;
mod hooks;
mod interaction;

pub use hooks::{Activation, ActivationState, Category, ComposerSink, PromptSink};
pub use interaction::{ClickAction, InteractionState};

use draw::Palette;
use hooks::TransitionSuppression;

const THEME_SUPPRESSION_SECS: f64 = 0.15;
const STATUS_REVERT_SECS: f64 = 2.5;
const LOAD_RETRY_SECS: f64 = 0.5;

struct StatusLabel {
    text: String,
    revert_at: Option<f64>,
}

impl StatusLabel {
    fn set(&mut self, text: impl Into<String>, now: f64) {
        self.text = text.into();
        self.revert_at = Some(now + STATUS_REVERT_SECS);
    }

    fn tick(&mut self, now: f64) {
        if self.revert_at.is_some_and(|deadline| now >= deadline) {
            self.text.clear();
            self.revert_at = None;
        }
    }
}

/// Load lifecycle of the remote workspace record: at most one fetch in
/// flight, at most one successful restore per session, and a record
/// that arrives before node initialization is held back until a retry
/// deadline.
#[derive(Default)]
struct LoadState {
    in_flight: bool,
    done: bool,
    pending: Option<WorkspaceRecord>,
    retry_at: f64,
}

impl LoadState {
    fn can_begin(&self) -> bool {
        !self.in_flight && !self.done
    }

    fn begin(&mut self) {
        self.in_flight = true;
    }

    fn fail(&mut self) {
        self.in_flight = false;
    }

    /// Settles an arrived record: returns it for immediate application
    /// when the workspace is ready, otherwise parks it with a retry
    /// deadline.
    fn resolve(
        &mut self,
        record: WorkspaceRecord,
        initialized: bool,
        now: f64,
    ) -> Option<WorkspaceRecord> {
        self.in_flight = false;
        if initialized {
            Some(record)
        } else {
            self.pending = Some(record);
            self.retry_at = now + LOAD_RETRY_SECS;
            None
        }
    }

    fn take_due(&mut self, initialized: bool, now: f64) -> Option<WorkspaceRecord> {
        if initialized && now >= self.retry_at {
            self.pending.take()
        } else {
            None
        }
    }

    fn mark_done(&mut self) {
        self.done = true;
    }
}

pub struct WorkspaceApp {
    workspace: Workspace,
    interaction: InteractionState,
    activation: ActivationState,
    composer: ComposerSink,
    prompt_sink: Option<Box<dyn PromptSink + Send>>,
    store: StoreClient,
    status: StatusLabel,
    suppression: TransitionSuppression,
    load_rx: Option<Receiver<Result<WorkspaceRecord, String>>>,
    save_rx: Option<Receiver<Result<(), String>>>,
    load: LoadState,
    last_viewport: Rect,
}

impl WorkspaceApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, store: StoreClient, theme: String) -> Self {
        let mut workspace = Workspace::new(Rect::from_min_size(Pos2::ZERO, vec2(1440.0, 920.0)));
        workspace.theme = theme;

        let mut app = Self {
            workspace,
            interaction: InteractionState::default(),
            activation: ActivationState::default(),
            composer: ComposerSink::default(),
            prompt_sink: None,
            store,
            status: StatusLabel {
                text: String::new(),
                revert_at: None,
            },
            suppression: TransitionSuppression::default(),
            load_rx: None,
            save_rx: None,
            load: LoadState::default(),
            last_viewport: Rect::NOTHING,
        };
        app.request_load(0.0);
        app
    }

    pub fn with_prompt_sink(mut self, sink: Box<dyn PromptSink + Send>) -> Self {
        self.prompt_sink = Some(sink);
        self
    }

    pub fn set_active(&mut self, node: &str, hub: &str, category: Category, glyph: Option<String>) {
        self.activation.set_active(node, hub, category, glyph);
    }

    pub fn background_animation_enabled(&self) -> bool {
        self.workspace.background_animation
    }

    pub fn toggle_background_animation(&mut self) {
        self.workspace.background_animation = !self.workspace.background_animation;
    }

    fn forward_prompt(&mut self, prompt: &str) {
        match self.prompt_sink.as_mut() {
            Some(sink) => sink.push_prompt(prompt),
            None => self.composer.push_prompt(prompt),
        }
    }

    fn set_theme(&mut self, name: &str, now: f64) {
        if self.workspace.theme != name {
            self.workspace.theme = name.to_owned();
            self.suppression.suppress_for(now, THEME_SUPPRESSION_SECS);
        }
    }

    fn request_load(&mut self, now: f64) {
        if !self.load.can_begin() {
            return;
        }
        if !self.store.has_token() {
            self.status.set("Sign in to restore your workspace", now);
            return;
        }
        self.load.begin();
        self.load_rx = Some(self.store.spawn_fetch());
    }

    fn request_save(&mut self, now: f64) {
        if self.save_rx.is_some() {
            return;
        }
        if !self.store.has_token() {
            self.status.set("Sign in to save your workspace", now);
            return;
        }

        let snapshot = self.workspace.collect();
        let matrix = self.workspace.collect_matrix();
        let record = match (
            serde_json::to_string(&snapshot),
            serde_json::to_string(&matrix),
        ) {
            (Ok(layout_json), Ok(matrix_json)) => WorkspaceRecord {
                layout_json,
                matrix_json,
                theme: self.workspace.theme.clone(),
            },
            (layout, matrix) => {
                warn!("could not serialize workspace: {layout:?} {matrix:?}");
                self.status.set("Save failed", now);
                return;
            }
        };

        self.status.set("Saving...", now);
        self.save_rx = Some(self.store.spawn_persist(record));
    }

    fn poll_store(&mut self, now: f64) {
        if let Some(rx) = self.load_rx.take() {
            match rx.try_recv() {
                Ok(Ok(record)) => {
                    let initialized = self.workspace.is_initialized();
                    if let Some(record) = self.load.resolve(record, initialized, now) {
                        self.apply_record(&record, now);
                    }
                }
                Ok(Err(error)) => {
                    self.load.fail();
                    warn!("workspace restore failed: {error}");
                    self.status.set("Load failed", now);
                }
                Err(TryRecvError::Empty) => self.load_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {
                    self.load.fail();
                    self.status.set("Load failed", now);
                }
            }
        }

        let initialized = self.workspace.is_initialized();
        if let Some(record) = self.load.take_due(initialized, now) {
            self.apply_record(&record, now);
        }

        if let Some(rx) = self.save_rx.take() {
            match rx.try_recv() {
                Ok(Ok(())) => self.status.set("Saved", now),
                Ok(Err(error)) => {
                    warn!("workspace save failed: {error}");
                    self.status.set("Save failed", now);
                }
                Err(TryRecvError::Empty) => self.save_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.status.set("Save failed", now),
            }
        }
    }

    fn apply_record(&mut self, record: &WorkspaceRecord, now: f64) {
        if !record.layout_json.is_empty() {
            match serde_json::from_str::<LayoutSnapshot>(&record.layout_json) {
                Ok(snapshot) => self.workspace.apply_snapshot(&snapshot),
                Err(error) => warn!("ignoring malformed layout_json: {error}"),
            }
        }
        if !record.matrix_json.is_empty() {
            match serde_json::from_str::<MatrixMeta>(&record.matrix_json) {
                Ok(meta) => self.workspace.apply_matrix(&meta),
                Err(error) => warn!("ignoring malformed matrix_json: {error}"),
            }
        }
        if !record.theme.is_empty() {
            let theme = record.theme.clone();
            self.set_theme(&theme, now);
        }
        self.load.mark_done();
        self.status.set("Workspace restored", now);
        info!("workspace restored from remote record");
    }

    fn panel_rect(viewport: Rect) -> Rect {
        let width = (viewport.width() * 0.36).clamp(320.0, 560.0);
        let height = (viewport.height() - 160.0).max(240.0);
        Rect::from_center_size(
            pos2(viewport.center().x, viewport.top() + 90.0 + height * 0.5),
            vec2(width, height),
        )
    }

    fn workspace_frame(&mut self, ui: &mut egui::Ui, now: f64) {
        let viewport = ui.max_rect();
        let panel = Self::panel_rect(viewport);

        if !self.workspace.is_initialized() {
            self.workspace.init_defaults(viewport, panel);
        } else if viewport != self.last_viewport {
            self.workspace.viewport = viewport;
            self.workspace.panel = Some(panel);
            self.workspace.constrain_all_nodes();
            self.workspace.refresh_anchors();
        }
        self.last_viewport = viewport;

        let palette = Palette::by_name(&self.workspace.theme);
        let painter = ui.painter_at(viewport);

        if self.workspace.background_animation {
            draw::draw_background(&painter, viewport, &palette, now);
        } else {
            draw::draw_flat_background(&painter, viewport, &palette);
        }
        draw::draw_panel(&painter, panel, &palette);

        self.handle_pointer(ui, now);

        // Theme switches briefly freeze the chains.
        if self.suppression.is_active(now) {
            self.workspace.refresh_anchors();
        } else {
            self.workspace.step_ropes();
        }

        for rope in self.workspace.ropes() {
            draw::draw_rope(&painter, rope, &palette);
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| self.node_at(pointer));
        for node in self.workspace.nodes() {
            let is_hovered = hovered.as_deref() == Some(node.id());
            draw::draw_node(&painter, node, &self.activation, &palette, is_hovered);
        }

        self.composer_panel(ui, panel, &palette);
    }

    fn node_at(&self, pointer: Pos2) -> Option<String> {
        self.workspace
            .nodes()
            .iter()
            .filter(|node| !node.collapsed)
            .find(|node| node.rect().contains(pointer))
            .map(|node| node.id().to_owned())
    }

    fn handle_pointer(&mut self, ui: &mut egui::Ui, now: f64) {
        let ids: Vec<&'static str> = self
            .workspace
            .nodes()
            .iter()
            .filter(|node| !node.collapsed)
            .map(|node| node.id())
            .collect();

        for id in ids {
            let Some(rect) = self.workspace.node(id).map(|node| node.rect()) else {
                continue;
            };
            let response = ui.interact(
                rect,
                ui.id().with(("workspace-node", id)),
                Sense::click_and_drag(),
            );

            if response.drag_started() {
                let secondary = response.drag_started_by(egui::PointerButton::Secondary);
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.interaction
                        .begin_drag(&self.workspace, id, pointer, now, secondary);
                }
            }
            if response.dragged()
                && let Some(pointer) = response.interact_pointer_pos()
            {
                self.interaction.drag_to(&mut self.workspace, pointer, now);
            }
            if response.drag_stopped() {
                self.interaction.end_drag(&mut self.workspace);
            }

            if response.clicked() {
                match self.interaction.click(&self.workspace, id) {
                    ClickAction::ToggleGroup(key) => self.workspace.toggle_group(&key),
                    ClickAction::Prompt(prompt) => self.forward_prompt(prompt),
                    ClickAction::Ignored => {}
                }
            }
        }

        self.interaction.tick();
    }

    fn composer_panel(&mut self, ui: &mut egui::Ui, panel: Rect, palette: &Palette) {
        let inner = panel.shrink(14.0);
        let composer_height = 28.0;
        let composer_rect = Rect::from_min_max(
            pos2(inner.left(), inner.bottom() - composer_height),
            inner.max,
        );

        let mut composer_ui = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(composer_rect)
                .layout(egui::Layout::left_to_right(egui::Align::Center)),
        );
        let edit = egui::TextEdit::singleline(&mut self.composer.text)
            .hint_text("Ask me anything...")
            .desired_width(composer_rect.width() - 64.0)
            .text_color(palette.text);
        let edit_response = composer_ui.add(edit);
        let submit = composer_ui.button("Send").clicked()
            || (edit_response.lost_focus()
                && composer_ui.input(|input| input.key_pressed(egui::Key::Enter)));
        if submit && !self.composer.text.trim().is_empty() {
            info!("composer submit: {}", self.composer.text.trim());
            self.composer.text.clear();
            self.activation.clear();
        }
    }
}

impl eframe::App for WorkspaceApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|input| input.time);

        self.poll_store(now);
        self.status.tick(now);

        let palette = Palette::by_name(&self.workspace.theme);
        ctx.set_visuals(if palette.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.show_controls(ui, now);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.workspace_frame(ui, now);
            });

        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_load_requests_are_short_circuited() {
        let mut load = LoadState::default();
        assert!(load.can_begin());
        load.begin();
        assert!(!load.can_begin(), "a fetch is already in flight");

        load.fail();
        assert!(load.can_begin(), "a failed fetch may be retried");

        load.begin();
        let record = WorkspaceRecord::default();
        assert!(load.resolve(record, true, 0.0).is_some());
        load.mark_done();
        assert!(!load.can_begin(), "one restore per session");
    }

    #[test]
    fn early_record_is_held_until_the_retry_deadline() {
        let mut load = LoadState::default();
        load.begin();

        let record = WorkspaceRecord {
            theme: "paper".to_owned(),
            ..Default::default()
        };
        assert!(load.resolve(record, false, 1.0).is_none());
        assert!(load.can_begin(), "the parked record does not block a retry");

        assert!(load.take_due(false, 10.0).is_none(), "still uninitialized");
        assert!(load.take_due(true, 1.2).is_none(), "deadline not reached");

        let held = load
            .take_due(true, 1.0 + LOAD_RETRY_SECS)
            .expect("record released after the deadline");
        assert_eq!(held.theme, "paper");
        assert!(load.take_due(true, 10.0).is_none(), "released only once");
    }

    #[test]
    fn status_label_reverts_after_the_timeout() {
        let mut status = StatusLabel {
            text: String::new(),
            revert_at: None,
        };
        status.set("Saved", 1.0);
        status.tick(1.0 + STATUS_REVERT_SECS - 0.1);
        assert_eq!(status.text, "Saved");
        status.tick(1.0 + STATUS_REVERT_SECS);
        assert!(status.text.is_empty());
    }
}
