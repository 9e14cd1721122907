use {
    anyhow::Result,
    eframe::{
        Frame, Storage,
        egui::{CentralPanel, Context, OpenUrl, RichText, Visuals},
    },
    serde::{Deserialize, Serialize},
    std::{mem, sync::Arc},
};

use crate::{
    Cli,
    app::{AppState, BootstrapState, PhaseView, RunningState},
    config::{DF, SyncSettings},
    data::{LaunchContext, LoginNavigator, ReqwestTransport},
    domain::{DashboardTab, HistoryRange, SeriesId},
    engine::{SyncOrchestrator, SyncRuntime, SyncStatus},
    ui::{UI_CONFIG, UI_TEXT, UiAction, render_bootstrap},
};

/// Hands the login redirect to the platform (browser tab or system browser).
struct EguiNavigator {
    ctx: Context,
}

impl LoginNavigator for EguiNavigator {
    fn navigate(&self, url: &str) {
        self.ctx.open_url(OpenUrl::same_tab(url));
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    // Persisted across sessions
    pub(crate) active_tab: DashboardTab,
    pub(crate) token_range: HistoryRange,
    pub(crate) item_range: HistoryRange,

    // Declared before `runtime` so the orchestrator unmounts before the runtime stops
    #[serde(skip)]
    pub(crate) sync: Option<SyncOrchestrator>,
    #[serde(skip)]
    runtime: Option<SyncRuntime>,
    #[serde(skip)]
    state: AppState,
    #[serde(skip)]
    pub(crate) pending: Vec<UiAction>,
    #[serde(skip)]
    pub(crate) new_item_id: String,
    #[serde(skip)]
    pub(crate) recipe_query: String,
    #[serde(skip)]
    startup_error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            active_tab: DashboardTab::default(),
            token_range: HistoryRange::default(),
            item_range: HistoryRange::ITEM_DEFAULT,
            sync: None,
            runtime: None,
            state: AppState::default(),
            pending: Vec::new(),
            new_item_id: String::new(),
            recipe_query: String::new(),
            startup_error: None,
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        app.state = AppState::Bootstrapping(BootstrapState::default());

        match Self::start_sync(&cc.egui_ctx, &args, app.token_range) {
            Ok((runtime, sync)) => {
                app.runtime = Some(runtime);
                app.sync = Some(sync);
            }
            Err(e) => {
                log::error!("{}: {:#}", UI_TEXT.label_startup_failed, e);
                app.startup_error = Some(format!("{:#}", e));
            }
        }

        app
    }

    fn start_sync(
        ctx: &Context,
        args: &Cli,
        token_range: HistoryRange,
    ) -> Result<(SyncRuntime, SyncOrchestrator)> {
        let settings = SyncSettings::from_cli(args);
        let runtime = SyncRuntime::start()?;
        let transport = Arc::new(ReqwestTransport::new(settings.http_timeout)?);
        let navigation = Arc::new(LaunchContext::parse(&args.launch_url)?);
        let navigator = Arc::new(EguiNavigator { ctx: ctx.clone() });

        let sync = SyncOrchestrator::new(settings, transport, navigation, navigator, runtime.handle());
        // Restore the saved window before the first fetch goes out
        sync.set_token_range(token_range);
        sync.mount();
        Ok((runtime, sync))
    }

    /// Switch to the view the login round-trip asked for (once).
    fn apply_view_hint(&mut self) {
        if let Some(tab) = self.sync.as_ref().and_then(|s| s.take_view_hint()) {
            self.active_tab = tab;
        }
    }

    fn apply_actions(&mut self) {
        let actions = mem::take(&mut self.pending);
        let Some(sync) = &self.sync else {
            return;
        };

        for action in actions {
            #[cfg(debug_assertions)]
            if DF.log_ui_actions {
                log::info!("[ui] {:?}", action);
            }

            match action {
                UiAction::SelectTab(tab) => self.active_tab = tab,
                UiAction::Login => {
                    if let Err(e) = sync.request_login(self.active_tab) {
                        log::error!("Login redirect failed: {:#}", e);
                    }
                }
                UiAction::SetTokenRange(range) => {
                    self.token_range = range;
                    sync.set_token_range(range);
                }
                UiAction::AddWatchedItem(item_id) => sync.add_watched_item(item_id),
                UiAction::RemoveWatchedItem(item_id) => sync.remove_watched_item(item_id),
                UiAction::ShowItemHistory(item_id, range) => sync.show_item_history(item_id, range),
                UiAction::HideItemHistory => sync.hide_item_history(),
                UiAction::SearchRecipes(query) => sync.search_recipes(&query),
                UiAction::AddRecipe(recipe_id) => sync.add_recipe(recipe_id),
                UiAction::RemoveRecipe(id) => sync.remove_recipe(id),
                UiAction::RefreshNow(series) => sync.refresh_now(series),
                UiAction::DisarmBurst => sync.disarm_burst(),
            }
        }
    }

    pub(crate) fn tick_bootstrap_state(
        &mut self,
        ctx: &Context,
        state: &mut BootstrapState,
    ) -> AppState {
        let Some(sync) = &self.sync else {
            self.render_startup_error(ctx);
            return AppState::Bootstrapping(state.clone());
        };

        let snapshot = sync.snapshot();
        state.rows = SeriesId::STEADY
            .iter()
            .map(|s| (*s, snapshot.sync_status(*s)))
            .collect();
        state.completed = state
            .rows
            .iter()
            .filter(|(_, s)| matches!(s, SyncStatus::Completed(_)))
            .count();
        state.failed = state
            .rows
            .iter()
            .filter(|(_, s)| matches!(s, SyncStatus::Failed(_)))
            .count();

        if snapshot.is_settled() {
            log::info!(
                "Initial sync settled ({} ok, {} failed)",
                state.completed,
                state.failed
            );
            self.apply_view_hint();
            ctx.request_repaint();
            return AppState::Running(RunningState);
        }

        render_bootstrap(ctx, state);
        ctx.request_repaint_after(UI_CONFIG.repaint.bootstrap);
        AppState::Bootstrapping(state.clone())
    }

    /// RUNNING PHASE MAIN LOOP
    pub(crate) fn tick_running_state(&mut self, ctx: &Context) {
        self.apply_view_hint();
        let Some(snapshot) = self.sync.as_ref().map(|s| s.snapshot()) else {
            return;
        };

        self.render_top_panel(ctx, &snapshot);
        self.render_status_panel(ctx, &snapshot);
        self.render_central_panel(ctx, &snapshot);
        self.apply_actions();

        // Snapshot changes arrive from the sync thread, so poll it
        ctx.request_repaint_after(if snapshot.burst_active {
            UI_CONFIG.repaint.burst
        } else {
            UI_CONFIG.repaint.steady
        });
    }

    fn render_startup_error(&self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading(
                    RichText::new(&UI_TEXT.label_startup_failed).color(UI_CONFIG.colors.loss),
                );
                if let Some(err) = &self.startup_error {
                    ui.label(err);
                }
            });
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        let current = mem::take(&mut self.state);
        self.state = match current {
            AppState::Bootstrapping(mut s) => s.tick(self, ctx),
            AppState::Running(mut s) => s.tick(self, ctx),
        };
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        #[cfg(debug_assertions)]
        if DF.log_ui_actions {
            log::info!(
                "SAVE [App]: tab = {}, token range = {}",
                self.active_tab,
                self.token_range
            );
        }
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}

fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    ctx.set_visuals(visuals);
    ctx.style_mut(|s| s.interaction.selectable_labels = false);
}
