use {
    chrono::Utc,
    eframe::egui::{
        Align, CentralPanel, Context, FontId, Grid, Key, Layout, RichText, ScrollArea,
        TextEdit, TopBottomPanel, Ui,
    },
    strum::IntoEnumIterator,
};

use crate::{
    app::App,
    domain::{DashboardTab, HistoryRange, SeriesId},
    engine::{AccountSnapshot, SeriesState},
    ui::{
        UI_CONFIG, UI_TEXT, UiStyleExt,
        charts::{gold_points, price_points, render_series_chart},
        styles::{colored_heading, get_outcome_color, status_color},
    },
    utils::{format_duration, format_gold, naive_utc_to_local, time_ago},
};

/// Something the user asked for during a frame. Applied after rendering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiAction {
    SelectTab(DashboardTab),
    Login,
    SetTokenRange(HistoryRange),
    AddWatchedItem(i64),
    RemoveWatchedItem(i64),
    ShowItemHistory(i64, HistoryRange),
    HideItemHistory,
    SearchRecipes(String),
    AddRecipe(i64),
    RemoveRecipe(i64),
    RefreshNow(SeriesId),
    DisarmBurst,
}

fn tab_label(tab: DashboardTab) -> &'static str {
    match tab {
        DashboardTab::Dashboard => &UI_TEXT.tab_dashboard,
        DashboardTab::Characters => &UI_TEXT.tab_characters,
        DashboardTab::Crafting => &UI_TEXT.tab_crafting,
        DashboardTab::Settings => &UI_TEXT.tab_settings,
    }
}

fn updated_label<T>(state: &SeriesState<T>) -> String {
    match state.refreshed_at {
        Some(at) => format!("{} {}", UI_TEXT.label_updated, time_ago(at, Utc::now())),
        None => format!("{} {}", UI_TEXT.label_updated, UI_TEXT.label_never),
    }
}

fn range_selector(ui: &mut Ui, current: HistoryRange) -> Option<HistoryRange> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for range in HistoryRange::iter() {
            if ui.selectable_label(range == current, range.label()).clicked() && range != current {
                picked = Some(range);
            }
        }
    });
    picked
}

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context, snapshot: &AccountSnapshot) {
        TopBottomPanel::top("top_toolbar")
            .frame(UI_CONFIG.top_panel_frame())
            .min_height(30.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(colored_heading(&UI_TEXT.app_title));
                    ui.separator();

                    for tab in DashboardTab::iter() {
                        if ui
                            .interactive_label(
                                tab_label(tab),
                                self.active_tab == tab,
                                UI_CONFIG.colors.label,
                                FontId::proportional(14.0),
                            )
                            .clicked()
                        {
                            self.pending.push(UiAction::SelectTab(tab));
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let label = if snapshot.characters().is_empty() {
                            &UI_TEXT.tb_connect
                        } else {
                            &UI_TEXT.tb_resync
                        };
                        if ui.button(label).clicked() {
                            self.pending.push(UiAction::Login);
                        }
                        if snapshot.burst_active {
                            ui.label(
                                RichText::new(&UI_TEXT.tb_burst_active)
                                    .color(UI_CONFIG.colors.warning),
                            );
                            ui.spinner();
                        }
                    });
                });
            });
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context, snapshot: &AccountSnapshot) {
        TopBottomPanel::bottom("status_bar")
            .frame(UI_CONFIG.bottom_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| match snapshot.transport_banner() {
                    Some(banner) => {
                        ui.label(RichText::new(banner).color(UI_CONFIG.colors.loss));
                    }
                    None => {
                        ui.label_subdued(updated_label(&snapshot.token_price));
                    }
                });
            });
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context, snapshot: &AccountSnapshot) {
        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| match self.active_tab {
                    DashboardTab::Dashboard => self.render_dashboard_tab(ui, snapshot),
                    DashboardTab::Characters => self.render_characters_tab(ui, snapshot),
                    DashboardTab::Crafting => self.render_crafting_tab(ui, snapshot),
                    DashboardTab::Settings => self.render_settings_tab(ui, snapshot),
                });
            });
    }

    fn render_dashboard_tab(&mut self, ui: &mut Ui, snapshot: &AccountSnapshot) {
        // 1. TOKEN
        ui.label(colored_heading(&UI_TEXT.db_token_heading));
        match snapshot.token_price.data() {
            Some(token) => {
                ui.label(
                    RichText::new(format_gold(token.price))
                        .size(28.0)
                        .strong()
                        .color(UI_CONFIG.colors.gold),
                );
            }
            None if snapshot.token_price.loading => {
                ui.spinner();
            }
            None => {
                ui.label_subdued("-");
            }
        }
        ui.label_subdued(updated_label(&snapshot.token_price));
        if let Some(range) = range_selector(ui, snapshot.token_range) {
            self.pending.push(UiAction::SetTokenRange(range));
        }
        let token_points = snapshot
            .token_history
            .data()
            .map(|h| price_points(h))
            .unwrap_or_default();
        render_series_chart(ui, "token_history", "Token", token_points, UI_CONFIG.colors.gold);

        ui.separator();

        // 2. WEALTH
        ui.label(colored_heading(&UI_TEXT.db_wealth_heading));
        ui.label(
            RichText::new(format_gold(snapshot.total_gold()))
                .size(22.0)
                .strong()
                .color(UI_CONFIG.colors.gold),
        );
        let wealth_points = snapshot
            .wealth_history
            .data()
            .map(|h| gold_points(h))
            .unwrap_or_default();
        render_series_chart(ui, "wealth_history", "Gold", wealth_points, UI_CONFIG.colors.profit);

        ui.separator();

        // 3. WATCHLIST
        self.render_watchlist(ui, snapshot);
    }

    fn render_watchlist(&mut self, ui: &mut Ui, snapshot: &AccountSnapshot) {
        ui.label(colored_heading(&UI_TEXT.db_watchlist_heading));
        ui.horizontal(|ui| {
            ui.add(
                TextEdit::singleline(&mut self.new_item_id)
                    .hint_text(&UI_TEXT.db_item_id_hint)
                    .desired_width(120.0),
            );
            if ui.button(&UI_TEXT.db_add_item).clicked() {
                if let Ok(item_id) = self.new_item_id.trim().parse::<i64>() {
                    self.pending.push(UiAction::AddWatchedItem(item_id));
                    self.new_item_id.clear();
                }
            }
        });
        if let Some(notice) = &snapshot.watchlist_notice {
            ui.label(RichText::new(notice).color(UI_CONFIG.colors.loss));
        }

        let Some(items) = snapshot.watchlist.data() else {
            if snapshot.watchlist.loading {
                ui.spinner();
            }
            return;
        };

        for item in items {
            let expanded = snapshot
                .expanded_item
                .filter(|(id, _)| *id == item.item_id);
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(expanded.is_some(), &item.name)
                    .clicked()
                {
                    self.pending.push(match expanded {
                        Some(_) => UiAction::HideItemHistory,
                        None => UiAction::ShowItemHistory(item.item_id, self.item_range),
                    });
                }
                ui.label(RichText::new(format_gold(item.current_price)).color(UI_CONFIG.colors.gold));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button(&UI_TEXT.db_remove).clicked() {
                        self.pending.push(UiAction::RemoveWatchedItem(item.item_id));
                    }
                });
            });

            if let Some((item_id, range)) = expanded {
                if let Some(picked) = range_selector(ui, range) {
                    self.item_range = picked;
                    self.pending.push(UiAction::ShowItemHistory(item_id, picked));
                }
                let points = snapshot
                    .item_history
                    .data()
                    .filter(|h| h.item_id == item_id)
                    .map(|h| price_points(&h.points))
                    .unwrap_or_default();
                render_series_chart(
                    ui,
                    &format!("item_history_{}", item_id),
                    &item.name,
                    points,
                    UI_CONFIG.colors.heading,
                );
            }
        }
    }

    fn render_characters_tab(&mut self, ui: &mut Ui, snapshot: &AccountSnapshot) {
        ui.label(colored_heading(&UI_TEXT.ch_heading));
        if snapshot.characters.loading {
            ui.spinner();
            return;
        }
        let characters = snapshot.characters();
        if characters.is_empty() {
            ui.label_subdued(&UI_TEXT.ch_empty);
            return;
        }

        Grid::new("characters_grid")
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for header in [
                    &UI_TEXT.ch_col_name,
                    &UI_TEXT.ch_col_realm,
                    &UI_TEXT.ch_col_class,
                    &UI_TEXT.ch_col_level,
                    &UI_TEXT.ch_col_ilvl,
                    &UI_TEXT.ch_col_gold,
                    &UI_TEXT.ch_col_updated,
                ] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for character in characters {
                    ui.label(&character.name);
                    ui.label(&character.realm);
                    ui.label(character.class_name.as_deref().unwrap_or("-"));
                    ui.label(character.level.map(|l| l.to_string()).unwrap_or_default());
                    ui.label(character.item_level.to_string());
                    ui.label(RichText::new(format_gold(character.gold)).color(UI_CONFIG.colors.gold));
                    ui.label_subdued(
                        character
                            .last_updated
                            .as_ref()
                            .map(naive_utc_to_local)
                            .unwrap_or_else(|| "-".to_string()),
                    );
                    ui.end_row();
                }
            });
    }

    fn render_crafting_tab(&mut self, ui: &mut Ui, snapshot: &AccountSnapshot) {
        ui.label(colored_heading(&UI_TEXT.cr_heading));
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.recipe_query)
                    .hint_text(&UI_TEXT.cr_search_hint)
                    .desired_width(240.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if ui.button(&UI_TEXT.cr_search).clicked() || submitted {
                self.pending
                    .push(UiAction::SearchRecipes(self.recipe_query.clone()));
            }
        });
        if let Some(notice) = &snapshot.recipe_notice {
            ui.label(RichText::new(notice).color(UI_CONFIG.colors.loss));
        }

        if snapshot.recipe_search.loading {
            ui.spinner();
        }
        if let Some(results) = snapshot.recipe_search.data() {
            for result in results {
                ui.horizontal(|ui| {
                    ui.label(&result.name);
                    if ui.small_button(&UI_TEXT.cr_add).clicked() {
                        self.pending.push(UiAction::AddRecipe(result.id));
                        self.recipe_query.clear();
                    }
                });
            }
        }

        ui.separator();

        let recipes = snapshot.recipes.data().map(Vec::as_slice).unwrap_or_default();
        if recipes.is_empty() {
            ui.label_subdued(&UI_TEXT.cr_empty);
            return;
        }
        for recipe in recipes {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    let title = if recipe.crafted_quantity > 1 {
                        format!("{} x{}", recipe.name, recipe.crafted_quantity)
                    } else {
                        recipe.name.clone()
                    };
                    ui.label(RichText::new(title).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button(&UI_TEXT.cr_remove).clicked() {
                            self.pending.push(UiAction::RemoveRecipe(recipe.id));
                        }
                    });
                });
                for reagent in &recipe.reagents {
                    ui.label_subdued(format!("{} x{}", reagent.name, reagent.quantity));
                }
                ui.horizontal(|ui| {
                    ui.metric(&UI_TEXT.cr_target_price, &format_gold(recipe.target_price), UI_CONFIG.colors.gold);
                    ui.metric(&UI_TEXT.cr_cost, &format_gold(recipe.total_cost), UI_CONFIG.colors.label);
                    ui.metric(
                        &UI_TEXT.cr_profit,
                        &format_gold(recipe.profit),
                        get_outcome_color(recipe.profit),
                    );
                });
            });
        }
    }

    fn render_settings_tab(&mut self, ui: &mut Ui, snapshot: &AccountSnapshot) {
        ui.label(colored_heading(&UI_TEXT.st_heading));
        let Some((endpoints, settings)) = self
            .sync
            .as_ref()
            .map(|sync| (sync.endpoints(), sync.settings().clone()))
        else {
            return;
        };

        ui.metric(&UI_TEXT.st_primary, &endpoints.primary, UI_CONFIG.colors.label);
        ui.metric(&UI_TEXT.st_fallback, &endpoints.fallback, UI_CONFIG.colors.label);
        ui.add_space(10.0);

        Grid::new("series_grid")
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new(&UI_TEXT.st_series).strong());
                ui.label(RichText::new(&UI_TEXT.st_interval).strong());
                ui.label("");
                ui.label("");
                ui.end_row();

                for series in SeriesId::STEADY {
                    let status = snapshot.sync_status(series);
                    ui.label(series.to_string());
                    ui.label(format_duration(settings.interval_for(series).as_millis() as i64));
                    ui.label(RichText::new(format!("{:?}", status)).color(status_color(&status)));
                    if ui.small_button(&UI_TEXT.st_refresh).clicked() {
                        self.pending.push(UiAction::RefreshNow(series));
                    }
                    ui.end_row();
                }
            });

        if snapshot.burst_active {
            ui.add_space(10.0);
            if ui.button(&UI_TEXT.st_disarm_burst).clicked() {
                self.pending.push(UiAction::DisarmBurst);
            }
        }
    }
}
