use std::sync::LazyLock;

pub struct UiText {
    pub app_title: String,

    // --- Tabs ---
    pub tab_dashboard: String,
    pub tab_characters: String,
    pub tab_crafting: String,
    pub tab_settings: String,

    // --- Startup screen ---
    pub ls_title: String,
    pub ls_subtitle: String,
    pub ls_syncing: String,
    pub ls_failed: String,
    pub ls_failure_suffix: String,

    // --- Top bar ---
    pub tb_connect: String,
    pub tb_resync: String,
    pub tb_burst_active: String,

    // --- Dashboard ---
    pub db_token_heading: String,
    pub db_wealth_heading: String,
    pub db_watchlist_heading: String,
    pub db_item_id_hint: String,
    pub db_add_item: String,
    pub db_remove: String,
    pub db_no_history: String,

    // --- Characters ---
    pub ch_heading: String,
    pub ch_empty: String,
    pub ch_col_name: String,
    pub ch_col_realm: String,
    pub ch_col_class: String,
    pub ch_col_level: String,
    pub ch_col_ilvl: String,
    pub ch_col_gold: String,
    pub ch_col_updated: String,

    // --- Crafting ---
    pub cr_heading: String,
    pub cr_search_hint: String,
    pub cr_search: String,
    pub cr_add: String,
    pub cr_remove: String,
    pub cr_empty: String,
    pub cr_target_price: String,
    pub cr_cost: String,
    pub cr_profit: String,

    // --- Settings ---
    pub st_heading: String,
    pub st_primary: String,
    pub st_fallback: String,
    pub st_series: String,
    pub st_interval: String,
    pub st_refresh: String,
    pub st_disarm_burst: String,

    // --- Common ---
    pub label_loading: String,
    pub label_updated: String,
    pub label_never: String,
    pub label_startup_failed: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Realm Guardian".to_string(),

    tab_dashboard: "Dashboard".to_string(),
    tab_characters: "Characters".to_string(),
    tab_crafting: "Crafting".to_string(),
    tab_settings: "Settings".to_string(),

    ls_title: "REALM GUARDIAN".to_string(),
    ls_subtitle: "Syncing account data from the backend...".to_string(),
    ls_syncing: "Syncing".to_string(),
    ls_failed: "Failed".to_string(),
    ls_failure_suffix: "series could not be loaded".to_string(),

    tb_connect: "Connect Battle.net".to_string(),
    tb_resync: "Sync characters".to_string(),
    tb_burst_active: "Syncing characters...".to_string(),

    db_token_heading: "WoW Token".to_string(),
    db_wealth_heading: "Total Gold".to_string(),
    db_watchlist_heading: "Watchlist".to_string(),
    db_item_id_hint: "Item ID".to_string(),
    db_add_item: "Add".to_string(),
    db_remove: "Remove".to_string(),
    db_no_history: "No history yet".to_string(),

    ch_heading: "Characters".to_string(),
    ch_empty: "No characters synced. Connect your Battle.net account to get started.".to_string(),
    ch_col_name: "Name".to_string(),
    ch_col_realm: "Realm".to_string(),
    ch_col_class: "Class".to_string(),
    ch_col_level: "Level".to_string(),
    ch_col_ilvl: "iLvl".to_string(),
    ch_col_gold: "Gold".to_string(),
    ch_col_updated: "Updated".to_string(),

    cr_heading: "Crafting".to_string(),
    cr_search_hint: "Search recipes".to_string(),
    cr_search: "Search".to_string(),
    cr_add: "Track".to_string(),
    cr_remove: "Untrack".to_string(),
    cr_empty: "No recipes tracked yet.".to_string(),
    cr_target_price: "Sells for".to_string(),
    cr_cost: "Cost".to_string(),
    cr_profit: "Profit".to_string(),

    st_heading: "Settings".to_string(),
    st_primary: "Primary endpoint".to_string(),
    st_fallback: "Fallback endpoint".to_string(),
    st_series: "Series".to_string(),
    st_interval: "Every".to_string(),
    st_refresh: "Refresh now".to_string(),
    st_disarm_burst: "Stop character sync".to_string(),

    label_loading: "Loading...".to_string(),
    label_updated: "Updated".to_string(),
    label_never: "never".to_string(),
    label_startup_failed: "Could not start the sync engine".to_string(),
});
