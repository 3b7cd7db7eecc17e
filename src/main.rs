//! sbtv-console - iSponsorBlockTV configuration in your terminal
//!
//! Edit a draft of the configuration, pair devices, manage the channel
//! whitelist, then save or discard in one go.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use sbtv_console::core::dashboard::Dashboard;
use sbtv_console::core::session::ConfigSession;
use sbtv_console::core::whitelist::ChannelWhitelist;
use sbtv_console::remote::Collaborators;
use sbtv_console::remote::http::HttpBackend;
use sbtv_console::storage::file_store::FileStore;
use sbtv_console::storage::settings::{self, Settings};
use sbtv_console::types::{AppState, ConfigKey, FieldUpdate, MenuItem, SkipCategory};
use sbtv_console::ui::progress::with_spinner;
use sbtv_console::ui::render::{
    format_changes, format_channel_label, format_device_label, format_edit_summary,
    format_result_label, format_value,
};
use sbtv_console::ui::selector::Selector;
use sbtv_console::ui::toast::TerminalNotifier;
use sbtv_console::utils::paths::get_settings_path;

/// iSponsorBlockTV configuration in your terminal.
#[derive(Parser, Debug)]
#[command(name = "sbtv-console")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dashboard backend URL
    #[arg(short, long, env = "SBTV_BACKEND_URL")]
    backend: Option<String>,

    /// Edit this config.json directly instead of the backend's copy
    #[arg(short, long, env = "SBTV_CONFIG_FILE")]
    file: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored configuration as JSON
    Show,
    /// Set one field and save immediately
    Set {
        /// Configuration key, e.g. minimum_skip_length
        key: String,
        /// New value
        value: String,
    },
    /// Write the effective settings to the settings file
    Init,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Settings file, overridden by flags and environment
async fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = settings::load_settings()
        .await
        .with_context(|| format!("reading {}", get_settings_path()))?;

    if let Some(ref url) = cli.backend {
        settings.backend_url = url.clone();
    }
    if let Some(ref file) = cli.file {
        settings.config_file = Some(file.clone());
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }
    Ok(settings)
}

fn build_collaborators(settings: &Settings) -> anyhow::Result<Collaborators> {
    let backend = HttpBackend::new(&settings.backend_url, settings.timeout())?;
    let remote = Collaborators::from_backend(backend);

    Ok(match settings.config_file {
        Some(ref path) => remote.with_store(FileStore::new(path)),
        None => remote,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli).await?;

    match cli.command {
        Some(Command::Init) => {
            settings::save_settings(&settings).await?;
            println!("{} {}", "Wrote".green(), get_settings_path());
            Ok(())
        }
        Some(Command::Show) => {
            let remote = build_collaborators(&settings)?;
            let session = ConfigSession::load(remote.store.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(session.committed())?);
            Ok(())
        }
        Some(Command::Set { key, value }) => {
            let update = FieldUpdate::parse(&key, &value)?;
            let remote = build_collaborators(&settings)?;
            let mut dash = Dashboard::open(remote, TerminalNotifier::new()).await?;
            dash.session_mut().update_field(update);
            if dash.session().is_dirty() && !dash.save().await {
                bail!("configuration was not saved");
            }
            Ok(())
        }
        None => {
            let remote = build_collaborators(&settings)?;
            let source = settings
                .config_file
                .clone()
                .unwrap_or_else(|| settings.backend_url.clone());
            println!("{} {}", "Loading configuration from".dimmed(), source);

            let dash = with_spinner("Loading...", Dashboard::open(remote, TerminalNotifier::new()))
                .await?;
            run_interactive(dash).await
        }
    }
}

type Dash = Dashboard<TerminalNotifier>;

async fn run_interactive(mut dash: Dash) -> anyhow::Result<()> {
    let selector = Selector::new();
    let mut state = AppState::Menu;

    while state != AppState::Exit {
        state = match state {
            AppState::Menu => main_menu(&dash, &selector),
            AppState::Settings => settings_screen(&mut dash, &selector),
            AppState::Devices => devices_screen(&mut dash, &selector).await,
            AppState::Whitelist => whitelist_screen(&mut dash, &selector).await,
            AppState::Review => {
                review(&dash);
                AppState::Menu
            }
            AppState::Save => {
                for warning in dash.session().validation_warnings() {
                    println!("{} {}", "Warning:".yellow(), warning);
                }
                with_spinner("Saving...", dash.save()).await;
                AppState::Menu
            }
            AppState::Discard => {
                if dash.session().is_dirty() && selector.confirm("Discard all unsaved changes?") {
                    dash.discard();
                }
                AppState::Menu
            }
            AppState::Exit => break,
        };

        if state == AppState::Exit
            && dash.session().is_dirty()
            && !selector.confirm("You have unsaved changes. Quit anyway?")
        {
            state = AppState::Menu;
        }
    }

    Ok(())
}

fn main_menu(dash: &Dash, selector: &Selector) -> AppState {
    let dirty = dash.session().is_dirty();
    let mut items = vec![
        MenuItem { label: "⚙  Global settings".into(), value: AppState::Settings },
        MenuItem { label: "📺 Devices".into(), value: AppState::Devices },
        MenuItem { label: "📋 Channel whitelist".into(), value: AppState::Whitelist },
    ];
    if dirty {
        items.push(MenuItem { label: "🔎 Review changes".into(), value: AppState::Review });
        items.push(MenuItem { label: "💾 Save changes".into(), value: AppState::Save });
        items.push(MenuItem { label: "↩  Discard changes".into(), value: AppState::Discard });
    }
    items.push(MenuItem { label: "Quit".into(), value: AppState::Exit });

    let prompt = if dirty { "iSponsorBlockTV (unsaved changes)" } else { "iSponsorBlockTV" };
    selector.select(&items, prompt).unwrap_or(AppState::Exit)
}

fn review(dash: &Dash) {
    let changes = format_changes(dash.session());
    if changes.is_empty() {
        println!("{}", "No changes.".dimmed());
        return;
    }
    for line in changes {
        println!("  {}", line);
    }
    for warning in dash.session().validation_warnings() {
        println!("{} {}", "Warning:".yellow(), warning);
    }
}

// ============================================
// Global settings
// ============================================

#[derive(Clone, Copy)]
enum SettingsAction {
    Categories,
    Toggle(ConfigKey),
    MinimumSkipLength,
    JoinName,
    Back,
}

fn settings_screen(dash: &mut Dash, selector: &Selector) -> AppState {
    loop {
        let draft = dash.session().draft();
        let row = |label: &str, key: ConfigKey| format!("{}: {}", label, format_value(draft, key));

        let mut items = vec![MenuItem {
            label: row("Skip categories", ConfigKey::SkipCategories),
            value: SettingsAction::Categories,
        }];
        for (label, key) in [
            ("Skip count tracking", ConfigKey::SkipCountTracking),
            ("Mute ads", ConfigKey::MuteAds),
            ("Skip ads", ConfigKey::SkipAds),
            ("Auto play", ConfigKey::AutoPlay),
            ("Use proxy", ConfigKey::UseProxy),
        ] {
            items.push(MenuItem { label: row(label, key), value: SettingsAction::Toggle(key) });
        }
        items.push(MenuItem {
            label: row("Minimum skip length", ConfigKey::MinimumSkipLength),
            value: SettingsAction::MinimumSkipLength,
        });
        items.push(MenuItem {
            label: row("Display name on TV", ConfigKey::JoinName),
            value: SettingsAction::JoinName,
        });
        items.push(MenuItem { label: "← Back".into(), value: SettingsAction::Back });

        let Some(action) = selector.select(&items, "Global settings") else {
            return AppState::Menu;
        };

        let session = dash.session_mut();
        match action {
            SettingsAction::Categories => {
                // Common toggles first, then whatever else the draft already carries
                let mut options: Vec<SkipCategory> = SkipCategory::COMMON.to_vec();
                for category in &session.draft().skip_categories {
                    if !options.contains(category) {
                        options.push(category.clone());
                    }
                }
                let labels: Vec<&str> = options.iter().map(|c| c.label()).collect();
                let checked: Vec<bool> = options
                    .iter()
                    .map(|c| session.draft().skip_categories.contains(c))
                    .collect();
                if let Some(chosen) = selector.multi_select(&labels, &checked, "Skip categories") {
                    let categories = chosen.into_iter().map(|i| options[i].clone()).collect();
                    session.update_field(FieldUpdate::SkipCategories(categories));
                }
            }
            SettingsAction::Toggle(key) => {
                if let Some(update) = FieldUpdate::toggle(session.draft(), key) {
                    session.update_field(update);
                }
            }
            SettingsAction::MinimumSkipLength => {
                let current = session.draft().minimum_skip_length.to_string();
                if let Some(raw) = selector.input("Minimum skip length (seconds)", &current) {
                    if let Ok(update) = FieldUpdate::parse(ConfigKey::MinimumSkipLength.as_str(), &raw) {
                        session.update_field(update);
                    }
                }
            }
            SettingsAction::JoinName => {
                let current = session.draft().join_name.clone().unwrap_or_default();
                if let Some(raw) = selector.input("Name shown on the TV (empty for default)", &current) {
                    if let Ok(update) = FieldUpdate::parse(ConfigKey::JoinName.as_str(), &raw) {
                        session.update_field(update);
                    }
                }
            }
            SettingsAction::Back => return AppState::Menu,
        }
    }
}

// ============================================
// Devices
// ============================================

#[derive(Clone, Copy)]
enum DeviceAction {
    Open(usize),
    Pair,
    Back,
}

async fn devices_screen(dash: &mut Dash, selector: &Selector) -> AppState {
    loop {
        let devices = &dash.session().draft().devices;
        if devices.is_empty() {
            println!("{}", "No devices found.".dimmed());
        }

        let mut items: Vec<MenuItem<DeviceAction>> = devices
            .iter()
            .enumerate()
            .map(|(i, d)| MenuItem { label: format_device_label(d), value: DeviceAction::Open(i) })
            .collect();
        items.push(MenuItem { label: "➕ Pair new device".into(), value: DeviceAction::Pair });
        items.push(MenuItem { label: "← Back".into(), value: DeviceAction::Back });

        match selector.select(&items, "Devices") {
            Some(DeviceAction::Open(index)) => device_actions(dash, selector, index),
            Some(DeviceAction::Pair) => pair_device(dash, selector).await,
            Some(DeviceAction::Back) | None => return AppState::Menu,
        }
    }
}

fn device_actions(dash: &mut Dash, selector: &Selector, index: usize) {
    let items = vec![
        MenuItem { label: "Edit".into(), value: 0 },
        MenuItem { label: "Delete".red().to_string(), value: 1 },
        MenuItem { label: "← Back".into(), value: 2 },
    ];
    match selector.select(&items, "Device") {
        Some(0) => edit_device(dash, selector, index),
        Some(1) => {
            if selector.confirm("Delete this device? It is removed when you save.") {
                dash.delete_device(index);
            }
        }
        _ => {}
    }
}

#[derive(Clone, Copy)]
enum EditAction {
    Name,
    Offset,
    RevealId,
    Done,
    Cancel,
}

fn edit_device(dash: &mut Dash, selector: &Selector, index: usize) {
    let session = dash.session().clone();
    if dash.devices.begin_edit(&session, index).is_err() {
        return;
    }

    loop {
        let Some(edit) = dash.devices.editing() else {
            return;
        };
        let summary = format_edit_summary(edit);
        let reveal = if edit.reveal_screen_id { "Hide device ID" } else { "Show device ID" };
        let items = vec![
            MenuItem { label: summary[0].clone(), value: EditAction::Name },
            MenuItem { label: summary[1].clone(), value: EditAction::Offset },
            MenuItem { label: format!("{} ({})", summary[2], reveal), value: EditAction::RevealId },
            MenuItem { label: "Done".green().to_string(), value: EditAction::Done },
            MenuItem { label: "Cancel".into(), value: EditAction::Cancel },
        ];

        let action = selector.select(&items, "Edit device").unwrap_or(EditAction::Cancel);
        let Some(edit) = dash.devices.editing_mut() else {
            return;
        };
        match action {
            EditAction::Name => {
                if let Some(name) = selector.input("Name", &edit.name) {
                    edit.name = name;
                }
            }
            EditAction::Offset => {
                if let Some(offset) = selector.input("Offset (ms)", &edit.offset) {
                    edit.offset = offset;
                }
            }
            EditAction::RevealId => edit.reveal_screen_id = !edit.reveal_screen_id,
            EditAction::Done => {
                dash.commit_device_edit(index);
                return;
            }
            EditAction::Cancel => {
                dash.devices.cancel_edit(index);
                return;
            }
        }
    }
}

async fn pair_device(dash: &mut Dash, selector: &Selector) {
    println!(
        "{}",
        "Enter the code from YouTube on your TV (Settings -> Link with TV code).".dimmed()
    );
    let form = dash.devices.form.clone();
    let Some(code) = selector.input("Pairing code", &form.code) else {
        return;
    };
    let name = selector.input("Custom name (optional)", &form.name).unwrap_or_default();
    let offset = selector.input("Audio offset (ms)", &form.offset).unwrap_or_default();

    dash.devices.form.code = code;
    dash.devices.form.name = name;
    dash.devices.form.offset = offset;

    with_spinner("Pairing...", dash.pair_device()).await;
}

// ============================================
// Channel whitelist
// ============================================

#[derive(Clone, Copy)]
enum WhitelistAction {
    ApiKey,
    Remove(usize),
    Search,
    AddManual,
    Back,
}

async fn whitelist_screen(dash: &mut Dash, selector: &Selector) -> AppState {
    loop {
        let session = dash.session();
        let available = ChannelWhitelist::is_available(session);

        let mut items = vec![MenuItem {
            label: format!("API key: {}", format_value(session.draft(), ConfigKey::ApiKey)),
            value: WhitelistAction::ApiKey,
        }];

        if available {
            let entries = ChannelWhitelist::entries(session);
            if entries.is_empty() {
                println!("{}", "No channels whitelisted.".dimmed());
            }
            items.extend(entries.iter().enumerate().map(|(i, c)| MenuItem {
                label: format!("✕ {}", format_channel_label(c)),
                value: WhitelistAction::Remove(i),
            }));
            items.push(MenuItem { label: "🔍 Search and add channel".into(), value: WhitelistAction::Search });
            items.push(MenuItem { label: "➕ Add channel by ID".into(), value: WhitelistAction::AddManual });
        } else if session.draft().apikey.is_empty() {
            println!(
                "{}",
                "A YouTube Data API key is required. Get one at https://console.cloud.google.com/apis/credentials"
                    .yellow()
            );
        } else {
            println!("{}", "Save the new API key to enable the channel whitelist.".yellow());
        }
        items.push(MenuItem { label: "← Back".into(), value: WhitelistAction::Back });

        match selector.select(&items, "Channel whitelist") {
            Some(WhitelistAction::ApiKey) => {
                let current = dash.session().draft().apikey.clone();
                if let Some(key) = selector.input("YouTube Data API key", &current) {
                    dash.session_mut().update_field(FieldUpdate::ApiKey(key));
                }
            }
            Some(WhitelistAction::Remove(index)) => {
                if selector.confirm("Remove this channel from the whitelist?") {
                    dash.remove_channel(index);
                }
            }
            Some(WhitelistAction::Search) => search_and_add(dash, selector).await,
            Some(WhitelistAction::AddManual) => {
                let Some(name) = selector.input("Channel name (e.g. Linus Tech Tips)", "") else {
                    continue;
                };
                let Some(id) = selector.input("Channel ID (e.g. UCXuqSBlHAE6Xw-yeJA0Tunw)", "") else {
                    continue;
                };
                dash.add_channel_manual(&id, &name);
            }
            Some(WhitelistAction::Back) | None => return AppState::Menu,
        }
    }
}

async fn search_and_add(dash: &mut Dash, selector: &Selector) {
    let Some(term) = selector.input("Search channels", "") else {
        return;
    };
    if term.trim().is_empty() {
        println!("{}", "Type a channel name to search.".dimmed());
        return;
    }

    let results = with_spinner("Searching...", dash.search_channels(&term)).await;
    if results.is_empty() {
        return;
    }

    let items: Vec<MenuItem<usize>> = results
        .iter()
        .enumerate()
        .map(|(i, r)| MenuItem {
            label: format_result_label(r, ChannelWhitelist::contains(dash.session(), &r.id)),
            value: i,
        })
        .collect();

    if let Some(index) = selector.select(&items, "Add channel") {
        dash.add_channel(results[index].to_entry());
    }
}
