// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::User;
use crate::error::Error;
use crate::ui::card_detail;
use crate::ui::card_game_detail;
use crate::ui::card_games;
use crate::ui::dashboard;
use crate::ui::login;
use crate::ui::notifications;
use crate::ui::register;
use crate::ui::sidebar;
use crate::ui::version_detail;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level screen messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Login(login::Message),
    Register(register::Message),
    Dashboard(dashboard::Message),
    Sidebar(sidebar::Message),
    CardGames(card_games::Message),
    CardGame(card_game_detail::Message),
    Version(version_detail::Message),
    Card(card_detail::Message),
    Notification(notifications::NotificationMessage),
    /// The identity provider reported the signed-in user.
    AuthChanged(Option<User>),
    LoggedOut(Result<(), Error>),
    /// Spinner animation frame while the busy overlay is shown.
    SpinnerTick,
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `ja`, `en-US`).
    pub lang: Option<String>,
    /// Optional data directory override (catalog, accounts, photos).
    /// Takes precedence over `KAITORI_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `KAITORI_CONFIG_DIR`.
    pub config_dir: Option<String>,
}
