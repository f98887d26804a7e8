// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between screens.
//!
//! The `App` struct wires together the identity provider, the catalog, the
//! busy tracker and the toast queue, and translates messages into state
//! changes. Screens only hold their own form state; everything that talks to
//! the backend goes through [`update`] so it can be tracked.

pub mod backend;
pub mod config;
mod message;
pub mod paths;
mod screen;
mod subscription;
mod update;
mod view;

pub use backend::Services;
pub use message::{Flags, Message};
pub use screen::{Route, Screen};

use crate::application::session::{Access, AuthState};
use crate::i18n::fluent::I18n;
use crate::ui::notifications;
use crate::ui::state::BusyTracker;
use crate::ui::theming::ThemeMode;
use crate::ui::widgets::animated_spinner::next_rotation;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    services: Services,
    busy: BusyTracker,
    notifications: notifications::Manager,
    auth: AuthState,
    screen: Screen,
    theme_mode: ThemeMode,
    spinner_rotation: f32,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen.route())
            .field("auth", &self.auth)
            .field("busy", &self.busy.in_flight())
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1080;
pub const MIN_WINDOW_HEIGHT: u32 = 560;
pub const MIN_WINDOW_WIDTH: u32 = 760;

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires an `Fn` boot closure; the flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads the configuration, opens the backend and starts on the
    /// dashboard. The route guard holds it behind the checking overlay
    /// until the identity provider reports the session.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang, &config);
        let notifications = notifications::Manager::with_default_ttl(config.notifications.ttl());

        let services = match Services::open(&config) {
            Ok(services) => services,
            Err(err) => {
                tracing::error!(error = %err, "local backend unavailable, using a temporary one");
                notifications.error(err.i18n_key());
                Services::ephemeral(std::env::temp_dir().join("kaitori_admin_blobs"), &config)
            }
        };

        if let Some(key) = config_warning {
            notifications.warning(key);
        }

        let app = Self::with_services(i18n, services, notifications, config.general.theme_mode);
        (app, Task::none())
    }

    fn with_services(
        i18n: I18n,
        services: Services,
        notifications: notifications::Manager,
        theme_mode: ThemeMode,
    ) -> Self {
        Self {
            i18n,
            services,
            busy: BusyTracker::new(),
            notifications,
            auth: AuthState::Pending,
            screen: Screen::Dashboard,
            theme_mode,
            spinner_rotation: 0.0,
        }
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.theme()
    }

    fn is_checking_auth(&self) -> bool {
        self.auth.access(self.screen.is_protected()) == Access::Checking
    }

    fn subscription(&self) -> Subscription<Message> {
        let auth_sub = subscription::create_auth_subscription(&self.services);
        let feed_sub =
            subscription::create_feed_subscription(&self.services, &self.screen, &self.auth);
        let tick_sub =
            subscription::create_tick_subscription(self.notifications.has_notifications());
        let spinner_sub = subscription::create_spinner_subscription(
            self.busy.is_busy() || self.is_checking_auth(),
        );

        Subscription::batch([auth_sub, feed_sub, tick_sub, spinner_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::SpinnerTick = message {
            self.spinner_rotation = next_rotation(self.spinner_rotation);
            return Task::none();
        }

        let mut ctx = update::UpdateContext {
            services: &self.services,
            busy: &self.busy,
            notifications: &self.notifications,
            screen: &mut self.screen,
            auth: &mut self.auth,
        };
        update::update(&mut ctx, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: &self.screen,
            auth: &self.auth,
            busy: self.busy.is_busy(),
            spinner_rotation: self.spinner_rotation,
            notifications: &self.notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::application::port::User;
    use crate::ui::{login, sidebar};
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let temp = tempfile::tempdir().expect("temp dir");
        let services = Services::ephemeral(temp.path().join("blobs"), &Config::default());
        let app = App::with_services(
            I18n::new(Some("en-US".into()), &Config::default()),
            services,
            notifications::Manager::new(),
            ThemeMode::Light,
        );
        (app, temp)
    }

    fn admin() -> User {
        User {
            uid: "u1".into(),
            email: "admin@example.com".into(),
        }
    }

    #[test]
    fn starts_on_dashboard_waiting_for_session() {
        let (app, _temp) = test_app();
        assert_eq!(app.screen.route(), Route::Dashboard);
        assert_eq!(app.auth, AuthState::Pending);
        assert!(app.is_checking_auth());
    }

    #[test]
    fn title_is_localized() {
        let (app, _temp) = test_app();
        assert_eq!(app.title(), app.i18n.tr("window-title"));
    }

    #[test]
    fn spinner_tick_advances_rotation() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::SpinnerTick);
        assert!(app.spinner_rotation > 0.0);
    }

    #[test]
    fn signed_out_session_redirects_to_login() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::AuthChanged(None));
        assert_eq!(app.auth, AuthState::SignedOut);
        assert_eq!(app.screen.route(), Route::Login);
    }

    #[test]
    fn restored_session_keeps_protected_screen() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::AuthChanged(Some(admin())));
        assert_eq!(app.auth, AuthState::SignedIn(admin()));
        assert_eq!(app.screen.route(), Route::Dashboard);
        assert!(!app.is_checking_auth());
    }

    #[test]
    fn sign_in_lands_on_dashboard() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::AuthChanged(None));
        let _ = app.update(Message::Login(login::Message::SignInFinished(Ok(admin()))));
        assert_eq!(app.screen.route(), Route::Dashboard);
        assert_eq!(app.auth.user().map(|u| u.email.as_str()), Some("admin@example.com"));
    }

    #[test]
    fn sidebar_navigation_is_guarded_while_signed_out() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::AuthChanged(None));
        let _ = app.update(Message::Sidebar(sidebar::Message::OpenPriceList));
        assert_eq!(app.screen.route(), Route::Login);
    }

    #[test]
    fn sidebar_opens_price_list_when_signed_in() {
        let (mut app, _temp) = test_app();
        let _ = app.update(Message::AuthChanged(Some(admin())));
        let _ = app.update(Message::Sidebar(sidebar::Message::OpenPriceList));
        assert_eq!(app.screen.route(), Route::CardGames);
    }
}
