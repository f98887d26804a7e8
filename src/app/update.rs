// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Screens never call the backend themselves. They return events, and the
//! handlers here turn those into tasks. Every backend call goes through
//! [`BusyTracker::run_tracked`], so the busy overlay covers it, and its
//! result is routed back to the screen that asked for it.

use super::backend::Services;
use super::screen::{Route, Screen};
use super::Message;
use crate::application::card_form::CardContext;
use crate::application::catalog::{CardFields, CardInfo};
use crate::application::port::{DocumentId, User};
use crate::application::session::{self, Access, AuthState};
use crate::application::upload::{self, PickedPhoto};
use crate::error::Error;
use crate::ui::card_detail::{self, Event as CardEvent};
use crate::ui::card_editor;
use crate::ui::card_game_detail::{self, Event as CardGameEvent};
use crate::ui::card_games::{self, Event as CardGamesEvent};
use crate::ui::dashboard;
use crate::ui::login::{self, Event as LoginEvent};
use crate::ui::notifications;
use crate::ui::register::{self, Event as RegisterEvent};
use crate::ui::sidebar;
use crate::ui::state::BusyTracker;
use crate::ui::version_detail::{self, Event as VersionEvent};
use iced::Task;
use std::future::Future;

/// Photo formats offered by the file dialog.
const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Context for update operations containing references to app state.
pub struct UpdateContext<'a> {
    pub services: &'a Services,
    pub busy: &'a BusyTracker,
    pub notifications: &'a notifications::Manager,
    pub screen: &'a mut Screen,
    pub auth: &'a mut AuthState,
}

/// Runs `future` as a tracked backend action and maps its output to a message.
fn tracked<T, Fut>(
    busy: &BusyTracker,
    future: Fut,
    map: impl FnOnce(T) -> Message + Send + 'static,
) -> Task<Message>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    Task::perform(busy.run_tracked(|| future), map)
}

/// Main update dispatcher for screen and session messages.
pub fn update(ctx: &mut UpdateContext<'_>, message: Message) -> Task<Message> {
    match message {
        Message::Login(message) => {
            let Screen::Login(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let event = state.update(message);
            handle_login_event(ctx, event)
        }
        Message::Register(message) => {
            let Screen::Register(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let event = state.update(message);
            handle_register_event(ctx, event)
        }
        Message::Dashboard(message) => match message {
            dashboard::Message::OpenPriceList => navigate(ctx, Route::CardGames),
            dashboard::Message::Logout => logout(ctx),
        },
        Message::Sidebar(message) => match message {
            sidebar::Message::OpenDashboard => navigate(ctx, Route::Dashboard),
            sidebar::Message::OpenPriceList => navigate(ctx, Route::CardGames),
            sidebar::Message::Logout => logout(ctx),
        },
        Message::CardGames(message) => {
            let Screen::CardGames(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let event = state.update(message, ctx.notifications);
            handle_card_games_event(ctx, event)
        }
        Message::CardGame(message) => {
            let Screen::CardGame(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let game_id = state.game_id.clone();
            let event = state.update(message, ctx.notifications);
            handle_card_game_event(ctx, &game_id, event)
        }
        Message::Version(message) => {
            let Screen::Version(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let (game_id, version_id) = (state.game_id.clone(), state.version_id.clone());
            let event = state.update(message, ctx.notifications);
            handle_version_event(ctx, game_id, version_id, event)
        }
        Message::Card(message) => {
            let Screen::Card(state) = &mut *ctx.screen else {
                return Task::none();
            };
            let event = state.update(message, ctx.notifications);
            handle_card_event(ctx, event)
        }
        Message::Notification(message) => {
            ctx.notifications.handle_message(&message);
            Task::none()
        }
        Message::AuthChanged(user) => handle_auth_changed(ctx, user),
        Message::LoggedOut(Ok(())) => {
            *ctx.auth = AuthState::SignedOut;
            ctx.notifications.success("notification-logged-out");
            navigate(ctx, Route::Login)
        }
        Message::LoggedOut(Err(err)) => {
            ctx.notifications.error(err.i18n_key());
            Task::none()
        }
        // Animation state lives on the app itself.
        Message::SpinnerTick => Task::none(),
    }
}

/// Switches to `route`, applying the route guard, and starts its one-shot loads.
pub fn navigate(ctx: &mut UpdateContext<'_>, route: Route) -> Task<Message> {
    let route = match ctx.auth.access(route.is_protected()) {
        Access::RedirectToLogin => Route::Login,
        Access::Granted | Access::Checking => route,
    };
    tracing::debug!(?route, "navigate");
    *ctx.screen = Screen::for_route(route.clone());

    let catalog = ctx.services.catalog.clone();
    match route {
        Route::Version { version, .. } => tracked(
            ctx.busy,
            async move { catalog.get_version(&version).await.map_err(Error::from) },
            |result| Message::Version(version_detail::Message::VersionLoaded(result)),
        ),
        Route::Card { card, .. } => tracked(
            ctx.busy,
            async move { catalog.get_card(&card).await.map_err(Error::from) },
            |result| Message::Card(card_detail::Message::CardLoaded(result)),
        ),
        // Card games are followed live by the feed subscription.
        Route::Login
        | Route::Register
        | Route::Dashboard
        | Route::CardGames
        | Route::CardGame(_) => Task::none(),
    }
}

fn navigate_back(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    match ctx.screen.parent() {
        Some(route) => navigate(ctx, route),
        None => Task::none(),
    }
}

fn handle_auth_changed(ctx: &mut UpdateContext<'_>, user: Option<User>) -> Task<Message> {
    let state = AuthState::from_user(user);
    tracing::info!(signed_in = state.user().is_some(), "auth state changed");
    let signed_out = state == AuthState::SignedOut;
    *ctx.auth = state;

    if signed_out && ctx.screen.is_protected() {
        navigate(ctx, Route::Login)
    } else {
        Task::none()
    }
}

fn logout(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let sign_out = ctx.services.auth.sign_out();
    tracked(
        ctx.busy,
        async move { sign_out.await.map_err(Error::from) },
        Message::LoggedOut,
    )
}

fn handle_login_event(ctx: &mut UpdateContext<'_>, event: LoginEvent) -> Task<Message> {
    match event {
        LoginEvent::None => Task::none(),
        LoginEvent::SignIn { email, password } => {
            let sign_in = ctx.services.auth.sign_in(&email, &password);
            tracked(ctx.busy, sign_in, |result| {
                Message::Login(login::Message::SignInFinished(result))
            })
        }
        LoginEvent::SignedIn(user) => {
            *ctx.auth = AuthState::SignedIn(user);
            ctx.notifications.success("notification-signed-in");
            navigate(ctx, Route::Dashboard)
        }
        LoginEvent::GoToRegister => navigate(ctx, Route::Register),
    }
}

fn handle_register_event(ctx: &mut UpdateContext<'_>, event: RegisterEvent) -> Task<Message> {
    match event {
        RegisterEvent::None => Task::none(),
        RegisterEvent::Register { email, password } => {
            let auth = ctx.services.auth.clone();
            tracked(
                ctx.busy,
                async move {
                    session::register_and_sign_in(auth, email, password)
                        .await
                        .map_err(Error::from)
                },
                |result| Message::Register(register::Message::RegisterFinished(result)),
            )
        }
        RegisterEvent::Registered(user) => {
            *ctx.auth = AuthState::SignedIn(user);
            ctx.notifications.success("notification-registered");
            navigate(ctx, Route::Dashboard)
        }
        RegisterEvent::BackToLogin => navigate(ctx, Route::Login),
    }
}

fn handle_card_games_event(ctx: &mut UpdateContext<'_>, event: CardGamesEvent) -> Task<Message> {
    let catalog = ctx.services.catalog.clone();
    match event {
        CardGamesEvent::None => Task::none(),
        CardGamesEvent::Add { name } => tracked(
            ctx.busy,
            async move { catalog.add_card_game(&name).await.map_err(Error::from) },
            |result| Message::CardGames(card_games::Message::AddFinished(result)),
        ),
        CardGamesEvent::Rename { id, name } => tracked(
            ctx.busy,
            async move { catalog.rename_card_game(&id, &name).await.map_err(Error::from) },
            |result| Message::CardGames(card_games::Message::RenameFinished(result)),
        ),
        CardGamesEvent::Delete { id } => tracked(
            ctx.busy,
            async move { catalog.delete_card_game(&id).await.map_err(Error::from) },
            |result| Message::CardGames(card_games::Message::DeleteFinished(result)),
        ),
        CardGamesEvent::Open(id) => navigate(ctx, Route::CardGame(id)),
    }
}

fn handle_card_game_event(
    ctx: &mut UpdateContext<'_>,
    game_id: &DocumentId,
    event: CardGameEvent,
) -> Task<Message> {
    match event {
        CardGameEvent::None => Task::none(),
        CardGameEvent::AddVersion {
            card_game_name,
            version_name,
        } => {
            let catalog = ctx.services.catalog.clone();
            tracked(
                ctx.busy,
                async move {
                    catalog
                        .add_version(&card_game_name, &version_name)
                        .await
                        .map_err(Error::from)
                },
                |result| Message::CardGame(card_game_detail::Message::AddFinished(result)),
            )
        }
        CardGameEvent::OpenVersion(version) => navigate(
            ctx,
            Route::Version {
                game: game_id.clone(),
                version,
            },
        ),
        CardGameEvent::Back => navigate_back(ctx),
    }
}

fn handle_version_event(
    ctx: &mut UpdateContext<'_>,
    game: DocumentId,
    version: DocumentId,
    event: VersionEvent,
) -> Task<Message> {
    match event {
        VersionEvent::None => Task::none(),
        VersionEvent::AddOption {
            taxonomy,
            context,
            name,
        } => {
            let catalog = ctx.services.catalog.clone();
            tracked(
                ctx.busy,
                async move {
                    catalog
                        .add_taxonomy_option(
                            taxonomy,
                            &context.card_game_name,
                            &context.version_name,
                            &name,
                        )
                        .await
                        .map_err(Error::from)
                },
                move |result| {
                    Message::Version(version_detail::Message::Editor(
                        card_editor::Message::OptionAdded(taxonomy, result),
                    ))
                },
            )
        }
        VersionEvent::PickPhoto => Task::perform(pick_photo(), |result| {
            Message::Version(version_detail::Message::Editor(
                card_editor::Message::PhotoPicked(result),
            ))
        }),
        VersionEvent::AddCard {
            context,
            fields,
            photo,
        } => tracked(
            ctx.busy,
            add_card(ctx.services.clone(), context, fields, photo),
            |result| Message::Version(version_detail::Message::CardAdded(result)),
        ),
        VersionEvent::OpenCard(card) => navigate(
            ctx,
            Route::Card {
                game,
                version,
                card,
            },
        ),
        VersionEvent::Back => navigate_back(ctx),
    }
}

fn handle_card_event(ctx: &mut UpdateContext<'_>, event: CardEvent) -> Task<Message> {
    match event {
        CardEvent::None => Task::none(),
        CardEvent::AddOption {
            taxonomy,
            context,
            name,
        } => {
            let catalog = ctx.services.catalog.clone();
            tracked(
                ctx.busy,
                async move {
                    catalog
                        .add_taxonomy_option(
                            taxonomy,
                            &context.card_game_name,
                            &context.version_name,
                            &name,
                        )
                        .await
                        .map_err(Error::from)
                },
                move |result| {
                    Message::Card(card_detail::Message::Editor(
                        card_editor::Message::OptionAdded(taxonomy, result),
                    ))
                },
            )
        }
        CardEvent::PickPhoto => Task::perform(pick_photo(), |result| {
            Message::Card(card_detail::Message::Editor(
                card_editor::Message::PhotoPicked(result),
            ))
        }),
        CardEvent::Save {
            id,
            context,
            fields,
            photo,
        } => tracked(
            ctx.busy,
            save_card(ctx.services.clone(), id, context, fields, photo),
            |result| Message::Card(card_detail::Message::SaveFinished(result)),
        ),
        CardEvent::Delete { id } => {
            let catalog = ctx.services.catalog.clone();
            tracked(
                ctx.busy,
                async move { catalog.delete_card(&id).await.map_err(Error::from) },
                |result| Message::Card(card_detail::Message::DeleteFinished(result)),
            )
        }
        CardEvent::Back => navigate_back(ctx),
    }
}

/// Opens the photo file dialog and reads the chosen file.
async fn pick_photo() -> Result<Option<PickedPhoto>, Error> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .add_filter("Image", &PHOTO_EXTENSIONS)
        .pick_file()
        .await
    else {
        return Ok(None);
    };
    let path = handle.path().to_path_buf();
    let bytes = tokio::fs::read(&path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "photo picked");
    Ok(Some(PickedPhoto { path, bytes }))
}

/// Uploads the picked photo, if any, and stores its URL in `fields`.
async fn attach_photo(
    services: &Services,
    context: &CardContext,
    fields: &mut CardFields,
    photo: Option<PickedPhoto>,
) -> Result<(), Error> {
    if let Some(photo) = photo {
        let url = upload::upload_card_photo(
            services.blobs.clone(),
            context.card_game_name.clone(),
            context.version_name.clone(),
            fields.card_name.clone(),
            photo,
        )
        .await?;
        fields.card_photo = Some(url);
    }
    Ok(())
}

async fn add_card(
    services: Services,
    context: CardContext,
    mut fields: CardFields,
    photo: Option<PickedPhoto>,
) -> Result<DocumentId, Error> {
    attach_photo(&services, &context, &mut fields, photo).await?;
    let id = services
        .catalog
        .add_card(&context.card_game_name, &context.version_name, &fields)
        .await?;
    Ok(id)
}

/// Saves the card and reads it back.
async fn save_card(
    services: Services,
    id: DocumentId,
    context: CardContext,
    mut fields: CardFields,
    photo: Option<PickedPhoto>,
) -> Result<Option<CardInfo>, Error> {
    attach_photo(&services, &context, &mut fields, photo).await?;
    services.catalog.update_card(&id, &fields).await?;
    Ok(services.catalog.get_card(&id).await?)
}
