// SPDX-License-Identifier: MPL-2.0
//! Subscriptions for the application.
//!
//! Besides the two timers (toast sweep and spinner frames), every live list
//! shown on the current screen is a subscription keyed by [`FeedId`]. When
//! the screen changes, feeds whose id disappears are dropped and the store
//! listeners behind them are released.

use super::backend::Services;
use super::{Message, Screen};
use crate::app::config::TICK_INTERVAL_MS;
use crate::application::card_form::CardContext;
use crate::application::catalog::Taxonomy;
use crate::application::port::{watch_stream, DocumentId};
use crate::application::session::AuthState;
use crate::error::Error;
use crate::ui::card_detail;
use crate::ui::card_editor;
use crate::ui::card_game_detail;
use crate::ui::card_games;
use crate::ui::notifications::NotificationMessage;
use crate::ui::version_detail;
use crate::ui::widgets::animated_spinner::FRAME_INTERVAL;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use iced::{time, Subscription};
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Identity of a live feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FeedId {
    Auth,
    CardGames,
    CardGame(DocumentId),
    Versions(String),
    Cards(String, String),
    Taxonomy(CardForm, Taxonomy, String, String),
}

/// Screen whose card form receives a taxonomy feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CardForm {
    Version,
    Card,
}

impl CardForm {
    fn wrap(self, message: card_editor::Message) -> Message {
        match self {
            Self::Version => Message::Version(version_detail::Message::Editor(message)),
            Self::Card => Message::Card(card_detail::Message::Editor(message)),
        }
    }
}

/// Subscription data: the backend travels with the id, only the id is hashed.
struct FeedKey {
    id: FeedId,
    services: Services,
}

impl Hash for FeedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn feed(services: &Services, id: FeedId) -> Subscription<Message> {
    Subscription::run_with(
        FeedKey {
            id,
            services: services.clone(),
        },
        open_feed,
    )
}

fn open_feed(key: &FeedKey) -> BoxStream<'static, Message> {
    let catalog = &key.services.catalog;
    match &key.id {
        FeedId::Auth => watch_stream(key.services.auth.current_user())
            .map(Message::AuthChanged)
            .boxed(),
        FeedId::CardGames => catalog
            .card_games()
            .map(|result| {
                Message::CardGames(card_games::Message::Loaded(result.map_err(Error::from)))
            })
            .boxed(),
        FeedId::CardGame(id) => catalog
            .card_game(id)
            .map(|result| {
                Message::CardGame(card_game_detail::Message::GameLoaded(
                    result.map_err(Error::from),
                ))
            })
            .boxed(),
        FeedId::Versions(card_game_name) => catalog
            .versions(card_game_name)
            .map(|result| {
                Message::CardGame(card_game_detail::Message::VersionsLoaded(
                    result.map_err(Error::from),
                ))
            })
            .boxed(),
        FeedId::Cards(card_game_name, version_name) => catalog
            .cards(card_game_name, version_name)
            .map(|result| {
                Message::Version(version_detail::Message::CardsLoaded(
                    result.map_err(Error::from),
                ))
            })
            .boxed(),
        FeedId::Taxonomy(form, taxonomy, card_game_name, version_name) => {
            let (form, taxonomy) = (*form, *taxonomy);
            catalog
                .taxonomy_options(taxonomy, card_game_name, version_name)
                .map(move |result| {
                    form.wrap(card_editor::Message::OptionsLoaded(
                        taxonomy,
                        result.map_err(Error::from),
                    ))
                })
                .boxed()
        }
    }
}

/// Ticks the notification queue while toasts are shown.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(Duration::from_millis(TICK_INTERVAL_MS))
            .map(|_| Message::Notification(NotificationMessage::Tick))
    } else {
        Subscription::none()
    }
}

/// Drives the spinner while the busy overlay is shown.
pub fn create_spinner_subscription(animating: bool) -> Subscription<Message> {
    if animating {
        time::every(FRAME_INTERVAL).map(|_| Message::SpinnerTick)
    } else {
        Subscription::none()
    }
}

/// Follows the identity provider's session.
pub fn create_auth_subscription(services: &Services) -> Subscription<Message> {
    feed(services, FeedId::Auth)
}

/// Live lists needed by the current screen. Nothing is watched signed out.
pub fn create_feed_subscription(
    services: &Services,
    screen: &Screen,
    auth: &AuthState,
) -> Subscription<Message> {
    if auth.user().is_none() {
        return Subscription::none();
    }

    match screen {
        Screen::CardGames(_) => feed(services, FeedId::CardGames),
        Screen::CardGame(state) => {
            let game = feed(services, FeedId::CardGame(state.game_id.clone()));
            let versions = match state.card_game_name() {
                Some(name) => feed(services, FeedId::Versions(name.to_string())),
                None => Subscription::none(),
            };
            Subscription::batch([game, versions])
        }
        Screen::Version(state) => match state.context() {
            Some(context) => {
                let cards = feed(
                    services,
                    FeedId::Cards(context.card_game_name.clone(), context.version_name.clone()),
                );
                Subscription::batch([cards, taxonomy_feeds(services, &context, CardForm::Version)])
            }
            None => Subscription::none(),
        },
        Screen::Card(state) => match state.context() {
            Some(context) => taxonomy_feeds(services, &context, CardForm::Card),
            None => Subscription::none(),
        },
        Screen::Login(_) | Screen::Register(_) | Screen::Dashboard => Subscription::none(),
    }
}

/// Character and card type options for the card form.
fn taxonomy_feeds(
    services: &Services,
    context: &CardContext,
    form: CardForm,
) -> Subscription<Message> {
    Subscription::batch([Taxonomy::Character, Taxonomy::CardType].map(|taxonomy| {
        feed(
            services,
            FeedId::Taxonomy(
                form,
                taxonomy,
                context.card_game_name.clone(),
                context.version_name.clone(),
            ),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use std::collections::hash_map::DefaultHasher;
    use tempfile::TempDir;

    fn hash_of(value: &impl Hash) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn services() -> (Services, TempDir) {
        let temp = tempfile::tempdir().expect("temp dir");
        let services = Services::ephemeral(temp.path().join("blobs"), &Config::default());
        (services, temp)
    }

    #[test]
    fn feeds_for_different_versions_are_distinct() {
        let a = FeedId::Cards("ポケモン".into(), "v1".into());
        let b = FeedId::Cards("ポケモン".into(), "v2".into());
        assert_ne!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
    }

    #[test]
    fn taxonomy_feeds_are_keyed_by_kind_and_form() {
        let character =
            FeedId::Taxonomy(CardForm::Version, Taxonomy::Character, "g".into(), "v".into());
        let card_type =
            FeedId::Taxonomy(CardForm::Version, Taxonomy::CardType, "g".into(), "v".into());
        let on_card = FeedId::Taxonomy(CardForm::Card, Taxonomy::Character, "g".into(), "v".into());
        assert_ne!(hash_of(&character), hash_of(&card_type));
        assert_ne!(hash_of(&character), hash_of(&on_card));
    }

    #[test]
    fn feed_key_identity_ignores_backend_handle() {
        let (first, _a) = services();
        let (second, _b) = services();
        let key = |services: Services| FeedKey {
            id: FeedId::Versions("ポケモン".into()),
            services,
        };
        assert_eq!(hash_of(&key(first)), hash_of(&key(second)));
    }

    #[test]
    fn card_form_routes_options_to_its_screen() {
        let loaded = || card_editor::Message::OptionsLoaded(Taxonomy::Character, Ok(Vec::new()));
        assert!(matches!(
            CardForm::Version.wrap(loaded()),
            Message::Version(version_detail::Message::Editor(_))
        ));
        assert!(matches!(
            CardForm::Card.wrap(loaded()),
            Message::Card(card_detail::Message::Editor(_))
        ));
    }

    #[tokio::test]
    async fn auth_feed_reports_current_session_first() {
        let (services, _temp) = services();
        let mut stream = open_feed(&FeedKey {
            id: FeedId::Auth,
            services,
        });
        assert!(matches!(stream.next().await, Some(Message::AuthChanged(None))));
    }

    #[tokio::test]
    async fn card_games_feed_follows_writes() {
        let (services, _temp) = services();
        let catalog = services.catalog.clone();
        let mut stream = open_feed(&FeedKey {
            id: FeedId::CardGames,
            services,
        });

        match stream.next().await {
            Some(Message::CardGames(card_games::Message::Loaded(Ok(games)))) => {
                assert!(games.is_empty());
            }
            other => panic!("unexpected first item: {other:?}"),
        }

        catalog.add_card_game("ポケモン").await.expect("add");
        match stream.next().await {
            Some(Message::CardGames(card_games::Message::Loaded(Ok(games)))) => {
                assert_eq!(games.len(), 1);
                assert_eq!(games[0].name, "ポケモン");
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
