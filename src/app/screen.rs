// SPDX-License-Identifier: MPL-2.0
//! Routes and the state of the screen currently shown.

use crate::application::port::DocumentId;
use crate::ui::card_detail;
use crate::ui::card_game_detail;
use crate::ui::card_games;
use crate::ui::login;
use crate::ui::register;
use crate::ui::sidebar::Section;
use crate::ui::version_detail;

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    CardGames,
    CardGame(DocumentId),
    Version {
        game: DocumentId,
        version: DocumentId,
    },
    Card {
        game: DocumentId,
        version: DocumentId,
        card: DocumentId,
    },
}

impl Route {
    /// Whether the route needs a signed-in user.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// The screen currently shown, with its state.
#[derive(Debug, Clone)]
pub enum Screen {
    Login(login::State),
    Register(register::State),
    Dashboard,
    CardGames(card_games::State),
    CardGame(card_game_detail::State),
    Version(version_detail::State),
    Card(card_detail::State),
}

impl Screen {
    /// Fresh screen state for `route`.
    #[must_use]
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Login => Screen::Login(login::State::default()),
            Route::Register => Screen::Register(register::State::default()),
            Route::Dashboard => Screen::Dashboard,
            Route::CardGames => Screen::CardGames(card_games::State::default()),
            Route::CardGame(id) => Screen::CardGame(card_game_detail::State::new(id)),
            Route::Version { game, version } => {
                Screen::Version(version_detail::State::new(game, version))
            }
            Route::Card {
                game,
                version,
                card,
            } => Screen::Card(card_detail::State::new(game, version, card)),
        }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Screen::Login(_) => Route::Login,
            Screen::Register(_) => Route::Register,
            Screen::Dashboard => Route::Dashboard,
            Screen::CardGames(_) => Route::CardGames,
            Screen::CardGame(state) => Route::CardGame(state.game_id.clone()),
            Screen::Version(state) => Route::Version {
                game: state.game_id.clone(),
                version: state.version_id.clone(),
            },
            Screen::Card(state) => Route::Card {
                game: state.game_id.clone(),
                version: state.version_id.clone(),
                card: state.card_id.clone(),
            },
        }
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Screen::Login(_) | Screen::Register(_))
    }

    /// Sidebar entry highlighted for this screen.
    #[must_use]
    pub fn section(&self) -> Section {
        match self {
            Screen::Dashboard | Screen::Login(_) | Screen::Register(_) => Section::Dashboard,
            Screen::CardGames(_) | Screen::CardGame(_) | Screen::Version(_) | Screen::Card(_) => {
                Section::PriceList
            }
        }
    }

    /// Route the back button leads to.
    #[must_use]
    pub fn parent(&self) -> Option<Route> {
        match self {
            Screen::CardGame(_) => Some(Route::CardGames),
            Screen::Version(state) => Some(Route::CardGame(state.game_id.clone())),
            Screen::Card(state) => Some(Route::Version {
                game: state.game_id.clone(),
                version: state.version_id.clone(),
            }),
            Screen::Login(_)
            | Screen::Register(_)
            | Screen::Dashboard
            | Screen::CardGames(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_routes_are_public() {
        assert!(!Route::Login.is_protected());
        assert!(!Route::Register.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::CardGame(DocumentId::new("g")).is_protected());
    }

    #[test]
    fn screen_round_trips_its_route() {
        let route = Route::Card {
            game: DocumentId::new("g"),
            version: DocumentId::new("v"),
            card: DocumentId::new("c"),
        };
        assert_eq!(Screen::for_route(route.clone()).route(), route);
    }

    #[test]
    fn back_walks_up_the_catalog() {
        let card = Screen::for_route(Route::Card {
            game: DocumentId::new("g"),
            version: DocumentId::new("v"),
            card: DocumentId::new("c"),
        });
        assert_eq!(
            card.parent(),
            Some(Route::Version {
                game: DocumentId::new("g"),
                version: DocumentId::new("v"),
            })
        );
        let version = Screen::for_route(Route::Version {
            game: DocumentId::new("g"),
            version: DocumentId::new("v"),
        });
        assert_eq!(version.parent(), Some(Route::CardGame(DocumentId::new("g"))));
        assert_eq!(
            Screen::for_route(Route::CardGame(DocumentId::new("g"))).parent(),
            Some(Route::CardGames)
        );
        assert_eq!(Screen::Dashboard.parent(), None);
    }
}
