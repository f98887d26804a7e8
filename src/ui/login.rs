// SPDX-License-Identifier: MPL-2.0
//! Administrator sign-in screen.

use crate::application::port::{AuthError, User};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, text, text_input, Column, Container, Row, Text};
use iced::{alignment, Element, Length, Theme};

/// Contextual data needed to render the login screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub busy: bool,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    /// i18n key of the last sign-in failure.
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    PasswordChanged(String),
    TogglePasswordVisibility,
    Submit,
    GoToRegister,
    SignInFinished(Result<User, AuthError>),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    SignIn { email: String, password: String },
    SignedIn(User),
    GoToRegister,
}

impl State {
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::EmailChanged(email) => {
                self.email = email;
                Event::None
            }
            Message::PasswordChanged(password) => {
                self.password = password;
                Event::None
            }
            Message::TogglePasswordVisibility => {
                self.show_password = !self.show_password;
                Event::None
            }
            Message::Submit => {
                self.error = None;
                Event::SignIn {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                }
            }
            Message::GoToRegister => Event::GoToRegister,
            Message::SignInFinished(Ok(user)) => {
                *self = Self::default();
                Event::SignedIn(user)
            }
            Message::SignInFinished(Err(err)) => {
                self.error = Some(err.i18n_key());
                self.password.clear();
                Event::None
            }
        }
    }
}

/// Email input, password input with a show/hide toggle, error line.
pub(crate) fn password_row<'a, M: Clone + 'a>(
    placeholder: String,
    value: &str,
    visible: bool,
    toggle_label: String,
    on_input: impl Fn(String) -> M + 'a,
    on_toggle: M,
    on_submit: Option<M>,
) -> Element<'a, M> {
    let mut input = text_input(&placeholder, value)
        .on_input(on_input)
        .secure(!visible)
        .padding(spacing::XS)
        .size(typography::BODY_LG)
        .width(Length::Fill);
    if let Some(submit) = on_submit {
        input = input.on_submit(submit);
    }

    Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(input)
        .push(
            button(Text::new(toggle_label).size(typography::BODY_SM))
                .on_press(on_toggle)
                .style(styles::button::ghost),
        )
        .into()
}

pub(crate) fn error_line<'a, M: 'a>(i18n: &I18n, error: Option<&'static str>) -> Option<Element<'a, M>> {
    error.map(|key| {
        Text::new(i18n.tr(key))
            .size(typography::CAPTION)
            .style(|_theme: &Theme| text::Style {
                color: Some(palette::ERROR_500),
            })
            .into()
    })
}

#[must_use]
#[allow(clippy::needless_pass_by_value)] // ViewContext is small and consumed
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let email = text_input(&i18n.tr("login-email-placeholder"), &state.email)
        .on_input(Message::EmailChanged)
        .padding(spacing::XS)
        .size(typography::BODY_LG);

    let toggle_key = if state.show_password {
        "login-hide-password"
    } else {
        "login-show-password"
    };
    let password = password_row(
        i18n.tr("login-password-placeholder"),
        &state.password,
        state.show_password,
        i18n.tr(toggle_key),
        Message::PasswordChanged,
        Message::TogglePasswordVisibility,
        (!ctx.busy).then_some(Message::Submit),
    );

    let submit = button(
        Text::new(i18n.tr("login-submit"))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .on_press_maybe((!ctx.busy).then_some(Message::Submit))
    .padding(spacing::XS)
    .width(Length::Fill)
    .style(styles::button::primary);

    let register = button(Text::new(i18n.tr("login-go-to-register")).size(typography::BODY_SM))
        .on_press_maybe((!ctx.busy).then_some(Message::GoToRegister))
        .style(styles::button::ghost);

    let mut form = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(i18n.tr("login-title")).size(typography::TITLE_LG))
        .push(Text::new(i18n.tr("login-email-label")).size(typography::BODY))
        .push(email)
        .push(Text::new(i18n.tr("login-password-label")).size(typography::BODY))
        .push(password);
    if let Some(error) = error_line(i18n, state.error) {
        form = form.push(error);
    }
    let form = form.push(submit).push(register);

    Container::new(
        Container::new(form)
            .padding(spacing::LG)
            .width(Length::Fixed(sizing::AUTH_FORM_WIDTH))
            .style(styles::container::panel),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_trims_email_and_clears_previous_error() {
        let mut state = State {
            email: " admin@example.com ".into(),
            password: "secret1".into(),
            error: Some("error-auth-invalid-credentials"),
            ..State::default()
        };
        match state.update(Message::Submit) {
            Event::SignIn { email, password } => {
                assert_eq!(email, "admin@example.com");
                assert_eq!(password, "secret1");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_sign_in_shows_error_and_clears_password() {
        let mut state = State {
            password: "wrong".into(),
            ..State::default()
        };
        let event = state.update(Message::SignInFinished(Err(AuthError::InvalidCredentials)));
        assert!(matches!(event, Event::None));
        assert_eq!(state.error, Some("error-auth-invalid-credentials"));
        assert!(state.password.is_empty());
    }

    #[test]
    fn successful_sign_in_resets_form() {
        let mut state = State {
            email: "admin@example.com".into(),
            password: "secret1".into(),
            ..State::default()
        };
        let user = User {
            uid: "u1".into(),
            email: "admin@example.com".into(),
        };
        assert!(matches!(
            state.update(Message::SignInFinished(Ok(user))),
            Event::SignedIn(_)
        ));
        assert!(state.email.is_empty());
    }

    #[test]
    fn toggling_visibility_flips_flag() {
        let mut state = State::default();
        state.update(Message::TogglePasswordVisibility);
        assert!(state.show_password);
    }
}
