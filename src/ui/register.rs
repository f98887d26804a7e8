// SPDX-License-Identifier: MPL-2.0
//! Account registration screen.
//!
//! The password confirmation is checked locally before anything reaches the
//! identity provider. A successful registration signs the new account in.

use crate::application::port::User;
use crate::application::session::check_password_confirmation;
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::login::{error_line, password_row};
use crate::ui::styles;
use iced::widget::{button, text_input, Column, Container, Text};
use iced::{alignment, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub busy: bool,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub show_password: bool,
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmationChanged(String),
    TogglePasswordVisibility,
    Submit,
    BackToLogin,
    RegisterFinished(Result<User, Error>),
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    Register { email: String, password: String },
    Registered(User),
    BackToLogin,
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
            Message::ConfirmationChanged(confirmation) => {
                self.confirmation = confirmation;
                Event::None
            }
            Message::TogglePasswordVisibility => {
                self.show_password = !self.show_password;
                Event::None
            }
            Message::Submit => {
                if let Err(err) = check_password_confirmation(&self.password, &self.confirmation)
                {
                    self.error = Some(err.i18n_key());
                    return Event::None;
                }
                self.error = None;
                Event::Register {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                }
            }
            Message::BackToLogin => Event::BackToLogin,
            Message::RegisterFinished(Ok(user)) => {
                *self = Self::default();
                Event::Registered(user)
            }
            Message::RegisterFinished(Err(err)) => {
                self.error = Some(err.i18n_key());
                Event::None
            }
        }
    }
}

#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;
    let submit_message = (!ctx.busy).then_some(Message::Submit);

    let toggle_label = i18n.tr(if state.show_password {
        "login-hide-password"
    } else {
        "login-show-password"
    });

    let mut form = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(i18n.tr("register-title")).size(typography::TITLE_LG))
        .push(Text::new(i18n.tr("login-email-label")).size(typography::BODY))
        .push(
            text_input(&i18n.tr("login-email-placeholder"), &state.email)
                .on_input(Message::EmailChanged)
                .padding(spacing::XS)
                .size(typography::BODY_LG),
        )
        .push(Text::new(i18n.tr("login-password-label")).size(typography::BODY))
        .push(password_row(
            i18n.tr("login-password-placeholder"),
            &state.password,
            state.show_password,
            toggle_label,
            Message::PasswordChanged,
            Message::TogglePasswordVisibility,
            None,
        ))
        .push(Text::new(i18n.tr("register-confirmation-label")).size(typography::BODY))
        .push(
            text_input(&i18n.tr("register-confirmation-placeholder"), &state.confirmation)
                .on_input(Message::ConfirmationChanged)
                .on_submit_maybe(submit_message.clone())
                .secure(!state.show_password)
                .padding(spacing::XS)
                .size(typography::BODY_LG),
        );
    if let Some(error) = error_line(i18n, state.error) {
        form = form.push(error);
    }

    let form = form
        .push(
            button(
                Text::new(i18n.tr("register-submit"))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Center),
            )
            .on_press_maybe(submit_message)
            .padding(spacing::XS)
            .width(Length::Fill)
            .style(styles::button::primary),
        )
        .push(
            button(Text::new(i18n.tr("register-back-to-login")).size(typography::BODY_SM))
                .on_press_maybe((!ctx.busy).then_some(Message::BackToLogin))
                .style(styles::button::ghost),
        );

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
    use crate::application::port::AuthError;

    #[test]
    fn mismatched_confirmation_never_reaches_provider() {
        let mut state = State {
            email: "new@example.com".into(),
            password: "secret1".into(),
            confirmation: "secret2".into(),
            ..State::default()
        };
        assert!(matches!(state.update(Message::Submit), Event::None));
        assert_eq!(state.error, Some("error-form-password-mismatch"));
    }

    #[test]
    fn matching_confirmation_requests_registration() {
        let mut state = State {
            email: " new@example.com".into(),
            password: "secret1".into(),
            confirmation: "secret1".into(),
            ..State::default()
        };
        match state.update(Message::Submit) {
            Event::Register { email, password } => {
                assert_eq!(email, "new@example.com");
                assert_eq!(password, "secret1");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn provider_error_is_shown_inline() {
        let mut state = State::default();
        state.update(Message::RegisterFinished(Err(AuthError::EmailInUse.into())));
        assert_eq!(state.error, Some("error-auth-email-in-use"));
    }
}
