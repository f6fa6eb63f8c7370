use iced::{Element, Subscription, Task};
use tracing::{error, info};

use crate::{
    account::{
        forgot::{self, ForgotPasswordPage},
        login::{self, LoginPage},
        otp::{self, OtpPage},
        register::{self, RegisterPage},
    },
    config::Config,
    services::BackendClient,
    wizard::{self, Wizard},
};

pub enum State {
    Login(LoginPage),
    Register(RegisterPage),
    ForgotPassword(ForgotPasswordPage),
    OtpVerification(OtpPage),
    Wizard(Box<Wizard>),
}

#[derive(Debug)]
pub enum Message {
    CtrlC,
    Login(login::Message),
    Register(register::Message),
    ForgotPassword(forgot::Message),
    Otp(otp::Message),
    Wizard(wizard::message::Message),
}

async fn ctrl_c() -> Result<(), ()> {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{}", e);
    };
    info!("Signal received, exiting");
    Ok(())
}

pub struct App {
    config: Config,
    client: BackendClient,
    state: State,
}

impl App {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let client = BackendClient::new(config.api_url.clone());
        (
            Self {
                state: State::Login(LoginPage::new(client.clone())),
                client,
                config,
            },
            Task::perform(ctrl_c(), |_| Message::CtrlC),
        )
    }

    pub fn title(&self) -> String {
        let screen = match &self.state {
            State::Login(_) => "Login",
            State::Register(_) => "Register",
            State::ForgotPassword(_) => "Reset password",
            State::OtpVerification(_) => "Verify email",
            State::Wizard(_) => "My biodata",
        };
        format!("{} - Biodata", screen)
    }

    fn go_to_login(&mut self, notice: Option<String>) -> Task<Message> {
        let client = self.client.clone();
        self.state = State::Login(match notice {
            Some(notice) => LoginPage::with_notice(client, notice),
            None => LoginPage::new(client),
        });
        let client = self.client.clone();
        Task::future(async move { client.logout().await }).discard()
    }

    fn go_to_otp(&mut self, email: String, destination: otp::Destination) -> Task<Message> {
        let page = OtpPage::new(self.client.clone(), email, destination);
        let load = page.load().map(Message::Otp);
        self.state = State::OtpVerification(page);
        load
    }

    fn go_to_wizard(&mut self, email: String) -> Task<Message> {
        let (wizard, load) = Wizard::new(
            self.client.clone(),
            email,
            self.config.navigation_policy(),
        );
        self.state = State::Wizard(Box::new(wizard));
        load.map(Message::Wizard)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match (&mut self.state, message) {
            (_, Message::CtrlC) => iced::window::get_latest().and_then(iced::window::close),
            (State::Login(page), Message::Login(msg)) => match msg {
                login::Message::StatusChecked(Ok(true)) => {
                    let email = page.email().to_string();
                    info!("Account verified, entering the biodata form");
                    self.go_to_wizard(email)
                }
                login::Message::StatusChecked(Ok(false)) => {
                    let email = page.email().to_string();
                    info!("Account not verified yet, asking for a code");
                    self.go_to_otp(email, otp::Destination::Wizard)
                }
                login::Message::GoToRegister => {
                    self.state = State::Register(RegisterPage::new(self.client.clone()));
                    Task::none()
                }
                login::Message::GoToForgotPassword => {
                    self.state =
                        State::ForgotPassword(ForgotPasswordPage::new(self.client.clone()));
                    Task::none()
                }
                msg => page.update(msg).map(Message::Login),
            },
            (State::Register(page), Message::Register(msg)) => match msg {
                register::Message::Done(email) => {
                    info!("Account created, asking for a code");
                    self.go_to_otp(email, otp::Destination::Login)
                }
                register::Message::GoToLogin => self.go_to_login(None),
                msg => page.update(msg).map(Message::Register),
            },
            (State::ForgotPassword(page), Message::ForgotPassword(msg)) => match msg {
                forgot::Message::BackToLogin => self.go_to_login(None),
                msg => page.update(msg).map(Message::ForgotPassword),
            },
            (State::OtpVerification(page), Message::Otp(msg)) => match msg {
                otp::Message::Redirect(otp::Destination::Login) => self.go_to_login(Some(
                    "Email verified. You can log in now.".to_string(),
                )),
                otp::Message::Redirect(otp::Destination::Wizard) => {
                    let email = page.email().to_string();
                    self.go_to_wizard(email)
                }
                otp::Message::BackToLogin => self.go_to_login(None),
                msg => page.update(msg).map(Message::Otp),
            },
            (State::Wizard(wizard), Message::Wizard(msg)) => match msg {
                wizard::message::Message::Logout => self.go_to_login(None),
                wizard::message::Message::SessionExpired => self.go_to_login(Some(
                    "Your session has expired. Please log in again.".to_string(),
                )),
                msg => {
                    let task = wizard.update(msg).map(Message::Wizard);
                    // the client flags any locally-detected expiry or 401,
                    // even one whose error a screen swallowed.
                    if self.client.is_unauthenticated() {
                        return self.go_to_login(Some(
                            "Your session has expired. Please log in again.".to_string(),
                        ));
                    }
                    task
                }
            },
            // A stale message for a screen we already left.
            _ => Task::none(),
        }
    }

    pub fn view(&self) -> Element<Message> {
        match &self.state {
            State::Login(page) => page.view().map(Message::Login),
            State::Register(page) => page.view().map(Message::Register),
            State::ForgotPassword(page) => page.view().map(Message::ForgotPassword),
            State::OtpVerification(page) => page.view().map(Message::Otp),
            State::Wizard(wizard) => wizard.view().map(Message::Wizard),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        match &self.state {
            State::OtpVerification(page) => page.subscription().map(Message::Otp),
            _ => Subscription::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let (app, _) = App::new(Config {
            api_url: "http://192.0.2.1:1".to_string(),
            ..Config::default()
        });
        app
    }

    #[test]
    fn a_fresh_registration_verifies_before_logging_in() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::GoToRegister));
        assert!(matches!(app.state, State::Register(_)));

        let _ = app.update(Message::Register(register::Message::Done(
            "someone@example.com".to_string(),
        )));
        match &app.state {
            State::OtpVerification(page) => {
                assert_eq!(page.email(), "someone@example.com");
                assert_eq!(page.destination(), otp::Destination::Login);
            }
            _ => panic!("expected the OTP screen"),
        }

        let _ = app.update(Message::Otp(otp::Message::Redirect(otp::Destination::Login)));
        assert!(matches!(app.state, State::Login(_)));
    }

    #[test]
    fn an_unverified_login_is_sent_to_otp_then_the_wizard() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::StatusChecked(Ok(false))));
        match &app.state {
            State::OtpVerification(page) => {
                assert_eq!(page.destination(), otp::Destination::Wizard);
            }
            _ => panic!("expected the OTP screen"),
        }

        let _ = app.update(Message::Otp(otp::Message::Redirect(
            otp::Destination::Wizard,
        )));
        assert!(matches!(app.state, State::Wizard(_)));
    }

    #[test]
    fn a_verified_login_goes_straight_to_the_wizard() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::StatusChecked(Ok(true))));
        assert!(matches!(app.state, State::Wizard(_)));
    }

    #[test]
    fn session_expiry_drops_back_to_login() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::StatusChecked(Ok(true))));
        let _ = app.update(Message::Wizard(wizard::message::Message::SessionExpired));
        assert!(matches!(app.state, State::Login(_)));
    }

    #[tokio::test]
    async fn the_client_unauthenticated_flag_forces_logout() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::StatusChecked(Ok(true))));
        assert!(matches!(app.state, State::Wizard(_)));
        // no session in the slot: the first authenticated call trips the
        // flag locally, without any network traffic.
        assert!(app.client.my_biodata().await.is_err());
        assert!(app.client.is_unauthenticated());
        let _ = app.update(Message::Wizard(wizard::message::Message::Previous));
        assert!(matches!(app.state, State::Login(_)));
    }

    #[test]
    fn ctrl_c_does_not_tear_the_state_down() {
        let mut app = app();
        let _ = app.update(Message::Login(login::Message::StatusChecked(Ok(true))));
        let _ = app.update(Message::CtrlC);
        // the window close is graceful, the screen stays as-is until exit.
        assert!(matches!(app.state, State::Wizard(_)));
    }

    #[test]
    fn stale_messages_for_a_left_screen_are_dropped() {
        let mut app = app();
        let _ = app.update(Message::Otp(otp::Message::Tick));
        assert!(matches!(app.state, State::Login(_)));
    }
}
