use eframe::egui::{self, Color32, RichText, Ui};

use crate::auth::registry::UserRegistry;
use crate::auth::session::Session;

// ---------------------------------------------------------------------------
// Login form state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    /// Check credentials and sign in. Returns `true` on success; on failure
    /// the message is kept in `error`.
    pub fn submit(&mut self, registry: &UserRegistry, session: &mut Session) -> bool {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            self.error = Some("Please fill in every field.".to_string());
            return false;
        }
        if !registry.verify(username, &self.password) {
            log::warn!("failed login for {username:?}");
            self.error = Some("Incorrect username or password.".to_string());
            return false;
        }
        log::info!("{username:?} signed in");
        session.login(username);
        *self = Self::default();
        true
    }
}

// ---------------------------------------------------------------------------
// Login page
// ---------------------------------------------------------------------------

/// Render the sign-in page. Returns `true` when the user has just signed in.
pub fn login_page(
    ui: &mut Ui,
    form: &mut LoginForm,
    registry: &UserRegistry,
    session: &mut Session,
) -> bool {
    let mut signed_in = false;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(60.0);
        ui.heading("Subsidiary Markets Analysis");
        ui.add_space(20.0);

        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_max_width(320.0);
            ui.strong("Sign in");
            ui.add_space(8.0);

            ui.add(
                egui::TextEdit::singleline(&mut form.username)
                    .hint_text("Username")
                    .desired_width(280.0),
            );
            let password = ui.add(
                egui::TextEdit::singleline(&mut form.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(280.0),
            );
            let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            if ui.button("Sign in").clicked() || enter {
                signed_in = form.submit(registry, session);
            }

            if let Some(err) = &form.error {
                ui.label(RichText::new(err).color(Color32::RED));
            }
        });

        ui.add_space(12.0);
        ui.small("Trouble signing in? Contact the administrator.");
    });

    signed_in
}
