use eframe::egui::{self, Color32, RichText, Ui};

use crate::auth::registry::{NewUserForm, UserRegistry};

/// State of the admin-only user management section.
#[derive(Debug, Default)]
pub struct AdminPanel {
    pub form: NewUserForm,
    /// Result of the last submission: Ok(success message) / Err(error).
    pub feedback: Option<Result<String, String>>,
}

/// Render user registration and the list of registered users.
pub fn admin_section(ui: &mut Ui, panel: &mut AdminPanel, registry: &UserRegistry) {
    ui.separator();
    ui.heading("👥 User Management (Admin)");

    egui::CollapsingHeader::new("Register new user")
        .id_salt("register_user")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("register_user_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("Username");
                    ui.text_edit_singleline(&mut panel.form.username);
                    ui.end_row();

                    ui.label("Password");
                    ui.add(egui::TextEdit::singleline(&mut panel.form.password).password(true));
                    ui.end_row();

                    ui.label("Confirm password");
                    ui.add(
                        egui::TextEdit::singleline(&mut panel.form.confirm_password).password(true),
                    );
                    ui.end_row();

                    ui.label("Full name");
                    ui.text_edit_singleline(&mut panel.form.name);
                    ui.end_row();
                });

            if ui.button("Register user").clicked() {
                panel.feedback = Some(panel.form.submit(registry));
            }

            match &panel.feedback {
                Some(Ok(msg)) => {
                    ui.label(RichText::new(msg).color(Color32::from_rgb(80, 180, 90)));
                }
                Some(Err(msg)) => {
                    ui.label(RichText::new(msg).color(Color32::RED));
                }
                None => {}
            }
        });

    egui::CollapsingHeader::new("Registered users")
        .id_salt("registered_users")
        .show(ui, |ui: &mut Ui| match registry.users() {
            Ok(users) if users.is_empty() => {
                ui.label("No registered users.");
            }
            Ok(users) => {
                for (username, record) in &users {
                    ui.label(RichText::new(format!("{username} - {}", record.name)));
                }
            }
            Err(e) => {
                ui.label(RichText::new(format!("Could not read users: {e}")).color(Color32::RED));
            }
        });
}
