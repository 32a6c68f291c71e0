use std::path::PathBuf;

use eframe::egui::{self, Ui};

use crate::auth::registry::UserRegistry;
use crate::auth::session::Session;
use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::admin::{AdminPanel, admin_section};
use crate::ui::login::{LoginForm, login_page};
use crate::ui::panels::{self, TopBarAction};
use crate::ui::tables;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MarketViewerApp {
    pub config: AppConfig,
    pub registry: UserRegistry,
    pub session: Session,
    pub state: AppState,
    /// Table currently shown; starts at `config.data_path`.
    pub data_path: PathBuf,
    login: LoginForm,
    admin: AdminPanel,
}

impl MarketViewerApp {
    pub fn new(config: AppConfig, registry: UserRegistry) -> Self {
        Self {
            data_path: config.data_path.clone(),
            config,
            registry,
            session: Session::new(),
            state: AppState::default(),
            login: LoginForm::default(),
            admin: AdminPanel::default(),
        }
    }

    fn sign_out(&mut self) {
        if let Some(user) = self.session.current_user() {
            log::info!("{user:?} signed out");
        }
        self.session.logout();
        self.state.clear();
        self.admin = AdminPanel::default();
        self.data_path = self.config.data_path.clone();
    }

    fn main_view(&mut self, ctx: &egui::Context) {
        let user = self.session.current_user().unwrap_or_default().to_string();

        // ---- Top panel: menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui: &mut Ui| panels::top_bar(ui, &self.state, &user))
            .inner;

        match action {
            Some(TopBarAction::Open(path)) => {
                self.state.load_from(&path);
                self.data_path = path;
            }
            Some(TopBarAction::Reload) => self.state.load_from(&self.data_path),
            Some(TopBarAction::SignOut) => {
                self.sign_out();
                return;
            }
            None => {}
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, records, statistics ----
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::load_banner(ui, &self.state.load_status);

                    if let Some(table) = &self.state.table {
                        ui.add_space(6.0);
                        tables::metrics(ui, table, &user);
                        ui.separator();

                        ui.heading("Filtered Data");
                        tables::records_table(ui, table, &self.state.visible_indices);
                        ui.add_space(12.0);

                        ui.heading("Basic Statistics");
                        tables::statistics_table(ui, &self.state.summary);
                    }

                    if self.session.is_admin(&self.config.admin_user) {
                        ui.add_space(12.0);
                        admin_section(ui, &mut self.admin, &self.registry);
                    }
                });
        });
    }
}

impl eframe::App for MarketViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.session.is_authenticated() {
            self.main_view(ctx);
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            if login_page(ui, &mut self.login, &self.registry, &mut self.session) {
                self.state.load_from(&self.data_path);
            }
        });
    }
}
