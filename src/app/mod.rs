// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for KameraKu
//!
//! # Architecture
//!
//! - `session`: Plain session state (permission, selection, recording, thumbnail)
//! - `state`: Application model and messages
//! - `binder`: Camera session subscription
//! - `controls`: Control cards, capture and record buttons, thumbnail
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message handling, routed to `handlers`
//!
//! Camera access is requested once at startup. Until it is granted the whole
//! window shows a blocking message and no camera session is ever bound.

mod binder;
mod controls;
mod handlers;
pub mod session;
mod settings;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::flash::FlashHardware;
use crate::fl;
use crate::storage::{MediaKind, ensure_media_directory};
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About, toaster::Toasts};
use cosmic::{Element, Task};
pub use session::{
    BindingRequest, LivePreview, Notice, PhotoPreview, RecordingState, SessionState,
    ThumbnailContent,
};
pub use state::{AppModel, ContextPage, Message};
use settings::SettingsOptions;
use tracing::{error, info};

const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.kameraku.KameraKu";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name("camera-photo").handle())
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        for kind in [MediaKind::Photo, MediaKind::Video] {
            if let Err(e) = ensure_media_directory(kind) {
                error!(?kind, error = %e, "Failed to create media directory");
            }
        }

        // sysfs scan only, fast enough for startup
        let flash_hardware = FlashHardware::detect();
        info!(leds = flash_hardware.devices.len(), "Flash hardware detected");

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            settings_options: SettingsOptions::new(),
            session: SessionState::default(),
            toasts: Toasts::new(Message::CloseToast),
            remote: None,
            cameras: Vec::new(),
            active_device: None,
            flash_hardware,
            flash_active: false,
            flash_warned: false,
            bind_error_shown: false,
        };

        // The portal dialog blocks only this future, never the UI
        let permission_task = Task::perform(
            async { crate::permissions::request_camera_access().await },
            |result| cosmic::Action::App(Message::PermissionResolved(result)),
        );

        (app, permission_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        Subscription::batch([config_sub, self.session_subscription()])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
