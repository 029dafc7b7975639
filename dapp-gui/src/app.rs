//! Application struct: the eframe::App implementation.
//!
//! Thin wrapper: drains service events, expires the toast, dispatches to the
//! view modules. No async, no network, no wallet logic.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::{ServiceEvent, UiEvent};
use crate::state::AppState;
use crate::view;

pub struct App {
    pub state: AppState,
    pub ui_tx: mpsc::UnboundedSender<UiEvent>,
    svc_rx: mpsc::UnboundedReceiver<ServiceEvent>,
    shutdown_token: CancellationToken,
}

impl App {
    /// Create a new App, spawning the background service task.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (svc_tx, svc_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let state = AppState::new(&config);
        tokio::spawn(crate::service::run(token.clone(), ui_rx, svc_tx, config));

        Self {
            state,
            ui_tx,
            svc_rx,
            shutdown_token: token,
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.ui_tx.send(UiEvent::Shutdown);
        self.shutdown_token.cancel();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint regularly to pick up background service events
        ctx.request_repaint_after(std::time::Duration::from_millis(250));

        // 1. Drain all pending service events (non-blocking)
        while let Ok(event) = self.svc_rx.try_recv() {
            self.state.apply(event);
            ctx.request_repaint();
        }

        // 2. Toast lifetime
        let now = Instant::now();
        if self.state.notification.expire(now) {
            ctx.request_repaint();
        }
        if let Some(left) = self.state.notification.time_left(now) {
            ctx.request_repaint_after(left);
        }

        // 3. Content
        egui::CentralPanel::default().show(ctx, |ui| {
            view::dashboard::show(ui, &mut self.state, &self.ui_tx);
        });

        view::toast::show(ctx, &mut self.state);
    }
}
