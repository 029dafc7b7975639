//! Toast overlay in the top-right corner.

use dapp::NotificationKind;

use crate::state::AppState;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let Some(notification) = state.notification.current() else {
        return;
    };

    let (accent, icon) = match notification.kind {
        NotificationKind::Loading => (egui::Color32::from_rgb(70, 130, 200), ""),
        NotificationKind::Success => (egui::Color32::from_rgb(50, 170, 80), "✅"),
        NotificationKind::Error => (egui::Color32::from_rgb(200, 60, 60), "❌"),
    };
    let kind = notification.kind;
    let message = notification.message.clone();

    let mut dismissed = false;
    egui::Area::new(egui::Id::new("toast"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .stroke(egui::Stroke::new(1.5, accent))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if kind == NotificationKind::Loading {
                            ui.spinner();
                        } else {
                            ui.label(icon);
                        }
                        ui.label(egui::RichText::new(message).color(accent));
                        if ui.small_button("✖").clicked() {
                            dismissed = true;
                        }
                    });
                });
        });

    if dismissed {
        state.notification.dismiss();
    }
}
