//! Dashboard: amount field, the four actions and the balance line.

use egui::Ui;
use tokio::sync::mpsc;

use dapp::Action;

use crate::events::UiEvent;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    ui.vertical_centered(|ui| {
        ui.add_space(10.0);
        ui.heading("🦊 Donation Dapp");
        ui.add_space(4.0);
        account_line(ui, state);
    });

    ui.separator();
    ui.add_space(10.0);

    ui.group(|ui| {
        ui.set_min_width(ui.available_width());

        ui.label("Amount (ETH)");
        ui.add(
            egui::TextEdit::singleline(&mut state.amount_input)
                .hint_text("Enter ETH amount")
                .desired_width(ui.available_width()),
        );

        ui.add_space(10.0);

        ui.horizontal_wrapped(|ui| {
            for action in Action::ALL {
                if action_button(ui, state, action) {
                    let event = match action {
                        Action::Connect => UiEvent::ConnectWallet,
                        Action::Donate => UiEvent::Donate {
                            amount: state.amount_input.clone(),
                        },
                        Action::Withdraw => UiEvent::Withdraw,
                        Action::CheckBalance => UiEvent::CheckBalance,
                    };
                    let _ = ui_tx.send(event);
                }
            }
        });
    });

    ui.add_space(15.0);

    ui.label(
        egui::RichText::new(format!(
            "📦 Contract Balance: {} ETH",
            state.balance_display()
        ))
        .size(20.0)
        .strong(),
    );
}

/// Render one action button; disabled while that action is in flight.
fn action_button(ui: &mut Ui, state: &AppState, action: Action) -> bool {
    let busy = state.is_busy(action);
    let response = ui.add_enabled(
        !busy,
        egui::Button::new(egui::RichText::new(action.label()).size(14.0))
            .min_size(egui::vec2(110.0, 30.0)),
    );
    if busy {
        ui.spinner();
    }
    response.clicked()
}

fn account_line(ui: &mut Ui, state: &AppState) {
    match state.account {
        Some(account) => {
            let text = account.to_string();
            let short = format!("{}…{}", &text[..6], &text[text.len() - 4..]);
            ui.label(egui::RichText::new(format!("🔗 {}", short)).color(egui::Color32::GREEN))
                .on_hover_text(text);
        }
        None => {
            ui.label(egui::RichText::new("Not connected").color(egui::Color32::GRAY));
        }
    }
}
