// src/views/mod.rs
//
// HTML rendering. Everything here is a pure function of the store snapshot.

pub mod appointment_card;
pub mod follow_up_dialog;

use crate::store::{Notification, NotificationLevel, StoreSnapshot};

use appointment_card::render_appointment_card;
use follow_up_dialog::render_follow_up_dialog;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_toasts(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return String::new();
    }

    let items: String = notifications
        .iter()
        .map(|n| {
            let (kind, colours) = match n.level {
                NotificationLevel::Success => ("success", "bg-green-600"),
                NotificationLevel::Error => ("error", "bg-red-600"),
            };
            format!(
                r#"<div class="toast toast-{kind} {colours} text-white rounded-md px-4 py-2 shadow" role="status">{}</div>"#,
                escape(&n.message)
            )
        })
        .collect();

    format!(r#"<div class="fixed top-4 right-4 flex flex-col gap-2">{items}</div>"#)
}

pub fn render_page(snapshot: &StoreSnapshot, notifications: &[Notification]) -> String {
    let cards: String = snapshot
        .appointments
        .iter()
        .map(|apt| render_appointment_card(apt, snapshot.patient_for(apt), snapshot.doctor_for(apt)))
        .collect();

    let dialog_patient = snapshot.dialog.target().and_then(|t| snapshot.patient_for(t));
    let dialog = render_follow_up_dialog(&snapshot.dialog, dialog_patient);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Patient Follow-up Management</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body>
<div class="min-h-screen bg-gray-100">
  {toasts}
  <div class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">
    <div class="px-4 py-6 sm:px-0">
      <h1 class="text-3xl font-bold text-gray-900 mb-8">Patient Follow-up Management</h1>
      <div class="grid gap-6">{cards}
      </div>
    </div>
  </div>{dialog}
</div>
</body>
</html>
"#,
        toasts = render_toasts(notifications),
    )
}
