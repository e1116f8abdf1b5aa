// src/views/appointment_card.rs

use chrono::{DateTime, Datelike, Utc};

use super::escape;
use crate::models::{Appointment, AppointmentStatus, Doctor, Patient};

/// Badge colours. Presentation only.
pub fn status_badge_class(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "bg-blue-100 text-blue-800",
        AppointmentStatus::Completed => "bg-green-100 text-green-800",
        AppointmentStatus::Cancelled => "bg-red-100 text-red-800",
    }
}

/// "June 1st, 2024 10:00 AM"
pub fn format_appointment_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!(
        "{} {}{}, {} {}",
        date.format("%B"),
        day,
        suffix,
        date.year(),
        date.format("%-I:%M %p")
    )
}

/// One appointment with its resolved patient and doctor. Either lookup may
/// be missing; the matching fields are then left blank.
pub fn render_appointment_card(
    appointment: &Appointment,
    patient: Option<&Patient>,
    doctor: Option<&Doctor>,
) -> String {
    let (p_first, p_last) = patient
        .map(|p| (p.first_name.as_str(), p.last_name.as_str()))
        .unwrap_or(("", ""));
    let (d_first, d_last, specialty) = doctor
        .map(|d| (d.first_name.as_str(), d.last_name.as_str(), d.specialty.as_str()))
        .unwrap_or(("", "", ""));

    let id = appointment.id;
    let status = appointment.status;

    let notes = if appointment.notes.is_empty() {
        String::new()
    } else {
        format!(
            r#"
      <div class="mt-4">
        <p class="text-sm text-gray-600">{}</p>
      </div>"#,
            escape(&appointment.notes)
        )
    };

    let options: String = AppointmentStatus::ALL
        .iter()
        .map(|s| {
            let selected = if *s == status { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, s.as_str(), s.label())
        })
        .collect();

    format!(
        r#"
    <div class="bg-white rounded-lg shadow-md p-6 mb-4" data-appointment-id="{id}">
      <div class="flex justify-between items-start">
        <div>
          <h3 class="text-lg font-semibold">{p_first} {p_last}</h3>
          <p class="text-gray-600">Dr. {d_first} {d_last} - {specialty}</p>
          <p class="text-gray-500 mt-2">{date}</p>
        </div>
        <span class="px-3 py-1 rounded-full text-sm {badge}">{status}</span>
      </div>{notes}
      <div class="mt-4 flex gap-2">
        <form method="post" action="/appointments/{id}/status">
          <select name="status" onchange="this.form.submit()" class="px-3 py-1 border rounded-md text-sm">{options}</select>
        </form>
        <form method="post" action="/appointments/{id}/follow-up">
          <button type="submit" class="px-3 py-1 bg-indigo-600 text-white rounded-md text-sm hover:bg-indigo-700">Schedule Follow-up</button>
        </form>
      </div>
    </div>"#,
        p_first = escape(p_first),
        p_last = escape(p_last),
        d_first = escape(d_first),
        d_last = escape(d_last),
        specialty = escape(specialty),
        date = format_appointment_date(&appointment.appointment_date),
        badge = status_badge_class(status),
    )
}
