// src/views/follow_up_dialog.rs

use super::{appointment_card::format_appointment_date, escape};
use crate::models::Patient;
use crate::store::FollowUpDialog;

/// Empty unless the dialog is open. Submitting posts `date` and `notes`;
/// cancelling posts nothing.
pub fn render_follow_up_dialog(dialog: &FollowUpDialog, patient: Option<&Patient>) -> String {
    let Some(target) = dialog.target() else {
        return String::new();
    };

    let who = patient
        .map(|p| format!(" for {}", escape(&p.full_name())))
        .unwrap_or_default();

    format!(
        r#"
  <div id="follow-up-dialog" class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center" role="dialog" aria-modal="true">
    <div class="bg-white rounded-lg p-6 w-full max-w-md">
      <h2 class="text-xl font-semibold mb-2">Schedule Follow-up{who}</h2>
      <p class="text-sm text-gray-500 mb-4">Original appointment: {original}</p>
      <form method="post" action="/follow-up">
        <div class="mb-4">
          <label class="block text-sm font-medium text-gray-700 mb-2" for="follow-up-date">Follow-up Date</label>
          <input id="follow-up-date" type="datetime-local" name="date" required class="w-full px-3 py-2 border rounded-md">
        </div>
        <div class="mb-4">
          <label class="block text-sm font-medium text-gray-700 mb-2" for="follow-up-notes">Notes</label>
          <textarea id="follow-up-notes" name="notes" rows="3" class="w-full px-3 py-2 border rounded-md"></textarea>
        </div>
        <div class="flex justify-end gap-2">
          <button type="submit" form="follow-up-cancel" class="px-4 py-2 text-gray-600 hover:text-gray-800">Cancel</button>
          <button type="submit" class="px-4 py-2 bg-indigo-600 text-white rounded-md hover:bg-indigo-700">Schedule</button>
        </div>
      </form>
      <form id="follow-up-cancel" method="post" action="/follow-up/cancel"></form>
    </div>
  </div>"#,
        original = format_appointment_date(&target.appointment_date),
    )
}
