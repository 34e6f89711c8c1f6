use crate::core::dialogue::Reservation;
use crate::core::record::FieldSet;

/// Text sent to the admin chat after a class is reserved. Unlike the
/// student-facing summary this includes admin-only fields.
pub fn render_admin_notice(reservation: &Reservation, fields: FieldSet) -> String {
    let record = &reservation.record;
    let details = fields
        .fields()
        .iter()
        .map(|&field| format!("{}: {}", field.label(), record.value_of(field)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "📌 New class reservation:\n\n{}\n\nStudent id: {}\nStudent username: {}\n\nTeacher id: {}\nTeacher username: {}",
        details,
        reservation.student.id,
        reservation.student.handle(),
        record.teacher_id,
        record.teacher_handle()
    )
}
