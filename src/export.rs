use crate::models::{Day, WeekRecord};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub fn export_file_name(record: &WeekRecord) -> String {
    format!(
        "{}_week_{}_health_diary.csv",
        record.owner_name, record.week_number
    )
}

/// Builds the one-row export table: meals, water, optionally sleep and
/// stress, then notes and goals.
pub fn export_columns(record: &WeekRecord, include_vitals: bool) -> Vec<(String, String)> {
    let mut columns = Vec::with_capacity(day_column_count(include_vitals) + 2);
    for (day, entry) in record.days() {
        columns.push((day.label().to_string(), entry.meal_text.clone()));
    }
    for (day, entry) in record.days() {
        columns.push((day.label().to_string(), format!("{:.1}", entry.water_liters)));
    }
    if include_vitals {
        for (day, entry) in record.days() {
            columns.push((day.label().to_string(), entry.sleep_hours.to_string()));
        }
        for (day, entry) in record.days() {
            columns.push((day.label().to_string(), entry.stress_level.to_string()));
        }
    }
    columns.push(("health_notes".to_string(), record.health_notes.clone()));
    columns.push(("goals".to_string(), record.goals.clone()));
    columns
}

pub fn encode_csv(record: &WeekRecord, include_vitals: bool) -> String {
    let columns = export_columns(record, include_vitals);
    let header: Vec<String> = columns.iter().map(|(name, _)| escape_field(name)).collect();
    let row: Vec<String> = columns.iter().map(|(_, value)| escape_field(value)).collect();

    let mut out = header.join(",");
    out.push('\n');
    out.push_str(&row.join(","));
    out.push('\n');
    out
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `Content-Disposition` value with an ASCII fallback and the exact UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(file_name)
    )
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

pub fn day_column_count(include_vitals: bool) -> usize {
    let groups = if include_vitals { 4 } else { 2 };
    groups * Day::ALL.len()
}
