use crate::models::{ChartPoint, Day, WeekRecord};

/// Sleep below this many hours counts as short.
pub const SLEEP_THRESHOLD_HOURS: u8 = 7;
/// Stress above this level counts as high.
pub const STRESS_THRESHOLD: u8 = 5;
pub const NO_POOR_DAYS_LABEL: &str = "none";

pub fn stress_series(record: &WeekRecord) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = record
        .days()
        .map(|(day, entry)| ChartPoint {
            day,
            stress_level: entry.stress_level,
        })
        .collect();
    points.sort_by_key(|point| point.day.index());
    points
}

pub fn is_poor_condition(sleep_hours: u8, stress_level: u8) -> bool {
    sleep_hours < SLEEP_THRESHOLD_HOURS && stress_level > STRESS_THRESHOLD
}

pub fn poor_condition_days(record: &WeekRecord) -> Vec<Day> {
    record
        .days()
        .filter(|(_, entry)| is_poor_condition(entry.sleep_hours, entry.stress_level))
        .map(|(day, _)| day)
        .collect()
}

pub fn condition_label(days: &[Day]) -> String {
    if days.is_empty() {
        return NO_POOR_DAYS_LABEL.to_string();
    }
    days.iter()
        .map(|day| day.label())
        .collect::<Vec<_>>()
        .join(", ")
}
