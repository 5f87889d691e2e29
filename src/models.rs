use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

pub const MAX_WATER_LITERS: f64 = 10.0;
pub const MAX_SLEEP_HOURS: u8 = 24;
pub const MAX_STRESS_LEVEL: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// Canonical week order.
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day '{0}', expected one of Mon, Tue, Wed, Thu, Fri, Sat, Sun")]
pub struct ParseDayError(pub String);

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDayError(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub meal_text: String,
    pub water_liters: f64,
    pub sleep_hours: u8,
    pub stress_level: u8,
}

impl DiaryEntry {
    pub fn with_stress(stress_level: u8) -> Self {
        Self {
            meal_text: String::new(),
            water_liters: 0.0,
            sleep_hours: 0,
            stress_level: clamp_stress(i64::from(stress_level)),
        }
    }

    /// Applies a partial edit, clamping numbers the way the form inputs do.
    pub fn apply(&mut self, update: DayUpdate) {
        if let Some(meal_text) = update.meal_text {
            self.meal_text = meal_text;
        }
        if let Some(water) = update.water_liters {
            self.water_liters = clamp_water(water);
        }
        if let Some(sleep) = update.sleep_hours {
            self.sleep_hours = clamp_sleep(sleep);
        }
        if let Some(stress) = update.stress_level {
            self.stress_level = clamp_stress(stress);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRecord {
    pub owner_name: String,
    pub week_number: u32,
    pub entries: [DiaryEntry; 7],
    pub health_notes: String,
    pub goals: String,
}

impl WeekRecord {
    pub fn new(default_stress: u8) -> Self {
        Self {
            owner_name: String::new(),
            week_number: 1,
            entries: std::array::from_fn(|_| DiaryEntry::with_stress(default_stress)),
            health_notes: String::new(),
            goals: String::new(),
        }
    }

    pub fn entry(&self, day: Day) -> &DiaryEntry {
        &self.entries[day.index()]
    }

    pub fn entry_mut(&mut self, day: Day) -> &mut DiaryEntry {
        &mut self.entries[day.index()]
    }

    /// Entries paired with their day, Mon through Sun.
    pub fn days(&self) -> impl Iterator<Item = (Day, &DiaryEntry)> {
        Day::ALL.into_iter().map(move |day| (day, self.entry(day)))
    }

    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(owner_name) = update.owner_name {
            self.owner_name = owner_name;
        }
        if let Some(week) = update.week_number {
            self.week_number = week.clamp(1, i64::from(u32::MAX)) as u32;
        }
    }

    pub fn apply_notes(&mut self, update: NotesUpdate) {
        if let Some(health_notes) = update.health_notes {
            self.health_notes = health_notes;
        }
        if let Some(goals) = update.goals {
            self.goals = goals;
        }
    }
}

pub fn clamp_water(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let snapped = (value.clamp(0.0, MAX_WATER_LITERS) * 10.0).round() / 10.0;
    // `+ 0.0` folds -0.0 into 0.0
    snapped.clamp(0.0, MAX_WATER_LITERS) + 0.0
}

pub fn clamp_sleep(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_SLEEP_HOURS)) as u8
}

pub fn clamp_stress(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_STRESS_LEVEL)) as u8
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub owner_name: Option<String>,
    pub week_number: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayUpdate {
    pub meal_text: Option<String>,
    pub water_liters: Option<f64>,
    pub sleep_hours: Option<i64>,
    pub stress_level: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotesUpdate {
    pub health_notes: Option<String>,
    pub goals: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub vitals: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub day: Day,
    pub stress_level: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiaryView {
    pub session_id: Uuid,
    pub record: WeekRecord,
    pub chart: Vec<ChartPoint>,
    pub poor_condition_days: Vec<Day>,
    pub poor_condition_label: String,
    pub export_file_name: String,
    pub exports: u32,
    pub last_exported_at: Option<DateTime<Utc>>,
}
