use crate::analysis::{condition_label, poor_condition_days, stress_series};
use crate::export::{encode_csv, export_file_name};
use crate::models::{DiaryView, WeekRecord};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// One browser session's diary. Lives in memory until it goes idle.
#[derive(Debug, Clone)]
pub struct Session {
    pub record: WeekRecord,
    pub exports: u32,
    pub last_seen: DateTime<Utc>,
    pub last_exported_at: Option<DateTime<Utc>>,
}

pub struct ExportArtifact {
    pub file_name: String,
    pub body: String,
}

impl Session {
    pub fn new(default_stress: u8, now: DateTime<Utc>) -> Self {
        Self {
            record: WeekRecord::new(default_stress),
            exports: 0,
            last_seen: now,
            last_exported_at: None,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }

    /// Encodes the current record and counts the export. The record itself
    /// is untouched, so editing carries on right after.
    pub fn export(&mut self, include_vitals: bool, now: DateTime<Utc>) -> ExportArtifact {
        let artifact = ExportArtifact {
            file_name: export_file_name(&self.record),
            body: encode_csv(&self.record, include_vitals),
        };
        self.exports = self.exports.saturating_add(1);
        self.last_exported_at = Some(now);
        self.touch(now);
        artifact
    }

    pub fn view(&self, session_id: Uuid) -> DiaryView {
        let poor_days = poor_condition_days(&self.record);
        DiaryView {
            session_id,
            chart: stress_series(&self.record),
            poor_condition_label: condition_label(&poor_days),
            poor_condition_days: poor_days,
            export_file_name: export_file_name(&self.record),
            exports: self.exports,
            last_exported_at: self.last_exported_at,
            record: self.record.clone(),
        }
    }
}
