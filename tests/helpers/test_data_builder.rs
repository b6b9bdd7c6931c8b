// ==========================================
// 测试数据构建器
// ==========================================
// 职责: 以链式调用构造考勤测试数据
// ==========================================

#![allow(dead_code)]

use absenta::domain::attendance::NewAttendance;
use absenta::domain::student::NewStudent;
use absenta::domain::types::AttendanceStatus;
use chrono::{NaiveDate, NaiveDateTime};

// ==========================================
// StudentBuilder
// ==========================================
pub struct StudentBuilder {
    nis: String,
    full_name: String,
    class_name: String,
    photo_url: Option<String>,
}

impl StudentBuilder {
    pub fn new(nis: &str) -> Self {
        Self {
            nis: nis.to_string(),
            full_name: format!("Siswa {}", nis),
            class_name: "10A".to_string(),
            photo_url: None,
        }
    }

    pub fn name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn photo(mut self, url: &str) -> Self {
        self.photo_url = Some(url.to_string());
        self
    }

    pub fn build(self) -> NewStudent {
        NewStudent {
            nis: self.nis,
            full_name: self.full_name,
            class_name: self.class_name,
            photo_url: self.photo_url,
        }
    }
}

// ==========================================
// AttendanceBuilder
// ==========================================
pub struct AttendanceBuilder {
    student_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
    notes: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl AttendanceBuilder {
    pub fn new(student_id: i64) -> Self {
        Self {
            student_id,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("固定日期"),
            status: AttendanceStatus::Hadir,
            notes: None,
            created_at: None,
        }
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("测试日期格式错误");
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn status(mut self, status: AttendanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn created_at(mut self, ts: &str) -> Self {
        self.created_at = Some(
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").expect("测试时间格式错误"),
        );
        self
    }

    pub fn build(&self) -> NewAttendance {
        NewAttendance {
            student_id: self.student_id,
            date: self.date,
            status: self.status,
            notes: self.notes.clone(),
        }
    }

    pub fn created_at_value(&self) -> Option<NaiveDateTime> {
        self.created_at
    }
}
