// ==========================================
// 学校考勤管理系统 - 考勤记录领域模型
// ==========================================
// 对齐: attendance 表
// 不变量:
// - validation_status 初始为 pending,最多转换一次
// - validated_by / validated_at 当且仅当 pending 时为空
// - status (考勤类别) 不随审核改变
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AttendanceStatus, ValidationStatus};

// ==========================================
// AttendanceRecord - 考勤记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate, // 日历日期,无时区
    pub status: AttendanceStatus,
    pub validation_status: ValidationStatus,
    pub notes: Option<String>,
    pub validated_by: Option<i64>,
    pub validated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AttendanceRecord {
    /// 审核字段是否与审核状态一致
    pub fn validation_fields_consistent(&self) -> bool {
        match self.validation_status {
            ValidationStatus::Pending => self.validated_by.is_none() && self.validated_at.is_none(),
            _ => self.validated_by.is_some() && self.validated_at.is_some(),
        }
    }
}

/// 新建考勤记录 (外部采集路径使用,状态固定为 pending)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendance {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAttendance {
    pub fn new(student_id: i64, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            student_id,
            date,
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

// ==========================================
// AttendanceWithStudent - 待审核列表视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: i64,
    pub nis: String,
    pub full_name: String,
    pub class_name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceWithStudent {
    pub id: i64,
    pub student: StudentInfo,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub validation_status: ValidationStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

// ==========================================
// AbsenceRow - 缺勤明细行 (聚合输入)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceRow {
    pub attendance_id: i64,
    pub student_id: i64,
    pub nis: String,
    pub student_name: String,
    pub class_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub validation_status: ValidationStatus,
    pub notes: Option<String>,
}
