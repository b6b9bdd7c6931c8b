// ==========================================
// 学校考勤管理系统 - 报表与统计模型
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::AttendanceStatus;

// ==========================================
// 缺勤汇总 (每个学生一行)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceBreakdown {
    pub izin: i64,
    pub sakit: i64,
    pub alpha: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAbsenceSummary {
    pub student_id: i64,
    pub class_name: String,
    pub student_name: String,
    pub nis: String,
    pub total_absences: i64,
    pub breakdown: AbsenceBreakdown,
}

/// 缺勤查询条件 (各条件之间为 AND)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceFilter {
    pub class_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 仅统计已审核通过的记录 (导出报表使用)
    pub validated_only: bool,
}

impl AbsenceFilter {
    pub fn new(
        class_name: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            class_name,
            start_date,
            end_date,
            validated_only: false,
        }
    }

    pub fn validated_only(mut self) -> Self {
        self.validated_only = true;
        self
    }
}

// ==========================================
// 驾驶舱统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    pub hadir: i64,
    pub izin: i64,
    pub sakit: i64,
    pub alpha: i64,
    pub total: i64,
}

impl TodayStats {
    /// 累加某类别计数,total 同步增加
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Hadir => self.hadir += count,
            AttendanceStatus::Izin => self.izin += count,
            AttendanceStatus::Sakit => self.sakit += count,
            AttendanceStatus::Alpha => self.alpha += count,
        }
        self.total += count;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub pending_validations: i64,
    pub today_stats: TodayStats,
}
