// ==========================================
// 学校考勤管理系统 - 领域类型定义
// ==========================================
// 考勤类别: hadir / izin / sakit / alpha
// 审核状态: pending → validated | rejected (单向、仅一次)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 考勤类别 (Attendance Status)
// ==========================================
// 创建时确定,审核流程不会修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Hadir, // 出勤
    Izin,  // 事假(已批准)
    Sakit, // 病假
    Alpha, // 旷课
}

impl AttendanceStatus {
    /// 全部类别(按固定展示顺序)
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Hadir,
        AttendanceStatus::Izin,
        AttendanceStatus::Sakit,
        AttendanceStatus::Alpha,
    ];

    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Hadir => "hadir",
            AttendanceStatus::Izin => "izin",
            AttendanceStatus::Sakit => "sakit",
            AttendanceStatus::Alpha => "alpha",
        }
    }

    /// 从字符串解析,同时接受英文别名
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hadir" | "present" => Some(AttendanceStatus::Hadir),
            "izin" | "excused" => Some(AttendanceStatus::Izin),
            "sakit" | "sick" => Some(AttendanceStatus::Sakit),
            "alpha" | "absent" => Some(AttendanceStatus::Alpha),
            _ => None,
        }
    }

    /// 是否计为缺勤 (非 hadir 即缺勤)
    pub fn is_absence(&self) -> bool {
        !matches!(self, AttendanceStatus::Hadir)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审核状态 (Validation Status)
// ==========================================
// validated / rejected 均为吸收态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pending,
    Validated,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Validated => "validated",
            ValidationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ValidationStatus::Pending),
            "validated" => Some(ValidationStatus::Validated),
            "rejected" => Some(ValidationStatus::Rejected),
            _ => None,
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审核动作 (Validation Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    Validate,
    Reject,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationAction::Validate => "validate",
            ValidationAction::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "validate" => Some(ValidationAction::Validate),
            "reject" => Some(ValidationAction::Reject),
            _ => None,
        }
    }

    /// 动作对应的目标终态
    pub fn target_status(&self) -> ValidationStatus {
        match self {
            ValidationAction::Validate => ValidationStatus::Validated,
            ValidationAction::Reject => ValidationStatus::Rejected,
        }
    }
}

impl fmt::Display for ValidationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
