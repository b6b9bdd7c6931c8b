// ==========================================
// 学校考勤管理系统 - 操作日志领域模型
// ==========================================
// 红线: 审核决定与报表导出必须留痕
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,             // 日志ID (UUID)
    pub action_type: String,           // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,      // 操作时间戳
    pub actor: String,                 // 操作人
    pub attendance_id: Option<i64>,    // 关联考勤记录 (导出为 None)
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,        // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    ValidateAttendance,  // 审核通过
    RejectAttendance,    // 审核驳回
    ExportAbsenceReport, // 导出缺勤报表
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ValidateAttendance => "ValidateAttendance",
            ActionType::RejectAttendance => "RejectAttendance",
            ActionType::ExportAbsenceReport => "ExportAbsenceReport",
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ValidateAttendance" => Some(ActionType::ValidateAttendance),
            "RejectAttendance" => Some(ActionType::RejectAttendance),
            "ExportAbsenceReport" => Some(ActionType::ExportAbsenceReport),
            _ => None,
        }
    }
}

impl ActionLog {
    /// 创建新的操作日志 (action_id 自动生成)
    pub fn new(action_type: ActionType, actor: String) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor,
            attendance_id: None,
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_attendance(mut self, attendance_id: i64) -> Self {
        self.attendance_id = Some(attendance_id);
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn get_action_type(&self) -> Option<ActionType> {
        ActionType::from_str(&self.action_type)
    }
}
