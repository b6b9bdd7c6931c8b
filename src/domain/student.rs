// ==========================================
// 学校考勤管理系统 - 学生与管理员领域模型
// ==========================================
// 对齐: students / admins 表
// 说明: 管理员凭据由认证模块持有,本模型不含密码字段
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// NewStudent - 学生录入
// ==========================================
// 读取视图见 attendance::StudentInfo
/// 新建学生
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub nis: String,
    pub full_name: String,
    pub class_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl NewStudent {
    pub fn new(nis: &str, full_name: &str, class_name: &str) -> Self {
        Self {
            nis: nis.to_string(),
            full_name: full_name.to_string(),
            class_name: class_name.to_string(),
            photo_url: None,
        }
    }
}

// ==========================================
// Admin - 管理员 (审核操作人)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub nis: String,   // 工号 (唯一)
    pub email: String, // 邮箱 (唯一)
    pub full_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdmin {
    pub nis: String,
    pub email: String,
    pub full_name: String,
}

impl NewAdmin {
    pub fn new(nis: &str, email: &str, full_name: &str) -> Self {
        Self {
            nis: nis.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
        }
    }
}
