// ==========================================
// 学校考勤管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 支持的界面语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "id"];

// ==========================================
// ReportSettings - 报表导出配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub reports_dir: PathBuf,
    pub download_prefix: String,
    pub include_detail: bool,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（已存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 报表导出配置 =====

    /// 报表输出目录（默认 `<cwd>/tmp/reports`）
    pub fn get_reports_dir(&self) -> Result<PathBuf, Box<dyn Error>> {
        match self.get_config_value(config_keys::REPORTS_DIR)? {
            Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir.trim())),
            _ => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Ok(cwd.join("tmp").join("reports"))
            }
        }
    }

    /// 下载地址前缀（默认 `/reports`）
    pub fn get_report_download_prefix(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::REPORT_DOWNLOAD_PREFIX, "/reports")
    }

    /// 是否同时导出明细报表（默认 true）
    pub fn get_report_include_detail(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::REPORT_INCLUDE_DETAIL, "true")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::REPORT_INCLUDE_DETAIL,
                    raw_value = %value,
                    "明细报表开关格式错误，使用默认值 true"
                );
                Ok(true)
            }
        }
    }

    pub fn get_report_settings(&self) -> Result<ReportSettings, Box<dyn Error>> {
        Ok(ReportSettings {
            reports_dir: self.get_reports_dir()?,
            download_prefix: self.get_report_download_prefix()?,
            include_detail: self.get_report_include_detail()?,
        })
    }

    // ===== 界面语言 =====

    /// 界面语言（默认 en，未知取值回退 en）
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, "en")?;
        let locale = value.trim().to_lowercase();
        if SUPPORTED_LOCALES.contains(&locale.as_str()) {
            Ok(locale)
        } else {
            tracing::warn!(config_key = config_keys::LOCALE, raw_value = %value, "不支持的语言，使用 en");
            Ok("en".to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 报表导出
    pub const REPORTS_DIR: &str = "reports_dir";
    pub const REPORT_DOWNLOAD_PREFIX: &str = "report_download_prefix";
    pub const REPORT_INCLUDE_DETAIL: &str = "report_include_detail";

    // 界面语言
    pub const LOCALE: &str = "locale";
}
