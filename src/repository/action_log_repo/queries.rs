use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{parse_timestamp_column, RepositoryResult};
use rusqlite::{params, Result as SqliteResult, Row};

impl ActionLogRepository {
    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   attendance_id, payload_json, detail
            FROM action_log
            WHERE action_id = ?
            "#,
        )?;

        match stmt.query_row(params![action_id], map_row) {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某条考勤记录的全部操作日志
    pub fn find_by_attendance_id(&self, attendance_id: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   attendance_id, payload_json, detail
            FROM action_log
            WHERE attendance_id = ?
            ORDER BY action_ts DESC
            "#,
        )?;

        let logs = stmt
            .query_map(params![attendance_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 查询指定操作人的日志
    pub fn find_by_actor(&self, actor: &str, limit: i32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   attendance_id, payload_json, detail
            FROM action_log
            WHERE actor = ?
            ORDER BY action_ts DESC
            LIMIT ?
            "#,
        )?;

        let logs = stmt
            .query_map(params![actor, limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 查询最近的 N 条日志
    pub fn find_recent(&self, limit: i32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   attendance_id, payload_json, detail
            FROM action_log
            ORDER BY action_ts DESC
            LIMIT ?
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 统计指定操作类型的日志数
    pub fn count_by_action_type(&self, action_type: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM action_log WHERE action_type = ?",
            params![action_type],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

/// 将数据库行映射为 ActionLog 实体
fn map_row(row: &Row) -> SqliteResult<ActionLog> {
    let action_ts_str: String = row.get(2)?;
    let payload_json_str: Option<String> = row.get(5)?;

    Ok(ActionLog {
        action_id: row.get(0)?,
        action_type: row.get(1)?,
        action_ts: parse_timestamp_column(2, &action_ts_str)?,
        actor: row.get(3)?,
        attendance_id: row.get(4)?,
        // 解析 JSON 字段（损坏的 JSON 视为无负载）
        payload_json: payload_json_str.and_then(|s| serde_json::from_str(&s).ok()),
        detail: row.get(6)?,
    })
}
