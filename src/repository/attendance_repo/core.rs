use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

use crate::db::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::domain::attendance::{AttendanceRecord, NewAttendance};
use crate::domain::types::{AttendanceStatus, ValidationStatus};
use crate::repository::error::{
    conversion_error, parse_date_column, parse_timestamp_column, RepositoryError,
    RepositoryResult,
};

// ==========================================
// AttendanceRepository - 考勤记录仓储
// ==========================================
pub struct AttendanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AttendanceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入考勤记录 (validation_status 固定为 pending)
    pub fn insert(&self, record: &NewAttendance) -> RepositoryResult<i64> {
        self.insert_at(record, Local::now().naive_local())
    }

    /// 按指定创建时间插入 (导入/测试使用,保证排序可复现)
    pub fn insert_at(
        &self,
        record: &NewAttendance,
        created_at: NaiveDateTime,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let ts = created_at.format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            r#"
            INSERT INTO attendance (
                student_id, date, status, validation_status, notes,
                validated_by, validated_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, 'pending', ?4, NULL, NULL, ?5, ?5)
            "#,
            params![
                record.student_id,
                record.date.format(DATE_FORMAT).to_string(),
                record.status.as_str(),
                record.notes,
                ts,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<AttendanceRecord>> {
        let conn = self.get_conn()?;
        let record = conn
            .query_row(
                r#"
                SELECT id, student_id, date, status, validation_status, notes,
                       validated_by, validated_at, created_at, updated_at
                FROM attendance
                WHERE id = ?1
                "#,
                params![id],
                map_attendance_row,
            )
            .optional()?;
        Ok(record)
    }

    /// 条件转换: 仅当记录仍为 pending 时写入终态
    ///
    /// - notes 为 None 时保留原备注
    /// - 返回受影响行数 (0 表示记录不存在或已被处理)
    pub fn transition_from_pending(
        &self,
        id: i64,
        target: ValidationStatus,
        admin_id: i64,
        notes: Option<&str>,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        if !target.is_terminal() {
            return Err(RepositoryError::FieldValueError {
                field: "validation_status".to_string(),
                message: format!("非终态不可作为转换目标: {}", target),
            });
        }

        let conn = self.get_conn()?;
        let ts = now.format(TIMESTAMP_FORMAT).to_string();
        let affected = conn.execute(
            r#"
            UPDATE attendance
            SET validation_status = ?2,
                validated_by = ?3,
                validated_at = ?4,
                updated_at = ?4,
                notes = COALESCE(?5, notes)
            WHERE id = ?1 AND validation_status = 'pending'
            "#,
            params![id, target.as_str(), admin_id, ts, notes],
        )?;
        Ok(affected)
    }
}

// ==========================================
// 行映射
// ==========================================

pub(super) fn parse_status_column(column: usize, raw: &str) -> rusqlite::Result<AttendanceStatus> {
    AttendanceStatus::parse(raw)
        .ok_or_else(|| conversion_error(column, format!("未知考勤类别: {}", raw)))
}

pub(super) fn parse_validation_column(
    column: usize,
    raw: &str,
) -> rusqlite::Result<ValidationStatus> {
    ValidationStatus::parse(raw)
        .ok_or_else(|| conversion_error(column, format!("未知审核状态: {}", raw)))
}

fn map_attendance_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    let date: String = row.get(2)?;
    let status: String = row.get(3)?;
    let validation_status: String = row.get(4)?;
    let validated_at: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(AttendanceRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        date: parse_date_column(2, &date)?,
        status: parse_status_column(3, &status)?,
        validation_status: parse_validation_column(4, &validation_status)?,
        notes: row.get(5)?,
        validated_by: row.get(6)?,
        validated_at: validated_at
            .as_deref()
            .map(|s| parse_timestamp_column(7, s))
            .transpose()?,
        created_at: parse_timestamp_column(8, &created_at)?,
        updated_at: parse_timestamp_column(9, &updated_at)?,
    })
}
