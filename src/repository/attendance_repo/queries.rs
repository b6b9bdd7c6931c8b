use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

use super::core::{parse_status_column, parse_validation_column, AttendanceRepository};
use crate::db::DATE_FORMAT;
use crate::domain::attendance::{AbsenceRow, AttendanceWithStudent, StudentInfo};
use crate::domain::report::AbsenceFilter;
use crate::domain::types::AttendanceStatus;
use crate::repository::error::{parse_date_column, parse_timestamp_column, RepositoryResult};

impl AttendanceRepository {
    /// 待审核记录 (附学生信息),按创建时间倒序
    pub fn list_pending_with_student(&self) -> RepositoryResult<Vec<AttendanceWithStudent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT a.id, a.date, a.status, a.validation_status, a.notes, a.created_at,
                   s.id, s.nis, s.full_name, s.class_name, s.photo_url
            FROM attendance a
            INNER JOIN students s ON s.id = a.student_id
            WHERE a.validation_status = 'pending'
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], map_pending_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 缺勤明细 (status <> 'hadir'),条件按 AND 组合
    pub fn list_absence_rows(&self, filter: &AbsenceFilter) -> RepositoryResult<Vec<AbsenceRow>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            r#"
            SELECT a.id, s.id, s.nis, s.full_name, s.class_name,
                   a.date, a.status, a.validation_status, a.notes
            FROM attendance a
            INNER JOIN students s ON s.id = a.student_id
            WHERE a.status <> 'hadir'
            "#,
        );
        let mut params: Vec<Value> = Vec::new();

        if let Some(class_name) = &filter.class_name {
            sql.push_str(" AND s.class_name = ?");
            params.push(Value::Text(class_name.clone()));
        }
        if let Some(start) = filter.start_date {
            sql.push_str(" AND a.date >= ?");
            params.push(Value::Text(start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = filter.end_date {
            sql.push_str(" AND a.date <= ?");
            params.push(Value::Text(end.format(DATE_FORMAT).to_string()));
        }
        if filter.validated_only {
            sql.push_str(" AND a.validation_status = 'validated'");
        }
        sql.push_str(" ORDER BY s.class_name, s.full_name, a.date, a.id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), map_absence_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 待审核总数 (不限日期)
    pub fn count_pending(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE validation_status = 'pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 指定日期各考勤类别计数 (不区分审核状态)
    pub fn count_by_status_on_date(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<(AttendanceStatus, i64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT status, COUNT(*)
            FROM attendance
            WHERE date = ?1
            GROUP BY status
            "#,
        )?;

        let counts = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
                let status: String = row.get(0)?;
                Ok((parse_status_column(0, &status)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}

fn map_pending_row(row: &Row<'_>) -> rusqlite::Result<AttendanceWithStudent> {
    let date: String = row.get(1)?;
    let status: String = row.get(2)?;
    let validation_status: String = row.get(3)?;
    let created_at: String = row.get(5)?;

    Ok(AttendanceWithStudent {
        id: row.get(0)?,
        date: parse_date_column(1, &date)?,
        status: parse_status_column(2, &status)?,
        validation_status: parse_validation_column(3, &validation_status)?,
        notes: row.get(4)?,
        created_at: parse_timestamp_column(5, &created_at)?,
        student: StudentInfo {
            id: row.get(6)?,
            nis: row.get(7)?,
            full_name: row.get(8)?,
            class_name: row.get(9)?,
            photo_url: row.get(10)?,
        },
    })
}

fn map_absence_row(row: &Row<'_>) -> rusqlite::Result<AbsenceRow> {
    let date: String = row.get(5)?;
    let status: String = row.get(6)?;
    let validation_status: String = row.get(7)?;

    Ok(AbsenceRow {
        attendance_id: row.get(0)?,
        student_id: row.get(1)?,
        nis: row.get(2)?,
        student_name: row.get(3)?,
        class_name: row.get(4)?,
        date: parse_date_column(5, &date)?,
        status: parse_status_column(6, &status)?,
        validation_status: parse_validation_column(7, &validation_status)?,
        notes: row.get(8)?,
    })
}
