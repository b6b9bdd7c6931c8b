// ==========================================
// 学校考勤管理系统 - 管理员数据仓储
// ==========================================
// 说明: 仅提供身份查询,凭据校验由认证模块负责
// ==========================================

use chrono::Local;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::TIMESTAMP_FORMAT;
use crate::domain::student::{Admin, NewAdmin};
use crate::repository::error::{parse_timestamp_column, RepositoryError, RepositoryResult};

pub struct AdminRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AdminRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, admin: &NewAdmin) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            r#"
            INSERT INTO admins (nis, email, full_name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
            params![admin.nis, admin.email, admin.full_name, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Admin>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, nis, email, full_name, created_at, updated_at FROM admins WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let created_at: String = row.get(4)?;
        let updated_at: String = row.get(5)?;
        Ok(Some(Admin {
            id: row.get(0)?,
            nis: row.get(1)?,
            email: row.get(2)?,
            full_name: row.get(3)?,
            created_at: parse_timestamp_column(4, &created_at)?,
            updated_at: parse_timestamp_column(5, &updated_at)?,
        }))
    }
}
