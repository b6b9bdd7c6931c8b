// ==========================================
// 学校考勤管理系统 - 学生数据仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use chrono::Local;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::TIMESTAMP_FORMAT;
use crate::domain::student::NewStudent;
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入学生,返回自增 id
    pub fn insert(&self, student: &NewStudent) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            r#"
            INSERT INTO students (nis, full_name, class_name, photo_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                student.nis,
                student.full_name,
                student.class_name,
                student.photo_url,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
