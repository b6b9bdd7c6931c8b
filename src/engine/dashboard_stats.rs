// ==========================================
// 学校考勤管理系统 - 驾驶舱统计引擎
// ==========================================
// pending_validations: 全部待审核数 (不限日期)
// today_stats: 指定日期各类别计数 (不区分审核状态)
// 日期由调用方传入,便于测试
// ==========================================

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::report::{DashboardStats, TodayStats};
use crate::repository::{AttendanceRepository, RepositoryResult};

pub struct DashboardStatsAggregator {
    attendance_repo: Arc<AttendanceRepository>,
}

impl DashboardStatsAggregator {
    pub fn new(attendance_repo: Arc<AttendanceRepository>) -> Self {
        Self { attendance_repo }
    }

    /// 计算截至 `as_of` 当天的驾驶舱统计
    pub fn compute(&self, as_of: NaiveDate) -> RepositoryResult<DashboardStats> {
        let pending_validations = self.attendance_repo.count_pending()?;

        let mut today_stats = TodayStats::default();
        for (status, count) in self.attendance_repo.count_by_status_on_date(as_of)? {
            today_stats.add(status, count);
        }

        Ok(DashboardStats {
            pending_validations,
            today_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance::NewAttendance;
    use crate::domain::student::NewStudent;
    use crate::domain::types::AttendanceStatus;
    use crate::repository::StudentRepository;
    use std::sync::Mutex;

    #[test]
    fn test_empty_store_is_all_zero() {
        let conn = Arc::new(Mutex::new(crate::db::open_in_memory().unwrap()));
        let engine = DashboardStatsAggregator::new(Arc::new(AttendanceRepository::new(conn)));
        let stats = engine
            .compute(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_today_counts_and_global_pending() {
        let conn = Arc::new(Mutex::new(crate::db::open_in_memory().unwrap()));
        let student_id = StudentRepository::new(conn.clone())
            .insert(&NewStudent::new("S1", "Ani", "10A"))
            .unwrap();
        let repo = Arc::new(AttendanceRepository::new(conn));
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();

        repo.insert(&NewAttendance::new(student_id, today, AttendanceStatus::Hadir)).unwrap();
        repo.insert(&NewAttendance::new(student_id, today, AttendanceStatus::Sakit)).unwrap();
        repo.insert(&NewAttendance::new(student_id, yesterday, AttendanceStatus::Alpha)).unwrap();

        let stats = DashboardStatsAggregator::new(repo).compute(today).unwrap();
        assert_eq!(stats.pending_validations, 3);
        assert_eq!(
            stats.today_stats,
            TodayStats {
                hadir: 1,
                izin: 0,
                sakit: 1,
                alpha: 0,
                total: 2
            }
        );
    }
}
