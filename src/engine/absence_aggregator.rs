// ==========================================
// 学校考勤管理系统 - 缺勤汇总引擎
// ==========================================
// 输入: 缺勤明细行 (已排除 hadir,按条件 AND 过滤)
// 输出: 每个学生一行的汇总,按 (班级, 姓名) 升序
// 红线: 分组键为 student_id,不使用显示字段组合
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::attendance::AbsenceRow;
use crate::domain::report::{AbsenceBreakdown, AbsenceFilter, StudentAbsenceSummary};
use crate::domain::types::AttendanceStatus;
use crate::repository::{AttendanceRepository, RepositoryResult};

// ==========================================
// AbsenceAggregator - 缺勤汇总引擎
// ==========================================
pub struct AbsenceAggregator {
    attendance_repo: Arc<AttendanceRepository>,
}

impl AbsenceAggregator {
    pub fn new(attendance_repo: Arc<AttendanceRepository>) -> Self {
        Self { attendance_repo }
    }

    /// 查询并汇总缺勤
    pub fn summarize_absences(
        &self,
        filter: &AbsenceFilter,
    ) -> RepositoryResult<Vec<StudentAbsenceSummary>> {
        let rows = self.attendance_repo.list_absence_rows(filter)?;
        Ok(summarize(&rows))
    }

    /// 查询缺勤明细与汇总 (导出使用,一次查询)
    pub fn absence_rows_with_summary(
        &self,
        filter: &AbsenceFilter,
    ) -> RepositoryResult<(Vec<AbsenceRow>, Vec<StudentAbsenceSummary>)> {
        let rows = self.attendance_repo.list_absence_rows(filter)?;
        let summaries = summarize(&rows);
        Ok((rows, summaries))
    }
}

/// 将缺勤明细按学生分组汇总
///
/// - hadir 行不计入 (即使调用方未预先排除)
/// - 同名同班学生按 student_id 升序
pub fn summarize(rows: &[AbsenceRow]) -> Vec<StudentAbsenceSummary> {
    let mut groups: BTreeMap<i64, StudentAbsenceSummary> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.status.is_absence()) {
        let entry = groups
            .entry(row.student_id)
            .or_insert_with(|| StudentAbsenceSummary {
                student_id: row.student_id,
                class_name: row.class_name.clone(),
                student_name: row.student_name.clone(),
                nis: row.nis.clone(),
                total_absences: 0,
                breakdown: AbsenceBreakdown::default(),
            });

        entry.total_absences += 1;
        match row.status {
            AttendanceStatus::Izin => entry.breakdown.izin += 1,
            AttendanceStatus::Sakit => entry.breakdown.sakit += 1,
            AttendanceStatus::Alpha => entry.breakdown.alpha += 1,
            AttendanceStatus::Hadir => {}
        }
    }

    // BTreeMap 已按 student_id 有序,稳定排序后并列项保持 id 顺序
    let mut summaries: Vec<StudentAbsenceSummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| {
        a.class_name
            .cmp(&b.class_name)
            .then_with(|| a.student_name.cmp(&b.student_name))
    });
    summaries
}
