// ==========================================
// 学校考勤管理系统 - 报表 CSV 序列化
// ==========================================
// 汇总: 每个学生一行
// 明细: 每条缺勤记录一行
// 表头沿用校方报表的印尼语列名
// ==========================================

use csv::WriterBuilder;

use crate::db::DATE_FORMAT;
use crate::domain::attendance::AbsenceRow;
use crate::domain::report::StudentAbsenceSummary;
use crate::exporter::error::ExportResult;

pub const SUMMARY_HEADERS: [&str; 7] = [
    "NIS",
    "Nama Siswa",
    "Kelas",
    "Total Tidak Hadir",
    "Izin",
    "Sakit",
    "Alpha",
];

pub const DETAIL_HEADERS: [&str; 6] = ["NIS", "Nama Siswa", "Kelas", "Tanggal", "Status", "Catatan"];

/// 序列化汇总报表 (顺序与输入一致)
pub fn write_summary_csv(summaries: &[StudentAbsenceSummary]) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADERS)?;

    for s in summaries {
        writer.write_record(&[
            s.nis.clone(),
            s.student_name.clone(),
            s.class_name.clone(),
            s.total_absences.to_string(),
            s.breakdown.izin.to_string(),
            s.breakdown.sakit.to_string(),
            s.breakdown.alpha.to_string(),
        ])?;
    }

    Ok(writer.into_inner()?)
}

/// 序列化明细报表
pub fn write_detail_csv(rows: &[AbsenceRow]) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(DETAIL_HEADERS)?;

    for r in rows {
        writer.write_record(&[
            r.nis.clone(),
            r.student_name.clone(),
            r.class_name.clone(),
            r.date.format(DATE_FORMAT).to_string(),
            r.status.as_str().to_string(),
            r.notes.clone().unwrap_or_default(),
        ])?;
    }

    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::AbsenceBreakdown;
    use crate::domain::types::{AttendanceStatus, ValidationStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_summary_csv_layout() {
        let summaries = vec![StudentAbsenceSummary {
            student_id: 1,
            class_name: "10A".to_string(),
            student_name: "Ahmad Budi".to_string(),
            nis: "SIS001".to_string(),
            total_absences: 3,
            breakdown: AbsenceBreakdown {
                izin: 1,
                sakit: 1,
                alpha: 1,
            },
        }];
        let text = String::from_utf8(write_summary_csv(&summaries).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NIS,Nama Siswa,Kelas,Total Tidak Hadir,Izin,Sakit,Alpha");
        assert_eq!(lines[1], "SIS001,Ahmad Budi,10A,3,1,1,1");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_summary_has_header_only() {
        let text = String::from_utf8(write_summary_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_detail_csv_quotes_notes() {
        let rows = vec![AbsenceRow {
            attendance_id: 1,
            student_id: 1,
            nis: "SIS001".to_string(),
            student_name: "Ahmad Budi".to_string(),
            class_name: "10A".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: AttendanceStatus::Izin,
            validation_status: ValidationStatus::Validated,
            notes: Some("acara, keluarga".to_string()),
        }];
        let text = String::from_utf8(write_detail_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NIS,Nama Siswa,Kelas,Tanggal,Status,Catatan");
        assert_eq!(lines[1], "SIS001,Ahmad Budi,10A,2024-01-15,izin,\"acara, keluarga\"");
    }
}
