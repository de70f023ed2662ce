// ==========================================
// 运维工单报表系统 - 日期窗口成员判定
// ==========================================
// 规则: WEEKLY/CUSTOM 为含端点的日粒度区间; DISABLED 回退为"今天"所在 ISO 周
// 说明: "今天"由调用方在固定报表时区下计算一次后传入, 引擎保持无时钟
// ==========================================

use crate::domain::types::RangeKind;
use crate::domain::window::DateWindow;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// 判定时间戳是否落在窗口内
///
/// # 规则
/// - DISABLED: 时间戳日期与 `today` 属于同一 ISO 日历周 → true
/// - WEEKLY / CUSTOM: `from_date <= ts.date() <= to_date`（两端均含）
pub fn window_contains(window: &DateWindow, ts: NaiveDateTime, today: NaiveDate) -> bool {
    let date = ts.date();
    match window.range_kind {
        RangeKind::Disabled => date.iso_week() == today.iso_week(),
        RangeKind::Weekly | RangeKind::Custom => {
            window.from_date <= date && date <= window.to_date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::WindowScope;
    use chrono::NaiveDateTime;

    fn window(from: (i32, u32, u32), to: (i32, u32, u32), kind: RangeKind) -> DateWindow {
        DateWindow {
            id: 1,
            from_date: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            to_date: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
            description: String::new(),
            is_active: true,
            range_kind: kind,
            scope: WindowScope::Monthly,
        }
    }

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%d/%m/%Y %H:%M").unwrap()
    }

    fn today(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_window_inclusive_membership() {
        // 窗口 2025-01-06 ~ 2025-01-12
        let w = window((2025, 1, 6), (2025, 1, 12), RangeKind::Weekly);
        assert!(window_contains(&w, ts("10/01/2025 09:00"), today(2025, 1, 10)));
        assert!(!window_contains(&w, ts("13/01/2025 09:00"), today(2025, 1, 10)));
    }

    #[test]
    fn test_interval_is_inclusive_at_both_endpoints() {
        let w = window((2025, 1, 6), (2025, 1, 12), RangeKind::Custom);
        // 恰好等于 from_date / to_date 均为 true(任意时刻)
        assert!(window_contains(&w, ts("06/01/2025 00:00"), today(2025, 2, 1)));
        assert!(window_contains(&w, ts("12/01/2025 23:59"), today(2025, 2, 1)));
        assert!(!window_contains(&w, ts("05/01/2025 23:59"), today(2025, 2, 1)));
    }

    #[test]
    fn test_disabled_falls_back_to_current_iso_week() {
        let w = window((2000, 1, 1), (2000, 1, 1), RangeKind::Disabled);
        // 2025-01-10 (周五) 所在 ISO 周: 01-06(周一) ~ 01-12(周日)
        let t = today(2025, 1, 10);
        assert!(window_contains(&w, ts("06/01/2025 00:00"), t));
        assert!(window_contains(&w, ts("12/01/2025 23:59"), t));
        assert!(!window_contains(&w, ts("05/01/2025 12:00"), t));
        assert!(!window_contains(&w, ts("13/01/2025 00:00"), t));
    }

    #[test]
    fn test_disabled_iso_week_across_year_boundary() {
        let w = window((2000, 1, 1), (2000, 1, 1), RangeKind::Disabled);
        // 2025-01-01 (周三) 与 2024-12-30 (周一) 同属 ISO 2025-W01
        let t = today(2025, 1, 1);
        assert!(window_contains(&w, ts("30/12/2024 08:00"), t));
        assert!(!window_contains(&w, ts("29/12/2024 08:00"), t));
    }

    #[test]
    fn test_implicit_disabled_window_ignores_interval_fields() {
        let w = DateWindow::implicit_disabled(WindowScope::Corrective, today(2025, 1, 10));
        assert!(window_contains(&w, ts("08/01/2025 10:30"), today(2025, 1, 10)));
        assert!(!window_contains(&w, ts("20/01/2025 10:30"), today(2025, 1, 10)));
    }
}
