// ==========================================
// 集成测试数据构建器
// ==========================================
// 约定: 批次时间相关数据一律围绕报表时区"今天"构造, 保证测试不随日历漂移
// ==========================================

use chrono::{Duration, NaiveDate};
use ticket_report::api::derive_api::reporting_today;
use ticket_report::domain::link::TicketLink;
use ticket_report::domain::rule::NewPatternRule;
use ticket_report::domain::ticket::{LinkedField, RawTicketRow};
use ticket_report::domain::types::{PatternKind, RangeKind, RuleFamily};
use ticket_report::domain::window::NewDateWindow;
use ticket_report::importer::data_cleaner::WIRE_TIMESTAMP_FORMAT;

/// 报表时区"今天"的线格式时间戳(09:00)
pub fn wire_timestamp_today() -> String {
    reporting_today()
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
        .format(WIRE_TIMESTAMP_FORMAT)
        .to_string()
}

/// 相对"今天"偏移若干天的线格式时间戳(09:00)
pub fn wire_timestamp_days_from_today(days: i64) -> String {
    (reporting_today() + Duration::days(days))
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
        .format(WIRE_TIMESTAMP_FORMAT)
        .to_string()
}

/// 围绕"今天"的自定义窗口 [today - before, today + after]
pub fn window_around_today(before: i64, after: i64) -> NewDateWindow {
    let today = reporting_today();
    NewDateWindow {
        from_date: today - Duration::days(before),
        to_date: today + Duration::days(after),
        description: "ventana de prueba".to_string(),
        range_kind: RangeKind::Custom,
    }
}

/// 固定日期窗口
pub fn window_fixed(from: NaiveDate, to: NaiveDate, kind: RangeKind) -> NewDateWindow {
    NewDateWindow {
        from_date: from,
        to_date: to,
        description: String::new(),
        range_kind: kind,
    }
}

pub fn business_unit_rule(pattern: &str, target: &str, priority: i32) -> NewPatternRule {
    NewPatternRule {
        family: RuleFamily::BusinessUnit,
        source_pattern: pattern.to_string(),
        target_value: target.to_string(),
        pattern_kind: PatternKind::Contains,
        priority,
        active: true,
    }
}

pub fn status_rule(pattern: &str, target: &str) -> NewPatternRule {
    NewPatternRule {
        family: RuleFamily::StatusMapping,
        source_pattern: pattern.to_string(),
        target_value: target.to_string(),
        pattern_kind: PatternKind::Exact,
        priority: 0,
        active: true,
    }
}

pub fn link(parent: &str, child: &str) -> TicketLink {
    TicketLink {
        parent_request_id: parent.to_string(),
        child_request_id: child.to_string(),
        parent_hyperlink: None,
        child_hyperlink: None,
    }
}

/// 原始工单行构建器
pub struct RawRowBuilder {
    row: RawTicketRow,
}

impl RawRowBuilder {
    pub fn new(request_id: &str) -> Self {
        Self {
            row: RawTicketRow {
                request_id: LinkedField::from_text(request_id),
                created_time: Some(wire_timestamp_today()),
                subject: Some("Incidencia de prueba".to_string()),
                technician: Some("Laura Gómez".to_string()),
                application: Some("SB Platform".to_string()),
                raw_status: Some("En curso".to_string()),
                level: Some("Nivel 1".to_string()),
            },
        }
    }

    pub fn created_time(mut self, value: &str) -> Self {
        self.row.created_time = Some(value.to_string());
        self
    }

    pub fn application(mut self, value: &str) -> Self {
        self.row.application = Some(value.to_string());
        self
    }

    pub fn raw_status(mut self, value: &str) -> Self {
        self.row.raw_status = Some(value.to_string());
        self
    }

    pub fn technician(mut self, value: &str) -> Self {
        self.row.technician = Some(value.to_string());
        self
    }

    pub fn hyperlink_only(mut self, url: &str) -> Self {
        self.row.request_id = LinkedField {
            text: None,
            hyperlink: Some(url.to_string()),
        };
        self
    }

    pub fn build(self) -> RawTicketRow {
        self.row
    }
}
