// ==========================================
// 运维工单报表系统 - 数据清洗器
// ==========================================
// 职责: TRIM / 占位值归一化 / 线格式时间戳严格解析 / 超链接工单号回退提取
// ==========================================

use crate::domain::ticket::LinkedField;
use chrono::{NaiveDateTime, ParseError};
use regex::Regex;
use std::sync::OnceLock;

/// 上游导出中表示"未分配"的占位文本(忽略大小写)
pub const PLACEHOLDER_UNASSIGNED: &str = "No asignado";

/// 创建时间的固定线格式: 日/月/年 时:分 (24小时制)
pub const WIRE_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

fn wo_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)woID=(\d+)").expect("woID regex"))
}

fn digit_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit regex"))
}

pub struct TicketCleaner;

impl TicketCleaner {
    /// 去除两侧空白
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 归一化可选字段: 去空白; 空串与"未分配"占位值归一化为缺失
    pub fn normalize_optional(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER_UNASSIGNED) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 严格解析线格式时间戳
    ///
    /// 仅接受 `日/月/年 时:分`; 其他格式一律失败(由调用方记行级错误,
    /// 不做静默默认值)。
    pub fn parse_wire_timestamp(&self, value: &str) -> Result<NaiveDateTime, ParseError> {
        NaiveDateTime::parse_from_str(value.trim(), WIRE_TIMESTAMP_FORMAT)
    }

    /// 从超链接提取数字工单号(回退路径, 不是主提取机制)
    ///
    /// # 规则
    /// 1. 优先取 `woID=<数字>` 查询参数
    /// 2. 否则取 URL 中最后一段连续数字
    pub fn extract_id_from_hyperlink(&self, hyperlink: &str) -> Option<String> {
        if let Some(caps) = wo_id_regex().captures(hyperlink) {
            return Some(caps[1].to_string());
        }
        digit_run_regex()
            .find_iter(hyperlink)
            .last()
            .map(|m| m.as_str().to_string())
    }

    /// 解析工单号字段: 文本优先, 文本缺失时回退超链接提取
    pub fn resolve_request_id(&self, field: &LinkedField) -> Option<String> {
        if let Some(text) = self.normalize_optional(field.text.clone()) {
            return Some(text);
        }
        field
            .hyperlink
            .as_deref()
            .and_then(|link| self.extract_id_from_hyperlink(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_normalize_optional() {
        let cleaner = TicketCleaner;
        assert_eq!(cleaner.normalize_optional(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_optional(Some("".to_string())), None);
        assert_eq!(cleaner.normalize_optional(None), None);
        assert_eq!(
            cleaner.normalize_optional(Some("  valor  ".to_string())),
            Some("valor".to_string())
        );
    }

    #[test]
    fn test_normalize_optional_placeholder() {
        let cleaner = TicketCleaner;
        // 占位值归一化为缺失(忽略大小写)
        assert_eq!(cleaner.normalize_optional(Some("No asignado".to_string())), None);
        assert_eq!(cleaner.normalize_optional(Some(" NO ASIGNADO ".to_string())), None);
        assert_eq!(
            cleaner.normalize_optional(Some("asignado".to_string())),
            Some("asignado".to_string())
        );
    }

    #[test]
    fn test_parse_wire_timestamp_strict() {
        let cleaner = TicketCleaner;

        let ts = cleaner.parse_wire_timestamp("10/01/2025 09:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(ts.hour(), 9);

        // 其他格式一律拒绝
        assert!(cleaner.parse_wire_timestamp("2025-01-10 09:00").is_err());
        assert!(cleaner.parse_wire_timestamp("10/01/2025").is_err());
        assert!(cleaner.parse_wire_timestamp("32/01/2025 09:00").is_err());
        assert!(cleaner.parse_wire_timestamp("").is_err());
    }

    #[test]
    fn test_extract_id_from_hyperlink_wo_id_param() {
        let cleaner = TicketCleaner;
        assert_eq!(
            cleaner.extract_id_from_hyperlink(
                "https://soporte.example.com/WorkOrder.do?woMode=viewWO&woID=48213"
            ),
            Some("48213".to_string())
        );
    }

    #[test]
    fn test_extract_id_from_hyperlink_last_digit_run() {
        let cleaner = TicketCleaner;
        assert_eq!(
            cleaner.extract_id_from_hyperlink("https://soporte.example.com/v2/tickets/48213"),
            Some("48213".to_string())
        );
        assert_eq!(
            cleaner.extract_id_from_hyperlink("https://soporte.example.com/inicio"),
            None
        );
    }

    #[test]
    fn test_resolve_request_id_prefers_text() {
        let cleaner = TicketCleaner;
        let field = LinkedField {
            text: Some(" 1001 ".to_string()),
            hyperlink: Some("https://soporte.example.com/WorkOrder.do?woID=9999".to_string()),
        };
        assert_eq!(cleaner.resolve_request_id(&field), Some("1001".to_string()));
    }

    #[test]
    fn test_resolve_request_id_hyperlink_fallback() {
        let cleaner = TicketCleaner;
        let field = LinkedField {
            text: Some("   ".to_string()),
            hyperlink: Some("https://soporte.example.com/WorkOrder.do?woID=9999".to_string()),
        };
        assert_eq!(cleaner.resolve_request_id(&field), Some("9999".to_string()));

        let empty = LinkedField::default();
        assert_eq!(cleaner.resolve_request_id(&empty), None);
    }
}
