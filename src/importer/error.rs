// ==========================================
// 运维工单报表系统 - 派生模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 行级错误逐行收集, 永不中止批次
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 行级派生错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    // ===== 必填字段错误 =====
    #[error("工单号缺失 (行 {row}): 文本与超链接均无法提取")]
    MissingRequestId { row: usize },

    #[error("必填字段缺失 (行 {row}, 字段 {field})")]
    MissingField { row: usize, field: String },

    // ===== 格式错误 =====
    #[error("日期格式错误 (行 {row}, 字段 {field}): 期望 日/月/年 时:分, 实际 {value}")]
    TimestampFormatError {
        row: usize,
        field: String,
        value: String,
    },
}

impl DeriveError {
    /// 行号（0 基, 与输入批次下标一致）
    pub fn row(&self) -> usize {
        match self {
            DeriveError::MissingRequestId { row } => *row,
            DeriveError::MissingField { row, .. } => *row,
            DeriveError::TimestampFormatError { row, .. } => *row,
        }
    }

    /// 出错字段名
    pub fn field(&self) -> &str {
        match self {
            DeriveError::MissingRequestId { .. } => "request_id",
            DeriveError::MissingField { field, .. } => field,
            DeriveError::TimestampFormatError { field, .. } => field,
        }
    }
}

/// 行级错误明细(对外响应结构)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    /// 行号(0 基)
    pub row: usize,
    /// 字段名
    pub field: String,
    /// 错误消息
    pub message: String,
}

impl From<DeriveError> for RowError {
    fn from(err: DeriveError) -> Self {
        RowError {
            row: err.row(),
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
