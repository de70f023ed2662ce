// ==========================================
// 运维工单报表系统 - 规则管理API
// ==========================================
// 职责: 模式规则增删改查 + 分类/模式预览
// 红线: 任何规则变更必须失效对应规则族快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::rule::{NewPatternRule, PatternRule, PatternRuleUpdate};
use crate::domain::types::{PatternKind, RuleFamily};
use crate::engine::rule_cache::RuleSetCache;
use crate::engine::rule_match::pattern_matches;
use crate::i18n::{t, t_with_args};
use crate::repository::rule_repo::PatternRuleRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 模式预览结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPreview {
    pub matched: bool,
}

/// 分类预览结果(不落库, 用当前快照实时求值)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyPreview {
    pub family: RuleFamily,
    pub input: String,
    pub result: String,
}

pub struct RuleApi {
    repo: Arc<PatternRuleRepository>,
    cache: Arc<RuleSetCache>,
}

impl RuleApi {
    pub fn new(repo: Arc<PatternRuleRepository>, cache: Arc<RuleSetCache>) -> Self {
        Self { repo, cache }
    }

    fn validate_pattern_fields(source_pattern: &str, target_value: &str) -> ApiResult<()> {
        if source_pattern.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("rule.pattern_empty")));
        }
        if target_value.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("rule.target_empty")));
        }
        Ok(())
    }

    /// 新建规则(成功后失效该规则族快照)
    pub fn create_rule(&self, new_rule: NewPatternRule) -> ApiResult<PatternRule> {
        Self::validate_pattern_fields(&new_rule.source_pattern, &new_rule.target_value)?;

        let created = self.repo.create(&new_rule)?;
        self.cache.invalidate(created.family);
        tracing::info!(
            rule_id = created.id,
            family = %created.family,
            "规则已创建"
        );
        Ok(created)
    }

    /// 更新规则(family 不可变; 成功后失效该规则族快照)
    pub fn update_rule(&self, update: PatternRuleUpdate) -> ApiResult<PatternRule> {
        Self::validate_pattern_fields(&update.source_pattern, &update.target_value)?;

        // 先按 id 取原规则, 确定规则族(更新载荷不携带 family)
        let existing = self.repo.find_by_id(update.id)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args("rule.not_found", &[("id", &update.id.to_string())]))
        })?;

        self.repo.update(&update)?;
        self.cache.invalidate(existing.family);
        tracing::info!(
            rule_id = update.id,
            family = %existing.family,
            "规则已更新"
        );

        self.repo.find_by_id(update.id)?.ok_or_else(|| {
            ApiError::InternalError(t_with_args(
                "rule.reload_failed",
                &[("id", &update.id.to_string())],
            ))
        })
    }

    /// 删除规则(成功后失效该规则族快照)
    pub fn delete_rule(&self, id: i64) -> ApiResult<()> {
        let existing = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| {
                ApiError::NotFound(t_with_args("rule.not_found", &[("id", &id.to_string())]))
            })?;

        self.repo.delete(id)?;
        self.cache.invalidate(existing.family);
        tracing::info!(rule_id = id, family = %existing.family, "规则已删除");
        Ok(())
    }

    /// 列出某规则族的全部规则(含停用, 按求值顺序排列)
    pub fn list_rules(&self, family: RuleFamily) -> ApiResult<Vec<PatternRule>> {
        Ok(self.repo.list_by_family(family)?)
    }

    /// 分类预览: 用当前生效快照对任意文本求值
    pub fn preview_classify(&self, family: RuleFamily, text: &str) -> ApiResult<ClassifyPreview> {
        let snapshot = self.cache.get(family)?;
        Ok(ClassifyPreview {
            family,
            input: text.to_string(),
            result: snapshot.classify(text),
        })
    }

    /// 模式预览: 对未落库的模式做单次匹配测试
    ///
    /// 非法正则与匹配器行为一致: 不报错, 只是不命中。
    pub fn preview_pattern(
        &self,
        kind: PatternKind,
        pattern: &str,
        text: &str,
    ) -> ApiResult<PatternPreview> {
        if pattern.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("rule.pattern_empty")));
        }
        Ok(PatternPreview {
            matched: pattern_matches(kind, pattern, text),
        })
    }
}
