// ==========================================
// 运维工单报表系统 - 规则集快照缓存
// ==========================================
// 职责: 按规则族惰性构建 RuleSet 快照, 显式失效后重建
// 红线: 换引用而非原地改写, 并发读者绝不读到半更新快照
// ==========================================

use crate::domain::types::RuleFamily;
use crate::engine::rule_set::RuleSet;
use crate::repository::error::RepositoryResult;
use crate::repository::rule_repo::PatternRuleRepository;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 版本化读穿缓存
///
/// - 冷启动/失效后的首次 classify 触发重建
/// - 重建到全新结构后整体换引用 (arena 风格)
/// - 规则增删改必须调用 invalidate()
pub struct RuleSetCache {
    repo: Arc<PatternRuleRepository>,
    snapshots: RwLock<HashMap<RuleFamily, Arc<RuleSet>>>,
    version: AtomicU64,
}

impl RuleSetCache {
    pub fn new(repo: Arc<PatternRuleRepository>) -> Self {
        Self {
            repo,
            snapshots: RwLock::new(HashMap::new()),
            version: AtomicU64::new(1),
        }
    }

    /// 当前缓存版本(每次失效递增)
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    // 快照表仅存可重建数据, 锁中毒直接回收守卫继续使用
    fn read_snapshots(&self) -> RwLockReadGuard<'_, HashMap<RuleFamily, Arc<RuleSet>>> {
        match self.snapshots.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_snapshots(&self) -> RwLockWriteGuard<'_, HashMap<RuleFamily, Arc<RuleSet>>> {
        match self.snapshots.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 获取规则族快照(命中即返回, 未命中则读穿重建)
    pub fn get(&self, family: RuleFamily) -> RepositoryResult<Arc<RuleSet>> {
        {
            let snapshots = self.read_snapshots();
            if let Some(snapshot) = snapshots.get(&family) {
                return Ok(Arc::clone(snapshot));
            }
        }

        // 未命中: 从仓储重建(锁外完成构建, 再换引用)
        let rules = self.repo.find_active(family)?;
        let snapshot = Arc::new(RuleSet::from_rules(
            family,
            rules,
            self.version.load(Ordering::Acquire),
        ));

        let mut snapshots = self.write_snapshots();
        // 并发重建时保留先到者, 两者语义等价(同一版本下规则不变)
        let entry = snapshots
            .entry(family)
            .or_insert_with(|| Arc::clone(&snapshot));
        Ok(Arc::clone(entry))
    }

    /// 失效单个规则族
    pub fn invalidate(&self, family: RuleFamily) {
        self.version.fetch_add(1, Ordering::AcqRel);
        self.write_snapshots().remove(&family);
        tracing::debug!(family = %family, "规则集快照已失效");
    }

    /// 失效全部规则族
    pub fn invalidate_all(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
        self.write_snapshots().clear();
        tracing::debug!("全部规则集快照已失效");
    }
}
