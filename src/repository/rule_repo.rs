// ==========================================
// 运维工单报表系统 - 模式规则仓储
// ==========================================
// 职责: 管理 pattern_rule 表 (规则族 + 优先级排序)
// 约束: 所有查询参数化; Repository 不含匹配逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::rule::{NewPatternRule, PatternRule, PatternRuleUpdate};
use crate::domain::types::{PatternKind, RuleFamily};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct PatternRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PatternRuleRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS pattern_rule (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              family TEXT NOT NULL,
              source_pattern TEXT NOT NULL,
              target_value TEXT NOT NULL,
              pattern_kind TEXT NOT NULL,
              priority INTEGER NOT NULL DEFAULT 0,
              active INTEGER NOT NULL DEFAULT 1,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_pattern_rule_family
              ON pattern_rule(family, active, priority, id);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<PatternRule> {
        let family_raw: String = row.get(1)?;
        let kind_raw: String = row.get(4)?;
        Ok(PatternRule {
            id: row.get(0)?,
            family: RuleFamily::parse(&family_raw).unwrap_or(RuleFamily::BusinessUnit),
            source_pattern: row.get(2)?,
            target_value: row.get(3)?,
            pattern_kind: PatternKind::parse(&kind_raw).unwrap_or(PatternKind::Exact),
            priority: row.get(5)?,
            active: row.get::<_, i64>(6)? != 0,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    const SELECT_COLS: &'static str = "id, family, source_pattern, target_value, pattern_kind, priority, active, created_at, updated_at";

    /// 查询某规则族的全部启用规则
    ///
    /// 排序: (priority 升序, id 升序)，保证分类求值的确定性。
    pub fn find_active(&self, family: RuleFamily) -> RepositoryResult<Vec<PatternRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM pattern_rule WHERE family = ?1 AND active = 1 ORDER BY priority ASC, id ASC",
            Self::SELECT_COLS
        ))?;

        let rows = stmt
            .query_map(params![family.as_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询某规则族的全部规则（含停用，管理界面用）
    pub fn list_by_family(&self, family: RuleFamily) -> RepositoryResult<Vec<PatternRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM pattern_rule WHERE family = ?1 ORDER BY priority ASC, id ASC",
            Self::SELECT_COLS
        ))?;

        let rows = stmt
            .query_map(params![family.as_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 按 ID 查找规则
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PatternRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM pattern_rule WHERE id = ?1",
            Self::SELECT_COLS
        ))?;

        let result = stmt.query_row(params![id], Self::map_row);
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建规则, 返回带存储层分配 ID 的完整实体
    pub fn create(&self, new_rule: &NewPatternRule) -> RepositoryResult<PatternRule> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO pattern_rule (
                family, source_pattern, target_value, pattern_kind, priority, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
            params![
                new_rule.family.as_str(),
                new_rule.source_pattern,
                new_rule.target_value,
                new_rule.pattern_kind.as_str(),
                new_rule.priority,
                new_rule.active as i64,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(PatternRule {
            id,
            family: new_rule.family,
            source_pattern: new_rule.source_pattern.clone(),
            target_value: new_rule.target_value.clone(),
            pattern_kind: new_rule.pattern_kind,
            priority: new_rule.priority,
            active: new_rule.active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// 更新规则（id 与 family 不可变, 刷新 updated_at）
    pub fn update(&self, update: &PatternRuleUpdate) -> RepositoryResult<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE pattern_rule SET
                source_pattern = ?2,
                target_value = ?3,
                pattern_kind = ?4,
                priority = ?5,
                active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                update.id,
                update.source_pattern,
                update.target_value,
                update.pattern_kind.as_str(),
                update.priority,
                update.active as i64,
                now,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PatternRule".to_string(),
                id: update.id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除规则
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM pattern_rule WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PatternRule".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
