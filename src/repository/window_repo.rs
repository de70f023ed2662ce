// ==========================================
// 运维工单报表系统 - 日期窗口仓储
// ==========================================
// 职责: 管理 date_window 表与 window_settings 单例
// 不变量: 每个作用域至多一个活动窗口(激活新窗口与停用旧窗口同一事务)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::{RangeKind, WindowScope};
use crate::domain::window::{DateWindow, NewDateWindow, WindowSettings};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 单例设置行的固定主键
const SETTINGS_ROW_ID: i64 = 1;

pub struct DateWindowRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DateWindowRepository {
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
            CREATE TABLE IF NOT EXISTS date_window (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              from_date TEXT NOT NULL,
              to_date TEXT NOT NULL,
              description TEXT NOT NULL DEFAULT '',
              is_active INTEGER NOT NULL DEFAULT 0,
              range_kind TEXT NOT NULL,
              scope TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_date_window_scope_active
              ON date_window(scope, is_active);

            CREATE TABLE IF NOT EXISTS window_settings (
              id INTEGER PRIMARY KEY CHECK (id = 1),
              global_mode_enabled INTEGER NOT NULL DEFAULT 0,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT OR IGNORE INTO window_settings (id, global_mode_enabled) VALUES (1, 0);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<DateWindow> {
        let from_raw: String = row.get(1)?;
        let to_raw: String = row.get(2)?;
        let kind_raw: String = row.get(5)?;
        let scope_raw: String = row.get(6)?;

        let parse_date = |value: &str, idx: usize| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        };

        Ok(DateWindow {
            id: row.get(0)?,
            from_date: parse_date(&from_raw, 1)?,
            to_date: parse_date(&to_raw, 2)?,
            description: row.get(3)?,
            is_active: row.get::<_, i64>(4)? != 0,
            range_kind: RangeKind::parse(&kind_raw).unwrap_or(RangeKind::Disabled),
            scope: WindowScope::parse(&scope_raw).unwrap_or(WindowScope::Global),
        })
    }

    const SELECT_COLS: &'static str =
        "id, from_date, to_date, description, is_active, range_kind, scope";

    /// 查询某作用域的当前活动窗口
    pub fn get_active_by_scope(&self, scope: WindowScope) -> RepositoryResult<Option<DateWindow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM date_window WHERE scope = ?1 AND is_active = 1 ORDER BY id DESC LIMIT 1",
            Self::SELECT_COLS
        ))?;

        let result = stmt.query_row(params![scope.as_str()], Self::map_row);
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某作用域的全部窗口（含历史, 管理界面用）
    pub fn list_by_scope(&self, scope: WindowScope) -> RepositoryResult<Vec<DateWindow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM date_window WHERE scope = ?1 ORDER BY id DESC",
            Self::SELECT_COLS
        ))?;

        let rows = stmt
            .query_map(params![scope.as_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 保存并激活某作用域的窗口
    ///
    /// 同一事务内: 停用该作用域原活动窗口 → 插入新窗口(is_active=1)。
    /// 保证"每作用域至多一个活动窗口"不变量对并发读者始终成立。
    pub fn save_for_scope(
        &self,
        scope: WindowScope,
        window: &NewDateWindow,
    ) -> RepositoryResult<DateWindow> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "UPDATE date_window SET is_active = 0, updated_at = ?2 WHERE scope = ?1 AND is_active = 1",
            params![scope.as_str(), now],
        )?;

        tx.execute(
            r#"
            INSERT INTO date_window (
                from_date, to_date, description, is_active, range_kind, scope, created_at, updated_at
            ) VALUES (?1, ?2, ?3, 1, ?4, ?5, ?6, ?6)
            "#,
            params![
                window.from_date.format("%Y-%m-%d").to_string(),
                window.to_date.format("%Y-%m-%d").to_string(),
                window.description,
                window.range_kind.as_str(),
                scope.as_str(),
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(DateWindow {
            id,
            from_date: window.from_date,
            to_date: window.to_date,
            description: window.description.clone(),
            is_active: true,
            range_kind: window.range_kind,
            scope,
        })
    }

    /// 读取窗口设置单例
    pub fn get_settings(&self) -> RepositoryResult<WindowSettings> {
        let conn = self.get_conn()?;
        let enabled: i64 = conn.query_row(
            "SELECT global_mode_enabled FROM window_settings WHERE id = ?1",
            params![SETTINGS_ROW_ID],
            |row| row.get(0),
        )?;
        Ok(WindowSettings {
            global_mode_enabled: enabled != 0,
        })
    }

    /// 更新全局模式开关
    pub fn update_global_mode(&self, enabled: bool) -> RepositoryResult<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        conn.execute(
            "UPDATE window_settings SET global_mode_enabled = ?2, updated_at = ?3 WHERE id = ?1",
            params![SETTINGS_ROW_ID, enabled as i64, now],
        )?;
        Ok(())
    }
}
