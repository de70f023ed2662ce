// ==========================================
// 运维工单报表系统 - 工单记录仓储
// ==========================================
// 职责: 管理 ticket_record 表
// 红线: replace_all 为单事务整体替换(drop + insert), 失败必须回滚
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::ticket::TicketRecord;
use crate::domain::types::WindowScope;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct TicketRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TicketRecordRepository {
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
            CREATE TABLE IF NOT EXISTS ticket_record (
              request_id TEXT NOT NULL,
              report_scope TEXT NOT NULL,
              subject TEXT,
              technician TEXT,
              application TEXT,
              raw_status TEXT NOT NULL,
              canonical_status TEXT NOT NULL,
              level TEXT,
              business_unit TEXT NOT NULL,
              created_time TEXT NOT NULL,
              in_date_range INTEGER NOT NULL DEFAULT 0,
              linked_count INTEGER NOT NULL DEFAULT 0,
              status_locked INTEGER NOT NULL DEFAULT 0,
              import_batch_id TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (request_id, report_scope)
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_record_scope
              ON ticket_record(report_scope);
            CREATE INDEX IF NOT EXISTS idx_ticket_record_locked
              ON ticket_record(report_scope, status_locked);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<TicketRecord> {
        let scope_raw: String = row.get(1)?;
        Ok(TicketRecord {
            request_id: row.get(0)?,
            report_scope: WindowScope::parse(&scope_raw).unwrap_or(WindowScope::Monthly),
            subject: row.get(2)?,
            technician: row.get(3)?,
            application: row.get(4)?,
            raw_status: row.get(5)?,
            canonical_status: row.get(6)?,
            level: row.get(7)?,
            business_unit: row.get(8)?,
            created_time: row.get(9)?,
            in_date_range: row.get::<_, i64>(10)? != 0,
            linked_count: row.get(11)?,
            status_locked: row.get::<_, i64>(12)? != 0,
            import_batch_id: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    const SELECT_COLS: &'static str = "request_id, report_scope, subject, technician, application, raw_status, canonical_status, level, business_unit, created_time, in_date_range, linked_count, status_locked, import_batch_id, created_at, updated_at";

    /// 整体替换某作用域的工单集合
    ///
    /// 单事务: 删除该作用域全部记录 → 批量插入新记录。
    /// 事务失败回滚, 并发读者不会观察到半替换状态。
    pub fn replace_all(
        &self,
        scope: WindowScope,
        records: &[TicketRecord],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM ticket_record WHERE report_scope = ?1",
            params![scope.as_str()],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO ticket_record (
                    request_id, report_scope, subject, technician, application,
                    raw_status, canonical_status, level, business_unit, created_time,
                    in_date_range, linked_count, status_locked, import_batch_id,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.request_id,
                    record.report_scope.as_str(),
                    record.subject,
                    record.technician,
                    record.application,
                    record.raw_status,
                    record.canonical_status,
                    record.level,
                    record.business_unit,
                    record.created_time,
                    record.in_date_range as i64,
                    record.linked_count,
                    record.status_locked as i64,
                    record.import_batch_id,
                    record.created_at,
                    record.updated_at,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(records.len())
    }

    /// 按工单号查找(跨作用域, 自然键实际全局唯一, 取首条)
    pub fn find_by_request_id(&self, request_id: &str) -> RepositoryResult<Option<TicketRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ticket_record WHERE request_id = ?1 ORDER BY report_scope LIMIT 1",
            Self::SELECT_COLS
        ))?;

        let result = stmt.query_row(params![request_id], Self::map_row);
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出某作用域的全部记录
    pub fn list_by_scope(&self, scope: WindowScope) -> RepositoryResult<Vec<TicketRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ticket_record WHERE report_scope = ?1 ORDER BY request_id ASC",
            Self::SELECT_COLS
        ))?;

        let rows = stmt
            .query_map(params![scope.as_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 人工覆写状态并置位状态锁
    ///
    /// 仅持久化动作; 资格校验(状态值/锁)由 API 层完成。
    pub fn update_status_locked(&self, request_id: &str, new_status: &str) -> RepositoryResult<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE ticket_record SET
                canonical_status = ?2,
                status_locked = 1,
                updated_at = ?3
            WHERE request_id = ?1
            "#,
            params![request_id, new_status, now],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TicketRecord".to_string(),
                id: request_id.to_string(),
            });
        }
        Ok(())
    }

    /// 读取某作用域已锁定记录的 request_id → canonical_status 映射
    ///
    /// 派生流水线在替换前查询该映射, 保证人工覆写跨重处理存活。
    pub fn locked_status_map(&self, scope: WindowScope) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT request_id, canonical_status FROM ticket_record WHERE report_scope = ?1 AND status_locked = 1",
        )?;

        let rows = stmt
            .query_map(params![scope.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows.into_iter().collect())
    }
}
