// ==========================================
// 运维工单报表系统 - 工单关联仓储
// ==========================================
// 职责: 管理 ticket_link 表 (父子关联, 仅批量替换)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::link::TicketLink;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct TicketLinkRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TicketLinkRepository {
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
            CREATE TABLE IF NOT EXISTS ticket_link (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              parent_request_id TEXT NOT NULL,
              child_request_id TEXT NOT NULL,
              parent_hyperlink TEXT,
              child_hyperlink TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_link_child
              ON ticket_link(child_request_id);
            CREATE INDEX IF NOT EXISTS idx_ticket_link_parent
              ON ticket_link(parent_request_id);
            "#,
        )?;
        Ok(())
    }

    /// 读取全部关联(保持插入顺序)
    pub fn get_all(&self) -> RepositoryResult<Vec<TicketLink>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT parent_request_id, child_request_id, parent_hyperlink, child_hyperlink
             FROM ticket_link ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TicketLink {
                    parent_request_id: row.get(0)?,
                    child_request_id: row.get(1)?,
                    parent_hyperlink: row.get(2)?,
                    child_hyperlink: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 整体替换关联集合(单事务 drop + insert)
    pub fn replace_all(&self, links: &[TicketLink]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM ticket_link", [])?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO ticket_link (
                    parent_request_id, child_request_id, parent_hyperlink, child_hyperlink
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;

            for link in links {
                stmt.execute(params![
                    link.parent_request_id,
                    link.child_request_id,
                    link.parent_hyperlink,
                    link.child_hyperlink,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(links.len())
    }
}
