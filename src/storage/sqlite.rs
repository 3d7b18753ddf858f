use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::{
    Board, BoardSummary, ClassificationUpdate, NewSolution, Solution, SurveyUpdate,
};
use crate::storage::Repository;

const SOLUTION_COLUMNS: &str = "id, board_id, name, description, user_role, risk_survey, \
                                survey_details, risk_ai, ai_rationale";

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn: Mutex::new(conn) };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn: Mutex::new(conn) };
        storage.init_db()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("connection lock poisoned".to_string()))
    }

    fn init_db(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS boards (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS solutions (
                id INTEGER PRIMARY KEY,
                board_id INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                user_role TEXT NOT NULL DEFAULT 'Not specified',
                risk_survey TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (risk_survey IN ('Unacceptable', 'High', 'Limited', 'Minimal', 'Pending', 'Error')),
                survey_details TEXT,
                risk_ai TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (risk_ai IN ('Unacceptable', 'High', 'Limited', 'Minimal', 'Pending', 'Error')),
                ai_rationale TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_solutions_board_id ON solutions(board_id);
            "#,
        )?;

        Ok(())
    }

    /// Runs `f` inside one transaction: committed when `f` succeeds, rolled
    /// back when it fails.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn create_board(&self, name: &str) -> Result<Board> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("board name must not be empty".to_string()));
        }

        let created_at = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO boards (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.to_rfc3339()],
        )?;

        Ok(Board {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    pub fn list_boards(&self) -> Result<Vec<BoardSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT b.id, b.name, b.created_at, COUNT(s.id)
            FROM boards b
            LEFT JOIN solutions s ON s.board_id = b.id
            GROUP BY b.id
            ORDER BY b.id
            "#,
        )?;

        let boards = stmt.query_map([], |row| {
            Ok(BoardSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: timestamp_column(row, 2)?,
                solution_count: row.get(3)?,
            })
        })?;

        boards.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn count_boards(&self) -> Result<u32> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM boards", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn require_board(&self, board_id: i64) -> Result<Board> {
        self.get_board(board_id)?
            .ok_or(Error::BoardNotFound(board_id))
    }

    /// Deletes the board and, through the foreign key cascade, its solutions.
    pub fn delete_board(&self, board_id: i64) -> Result<()> {
        let deleted = self.in_transaction(|tx| {
            Ok(tx.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?)
        })?;

        if deleted == 0 {
            return Err(Error::BoardNotFound(board_id));
        }
        tracing::info!("Deleted board {}", board_id);
        Ok(())
    }

    /// Board check, insert and read-back share one transaction, so a board
    /// deleted concurrently reports `BoardNotFound` rather than a FK failure.
    pub fn create_solution(&self, board_id: i64, solution: &NewSolution) -> Result<Solution> {
        self.in_transaction(|tx| {
            let board_exists = tx
                .query_row("SELECT 1 FROM boards WHERE id = ?1", params![board_id], |_| Ok(()))
                .optional()?
                .is_some();
            if !board_exists {
                return Err(Error::BoardNotFound(board_id));
            }

            tx.execute(
                r#"
                INSERT INTO solutions (board_id, name, description, user_role)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    board_id,
                    solution.name,
                    solution.description,
                    solution.user_role.as_str(),
                ],
            )?;
            let id = tx.last_insert_rowid();

            Ok(tx.query_row(
                &format!("SELECT {} FROM solutions WHERE id = ?1", SOLUTION_COLUMNS),
                params![id],
                solution_from_row,
            )?)
        })
    }

    pub fn get_solution(&self, solution_id: i64) -> Result<Option<Solution>> {
        let conn = self.conn()?;
        let solution = conn
            .query_row(
                &format!("SELECT {} FROM solutions WHERE id = ?1", SOLUTION_COLUMNS),
                params![solution_id],
                solution_from_row,
            )
            .optional()?;
        Ok(solution)
    }

    pub fn list_all_solutions(&self) -> Result<Vec<Solution>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM solutions ORDER BY id",
            SOLUTION_COLUMNS
        ))?;
        let solutions = stmt.query_map([], solution_from_row)?;
        solutions.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn delete_solution(&self, solution_id: i64) -> Result<()> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM solutions WHERE id = ?1", params![solution_id])?;

        if deleted == 0 {
            return Err(Error::SolutionNotFound(solution_id));
        }
        Ok(())
    }

    /// Writes only the survey columns, so a concurrent analysis run cannot be
    /// clobbered.
    pub fn update_survey(&self, solution_id: i64, update: &SurveyUpdate) -> Result<Solution> {
        let updated = self.conn()?.execute(
            "UPDATE solutions SET risk_survey = ?1, survey_details = ?2 WHERE id = ?3",
            params![update.risk_survey.as_str(), update.details, solution_id],
        )?;

        if updated == 0 {
            return Err(Error::SolutionNotFound(solution_id));
        }

        self.get_solution(solution_id)?
            .ok_or(Error::SolutionNotFound(solution_id))
    }
}

impl Repository for Storage {
    fn get_board(&self, board_id: i64) -> Result<Option<Board>> {
        let conn = self.conn()?;
        let board = conn
            .query_row(
                "SELECT id, name, created_at FROM boards WHERE id = ?1",
                params![board_id],
                |row| {
                    Ok(Board {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: timestamp_column(row, 2)?,
                    })
                },
            )
            .optional()?;
        Ok(board)
    }

    fn list_solutions(&self, board_id: i64) -> Result<Vec<Solution>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM solutions WHERE board_id = ?1 ORDER BY id",
            SOLUTION_COLUMNS
        ))?;
        let solutions = stmt.query_map(params![board_id], solution_from_row)?;
        solutions.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn commit_classifications(&self, updates: &[ClassificationUpdate]) -> Result<usize> {
        self.in_transaction(|tx| {
            let mut stmt =
                tx.prepare("UPDATE solutions SET risk_ai = ?1, ai_rationale = ?2 WHERE id = ?3")?;
            let mut written = 0;

            for update in updates {
                let changed = stmt.execute(params![
                    update.classification.risk_ai.as_str(),
                    update.classification.rationale,
                    update.solution_id,
                ])?;
                if changed == 0 {
                    tracing::warn!(
                        "Solution {} disappeared before its classification was saved",
                        update.solution_id
                    );
                }
                written += changed;
            }

            Ok(written)
        })
    }
}

fn solution_from_row(row: &Row<'_>) -> rusqlite::Result<Solution> {
    Ok(Solution {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        user_role: parsed_column(row, 4)?,
        risk_survey: parsed_column(row, 5)?,
        survey_details: row.get(6)?,
        risk_ai: parsed_column(row, 7)?,
        ai_rationale: row.get(8)?,
    })
}

fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
