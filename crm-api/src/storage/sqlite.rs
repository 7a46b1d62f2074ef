use super::{migrations, ContactDeletion, CrmStore};
use anyhow::Result;
use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{Contact, Deal, DealStage, Interaction, Task};
use std::path::Path;
use std::time::Duration;

const CONTACT_COLUMNS: &str = "id, name, email, phone, city, company, position, plan,
    payment_day, notes, created_at, updated_at";
const INTERACTION_COLUMNS: &str = "id, contact_id, kind, date, notes, created_at";
const TASK_COLUMNS: &str = "id, title, due_date, completed, contact_id, created_at, updated_at";
const DEAL_COLUMNS: &str = "id, name, value, contact_id, stage, created_at, updated_at";

/// Relational store. Every row carries the owner id the store was opened
/// with and every query is scoped to it.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    owner_id: String,
}

impl SqliteStore {
    pub fn open(db_path: &Path, owner_id: impl Into<String>) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Migrate on a plain connection before the pool hands any out
        {
            let conn = Connection::open(db_path)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            migrations::run_migrations(&conn)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Self {
            pool,
            owner_id: owner_id.into(),
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| anyhow::anyhow!("Failed to get DB connection from pool: {}", e))
    }

    fn list_rows<T>(
        &self,
        table: &str,
        columns: &str,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM {table} WHERE owner_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt
            .query_map([&self.owner_id], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_row<T>(
        &self,
        table: &str,
        columns: &str,
        id: &str,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {columns} FROM {table} WHERE id = ?1 AND owner_id = ?2"),
                params![id, &self.owner_id],
                map,
            )
            .optional()?;
        Ok(row)
    }

    fn delete_by_id(&self, table: &str, id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            &format!("DELETE FROM {table} WHERE id = ?1 AND owner_id = ?2"),
            params![id, &self.owner_id],
        )?;
        Ok(deleted)
    }
}

fn map_contact(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        city: row.get(4)?,
        company: row.get(5)?,
        position: row.get(6)?,
        plan: row.get(7)?,
        payment_day: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn map_interaction(row: &Row) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        kind: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        due_date: row.get(2)?,
        completed: row.get(3)?,
        contact_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_deal(row: &Row) -> rusqlite::Result<Deal> {
    let stage: String = row.get(4)?;
    let stage = stage
        .parse::<DealStage>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Deal {
        id: row.get(0)?,
        name: row.get(1)?,
        value: row.get(2)?,
        contact_id: row.get(3)?,
        stage,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[async_trait]
impl CrmStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.list_rows("contacts", CONTACT_COLUMNS, map_contact)
    }

    async fn get_contact(&self, id: &str) -> Result<Option<Contact>> {
        self.get_row("contacts", CONTACT_COLUMNS, id, map_contact)
    }

    async fn insert_contact(&self, contact: &Contact) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO contacts
             (id, owner_id, name, email, phone, city, company, position, plan,
              payment_day, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &contact.id,
                &self.owner_id,
                &contact.name,
                &contact.email,
                contact.phone.as_ref(),
                contact.city.as_ref(),
                contact.company.as_ref(),
                contact.position.as_ref(),
                contact.plan.as_ref(),
                contact.payment_day,
                contact.notes.as_ref(),
                contact.created_at,
                contact.updated_at,
            ],
        )?;
        Ok(())
    }

    async fn update_contact(&self, contact: &Contact) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE contacts
             SET name = ?1, email = ?2, phone = ?3, city = ?4, company = ?5, position = ?6,
                 plan = ?7, payment_day = ?8, notes = ?9, updated_at = ?10
             WHERE id = ?11 AND owner_id = ?12",
            params![
                &contact.name,
                &contact.email,
                contact.phone.as_ref(),
                contact.city.as_ref(),
                contact.company.as_ref(),
                contact.position.as_ref(),
                contact.plan.as_ref(),
                contact.payment_day,
                contact.notes.as_ref(),
                contact.updated_at,
                &contact.id,
                &self.owner_id,
            ],
        )?;
        Ok(changed > 0)
    }

    async fn delete_contact_cascade(&self, id: &str) -> Result<Option<ContactDeletion>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let interactions = tx.execute(
            "DELETE FROM interactions WHERE contact_id = ?1 AND owner_id = ?2",
            params![id, &self.owner_id],
        )?;
        let tasks = tx.execute(
            "DELETE FROM tasks WHERE contact_id = ?1 AND owner_id = ?2",
            params![id, &self.owner_id],
        )?;
        let contacts = tx.execute(
            "DELETE FROM contacts WHERE id = ?1 AND owner_id = ?2",
            params![id, &self.owner_id],
        )?;

        // Dropping the transaction rolls it back
        if contacts == 0 {
            return Ok(None);
        }

        tx.commit()?;
        Ok(Some(ContactDeletion {
            interactions,
            tasks,
        }))
    }

    async fn list_interactions(&self) -> Result<Vec<Interaction>> {
        self.list_rows("interactions", INTERACTION_COLUMNS, map_interaction)
    }

    async fn get_interaction(&self, id: &str) -> Result<Option<Interaction>> {
        self.get_row("interactions", INTERACTION_COLUMNS, id, map_interaction)
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO interactions (id, owner_id, contact_id, kind, date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &interaction.id,
                &self.owner_id,
                &interaction.contact_id,
                &interaction.kind,
                interaction.date,
                &interaction.notes,
                interaction.created_at,
            ],
        )?;
        Ok(())
    }

    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE interactions SET contact_id = ?1, kind = ?2, date = ?3, notes = ?4
             WHERE id = ?5 AND owner_id = ?6",
            params![
                &interaction.contact_id,
                &interaction.kind,
                interaction.date,
                &interaction.notes,
                &interaction.id,
                &self.owner_id,
            ],
        )?;
        Ok(changed > 0)
    }

    async fn delete_interaction(&self, id: &str) -> Result<bool> {
        Ok(self.delete_by_id("interactions", id)? > 0)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.list_rows("tasks", TASK_COLUMNS, map_task)
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.get_row("tasks", TASK_COLUMNS, id, map_task)
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks
             (id, owner_id, title, due_date, completed, contact_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &task.id,
                &self.owner_id,
                &task.title,
                task.due_date,
                task.completed,
                task.contact_id.as_ref(),
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE tasks
             SET title = ?1, due_date = ?2, completed = ?3, contact_id = ?4, updated_at = ?5
             WHERE id = ?6 AND owner_id = ?7",
            params![
                &task.title,
                task.due_date,
                task.completed,
                task.contact_id.as_ref(),
                task.updated_at,
                &task.id,
                &self.owner_id,
            ],
        )?;
        Ok(changed > 0)
    }

    async fn delete_task(&self, id: &str) -> Result<bool> {
        Ok(self.delete_by_id("tasks", id)? > 0)
    }

    async fn list_deals(&self) -> Result<Vec<Deal>> {
        self.list_rows("deals", DEAL_COLUMNS, map_deal)
    }

    async fn get_deal(&self, id: &str) -> Result<Option<Deal>> {
        self.get_row("deals", DEAL_COLUMNS, id, map_deal)
    }

    async fn insert_deal(&self, deal: &Deal) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO deals
             (id, owner_id, name, value, contact_id, stage, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &deal.id,
                &self.owner_id,
                &deal.name,
                deal.value,
                deal.contact_id.as_ref(),
                deal.stage.as_str(),
                deal.created_at,
                deal.updated_at,
            ],
        )?;
        Ok(())
    }

    async fn update_deal(&self, deal: &Deal) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE deals
             SET name = ?1, value = ?2, contact_id = ?3, stage = ?4, updated_at = ?5
             WHERE id = ?6 AND owner_id = ?7",
            params![
                &deal.name,
                deal.value,
                deal.contact_id.as_ref(),
                deal.stage.as_str(),
                deal.updated_at,
                &deal.id,
                &self.owner_id,
            ],
        )?;
        Ok(changed > 0)
    }

    async fn delete_deal(&self, id: &str) -> Result<bool> {
        Ok(self.delete_by_id("deals", id)? > 0)
    }
}
