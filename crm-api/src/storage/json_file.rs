use super::{ContactDeletion, CrmStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{Contact, Deal, Interaction, Task};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub const CONTACTS: &str = "contacts";
pub const INTERACTIONS: &str = "interactions";
pub const TASKS: &str = "tasks";
pub const DEALS: &str = "deals";

trait Record {
    fn id(&self) -> &str;

    /// Contact that must exist for this record to be stored
    fn required_contact(&self) -> Option<&str> {
        None
    }
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Interaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn required_contact(&self) -> Option<&str> {
        Some(&self.contact_id)
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn required_contact(&self) -> Option<&str> {
        self.contact_id.as_deref()
    }
}

impl Record for Deal {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Local store keeping each collection as a JSON array in
/// `<dir>/<collection>.json`.
///
/// Every operation reads the whole collection, and mutations write it back
/// through a temp file that is renamed over the old one. The mutex serializes
/// read-modify-write cycles inside this process.
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        let store = Self {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
        };

        for name in [CONTACTS, INTERACTIONS, TASKS, DEALS] {
            if !store.collection_path(name).exists() {
                store.save::<Contact>(name, &[])?;
            }
        }

        Ok(store)
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).with_context(|| format!("Corrupt collection {}", path.display()))
    }

    fn save<T: Serialize>(&self, name: &str, records: &[T]) -> Result<()> {
        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, records)?;
        file.write_all(b"\n")?;
        file.persist(self.collection_path(name))
            .map_err(|e| anyhow::anyhow!("Failed to write collection {}: {}", name, e))?;
        Ok(())
    }

    /// Must be called with the lock held
    fn check_contact<T: Record>(&self, record: &T) -> Result<()> {
        let Some(contact_id) = record.required_contact() else {
            return Ok(());
        };
        let contacts: Vec<Contact> = self.load(CONTACTS)?;
        if !contacts.iter().any(|c| c.id == contact_id) {
            anyhow::bail!("Contact {} does not exist", contact_id);
        }
        Ok(())
    }

    async fn get_one<T>(&self, name: &str, id: &str) -> Result<Option<T>>
    where
        T: Record + DeserializeOwned,
    {
        let _guard = self.lock.lock().await;
        let records: Vec<T> = self.load(name)?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn list_all<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.load(name)
    }

    async fn push<T>(&self, name: &str, record: &T) -> Result<()>
    where
        T: Record + Serialize + DeserializeOwned + Clone,
    {
        let _guard = self.lock.lock().await;
        let mut records: Vec<T> = self.load(name)?;
        if records.iter().any(|r| r.id() == record.id()) {
            anyhow::bail!("Duplicate id {} in {}", record.id(), name);
        }
        self.check_contact(record)?;
        records.push(record.clone());
        self.save(name, &records)
    }

    async fn replace<T>(&self, name: &str, record: &T) -> Result<bool>
    where
        T: Record + Serialize + DeserializeOwned + Clone,
    {
        let _guard = self.lock.lock().await;
        let mut records: Vec<T> = self.load(name)?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Ok(false);
        };
        self.check_contact(record)?;
        *slot = record.clone();
        self.save(name, &records)?;
        Ok(true)
    }

    async fn remove_where<T, F>(&self, name: &str, pred: F) -> Result<usize>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> bool + Send,
    {
        let _guard = self.lock.lock().await;
        let records: Vec<T> = self.load(name)?;
        let before = records.len();
        let kept: Vec<T> = records.into_iter().filter(|r| !pred(r)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.save(name, &kept)?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl CrmStore for JsonFileStore {
    async fn ping(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        if !self.dir.is_dir() {
            anyhow::bail!("Data directory {} is missing", self.dir.display());
        }
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.list_all(CONTACTS).await
    }

    async fn get_contact(&self, id: &str) -> Result<Option<Contact>> {
        self.get_one(CONTACTS, id).await
    }

    async fn insert_contact(&self, contact: &Contact) -> Result<()> {
        self.push(CONTACTS, contact).await
    }

    async fn update_contact(&self, contact: &Contact) -> Result<bool> {
        self.replace(CONTACTS, contact).await
    }

    /// Children are written before the contact, so a failed write leaves the
    /// contact in place and the delete can be repeated.
    async fn delete_contact_cascade(&self, id: &str) -> Result<Option<ContactDeletion>> {
        let _guard = self.lock.lock().await;

        let mut contacts: Vec<Contact> = self.load(CONTACTS)?;
        let Some(pos) = contacts.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let interactions: Vec<Interaction> = self.load(INTERACTIONS)?;
        let before = interactions.len();
        let interactions: Vec<_> = interactions.into_iter().filter(|i| i.contact_id != id).collect();
        let interactions_removed = before - interactions.len();

        let tasks: Vec<Task> = self.load(TASKS)?;
        let before = tasks.len();
        let tasks: Vec<_> = tasks
            .into_iter()
            .filter(|t| t.contact_id.as_deref() != Some(id))
            .collect();
        let tasks_removed = before - tasks.len();

        if interactions_removed > 0 {
            self.save(INTERACTIONS, &interactions)?;
        }
        if tasks_removed > 0 {
            self.save(TASKS, &tasks)?;
        }

        contacts.remove(pos);
        self.save(CONTACTS, &contacts)?;

        Ok(Some(ContactDeletion {
            interactions: interactions_removed,
            tasks: tasks_removed,
        }))
    }

    async fn list_interactions(&self) -> Result<Vec<Interaction>> {
        self.list_all(INTERACTIONS).await
    }

    async fn get_interaction(&self, id: &str) -> Result<Option<Interaction>> {
        self.get_one(INTERACTIONS, id).await
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.push(INTERACTIONS, interaction).await
    }

    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool> {
        self.replace(INTERACTIONS, interaction).await
    }

    async fn delete_interaction(&self, id: &str) -> Result<bool> {
        Ok(self.remove_where(INTERACTIONS, |i: &Interaction| i.id == id).await? > 0)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.list_all(TASKS).await
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.get_one(TASKS, id).await
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        self.push(TASKS, task).await
    }

    async fn update_task(&self, task: &Task) -> Result<bool> {
        self.replace(TASKS, task).await
    }

    async fn delete_task(&self, id: &str) -> Result<bool> {
        Ok(self.remove_where(TASKS, |t: &Task| t.id == id).await? > 0)
    }

    async fn list_deals(&self) -> Result<Vec<Deal>> {
        self.list_all(DEALS).await
    }

    async fn get_deal(&self, id: &str) -> Result<Option<Deal>> {
        self.get_one(DEALS, id).await
    }

    async fn insert_deal(&self, deal: &Deal) -> Result<()> {
        self.push(DEALS, deal).await
    }

    async fn update_deal(&self, deal: &Deal) -> Result<bool> {
        self.replace(DEALS, deal).await
    }

    async fn delete_deal(&self, id: &str) -> Result<bool> {
        Ok(self.remove_where(DEALS, |d: &Deal| d.id == id).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::DealStage;

    fn task(id: &str, contact_id: Option<&str>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            completed: false,
            contact_id: contact_id.map(str::to_string),
            created_at: 10,
            updated_at: 10,
        }
    }

    #[test]
    fn test_open_initializes_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::open(dir.path()).unwrap();

        for name in [CONTACTS, INTERACTIONS, TASKS, DEALS] {
            let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", name))).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(parsed, serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.insert_task(&task("t1", None)).await.unwrap();
        }

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.list_tasks().await.unwrap(), vec![task("t1", None)]);
    }

    #[tokio::test]
    async fn test_replace_unknown_id_leaves_collection_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.insert_task(&task("t1", None)).await.unwrap();

        let mut ghost = task("t2", None);
        ghost.title = "Ghost".to_string();
        assert!(!store.update_task(&ghost).await.unwrap());
        assert_eq!(store.list_tasks().await.unwrap(), vec![task("t1", None)]);
    }

    fn contact(id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: format!("Contact {}", id),
            email: format!("{}@x.com", id),
            phone: None,
            city: None,
            company: None,
            position: None,
            plan: None,
            payment_day: None,
            notes: None,
            created_at: 10,
            updated_at: 10,
        }
    }

    fn interaction(id: &str, contact_id: &str) -> Interaction {
        Interaction {
            id: id.to_string(),
            contact_id: contact_id.to_string(),
            kind: "call".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            notes: String::new(),
            created_at: 10,
        }
    }

    #[tokio::test]
    async fn test_cascade_removes_only_linked_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.insert_contact(&contact("c1")).await.unwrap();
        store.insert_contact(&contact("c2")).await.unwrap();
        store.insert_task(&task("t1", Some("c1"))).await.unwrap();
        store.insert_task(&task("t2", None)).await.unwrap();
        store.insert_task(&task("t3", Some("c2"))).await.unwrap();
        store.insert_interaction(&interaction("i1", "c1")).await.unwrap();
        store.insert_interaction(&interaction("i2", "c2")).await.unwrap();

        let removed = store.delete_contact_cascade("c1").await.unwrap();
        assert_eq!(
            removed,
            Some(ContactDeletion {
                interactions: 1,
                tasks: 1
            })
        );

        let task_ids: Vec<_> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(task_ids, vec!["t2", "t3"]);
        assert_eq!(store.list_interactions().await.unwrap(), vec![interaction("i2", "c2")]);
        assert_eq!(store.list_contacts().await.unwrap(), vec![contact("c2")]);

        assert_eq!(store.delete_contact_cascade("c1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_children_need_an_existing_contact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.insert_contact(&contact("c1")).await.unwrap();
        store.insert_interaction(&interaction("i1", "c1")).await.unwrap();
        store.delete_contact_cascade("c1").await.unwrap();

        // A writer that checked the contact before the delete cannot leave an orphan
        assert!(store.insert_interaction(&interaction("i2", "c1")).await.is_err());
        assert!(store.insert_task(&task("t1", Some("c1"))).await.is_err());
        assert!(store.list_interactions().await.unwrap().is_empty());
        assert!(store.list_tasks().await.unwrap().is_empty());

        store.insert_task(&task("t2", None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let deal = Deal {
            id: "d1".to_string(),
            name: "Renewal".to_string(),
            value: 10.0,
            contact_id: None,
            stage: DealStage::Lead,
            created_at: 0,
            updated_at: 0,
        };

        store.insert_deal(&deal).await.unwrap();
        assert!(store.insert_deal(&deal).await.is_err());
        assert_eq!(store.list_deals().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("contacts.json"), "{not json").unwrap();

        assert!(store.list_contacts().await.is_err());
    }
}
