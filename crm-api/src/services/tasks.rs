use super::contacts::resolve_name;
use super::{ensure_contact, new_id, now, ServiceError, ServiceResult};
use crate::storage::CrmStore;
use chrono::NaiveDate;
use shared_types::{Task, TaskInput, TaskStatusFilter, TaskWithContact};

fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
}

/// Tasks matching `filter`, earliest due date first
pub async fn list_tasks(store: &dyn CrmStore, filter: TaskStatusFilter) -> ServiceResult<Vec<Task>> {
    let mut tasks: Vec<_> = store
        .list_tasks()
        .await?
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    sort_by_due_date(&mut tasks);
    Ok(tasks)
}

pub async fn get_task(store: &dyn CrmStore, id: &str) -> ServiceResult<Task> {
    store
        .get_task(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Task", id))
}

pub async fn tasks_by_contact(store: &dyn CrmStore, contact_id: &str) -> ServiceResult<Vec<Task>> {
    let mut tasks: Vec<_> = store
        .list_tasks()
        .await?
        .into_iter()
        .filter(|t| t.contact_id.as_deref() == Some(contact_id))
        .collect();
    sort_by_due_date(&mut tasks);
    Ok(tasks)
}

/// Pending tasks due on `date`, in creation order
pub async fn tasks_due_on(store: &dyn CrmStore, date: NaiveDate) -> ServiceResult<Vec<Task>> {
    Ok(store
        .list_tasks()
        .await?
        .into_iter()
        .filter(|t| t.due_date == date && !t.completed)
        .collect())
}

/// Pending tasks due on the current UTC date
pub async fn tasks_due_today(store: &dyn CrmStore) -> ServiceResult<Vec<Task>> {
    tasks_due_on(store, chrono::Utc::now().date_naive()).await
}

/// Attaches contact names; general tasks and dangling links get `None`
pub async fn with_contact_names(
    store: &dyn CrmStore,
    tasks: Vec<Task>,
) -> ServiceResult<Vec<TaskWithContact>> {
    let contacts = store.list_contacts().await?;
    Ok(tasks
        .into_iter()
        .map(|task| {
            let contact_name = resolve_name(&contacts, task.contact_id.as_deref());
            TaskWithContact { task, contact_name }
        })
        .collect())
}

pub async fn create_task(store: &dyn CrmStore, input: TaskInput) -> ServiceResult<Task> {
    if let Some(contact_id) = &input.contact_id {
        ensure_contact(store, contact_id).await?;
    }

    let now = now();
    let task = Task {
        id: new_id(),
        title: input.title,
        due_date: input.due_date,
        completed: input.completed,
        contact_id: input.contact_id,
        created_at: now,
        updated_at: now,
    };

    store.insert_task(&task).await?;
    tracing::info!("Created task {} due {}", task.id, task.due_date);

    Ok(task)
}

pub async fn update_task(store: &dyn CrmStore, id: &str, input: TaskInput) -> ServiceResult<Task> {
    let existing = get_task(store, id).await?;
    if let Some(contact_id) = &input.contact_id {
        ensure_contact(store, contact_id).await?;
    }

    let task = Task {
        id: existing.id,
        title: input.title,
        due_date: input.due_date,
        completed: input.completed,
        contact_id: input.contact_id,
        created_at: existing.created_at,
        updated_at: now(),
    };

    if !store.update_task(&task).await? {
        return Err(ServiceError::not_found("Task", id));
    }

    Ok(task)
}

/// Flips the completion flag, leaving every other field as it was
pub async fn toggle_task(store: &dyn CrmStore, id: &str) -> ServiceResult<Task> {
    let mut task = get_task(store, id).await?;
    task.completed = !task.completed;
    task.updated_at = now();

    if !store.update_task(&task).await? {
        return Err(ServiceError::not_found("Task", id));
    }

    tracing::info!("Task {} marked completed={}", task.id, task.completed);
    Ok(task)
}

pub async fn delete_task(store: &dyn CrmStore, id: &str) -> ServiceResult<()> {
    if !store.delete_task(id).await? {
        return Err(ServiceError::not_found("Task", id));
    }
    tracing::info!("Deleted task {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::contacts::{create_contact, delete_contact};
    use crate::services::test_support::{json_store, sqlite_store};
    use shared_types::ContactInput;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn input(title: &str, due: NaiveDate, completed: bool) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            due_date: due,
            completed,
            contact_id: None,
        }
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_flag() {
        let (_dir, store) = json_store();
        let task = create_task(&store, input("Send proposal", day(20), false))
            .await
            .unwrap();

        let once = toggle_task(&store, &task.id).await.unwrap();
        assert!(once.completed);

        let twice = toggle_task(&store, &task.id).await.unwrap();
        assert_eq!(twice.completed, task.completed);
        assert_eq!(twice.title, task.title);
        assert_eq!(twice.due_date, task.due_date);
        assert_eq!(twice.contact_id, task.contact_id);
        assert_eq!(get_task(&store, &task.id).await.unwrap(), twice);
    }

    #[tokio::test]
    async fn test_toggle_unknown_task() {
        let (_dir, store) = sqlite_store();
        assert!(matches!(
            toggle_task(&store, "missing").await,
            Err(ServiceError::NotFound { entity: "Task", .. })
        ));
    }

    #[tokio::test]
    async fn test_due_on_excludes_completed_and_other_days() {
        let (_dir, store) = sqlite_store();
        let due = create_task(&store, input("Call", day(19), false)).await.unwrap();
        create_task(&store, input("Done already", day(19), true)).await.unwrap();
        create_task(&store, input("Tomorrow", day(20), false)).await.unwrap();

        let today = tasks_due_on(&store, day(19)).await.unwrap();
        assert_eq!(today, vec![due]);
    }

    #[tokio::test]
    async fn test_due_today_uses_current_date() {
        let (_dir, store) = json_store();
        let today = chrono::Utc::now().date_naive();
        let due = create_task(&store, input("Today", today, false)).await.unwrap();
        create_task(&store, input("Later", today.succ_opt().unwrap(), false))
            .await
            .unwrap();

        assert_eq!(tasks_due_today(&store).await.unwrap(), vec![due]);
    }

    #[tokio::test]
    async fn test_status_filter_and_due_ordering() {
        let (_dir, store) = json_store();
        create_task(&store, input("c", day(30), false)).await.unwrap();
        create_task(&store, input("a", day(2), true)).await.unwrap();
        create_task(&store, input("b", day(15), false)).await.unwrap();

        let titles = |tasks: Vec<Task>| tasks.into_iter().map(|t| t.title).collect::<Vec<_>>();

        assert_eq!(
            titles(list_tasks(&store, TaskStatusFilter::All).await.unwrap()),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            titles(list_tasks(&store, TaskStatusFilter::Pending).await.unwrap()),
            vec!["b", "c"]
        );
        assert_eq!(
            titles(list_tasks(&store, TaskStatusFilter::Completed).await.unwrap()),
            vec!["a"]
        );
    }

    #[tokio::test]
    async fn test_contact_names_resolved() {
        let (_dir, store) = json_store();
        let ana = create_contact(
            &store,
            ContactInput {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
                ..ContactInput::default()
            },
        )
        .await
        .unwrap();

        let mut linked = input("Linked", day(1), false);
        linked.contact_id = Some(ana.id.clone());
        let linked = create_task(&store, linked).await.unwrap();
        let general = create_task(&store, input("General", day(1), false)).await.unwrap();

        let named = with_contact_names(&store, vec![linked, general]).await.unwrap();
        assert_eq!(named[0].contact_name.as_deref(), Some("Ana"));
        assert_eq!(named[1].contact_name, None);

        delete_contact(&store, &ana.id).await.unwrap();
        assert!(tasks_by_contact(&store, &ana.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_contact_rejected() {
        let (_dir, store) = sqlite_store();
        let mut linked = input("Orphan", day(1), false);
        linked.contact_id = Some("ghost".to_string());

        assert!(matches!(
            create_task(&store, linked).await,
            Err(ServiceError::UnknownContact(_))
        ));
    }
}
