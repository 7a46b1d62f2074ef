use super::{deals, interactions, new_id, now, tasks, ServiceError, ServiceResult};
use crate::storage::CrmStore;
use shared_types::{Contact, ContactInput, ContactOption, ContactOverview};

pub use crate::storage::ContactDeletion;

pub async fn list_contacts(store: &dyn CrmStore) -> ServiceResult<Vec<Contact>> {
    Ok(store.list_contacts().await?)
}

pub async fn get_contact(store: &dyn CrmStore, id: &str) -> ServiceResult<Contact> {
    store
        .get_contact(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Contact", id))
}

pub async fn create_contact(store: &dyn CrmStore, input: ContactInput) -> ServiceResult<Contact> {
    let now = now();
    let contact = Contact {
        id: new_id(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        city: input.city,
        company: input.company,
        position: input.position,
        plan: input.plan,
        payment_day: input.payment_day,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };

    store.insert_contact(&contact).await?;
    tracing::info!("Created contact {}", contact.id);

    Ok(contact)
}

pub async fn update_contact(
    store: &dyn CrmStore,
    id: &str,
    input: ContactInput,
) -> ServiceResult<Contact> {
    let existing = get_contact(store, id).await?;

    let contact = Contact {
        id: existing.id,
        name: input.name,
        email: input.email,
        phone: input.phone,
        city: input.city,
        company: input.company,
        position: input.position,
        plan: input.plan,
        payment_day: input.payment_day,
        notes: input.notes,
        created_at: existing.created_at,
        updated_at: now(),
    };

    if !store.update_contact(&contact).await? {
        return Err(ServiceError::not_found("Contact", id));
    }

    Ok(contact)
}

/// Deletes the contact with its interactions and tasks. Deals stay; their
/// contact no longer resolves.
pub async fn delete_contact(store: &dyn CrmStore, id: &str) -> ServiceResult<ContactDeletion> {
    let removed = store
        .delete_contact_cascade(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Contact", id))?;

    tracing::info!(
        "Deleted contact {} with {} interactions and {} tasks",
        id,
        removed.interactions,
        removed.tasks
    );

    Ok(removed)
}

/// Newest contacts first; ties on creation time go to the later insert
pub async fn recent_contacts(store: &dyn CrmStore, limit: usize) -> ServiceResult<Vec<Contact>> {
    let mut contacts = store.list_contacts().await?;
    contacts.reverse();
    contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    contacts.truncate(limit);
    Ok(contacts)
}

pub async fn contact_options(store: &dyn CrmStore) -> ServiceResult<Vec<ContactOption>> {
    let contacts = store.list_contacts().await?;
    Ok(contacts
        .into_iter()
        .map(|c| ContactOption {
            value: c.id,
            text: c.name,
        })
        .collect())
}

pub async fn contact_overview(store: &dyn CrmStore, id: &str) -> ServiceResult<ContactOverview> {
    let contact = get_contact(store, id).await?;
    let interactions = interactions::interactions_by_contact(store, id).await?;
    let tasks = tasks::tasks_by_contact(store, id).await?;
    let deals = deals::deals_by_contact(store, id).await?;

    Ok(ContactOverview {
        contact,
        interactions,
        tasks,
        deals,
    })
}

/// Name of the contact `contact_id` points at, if it still exists
pub(crate) fn resolve_name(contacts: &[Contact], contact_id: Option<&str>) -> Option<String> {
    let id = contact_id?;
    contacts.iter().find(|c| c.id == id).map(|c| c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{json_store, sqlite_store};
    use chrono::NaiveDate;
    use shared_types::{DealInput, DealStage, InteractionInput, TaskInput};

    fn ana_input() -> ContactInput {
        ContactInput {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone: Some("+351 912 000 000".to_string()),
            city: Some("Porto".to_string()),
            company: Some("Acme".to_string()),
            position: Some("CTO".to_string()),
            plan: Some("Plus".to_string()),
            payment_day: Some(10),
            notes: Some("Met at the fair".to_string()),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    async fn create_then_get(store: &dyn CrmStore) {
        let created = create_contact(store, ana_input()).await.unwrap();
        let fetched = get_contact(store, &created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert!(!fetched.id.is_empty());
        assert_eq!(fetched.created_at, fetched.updated_at);

        let input = ana_input();
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.email, input.email);
        assert_eq!(fetched.phone, input.phone);
        assert_eq!(fetched.city, input.city);
        assert_eq!(fetched.company, input.company);
        assert_eq!(fetched.position, input.position);
        assert_eq!(fetched.plan, input.plan);
        assert_eq!(fetched.payment_day, input.payment_day);
        assert_eq!(fetched.notes, input.notes);
    }

    #[tokio::test]
    async fn test_create_then_get_json() {
        let (_dir, store) = json_store();
        create_then_get(&store).await;
    }

    #[tokio::test]
    async fn test_create_then_get_sqlite() {
        let (_dir, store) = sqlite_store();
        create_then_get(&store).await;
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (_dir, store) = json_store();
        let a = create_contact(&store, ana_input()).await.unwrap();
        let b = create_contact(&store, ana_input()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (_dir, store) = sqlite_store();
        let created = create_contact(&store, ana_input()).await.unwrap();

        let mut input = ana_input();
        input.city = None;
        input.plan = Some("Max".to_string());
        let updated = update_contact(&store, &created.id, input).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.city, None);
        assert_eq!(get_contact(&store, &created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_contact_changes_nothing() {
        let (_dir, store) = json_store();
        let created = create_contact(&store, ana_input()).await.unwrap();

        let err = update_contact(&store, "missing", ana_input()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Contact", .. }));
        assert_eq!(list_contacts(&store).await.unwrap(), vec![created]);
    }

    async fn cascade(store: &dyn CrmStore) {
        let ana = create_contact(store, ana_input()).await.unwrap();
        let mut bruno_input = ana_input();
        bruno_input.name = "Bruno".to_string();
        bruno_input.email = "bruno@x.com".to_string();
        let bruno = create_contact(store, bruno_input).await.unwrap();

        for (contact, day) in [(&ana, 1), (&ana, 2), (&bruno, 3)] {
            interactions::create_interaction(
                store,
                InteractionInput {
                    contact_id: contact.id.clone(),
                    kind: "call".to_string(),
                    date: date(day),
                    notes: String::new(),
                },
            )
            .await
            .unwrap();
        }

        for contact_id in [Some(ana.id.clone()), Some(bruno.id.clone()), None] {
            tasks::create_task(
                store,
                TaskInput {
                    title: "Follow up".to_string(),
                    due_date: date(9),
                    completed: false,
                    contact_id,
                },
            )
            .await
            .unwrap();
        }

        let deal = deals::create_deal(
            store,
            DealInput {
                name: "Ana Deal".to_string(),
                value: 100.0,
                contact_id: Some(ana.id.clone()),
                stage: DealStage::Proposal,
            },
        )
        .await
        .unwrap();

        let removed = delete_contact(store, &ana.id).await.unwrap();
        assert_eq!(
            removed,
            ContactDeletion {
                interactions: 2,
                tasks: 1
            }
        );

        assert!(get_contact(store, &ana.id).await.is_err());
        let remaining = interactions::list_interactions(store).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|i| i.contact_id == bruno.id));

        let remaining_tasks = tasks::list_tasks(store, Default::default()).await.unwrap();
        assert_eq!(remaining_tasks.len(), 2);
        assert!(remaining_tasks
            .iter()
            .all(|t| t.contact_id.as_deref() != Some(ana.id.as_str())));

        // Deals are not cascaded
        let kept = deals::get_deal(store, &deal.id).await.unwrap();
        assert_eq!(kept.name, "Ana Deal");
        let contacts = list_contacts(store).await.unwrap();
        assert_eq!(resolve_name(&contacts, kept.contact_id.as_deref()), None);
    }

    #[tokio::test]
    async fn test_delete_cascades_json() {
        let (_dir, store) = json_store();
        cascade(&store).await;
    }

    #[tokio::test]
    async fn test_delete_cascades_sqlite() {
        let (_dir, store) = sqlite_store();
        cascade(&store).await;
    }

    #[tokio::test]
    async fn test_delete_unknown_contact() {
        let (_dir, store) = json_store();
        assert!(matches!(
            delete_contact(&store, "missing").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_recent_contacts_newest_first() {
        let (_dir, store) = json_store();
        let mut ids = Vec::new();
        for i in 0..7 {
            let mut input = ana_input();
            input.name = format!("Contact {}", i);
            ids.push(create_contact(&store, input).await.unwrap().id);
        }

        let recent = recent_contacts(&store, 5).await.unwrap();
        let recent_ids: Vec<_> = recent.into_iter().map(|c| c.id).collect();
        let expected: Vec<_> = ids.iter().rev().take(5).cloned().collect();
        assert_eq!(recent_ids, expected);
    }

    #[tokio::test]
    async fn test_contact_options() {
        let (_dir, store) = sqlite_store();
        let created = create_contact(&store, ana_input()).await.unwrap();

        let options = contact_options(&store).await.unwrap();
        assert_eq!(
            options,
            vec![ContactOption {
                value: created.id,
                text: "Ana".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_overview_collects_linked_records() {
        let (_dir, store) = json_store();
        let contact = create_contact(&store, ana_input()).await.unwrap();
        for day in [3, 7, 5] {
            interactions::create_interaction(
                &store,
                InteractionInput {
                    contact_id: contact.id.clone(),
                    kind: "email".to_string(),
                    date: date(day),
                    notes: format!("day {}", day),
                },
            )
            .await
            .unwrap();
        }

        let overview = contact_overview(&store, &contact.id).await.unwrap();
        let days: Vec<_> = overview.interactions.iter().map(|i| i.date).collect();
        assert_eq!(days, vec![date(7), date(5), date(3)]);
        assert!(overview.tasks.is_empty());
        assert!(overview.deals.is_empty());
    }
}
