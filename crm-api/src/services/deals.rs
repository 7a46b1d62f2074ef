use super::{ensure_contact, new_id, now, ServiceError, ServiceResult};
use crate::storage::CrmStore;
use shared_types::{Deal, DealInput, DealStage};

pub async fn list_deals(store: &dyn CrmStore) -> ServiceResult<Vec<Deal>> {
    Ok(store.list_deals().await?)
}

pub async fn get_deal(store: &dyn CrmStore, id: &str) -> ServiceResult<Deal> {
    store
        .get_deal(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Deal", id))
}

/// Deals in `stage`, keeping list order
pub async fn deals_by_stage(store: &dyn CrmStore, stage: DealStage) -> ServiceResult<Vec<Deal>> {
    Ok(store
        .list_deals()
        .await?
        .into_iter()
        .filter(|d| d.stage == stage)
        .collect())
}

pub async fn deals_by_contact(store: &dyn CrmStore, contact_id: &str) -> ServiceResult<Vec<Deal>> {
    Ok(store
        .list_deals()
        .await?
        .into_iter()
        .filter(|d| d.contact_id.as_deref() == Some(contact_id))
        .collect())
}

pub async fn create_deal(store: &dyn CrmStore, input: DealInput) -> ServiceResult<Deal> {
    if let Some(contact_id) = &input.contact_id {
        ensure_contact(store, contact_id).await?;
    }

    let now = now();
    let deal = Deal {
        id: new_id(),
        name: input.name,
        value: input.value,
        contact_id: input.contact_id,
        stage: input.stage,
        created_at: now,
        updated_at: now,
    };

    store.insert_deal(&deal).await?;
    tracing::info!("Created deal {} in stage {}", deal.id, deal.stage);

    Ok(deal)
}

pub async fn update_deal(store: &dyn CrmStore, id: &str, input: DealInput) -> ServiceResult<Deal> {
    let existing = get_deal(store, id).await?;

    // A reference left dangling by a contact delete may be carried over as is
    if let Some(contact_id) = &input.contact_id {
        if existing.contact_id.as_deref() != Some(contact_id.as_str()) {
            ensure_contact(store, contact_id).await?;
        }
    }

    let deal = Deal {
        id: existing.id,
        name: input.name,
        value: input.value,
        contact_id: input.contact_id,
        stage: input.stage,
        created_at: existing.created_at,
        updated_at: now(),
    };

    if !store.update_deal(&deal).await? {
        return Err(ServiceError::not_found("Deal", id));
    }

    Ok(deal)
}

/// Moves a deal to `stage`. Every stage is reachable from every other one.
pub async fn move_deal(store: &dyn CrmStore, id: &str, stage: DealStage) -> ServiceResult<Deal> {
    let mut deal = get_deal(store, id).await?;
    if deal.stage == stage {
        return Ok(deal);
    }

    let from = deal.stage;
    deal.stage = stage;
    deal.updated_at = now();

    if !store.update_deal(&deal).await? {
        return Err(ServiceError::not_found("Deal", id));
    }

    tracing::info!("Deal {} moved from {} to {}", deal.id, from, stage);
    Ok(deal)
}

pub async fn delete_deal(store: &dyn CrmStore, id: &str) -> ServiceResult<()> {
    if !store.delete_deal(id).await? {
        return Err(ServiceError::not_found("Deal", id));
    }
    tracing::info!("Deleted deal {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::contacts;
    use crate::services::test_support::{json_store, sqlite_store};
    use shared_types::ContactInput;

    fn input(name: &str, value: f64, stage: DealStage) -> DealInput {
        DealInput {
            name: name.to_string(),
            value,
            contact_id: None,
            stage,
        }
    }

    async fn by_stage_subset(store: &dyn CrmStore) {
        let stages = [
            DealStage::Lead,
            DealStage::Proposal,
            DealStage::Lead,
            DealStage::Lost,
            DealStage::WonClient,
            DealStage::Lead,
            DealStage::Proposal,
        ];
        let mut created = Vec::new();
        for (i, stage) in stages.into_iter().enumerate() {
            created.push(
                create_deal(store, input(&format!("Deal {}", i), i as f64, stage))
                    .await
                    .unwrap(),
            );
        }

        for stage in DealStage::ALL {
            let expected: Vec<_> = created.iter().filter(|d| d.stage == stage).cloned().collect();
            assert_eq!(deals_by_stage(store, stage).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_deals_by_stage_json() {
        let (_dir, store) = json_store();
        by_stage_subset(&store).await;
    }

    #[tokio::test]
    async fn test_deals_by_stage_sqlite() {
        let (_dir, store) = sqlite_store();
        by_stage_subset(&store).await;
    }

    #[tokio::test]
    async fn test_any_stage_reachable() {
        let (_dir, store) = json_store();
        let deal = create_deal(&store, input("Jump", 5.0, DealStage::Lost))
            .await
            .unwrap();

        for stage in [DealStage::Lead, DealStage::WonClient, DealStage::Qualification] {
            let moved = move_deal(&store, &deal.id, stage).await.unwrap();
            assert_eq!(moved.stage, stage);
            assert_eq!(moved.name, "Jump");
            assert_eq!(moved.value, 5.0);
        }
        assert_eq!(
            get_deal(&store, &deal.id).await.unwrap().stage,
            DealStage::Qualification
        );
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let (_dir, store) = sqlite_store();
        let deal = create_deal(&store, input("Old", 1.0, DealStage::Lead))
            .await
            .unwrap();

        let updated = update_deal(&store, &deal.id, input("New", 99.5, DealStage::Negotiation))
            .await
            .unwrap();

        assert_eq!(updated.id, deal.id);
        assert_eq!(updated.created_at, deal.created_at);
        assert_eq!(get_deal(&store, &deal.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_keeps_reference_to_deleted_contact() {
        let (_dir, store) = json_store();
        let ana = contacts::create_contact(
            &store,
            ContactInput {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
                ..ContactInput::default()
            },
        )
        .await
        .unwrap();

        let mut linked = input("Ana Deal", 100.0, DealStage::Lead);
        linked.contact_id = Some(ana.id.clone());
        let deal = create_deal(&store, linked.clone()).await.unwrap();

        contacts::delete_contact(&store, &ana.id).await.unwrap();

        linked.value = 150.0;
        let updated = update_deal(&store, &deal.id, linked).await.unwrap();
        assert_eq!(updated.contact_id.as_deref(), Some(ana.id.as_str()));
        assert_eq!(updated.value, 150.0);

        let remaining = contacts::list_contacts(&store).await.unwrap();
        assert_eq!(
            contacts::resolve_name(&remaining, updated.contact_id.as_deref()),
            None
        );

        let mut moved = input("Ana Deal", 150.0, DealStage::Lead);
        moved.contact_id = Some("someone-else".to_string());
        assert!(matches!(
            update_deal(&store, &deal.id, moved).await,
            Err(ServiceError::UnknownContact(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_deal() {
        let (_dir, store) = json_store();
        assert!(matches!(
            move_deal(&store, "missing", DealStage::Lead).await,
            Err(ServiceError::NotFound { entity: "Deal", .. })
        ));
        assert!(matches!(
            delete_deal(&store, "missing").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(list_deals(&store).await.unwrap().is_empty());
    }
}
