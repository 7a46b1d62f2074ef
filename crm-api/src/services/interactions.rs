use super::{ensure_contact, new_id, now, ServiceError, ServiceResult};
use crate::storage::CrmStore;
use shared_types::{Interaction, InteractionInput};

fn sort_newest_first(interactions: &mut [Interaction]) {
    interactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// All interactions, most recent date first
pub async fn list_interactions(store: &dyn CrmStore) -> ServiceResult<Vec<Interaction>> {
    let mut interactions = store.list_interactions().await?;
    sort_newest_first(&mut interactions);
    Ok(interactions)
}

pub async fn get_interaction(store: &dyn CrmStore, id: &str) -> ServiceResult<Interaction> {
    store
        .get_interaction(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Interaction", id))
}

pub async fn interactions_by_contact(
    store: &dyn CrmStore,
    contact_id: &str,
) -> ServiceResult<Vec<Interaction>> {
    let mut interactions: Vec<_> = store
        .list_interactions()
        .await?
        .into_iter()
        .filter(|i| i.contact_id == contact_id)
        .collect();
    sort_newest_first(&mut interactions);
    Ok(interactions)
}

pub async fn create_interaction(
    store: &dyn CrmStore,
    input: InteractionInput,
) -> ServiceResult<Interaction> {
    ensure_contact(store, &input.contact_id).await?;

    let interaction = Interaction {
        id: new_id(),
        contact_id: input.contact_id,
        kind: input.kind,
        date: input.date,
        notes: input.notes,
        created_at: now(),
    };

    store.insert_interaction(&interaction).await?;
    tracing::info!(
        "Logged {} interaction {} for contact {}",
        interaction.kind,
        interaction.id,
        interaction.contact_id
    );

    Ok(interaction)
}

pub async fn update_interaction(
    store: &dyn CrmStore,
    id: &str,
    input: InteractionInput,
) -> ServiceResult<Interaction> {
    let existing = get_interaction(store, id).await?;
    ensure_contact(store, &input.contact_id).await?;

    let interaction = Interaction {
        id: existing.id,
        contact_id: input.contact_id,
        kind: input.kind,
        date: input.date,
        notes: input.notes,
        created_at: existing.created_at,
    };

    if !store.update_interaction(&interaction).await? {
        return Err(ServiceError::not_found("Interaction", id));
    }

    Ok(interaction)
}

pub async fn delete_interaction(store: &dyn CrmStore, id: &str) -> ServiceResult<()> {
    if !store.delete_interaction(id).await? {
        return Err(ServiceError::not_found("Interaction", id));
    }
    tracing::info!("Deleted interaction {}", id);
    Ok(())
}
