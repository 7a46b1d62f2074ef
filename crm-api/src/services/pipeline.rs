use super::contacts::resolve_name;
use super::ServiceResult;
use crate::storage::CrmStore;
use shared_types::{Contact, Deal, DealStage, PipelineColumn, PipelineDeal};

/// Buckets deals by stage. One column per stage in board order, deals keep
/// their list order inside a column.
pub fn group_by_stage(deals: Vec<Deal>, contacts: &[Contact]) -> Vec<PipelineColumn> {
    let mut columns: Vec<PipelineColumn> = DealStage::ALL
        .into_iter()
        .map(|stage| PipelineColumn {
            stage,
            deals: Vec::new(),
            count: 0,
            total_value: 0.0,
        })
        .collect();

    for deal in deals {
        // ALL covers every variant
        let Some(column) = columns.iter_mut().find(|c| c.stage == deal.stage) else {
            continue;
        };
        column.count += 1;
        column.total_value += deal.value;
        let contact_name = resolve_name(contacts, deal.contact_id.as_deref());
        column.deals.push(PipelineDeal { deal, contact_name });
    }

    columns
}

pub async fn pipeline(store: &dyn CrmStore) -> ServiceResult<Vec<PipelineColumn>> {
    let contacts = store.list_contacts().await?;
    let deals = store.list_deals().await?;
    Ok(group_by_stage(deals, &contacts))
}
