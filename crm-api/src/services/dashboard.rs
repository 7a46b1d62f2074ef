use super::{contacts, tasks, ServiceResult};
use crate::storage::CrmStore;
use shared_types::{DashboardResponse, DashboardStats, DealStage};

pub const RECENT_CONTACTS: usize = 5;

pub async fn dashboard_stats(store: &dyn CrmStore) -> ServiceResult<DashboardStats> {
    let total_contacts = store.list_contacts().await?.len();
    let pending_tasks = store
        .list_tasks()
        .await?
        .iter()
        .filter(|t| !t.completed)
        .count();

    let mut stats = DashboardStats {
        total_contacts,
        pending_tasks,
        ..DashboardStats::default()
    };

    for deal in store.list_deals().await? {
        if deal.stage.is_active() {
            stats.active_deals += 1;
            stats.active_value += deal.value;
        } else if deal.stage == DealStage::WonClient {
            stats.won_value += deal.value;
        }
    }

    Ok(stats)
}

/// Stats, pending tasks due today and the newest contacts
pub async fn dashboard(store: &dyn CrmStore, recent_limit: usize) -> ServiceResult<DashboardResponse> {
    let stats = dashboard_stats(store).await?;
    let due = tasks::tasks_due_today(store).await?;
    let today_tasks = tasks::with_contact_names(store, due).await?;
    let recent_contacts = contacts::recent_contacts(store, recent_limit).await?;

    Ok(DashboardResponse {
        stats,
        today_tasks,
        recent_contacts,
    })
}
