use super::{contacts, deals, interactions, tasks, ServiceResult};
use crate::storage::CrmStore;
use chrono::{Duration, NaiveDate};
use shared_types::{ContactInput, DealInput, DealStage, InteractionInput, SeedSummary, TaskInput};

struct SampleContact {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    city: &'static str,
    company: &'static str,
    position: &'static str,
    plan: Option<&'static str>,
    payment_day: Option<u8>,
    notes: &'static str,
}

const SAMPLE_CONTACTS: [SampleContact; 5] = [
    SampleContact {
        name: "John Carter",
        email: "john.carter@techcorp.com",
        phone: "+1 415 555 0134",
        city: "San Francisco",
        company: "TechCorp",
        position: "IT Director",
        plan: Some("Plus"),
        payment_day: Some(15),
        notes: "Looking to expand the rollout to two more offices",
    },
    SampleContact {
        name: "Maria Lopez",
        email: "maria.lopez@inovatech.io",
        phone: "+1 212 555 0178",
        city: "New York",
        company: "InovaTech",
        position: "CEO",
        plan: Some("Max"),
        payment_day: Some(5),
        notes: "Fast growing startup, needs something that scales",
    },
    SampleContact {
        name: "Peter Olsen",
        email: "peter@northconsulting.com",
        phone: "+1 312 555 0112",
        city: "Chicago",
        company: "North Consulting",
        position: "Partner",
        plan: Some("Basic"),
        payment_day: Some(10),
        notes: "Customer for two years",
    },
    SampleContact {
        name: "Ana Costa",
        email: "ana.costa@digitalsolutions.com",
        phone: "+1 206 555 0156",
        city: "Seattle",
        company: "Digital Solutions",
        position: "CTO",
        plan: None,
        payment_day: None,
        notes: "Qualified lead, asked for a product demo",
    },
    SampleContact {
        name: "Charles Ford",
        email: "charles.ford@southindustries.com",
        phone: "+1 512 555 0190",
        city: "Austin",
        company: "South Industries",
        position: "Project Manager",
        plan: Some("Plus"),
        payment_day: Some(20),
        notes: "Needs an integration with their legacy ERP",
    },
];

/// (deal name, value, stage), one per sample contact
const SAMPLE_DEALS: [(&str, f64, DealStage); 5] = [
    ("CRM rollout - TechCorp", 50_000.0, DealStage::Proposal),
    ("Full suite - InovaTech", 75_000.0, DealStage::Negotiation),
    ("Annual renewal - North Consulting", 25_000.0, DealStage::WonClient),
    ("Pilot project - Digital Solutions", 15_000.0, DealStage::Qualification),
    ("Custom integration", 30_000.0, DealStage::Lead),
];

/// (title, days from today, completed), one per sample contact
const SAMPLE_TASKS: [(&str, i64, bool); 5] = [
    ("Call John about the proposal", 1, false),
    ("Prepare the InovaTech demo", 0, false),
    ("Send the renewal contract", 7, true),
    ("Book a technical meeting with Ana", 1, false),
    ("Requirements review - South Industries", 7, false),
];

/// (type, days from today, notes) for the first four contacts
const SAMPLE_INTERACTIONS: [(&str, i64, &str); 4] = [
    ("Call", 0, "Interested in the proposal, asked for scope changes."),
    ("Email", 0, "Sent extra material on the advanced features."),
    ("Meeting", -1, "Alignment meeting, renewal approved."),
    ("WhatsApp", 0, "Confirmed interest, waiting on internal approval."),
];

fn contact_input(sample: &SampleContact) -> ContactInput {
    ContactInput {
        name: sample.name.to_string(),
        email: sample.email.to_string(),
        phone: Some(sample.phone.to_string()),
        city: Some(sample.city.to_string()),
        company: Some(sample.company.to_string()),
        position: Some(sample.position.to_string()),
        plan: sample.plan.map(str::to_string),
        payment_day: sample.payment_day,
        notes: Some(sample.notes.to_string()),
    }
}

/// Creates the demo dataset relative to `today`. Existing records are left alone.
pub async fn create_sample_data_on(
    store: &dyn CrmStore,
    today: NaiveDate,
) -> ServiceResult<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut contact_ids = Vec::with_capacity(SAMPLE_CONTACTS.len());

    for sample in &SAMPLE_CONTACTS {
        let contact = contacts::create_contact(store, contact_input(sample)).await?;
        contact_ids.push(contact.id);
        summary.contacts += 1;
    }

    for (contact_id, (name, value, stage)) in contact_ids.iter().zip(SAMPLE_DEALS) {
        let input = DealInput {
            name: name.to_string(),
            value,
            contact_id: Some(contact_id.clone()),
            stage,
        };
        deals::create_deal(store, input).await?;
        summary.deals += 1;
    }

    for (contact_id, (title, offset, completed)) in contact_ids.iter().zip(SAMPLE_TASKS) {
        let input = TaskInput {
            title: title.to_string(),
            due_date: today + Duration::days(offset),
            completed,
            contact_id: Some(contact_id.clone()),
        };
        tasks::create_task(store, input).await?;
        summary.tasks += 1;
    }

    for (contact_id, (kind, offset, notes)) in contact_ids.iter().zip(SAMPLE_INTERACTIONS) {
        let input = InteractionInput {
            contact_id: contact_id.clone(),
            kind: kind.to_string(),
            date: today + Duration::days(offset),
            notes: notes.to_string(),
        };
        interactions::create_interaction(store, input).await?;
        summary.interactions += 1;
    }

    tracing::info!(
        "Seeded {} contacts, {} deals, {} tasks, {} interactions",
        summary.contacts,
        summary.deals,
        summary.tasks,
        summary.interactions
    );

    Ok(summary)
}

pub async fn create_sample_data(store: &dyn CrmStore) -> ServiceResult<SeedSummary> {
    create_sample_data_on(store, chrono::Utc::now().date_naive()).await
}
