use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut types = Vec::new();

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactInput::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));
    types.push(clean_type(ContactOption::export_to_string()?));
    types.push(clean_type(ContactOptionsResponse::export_to_string()?));
    types.push(clean_type(ContactOverview::export_to_string()?));

    // Interaction types
    types.push(clean_type(Interaction::export_to_string()?));
    types.push(clean_type(InteractionInput::export_to_string()?));
    types.push(clean_type(InteractionsResponse::export_to_string()?));

    // Task types
    types.push(clean_type(Task::export_to_string()?));
    types.push(clean_type(TaskInput::export_to_string()?));
    types.push(clean_type(TaskStatusFilter::export_to_string()?));
    types.push(clean_type(TaskWithContact::export_to_string()?));
    types.push(clean_type(TasksResponse::export_to_string()?));
    types.push(clean_type(TodayTasksResponse::export_to_string()?));

    // Deal types
    types.push(clean_type(DealStage::export_to_string()?));
    types.push(clean_type(Deal::export_to_string()?));
    types.push(clean_type(DealInput::export_to_string()?));
    types.push(clean_type(MoveDealRequest::export_to_string()?));
    types.push(clean_type(DealsResponse::export_to_string()?));

    // Pipeline and dashboard types
    types.push(clean_type(PipelineDeal::export_to_string()?));
    types.push(clean_type(PipelineColumn::export_to_string()?));
    types.push(clean_type(PipelineResponse::export_to_string()?));
    types.push(clean_type(DashboardStats::export_to_string()?));
    types.push(clean_type(DashboardResponse::export_to_string()?));
    types.push(clean_type(SeedSummary::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips the per-file banner and `import type` lines; every type ends up in
/// one module so cross references resolve locally.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let result = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let result = result.trim();
    if result.is_empty() {
        String::new()
    } else {
        format!("{}\n", result)
    }
}
