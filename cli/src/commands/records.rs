use chrono::Local;
use records_api::models::record::{NewRecord, Record, RecordQuery, RecordUpdate};
use records_api::records_store::RecordsStore;
use records_api::{RecordsApi, RecordsClient};

use crate::cli::{Add, List, Show, Update};

/// Failure of a command, already phrased for the user
pub struct CommandError(pub String);

fn print_table(records: &[Record]) {
    println!(
        "{:<36} {:<8} {:<8} {:<16} Title",
        "Id", "Status", "Priority", "Created"
    );
    for record in records {
        println!(
            "{:<36} {:<8} {:<8} {:<16} {}",
            record.id,
            record.status,
            record.priority,
            record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.title
        );
    }
}

fn print_record(record: &Record) {
    println!("Id:          {}", record.id);
    println!("Title:       {}", record.title);
    println!("Description: {}", record.description);
    println!("Status:      {}", record.status);
    println!("Priority:    {}", record.priority);
    if let Some(owner) = &record.users {
        println!("Owner:       {} <{}>", owner.name, owner.email);
    }
    println!(
        "Created:     {}",
        record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!(
        "Updated:     {}",
        record.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
}

fn store_error(store: &RecordsStore<RecordsApi>) -> Result<(), CommandError> {
    match store.error() {
        Some(message) => Err(CommandError(message.to_string())),
        None => Ok(()),
    }
}

pub async fn list(store: &mut RecordsStore<RecordsApi>, args: List) -> Result<(), CommandError> {
    let mut query = RecordQuery::default().page(args.page).limit(args.limit);
    if let Some(search) = args.search {
        query = query.search(search);
    }
    if let Some(status) = args.status {
        query = query.status(status);
    }
    store.fetch_records(&query).await;
    store_error(store)?;

    let pagination = store.pagination();
    print_table(store.records());
    println!(
        "\nPage {} of {}, {} record(s) in total",
        pagination.page, pagination.total_pages, pagination.total
    );
    Ok(())
}

pub async fn show(store: &RecordsStore<RecordsApi>, args: Show) -> Result<(), CommandError> {
    let record = store
        .client()
        .get_record(&args.id)
        .await
        .map_err(|e| CommandError(e.message()))?;
    print_record(&record);
    Ok(())
}

pub async fn add(store: &mut RecordsStore<RecordsApi>, args: Add) -> Result<(), CommandError> {
    let mut new_record = NewRecord::new(args.title, args.description);
    if let Some(status) = args.status {
        new_record = new_record.with_status(status);
    }
    if let Some(priority) = args.priority {
        new_record = new_record.with_priority(priority);
    }
    let result = store.create_record(&new_record).await;
    if !result.success {
        return Err(CommandError(result.error.unwrap_or_default()));
    }
    if let Some(record) = store.records().first() {
        println!("Added record {}", record.id);
    }
    Ok(())
}

pub async fn update(store: &mut RecordsStore<RecordsApi>, args: Update) -> Result<(), CommandError> {
    let update = RecordUpdate {
        title: args.title,
        description: args.description,
        status: args.status,
        priority: args.priority,
    };
    if update.is_empty() {
        return Err(CommandError("Nothing to update, give at least one field".to_string()));
    }
    let result = store.update_record(&args.id, &update).await;
    if !result.success {
        return Err(CommandError(result.error.unwrap_or_default()));
    }
    println!("Updated record {}", args.id);
    Ok(())
}

pub async fn delete(store: &mut RecordsStore<RecordsApi>, args: Show) -> Result<(), CommandError> {
    let result = store.delete_record(&args.id).await;
    if !result.success {
        return Err(CommandError(result.error.unwrap_or_default()));
    }
    println!("Record {} deleted", args.id);
    Ok(())
}

pub async fn stats(store: &mut RecordsStore<RecordsApi>) -> Result<(), CommandError> {
    let stats = store
        .client()
        .get_stats()
        .await
        .map_err(|e| CommandError(e.message()))?;
    println!("Total:    {}", stats.total);
    println!("Active:   {}", stats.active);
    println!("Inactive: {}", stats.inactive);
    println!("Pending:  {}", stats.pending);
    Ok(())
}
