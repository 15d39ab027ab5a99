use std::fs::OpenOptions;
use std::path::Path;
use chrono::Local;
use log::info;
use crate::scraper::JobRecord;
use crate::Result;

/// Appends records to a CSV file, writing the header only when the file is
/// first created.
pub fn append_to_csv<P: AsRef<Path>>(records: &[JobRecord], path: P) -> Result<()> {
    let path_ref = path.as_ref();
    let file_exists = path_ref.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path_ref)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !file_exists {
        csv_writer.write_record([
            "title",
            "company",
            "company_link",
            "date",
            "link",
            "insights",
            "description",
            "apply_link",
            "scraped_at",
        ])?;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    for record in records {
        csv_writer.write_record([
            record.title.as_str(),
            record.company.as_str(),
            record.company_link.as_str(),
            record.date.as_str(),
            record.link.as_str(),
            &record.insights.join("; "),
            record.description.as_str(),
            record.apply_link.as_deref().unwrap_or(""),
            &timestamp,
        ])?;
    }
    csv_writer.flush()?;

    info!("Wrote {} records to {:?}", records.len(), path_ref);
    Ok(())
}
