//! CSV export of the transfer list as currently filtered.

use std::path::PathBuf;

use chrono::Utc;
use chrono_tz::Tz;
use csv::Writer;
use serde::Serialize;

use engine::Transfer;

use crate::error::Result;

#[derive(Serialize)]
struct ExportRow<'a> {
    date: String,
    out_id: Option<i64>,
    in_id: Option<i64>,
    amount: String,
    source: &'a str,
    destination: &'a str,
    status: &'static str,
    user: &'a str,
    approved_by: &'a str,
    approved_date: String,
    reference: &'a str,
    notes: &'a str,
}

pub fn export_transfers(transfers: &[Transfer], timezone: Tz) -> Result<PathBuf> {
    std::fs::create_dir_all("exports")?;
    let stamp = Utc::now().with_timezone(&timezone).format("%Y%m%d_%H%M%S");
    let path = PathBuf::from(format!("exports/transfers_{stamp}.csv"));

    let mut writer = Writer::from_path(&path)?;
    for transfer in transfers {
        writer.serialize(ExportRow {
            date: transfer.date.map(|d| d.to_string()).unwrap_or_default(),
            out_id: transfer.out_id,
            in_id: transfer.in_id,
            amount: transfer.amount.to_string(),
            source: transfer.source.label(),
            destination: transfer.destination.label(),
            status: transfer.status.as_str(),
            user: transfer.user_name.as_deref().unwrap_or(""),
            approved_by: transfer.approved_by_name.as_deref().unwrap_or(""),
            approved_date: transfer
                .approved_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            reference: transfer.reference.as_deref().unwrap_or(""),
            notes: transfer.notes.as_deref().unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(path)
}
