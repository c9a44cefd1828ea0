//! Today's change summary as a printable HTML document.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tracing::info;

use caducados_core::calendar;
use caducados_inventory::{ChangeRecord, FamilyGroup, group_by_family};

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::resource::{Resource, StoreChangesToday};
use crate::session::Session;

const STYLE: &str = "body{font-family:sans-serif;margin:24px}\
h1{font-size:20px}h2{font-size:16px;margin-top:24px}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #ddd;padding:6px;font-size:12px;text-align:left}\
.img{width:40px;height:40px;object-fit:contain}\
.badge{padding:2px 8px;border-radius:8px;color:#fff}\
.ok{background:#2ECC71}.no{background:#E53935}";

/// Today's changes of the store, grouped by family. Empty when nothing changed.
pub async fn today_summary(backend: &dyn Backend, session: &Session) -> Result<Vec<FamilyGroup>, ClientError> {
    let mut changes = Resource::new(StoreChangesToday);
    changes.load(backend, session).await?;
    let groups = group_by_family(changes.into_data().unwrap_or_default());
    info!(store_id = %session.store_id(), families = groups.len(), "summary loaded");
    Ok(groups)
}

/// Render the summary, or `None` when there is nothing to report.
pub fn render_summary_html(groups: &[FamilyGroup], config: &ClientConfig, date: NaiveDate) -> Option<String> {
    if groups.iter().all(|g| g.records.is_empty()) {
        return None;
    }

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Resumen de cambios {}</h1>\n",
        calendar::format_ymd(date)
    );
    for group in groups {
        let _ = write!(
            html,
            "<div class=\"fam\">\n<h2>{}</h2>\n<table>\n<thead><tr>\
             <th>Foto</th><th>Producto</th><th>Fecha anterior</th><th>Fecha actual</th><th>Contrastado</th>\
             </tr></thead>\n<tbody>\n",
            escape(&group.family)
        );
        for record in &group.records {
            render_row(&mut html, record, config);
        }
        html.push_str("</tbody>\n</table>\n</div>\n");
    }
    html.push_str("</body>\n</html>\n");
    Some(html)
}

fn render_row(html: &mut String, record: &ChangeRecord, config: &ClientConfig) {
    let product = match record.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("{} · {}", record.product_code, escape(name)),
        _ => record.product_code.to_string(),
    };
    let (class, text) = if record.is_reconciled() { ("ok", "Sí") } else { ("no", "No") };
    let _ = writeln!(
        html,
        "<tr><td><img class=\"img\" src=\"{}\" /></td><td>{product}</td><td>{}</td><td>{}</td>\
         <td><span class=\"badge {class}\">{text}</span></td></tr>",
        escape(&config.asset_url(&record.image_path())),
        escape(record.previous_date.as_deref().unwrap_or("-")),
        escape(record.new_date.as_deref().unwrap_or("-")),
    );
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
