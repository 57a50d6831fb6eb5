//! Plain-text rendering of dashboard views for the terminal.

use std::fmt::Write as _;

use chrono::Local;
use leadline_core::{
  lead::Lead,
  views::{LeadStats, TablePage},
};

pub fn stats(stats: &LeadStats) -> String {
  format!(
    "Total leads   {}\nNew today     {}\nPending       {}\nReached out   {}\n",
    stats.total, stats.new_today, stats.pending, stats.reached_out
  )
}

/// One line per lead: name, email, and how long ago it arrived.
pub fn recent(leads: &[Lead]) -> String {
  if leads.is_empty() {
    return "No leads yet.\n".to_string();
  }
  let mut out = String::new();
  for lead in leads {
    let created = lead.created_at.with_timezone(&Local);
    let _ = writeln!(
      out,
      "{:<24} {:<32} {}",
      lead.full_name(),
      lead.email,
      created.format("%Y-%m-%d %H:%M")
    );
  }
  out
}

pub fn table(page: &TablePage) -> String {
  if page.rows.is_empty() {
    return "No leads match the current filters.\n".to_string();
  }
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<36}  {:<24} {:<12} {:<16} {}",
    "ID", "NAME", "STATUS", "COUNTRY", "SUBMITTED"
  );
  for lead in &page.rows {
    let _ = writeln!(
      out,
      "{:<36}  {:<24} {:<12} {:<16} {}",
      lead.id,
      lead.full_name(),
      lead.status.label(),
      lead.country.as_deref().unwrap_or("-"),
      lead.created_at.with_timezone(&Local).format("%Y-%m-%d"),
    );
  }
  let _ = writeln!(
    out,
    "\nPage {} of {} ({} leads)",
    page.page,
    page.total_pages.max(1),
    page.total_filtered
  );
  out
}

/// Every field of a single lead.
pub fn detail(lead: &Lead) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", lead.full_name());
  let _ = writeln!(out, "  id          {}", lead.id);
  let _ = writeln!(out, "  email       {}", lead.email);
  let _ = writeln!(out, "  linkedin    {}", lead.linked_in_profile);
  let _ = writeln!(out, "  country     {}", lead.country.as_deref().unwrap_or("-"));
  let _ = writeln!(out, "  visas       {}", lead.visas_of_interest.join(", "));
  let _ = writeln!(out, "  resume      {}", lead.resume_url);
  let _ = writeln!(out, "  status      {}", lead.status.label());
  let _ = writeln!(out, "  created     {}", lead.created_at.to_rfc3339());
  let _ = writeln!(out, "  updated     {}", lead.updated_at.to_rfc3339());
  if !lead.additional_info.is_empty() {
    let _ = writeln!(out, "\n{}", lead.additional_info);
  }
  out
}

#[cfg(test)]
mod tests {
  use leadline_core::{
    demo,
    lead::LeadStatus,
    views::{self, TableQuery},
  };

  use super::*;

  #[test]
  fn stats_lists_every_counter() {
    let text = stats(&LeadStats {
      total:       4,
      new_today:   1,
      pending:     3,
      reached_out: 1,
    });
    assert!(text.contains("Total leads   4"));
    assert!(text.contains("Reached out   1"));
  }

  #[test]
  fn empty_recent_says_so() {
    assert_eq!(recent(&[]), "No leads yet.\n");
  }

  #[test]
  fn table_shows_labels_and_page_footer() {
    let leads = demo::sample_leads();
    let page = views::paginate(&views::filter(&leads, &TableQuery::default()), 1);
    let text = table(&page);
    assert!(text.contains("Reached Out"));
    assert!(text.contains("John Doe"));
    assert!(text.ends_with("Page 1 of 1 (4 leads)\n"));
  }

  #[test]
  fn empty_table_has_no_footer() {
    let text = table(&TablePage::default());
    assert_eq!(text, "No leads match the current filters.\n");
  }

  #[test]
  fn detail_includes_status_and_visas() {
    let mut lead = demo::sample_leads().remove(0);
    lead.status = LeadStatus::ReachedOut;
    let text = detail(&lead);
    assert!(text.contains("status      Reached Out"));
    assert!(text.contains(&lead.visas_of_interest.join(", ")));
  }
}
