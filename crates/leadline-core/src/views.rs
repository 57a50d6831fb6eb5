//! Read-only derivations behind the staff dashboard: summary counts, recent
//! activity, and the filtered, paginated lead table.
//!
//! Everything here is a pure function of a lead slice; callers recompute on
//! every change to the collection.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::lead::{Lead, LeadStatus};

/// Leads shown in the recent-activity panel.
pub const RECENT_LIMIT: usize = 5;
/// Rows per page of the lead table.
pub const PAGE_SIZE: usize = 10;

// ─── Stats ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
  pub total:       usize,
  /// Leads whose `created_at` falls on the same calendar day as `now`, in
  /// `now`'s time zone.
  pub new_today:   usize,
  pub pending:     usize,
  pub reached_out: usize,
}

impl LeadStats {
  pub fn compute<Tz: TimeZone>(leads: &[Lead], now: &DateTime<Tz>) -> Self {
    let zone = now.timezone();
    let today = now.date_naive();

    leads.iter().fold(
      Self {
        total: leads.len(),
        ..Self::default()
      },
      |mut stats, lead| {
        if lead.created_at.with_timezone(&zone).date_naive() == today {
          stats.new_today += 1;
        }
        match lead.status {
          LeadStatus::Pending => stats.pending += 1,
          LeadStatus::ReachedOut => stats.reached_out += 1,
        }
        stats
      },
    )
  }
}

// ─── Recent activity ─────────────────────────────────────────────────────────

/// The `limit` most recently created leads, newest first. Leads created at the
/// same instant keep their collection order.
pub fn recent(leads: &[Lead], limit: usize) -> Vec<Lead> {
  let mut sorted = leads.to_vec();
  sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  sorted.truncate(limit);
  sorted
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Status selector of the lead table.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
pub enum StatusFilter {
  #[default]
  #[serde(rename = "all")]
  #[strum(serialize = "all")]
  All,
  #[serde(rename = "PENDING")]
  #[strum(serialize = "PENDING")]
  Pending,
  #[serde(rename = "REACHED_OUT")]
  #[strum(serialize = "REACHED_OUT")]
  ReachedOut,
}

impl StatusFilter {
  pub fn matches(self, status: LeadStatus) -> bool {
    match self {
      Self::All => true,
      Self::Pending => status == LeadStatus::Pending,
      Self::ReachedOut => status == LeadStatus::ReachedOut,
    }
  }
}

/// Status filter plus free-text search over first name, last name and email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
  #[serde(default)]
  pub status: StatusFilter,
  /// Case-insensitive substring; empty matches everything.
  #[serde(default)]
  pub search: String,
}

impl TableQuery {
  pub fn matches(&self, lead: &Lead) -> bool {
    if !self.status.matches(lead.status) {
      return false;
    }
    if self.search.is_empty() {
      return true;
    }
    let needle = self.search.to_lowercase();
    [&lead.first_name, &lead.last_name, &lead.email]
      .iter()
      .any(|field| field.to_lowercase().contains(&needle))
  }
}

/// The subset of `leads` matching `query`, in collection order.
pub fn filter(leads: &[Lead], query: &TableQuery) -> Vec<Lead> {
  leads.iter().filter(|l| query.matches(l)).cloned().collect()
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// One page of the filtered lead table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
  pub rows:           Vec<Lead>,
  /// 1-based page number actually shown.
  pub page:           usize,
  pub total_pages:    usize,
  pub total_filtered: usize,
}

pub fn total_pages(len: usize) -> usize { len.div_ceil(PAGE_SIZE) }

/// Slice page `page` (1-based, clamped into range) out of `filtered`.
pub fn paginate(filtered: &[Lead], page: usize) -> TablePage {
  let pages = total_pages(filtered.len());
  let page = page.clamp(1, pages.max(1));
  let rows = filtered
    .iter()
    .skip((page - 1) * PAGE_SIZE)
    .take(PAGE_SIZE)
    .cloned()
    .collect();
  TablePage {
    rows,
    page,
    total_pages: pages,
    total_filtered: filtered.len(),
  }
}

/// The lead table's interactive state: the current query and page.
///
/// Changing the status filter or the search text returns to page 1.
///
/// Meant for front ends that keep the table open across user actions, such
/// as an embedded dashboard. The HTTP handlers and the `leadline` CLI are
/// stateless: they receive the page with each request and call [`paginate`]
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadTable {
  query: TableQuery,
  page:  usize,
}

impl Default for LeadTable {
  fn default() -> Self {
    Self {
      query: TableQuery::default(),
      page:  1,
    }
  }
}

impl LeadTable {
  pub fn new() -> Self { Self::default() }

  pub fn query(&self) -> &TableQuery { &self.query }

  pub fn current_page(&self) -> usize { self.page }

  pub fn set_status_filter(&mut self, status: StatusFilter) {
    if self.query.status != status {
      self.query.status = status;
      self.page = 1;
    }
  }

  pub fn set_search(&mut self, search: impl Into<String>) {
    let search = search.into();
    if self.query.search != search {
      self.query.search = search;
      self.page = 1;
    }
  }

  /// Jump to `page`, clamped against `leads` under the current query.
  pub fn go_to(&mut self, page: usize, leads: &[Lead]) {
    let pages = total_pages(filter(leads, &self.query).len());
    self.page = page.clamp(1, pages.max(1));
  }

  pub fn next_page(&mut self, leads: &[Lead]) { self.go_to(self.page + 1, leads); }

  pub fn prev_page(&mut self, leads: &[Lead]) {
    self.go_to(self.page.saturating_sub(1), leads);
  }

  /// Render the current page of `leads`.
  pub fn render(&self, leads: &[Lead]) -> TablePage {
    paginate(&filter(leads, &self.query), self.page)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, FixedOffset, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::demo;

  fn lead(first: &str, status: LeadStatus, created_at: DateTime<Utc>) -> Lead {
    Lead {
      id: Uuid::new_v4(),
      first_name: first.into(),
      last_name: "Example".into(),
      email: format!("{}@example.com", first.to_lowercase()),
      linked_in_profile: "https://linkedin.com/in/example".into(),
      visas_of_interest: vec!["o1".into()],
      resume_url: "/uploads/placeholder.pdf".into(),
      additional_info: String::new(),
      country: None,
      status,
      created_at,
      updated_at: created_at,
    }
  }

  #[test]
  fn stats_count_statuses_and_today() {
    let now = Utc::now();
    let mut leads = demo::sample_leads();
    leads[0].created_at = now;

    let stats = LeadStats::compute(&leads, &now);
    assert_eq!(stats, LeadStats {
      total:       4,
      new_today:   1,
      pending:     2,
      reached_out: 2,
    });
  }

  #[test]
  fn stats_use_the_callers_local_day() {
    // 23:30 UTC on the 1st is already the 2nd at UTC+2.
    let created = "2025-06-01T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
    let leads = vec![lead("Late", LeadStatus::Pending, created)];

    let utc_now = "2025-06-01T23:45:00Z".parse::<DateTime<Utc>>().unwrap();
    assert_eq!(LeadStats::compute(&leads, &utc_now).new_today, 1);

    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_next_day = utc_now.with_timezone(&plus_two) + Duration::hours(12);
    assert_eq!(LeadStats::compute(&leads, &local_next_day).new_today, 1);

    let local_day_after = local_next_day + Duration::days(1);
    assert_eq!(LeadStats::compute(&leads, &local_day_after).new_today, 0);
  }

  #[test]
  fn recent_is_newest_first_capped_and_stable() {
    let base = Utc::now();
    let mut leads: Vec<Lead> = (0..7)
      .map(|i| lead(&format!("L{i}"), LeadStatus::Pending, base + Duration::minutes(i)))
      .collect();
    // Tie with L6: collection order decides.
    leads.push(lead("Tie", LeadStatus::Pending, base + Duration::minutes(6)));

    let top = recent(&leads, RECENT_LIMIT);
    let names: Vec<_> = top.iter().map(|l| l.first_name.as_str()).collect();
    assert_eq!(names, ["L6", "Tie", "L5", "L4", "L3"]);
  }

  #[test]
  fn status_filter_and_search() {
    let now = Utc::now();
    let leads = vec![
      lead("Jane", LeadStatus::Pending, now),
      lead("John", LeadStatus::ReachedOut, now),
    ];

    let pending = filter(&leads, &TableQuery {
      status: StatusFilter::Pending,
      search: String::new(),
    });
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].first_name, "Jane");

    let jan = filter(&leads, &TableQuery {
      status: StatusFilter::All,
      search: "JAN".into(),
    });
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].first_name, "Jane");

    let by_email = filter(&leads, &TableQuery {
      status: StatusFilter::All,
      search: "john@".into(),
    });
    assert_eq!(by_email.len(), 1);

    let none = filter(&leads, &TableQuery {
      status: StatusFilter::ReachedOut,
      search: "jane".into(),
    });
    assert!(none.is_empty());
  }

  #[test]
  fn status_filter_wire_names() {
    assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!(
      serde_json::to_value(StatusFilter::ReachedOut).unwrap(),
      "REACHED_OUT"
    );
    assert!("pending".parse::<StatusFilter>().is_err());
  }

  #[test]
  fn eleven_rows_make_two_pages_and_filter_change_resets() {
    let now = Utc::now();
    let leads: Vec<Lead> = (0..11)
      .map(|i| lead(&format!("Row{i}"), LeadStatus::Pending, now))
      .collect();

    let mut table = LeadTable::new();
    let first = table.render(&leads);
    assert_eq!(first.rows.len(), 10);
    assert_eq!(first.total_pages, 2);

    table.next_page(&leads);
    let second = table.render(&leads);
    assert_eq!(second.page, 2);
    assert_eq!(second.rows.len(), 1);
    assert_eq!(second.rows[0].first_name, "Row10");

    // Cannot run past the last page.
    table.next_page(&leads);
    assert_eq!(table.current_page(), 2);

    table.set_search("row");
    assert_eq!(table.current_page(), 1);

    table.next_page(&leads);
    table.set_status_filter(StatusFilter::Pending);
    assert_eq!(table.current_page(), 1);
  }

  #[test]
  fn paginate_clamps_out_of_range_pages() {
    let now = Utc::now();
    let leads: Vec<Lead> = (0..3)
      .map(|i| lead(&format!("R{i}"), LeadStatus::Pending, now))
      .collect();
    assert_eq!(paginate(&leads, 0).page, 1);
    assert_eq!(paginate(&leads, 9).page, 1);

    let empty = paginate(&[], 3);
    assert_eq!(empty.page, 1);
    assert_eq!(empty.total_pages, 0);
    assert!(empty.rows.is_empty());
  }
}
