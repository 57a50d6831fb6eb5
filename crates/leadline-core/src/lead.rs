//! The lead record: one prospective client's immigration-case inquiry.
//!
//! Field names on the wire and in the persisted slot are camelCase, matching
//! the layout staff tooling already reads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage status of a lead. New leads always start as [`LeadStatus::Pending`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
  #[default]
  Pending,
  ReachedOut,
}

impl LeadStatus {
  /// Title-case label for display, e.g. `"Reached Out"`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::ReachedOut => "Reached Out",
    }
  }
}

// ─── Lead ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  /// Assigned once at creation; never reassigned.
  pub id:                Uuid,
  pub first_name:        String,
  pub last_name:         String,
  pub email:             String,
  pub linked_in_profile: String,
  /// Visa category codes; non-empty for any lead that passed intake.
  pub visas_of_interest: Vec<String>,
  /// Storage location of the résumé, never the raw upload.
  pub resume_url:        String,
  pub additional_info:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub country:           Option<String>,
  #[serde(default)]
  pub status:            LeadStatus,
  pub created_at:        DateTime<Utc>,
  /// Refreshed on every mutation; always `>= created_at`.
  pub updated_at:        DateTime<Utc>,
}

impl Lead {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Merge `patch` over this record and advance `updated_at`.
  ///
  /// `updated_at` strictly increases even when `now` does not move past the
  /// previous value (coarse clocks, back-to-back updates).
  pub fn apply(&mut self, patch: LeadPatch, now: DateTime<Utc>) {
    let LeadPatch {
      first_name,
      last_name,
      email,
      linked_in_profile,
      visas_of_interest,
      resume_url,
      additional_info,
      country,
      status,
    } = patch;

    if let Some(v) = first_name {
      self.first_name = v;
    }
    if let Some(v) = last_name {
      self.last_name = v;
    }
    if let Some(v) = email {
      self.email = v;
    }
    if let Some(v) = linked_in_profile {
      self.linked_in_profile = v;
    }
    if let Some(v) = visas_of_interest {
      self.visas_of_interest = v;
    }
    if let Some(v) = resume_url {
      self.resume_url = v;
    }
    if let Some(v) = additional_info {
      self.additional_info = v;
    }
    if let Some(v) = country {
      self.country = Some(v);
    }
    if let Some(v) = status {
      self.status = v;
    }

    self.updated_at = next_timestamp(self.updated_at, now);
  }
}

/// `now` if it is later than `previous`, otherwise one microsecond past it.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
  if now > previous {
    now
  } else {
    previous + Duration::microseconds(1)
  }
}

// ─── LeadPatch ───────────────────────────────────────────────────────────────

/// A partial update for [`Lead::apply`].
///
/// `id`, `createdAt` and `updatedAt` are deliberately absent: the first two
/// never change and the last is owned by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linked_in_profile: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub visas_of_interest: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resume_url:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub additional_info:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub country:           Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:            Option<LeadStatus>,
}

impl LeadPatch {
  /// Patch that only moves the lead to `status`.
  pub fn status(status: LeadStatus) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use chrono::TimeZone;

  use super::*;

  fn sample() -> Lead {
    let at = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
    Lead {
      id:                Uuid::new_v4(),
      first_name:        "Jane".into(),
      last_name:         "Smith".into(),
      email:             "jane.smith@example.com".into(),
      linked_in_profile: "https://linkedin.com/in/janesmith".into(),
      visas_of_interest: vec!["eb2niw".into()],
      resume_url:        "/uploads/placeholder.pdf".into(),
      additional_info:   "Experience in healthcare".into(),
      country:           Some("Brazil".into()),
      status:            LeadStatus::Pending,
      created_at:        at,
      updated_at:        at,
    }
  }

  #[test]
  fn serializes_with_camel_case_field_names() {
    let json = serde_json::to_value(sample()).unwrap();
    for key in [
      "id",
      "firstName",
      "lastName",
      "email",
      "linkedInProfile",
      "visasOfInterest",
      "resumeUrl",
      "additionalInfo",
      "country",
      "status",
      "createdAt",
      "updatedAt",
    ] {
      assert!(json.get(key).is_some(), "missing {key}: {json}");
    }
    assert_eq!(json["status"], "PENDING");
  }

  #[test]
  fn absent_country_is_omitted() {
    let mut lead = sample();
    lead.country = None;
    let json = serde_json::to_value(&lead).unwrap();
    assert!(json.get("country").is_none());
  }

  #[test]
  fn status_parses_and_prints_wire_form() {
    assert_eq!(LeadStatus::ReachedOut.to_string(), "REACHED_OUT");
    assert_eq!(
      LeadStatus::from_str("REACHED_OUT").unwrap(),
      LeadStatus::ReachedOut
    );
    assert!(LeadStatus::from_str("ARCHIVED").is_err());
    assert_eq!(LeadStatus::ReachedOut.label(), "Reached Out");
  }

  #[test]
  fn unknown_status_is_rejected_on_deserialize() {
    let mut json = serde_json::to_value(sample()).unwrap();
    json["status"] = "ARCHIVED".into();
    assert!(serde_json::from_value::<Lead>(json).is_err());
  }

  #[test]
  fn status_patch_changes_only_status_and_updated_at() {
    let before = sample();
    let mut after = before.clone();
    after.apply(LeadPatch::status(LeadStatus::ReachedOut), before.updated_at);

    assert_eq!(after.status, LeadStatus::ReachedOut);
    assert!(after.updated_at > before.updated_at);

    let mut normalised = after.clone();
    normalised.status = before.status;
    normalised.updated_at = before.updated_at;
    assert_eq!(normalised, before);
  }

  #[test]
  fn next_timestamp_prefers_later_clock() {
    let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    assert_eq!(next_timestamp(earlier, later), later);
    assert_eq!(
      next_timestamp(later, earlier),
      later + Duration::microseconds(1)
    );
  }
}
