//! Intake: turning a public form submission into a new [`Lead`].
//!
//! [`IntakePayload::validate`] carries the form layer's rules; [`submit`]
//! trusts its input and only assembles the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  lead::{Lead, LeadStatus},
};

/// Résumé location recorded when the submission carried no résumé.
pub const PLACEHOLDER_RESUME_URL: &str = "/uploads/placeholder.pdf";

/// File extensions accepted for résumé uploads.
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Visa categories offered on the public form, as `(code, label)`.
pub const VISA_OPTIONS: [(&str, &str); 4] = [
  ("o1", "O-1"),
  ("eb1a", "EB1A"),
  ("eb2niw", "EB2 NIW"),
  ("idk", "I don't know"),
];

// ─── Payload ─────────────────────────────────────────────────────────────────

/// JSON body of a public intake submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub country:         String,
  /// LinkedIn profile URL; must use `https://`.
  pub linked_in:       String,
  pub visas:           Vec<String>,
  /// Filename of the uploaded résumé. Only its extension is inspected.
  #[serde(default)]
  pub resume:          Option<String>,
  pub additional_info: String,
}

impl IntakePayload {
  /// Apply the public form's field rules, reporting the first violation.
  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().chars().count() < 3 {
      return Err(Error::Validation("First Name is required".into()));
    }
    if self.last_name.trim().chars().count() < 3 {
      return Err(Error::Validation("Last Name is required".into()));
    }
    if !looks_like_email(&self.email) {
      return Err(Error::Validation("Invalid email".into()));
    }
    if self.country.trim().is_empty() {
      return Err(Error::Validation(
        "Country of citizenship is required".into(),
      ));
    }
    if !self.linked_in.starts_with("https://")
      || self.linked_in.len() <= "https://".len()
    {
      return Err(Error::Validation(
        "The URL must start with https://".into(),
      ));
    }
    if self.visas.is_empty() {
      return Err(Error::Validation(
        "You have to select at least one item.".into(),
      ));
    }
    if let Some(unknown) = self.visas.iter().find(|v| visa_label(v).is_none()) {
      return Err(Error::Validation(format!(
        "Unknown visa category: {unknown}"
      )));
    }
    if let Some(resume) = self.resume.as_deref().filter(|r| !r.is_empty())
      && resume_extension(resume).is_none()
    {
      return Err(Error::Validation(format!(
        "File must be one of the following types: .{}",
        RESUME_EXTENSIONS.join(", .")
      )));
    }
    if self.additional_info.trim().is_empty() {
      return Err(Error::Validation(
        "Additional Information is required".into(),
      ));
    }
    Ok(())
  }
}

/// Display label for a visa category code from [`VISA_OPTIONS`].
pub fn visa_label(code: &str) -> Option<&'static str> {
  VISA_OPTIONS
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, label)| *label)
}

fn looks_like_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !s.chars().any(char::is_whitespace)
    && domain
      .split_once('.')
      .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// The accepted extension of `filename`, lowercased, if it has one.
pub fn resume_extension(filename: &str) -> Option<&'static str> {
  let (_, ext) = filename.rsplit_once('.')?;
  RESUME_EXTENSIONS
    .iter()
    .copied()
    .find(|accepted| accepted.eq_ignore_ascii_case(ext))
}

// ─── Submit ──────────────────────────────────────────────────────────────────

/// Assemble a new [`Lead`] from `payload`.
///
/// The lead gets a fresh id, `PENDING` status, and `created_at == updated_at
/// == now`. No upload is stored: `resume_url` is a generated location keyed by
/// a fresh UUID, or [`PLACEHOLDER_RESUME_URL`] when no résumé was named.
pub fn submit(payload: IntakePayload, now: DateTime<Utc>) -> Lead {
  let resume_url = match payload.resume.as_deref().filter(|r| !r.is_empty()) {
    Some(name) => format!(
      "/uploads/resume-{}.{}",
      Uuid::new_v4(),
      resume_extension(name).unwrap_or("pdf")
    ),
    None => PLACEHOLDER_RESUME_URL.to_owned(),
  };

  Lead {
    id: Uuid::new_v4(),
    first_name: payload.first_name,
    last_name: payload.last_name,
    email: payload.email,
    linked_in_profile: payload.linked_in,
    visas_of_interest: payload.visas,
    resume_url,
    additional_info: payload.additional_info,
    country: Some(payload.country),
    status: LeadStatus::Pending,
    created_at: now,
    updated_at: now,
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  fn payload() -> IntakePayload {
    IntakePayload {
      first_name:      "Jane".into(),
      last_name:       "Smith".into(),
      email:           "jane@example.com".into(),
      country:         "Brazil".into(),
      linked_in:       "https://linkedin.com/in/jane".into(),
      visas:           vec!["o1".into()],
      resume:          Some("cv.docx".into()),
      additional_info: "Published researcher".into(),
    }
  }

  #[test]
  fn submit_assigns_identity_and_equal_timestamps() {
    let now = Utc::now();
    let lead = submit(payload(), now);
    assert_eq!(lead.status, LeadStatus::Pending);
    assert_eq!(lead.created_at, now);
    assert_eq!(lead.created_at, lead.updated_at);
    assert_eq!(lead.linked_in_profile, "https://linkedin.com/in/jane");
    assert_eq!(lead.country.as_deref(), Some("Brazil"));
  }

  #[test]
  fn submitted_ids_are_unique() {
    let now = Utc::now();
    let ids: HashSet<_> = (0..100).map(|_| submit(payload(), now).id).collect();
    assert_eq!(ids.len(), 100);
  }

  #[test]
  fn resume_url_is_placeholder_without_resume() {
    for resume in [None, Some(String::new())] {
      let p = IntakePayload { resume, ..payload() };
      assert_eq!(submit(p, Utc::now()).resume_url, PLACEHOLDER_RESUME_URL);
    }
  }

  #[test]
  fn resume_url_is_unique_and_keeps_extension() {
    let a = submit(payload(), Utc::now()).resume_url;
    let b = submit(payload(), Utc::now()).resume_url;
    assert_ne!(a, b);
    assert!(a.starts_with("/uploads/resume-"), "{a}");
    assert!(a.ends_with(".docx"), "{a}");
  }

  #[test]
  fn valid_payload_passes() {
    assert!(payload().validate().is_ok());
    let no_resume = IntakePayload { resume: None, ..payload() };
    assert!(no_resume.validate().is_ok());
  }

  #[test]
  fn validation_rejects_each_bad_field() {
    let cases = [
      IntakePayload { first_name: "Al".into(), ..payload() },
      IntakePayload { last_name: "".into(), ..payload() },
      IntakePayload { email: "not-an-email".into(), ..payload() },
      IntakePayload { email: "a@b".into(), ..payload() },
      IntakePayload { country: " ".into(), ..payload() },
      IntakePayload { linked_in: "http://linkedin.com/in/jane".into(), ..payload() },
      IntakePayload { visas: vec![], ..payload() },
      IntakePayload { visas: vec!["".into()], ..payload() },
      IntakePayload { resume: Some("cv.exe".into()), ..payload() },
      IntakePayload { additional_info: "".into(), ..payload() },
    ];
    for case in cases {
      assert!(
        matches!(case.validate(), Err(Error::Validation(_))),
        "accepted {case:?}"
      );
    }
  }

  #[test]
  fn visas_must_come_from_the_catalogue() {
    let p = IntakePayload {
      visas: vec!["o1".into(), "H-1B".into()],
      ..payload()
    };
    match p.validate() {
      Err(Error::Validation(m)) => assert_eq!(m, "Unknown visa category: H-1B"),
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(visa_label("eb2niw"), Some("EB2 NIW"));
    assert_eq!(visa_label("EB2NIW"), None);
  }

  #[test]
  fn resume_extension_is_case_insensitive() {
    assert_eq!(resume_extension("CV.PDF"), Some("pdf"));
    assert_eq!(resume_extension("cv.doc"), Some("doc"));
    assert_eq!(resume_extension("cv"), None);
  }

  #[test]
  fn payload_uses_form_field_names() {
    let json = serde_json::json!({
      "firstName": "Jane",
      "lastName": "Smith",
      "email": "jane@example.com",
      "linkedIn": "https://linkedin.com/in/jane",
      "visas": ["eb1a"],
      "additionalInfo": "hi",
      "country": "Brazil"
    });
    let p: IntakePayload = serde_json::from_value(json).unwrap();
    assert_eq!(p.linked_in, "https://linkedin.com/in/jane");
    assert!(p.resume.is_none());
  }
}
