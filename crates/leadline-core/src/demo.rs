//! Demonstration leads for seeding an empty installation.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::lead::{Lead, LeadStatus};

struct Seed {
  first:   &'static str,
  last:    &'static str,
  visas:   [&'static str; 2],
  info:    &'static str,
  status:  LeadStatus,
  country: &'static str,
  created: (u32, u32, u32),
  updated: (u32, u32, u32),
}

const SEEDS: [Seed; 4] = [
  Seed {
    first:   "John",
    last:    "Doe",
    visas:   ["o1", "eb1a"],
    info:    "Looking for opportunities in tech",
    status:  LeadStatus::Pending,
    country: "Brazil",
    created: (10, 12, 0),
    updated: (10, 12, 0),
  },
  Seed {
    first:   "Jane",
    last:    "Smith",
    visas:   ["eb2niw", "idk"],
    info:    "Experience in healthcare",
    status:  LeadStatus::ReachedOut,
    country: "Brazil",
    created: (9, 10, 30),
    updated: (11, 14, 45),
  },
  Seed {
    first:   "Michael",
    last:    "Johnson",
    visas:   ["eb1a", "eb2niw"],
    info:    "Senior manager with 10+ years of experience",
    status:  LeadStatus::ReachedOut,
    country: "Canada",
    created: (15, 9, 15),
    updated: (15, 15, 30),
  },
  Seed {
    first:   "Sarah",
    last:    "Williams",
    visas:   ["o1", "idk"],
    info:    "Recent graduate with internship experience",
    status:  LeadStatus::Pending,
    country: "India",
    created: (14, 16, 45),
    updated: (15, 10, 20),
  },
];

fn may_2025((day, hour, minute): (u32, u32, u32)) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2025, 5, day, hour, minute, 0)
    .single()
    .unwrap_or_default()
}

/// Four leads, two of each status, with stable ids `…0001` through `…0004`.
pub fn sample_leads() -> Vec<Lead> {
  SEEDS
    .iter()
    .zip(1u128..)
    .map(|(seed, n)| {
      let handle = format!("{}{}", seed.first, seed.last).to_lowercase();
      Lead {
        id:                Uuid::from_u128(n),
        first_name:        seed.first.to_owned(),
        last_name:         seed.last.to_owned(),
        email:             format!(
          "{}.{}@example.com",
          seed.first.to_lowercase(),
          seed.last.to_lowercase()
        ),
        linked_in_profile: format!("https://linkedin.com/in/{handle}"),
        visas_of_interest: seed.visas.iter().map(|v| (*v).to_owned()).collect(),
        resume_url:        format!("/uploads/resume-{n}.pdf"),
        additional_info:   seed.info.to_owned(),
        country:           Some(seed.country.to_owned()),
        status:            seed.status,
        created_at:        may_2025(seed.created),
        updated_at:        may_2025(seed.updated),
      }
    })
    .collect()
}
