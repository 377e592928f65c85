//! Payment urgency as shown to people, derived from the paid flag and the due
//! date. Nothing here is persisted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayStatus {
  Paid,
  Overdue,
  Pending,
  DueToday,
}

impl DisplayStatus {
  pub fn derive(paid: bool, due_date: NaiveDate, today: NaiveDate) -> Self {
    if paid {
      DisplayStatus::Paid
    } else if due_date < today {
      DisplayStatus::Overdue
    } else if due_date > today {
      DisplayStatus::Pending
    } else {
      DisplayStatus::DueToday
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      DisplayStatus::Paid => "Paid",
      DisplayStatus::Overdue => "Overdue",
      DisplayStatus::Pending => "Pending",
      DisplayStatus::DueToday => "Due Today",
    }
  }
}

impl fmt::Display for DisplayStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderTier {
  #[default]
  Gentle,
  Urgent,
  Final,
}

impl ReminderTier {
  /// Unrecognised or missing tiers fall back to the gentle reminder.
  pub fn parse_lenient(value: Option<&str>) -> Self {
    value
      .and_then(|v| ReminderTier::from_str(v).ok())
      .unwrap_or_default()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ReminderTier::Gentle => "gentle",
      ReminderTier::Urgent => "urgent",
      ReminderTier::Final => "final",
    }
  }
}

impl FromStr for ReminderTier {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "gentle" => Ok(ReminderTier::Gentle),
      "urgent" => Ok(ReminderTier::Urgent),
      "final" => Ok(ReminderTier::Final),
      other => Err(format!("Unknown reminder tier: {}", other)),
    }
  }
}

/// `M/D/YYYY` without zero padding.
pub fn format_short_date(date: NaiveDate) -> String {
  format!("{}/{}/{}", date.month(), date.day(), date.year())
}

pub fn reminder_copy(tier: ReminderTier, invoice_number: &str, due_date: NaiveDate) -> String {
  match tier {
    ReminderTier::Gentle => format!(
      "Gentle reminder: Your invoice {} is due on {}.",
      invoice_number,
      format_short_date(due_date)
    ),
    ReminderTier::Urgent => format!(
      "URGENT: Your invoice {} is overdue. Please make payment immediately.",
      invoice_number
    ),
    ReminderTier::Final => format!(
      "FINAL NOTICE: Your invoice {} is seriously overdue. Please contact us immediately to avoid further action.",
      invoice_number
    ),
  }
}
