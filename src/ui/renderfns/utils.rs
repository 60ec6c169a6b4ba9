use chrono::NaiveDate;
use ratatui::prelude::Color;

use crate::api::types::Allocation;

/// Truncate a string to a maximum number of characters, adding "..." if
/// truncated. Counts characters, not bytes, so multi-byte names survive.
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    return s.to_string();
  }
  let keep = max_len.saturating_sub(3);
  let truncated: String = s.chars().take(keep).collect();
  format!("{}...", truncated)
}

/// Get the display color for a stock quantity
pub fn qty_color(qty: i64) -> Color {
  if qty > 0 {
    Color::Green
  } else if qty == 0 {
    Color::DarkGray
  } else {
    Color::Red
  }
}

/// Age bucket for a purchase order, by days since purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
  Fresh,
  Aging,
  Overdue,
}

impl AgeBucket {
  /// Bucket boundaries: under 7 days fresh, up to 30 aging, older overdue.
  pub fn of(purchase_date: NaiveDate, today: NaiveDate) -> Self {
    let days = (today - purchase_date).num_days();
    if days < 7 {
      AgeBucket::Fresh
    } else if days <= 30 {
      AgeBucket::Aging
    } else {
      AgeBucket::Overdue
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      AgeBucket::Fresh => "fresh",
      AgeBucket::Aging => "aging",
      AgeBucket::Overdue => "overdue",
    }
  }

  pub fn color(&self) -> Color {
    match self {
      AgeBucket::Fresh => Color::Green,
      AgeBucket::Aging => Color::Yellow,
      AgeBucket::Overdue => Color::Red,
    }
  }
}

/// One-line summary of per-source allocations for table cells
pub fn format_allocations(allocations: &[Allocation]) -> String {
  allocations
    .iter()
    .map(|a| match a.percent {
      Some(percent) => format!("{} {} ({:.0}%)", a.source_name, a.qty, percent),
      None => format!("{} {}", a.source_name, a.qty),
    })
    .collect::<Vec<_>>()
    .join("  ")
}

/// Render an optional date for table cells
pub fn format_date(date: Option<NaiveDate>) -> String {
  match date {
    Some(d) => d.format("%Y-%m-%d").to_string(),
    None => "-".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    // Byte-indexed slicing would panic here.
    assert_eq!(truncate("پیچ گوشتی دو سو", 8), "پیچ گ...");
  }

  #[test]
  fn test_qty_color() {
    assert_eq!(qty_color(5), Color::Green);
    assert_eq!(qty_color(0), Color::DarkGray);
    assert_eq!(qty_color(-2), Color::Red);
  }

  #[test]
  fn test_age_bucket_boundaries() {
    let today = date(2026, 8, 28);
    assert_eq!(AgeBucket::of(date(2026, 8, 28), today), AgeBucket::Fresh);
    assert_eq!(AgeBucket::of(date(2026, 8, 22), today), AgeBucket::Fresh);
    assert_eq!(AgeBucket::of(date(2026, 8, 21), today), AgeBucket::Aging);
    assert_eq!(AgeBucket::of(date(2026, 7, 29), today), AgeBucket::Aging);
    assert_eq!(AgeBucket::of(date(2026, 7, 28), today), AgeBucket::Overdue);
  }

  #[test]
  fn test_format_allocations() {
    let allocations = vec![
      Allocation {
        source_id: 1,
        source_name: "Main".to_string(),
        qty: 12,
        percent: Some(20.0),
      },
      Allocation {
        source_id: 2,
        source_name: "Outlet".to_string(),
        qty: 3,
        percent: None,
      },
    ];
    assert_eq!(format_allocations(&allocations), "Main 12 (20%)  Outlet 3");
  }

  #[test]
  fn test_format_date() {
    assert_eq!(format_date(Some(date(2026, 1, 5))), "2026-01-05");
    assert_eq!(format_date(None), "-");
  }
}
