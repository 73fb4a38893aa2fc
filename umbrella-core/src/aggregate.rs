use crate::taxonomy::Category;
use crate::types::ThreatEvent;

/// Counts for one probe run. `total` counts every event; the per-category
/// counters only see labels that are part of the taxonomy, so their sum can
/// be larger or smaller than `total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
  pub total: u64,
  per_category: [u64; Category::COUNT],
}

impl AggregationResult {
  pub fn count(&self, category: Category) -> u64 {
    self.per_category[category as usize]
  }

  /// Per-category counts in reporting order, zeroes included.
  pub fn per_category(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
    Category::all().map(move |c| (c, self.count(c)))
  }
}

pub fn total_blocks(events: &[ThreatEvent]) -> u64 {
  events.len() as u64
}

pub fn blocks_per_category(events: &[ThreatEvent]) -> [u64; Category::COUNT] {
  let mut counts = [0u64; Category::COUNT];
  for event in events {
    for label in &event.categories {
      if let Some(category) = Category::from_label(label) {
        counts[category as usize] += 1;
      }
    }
  }
  counts
}

pub fn aggregate(events: &[ThreatEvent]) -> AggregationResult {
  AggregationResult {
    total: total_blocks(events),
    per_category: blocks_per_category(events),
  }
}
