//! Snapshot tiers and the interval table

use chrono::Duration;

/// A retention tier: a name and the minimum spacing between its snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    name: &'static str,
    interval: Duration,
}

impl Tier {
    pub const fn new(name: &'static str, interval: Duration) -> Self {
        Self { name, interval }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Ordered tiers, coarsest first, plus the jitter tolerance
///
/// Order drives the create cascade: a snapshot at tier `i` also satisfies the
/// spacing requirement of every tier finer than `i`.
#[derive(Debug, Clone)]
pub struct IntervalTable {
    tiers: Vec<Tier>,
    tolerance: Duration,
}

impl IntervalTable {
    /// Build a table from tiers ordered coarsest to finest
    pub fn new(tiers: Vec<Tier>, tolerance: Duration) -> Self {
        Self { tiers, tolerance }
    }

    /// quarterly, monthly, weekly, daily, hourly with a one minute tolerance
    pub fn standard() -> Self {
        Self::new(
            vec![
                Tier::new("quarterly", Duration::days(90)),
                Tier::new("monthly", Duration::days(30)),
                Tier::new("weekly", Duration::days(7)),
                Tier::new("daily", Duration::days(1)),
                Tier::new("hourly", Duration::hours(1)),
            ],
            Duration::minutes(1),
        )
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Subtracted from every interval before the due comparison
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Position of a tier by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.name == name)
    }

    /// Names of the tier at `index` and every coarser tier
    pub fn names_through(&self, index: usize) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().take(index + 1).map(|t| t.name)
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a IntervalTable {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}
