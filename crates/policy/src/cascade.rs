//! Create cascade
//!
//! Tiers are walked coarsest first. A tier is due when nothing exists at that
//! tier or any coarser one, or when the newest such snapshot is at least
//! `interval - tolerance` old. The first due tier wins, so one run creates at
//! most one snapshot per filesystem.

use chrono::NaiveDateTime;
use relsnap_core::{IntervalTable, Inventory, Result, Tier};
use tracing::debug;

/// Whether the tier at `index` is due at `now`
///
/// Exactly reaching the threshold counts as due. A threshold past the end of
/// the calendar is never reached.
pub fn tier_is_due(
    table: &IntervalTable,
    inventory: &Inventory,
    index: usize,
    now: NaiveDateTime,
) -> bool {
    let tier = &table.tiers()[index];
    match inventory.newest_through(table, index) {
        None => true,
        Some(newest) => newest
            .checked_add_signed(tier.interval() - table.tolerance())
            .is_some_and(|threshold| threshold <= now),
    }
}

/// Pick the coarsest enabled tier that is due, if any
///
/// `count_for` is asked for each tier's retention count as the walk reaches
/// it; tiers after the chosen one are never read. A count of zero or less
/// disables the tier.
pub fn plan_create<'t, F>(
    table: &'t IntervalTable,
    inventory: &Inventory,
    now: NaiveDateTime,
    mut count_for: F,
) -> Result<Option<&'t Tier>>
where
    F: FnMut(&Tier) -> Result<i64>,
{
    for (index, tier) in table.iter().enumerate() {
        let count = count_for(tier)?;
        if count <= 0 {
            debug!("  {}: disabled (count {})", tier.name(), count);
            continue;
        }

        if tier_is_due(table, inventory, index, now) {
            debug!("  {}: due", tier.name());
            return Ok(Some(tier));
        }

        debug!(
            "  {}: not due (newest {})",
            tier.name(),
            inventory
                .newest_through(table, index)
                .map(|ts| ts.to_string())
                .unwrap_or_default()
        );
    }

    Ok(None)
}
