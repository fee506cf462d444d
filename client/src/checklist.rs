//! # Bottle Checklist
//!
//! Per-sample tally of prepared bottles, keyed by bottle code.
//!
//! ## Merge rule
//!
//! Every resolved scan reports a list of deltas. For each delta:
//! - unknown codes are inserted with `jumlah = 0` first
//! - descriptive fields (label, category, required count) follow the delta,
//!   unless the delta leaves them blank
//! - `jumlah` grows by `add` but never past `disiapkan`; an entry already at
//!   or over its requirement is pinned to the requirement it had before the
//!   delta, even when the delta raises it
use crate::models::{BottleDelta, BottleEntry, MISSING_LABEL};

impl BottleEntry {
    /// Prepared count matches a non-zero requirement.
    pub fn is_ready(&self) -> bool {
        self.disiapkan > 0 && self.jumlah == self.disiapkan
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BottleChecklist {
    entries: Vec<BottleEntry>,
}

impl BottleChecklist {
    /// Starts from the backend's record of earlier scans of a sample.
    pub fn from_baseline(baseline: Vec<BottleEntry>) -> Self {
        let mut checklist = Self::default();

        for entry in baseline {
            match checklist.position(&entry.koding) {
                Some(index) => checklist.entries[index] = entry,
                None => checklist.entries.push(entry),
            }
        }

        checklist
    }

    pub fn merge(&mut self, delta: &BottleDelta) {
        let index = self.position(&delta.koding).unwrap_or_else(|| {
            self.entries.push(BottleEntry {
                koding: delta.koding.clone(),
                label: delta.label.clone(),
                disiapkan: delta.disiapkan,
                jumlah: 0,
                category: delta.category.clone(),
            });

            self.entries.len() - 1
        });

        let entry = &mut self.entries[index];
        let pinned = (entry.jumlah >= entry.disiapkan).then_some(entry.disiapkan);

        if delta.label != MISSING_LABEL {
            entry.label = delta.label.clone();
        }
        if !delta.category.0.is_empty() {
            entry.category = delta.category.clone();
        }
        if delta.disiapkan > 0 {
            entry.disiapkan = delta.disiapkan;
        }

        entry.jumlah = match pinned {
            Some(requirement) => requirement,
            None => entry.jumlah.saturating_add(delta.add).min(entry.disiapkan),
        };
    }

    pub fn merge_all<'a>(&mut self, deltas: impl IntoIterator<Item = &'a BottleDelta>) {
        for delta in deltas {
            self.merge(delta);
        }
    }

    /// Sets the prepared count, clamped to the requirement. Returns the stored value.
    pub fn set_quantity(&mut self, koding: &str, jumlah: u32) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|entry| entry.koding == koding)?;
        entry.jumlah = jumlah.min(entry.disiapkan);

        Some(entry.jumlah)
    }

    pub fn get(&self, koding: &str) -> Option<&BottleEntry> {
        self.entries.iter().find(|entry| entry.koding == koding)
    }

    pub fn contains(&self, koding: &str) -> bool {
        self.position(koding).is_some()
    }

    pub fn entries(&self) -> &[BottleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ready_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_ready()).count()
    }

    pub fn all_ready(&self) -> bool {
        !self.is_empty() && self.ready_count() == self.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, koding: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.koding == koding)
    }
}

#[cfg(test)]
mod tests {
    use super::BottleChecklist;
    use crate::models::{BottleDelta, BottleEntry, Category};

    fn entry(koding: &str, disiapkan: u32, jumlah: u32) -> BottleEntry {
        BottleEntry {
            koding: koding.to_string(),
            label: format!("Bottle {koding}"),
            disiapkan,
            jumlah,
            category: Category("1-Air".to_string()),
        }
    }

    fn delta(koding: &str, disiapkan: u32, add: u32) -> BottleDelta {
        BottleDelta {
            koding: koding.to_string(),
            label: format!("Bottle {koding}"),
            disiapkan,
            add,
            category: Category("1-Air".to_string()),
        }
    }

    #[test]
    fn test_merge_clamps_at_requirement() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 5, 3)]);
        checklist.merge(&delta("A", 5, 4));

        assert_eq!(checklist.get("A").unwrap().jumlah, 5);
        assert!(checklist.get("A").unwrap().is_ready());
    }

    #[test]
    fn test_merge_below_requirement() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 5, 1)]);
        checklist.merge(&delta("A", 5, 2));

        assert_eq!(checklist.get("A").unwrap().jumlah, 3);
        assert!(!checklist.get("A").unwrap().is_ready());
    }

    #[test]
    fn test_merge_pinned_when_complete() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 5, 5)]);
        checklist.merge(&delta("A", 5, 1));

        assert_eq!(checklist.get("A").unwrap().jumlah, 5);

        let mut over = BottleChecklist::from_baseline(vec![entry("B", 2, 7)]);
        over.merge(&delta("B", 2, 1));

        assert_eq!(over.get("B").unwrap().jumlah, 2);
    }

    #[test]
    fn test_complete_entry_ignores_raised_requirement() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 3, 3)]);
        checklist.merge(&delta("A", 5, 1));

        let merged = checklist.get("A").unwrap();
        assert_eq!(merged.disiapkan, 5);
        assert_eq!(merged.jumlah, 3);
        assert!(!merged.is_ready());
    }

    #[test]
    fn test_new_code_starts_from_zero() {
        let mut checklist = BottleChecklist::default();
        checklist.merge(&delta("N", 4, 0));
        checklist.merge(&delta("M", 4, 3));

        assert_eq!(checklist.get("N").unwrap().jumlah, 0);
        assert_eq!(checklist.get("M").unwrap().jumlah, 3);
        assert_eq!(checklist.len(), 2);
    }

    #[test]
    fn test_one_entry_per_code() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 3, 0), entry("A", 3, 1)]);
        checklist.merge(&delta("A", 3, 1));
        checklist.merge(&delta("A", 3, 1));

        assert_eq!(checklist.len(), 1);
        assert_eq!(checklist.get("A").unwrap().jumlah, 3);
    }

    #[test]
    fn test_delta_updates_description() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 3, 1)]);
        let mut update = delta("A", 6, 1);
        update.label = "Amber 500ml".to_string();
        checklist.merge(&update);

        let merged = checklist.get("A").unwrap();
        assert_eq!(merged.label, "Amber 500ml");
        assert_eq!(merged.disiapkan, 6);
        assert_eq!(merged.jumlah, 2);
    }

    #[test]
    fn test_blank_delta_keeps_description() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 3, 0)]);
        let mut update = delta("A", 0, 1);
        update.label = "-".to_string();
        update.category = Category::default();
        checklist.merge(&update);

        let merged = checklist.get("A").unwrap();
        assert_eq!(merged.label, "Bottle A");
        assert_eq!(merged.category, Category("1-Air".to_string()));
        assert_eq!(merged.disiapkan, 3);
        assert_eq!(merged.jumlah, 1);
    }

    #[test]
    fn test_set_quantity_bounds() {
        let mut checklist = BottleChecklist::from_baseline(vec![entry("A", 4, 0)]);

        assert_eq!(checklist.set_quantity("A", 9), Some(4));
        assert_eq!(checklist.set_quantity("A", 0), Some(0));
        assert_eq!(checklist.set_quantity("Z", 1), None);
    }

    #[test]
    fn test_ready_needs_requirement() {
        assert!(!entry("A", 0, 0).is_ready());
        assert!(entry("A", 2, 2).is_ready());

        let checklist = BottleChecklist::from_baseline(vec![entry("A", 2, 2), entry("B", 1, 0)]);
        assert_eq!(checklist.ready_count(), 1);
        assert!(!checklist.all_ready());
        assert!(!BottleChecklist::default().all_ready());
    }
}
