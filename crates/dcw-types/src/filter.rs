use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Complaint, Priority, Status, UnknownVariant};

/// Allowed values per complaint field. `None` leaves the field unrestricted,
/// which is the same as allowing every value present in the registry.
/// `Some(empty)` matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub categories: Option<BTreeSet<Category>>,
    pub priorities: Option<BTreeSet<Priority>>,
    pub statuses: Option<BTreeSet<Status>>,
}

impl ComplaintFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn categories(mut self, values: impl IntoIterator<Item = Category>) -> Self {
        self.categories = Some(values.into_iter().collect());
        self
    }

    pub fn priorities(mut self, values: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = Some(values.into_iter().collect());
        self
    }

    pub fn statuses(mut self, values: impl IntoIterator<Item = Status>) -> Self {
        self.statuses = Some(values.into_iter().collect());
        self
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        allows(&self.categories, &complaint.category)
            && allows(&self.priorities, &complaint.priority)
            && allows(&self.statuses, &complaint.status)
    }
}

fn allows<T: Ord>(set: &Option<BTreeSet<T>>, value: &T) -> bool {
    set.as_ref().is_none_or(|s| s.contains(value))
}

/// Parse a comma-separated list such as `WiFi,Hostel`. Blank entries are
/// skipped, so an empty string yields an empty set.
pub fn parse_set<T>(raw: &str) -> Result<BTreeSet<T>, UnknownVariant>
where
    T: FromStr<Err = UnknownVariant> + Ord,
{
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::from_str)
        .collect()
}

/// Distinct values observed in the registry, in declaration order.
/// These are the default selections for the admin filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: Vec<Category>,
    pub priorities: Vec<Priority>,
    pub statuses: Vec<Status>,
}

impl Facets {
    pub fn observe<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        let mut categories = BTreeSet::new();
        let mut priorities = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        for c in complaints {
            categories.insert(c.category);
            priorities.insert(c.priority);
            statuses.insert(c.status);
        }
        Self {
            categories: categories.into_iter().collect(),
            priorities: priorities.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }
}

/// Complaint counts per field value. Only values that occur are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_status: BTreeMap<Status, usize>,
}

impl Stats {
    pub fn tally<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        let mut stats = Stats::default();
        for c in complaints {
            stats.total += 1;
            *stats.by_category.entry(c.category).or_default() += 1;
            *stats.by_priority.entry(c.priority).or_default() += 1;
            *stats.by_status.entry(c.status).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::ComplaintId;

    fn complaint(id: u64, category: Category, priority: Priority, status: Status) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: ComplaintId(id),
            submitter_name: "Bob".into(),
            submitter_id: "bob@example.com".into(),
            category,
            priority,
            details: "details".into(),
            attachment: None,
            status,
            note: None,
            submitted_by: "bob@example.com".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unrestricted_filter_matches_everything() {
        let c = complaint(1, Category::Lab, Priority::Low, Status::Resolved);
        assert!(ComplaintFilter::all().matches(&c));
    }

    #[test]
    fn every_field_must_be_allowed() {
        let c = complaint(1, Category::WiFi, Priority::High, Status::Pending);
        let filter = ComplaintFilter::all()
            .categories([Category::WiFi, Category::Hostel])
            .priorities([Priority::High]);
        assert!(filter.matches(&c));

        let filter = filter.statuses([Status::Resolved]);
        assert!(!filter.matches(&c));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let c = complaint(1, Category::WiFi, Priority::High, Status::Pending);
        assert!(!ComplaintFilter::all().categories([]).matches(&c));
    }

    #[test]
    fn parse_set_handles_lists_and_blanks() {
        let set: BTreeSet<Category> = parse_set("WiFi, Hostel,,").unwrap();
        assert_eq!(set, BTreeSet::from([Category::WiFi, Category::Hostel]));

        let empty: BTreeSet<Status> = parse_set("").unwrap();
        assert!(empty.is_empty());

        assert!(parse_set::<Priority>("High,Critical").is_err());
    }

    #[test]
    fn facets_and_stats_only_report_observed_values() {
        let complaints = [
            complaint(1, Category::WiFi, Priority::High, Status::Pending),
            complaint(2, Category::WiFi, Priority::Low, Status::Resolved),
            complaint(3, Category::Mess, Priority::Low, Status::Pending),
        ];

        let facets = Facets::observe(&complaints);
        assert_eq!(facets.categories, vec![Category::WiFi, Category::Mess]);
        assert_eq!(facets.priorities, vec![Priority::High, Priority::Low]);

        let stats = Stats::tally(&complaints);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_category[&Category::WiFi], 2);
        assert_eq!(stats.by_priority.get(&Priority::Medium), None);
        assert_eq!(stats.by_status[&Status::Pending], 2);

        assert_eq!(Facets::observe(&[] as &[Complaint]), Facets::default());
    }

    #[test]
    fn stats_serialize_with_named_keys() {
        let stats = Stats::tally(&[complaint(1, Category::WiFi, Priority::High, Status::Pending)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_category"]["WiFi"], 1);
        assert_eq!(json["by_status"]["Pending"], 1);
    }
}
