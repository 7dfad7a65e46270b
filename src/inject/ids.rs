//! Instance ids and child subcatchment names.

use std::collections::HashMap;

use super::lookup;
use crate::swmm::Model;
use crate::swmm::schema::SubcatchmentFields;

/// Joins a host subcatchment name and a LID instance id.
pub const CHILD_SEPARATOR: &str = "##";
/// Precedes the numeric suffix added when a child name is already taken.
pub const COLLISION_SEPARATOR: &str = "###";

/// Running per-type counters for one injection run.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counts: HashMap<String, u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `<type>_<n>` where `n` counts instances of `lid_type` so far,
    /// starting at 1.
    pub fn next_instance_id(&mut self, lid_type: &str) -> String {
        let count = self.counts.entry(lid_type.to_string()).or_insert(0);
        *count += 1;
        format!("{lid_type}_{count}")
    }
}

/// First free name among `<host>##<id>`, `<host>##<id>###1`,
/// `<host>##<id>###2`, ... according to `taken`.
pub fn unique_child_name(host: &str, instance_id: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{host}{CHILD_SEPARATOR}{instance_id}");
    if !taken(&base) {
        return base;
    }
    let mut suffix = 1u64;
    loop {
        let candidate = format!("{base}{COLLISION_SEPARATOR}{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Child subcatchment name that does not collide with any subcatchment in
/// `model`.
pub fn child_subcatchment_name(
    model: &Model,
    fields: &SubcatchmentFields,
    host: &str,
    instance_id: &str,
) -> String {
    unique_child_name(host, instance_id, |name| {
        lookup::subcatchment_exists(model, fields, name)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::swmm::reader::parse;

    #[test]
    fn counters_are_per_type() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_instance_id("RB1"), "RB1_1");
        assert_eq!(ids.next_instance_id("BC1"), "BC1_1");
        assert_eq!(ids.next_instance_id("RB1"), "RB1_2");
    }

    #[test]
    fn separate_runs_start_over() {
        let mut first = IdAllocator::new();
        first.next_instance_id("RB1");
        let mut second = IdAllocator::new();
        assert_eq!(second.next_instance_id("RB1"), "RB1_1");
    }

    #[test]
    fn free_base_name_is_used() {
        assert_eq!(unique_child_name("S1", "RB_1", |_| false), "S1##RB_1");
    }

    #[test]
    fn collisions_get_increasing_suffixes() {
        for depth in 0..25 {
            let mut taken: HashSet<String> = HashSet::new();
            taken.insert("S1##RB_1".to_string());
            for n in 1..=depth {
                taken.insert(format!("S1##RB_1###{n}"));
            }
            let name = unique_child_name("S1", "RB_1", |c| taken.contains(c));
            assert!(!taken.contains(&name), "depth {depth}: {name} collides");
            assert_eq!(name, format!("S1##RB_1###{}", depth + 1));
        }
    }

    #[test]
    fn checks_against_model_subcatchments() {
        let model = parse(
            "[SUBCATCHMENTS]\nS1 RG1 J1 2 80 100 0.5 0\nS1##RB_1 RG1 J1 0.1 0 100 0.5 0\n",
        )
        .expect("parse");
        let name = child_subcatchment_name(&model, &SubcatchmentFields::default(), "S1", "RB_1");
        assert_eq!(name, "S1##RB_1###1");
    }
}
