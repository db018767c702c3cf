//! Family aggregate: parents and children believed to share a household.

use crate::error::MergeError;
use crate::model::person::{Person, same_identity};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Shared contact values reported at family level are capped at this many.
const MAX_SHARED_VALUES: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Family {
    parents: Vec<Person>,
    children: Vec<Person>,
}

/// Where a family lives.
///
/// Families with children report the first child's street address and city;
/// parent-only families only know the parent's city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FamilyAddress {
    Street {
        address: Option<String>,
        city: Option<String>,
    },
    CityOnly {
        city: Option<String>,
    },
}

impl FamilyAddress {
    /// Components that are present, in display order.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            FamilyAddress::Street { address, city } => {
                [address, city].into_iter().filter_map(|p| p.as_deref()).collect()
            }
            FamilyAddress::CityOnly { city } => city.as_deref().into_iter().collect(),
        }
    }
}

impl Family {
    /// Invalid (blank-named) persons are dropped.
    pub fn new(parents: Vec<Person>, children: Vec<Person>) -> Self {
        Self {
            parents: parents.into_iter().filter(Person::is_valid).collect(),
            children: children.into_iter().filter(Person::is_valid).collect(),
        }
    }

    pub fn parents(&self) -> &[Person] {
        &self.parents
    }

    pub fn children(&self) -> &[Person] {
        &self.children
    }

    /// Parents first, then children.
    pub fn members(&self) -> impl Iterator<Item = &Person> {
        self.parents.iter().chain(self.children.iter())
    }

    pub fn len(&self) -> usize {
        self.parents.len() + self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_names(&self) -> BTreeSet<&str> {
        self.members().map(|p| p.last_name.as_str()).collect()
    }

    /// Display name of the household.
    ///
    /// When one last name starts or ends with another (hyphenated or married
    /// names), the first containing name found in a nested scan over the sorted
    /// names wins. Otherwise all last names are joined with " and ".
    pub fn family_name(&self) -> String {
        let names: Vec<&str> = self.last_names().into_iter().collect();
        for &outer in &names {
            for &inner in &names {
                if outer != inner && (outer.starts_with(inner) || outer.ends_with(inner)) {
                    return format!("{} family", outer);
                }
            }
        }
        format!("{} family", names.join(" and "))
    }

    /// The sole member of a one-person family.
    pub fn individual(&self) -> Option<&Person> {
        match (self.parents.as_slice(), self.children.as_slice()) {
            ([only], []) | ([], [only]) => Some(only),
            _ => None,
        }
    }

    /// Phone numbers held by more than one member, most common first.
    pub fn family_phone(&self) -> Vec<&str> {
        shared_values(self.members().map(|p| p.phone.as_str()))
    }

    /// Email addresses held by more than one member, most common first.
    pub fn family_email(&self) -> Vec<&str> {
        shared_values(self.members().map(|p| p.email.as_str()))
    }

    pub fn family_address(&self) -> Option<FamilyAddress> {
        if let Some(child) = self.children.first() {
            return Some(FamilyAddress::Street {
                address: child.address.clone(),
                city: child.city.clone(),
            });
        }
        self.parents.first().map(|parent| FamilyAddress::CityOnly {
            city: parent.city.clone(),
        })
    }

    pub fn has_parent(&self, candidate: &Person) -> bool {
        candidate.is_valid() && self.parents.iter().any(|p| same_identity(p, candidate))
    }

    pub fn add_or_update_parent(&mut self, parent: Person) -> Result<(), MergeError> {
        add_or_update(&mut self.parents, parent)
    }

    pub fn add_or_update_child(&mut self, child: Person) -> Result<(), MergeError> {
        add_or_update(&mut self.children, child)
    }

    /// Alphabetical by (last name, first name); stable.
    pub fn sort_members(&mut self) {
        let key = |a: &Person, b: &Person| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        };
        self.parents.sort_by(key);
        self.children.sort_by(key);
    }
}

fn add_or_update(group: &mut Vec<Person>, incoming: Person) -> Result<(), MergeError> {
    if !incoming.is_valid() {
        return Ok(());
    }
    match group.iter_mut().find(|p| same_identity(p, &incoming)) {
        Some(existing) => existing.update(&incoming),
        None => {
            group.push(incoming);
            Ok(())
        }
    }
}

/// Non-empty values seen more than once, ordered by descending count with
/// ties kept in first-seen order.
fn shared_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        match slot.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .take(MAX_SHARED_VALUES)
        .map(|(v, _)| v)
        .collect()
}
