//! Family building: group member rows by shared parents, then fold in adult volunteers.

use crate::error::{RosterError, RosterResult};
use crate::model::Family;
use crate::source::{MEMBERS_SHEET, MemberRecord, VOLUNTEERS_SHEET, VolunteerRecord};

/// Build the full family list from parsed member and volunteer rows.
///
/// Members are grouped first, volunteers are then matched against the
/// resulting parents, and finally every family's members are sorted.
pub fn build_families(
    members: Vec<MemberRecord>,
    volunteers: Vec<VolunteerRecord>,
) -> RosterResult<Vec<Family>> {
    let mut families = group_members(members)?;
    unify_volunteers(&mut families, volunteers)?;
    for family in &mut families {
        family.sort_members();
    }
    tracing::info!("built {} families", families.len());
    Ok(families)
}

/// Group member rows into families.
///
/// A row joins the first family (in creation order) that already has a parent
/// matching either of the row's parents; otherwise it starts a new family.
pub fn group_members(members: Vec<MemberRecord>) -> RosterResult<Vec<Family>> {
    let mut families: Vec<Family> = Vec::new();

    for record in members {
        let MemberRecord {
            line,
            member,
            parent1,
            parent2,
        } = record;
        let wrap = |source| RosterError::Merge {
            sheet: MEMBERS_SHEET,
            line,
            source,
        };

        let existing = families
            .iter_mut()
            .find(|f| f.has_parent(&parent1) || f.has_parent(&parent2));

        match existing {
            Some(family) => {
                tracing::debug!(
                    "line {}: {} joins {}",
                    line,
                    member.full_name(),
                    family.family_name()
                );
                family.add_or_update_child(member).map_err(wrap)?;
                family.add_or_update_parent(parent1).map_err(wrap)?;
                family.add_or_update_parent(parent2).map_err(wrap)?;
            }
            None => {
                let family = Family::new(vec![parent1, parent2], vec![member]);
                if family.is_empty() {
                    tracing::warn!("{} line {}: no valid person, row ignored", MEMBERS_SHEET, line);
                    continue;
                }
                families.push(family);
            }
        }
    }

    for family in &mut families {
        family.sort_members();
    }
    Ok(families)
}

/// Merge adult volunteers into the parents they match, or give each unmatched
/// volunteer a family of their own. Later volunteers can match families
/// created earlier in this pass.
pub fn unify_volunteers(
    families: &mut Vec<Family>,
    volunteers: Vec<VolunteerRecord>,
) -> RosterResult<()> {
    for VolunteerRecord { line, person } in volunteers {
        if !person.is_valid() {
            tracing::debug!("{} line {}: blank volunteer ignored", VOLUNTEERS_SHEET, line);
            continue;
        }
        match families.iter_mut().find(|f| f.has_parent(&person)) {
            Some(family) => {
                family
                    .add_or_update_parent(person)
                    .map_err(|source| RosterError::Merge {
                        sheet: VOLUNTEERS_SHEET,
                        line,
                        source,
                    })?;
            }
            None => families.push(Family::new(vec![person], Vec::new())),
        }
    }
    Ok(())
}

/// Keep only children aged `min_age` or older.
///
/// Families left without children are dropped (parents alone never qualify).
/// Returns the surviving families and the number of children kept.
pub fn filter_min_age(families: Vec<Family>, min_age: u32) -> (Vec<Family>, usize) {
    let mut kept_children = 0;
    let filtered: Vec<Family> = families
        .into_iter()
        .filter_map(|family| {
            let children: Vec<_> = family
                .children()
                .iter()
                .filter(|c| c.age >= min_age)
                .cloned()
                .collect();
            if children.is_empty() {
                return None;
            }
            kept_children += children.len();
            Some(Family::new(family.parents().to_vec(), children))
        })
        .collect();
    (filtered, kept_children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use crate::model::Person;
    use pretty_assertions::assert_eq;

    fn record(line: usize, member: Person, parent1: Person, parent2: Person) -> MemberRecord {
        MemberRecord {
            line,
            member,
            parent1,
            parent2,
        }
    }

    fn volunteer(line: usize, person: Person) -> VolunteerRecord {
        VolunteerRecord { line, person }
    }

    fn names(people: &[Person]) -> Vec<String> {
        people.iter().map(Person::full_name).collect()
    }

    #[test]
    fn disjoint_parents_give_one_family_per_row() {
        let rows: Vec<MemberRecord> = (0..5)
            .map(|i| {
                record(
                    i + 2,
                    Person::new(format!("Kid{}", i), "Doe"),
                    Person::new(format!("Parent{}", i), "Doe"),
                    Person::default(),
                )
            })
            .collect();
        let families = group_members(rows).unwrap();
        assert_eq!(families.len(), 5);
        assert!(families.iter().all(|f| f.children().len() == 1));
    }

    #[test]
    fn blank_parents_never_join_families() {
        let rows = vec![
            record(2, Person::new("Bo", "Lee"), Person::default(), Person::default()),
            record(3, Person::new("Cy", "Chan"), Person::default(), Person::default()),
        ];
        let families = group_members(rows).unwrap();
        assert_eq!(families.len(), 2);
        assert!(families.iter().all(|f| f.individual().is_some()));
    }

    #[test]
    fn siblings_join_through_either_parent() {
        let rows = vec![
            record(
                2,
                Person::new("Zoe", "Lee"),
                Person::new("Ann", "Lee"),
                Person::default(),
            ),
            record(
                3,
                Person::new("Bo", "Lee"),
                Person::new("Wei", "Chan").with_phone("555"),
                Person::new("ANN", "LEE").with_phone("556"),
            ),
        ];
        let families = group_members(rows).unwrap();
        assert_eq!(families.len(), 1);
        let fam = &families[0];
        assert_eq!(names(fam.children()), vec!["Bo Lee", "Zoe Lee"]);
        assert_eq!(names(fam.parents()), vec!["Wei Chan", "Ann Lee"]);
        assert_eq!(fam.parents()[1].phone, "556");
        assert_eq!(fam.family_name(), "Chan and Lee family");
    }

    #[test]
    fn repeated_member_row_merges_child() {
        let rows = vec![
            record(
                2,
                Person::new("Bo", "Lee").with_email("bo@x.org"),
                Person::new("Ann", "Lee"),
                Person::default(),
            ),
            record(
                3,
                Person::new("Bo", "Lee").with_address("1 Main St"),
                Person::new("Ann", "Lee"),
                Person::default(),
            ),
        ];
        let families = group_members(rows).unwrap();
        assert_eq!(families[0].children().len(), 1);
        assert_eq!(families[0].children()[0].email, "bo@x.org");
        assert_eq!(families[0].children()[0].address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn conflicting_parent_phone_is_tagged_with_line() {
        let rows = vec![
            record(
                2,
                Person::new("Bo", "Lee"),
                Person::new("Ann", "Lee").with_phone("555-0100"),
                Person::default(),
            ),
            record(
                7,
                Person::new("Zoe", "Lee"),
                Person::new("Ann", "Lee").with_phone("555-0199"),
                Person::default(),
            ),
        ];
        match group_members(rows) {
            Err(RosterError::Merge {
                sheet,
                line,
                source: MergeError::FieldConflict { field, .. },
            }) => {
                assert_eq!(sheet, MEMBERS_SHEET);
                assert_eq!(line, 7);
                assert_eq!(field, "phone");
            }
            other => panic!("expected merge conflict, got {:?}", other),
        }
    }

    #[test]
    fn row_with_no_valid_person_is_ignored() {
        let rows = vec![record(2, Person::default(), Person::default(), Person::default())];
        assert!(group_members(rows).unwrap().is_empty());
    }

    #[test]
    fn volunteers_merge_into_matching_parent() {
        let mut families = group_members(vec![record(
            2,
            Person::new("Bo", "Lee"),
            Person::new("Ann", "Lee"),
            Person::default(),
        )])
        .unwrap();
        unify_volunteers(
            &mut families,
            vec![volunteer(
                2,
                Person::new("ann", "lee")
                    .with_role("Club Leader")
                    .with_email("ann@x.org"),
            )],
        )
        .unwrap();
        assert_eq!(families.len(), 1);
        let ann = &families[0].parents()[0];
        assert_eq!(ann.role.as_deref(), Some("Club Leader"));
        assert_eq!(ann.email, "ann@x.org");
    }

    #[test]
    fn unmatched_volunteers_get_standalone_families_that_later_rows_can_match() {
        let mut families = Vec::new();
        unify_volunteers(
            &mut families,
            vec![
                volunteer(2, Person::new("Ann", "Lee").with_role("Leader")),
                volunteer(3, Person::new("Ann", "Lee").with_role("Treasurer")),
                volunteer(4, Person::default()),
            ],
        )
        .unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(
            families[0].parents()[0].role.as_deref(),
            Some("Leader, Treasurer")
        );
        assert!(families[0].children().is_empty());
    }

    #[test]
    fn volunteer_conflict_is_tagged_with_volunteer_sheet() {
        let mut families = vec![Family::new(
            vec![Person::new("Ann", "Lee").with_city("Davis")],
            vec![],
        )];
        let err = unify_volunteers(
            &mut families,
            vec![volunteer(5, Person::new("Ann", "Lee").with_city("Woodland"))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RosterError::Merge {
                sheet: VOLUNTEERS_SHEET,
                line: 5,
                ..
            }
        ));
    }

    #[test]
    fn build_families_sorts_members() {
        let families = build_families(
            vec![
                record(2, Person::new("Zoe", "Lee"), Person::new("Wei", "Lee"), Person::default()),
                record(3, Person::new("Al", "Lee"), Person::new("Wei", "Lee"), Person::default()),
            ],
            vec![volunteer(2, Person::new("Kim", "Park"))],
        )
        .unwrap();
        assert_eq!(families.len(), 2);
        assert_eq!(names(families[0].children()), vec!["Al Lee", "Zoe Lee"]);
        assert_eq!(families[1].individual().unwrap().full_name(), "Kim Park");
    }

    #[test]
    fn age_filter_keeps_qualifying_children_and_drops_empty_families() {
        let families = vec![
            Family::new(
                vec![Person::new("Ann", "Lee")],
                vec![
                    Person::new("A", "Lee").with_age(4),
                    Person::new("B", "Lee").with_age(6),
                    Person::new("C", "Lee").with_age(10),
                ],
            ),
            Family::new(
                vec![Person::new("Wei", "Chan")],
                vec![Person::new("D", "Chan").with_age(3)],
            ),
            Family::new(vec![Person::new("Kim", "Park")], vec![]),
        ];
        let (filtered, kept) = filter_min_age(families, 5);
        assert_eq!(filtered.len(), 1);
        assert_eq!(kept, 2);
        let ages: Vec<u32> = filtered[0].children().iter().map(|c| c.age).collect();
        assert_eq!(ages, vec![6, 10]);
        assert_eq!(names(filtered[0].parents()), vec!["Ann Lee"]);
    }
}
