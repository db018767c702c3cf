use crate::model::Family;
use crate::render::by_family_name;
use std::fmt::Write;

/// Plain-text roster: a heading per family followed by each member's details.
pub fn render_roster_text(families: &[Family]) -> anyhow::Result<String> {
    let mut out = String::new();
    for family in by_family_name(families) {
        writeln!(out, "== {} ==", family.family_name())?;
        for person in family.members() {
            write!(out, "{}", person)?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_parents_then_children() {
        let families = vec![Family::new(
            vec![Person::new("Ann", "Lee").with_phone("555-0100")],
            vec![Person::new("Bo", "Lee").with_age(9)],
        )];
        assert_eq!(
            render_roster_text(&families).unwrap(),
            "== Lee family ==\nAnn Lee\n    Phone: 555-0100\nBo Lee\n    Age: 9\n\n"
        );
    }
}
