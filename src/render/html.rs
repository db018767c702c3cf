use crate::model::{Family, Person};
use crate::render::by_family_name;
use std::fmt::Write;

const ROW_INDENT: &str = "    ";
const MEMBER_ROW_INDENT: &str = "        ";

/// Render the roster as HTML fragments, one `roster_family` block per family.
///
/// `full_document` wraps the fragments in `<html><body>`.
pub fn render_roster_html(families: &[Family], full_document: bool) -> anyhow::Result<String> {
    let mut out = String::new();
    if full_document {
        writeln!(out, "<html><body>")?;
    }
    for family in by_family_name(families) {
        let name = escape_html(&family.family_name());
        writeln!(
            out,
            "<div class=\"roster_family\" id=\"{0}\"><a name=\"{0}\"></a>",
            name
        )?;
        match family.individual() {
            Some(person) => render_individual(&mut out, person)?,
            None => render_household(&mut out, family, &name)?,
        }
        writeln!(out, "</div>")?;
    }
    if full_document {
        writeln!(out, "</body></html>")?;
    }
    Ok(out)
}

fn render_individual(out: &mut String, person: &Person) -> std::fmt::Result {
    writeln!(
        out,
        "  <h3>{}, {}</h3>",
        escape_html(&person.last_name),
        escape_html(&person.first_name)
    )?;
    if let Some(role) = &person.role {
        writeln!(out, "  <h4>{}</h4>", escape_html(role))?;
    }
    writeln!(out, "  <table>")?;
    table_row(out, ROW_INDENT, "Email", &person.email)?;
    table_row(out, ROW_INDENT, "Phone", &person.phone)?;
    table_row(out, ROW_INDENT, "Address", person.address.as_deref().unwrap_or(""))?;
    table_row(out, ROW_INDENT, "City", person.city.as_deref().unwrap_or(""))?;
    writeln!(out, "  </table>")
}

fn render_household(out: &mut String, family: &Family, name: &str) -> std::fmt::Result {
    let shared_email = family.family_email();
    let shared_phone = family.family_phone();

    writeln!(out, "  <h3>{}</h3>", name)?;
    writeln!(out, "  <table>")?;
    for email in &shared_email {
        table_row(out, ROW_INDENT, "Email", email)?;
    }
    for phone in &shared_phone {
        table_row(out, ROW_INDENT, "Phone", phone)?;
    }
    let address = family
        .family_address()
        .map(|a| a.parts().join(", "))
        .unwrap_or_default();
    table_row(out, ROW_INDENT, "Address", &address)?;
    writeln!(out, "  </table>")?;

    writeln!(out, "  <table>")?;
    writeln!(out, "    <tr><th>Adults</th><th>Children</th></tr>")?;
    writeln!(out, "      <tr><td><table>")?;
    for adult in family.parents() {
        member_heading(out, adult)?;
        if let Some(role) = &adult.role {
            writeln!(
                out,
                "{}<tr><td colspan=\"2\">{}</td></tr>",
                MEMBER_ROW_INDENT,
                escape_html(role)
            )?;
        }
        table_row(out, MEMBER_ROW_INDENT, "Email", own(&adult.email, &shared_email))?;
        table_row(out, MEMBER_ROW_INDENT, "Phone", own(&adult.phone, &shared_phone))?;
    }
    writeln!(out, "      </table></td><td><table>")?;
    for child in family.children() {
        member_heading(out, child)?;
        table_row(out, MEMBER_ROW_INDENT, "Email", own(&child.email, &shared_email))?;
        table_row(out, MEMBER_ROW_INDENT, "Phone", own(&child.phone, &shared_phone))?;
    }
    writeln!(out, "      </table></td></tr>")?;
    writeln!(out, "  </table>")
}

/// Per-member contact detail, blanked when the family block already lists it.
fn own<'a>(value: &'a str, shared: &[&str]) -> &'a str {
    if shared.iter().any(|s| *s == value) { "" } else { value }
}

fn member_heading(out: &mut String, person: &Person) -> std::fmt::Result {
    writeln!(
        out,
        "{}<tr><th colspan=\"2\">{} {}</th></tr>",
        MEMBER_ROW_INDENT,
        escape_html(&person.first_name),
        escape_html(&person.last_name)
    )
}

/// Heading/value row; skipped when the value is empty.
fn table_row(out: &mut String, indent: &str, heading: &str, value: &str) -> std::fmt::Result {
    if value.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "{}<tr><th>{}</th><td>{}</td></tr>",
        indent,
        heading,
        escape_html(value)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn individual_block_lists_present_fields() {
        let families = vec![Family::new(
            vec![Person::new("Ann", "Lee")
                .with_role("Club Leader")
                .with_email("ann@x.org")
                .with_city("Davis")],
            vec![],
        )];
        let html = render_roster_html(&families, false).unwrap();
        assert_eq!(
            html,
            "<div class=\"roster_family\" id=\"Lee family\"><a name=\"Lee family\"></a>\n\
             \x20 <h3>Lee, Ann</h3>\n\
             \x20 <h4>Club Leader</h4>\n\
             \x20 <table>\n\
             \x20   <tr><th>Email</th><td>ann@x.org</td></tr>\n\
             \x20   <tr><th>City</th><td>Davis</td></tr>\n\
             \x20 </table>\n\
             </div>\n"
        );
    }

    #[test]
    fn household_suppresses_shared_contact_on_members() {
        let families = vec![Family::new(
            vec![
                Person::new("Ann", "Lee")
                    .with_email("lee@x.org")
                    .with_phone("555-0100"),
                Person::new("Wei", "Chan").with_email("wei@x.org"),
            ],
            vec![Person::new("Bo", "Lee")
                .with_email("lee@x.org")
                .with_address("1 Main St")
                .with_city("Davis")],
        )];
        let html = render_roster_html(&families, true).unwrap();

        assert!(html.starts_with("<html><body>\n"));
        assert!(html.ends_with("</body></html>\n"));
        assert!(html.contains("  <h3>Chan and Lee family</h3>\n"));
        assert!(html.contains("    <tr><th>Email</th><td>lee@x.org</td></tr>\n"));
        assert!(html.contains("    <tr><th>Address</th><td>1 Main St, Davis</td></tr>\n"));
        assert_eq!(html.matches("lee@x.org").count(), 1);
        assert!(html.contains("        <tr><th>Email</th><td>wei@x.org</td></tr>\n"));
        assert!(html.contains("        <tr><th>Phone</th><td>555-0100</td></tr>\n"));
        assert!(html.contains("        <tr><th colspan=\"2\">Bo Lee</th></tr>\n"));
    }

    #[test]
    fn families_are_emitted_in_name_order() {
        let families = vec![
            Family::new(vec![Person::new("Ann", "Lee")], vec![]),
            Family::new(vec![Person::new("Wei", "Chan")], vec![]),
        ];
        let html = render_roster_html(&families, false).unwrap();
        let chan = html.find("Chan family").unwrap();
        let lee = html.find("Lee family").unwrap();
        assert!(chan < lee);
    }

    #[test]
    fn text_is_escaped() {
        let families = vec![Family::new(
            vec![Person::new("Ann", "O'Neil <Lee>")],
            vec![],
        )];
        let html = render_roster_html(&families, false).unwrap();
        assert!(html.contains("<h3>O&#39;Neil &lt;Lee&gt;, Ann</h3>"));
    }
}
