use crate::model::{Family, FamilyAddress, Person};
use crate::render::by_family_name;
use serde::Serialize;

/// A family with its derived fields spelled out.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyView<'a> {
    pub family_name: String,
    pub emails: Vec<&'a str>,
    pub phones: Vec<&'a str>,
    pub address: Option<FamilyAddress>,
    pub parents: &'a [Person],
    pub children: &'a [Person],
}

impl<'a> FamilyView<'a> {
    pub fn new(family: &'a Family) -> Self {
        Self {
            family_name: family.family_name(),
            emails: family.family_email(),
            phones: family.family_phone(),
            address: family.family_address(),
            parents: family.parents(),
            children: family.children(),
        }
    }
}

/// Pretty-printed JSON array of family views, in family-name order.
pub fn render_roster_json(families: &[Family]) -> anyhow::Result<String> {
    let views: Vec<FamilyView<'_>> = by_family_name(families)
        .into_iter()
        .map(FamilyView::new)
        .collect();
    Ok(serde_json::to_string_pretty(&views)?)
}
