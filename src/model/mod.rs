//! Domain model: people and the families they are grouped into.

pub mod family;
pub mod person;

pub use family::{Family, FamilyAddress};
pub use person::{Person, same_identity};
