//! A single member or volunteer, normalized from one source row.

use crate::error::MergeError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Always lowercase.
    pub email: String,
    pub age: u32,
    pub nickname: Option<String>,
    pub role: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// How a field resolves when both sides hold different non-empty values.
#[derive(Debug, Clone, Copy)]
enum Resolve {
    /// Refuse: the records disagree.
    Strict,
    /// The incoming value overwrites.
    Replace,
    /// Keep both, receiver first.
    Concat,
}

/// Identity is the case-insensitive (first, last) name pair; contact fields never take part.
pub fn same_identity(a: &Person, b: &Person) -> bool {
    a.first_name.to_lowercase() == b.first_name.to_lowercase()
        && a.last_name.to_lowercase() == b.last_name.to_lowercase()
}

impl Person {
    /// Ages below this are omitted from the plain-text rendering.
    pub const MIN_AGE: u32 = 5;

    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_email(mut self, email: impl AsRef<str>) -> Self {
        self.email = email.as_ref().to_lowercase();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = non_blank(nickname.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = non_blank(role.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = non_blank(address.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(city.into());
        self
    }

    /// "First Last", as used in merge diagnostics and report headings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Blank rows (e.g. an absent second parent) produce invalid persons.
    pub fn is_valid(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty()
    }

    /// Fold `other` into `self`.
    ///
    /// Only permitted between records of the same identity. Phone, nickname,
    /// address and city may not disagree; email takes the incoming value; role
    /// values are joined with ", ". Either every field is updated or, on error,
    /// none is.
    pub fn update(&mut self, other: &Person) -> Result<(), MergeError> {
        if !same_identity(self, other) {
            return Err(MergeError::IdentityMismatch {
                target: self.full_name(),
                incoming: other.full_name(),
            });
        }

        let phone = resolve("phone", &self.phone, &other.phone, Resolve::Strict)?;
        let email = resolve("email", &self.email, &other.email, Resolve::Replace)?;
        let nickname = resolve_opt("nickname", &self.nickname, &other.nickname, Resolve::Strict)?;
        let role = resolve_opt("role", &self.role, &other.role, Resolve::Concat)?;
        let address = resolve_opt("address", &self.address, &other.address, Resolve::Strict)?;
        let city = resolve_opt("city", &self.city, &other.city, Resolve::Strict)?;

        self.phone = phone;
        self.email = email;
        self.nickname = non_blank(nickname);
        self.role = non_blank(role);
        self.address = non_blank(address);
        self.city = non_blank(city);
        Ok(())
    }
}

fn resolve(
    field: &'static str,
    this: &str,
    other: &str,
    policy: Resolve,
) -> Result<String, MergeError> {
    if this.is_empty() {
        return Ok(other.to_string());
    }
    if other.is_empty() || this == other {
        return Ok(this.to_string());
    }
    match policy {
        Resolve::Strict => Err(MergeError::FieldConflict {
            field,
            this: this.to_string(),
            other: other.to_string(),
        }),
        Resolve::Replace => Ok(other.to_string()),
        Resolve::Concat => Ok(format!("{}, {}", this, other)),
    }
}

fn resolve_opt(
    field: &'static str,
    this: &Option<String>,
    other: &Option<String>,
    policy: Resolve,
) -> Result<String, MergeError> {
    resolve(
        field,
        this.as_deref().unwrap_or(""),
        other.as_deref().unwrap_or(""),
        policy,
    )
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nickname {
            Some(nick) => writeln!(f, "{} ({}) {}", self.first_name, nick, self.last_name)?,
            None => writeln!(f, "{} {}", self.first_name, self.last_name)?,
        }
        if let Some(role) = &self.role {
            writeln!(f, "    {}", role)?;
        }
        if !self.phone.is_empty() {
            writeln!(f, "    Phone: {}", self.phone)?;
        }
        if !self.email.is_empty() {
            writeln!(f, "    Email: {}", self.email)?;
        }
        if let Some(address) = &self.address {
            writeln!(f, "    Address: {}", address)?;
        }
        if let Some(city) = &self.city {
            writeln!(f, "    City: {}", city)?;
        }
        if self.age >= Self::MIN_AGE {
            writeln!(f, "    Age: {}", self.age)?;
        }
        Ok(())
    }
}
