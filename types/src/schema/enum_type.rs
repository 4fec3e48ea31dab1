//! Enum type definitions

/// Enum type, either exported on its own (`pgEnum`) or attached to a column
///
/// Values keep their declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enum {
    /// Enum type name
    pub name: String,
    /// Enum values in declaration order
    pub values: Vec<String>,
}

impl Enum {
    /// Create a new enum
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the enum name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_keeps_declaration_order() {
        let e = Enum::new("role", ["user", "admin", "guest"]);
        assert_eq!(e.name(), "role");
        assert_eq!(e.values, vec!["user", "admin", "guest"]);
    }
}
