//! Index and primary key definitions

/// Index (or table-level unique constraint) over one or more columns
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    /// Index name, if one was given
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Column SQL names, in index order
    pub columns: Vec<String>,
    /// Is this a UNIQUE index?
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub unique: bool,
}

impl Index {
    /// Create an index over the given columns
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    /// Set the index name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the index UNIQUE
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Table-level primary key
///
/// A primary key over two or more columns is rendered as a `[pk]` index line;
/// a single-column one is folded back into that column's attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryKey {
    /// Constraint name, if one was given
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Column SQL names
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Create a primary key over the given columns
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the key spans more than one column
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// Returns `true` if `column` is part of this key
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_builder() {
        let idx = Index::new(["email"]).name("users_email_idx").unique();
        assert_eq!(idx.columns, vec!["email"]);
        assert_eq!(idx.name.as_deref(), Some("users_email_idx"));
        assert!(idx.unique);
    }

    #[test]
    fn test_primary_key_composite() {
        let pk = PrimaryKey::new(["user_id", "group_id"]);
        assert!(pk.is_composite());
        assert!(pk.contains("group_id"));
        assert!(!pk.contains("id"));
        assert!(!PrimaryKey::new(["id"]).is_composite());
    }
}
