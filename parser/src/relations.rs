//! `relations(table, ({ one, many }) => ({ ... }))` extraction

use crate::ast::{Expr, Module, Property, property};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Cardinality {
    One,
    Many,
}

/// One property of a relations object
///
/// Table and column names are the identifiers written in source: table
/// variables and column property keys, not SQL names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ParsedRelation {
    /// Property name in the relations object
    pub name: String,
    pub source_table: String,
    pub target_table: String,
    pub cardinality: Cardinality,
    pub fields: Vec<String>,
    pub references: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub relation_name: Option<String>,
}

impl ParsedRelation {
    /// Whether the relation carries the column pairs a foreign key needs
    pub fn has_columns(&self) -> bool {
        !self.fields.is_empty() && self.fields.len() == self.references.len()
    }
}

/// Relations in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SchemaRelations {
    relations: Vec<ParsedRelation>,
}

impl SchemaRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relations(&self) -> &[ParsedRelation] {
        &self.relations
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedRelation> {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub(crate) fn collect(&mut self, module: &Module) {
        module.walk(&mut |expr: &Expr| {
            if let Some(found) = relations_call(expr) {
                self.relations.extend(found);
            }
        });
    }
}

impl<'a> IntoIterator for &'a SchemaRelations {
    type Item = &'a ParsedRelation;
    type IntoIter = std::slice::Iter<'a, ParsedRelation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

fn relations_call(expr: &Expr) -> Option<Vec<ParsedRelation>> {
    let (callee, args) = expr.as_call()?;
    if callee.as_ident()? != "relations" {
        return None;
    }
    let source = args.first()?.as_ident()?;
    let Expr::Arrow(arrow) = args.get(1)? else {
        return None;
    };
    let props = arrow.returned_object()?;

    Some(
        props
            .iter()
            .filter_map(|prop| relation_property(source, prop))
            .collect(),
    )
}

fn relation_property(source: &str, prop: &Property) -> Option<ParsedRelation> {
    let name = prop.key.as_deref()?;
    let (callee, args) = prop.value.as_call()?;
    let cardinality = match callee.callee_name()? {
        "one" => Cardinality::One,
        "many" => Cardinality::Many,
        _ => return None,
    };
    let target = args.first()?.as_ident()?;

    let mut relation = ParsedRelation {
        name: name.to_string(),
        source_table: source.to_string(),
        target_table: target.to_string(),
        cardinality,
        fields: Vec::new(),
        references: Vec::new(),
        relation_name: None,
    };

    if let Some(config) = args.get(1) {
        let Some(config) = config.as_object() else {
            tracing::trace!(relation = name, "skipping relation with non-object config");
            return None;
        };
        relation.fields = column_list(config, "fields")?;
        relation.references = column_list(config, "references")?;
        relation.relation_name = property(config, "relationName")
            .and_then(Expr::as_str)
            .map(str::to_string);
    }

    Some(relation)
}

/// `fields: [posts.authorId]` → `["authorId"]`; absent is empty, anything
/// other than an array of member names is rejected
fn column_list(config: &[Property], key: &str) -> Option<Vec<String>> {
    match property(config, key) {
        None => Some(Vec::new()),
        Some(Expr::Array(items)) => items
            .iter()
            .map(|item| item.member_name().map(str::to_string))
            .collect(),
        Some(_) => {
            tracing::trace!(key, "skipping relation with non-array column list");
            None
        }
    }
}
