//! PostgreSQL hooks: serial/identity increments and enum blocks

use drizzle_dbml_types::Dialect;
use drizzle_dbml_types::postgres::is_serial_type;
use drizzle_dbml_types::schema::{Column, Entity, Enum, Schema};

use super::{DialectHooks, quote_identifier};

pub const HOOKS: DialectHooks = DialectHooks {
    dialect: Dialect::PostgreSQL,
    escape_name: quote_identifier,
    is_increment,
    collect_enums: Some(collect_enums),
};

/// `serial` family types and identity columns increment
fn is_increment(column: &Column, _primary: bool) -> bool {
    column.identity || is_serial_type(&column.sql_type)
}

/// Exported enums and enum-typed columns, first occurrence of each name wins
pub fn collect_enums(schema: &Schema) -> Vec<Enum> {
    let mut enums: Vec<Enum> = Vec::new();
    let mut push = |e: &Enum| {
        if !enums.iter().any(|seen| seen.name == e.name) {
            enums.push(e.clone());
        }
    };

    for (_, entity) in schema.entries() {
        match entity {
            Entity::Enum(e) => push(e),
            Entity::Table(table) => {
                for e in table.columns().filter_map(|c| c.enum_type.as_ref()) {
                    push(e);
                }
            }
            Entity::Relations(_) => {}
        }
    }

    enums
}

#[cfg(test)]
mod tests {
    use super::*;
    use drizzle_dbml_types::schema::Table;

    #[test]
    fn test_increment_rule() {
        assert!(is_increment(&Column::new("id", "serial"), true));
        assert!(is_increment(&Column::new("id", "bigserial"), false));
        assert!(is_increment(&Column::new("id", "integer").identity(), true));
        assert!(!is_increment(&Column::new("id", "integer"), true));
    }

    #[test]
    fn test_collect_enums_dedupes_in_order() {
        let role = Enum::new("role", ["admin", "user"]);
        let mood = Enum::new("mood", ["sad", "ok"]);
        let schema = Schema::new()
            .table(
                "users",
                Table::new("users")
                    .column("role", Column::new("role", "role").enum_type(role.clone()))
                    .column("mood", Column::new("mood", "mood").enum_type(mood.clone())),
            )
            .enum_type("roleEnum", role.clone());

        let names: Vec<_> = collect_enums(&schema).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["role", "mood"]);
    }
}
