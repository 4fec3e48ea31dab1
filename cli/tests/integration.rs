//! End-to-end integration tests for the drizzle-dbml CLI

use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const SCHEMA_JSON: &str = r#"{
    "roleEnum": { "kind": "enum", "name": "role", "values": ["admin", "member"] },
    "users": {
        "kind": "table",
        "name": "users",
        "columns": {
            "id": { "name": "id", "sqlType": "serial", "primaryKey": true, "notNull": true },
            "role": {
                "name": "role",
                "sqlType": "role",
                "notNull": true,
                "default": "member",
                "enumType": { "name": "role", "values": ["admin", "member"] }
            }
        }
    },
    "posts": {
        "kind": "table",
        "name": "posts",
        "columns": {
            "id": { "name": "id", "sqlType": "serial", "primaryKey": true, "notNull": true },
            "authorId": { "name": "author_id", "sqlType": "integer", "notNull": true }
        }
    },
    "postsRelations": { "kind": "relations", "table": "posts" }
}"#;

const SCHEMA_TS: &str = r#"
/** Registered accounts */
export const users = pgTable('users', {
  id: serial('id').primaryKey(),
  role: roleEnum('role').notNull().default('member'),
});

export const posts = pgTable('posts', {
  id: serial('id').primaryKey(),
  authorId: integer('author_id').notNull(),
});

export const postsRelations = relations(posts, ({ one }) => ({
  author: one(users, { fields: [posts.authorId], references: [users.id] }),
}));
"#;

/// Get the drizzle-dbml binary
fn dbml_cli() -> Command {
    Command::new(cargo::cargo_bin!("drizzle-dbml"))
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "schema.json", SCHEMA_JSON);
    write(temp.path(), "src/schema.ts", SCHEMA_TS);
    temp
}

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

mod init {
    use super::*;

    #[test]
    fn init_creates_config_file() {
        let temp = TempDir::new().unwrap();

        dbml_cli()
            .current_dir(temp.path())
            .args(["init", "--dialect=postgres"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created dbml.config.toml"));

        let content = std::fs::read_to_string(temp.path().join("dbml.config.toml")).unwrap();
        assert!(content.contains("dialect = \"postgresql\""));
    }

    #[test]
    fn init_fails_if_config_exists() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "dbml.config.toml", "dialect = \"sqlite\"\n");

        dbml_cli()
            .current_dir(temp.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn init_rejects_unknown_dialect() {
        let temp = TempDir::new().unwrap();

        dbml_cli()
            .current_dir(temp.path())
            .args(["init", "--dialect", "oracle"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown dialect: oracle"));
    }
}

mod generate {
    use super::*;

    #[test]
    fn generate_to_stdout() {
        let temp = project();

        dbml_cli()
            .current_dir(temp.path())
            .args(["generate", "--dialect", "postgresql"])
            .assert()
            .success()
            .stdout(
                predicate::str::starts_with("enum \"role\" {")
                    .and(predicate::str::contains("Table \"users\" {"))
                    .and(predicate::str::contains(
                        "\"role\" \"role\" [not null, default: 'member']",
                    ))
                    .and(predicate::str::contains("Note:").not()),
            );
    }

    #[test]
    fn generate_with_source_and_relations() {
        let temp = project();

        dbml_cli()
            .current_dir(temp.path())
            .args([
                "generate",
                "-d",
                "pg",
                "--source",
                "src",
                "--relational",
            ])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Note: 'Registered accounts'")
                    .and(predicate::str::contains(
                        "Ref: \"posts\".\"author_id\" > \"users\".\"id\"",
                    )),
            );
    }

    #[test]
    fn generate_reads_config() {
        let temp = project();
        write(
            temp.path(),
            "dbml.config.toml",
            "dialect = \"postgresql\"\nsource = \"src/schema.ts\"\nout = \"docs/schema.dbml\"\n",
        );

        dbml_cli()
            .current_dir(temp.path())
            .arg("generate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote"));

        let content = std::fs::read_to_string(temp.path().join("docs/schema.dbml")).unwrap();
        assert!(content.contains("Note: 'Registered accounts'"));
        assert!(content.ends_with("}\n"));
    }

    #[test]
    fn generate_refuses_overwrite_without_force() {
        let temp = project();
        write(temp.path(), "schema.dbml", "old");

        dbml_cli()
            .current_dir(temp.path())
            .args(["generate", "--out", "schema.dbml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("schema.dbml")).unwrap(),
            "old"
        );

        dbml_cli()
            .current_dir(temp.path())
            .args(["generate", "--out", "schema.dbml", "--force"])
            .assert()
            .success();
        assert!(
            std::fs::read_to_string(temp.path().join("schema.dbml"))
                .unwrap()
                .starts_with("Table \"users\"")
        );
    }

    #[test]
    fn generate_split() {
        let temp = project();

        dbml_cli()
            .current_dir(temp.path())
            .args(["generate", "--dialect", "postgresql", "--split", "--out", "out"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote 3 files"));

        let out = temp.path().join("out");
        assert!(out.join("enums.dbml").exists());
        assert!(out.join("users.dbml").exists());
        assert!(
            std::fs::read_to_string(out.join("posts.dbml"))
                .unwrap()
                .starts_with("Table \"posts\"")
        );
    }

    #[test]
    fn generate_missing_schema() {
        let temp = TempDir::new().unwrap();

        dbml_cli()
            .current_dir(temp.path())
            .arg("generate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("schema.json"));
    }

    #[test]
    fn generate_invalid_schema_json() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "schema.json", "[1, 2]");

        dbml_cli()
            .current_dir(temp.path())
            .arg("generate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid schema JSON"));
    }

    #[test]
    fn generate_missing_source() {
        let temp = project();

        dbml_cli()
            .current_dir(temp.path())
            .args(["generate", "--source", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read"));
    }
}

mod inspect {
    use super::*;

    #[test]
    fn inspect_prints_json() {
        let temp = project();

        let output = dbml_cli()
            .current_dir(temp.path())
            .args(["inspect", "--source", "src"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["comments"][0]["note"], "Registered accounts");
        assert_eq!(json["relations"][0]["sourceTable"], "posts");
        assert_eq!(json["relations"][0]["cardinality"], "one");
    }

    #[test]
    fn inspect_requires_source() {
        let temp = TempDir::new().unwrap();

        dbml_cli()
            .current_dir(temp.path())
            .arg("inspect")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No source path"));
    }
}
