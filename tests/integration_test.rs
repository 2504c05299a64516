use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sqlinsertfmt::api::{verify_file, Verdict};
use sqlinsertfmt::config::{parse_config, ConfigFormat};
use sqlinsertfmt::ignore::IgnoreRules;
use sqlinsertfmt::report::FileStatus;
use sqlinsertfmt::{
    classify, fix_dir, fix_file, format_sql, get_matching_paths, review, standardize,
    FormatOutcome, Mode, StatementKind,
};

const FOO_INSERT: &str = "INSERT INTO foo (id, name) VALUES (1, 'bar');";
const FOO_CANONICAL: &str =
    "INSERT INTO foo (\n    id,\n    name\n) VALUES (\n    1,\n    'bar'\n);\n";

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn no_rules() -> IgnoreRules {
    IgnoreRules::default()
}

// ─── Classification and formatting ───

#[test]
fn test_multi_row_classified_as_insert_multi() {
    let kinds = classify("INSERT INTO t (a,b) VALUES (1,2), (3,4);");
    assert_eq!(kinds.single(), Some(StatementKind::InsertMulti));
    assert_eq!(
        format_sql("INSERT INTO t (a,b) VALUES (1,2), (3,4);"),
        FormatOutcome::NotApplicable
    );
}

#[test]
fn test_end_to_end_canonical_form() {
    let outcome = format_sql(FOO_INSERT);
    let formatted = outcome.formatted().expect("should format");
    assert_eq!(standardize(formatted), FOO_CANONICAL);
}

#[test]
fn test_select_plus_insert_is_noop() {
    let sql = "INSERT INTO foo (id) VALUES (1);\nSELECT * FROM foo;\n";
    assert_eq!(classify(sql).len(), 2);
    assert_eq!(format_sql(sql), FormatOutcome::NotApplicable);
}

#[test]
fn test_marker_blocks_any_kind() {
    for sql in [
        "-- acr-skip { acr-sql-format }\nINSERT INTO foo (id) VALUES (1);",
        "/* acr-skip { acr-sql-format } */ SELECT 1;",
    ] {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "q.sql", sql);
        let verdict = verify_file(&dir.path().join("q.sql"), &no_rules()).unwrap();
        assert_eq!(verdict, Verdict::Ignored);
    }
}

// ─── Autofix ───

#[test]
fn test_fix_file_rewrites() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "seed.sql", FOO_INSERT);

    let result = fix_file(&dir.path().join("seed.sql"), &no_rules(), &Mode::default()).unwrap();
    assert_eq!(result.status, FileStatus::Changed);
    assert_eq!(read(dir.path(), "seed.sql"), FOO_CANONICAL);
}

#[test]
fn test_fix_file_canonical_not_rewritten() {
    let dir = TempDir::new().unwrap();
    // Same canonical text, but without the trailing newline
    let content = FOO_CANONICAL.trim_end();
    write(dir.path(), "seed.sql", content);

    let result = fix_file(&dir.path().join("seed.sql"), &no_rules(), &Mode::default()).unwrap();
    assert_eq!(result.status, FileStatus::Unchanged);
    assert_eq!(read(dir.path(), "seed.sql"), content);
}

#[test]
fn test_fix_file_leaves_trailing_clauses_alone() {
    let dir = TempDir::new().unwrap();
    let sources = [
        "INSERT INTO t (a) VALUES (now()), (2);\n",
        "INSERT INTO t (a) VALUES (1) ON CONFLICT DO NOTHING;\n",
        "INSERT INTO t (a) VALUES (1) RETURNING id;\n",
        "INSERT INTO t (a -- key\n, b) VALUES (1, 2);\n",
    ];
    for (i, source) in sources.iter().enumerate() {
        let name = format!("seed_{}.sql", i);
        write(dir.path(), &name, source);

        let result = fix_file(&dir.path().join(&name), &no_rules(), &Mode::default()).unwrap();
        assert_eq!(result.status, FileStatus::Unchanged, "{}", source);
        assert_eq!(read(dir.path(), &name), *source);
    }
}

#[test]
fn test_fix_file_check_mode_does_not_write() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "seed.sql", FOO_INSERT);
    let mode = Mode {
        check: true,
        ..Mode::default()
    };

    let result = fix_file(&dir.path().join("seed.sql"), &no_rules(), &mode).unwrap();
    assert_eq!(result.status, FileStatus::Changed);
    assert_eq!(read(dir.path(), "seed.sql"), FOO_INSERT);
}

#[test]
fn test_fix_file_path_pattern_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "seed.sql", FOO_INSERT);
    let path = dir.path().join("seed.sql");
    let rules = IgnoreRules::new(&[regex::escape(&dir.path().to_string_lossy())]).unwrap();

    let result = fix_file(&path, &rules, &Mode::default()).unwrap();
    assert_eq!(result.status, FileStatus::Ignored);
    assert_eq!(read(dir.path(), "seed.sql"), FOO_INSERT);
}

#[test]
fn test_fix_file_missing_is_error() {
    let dir = TempDir::new().unwrap();
    let result = fix_file(&dir.path().join("absent.sql"), &no_rules(), &Mode::default());
    assert!(result.is_err());
}

#[test]
fn test_fix_dir_walks_recursively() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.sql", FOO_INSERT);
    write(dir.path(), "nested/deeper/b.sql", "insert into bar (X) values (2)\n\n");
    write(dir.path(), "nested/c.sql", "SELECT 1;\n");
    write(dir.path(), "nested/d.txt", FOO_INSERT);
    write(
        dir.path(),
        "skip/e.sql",
        "-- acr-skip { acr-sql-format }\nINSERT INTO foo (id) VALUES (1);",
    );

    let report = fix_dir(dir.path(), &no_rules(), &Mode::default()).unwrap();
    assert_eq!(report.total(), 4);
    assert_eq!(report.changed(), 2);
    assert_eq!(report.unchanged(), 1);
    assert_eq!(report.ignored(), 1);

    assert_eq!(read(dir.path(), "a.sql"), FOO_CANONICAL);
    assert_eq!(
        read(dir.path(), "nested/deeper/b.sql"),
        "INSERT INTO bar (\n    x\n) VALUES (\n    2\n);\n"
    );
    assert_eq!(read(dir.path(), "nested/c.sql"), "SELECT 1;\n");
    assert_eq!(read(dir.path(), "nested/d.txt"), FOO_INSERT);
}

#[test]
fn test_get_matching_paths_sorted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.sql", "");
    write(dir.path(), "a/z.sql", "");
    write(dir.path(), "a/readme.md", "");

    let paths = get_matching_paths(dir.path(), &Mode::default()).unwrap();
    assert_eq!(
        paths,
        vec![dir.path().join("a/z.sql"), dir.path().join("b.sql")]
    );
}

// ─── Review ───

fn review_config(source: &Path, changes: &str, ignore: &str) -> sqlinsertfmt::Config {
    let json = format!(
        r#"{{
            "regexToIgnore": [{ignore}],
            "path_source": {source:?},
            "merge": {{ "changes": [{changes}] }},
            "message": "Format ${{FILE_PATH}}:${{FORMATTED}}"
        }}"#,
        ignore = ignore,
        source = source.to_string_lossy(),
        changes = changes,
    );
    parse_config(&json, ConfigFormat::Json).unwrap()
}

#[test]
fn test_review_emits_comment_for_unformatted_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "db/seed.sql", FOO_INSERT);
    let config = review_config(
        dir.path(),
        r#"{"new_path": "db/seed.sql", "deleted_file": false}"#,
        "",
    );

    let comments = review(&config).unwrap();
    assert_eq!(comments.len(), 1);
    let comment = &comments[0];
    assert_eq!(comment.path, "db/seed.sql");
    assert_eq!(
        comment.description,
        "Format db/seed.sql:<pre>INSERT INTO foo (<br>    id,<br>    name<br>) VALUES (<br>    1,<br>    'bar'<br>);<br></pre>"
    );
    assert_eq!((comment.start_line, comment.end_line), (1, 1));
    assert_eq!(comment.language, "sql");
    assert!(!comment.snipset);
}

#[test]
fn test_review_ids_stable_across_runs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "seed.sql", FOO_INSERT);
    let config = review_config(dir.path(), r#"{"new_path": "seed.sql"}"#, "");

    let first = review(&config).unwrap();
    let second = review(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_review_skips_canonical_deleted_and_non_sql() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "done.sql", FOO_CANONICAL);
    write(dir.path(), "notes.md", FOO_INSERT);
    write(dir.path(), "multi.sql", "INSERT INTO t (a) VALUES (1), (2);");
    let config = review_config(
        dir.path(),
        r#"{"new_path": "done.sql"},
           {"new_path": "notes.md"},
           {"new_path": "gone.sql", "deleted_file": true},
           {"new_path": "multi.sql"}"#,
        "",
    );

    assert!(review(&config).unwrap().is_empty());
}

#[test]
fn test_review_respects_path_patterns() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "legacy/old.sql", FOO_INSERT);
    write(dir.path(), "new.sql", FOO_INSERT);
    let config = review_config(
        dir.path(),
        r#"{"new_path": "legacy/old.sql"}, {"new_path": "new.sql"}"#,
        r#""legacy/""#,
    );

    let comments = review(&config).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].path, "new.sql");
}

#[test]
fn test_review_preserves_change_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.sql", FOO_INSERT);
    write(dir.path(), "a.sql", "insert into t (x) values (1)");
    let config = review_config(
        dir.path(),
        r#"{"new_path": "b.sql"}, {"new_path": "a.sql"}"#,
        "",
    );

    let paths: Vec<_> = review(&config)
        .unwrap()
        .into_iter()
        .map(|c| c.path)
        .collect();
    assert_eq!(paths, vec!["b.sql", "a.sql"]);
}

#[test]
fn test_review_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let config = review_config(dir.path(), r#"{"new_path": "absent.sql"}"#, "");
    assert!(review(&config).is_err());
}

#[test]
fn test_review_requires_review_keys() {
    let config = parse_config(r#"{"regexToIgnore": []}"#, ConfigFormat::Json).unwrap();
    assert!(review(&config).is_err());
}
