//! CLI integration tests
//!
//! Tests for the twsql command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn twsql() -> Command {
    Command::cargo_bin("twsql").unwrap()
}

mod render_command {
    use super::*;

    #[test]
    fn render_file_with_params() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("query.sql");
        let params = temp.path().join("params.json");
        fs::write(&template, "select * from /*$table*/t where id = /*:id*/1 -- note").unwrap();
        fs::write(&params, r#"{"table": "users", "id": 42}"#).unwrap();

        twsql()
            .arg("render")
            .arg(&template)
            .arg("--params")
            .arg(&params)
            .assert()
            .success()
            .stdout("select * from users where id = :id ");
    }

    #[test]
    fn render_keeps_comments_on_request() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("query.sql");
        fs::write(&template, "select 1 /* keep */").unwrap();

        twsql()
            .arg("render")
            .arg("--keep-comments")
            .arg(&template)
            .assert()
            .success()
            .stdout("select 1 /* keep */");
    }

    #[test]
    fn render_pyformat_json_output() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("query.sql");
        let params = temp.path().join("params.json");
        fs::write(&template, "select 1/*%for a in xs*/, /*:a*/0/*end*/").unwrap();
        fs::write(&params, r#"{"xs": [10, 20]}"#).unwrap();

        let output = twsql()
            .arg("render")
            .arg(&template)
            .arg("--params")
            .arg(&params)
            .arg("--style")
            .arg("pyformat")
            .arg("--temp-prefix")
            .arg("t")
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["sql"], "select 1, %(t0_0_a)s, %(t0_1_a)s");
        assert_eq!(json["parameters"]["t0_1_a"], 20);
        assert_eq!(json["parameters"]["xs"], serde_json::json!([10, 20]));
    }

    #[test]
    fn render_from_stdin() {
        twsql()
            .arg("render")
            .arg("-")
            .write_stdin("select /*%if False*/1/*end*/2")
            .assert()
            .success()
            .stdout("select 2");
    }

    #[test]
    fn render_error_exits_with_two() {
        twsql()
            .arg("render")
            .arg("-")
            .write_stdin("select /*%if missing*/1/*end*/")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("missing"));
    }

    #[test]
    fn render_missing_file() {
        twsql()
            .arg("render")
            .arg("/nonexistent/query.sql")
            .assert()
            .code(2);
    }

    #[test]
    fn render_rejects_unknown_style() {
        twsql()
            .arg("render")
            .arg("-")
            .arg("--style")
            .arg("qmark")
            .write_stdin("select 1")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unsupported param style"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_valid_directory() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("queries");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp.path().join("a.sql"), "select /*:a*/1").unwrap();
        fs::write(subdir.join("b.sql"), "select 1 /*%if a*/, 2/*end*/").unwrap();

        twsql().arg("check").arg(temp.path()).assert().success();
    }

    #[test]
    fn check_reports_broken_templates() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.sql");
        fs::write(&broken, "select 1\nfrom t /* never closed").unwrap();

        twsql()
            .arg("check")
            .arg(&broken)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("broken.sql"))
            .stderr(predicate::str::contains("line 2, column 8"));
    }

    #[test]
    fn check_glob_pattern() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("ok.sql"), "select 1").unwrap();
        fs::write(temp.path().join("bad.sql"), "/*%if a ==*/x/*end*/").unwrap();

        twsql()
            .arg("check")
            .arg(temp.path().join("*.sql"))
            .assert()
            .code(1)
            .stderr(predicate::str::contains("bad.sql"));
    }

    #[test]
    fn check_path_without_sql_files() {
        let temp = TempDir::new().unwrap();
        twsql()
            .arg("check")
            .arg(temp.path().join("nothing-here"))
            .assert()
            .code(2);
    }
}
