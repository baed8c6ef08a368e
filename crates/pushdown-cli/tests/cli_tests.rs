//! CLI integration tests
//!
//! Every command runs in a temporary directory with HOME pointed at it, so
//! neither a user's global config nor a stray pushdown.toml leaks in.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;
use tempfile::TempDir;

fn pushdown_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pushdown").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("PUSHDOWN_GRAMMAR")
        .env_remove("PUSHDOWN_FORMAT")
        .env_remove("PUSHDOWN_MAX_DEPTH")
        .env_remove("PUSHDOWN_LOG");
    cmd
}

fn write_input(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

// ══════════════════════════════════════════════════════════════════════════════
// PARSE
// ══════════════════════════════════════════════════════════════════════════════

mod parse {
    use super::*;

    #[test]
    fn test_parse_error_chain_file() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "chain.txt", "error['low pressure', error['next err']]\n");

        pushdown_cmd(&dir)
            .args(["parse", "chain.txt"])
            .assert()
            .success()
            .stdout("2 errors: low pressure; next err\n");
    }

    #[test]
    fn test_parse_prefix_from_stdin() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-", "--grammar", "prefix"])
            .write_stdin("+ 2 * 3 4")
            .assert()
            .success()
            .stdout("14\n");
    }

    #[test]
    fn test_parse_failure_exits_nonzero() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-", "-g", "prefix"])
            .write_stdin("+ 1")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unexpected end of input"));
    }

    #[test]
    fn test_parse_json_report() {
        let dir = TempDir::new().unwrap();

        let output = pushdown_cmd(&dir)
            .args(["parse", "-", "--grammar", "prefix", "--json"])
            .write_stdin("* 6 7")
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["grammar"], "prefix");
        assert_eq!(report["value"], 42);
        assert_eq!(report["stats"]["frames_created"], 4);
        assert!(report.get("error").is_none());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "nope.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read input file"));
    }

    #[test]
    fn test_scan_error_is_reported() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-"])
            .write_stdin("error['a'")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("scan error"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// FEED AND TRACE
// ══════════════════════════════════════════════════════════════════════════════

mod feed_and_trace {
    use super::*;

    #[test]
    fn test_feed_tokens_verbatim() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["feed", "low pressure", "next err"])
            .assert()
            .success()
            .stdout("2 errors: low pressure; next err\n");
    }

    #[test]
    fn test_feed_reports_unconsumed_tokens() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["feed", "--grammar", "nested", "--depth", "0", "a", "b", "c"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unconsumed input 'c'"));
    }

    #[test]
    fn test_trace_prints_stack_per_token() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["trace", "-", "--grammar", "prefix"])
            .write_stdin("neg 4")
            .assert()
            .success()
            .stdout(predicate::str::contains("push 'neg'"))
            .stdout(predicate::str::contains("    #2 expr [awaiting-token]"))
            .stdout(predicate::str::contains("end of input"))
            .stdout(predicate::str::ends_with("-4\n"));
    }

    #[test]
    fn test_trace_json_lists_steps() {
        let dir = TempDir::new().unwrap();

        let output = pushdown_cmd(&dir)
            .args(["trace", "-", "--grammar", "nested", "--depth", "1", "--format", "json"])
            .write_stdin("a b c")
            .output()
            .unwrap();

        let trace: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(trace["steps"].as_array().unwrap().len(), 4);
        assert_eq!(trace["steps"][0]["frames"][0]["procedure"], "nested-leaf");
        assert_eq!(trace["report"]["value"], 3);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ══════════════════════════════════════════════════════════════════════════════

mod configuration {
    use super::*;

    #[test]
    fn test_project_config_sets_grammar_and_format() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "pushdown.toml", "[cli]\ngrammar = \"prefix\"\nformat = \"json\"\n");

        pushdown_cmd(&dir)
            .args(["parse", "-"])
            .write_stdin("- 10 4")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"value\": 6"));
    }

    #[test]
    fn test_format_text_overrides_json_config() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "pushdown.toml", "[cli]\ngrammar = \"prefix\"\nformat = \"json\"\n");

        pushdown_cmd(&dir)
            .args(["parse", "-", "--format", "text"])
            .write_stdin("- 10 4")
            .assert()
            .success()
            .stdout("6\n");
    }

    #[test]
    fn test_json_conflicts_with_format() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-", "--json", "--format", "text"])
            .write_stdin("error['a']")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("cannot be used with"));
    }

    #[test]
    fn test_env_grammar_overrides_project() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "pushdown.toml", "[cli]\ngrammar = \"errors\"\n");

        pushdown_cmd(&dir)
            .env("PUSHDOWN_GRAMMAR", "prefix")
            .args(["parse", "-"])
            .write_stdin("neg 3")
            .assert()
            .success()
            .stdout("-3\n");
    }

    #[test]
    fn test_max_depth_flag() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-", "-g", "prefix", "--max-depth", "1"])
            .write_stdin("+ + 1 2 3")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("exceeds the limit of 1"));
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["parse", "-", "-g", "prefix", "--max-depth", "0"])
            .write_stdin("7")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--max-depth"));
    }

    #[test]
    fn test_invalid_project_config_fails() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "pushdown.toml", "[engine]\nmax_depth = 0\n");

        pushdown_cmd(&dir)
            .args(["parse", "-"])
            .write_stdin("error['a']")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load configuration"));
    }

    #[test]
    fn test_log_flag_emits_engine_events() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["--log", "pushdown=debug", "parse", "-", "-g", "prefix"])
            .write_stdin("7")
            .assert()
            .success()
            .stderr(predicate::str::contains("frame created"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// HELP AND COMPLETIONS
// ══════════════════════════════════════════════════════════════════════════════

mod help {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("parse"))
            .stdout(predicate::str::contains("feed"))
            .stdout(predicate::str::contains("trace"))
            .stdout(predicate::str::contains("completions"))
            .stdout(predicate::str::contains("PUSHDOWN_GRAMMAR"));
    }

    #[test]
    fn test_bash_completions() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pushdown"));
    }

    #[test]
    fn test_unknown_grammar_rejected() {
        let dir = TempDir::new().unwrap();

        pushdown_cmd(&dir)
            .args(["feed", "--grammar", "lisp", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown grammar"));
    }
}
