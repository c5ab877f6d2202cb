use std::path::Path;
use std::process::{Command, Output};

fn nextapp(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nextapp"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("NEXTAPP_DB_PATH")
        .env_remove("NEXTAPP_MODEL")
        .env_remove("NEXTAPP_TIMEZONE")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run nextapp")
}

#[test]
fn record_then_predict_json() {
    let dir = tempfile::tempdir().unwrap();
    for (i, app) in ["org.mail", "org.chat", "org.mail", "org.chat", "org.mail"]
        .iter()
        .enumerate()
    {
        let ts = (1_709_542_800_000i64 + i as i64 * 60_000).to_string();
        let out = nextapp(dir.path(), &["record", app, "--timestamp", &ts]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    }

    let out = nextapp(dir.path(), &["predict", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(report["model"], "Markov Chain");
    assert_eq!(report["has_enough_data"], false);
    assert_eq!(report["previous_app"], "org.mail");
    assert_eq!(report["predictions"][0]["app"], "org.mail");
}

#[test]
fn excluded_packages_are_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let out = nextapp(dir.path(), &["record", "com.android.systemui"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Skipped"));

    let out = nextapp(dir.path(), &["stats"]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("Events:        0"));
}

#[test]
fn model_switch_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let out = nextapp(dir.path(), &["model", "switch"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = nextapp(dir.path(), &["model", "show"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "naive_bayes");

    let out = nextapp(dir.path(), &["predict", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["model"], "Naive Bayes");
    assert_eq!(report["predictions"].as_array().map(Vec::len), Some(0));
}

#[test]
fn rejects_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    let out = nextapp(dir.path(), &["predict", "--model", "lstm"]);
    assert!(!out.status.success());
}

#[test]
fn cleanup_rejects_non_positive_retention() {
    let dir = tempfile::tempdir().unwrap();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    for (i, app) in ["org.mail", "org.chat"].iter().enumerate() {
        let ts = (now - 2_000 + i as i64 * 1_000).to_string();
        let out = nextapp(dir.path(), &["record", app, "--timestamp", &ts]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    }

    for days in ["-1", "0"] {
        let arg = format!("--retention-days={days}");
        let out = nextapp(dir.path(), &["cleanup", &arg]);
        assert!(!out.status.success());
    }

    let out = nextapp(dir.path(), &["cleanup", "--retention-days", "9223372036854775807"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Deleted 0 events"));

    let out = nextapp(dir.path(), &["stats"]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("Events:        2"));
}
