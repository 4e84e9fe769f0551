use super::common::{lazydi_command, write_config};
use assert_cmd::prelude::*;
use predicates::prelude::*;

const APP_YAML: &str = "server:\n  host: localhost\n  port: 8080\n";

#[test]
fn test_get_scalar() {
    let (_temp, file) = write_config("app.yaml", APP_YAML);

    lazydi_command()
        .arg("get")
        .arg("server.port")
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn test_get_subtree_as_json() {
    let (_temp, file) = write_config("app.yaml", APP_YAML);

    lazydi_command()
        .args(["get", "server", "--json", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"host\": \"localhost\""))
        .stdout(predicate::str::contains("\"port\": 8080"));
}

#[test]
fn test_get_with_override() {
    let (_temp, file) = write_config("app.json", r#"{"server": {"port": 8080}}"#);

    lazydi_command()
        .args(["get", "server.port", "--set", "server.port=9090", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout("9090\n");
}

#[test]
fn test_dump_materializes_override_paths() {
    let (_temp, file) = write_config("app.yaml", "a: {}\n");

    lazydi_command()
        .args(["dump", "--json", "-s", "a.c=5", "-s", "x.y.z=true", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"c\": 5"))
        .stdout(predicate::str::contains("\"z\": true"));
}

#[test]
fn test_get_missing_key_fails() {
    let (_temp, file) = write_config("app.yaml", APP_YAML);

    lazydi_command()
        .args(["get", "server.missing", "-f"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing configuration key 'missing'"));
}

#[test]
fn test_get_fallback_short_circuit() {
    lazydi_command()
        .args(["get", "anything.at.all", "--fallback", "X"])
        .assert()
        .success()
        .stdout("X\n");
}

#[test]
fn test_dump_uninitialized_fails() {
    lazydi_command()
        .arg("dump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_invalid_override_fails() {
    let (_temp, file) = write_config("app.yaml", APP_YAML);

    lazydi_command()
        .args(["dump", "--set", "no-equals-sign", "-f"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}
