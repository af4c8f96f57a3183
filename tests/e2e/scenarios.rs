use std::fs;

use super::helpers::TestProject;

const LODASH_MANIFEST: &str =
    r#"{ "name": "lodash", "version": "4.17.21", "license": "MIT" }"#;
const LEFTPAD_MANIFEST: &str =
    r#"{ "name": "leftpad", "version": "1.0.0", "license": "UNLICENSED" }"#;

#[test]
fn test_check_reports_violations_and_writes_notice() {
    let env = TestProject::new();
    let project = env.init_project("app");
    env.add_package(&project, "lodash", LODASH_MANIFEST, Some("MIT license text"));
    env.add_package(&project, "leftpad", LEFTPAD_MANIFEST, None);
    env.write_config(&project, "allow = \"MIT\"\n");

    let output = env.run_checker(&project, &["check"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("leftpad@1.0.0 is unlicensed"));
    assert!(stderr.contains(
        "leftpad@1.0.0 has a license of type UNLICENSED but has no license text"
    ));

    let notice = fs::read_to_string(project.join("ThirdPartyNotice.txt")).unwrap();
    let leftpad_at = notice.find("leftpad").unwrap();
    let lodash_at = notice.find("lodash").unwrap();
    assert!(leftpad_at < lodash_at);
    assert!(notice.contains("License: MIT"));
}

#[test]
fn test_emit_error_fails_the_run() {
    let env = TestProject::new();
    let project = env.init_project("strict-app");
    env.add_package(&project, "leftpad", LEFTPAD_MANIFEST, None);
    env.write_config(&project, "allow = \"MIT\"\nemit_error = true\n");

    let output = env.run_checker(&project, &["check"]);
    assert!(!output.status.success());

    // The notice is still produced even when the run fails.
    assert!(project.join("ThirdPartyNotice.txt").is_file());
}

#[test]
fn test_clean_project_passes() {
    let env = TestProject::new();
    let project = env.init_project("clean-app");
    env.add_package(&project, "lodash", LODASH_MANIFEST, Some("MIT license text"));
    env.write_config(&project, "allow = \"MIT\"\nemit_error = true\n");

    let output = env.run_checker(&project, &["check"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("violation"));
}

#[test]
fn test_ignore_rule_drops_dependency() {
    let env = TestProject::new();
    let project = env.init_project("ignoring-app");
    env.add_package(&project, "leftpad", LEFTPAD_MANIFEST, None);
    env.write_config(
        &project,
        "allow = \"MIT\"\nemit_error = true\nignore = [\"leftpad@^1.0.0\"]\n",
    );

    let output = env.run_checker(&project, &["check"]);
    assert!(output.status.success());

    let notice = fs::read_to_string(project.join("ThirdPartyNotice.txt")).unwrap();
    assert!(!notice.contains("leftpad"));
}

#[test]
fn test_override_rule_patches_license() {
    let env = TestProject::new();
    let project = env.init_project("overriding-app");
    env.add_package(
        &project,
        "assert",
        r#"{ "name": "assert", "version": "1.5.0", "license": "SEE LICENSE IN LICENSE.txt" }"#,
        Some("license body"),
    );
    env.write_config(
        &project,
        "allow = \"MIT\"\nemit_error = true\n\n[override.\"assert@1.x\"]\nlicense_name = \"MIT\"\n",
    );

    let output = env.run_checker(&project, &["check"]);
    assert!(output.status.success());

    let notice = fs::read_to_string(project.join("ThirdPartyNotice.txt")).unwrap();
    assert!(notice.contains("License: MIT"));
}

#[test]
fn test_html_writer_and_custom_filename() {
    let env = TestProject::new();
    let project = env.init_project("html-app");
    env.add_package(&project, "lodash", LODASH_MANIFEST, Some("MIT license text"));
    env.write_config(
        &project,
        "allow = \"MIT\"\noutput_writer = \"html\"\noutput_filename = \"notices.html\"\n",
    );

    let output = env.run_checker(&project, &["check"]);
    assert!(output.status.success());

    let notice = fs::read_to_string(project.join("notices.html")).unwrap();
    assert!(notice.contains("<h2>lodash 4.17.21</h2>"));
}

#[test]
fn test_check_stdout_prints_notice() {
    let env = TestProject::new();
    let project = env.init_project("stdout-app");
    env.add_package(&project, "lodash", LODASH_MANIFEST, Some("MIT license text"));
    env.write_config(&project, "allow = \"MIT\"\n");

    let output = env.run_checker(&project, &["check", "--stdout"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("THIRD-PARTY SOFTWARE NOTICES"));
    assert!(!project.join("ThirdPartyNotice.txt").exists());
}

#[test]
fn test_init_and_config_validate() {
    let env = TestProject::new();
    let project = env.init_project("init-app");

    let init_output = env.run_checker(&project, &["init"]);
    assert!(init_output.status.success());
    assert!(project.join("license-checker.toml").is_file());

    let validate_output = env.run_checker(&project, &["config", "--validate"]);
    assert!(validate_output.status.success());
    assert!(String::from_utf8_lossy(&validate_output.stdout).contains("Configuration is valid"));
}

#[test]
fn test_config_show_prints_loaded_options() {
    let env = TestProject::new();
    let project = env.init_project("show-app");
    env.write_config(&project, "allow = \"MIT\"\noutput_filename = \"notices.txt\"\n");

    let output = env.run_checker(&project, &["config", "--show"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"allow\": \"MIT\""));
    assert!(stdout.contains("notices.txt"));
}

#[test]
fn test_invalid_config_fails_validation() {
    let env = TestProject::new();
    let project = env.init_project("broken-app");
    env.write_config(&project, "allow = \"MIT OR\"\n");

    let output = env.run_checker(&project, &["config", "--validate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("validation failed"));
}
