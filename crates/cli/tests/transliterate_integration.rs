#![allow(clippy::unwrap_used, clippy::expect_used)]

use adx_cli::run_cli;
use std::fs;
use std::path::Path;

const PLAN: &str = r#"
tracks:
  SomeTrack:
    description: Something happened
    properties:
      id: { type: string }
  AnotherTrack: {}
screens:
  Welcome:
    features: [Onboarding]
    tracks: [SomeTrack]
traits:
  userId: { $ref: '#/$defs/userId' }
$defs:
  userId:
    type: string
    format: email
"#;

fn args(parts: &[&str]) -> Vec<String> {
    std::iter::once("adx")
        .chain(parts.iter().copied())
        .map(str::to_string)
        .collect()
}

fn write_plan(dir: &Path) -> String {
    let plan = dir.join("plan.yml");
    fs::write(&plan, PLAN).unwrap();
    plan.to_string_lossy().into_owned()
}

#[test]
fn writes_every_module() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path());
    let out = dir.path().join("generated");
    let implementation = dir.path().join("src").join("track.ts");

    let code = run_cli(args(&[
        "transliterate",
        "-i",
        &plan,
        "-o",
        out.to_str().unwrap(),
        "--implementation",
        implementation.to_str().unwrap(),
    ]));
    assert_eq!(code, 0);

    for file in [
        "shared-definitions.ts",
        "shared-traits.ts",
        "tracks.ts",
        "screens/Welcome.ts",
    ] {
        assert!(out.join(file).is_file(), "{file} should exist");
    }

    let welcome = fs::read_to_string(out.join("screens/Welcome.ts")).unwrap();
    assert!(welcome.starts_with(
        "import * as shared from \"../shared-definitions\";\nimport implementation from \"../../src/track\";\n"
    ));
    assert!(welcome.contains("export const SomeTrack = async (props: { id?: string }"));

    let tracks = fs::read_to_string(out.join("tracks.ts")).unwrap();
    assert!(tracks.contains("import implementation from \"../src/track\";"));
    assert!(tracks.contains("export const AnotherTrack = async"));

    let shared = fs::read_to_string(out.join("shared-definitions.ts")).unwrap();
    assert!(shared.contains("export type userId = string;"));
}

#[test]
fn check_mode_detects_drift() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path());
    let out = dir.path().join("generated");
    let out = out.to_str().unwrap();

    // Nothing generated yet.
    assert_eq!(
        run_cli(args(&["transliterate", "-i", &plan, "-o", out, "--check"])),
        1
    );
    assert!(!Path::new(out).exists());

    assert_eq!(run_cli(args(&["transliterate", "-i", &plan, "-o", out])), 0);
    assert_eq!(
        run_cli(args(&["transliterate", "-i", &plan, "-o", out, "--check"])),
        0
    );

    fs::write(Path::new(out).join("tracks.ts"), "// edited by hand\n").unwrap();
    assert_eq!(
        run_cli(args(&["transliterate", "-i", &plan, "-o", out, "--check"])),
        1
    );
}

#[test]
fn sync_methods_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_plan(dir.path());
    let config = dir.path().join("adx.toml");
    fs::write(
        &config,
        r#"
[transliterate]
input = "plan.yml"
output = "out"
implementation = "analytics.ts"
methods-async = false

[formats]
email = "EmailAddress"
"#,
    )
    .unwrap();

    let code = run_cli(args(&["transliterate", "--config", config.to_str().unwrap()]));
    assert_eq!(code, 0);

    let tracks = fs::read_to_string(dir.path().join("out/tracks.ts")).unwrap();
    assert!(tracks.contains("import implementation from \"../analytics\";"));
    assert!(tracks.contains("export const AnotherTrack = (props?: null"));
    assert!(tracks.contains("  implementation(type, name, props, overwrittenSource);"));
    assert!(!tracks.contains("await"));

    let shared = fs::read_to_string(dir.path().join("out/shared-definitions.ts")).unwrap();
    assert!(shared.contains("export type userId = EmailAddress;"));
}

#[test]
fn invalid_plan_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.yml");
    fs::write(&plan, "screens:\n  Welcome:\n    tracks: [Missing]\n").unwrap();
    let out = dir.path().join("out");

    let code = run_cli(args(&[
        "transliterate",
        "-i",
        plan.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]));
    assert_eq!(code, 1);
    assert!(!out.exists());
}
