#![allow(clippy::unwrap_used, clippy::expect_used)]

use adx_core::ir::transliterate::FileNodes;
use adx_core::{FormatRegistry, FormatTarget, TrackingPlan, Transliterator, emit_nodes};
use pretty_assertions::assert_eq;

const PLAN: &str = r#"
tracks:
  SomeTrack:
    description: Something happened
    required: [id]
    properties:
      id: { type: string }
      at: { type: string, format: date-time }
  AnotherTrack: {}
  FeatureSpecificTrack:
    features: [Special Feature]
screens:
  Welcome:
    features: [Onboarding, Just Onboarding]
    tracks: [SomeTrack, AnotherTrack]
  AnotherScreen:
    features: [AnotherFeature]
traits:
  userId: { $ref: '#/$defs/userId' }
$defs:
  userId:
    type: string
    format: email
"#;

fn file(files: &[FileNodes], path: &str) -> String {
    let nodes: Vec<_> = files
        .iter()
        .filter(|f| f.path.join("/") == path)
        .flat_map(|f| f.nodes.clone())
        .collect();
    emit_nodes(&nodes)
}

fn transliterate(implementation: Option<&str>) -> Vec<FileNodes> {
    let plan = TrackingPlan::from_yaml_str(PLAN, &FormatRegistry::default()).unwrap();
    Transliterator {
        implementation: implementation.map(str::to_string),
        methods_async: true,
    }
    .transliterate(&plan)
    .unwrap()
}

#[test]
fn shared_names_cover_every_feature_and_screen() {
    let shared = file(&transliterate(None), "shared-definitions");
    assert!(shared.contains(
        "export type FeatureNames = \"Special Feature\" | \"Onboarding\" | \"Just Onboarding\" | \"AnotherFeature\";"
    ));
    assert!(shared.contains("export type ScreenNames = \"Welcome\" | \"AnotherScreen\";"));
    assert!(shared.contains("export type userId = string;"));
}

#[test]
fn welcome_screen_module() {
    let welcome = file(&transliterate(Some("./analytics")), "screens/Welcome");
    let expected = r#"import * as shared from "../shared-definitions";
import implementation from "../analytics";

export default async (props?: null, source?: { feature: "Onboarding" | "Just Onboarding"; screen?: "Welcome"; widget?: string; element?: string; action?: string }) => {
  const type = "screen";
  const name = "Welcome";
  const overwrittenSource = { screen: "Welcome", ...source };
  await implementation(type, name, props, overwrittenSource);
};

/**
 * Something happened
 */
export const SomeTrack = async (props: { id: string; at?: Date }, source?: { feature: "Onboarding" | "Just Onboarding"; screen?: "Welcome"; widget?: string; element?: string; action?: string }) => {
  const type = "track";
  const name = "SomeTrack";
  const overwrittenSource = { screen: "Welcome", ...source };
  await implementation(type, name, props, overwrittenSource);
};

export const AnotherTrack = async (props?: null, source?: { feature: "Onboarding" | "Just Onboarding"; screen?: "Welcome"; widget?: string; element?: string; action?: string }) => {
  const type = "track";
  const name = "AnotherTrack";
  const overwrittenSource = { screen: "Welcome", ...source };
  await implementation(type, name, props, overwrittenSource);
};
"#;
    assert_eq!(welcome, expected);
}

#[test]
fn another_screen_narrows_its_single_feature() {
    let another = file(&transliterate(None), "screens/AnotherScreen");
    assert!(another.contains("source?: { feature?: \"AnotherFeature\"; screen?: \"AnotherScreen\";"));
    assert!(another.contains(
        "const overwrittenSource = { feature: \"AnotherFeature\", screen: \"AnotherScreen\", ...source };"
    ));
    assert!(another.contains("console.log(type, name, props, overwrittenSource);"));
}

#[test]
fn module_level_tracks() {
    let tracks = file(&transliterate(None), "tracks");
    assert!(tracks.starts_with("import * as shared from \"./shared-definitions\";\n\n"));
    assert!(tracks.contains(
        "export const FeatureSpecificTrack = async (props?: null, source?: { feature?: \"Special Feature\"; screen: shared.ScreenNames;"
    ));
    assert!(tracks.contains("const overwrittenSource = { feature: \"Special Feature\", ...source };"));
    assert!(tracks.contains(
        "export const SomeTrack = async (props: { id: string; at?: Date }, source?: { feature: \"Onboarding\" | \"Just Onboarding\"; screen?: \"Welcome\";"
    ));
}

#[test]
fn traits_reference_shared_definitions() {
    let traits = file(&transliterate(None), "shared-traits");
    assert_eq!(
        traits,
        "import * as shared from \"./shared-definitions\";\n\nexport type userId = shared.userId;\n"
    );
}

#[test]
fn custom_formats_render_named_types() {
    let mut formats = FormatRegistry::default();
    formats.register("email", FormatTarget::Named("EmailAddress".into()));
    let plan = TrackingPlan::from_yaml_str(PLAN, &formats).unwrap();
    let files = Transliterator::default().transliterate(&plan).unwrap();
    assert!(file(&files, "shared-definitions").contains("export type userId = EmailAddress;"));
}

#[test]
fn dangling_track_reference_fails_the_whole_run() {
    let err = TrackingPlan::from_yaml_str(
        "screens:\n  Welcome:\n    tracks: [Nope]\n",
        &FormatRegistry::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "screen `Welcome`: tracks(Nope) not found");
}

#[test]
fn control_characters_in_names_stay_escaped() {
    let yaml = "tracks:\n  Broken:\n    name: \"Line\\rBreak\"\n    properties:\n      \"a\\tb\": { type: string }\n";
    let plan = TrackingPlan::from_yaml_str(yaml, &FormatRegistry::default()).unwrap();
    let tracks = file(&Transliterator::default().transliterate(&plan).unwrap(), "tracks");
    assert!(tracks.contains("const name = \"Line\\rBreak\";"));
    assert!(tracks.contains("props: { \"a\\tb\"?: string }"));
    assert!(!tracks.contains('\r'));
    assert!(!tracks.contains('\t'));
}
