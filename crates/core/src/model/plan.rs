//! The tracking plan graph.
//!
//! Built in one pass from a [`PlanDefinition`]: tracks first, then screens
//! (which link the tracks they list), then `$defs` and `traits`. Features are
//! created on first mention.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Error, Result, ResultExt};
use crate::model::events::{Event, EventKind, Feature, FeatureId, Screen, ScreenId, Track, TrackId};
use crate::model::format::FormatRegistry;
use crate::model::normalize::TypeMapper;
use crate::model::types::TypeNode;
use crate::schema::{EventDefinition, PlanDefinition, TypeDefinition};

/// A named shared type from `$defs` or `traits`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    pub ty: TypeNode,
    pub description: Option<String>,
}

/// The linked plan: every feature, screen, track, `$defs` entry and trait,
/// in document order.
#[derive(Debug, Clone, Default)]
pub struct TrackingPlan {
    features: Vec<Feature>,
    screens: Vec<Screen>,
    tracks: Vec<Track>,
    defs: Vec<NamedType>,
    traits: Vec<NamedType>,
}

impl TrackingPlan {
    /// Parse and build in one step.
    pub fn from_yaml_str(yaml: &str, formats: &FormatRegistry) -> Result<Self> {
        let definition = PlanDefinition::from_yaml(yaml)?;
        Self::from_definition(&definition, formats)
    }

    /// Build the plan. Tracks go first so screens can refer to them; the
    /// first failing entity aborts the build with its key as context.
    pub fn from_definition(definition: &PlanDefinition, formats: &FormatRegistry) -> Result<Self> {
        let mapper = TypeMapper::new(formats);
        let mut plan = Self::default();

        for (key, track) in &definition.tracks {
            plan.add_track(key, track.as_ref(), &mapper)
                .context_with(|| format!("track `{key}`"))?;
        }
        for (key, screen) in &definition.screens {
            plan.add_screen(key, screen.as_ref(), &mapper)
                .context_with(|| format!("screen `{key}`"))?;
        }
        plan.defs = named_types(&definition.defs, &mapper, "$defs")?;
        plan.traits = named_types(&definition.traits, &mapper, "traits")?;

        info!(
            features = plan.features.len(),
            screens = plan.screens.len(),
            tracks = plan.tracks.len(),
            defs = plan.defs.len(),
            traits = plan.traits.len(),
            "Built tracking plan."
        );
        Ok(plan)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn defs(&self) -> &[NamedType] {
        &self.defs
    }

    pub fn traits(&self) -> &[NamedType] {
        &self.traits
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.0)
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(id.0)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    pub fn track_by_key(&self, key: &str) -> Option<&Track> {
        self.track_id(key).and_then(|id| self.track(id))
    }

    pub fn screen_by_key(&self, key: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.event.key == key)
    }

    pub fn feature_by_name(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    fn track_id(&self, key: &str) -> Option<TrackId> {
        self.tracks
            .iter()
            .position(|t| t.event.key == key)
            .map(TrackId)
    }

    fn feature_id(&mut self, name: &str) -> FeatureId {
        if let Some(index) = self.features.iter().position(|f| f.name == name) {
            return FeatureId(index);
        }
        debug!(feature = name, "Registering feature.");
        self.features.push(Feature::new(name));
        FeatureId(self.features.len() - 1)
    }

    fn build_event(
        &mut self,
        kind: EventKind,
        key: &str,
        definition: Option<&EventDefinition>,
        mapper: &TypeMapper<'_>,
    ) -> Result<Event> {
        let mut definition = definition.cloned().unwrap_or_default();
        definition.key = Some(key.to_string());

        let mut event = Event::from_definition(kind, &definition, mapper)?;
        for name in &definition.features {
            let id = self.feature_id(name);
            if !event.features.contains(&id) {
                event.features.push(id);
            }
        }
        Ok(event)
    }

    fn add_track(
        &mut self,
        key: &str,
        definition: Option<&EventDefinition>,
        mapper: &TypeMapper<'_>,
    ) -> Result<TrackId> {
        let event = self.build_event(EventKind::Track, key, definition, mapper)?;
        let id = TrackId(self.tracks.len());
        for feature in &event.features {
            self.features[feature.0].tracks.push(id);
        }
        debug!(track = key, features = event.features.len(), "Added track.");
        self.tracks.push(Track {
            event,
            screens: Vec::new(),
        });
        Ok(id)
    }

    fn add_screen(
        &mut self,
        key: &str,
        definition: Option<&EventDefinition>,
        mapper: &TypeMapper<'_>,
    ) -> Result<ScreenId> {
        let event = self.build_event(EventKind::Screen, key, definition, mapper)?;
        let id = ScreenId(self.screens.len());
        let mut screen = Screen {
            event,
            tracks: Vec::new(),
        };

        for track_key in definition.map(|d| d.tracks.as_slice()).unwrap_or_default() {
            let track_id = self.track_id(track_key).ok_or_else(|| Error::GraphLookup {
                kind: "tracks",
                name: track_key.clone(),
            })?;
            let track = &mut self.tracks[track_id.0];
            let scoped = track.to_screen_specific(id, &screen);
            if !track.screens.contains(&id) {
                track.screens.push(id);
            }
            screen.tracks.push(scoped);
        }

        for feature in &screen.event.features {
            self.features[feature.0].screens.push(id);
        }
        debug!(
            screen = key,
            tracks = screen.tracks.len(),
            features = screen.event.features.len(),
            "Added screen."
        );
        self.screens.push(screen);
        Ok(id)
    }
}

fn named_types(
    definitions: &IndexMap<String, TypeDefinition>,
    mapper: &TypeMapper<'_>,
    section: &str,
) -> Result<Vec<NamedType>> {
    definitions
        .iter()
        .map(|(name, definition)| {
            let ty = mapper
                .map(definition)
                .context_with(|| format!("{section} `{name}`"))?;
            Ok(NamedType {
                name: name.clone(),
                ty,
                description: definition.description.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::events::{AnalyticsEvent, SourceNames};
    use crate::model::types::Constant;
    use pretty_assertions::assert_eq;

    const PLAN: &str = r#"
tracks:
  SomeTrack:
    properties:
      id: { type: string }
  AnotherTrack: {}
screens:
  Welcome:
    name: Welcome Screen
    features: [Onboarding, Just Onboarding]
    tracks: [SomeTrack, AnotherTrack]
  AnotherScreen:
    features: [AnotherFeature]
"#;

    fn plan() -> TrackingPlan {
        TrackingPlan::from_yaml_str(PLAN, &FormatRegistry::default()).unwrap()
    }

    #[test]
    fn test_features_are_created_once_in_order() {
        let plan = plan();
        let names: Vec<_> = plan.features().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Onboarding", "Just Onboarding", "AnotherFeature"]);
        let onboarding = plan.feature_by_name("Onboarding").unwrap();
        assert_eq!(onboarding.screens.len(), 1);
        assert!(onboarding.tracks.is_empty());
    }

    #[test]
    fn test_screen_links_tracks() {
        let plan = plan();
        let welcome = plan.screen_by_key("Welcome").unwrap();
        assert_eq!(welcome.event.name, "Welcome Screen");
        let keys: Vec<_> = welcome.tracks.iter().map(|t| t.event.key.as_str()).collect();
        assert_eq!(keys, vec!["SomeTrack", "AnotherTrack"]);

        let some_track = plan.track_by_key("SomeTrack").unwrap();
        assert_eq!(some_track.screens.len(), 1);
        assert!(some_track.event.features.is_empty());
    }

    #[test]
    fn test_screen_specific_copy() {
        let plan = plan();
        let welcome = plan.screen_by_key("Welcome").unwrap();
        let scoped = &welcome.tracks[0];
        let global = plan.track_by_key("SomeTrack").unwrap();

        assert_eq!(scoped.event.key, global.event.key);
        assert_eq!(scoped.event.properties, global.event.properties);
        assert_eq!(scoped.event.features, welcome.event.features);
        assert_eq!(scoped.screens.len(), 1);
        assert_eq!(
            scoped.source_names(&plan),
            SourceNames {
                features: vec!["Onboarding".into(), "Just Onboarding".into()],
                screens: vec!["Welcome Screen".into()],
            }
        );
    }

    #[test]
    fn test_track_fired_on_two_screens() {
        let plan = TrackingPlan::from_yaml_str(
            r#"
tracks:
  Tap: { features: [Own] }
screens:
  TheScreen: { features: [A], tracks: [Tap] }
  AnotherScreen: { features: [B, A], tracks: [Tap] }
"#,
            &FormatRegistry::default(),
        )
        .unwrap();
        let tap = plan.track_by_key("Tap").unwrap();
        assert_eq!(
            tap.source_names(&plan),
            SourceNames {
                features: vec!["A".into(), "B".into(), "Own".into()],
                screens: vec!["TheScreen".into(), "AnotherScreen".into()],
            }
        );
        let source = tap.source_object_type(&plan).unwrap();
        assert!(source.property("screen").unwrap().required);
    }

    #[test]
    fn test_screen_narrows_to_itself() {
        let plan = plan();
        let another = plan.screen_by_key("AnotherScreen").unwrap();
        let source = another.source_object_type(&plan).unwrap();
        let screen = source.property("screen").unwrap();
        assert_eq!(screen.ty, TypeNode::Constant(Constant::string("AnotherScreen")));
        let feature = source.property("feature").unwrap();
        assert_eq!(feature.ty, TypeNode::Constant(Constant::string("AnotherFeature")));
        assert!(!feature.required);
    }

    #[test]
    fn test_unknown_track_reference() {
        let err = TrackingPlan::from_yaml_str(
            "screens:\n  Home:\n    tracks: [Missing]\n",
            &FormatRegistry::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "screen `Home`: tracks(Missing) not found");
        assert!(matches!(err.root_cause(), Error::GraphLookup { .. }));
    }

    #[test]
    fn test_defs_and_traits() {
        let plan = TrackingPlan::from_yaml_str(
            r#"
$defs:
  userId:
    description: Identifier of the signed-in user
    type: string
    format: email
traits:
  userId: { $ref: '#/$defs/userId' }
"#,
            &FormatRegistry::default(),
        )
        .unwrap();
        assert_eq!(plan.defs().len(), 1);
        assert_eq!(
            plan.defs()[0].description.as_deref(),
            Some("Identifier of the signed-in user")
        );
        assert!(matches!(plan.traits()[0].ty, TypeNode::Reference(_)));
    }

    #[test]
    fn test_invalid_property_reports_event() {
        let err = TrackingPlan::from_yaml_str(
            "tracks:\n  Broken:\n    properties:\n      kind: { type: string, enum: [] }\n",
            &FormatRegistry::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "track `Broken`: property `kind`: enums must have at least one value"
        );
    }
}
