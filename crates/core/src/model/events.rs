//! Screens, tracks and features.
//!
//! Entities live in the [`TrackingPlan`] arena and refer to each other by id.
//! Each event owns its normalized payload type and derives the type of its
//! `source` argument from the features and screens it can fire under.

use indexmap::IndexSet;

use crate::error::{Error, Result};
use crate::model::normalize::TypeMapper;
use crate::model::plan::TrackingPlan;
use crate::model::types::{
    Constant, ObjectProperty, ObjectType, StringType, TypeNode, TypeReference,
};
use crate::schema::EventDefinition;

/// Reference used for the `feature` source property when no feature is known.
pub const FEATURE_NAMES_REF: &str = "#/$defs/FeatureNames";
/// Reference used for the `screen` source property when no screen is known.
pub const SCREEN_NAMES_REF: &str = "#/$defs/ScreenNames";

/// Index of a [`Feature`] in its plan. Only valid for the plan that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub(crate) usize);

/// Index of a [`Screen`] in its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub(crate) usize);

/// Index of a module-level [`Track`] in its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub(crate) usize);

/// Value of the generated `type` binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A screen view.
    Screen,
    /// A user action.
    Track,
}

impl EventKind {
    /// `"screen"` or `"track"`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Screen => "screen",
            EventKind::Track => "track",
        }
    }
}

/// Data shared by screens and tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Plan key, unescaped.
    pub key: String,
    /// Display name, defaults to the key.
    pub name: String,
    pub description: Option<String>,
    pub additional_properties: bool,
    pub login_required: Option<bool>,
    /// Normalized `props` type.
    pub properties: ObjectType,
    /// Features the event belongs to, in first-mention order.
    pub features: Vec<FeatureId>,
}

impl Event {
    /// Build an event without any graph links.
    pub fn from_definition(
        kind: EventKind,
        definition: &EventDefinition,
        mapper: &TypeMapper<'_>,
    ) -> Result<Self> {
        let key = definition
            .key
            .clone()
            .ok_or(Error::MissingRequiredField("key"))?;
        let properties = mapper.map_object(&definition.properties_definition())?;

        Ok(Self {
            kind,
            name: definition.name.clone().unwrap_or_else(|| key.clone()),
            key,
            description: definition.description.clone(),
            additional_properties: definition.additional_properties.unwrap_or(false),
            login_required: definition.login_required,
            properties,
            features: Vec::new(),
        })
    }

    /// Identifier form of the key. Lossy: `"T&C Screen"` and `"TnCScreen"` collide.
    pub fn escape_key(&self) -> String {
        escape_key(&self.key)
    }
}

/// Export name for an event key: every space is removed and every `&`
/// becomes `n`. All occurrences are replaced, not just the first, so a
/// multi-word key still yields a single identifier.
pub fn escape_key(key: &str) -> String {
    key.replace(' ', "").replace('&', "n")
}

/// A product feature and the events that link to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub screens: Vec<ScreenId>,
    pub tracks: Vec<TrackId>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            screens: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

/// A screen and the screen-scoped copies of the tracks fired on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub event: Event,
    /// Owned copies, each narrowed to this screen.
    pub tracks: Vec<Track>,
}

/// A user-action event. Module-level tracks collect every screen that fires
/// them; screen-scoped copies hold exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub event: Event,
    pub screens: Vec<ScreenId>,
}

impl Track {
    /// Copy of this track narrowed to a single screen: the screen's features
    /// and only that screen.
    pub fn to_screen_specific(&self, screen_id: ScreenId, screen: &Screen) -> Track {
        Track {
            event: Event {
                features: screen.event.features.clone(),
                ..self.event.clone()
            },
            screens: vec![screen_id],
        }
    }
}

/// De-duplicated feature and screen names, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceNames {
    pub features: Vec<String>,
    pub screens: Vec<String>,
}

/// An event a tracking function can be generated for.
pub trait AnalyticsEvent {
    /// Shared event data.
    fn event(&self) -> &Event;

    /// Names of the features and screens this event can fire under.
    fn source_names(&self, plan: &TrackingPlan) -> SourceNames;

    /// Type of the `source` argument: `feature`, `screen`, `widget`,
    /// `element`, `action`.
    fn source_object_type(&self, plan: &TrackingPlan) -> Result<ObjectType> {
        source_to_object_type(&self.source_names(plan))
    }
}

fn feature_names<'p>(plan: &'p TrackingPlan, ids: &[FeatureId]) -> impl Iterator<Item = &'p str> {
    ids.iter()
        .filter_map(|id| plan.feature(*id))
        .map(|feature| feature.name.as_str())
}

impl AnalyticsEvent for Track {
    fn event(&self) -> &Event {
        &self.event
    }

    fn source_names(&self, plan: &TrackingPlan) -> SourceNames {
        let mut features: IndexSet<&str> = IndexSet::new();
        let mut screens: IndexSet<&str> = IndexSet::new();

        for screen in self.screens.iter().filter_map(|id| plan.screen(*id)) {
            screens.insert(screen.event.name.as_str());
            features.extend(feature_names(plan, &screen.event.features));
        }
        features.extend(feature_names(plan, &self.event.features));

        SourceNames {
            features: features.into_iter().map(str::to_string).collect(),
            screens: screens.into_iter().map(str::to_string).collect(),
        }
    }
}

impl AnalyticsEvent for Screen {
    fn event(&self) -> &Event {
        &self.event
    }

    fn source_names(&self, plan: &TrackingPlan) -> SourceNames {
        let features: IndexSet<&str> = feature_names(plan, &self.event.features).collect();
        SourceNames {
            features: features.into_iter().map(str::to_string).collect(),
            screens: vec![self.event.name.clone()],
        }
    }
}

/// Narrow one source axis: no names is the shared enumeration (required),
/// one name a constant (optional), several a union of constants (required).
fn narrow(names: &[String], all_names_ref: &str) -> Result<(TypeNode, bool)> {
    match names {
        [] => Ok((
            TypeNode::Reference(TypeReference::new(all_names_ref)),
            true,
        )),
        [only] => Ok((TypeNode::Constant(Constant::string(only.clone())), false)),
        _ => {
            let options = names
                .iter()
                .map(|name| TypeNode::Constant(Constant::string(name.clone())))
                .collect();
            Ok((TypeNode::union(options)?, true))
        }
    }
}

/// The `source` object for a set of names. Only `feature` and `screen` are
/// narrowed; `widget`, `element` and `action` stay optional strings.
pub fn source_to_object_type(names: &SourceNames) -> Result<ObjectType> {
    let (feature, feature_required) = narrow(&names.features, FEATURE_NAMES_REF)?;
    let (screen, screen_required) = narrow(&names.screens, SCREEN_NAMES_REF)?;
    let free_string = || TypeNode::String(StringType::default());

    Ok(ObjectType {
        properties: vec![
            ObjectProperty::new("feature", feature, feature_required),
            ObjectProperty::new("screen", screen, screen_required),
            ObjectProperty::new("widget", free_string(), false),
            ObjectProperty::new("element", free_string(), false),
            ObjectProperty::new("action", free_string(), false),
        ],
        additional_properties: false,
    })
}
