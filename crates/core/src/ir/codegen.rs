//! Tracking function synthesis.
//!
//! Every event becomes an arrow function taking `props` and an optional
//! `source`, binding `type`, `name` and `overwrittenSource`, then handing the
//! four values to `implementation` (or `console.log` when none is wired in).

use super::render::{ImportMappings, ToTsType, default_import_mappings, literal_members};
use super::types::{ObjectMember, TsArrow, TsExpr, TsNode, TsParam, TsPrimitive, TsStmt, TsType};
use crate::error::{Result, ResultExt};
use crate::model::events::{AnalyticsEvent, Screen, Track};
use crate::model::plan::TrackingPlan;

/// Per-render options shared by every generated function.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Call an imported `implementation` instead of logging.
    pub has_implementation: bool,
    /// Emit `async` functions that await the implementation.
    pub methods_async: bool,
    pub import_mappings: ImportMappings,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            has_implementation: false,
            methods_async: true,
            import_mappings: default_import_mappings(),
        }
    }
}

/// The tracking function for one event.
pub fn codegen_analytics_function<E>(
    event: &E,
    plan: &TrackingPlan,
    options: &SynthesisOptions,
) -> Result<TsArrow>
where
    E: AnalyticsEvent + ?Sized,
{
    let data = event.event();
    let source = event.source_object_type(plan)?;

    let props = if data.properties.properties.is_empty() {
        TsParam {
            name: "props".to_string(),
            ty: Some(TsType::Primitive(TsPrimitive::Null)),
            optional: true,
        }
    } else {
        TsParam {
            name: "props".to_string(),
            ty: Some(data.properties.to_ts_type(&options.import_mappings)),
            optional: false,
        }
    };
    let source_param = TsParam {
        name: "source".to_string(),
        ty: Some(source.to_ts_type(&options.import_mappings)),
        optional: true,
    };

    let mut overwritten = literal_members(&source)?;
    overwritten.push(ObjectMember::Spread(TsExpr::ident("source")));

    let args = ["type", "name", "props", "overwrittenSource"]
        .into_iter()
        .map(TsExpr::ident)
        .collect();
    let call = if options.has_implementation {
        let call = TsExpr::Call {
            callee: Box::new(TsExpr::ident("implementation")),
            args,
        };
        if options.methods_async {
            TsExpr::Await(Box::new(call))
        } else {
            call
        }
    } else {
        TsExpr::Call {
            callee: Box::new(TsExpr::Member {
                object: Box::new(TsExpr::ident("console")),
                prop: "log".to_string(),
            }),
            args,
        }
    };

    Ok(TsArrow {
        params: vec![props, source_param],
        body: vec![
            TsStmt::Const {
                name: "type".to_string(),
                init: TsExpr::string(data.kind.as_str()),
            },
            TsStmt::Const {
                name: "name".to_string(),
                init: TsExpr::string(&data.name),
            },
            TsStmt::Const {
                name: "overwrittenSource".to_string(),
                init: TsExpr::Object(overwritten),
            },
            TsStmt::Expr(call),
        ],
        is_async: options.methods_async,
    })
}

/// `export const <escapedKey> = ...`, documented with the track description.
///
/// Used for module-level tracks and for the screen-scoped copies a screen
/// holds.
pub fn codegen_track_export(
    track: &Track,
    plan: &TrackingPlan,
    options: &SynthesisOptions,
) -> Result<Vec<TsNode>> {
    let function = codegen_analytics_function(track, plan, options)
        .context_with(|| format!("track `{}`", track.event.key))?;

    let mut nodes = Vec::new();
    if let Some(description) = &track.event.description {
        nodes.push(TsNode::Doc(description.clone()));
    }
    nodes.push(TsNode::ExportConst {
        name: track.event.escape_key(),
        init: TsExpr::Arrow(function),
    });
    Ok(nodes)
}

/// A screen module: the screen function as default export, then one named
/// export per track fired on the screen.
pub fn codegen_screen_module(
    screen: &Screen,
    plan: &TrackingPlan,
    options: &SynthesisOptions,
) -> Result<Vec<TsNode>> {
    let function = codegen_analytics_function(screen, plan, options)
        .context_with(|| format!("screen `{}`", screen.event.key))?;

    let mut nodes = Vec::new();
    if let Some(description) = &screen.event.description {
        nodes.push(TsNode::Doc(description.clone()));
    }
    nodes.push(TsNode::ExportDefault(TsExpr::Arrow(function)));

    for track in &screen.tracks {
        nodes.extend(
            codegen_track_export(track, plan, options)
                .context_with(|| format!("screen `{}`", screen.event.key))?,
        );
    }
    Ok(nodes)
}
