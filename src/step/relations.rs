//! Dependency extraction into the shared execution context.

use log::debug;
use serde_json::Value;

use crate::context::{ContextValue, ExecutionContext};
use crate::error_handling::StepError;
use crate::extract::Extractor;
use crate::spec::{BodyType, RelationSource, RelationSpec, StepSpec};
use crate::step::request::BuiltRequest;
use crate::step::response::CapturedResponse;

/// Resolves each relation and stores the value under its name.
///
/// Relations run in order and values are stored as they resolve, so a
/// failure partway keeps everything extracted before it. Unlike
/// assertions, a relation that cannot resolve is an error: later steps
/// depend on the value existing.
pub fn extract_relations(
    spec: &StepSpec,
    built: &BuiltRequest,
    response: &CapturedResponse,
    extractor: &dyn Extractor,
    context: &mut ExecutionContext,
) -> Result<(), StepError> {
    let Some(relations) = spec.relations.as_deref() else {
        return Ok(());
    };
    for relation in relations {
        let value = resolve_relation(relation, built, response, extractor)?;
        debug!(
            "[{}][{}] saved dependency '{}'",
            spec.id, spec.name, relation.name
        );
        context.set(relation.name.clone(), value);
    }
    Ok(())
}

fn resolve_relation(
    relation: &RelationSpec,
    built: &BuiltRequest,
    response: &CapturedResponse,
    extractor: &dyn Extractor,
) -> Result<ContextValue, StepError> {
    let expression = relation.expression.trim();
    if expression == "$" {
        return Ok(ContextValue::Bytes(response.bytes.clone()));
    }
    if expression.eq_ignore_ascii_case("cookie") || expression.eq_ignore_ascii_case("cookies") {
        return Ok(ContextValue::Json(Value::String(response.cookies.clone())));
    }

    let Some(source) = &relation.from else {
        return Err(StepError::Configuration(format!(
            "relation '{}' needs a 'from' location for expression '{}'",
            relation.name, relation.expression
        )));
    };
    let data = match source {
        RelationSource::ResponseHeader => response.headers_value(),
        RelationSource::ResponseBody => response.body.to_value(),
        RelationSource::RequestHeader => echo_map(built.options.headers.as_ref()),
        RelationSource::RequestQuery => echo_map(built.options.params.as_ref()),
        RelationSource::RequestBody => match built.body_type {
            BodyType::Json => built.options.json.clone().unwrap_or(Value::Null),
            _ => built.options.data.clone().unwrap_or(Value::Null),
        },
        RelationSource::Unknown(raw) => {
            return Err(StepError::Configuration(format!(
                "cannot extract a dependency from location '{raw}'"
            )));
        }
    };
    let value = extractor.extract(&relation.method, &data, expression)?;
    Ok(ContextValue::Json(value))
}

/// Echoes a request string map as a JSON object, null when unset.
fn echo_map(map: Option<&std::collections::HashMap<String, String>>) -> Value {
    match map {
        Some(map) => Value::Object(
            map.iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect(),
        ),
        None => Value::Null,
    }
}
