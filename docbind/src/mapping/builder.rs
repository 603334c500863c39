use crate::common::{Value, DOC_ID};
use crate::document::Document;
use crate::errors::DocbindResult;
use crate::model::Model;
use crate::schema::ModelType;
use std::sync::Arc;

/// Builds a new unpersisted model instance from a query selector.
///
/// A selector mixes plain equality conditions with operator conditions and
/// nested-document matchers. Only the plain conditions describe attribute
/// values a matching instance would carry, so only those are applied:
///
/// - keys containing `$` (operator conditions such as `age.$gt`) are dropped,
/// - [Value::Document] values (nested matchers such as range documents) are
///   dropped,
/// - `_id` and the hierarchy's discriminator field are never attributes,
/// - relation-named keys are dropped,
/// - undeclared keys are dropped when the type lacks dynamic attributes.
///
/// Dropping is silent best-effort reconstruction, never an error; an empty
/// or all-operator selector yields a default-constructed instance.
pub fn build(selector: &Document, model_type: &Arc<ModelType>) -> DocbindResult<Model> {
    let mut attrs = Document::new();
    for (key, value) in selector.iter() {
        if key.contains('$') {
            log::debug!("Dropping operator condition {} from selector", key);
            continue;
        }
        if matches!(value, Value::Document(_)) {
            log::debug!("Dropping nested condition {} from selector", key);
            continue;
        }
        if key == DOC_ID || key == model_type.discriminator_key() {
            continue;
        }
        if model_type.relation(&key).is_some() {
            log::debug!("Dropping relation condition {} from selector", key);
            continue;
        }
        if !model_type.has_field(&key) && !model_type.dynamic_attributes() {
            log::debug!(
                "Dropping undeclared condition {} from selector for {}",
                key,
                model_type.name()
            );
            continue;
        }
        attrs.put(key, value)?;
    }

    Model::new(model_type.clone(), attrs)
}
