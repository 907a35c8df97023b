//! Object metadata: the global object listing and per-object describes

pub mod models;

pub use models::{FieldDescription, ObjectDescription, ObjectList, ObjectSummary};

use super::errors::ApiError;
use super::session::Session;
use super::transport::{RequestContext, Transport, get_success};
use log::debug;

/// Read the object listing at `objects_path`.
///
/// Shared by [`list_objects`] and the bootstrap step that needs the batch
/// size limit before a [`Session`] exists.
pub(crate) async fn fetch_object_list(
    transport: &dyn Transport,
    ctx: &RequestContext,
    objects_path: &str,
) -> Result<ObjectList, ApiError> {
    let body = get_success(transport, ctx, objects_path, &[]).await?;
    serde_json::from_value(body).map_err(|e| ApiError::malformed(objects_path, e.to_string()))
}

/// List every object the tenant exposes, plus its batch size limit
pub async fn list_objects(
    transport: &dyn Transport,
    session: &Session,
) -> Result<ObjectList, ApiError> {
    fetch_object_list(transport, &session.request_context(), session.objects_path()).await
}

/// Describe one object's fields
pub async fn describe(
    transport: &dyn Transport,
    session: &Session,
    object_name: &str,
) -> Result<ObjectDescription, ApiError> {
    let path = session.describe_path(object_name);
    let body = get_success(transport, &session.request_context(), &path, &[]).await?;
    let description: ObjectDescription =
        serde_json::from_value(body).map_err(|e| ApiError::malformed(&path, e.to_string()))?;
    debug!("{} has {} fields", object_name, description.fields.len());
    Ok(description)
}

/// Field API names of one object, in server-returned order
pub async fn get_field_names(
    transport: &dyn Transport,
    session: &Session,
    object_name: &str,
) -> Result<Vec<String>, ApiError> {
    Ok(describe(transport, session, object_name).await?.field_names())
}
