//! List-screen handlers shared by every resource: list, get, create,
//! update and delete, each driven through a `ResourceController`.

use serde::Serialize;
use tracing::debug;

use shopdesk_core::{
    DeleteOutcome, EntityId, FieldSpec, NO_CHANGES_MESSAGE, Resource, ResourceController, ResourceSpec,
    SubmitOutcome,
};

use super::Context;
use super::util;
use crate::cli::{ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle<R>(spec: ResourceSpec, args: ResourceArgs, ctx: &Context) -> Result<(), CliError>
where
    R: Resource + Serialize,
{
    let transport = ctx.client.build_transport()?;
    let controller = ResourceController::<R>::builder(spec)
        .transport(transport)
        .page_size(ctx.client.page_size)
        .build()?;
    let mut events = controller.events();

    let result = match args.command {
        ResourceCommand::List { page } => list(&controller, page, ctx).await,
        ResourceCommand::Get { id } => get(&controller, &id, ctx).await,
        ResourceCommand::Create { set } => create(&controller, &set).await,
        ResourceCommand::Update { id, set } => update(&controller, &id, &set).await,
        ResourceCommand::Delete { id } => delete(&controller, &id, ctx).await,
    };

    util::drain_events(&mut events, ctx);
    controller.unmount();
    result
}

async fn list<R>(controller: &ResourceController<R>, page: u32, ctx: &Context) -> Result<(), CliError>
where
    R: Resource + Serialize,
{
    controller.mount().await;
    if page != 1 {
        controller.change_page(page).await;
    }
    let state = controller.snapshot();
    let rendered = output::render_page(
        ctx.format,
        &state.page,
        controller.spec().schema(),
        ctx.color,
    )?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

async fn get<R>(controller: &ResourceController<R>, id: &str, ctx: &Context) -> Result<(), CliError>
where
    R: Resource + Serialize,
{
    let spec = controller.spec();
    let record = controller
        .fetch_one(&EntityId::from(id))
        .await
        .map_err(|e| not_found_for(spec, id, e))?;
    let rendered = output::render_record(ctx.format, &record, spec.schema())?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

async fn create<R: Resource>(
    controller: &ResourceController<R>,
    set: &[(String, String)],
) -> Result<(), CliError> {
    let spec = controller.spec();
    ensure_writable(spec)?;
    check_fields(spec, set, false)?;

    controller.open_create();
    apply_fields(controller, set);
    finish_submit(spec, controller.submit().await)
}

async fn update<R: Resource>(
    controller: &ResourceController<R>,
    id: &str,
    set: &[(String, String)],
) -> Result<(), CliError> {
    let spec = controller.spec();
    ensure_writable(spec)?;
    check_fields(spec, set, true)?;

    let id = EntityId::from(id);
    if !controller.open_edit(&id).await {
        // Surface why the record could not be loaded.
        controller
            .fetch_one(&id)
            .await
            .map_err(|e| not_found_for(spec, &id.to_string(), e))?;
        return Err(CliError::Internal(format!(
            "could not open {} {id} for editing",
            spec.label()
        )));
    }
    apply_fields(controller, set);
    finish_submit(spec, controller.submit().await)
}

async fn delete<R: Resource>(
    controller: &ResourceController<R>,
    id: &str,
    ctx: &Context,
) -> Result<(), CliError> {
    let spec = controller.spec();
    ensure_writable(spec)?;

    let prompt = format!("Delete {} {id}?", spec.label());
    if !util::confirm(&prompt, &format!("delete {} {id}", spec.label()), ctx.yes)? {
        debug!(resource = %spec.endpoint(), %id, "delete declined");
        return Ok(());
    }

    match controller.delete(&EntityId::from(id)).await {
        DeleteOutcome::Succeeded => Ok(()),
        DeleteOutcome::Failed(message) => Err(CliError::Rejected { message }),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn ensure_writable(spec: &ResourceSpec) -> Result<(), CliError> {
    if spec.is_writable() {
        Ok(())
    } else {
        Err(CliError::ReadOnly {
            resource: spec.label().to_owned(),
        })
    }
}

/// Reject names the form does not have, and create-only fields on edit.
fn check_fields(spec: &ResourceSpec, set: &[(String, String)], editing: bool) -> Result<(), CliError> {
    let schema = spec.schema();
    for (name, _) in set {
        match schema.get(name) {
            None => {
                let known = schema
                    .fields()
                    .iter()
                    .map(FieldSpec::name)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(CliError::Validation {
                    field: name.clone(),
                    reason: format!("unknown field for {}; expected one of: {known}", spec.label()),
                });
            }
            Some(field) if editing && field.is_create_only() => {
                return Err(CliError::Validation {
                    field: name.clone(),
                    reason: "cannot be changed after creation".into(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn apply_fields<R: Resource>(controller: &ResourceController<R>, set: &[(String, String)]) {
    for (name, value) in set {
        controller.set_field(name, value.as_str());
        controller.blur_field(name);
    }
}

fn finish_submit(spec: &ResourceSpec, outcome: SubmitOutcome) -> Result<(), CliError> {
    match outcome {
        SubmitOutcome::Saved => Ok(()),
        SubmitOutcome::Invalid(errors) => Err(CliError::InvalidFields {
            resource: spec.label().to_owned(),
            details: util::format_field_errors(&errors),
        }),
        SubmitOutcome::Rejected(message) => Err(CliError::Rejected { message }),
        SubmitOutcome::NoChanges => Err(CliError::Rejected {
            message: NO_CHANGES_MESSAGE.into(),
        }),
        SubmitOutcome::Closed => Err(CliError::Internal(format!(
            "the {} form closed before it was submitted",
            spec.label()
        ))),
    }
}

fn not_found_for(spec: &ResourceSpec, id: &str, err: shopdesk_core::CoreError) -> CliError {
    match err {
        shopdesk_core::CoreError::NotFound { .. } => {
            CliError::not_found(spec.label(), id, spec.endpoint())
        }
        other => other.into(),
    }
}
