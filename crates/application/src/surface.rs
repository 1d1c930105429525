use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use trellis_core::{AppError, AppResult, UserIdentity};
use trellis_domain::{
    ActionSpec, CrudOperation, DetailSurface, Fieldset, FormFieldConfig, FormSurface, ListColumn,
    ListSurface, MetadataConfig, ModelDescriptor, RowAction,
};

use crate::{DataAccessPort, FieldAccessResolution, PermissionAuthority};

/// Derives UI-surface descriptors from authorization decisions.
///
/// Every surface applies the model-level check before any field-level work;
/// a denied model surfaces as [`AppError::NotFound`], so callers cannot tell
/// "forbidden" from "missing".
#[derive(Clone)]
pub struct ViewSurfaceBuilder {
    authority: PermissionAuthority,
    records: Arc<dyn DataAccessPort>,
}

impl ViewSurfaceBuilder {
    /// Creates a builder from the authority and a record port.
    #[must_use]
    pub fn new(authority: PermissionAuthority, records: Arc<dyn DataAccessPort>) -> Self {
        Self { authority, records }
    }

    /// Builds the list surface: columns, actions and readable rows.
    ///
    /// The first readable display field is promoted to a link column; when
    /// the descriptor declares no display fields at all, a single `name`
    /// link column stands in.
    pub async fn list_surface(
        &self,
        user: &UserIdentity,
        descriptor: &ModelDescriptor,
        config: &MetadataConfig,
    ) -> AppResult<ListSurface> {
        let model_key = descriptor.model_key().as_str();
        self.require_model(user, model_key, CrudOperation::Read, config)
            .await?;

        let resolution = FieldAccessResolution::resolve(config, user, model_key);
        let detail_href = format!("/r/{model_key}/{{id}}/view");

        let mut columns = vec![ListColumn::select()];
        let mut first_column_added = false;
        for field_name in descriptor.list_display() {
            if !resolution.is_readable(field_name) {
                continue;
            }
            if first_column_added {
                columns.push(ListColumn::data(field_name, humanize(field_name)));
            } else {
                columns.push(ListColumn::link(
                    field_name,
                    humanize(field_name),
                    detail_href.clone(),
                    format!("{{{field_name}}}"),
                ));
                first_column_added = true;
            }
        }
        if descriptor.list_display().is_empty() {
            columns.push(ListColumn::link("name", "Name", detail_href, "{name}"));
        }

        let mut action_group = Vec::new();
        for action in descriptor.list_actions() {
            match action {
                ActionSpec::New => {
                    let can_create = self
                        .authority
                        .authorize(user, model_key, CrudOperation::Create, config)
                        .await?;
                    if can_create {
                        action_group.push(RowAction::new(
                            format!("New {}", descriptor.label().as_str()),
                            "create",
                            format!("/m/{model_key}/create"),
                            "GET",
                        ));
                    }
                }
                ActionSpec::Custom(action) => action_group.push(action.clone()),
            }
        }

        let records = self.records.query_for_user(user, model_key).await?;
        let rows = records
            .into_iter()
            .map(|record| project_record(record, &resolution))
            .collect();

        Ok(ListSurface::new(columns, vec![action_group], rows))
    }

    /// Builds the detail surface for one record.
    pub async fn detail_surface(
        &self,
        user: &UserIdentity,
        descriptor: &ModelDescriptor,
        record_id: &str,
        config: &MetadataConfig,
    ) -> AppResult<DetailSurface> {
        let model_key = descriptor.model_key().as_str();
        self.require_model(user, model_key, CrudOperation::Read, config)
            .await?;

        let resolution = FieldAccessResolution::resolve(config, user, model_key);
        let record = self
            .records
            .find_for_user(user, model_key, record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{model_key} '{record_id}'")))?;

        Ok(DetailSurface::new(
            project_record(record, &resolution),
            filter_fieldsets(descriptor, &resolution),
            form_fields(descriptor, &resolution),
        ))
    }

    /// Builds the creation form surface.
    pub async fn create_surface(
        &self,
        user: &UserIdentity,
        descriptor: &ModelDescriptor,
        config: &MetadataConfig,
    ) -> AppResult<FormSurface> {
        self.form_surface(user, descriptor, CrudOperation::Create, config)
            .await
    }

    /// Builds the update form surface.
    pub async fn update_surface(
        &self,
        user: &UserIdentity,
        descriptor: &ModelDescriptor,
        config: &MetadataConfig,
    ) -> AppResult<FormSurface> {
        self.form_surface(user, descriptor, CrudOperation::Edit, config)
            .await
    }

    async fn form_surface(
        &self,
        user: &UserIdentity,
        descriptor: &ModelDescriptor,
        operation: CrudOperation,
        config: &MetadataConfig,
    ) -> AppResult<FormSurface> {
        let model_key = descriptor.model_key().as_str();
        self.require_model(user, model_key, operation, config)
            .await?;

        let resolution = FieldAccessResolution::resolve(config, user, model_key);
        Ok(FormSurface::new(
            filter_fieldsets(descriptor, &resolution),
            form_fields(descriptor, &resolution),
        ))
    }

    async fn require_model(
        &self,
        user: &UserIdentity,
        model_key: &str,
        operation: CrudOperation,
        config: &MetadataConfig,
    ) -> AppResult<()> {
        let authorized = self
            .authority
            .authorize(user, model_key, operation, config)
            .await?;

        if authorized {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("model '{model_key}'")))
        }
    }
}

/// Strips every non-readable field from a record projection.
///
/// `id` and `name` always survive; the id backs row links and `name` is the
/// generic display handle every record carries.
fn project_record(
    mut record: Map<String, Value>,
    resolution: &FieldAccessResolution,
) -> Map<String, Value> {
    record.retain(|field_name, _| {
        field_name == "id" || field_name == "name" || resolution.is_readable(field_name)
    });
    record
}

/// Intersects declared fieldsets with readability, dropping empty ones.
fn filter_fieldsets(
    descriptor: &ModelDescriptor,
    resolution: &FieldAccessResolution,
) -> Vec<Fieldset> {
    descriptor
        .fieldsets()
        .iter()
        .filter_map(|fieldset| {
            let fields: Vec<String> = fieldset
                .fields()
                .iter()
                .filter(|field| resolution.is_readable(field))
                .cloned()
                .collect();
            (!fields.is_empty()).then(|| Fieldset::new(fieldset.label(), fields))
        })
        .collect()
}

/// Serializes the readable form fields, flagging non-editable ones disabled.
fn form_fields(
    descriptor: &ModelDescriptor,
    resolution: &FieldAccessResolution,
) -> BTreeMap<String, FormFieldConfig> {
    descriptor
        .fields()
        .iter()
        .filter(|field| resolution.is_readable(field.name().as_str()))
        .map(|field| {
            let disabled = !resolution.is_editable(field.name().as_str());
            (
                field.name().as_str().to_owned(),
                FormFieldConfig::new(
                    field.widget(),
                    field.required(),
                    disabled,
                    field.help_text().map(ToOwned::to_owned),
                    field.choices().to_vec(),
                    field.max_length(),
                    field.label().map(ToOwned::to_owned),
                ),
            )
        })
        .collect()
}

/// Derives a column label from a snake_case field name.
fn humanize(field_name: &str) -> String {
    field_name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod humanize_tests {
    use super::humanize;

    #[test]
    fn humanize_title_cases_snake_case() {
        assert_eq!(humanize("created_at"), "Created At");
        assert_eq!(humanize("name"), "Name");
    }
}
