use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{FieldChoice, WidgetKind};

/// Marker kind carried by typed list columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ColumnKind {
    Select,
    Link,
}

/// Leading row-selection checkbox column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectColumn {
    #[serde(rename = "type")]
    kind: ColumnKind,
}

impl SelectColumn {
    fn new() -> Self {
        Self {
            kind: ColumnKind::Select,
        }
    }
}

/// Clickable column linking each row to its detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkColumn {
    #[serde(rename = "type")]
    kind: ColumnKind,
    field_name: String,
    label: String,
    href: String,
    link_text: String,
    sortable: bool,
}

impl LinkColumn {
    /// Returns the backing field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the detail-view href template (`{id}` placeholder).
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }
}

/// Plain sortable data column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataColumn {
    field_name: String,
    label: String,
    sortable: bool,
}

impl DataColumn {
    /// Returns the backing field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// One column of a generated list surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListColumn {
    /// Row-selection checkbox.
    Select(SelectColumn),
    /// Link column; the first readable display field is promoted to this.
    Link(LinkColumn),
    /// Ordinary data column.
    Data(DataColumn),
}

impl ListColumn {
    /// Creates the leading select column.
    #[must_use]
    pub fn select() -> Self {
        Self::Select(SelectColumn::new())
    }

    /// Creates a link column pointing at the model's detail route.
    #[must_use]
    pub fn link(
        field_name: impl Into<String>,
        label: impl Into<String>,
        href: impl Into<String>,
        link_text: impl Into<String>,
    ) -> Self {
        Self::Link(LinkColumn {
            kind: ColumnKind::Link,
            field_name: field_name.into(),
            label: label.into(),
            href: href.into(),
            link_text: link_text.into(),
            sortable: true,
        })
    }

    /// Creates a sortable data column.
    #[must_use]
    pub fn data(field_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Data(DataColumn {
            field_name: field_name.into(),
            label: label.into(),
            sortable: true,
        })
    }

    /// Returns the backing field name, when the column has one.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Select(_) => None,
            Self::Link(column) => Some(column.field_name()),
            Self::Data(column) => Some(column.field_name()),
        }
    }
}

/// One action button emitted with a list surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAction {
    label: String,
    action: String,
    url: String,
    method: String,
}

impl RowAction {
    /// Creates a row action.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        action: impl Into<String>,
        url: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
            url: url.into(),
            method: method.into(),
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the action discriminator understood by the client.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the HTTP method the client should use.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// One fieldset of a detail or form surface, filtered to readable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    label: String,
    fields: Vec<String>,
}

impl Fieldset {
    /// Creates a fieldset.
    #[must_use]
    pub fn new(label: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }

    /// Returns the fieldset label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the surviving field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serialized widget configuration for one readable form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormFieldConfig {
    widget: WidgetKind,
    required: bool,
    #[serde(skip_serializing_if = "is_false")]
    disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    help_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<FieldChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl FormFieldConfig {
    /// Creates a form field configuration.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        widget: WidgetKind,
        required: bool,
        disabled: bool,
        help_text: Option<String>,
        choices: Vec<FieldChoice>,
        max_length: Option<u32>,
        label: Option<String>,
    ) -> Self {
        Self {
            widget,
            required,
            disabled,
            help_text,
            choices,
            max_length,
            label,
        }
    }

    /// Returns the widget kind.
    #[must_use]
    pub fn widget(&self) -> WidgetKind {
        self.widget
    }

    /// Returns whether the field must be filled.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns whether the field is rendered read-only.
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.disabled
    }
}

/// Generated list surface: columns, grouped actions and readable rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSurface {
    columns: Vec<ListColumn>,
    actions: Vec<Vec<RowAction>>,
    rows: Vec<Map<String, Value>>,
}

impl ListSurface {
    /// Creates a list surface.
    #[must_use]
    pub fn new(
        columns: Vec<ListColumn>,
        actions: Vec<Vec<RowAction>>,
        rows: Vec<Map<String, Value>>,
    ) -> Self {
        Self {
            columns,
            actions,
            rows,
        }
    }

    /// Returns the emitted columns.
    #[must_use]
    pub fn columns(&self) -> &[ListColumn] {
        &self.columns
    }

    /// Returns the grouped action lists.
    #[must_use]
    pub fn actions(&self) -> &[Vec<RowAction>] {
        &self.actions
    }

    /// Returns the rows, already stripped of unreadable fields.
    #[must_use]
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }
}

/// Generated detail surface for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSurface {
    record: Map<String, Value>,
    fieldsets: Vec<Fieldset>,
    form: BTreeMap<String, FormFieldConfig>,
}

impl DetailSurface {
    /// Creates a detail surface.
    #[must_use]
    pub fn new(
        record: Map<String, Value>,
        fieldsets: Vec<Fieldset>,
        form: BTreeMap<String, FormFieldConfig>,
    ) -> Self {
        Self {
            record,
            fieldsets,
            form,
        }
    }

    /// Returns the readable projection of the record.
    #[must_use]
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Returns the surviving fieldsets.
    #[must_use]
    pub fn fieldsets(&self) -> &[Fieldset] {
        &self.fieldsets
    }

    /// Returns the per-field form configuration.
    #[must_use]
    pub fn form(&self) -> &BTreeMap<String, FormFieldConfig> {
        &self.form
    }
}

/// Generated create/update form surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSurface {
    fieldsets: Vec<Fieldset>,
    form: BTreeMap<String, FormFieldConfig>,
}

impl FormSurface {
    /// Creates a form surface.
    #[must_use]
    pub fn new(fieldsets: Vec<Fieldset>, form: BTreeMap<String, FormFieldConfig>) -> Self {
        Self { fieldsets, form }
    }

    /// Returns the surviving fieldsets.
    #[must_use]
    pub fn fieldsets(&self) -> &[Fieldset] {
        &self.fieldsets
    }

    /// Returns the per-field form configuration.
    #[must_use]
    pub fn form(&self) -> &BTreeMap<String, FormFieldConfig> {
        &self.form
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ListColumn;

    #[test]
    fn select_column_serializes_bare_type_marker() {
        let column = ListColumn::select();
        let value = serde_json::to_value(&column).unwrap_or_else(|_| unreachable!());
        assert_eq!(value, json!({"type": "select"}));
    }

    #[test]
    fn link_column_serializes_camel_case_keys() {
        let column = ListColumn::link("name", "Name", "/r/post/{id}/view", "{name}");
        let value = serde_json::to_value(&column).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            value,
            json!({
                "type": "link",
                "fieldName": "name",
                "label": "Name",
                "href": "/r/post/{id}/view",
                "linkText": "{name}",
                "sortable": true
            })
        );
    }

    #[test]
    fn data_column_has_no_type_marker() {
        let column = ListColumn::data("status", "Status");
        let value = serde_json::to_value(&column).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            value,
            json!({"fieldName": "status", "label": "Status", "sortable": true})
        );
    }
}
