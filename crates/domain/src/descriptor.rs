use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use trellis_core::{AppError, AppResult, NonEmptyString};

use crate::RowAction;

/// Widget rendered for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    /// Single-line text input.
    TextInput,
    /// Multi-line text area.
    Textarea,
    /// Select or radio choice widget.
    Select,
    /// Boolean checkbox.
    Checkbox,
    /// Date or date-time picker.
    DateInput,
    /// Numeric input.
    NumberInput,
    /// Email input.
    EmailInput,
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChoice {
    value: String,
    label: String,
}

impl FieldChoice {
    /// Creates a choice entry.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Returns the stored value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Adapter-supplied description of one editable field.
///
/// The engine never introspects a live object graph; whatever reflection the
/// data layer performs is flattened into these values before policy runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: NonEmptyString,
    widget: WidgetKind,
    required: bool,
    help_text: Option<String>,
    choices: Vec<FieldChoice>,
    max_length: Option<u32>,
    label: Option<String>,
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        widget: WidgetKind,
        required: bool,
        help_text: Option<String>,
        choices: Vec<FieldChoice>,
        max_length: Option<u32>,
        label: Option<String>,
    ) -> AppResult<Self> {
        if let Some(max_length) = max_length
            && max_length == 0
        {
            return Err(AppError::Validation(
                "field max_length must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            name: NonEmptyString::new(name)?,
            widget,
            required,
            help_text,
            choices,
            max_length,
            label,
        })
    }

    /// Creates a plain text field without extras, the common case in tests
    /// and composition roots.
    pub fn text(name: impl Into<String>, required: bool) -> AppResult<Self> {
        Self::new(name, WidgetKind::TextInput, required, None, Vec::new(), None, None)
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the widget kind.
    #[must_use]
    pub fn widget(&self) -> WidgetKind {
        self.widget
    }

    /// Returns whether the field is required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the help text, if any.
    #[must_use]
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// Returns the selectable choices.
    #[must_use]
    pub fn choices(&self) -> &[FieldChoice] {
        &self.choices
    }

    /// Returns the maximum input length, if constrained.
    #[must_use]
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    /// Returns the label override, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Named group of fields shown together on detail and form surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsetSpec {
    label: String,
    fields: Vec<String>,
}

impl FieldsetSpec {
    /// Creates a fieldset declaration.
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

    /// Returns the declared field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Declared list action, either the `new` shorthand or a custom action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSpec {
    /// Shorthand expanded to a create action for the model.
    New,
    /// Fully specified action passed through to the surface.
    Custom(RowAction),
}

/// Adapter-supplied description of one model's generated views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    model_key: NonEmptyString,
    label: NonEmptyString,
    list_display: Vec<String>,
    fieldsets: Vec<FieldsetSpec>,
    fields: Vec<FieldDescriptor>,
    list_actions: Vec<ActionSpec>,
}

impl ModelDescriptor {
    /// Creates a validated model descriptor.
    pub fn new(
        model_key: impl Into<String>,
        label: impl Into<String>,
        list_display: Vec<String>,
        fieldsets: Vec<FieldsetSpec>,
        fields: Vec<FieldDescriptor>,
        list_actions: Vec<ActionSpec>,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name().as_str().to_owned()) {
                return Err(AppError::Validation(format!(
                    "duplicate field descriptor '{}' for model",
                    field.name().as_str()
                )));
            }
        }

        Ok(Self {
            model_key: NonEmptyString::new(model_key)?,
            label: NonEmptyString::new(label)?,
            list_display,
            fieldsets,
            fields,
            list_actions,
        })
    }

    /// Returns the lowercase model key.
    #[must_use]
    pub fn model_key(&self) -> &NonEmptyString {
        &self.model_key
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the declared list columns, in order.
    #[must_use]
    pub fn list_display(&self) -> &[String] {
        &self.list_display
    }

    /// Returns the declared fieldsets.
    #[must_use]
    pub fn fieldsets(&self) -> &[FieldsetSpec] {
        &self.fieldsets
    }

    /// Returns the form field descriptors.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the declared list actions.
    #[must_use]
    pub fn list_actions(&self) -> &[ActionSpec] {
        &self.list_actions
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, ModelDescriptor};

    #[test]
    fn descriptor_rejects_duplicate_field_names() {
        let first = FieldDescriptor::text("name", true).unwrap_or_else(|_| unreachable!());
        let second = FieldDescriptor::text("name", false).unwrap_or_else(|_| unreachable!());
        let result = ModelDescriptor::new(
            "post",
            "Post",
            vec!["name".to_owned()],
            Vec::new(),
            vec![first, second],
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn descriptor_rejects_empty_model_key() {
        let result =
            ModelDescriptor::new("", "Post", Vec::new(), Vec::new(), Vec::new(), Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn field_descriptor_rejects_zero_max_length() {
        let result = FieldDescriptor::new(
            "title",
            super::WidgetKind::TextInput,
            true,
            None,
            Vec::new(),
            Some(0),
            None,
        );
        assert!(result.is_err());
    }
}
