//! Domain entities and invariants for the Trellis policy engine.

#![forbid(unsafe_code)]

mod config;
mod descriptor;
mod operation;
mod surface;

pub use config::{
    AppEntry, AppVisibility, FieldRule, GroupConfig, MetadataConfig, ModelEntry, ModelPermissions,
    ProfileConfig, TabEntry, TabVisibility, TabVisibilityState,
};
pub use descriptor::{
    ActionSpec, FieldChoice, FieldDescriptor, FieldsetSpec, ModelDescriptor, WidgetKind,
};
pub use operation::CrudOperation;
pub use surface::{
    DataColumn, DetailSurface, Fieldset, FormFieldConfig, FormSurface, LinkColumn, ListColumn,
    ListSurface, RowAction, SelectColumn,
};
