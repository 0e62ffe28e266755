//! Error types for `folio-core`.

use thiserror::Error;

use crate::{
  admin::{Entity, Operation},
  validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationErrors),

  #[error("unknown entity: {0:?}")]
  UnknownEntity(String),

  #[error("unknown column {column:?} for {entity}")]
  UnknownColumn { entity: Entity, column: String },

  #[error("column {column:?} of {entity} cannot be edited inline")]
  NotEditable { entity: Entity, column: String },

  #[error("column {column:?} of {entity} is not a filter")]
  NotFilterable { entity: Entity, column: String },

  #[error("column {column:?} of {entity} is not sortable")]
  NotSortable { entity: Entity, column: String },

  #[error("{operation} is not permitted for {entity}")]
  NotPermitted { entity: Entity, operation: Operation },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
