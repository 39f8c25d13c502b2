//! Core domain types for tokvar.
//!
//! - `Rgba` - normalized colours and their textual notations
//! - `TokenDefinition` / `PendingAlias` - flattened document tokens
//! - `Collection` / `Variable` - records of the variable store

mod colour;
mod token;
mod variable;

pub use colour::{OpacityFormat, Rgba};
pub use token::{PendingAlias, TokenDefinition, TokenKind, TokenPayload};
pub use variable::{
    Collection, CollectionId, Mode, ModeId, ResolvedType, Variable, VariableId, VariableValue,
};
