//! Structural queries over compiled syntax trees.

mod declarations;
mod filter;

pub use declarations::{
    Declaration, DeclarationIter, DeclarationScope, Declarations, OwnedDeclarations,
    find_declarations,
};
pub use filter::DeclarationFilter;
