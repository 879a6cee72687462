pub mod align;
pub mod error;
pub mod extract;
pub mod markup;
pub mod model;
pub mod name;
pub mod oracle;

pub use error::LineError;
pub use model::{
    AnnotatedMove, Arrow, HighlightedSquare, MarkupColor, SchedulingState, Side, StudyLine,
};
