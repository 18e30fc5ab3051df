//! Comment directives.
//!
//! Authors embed layout commands in markdown as HTML comments with three
//! dashes, `<!---COMMAND param--->`. The serializer hands the comment text to
//! a [`DirectiveInterpreter`], which matches it against an ordered table of
//! recognizers and renders the first match:
//!
//! | Command | Output |
//! |---|---|
//! | `BOX`, `BOX.INFO`, `BOX.WARN`, `BOX.ALERT` (and `/...`) | styled box divs |
//! | `CONTAINER id` (and `/CONTAINER`) | collapsible container div |
//! | `STYLE tags:styles` (and `/STYLE`) | adds/removes classes, emits nothing |
//! | `TOGGLER id[,type]` | toggler anchor and script |
//! | `TOGGLER.AFTER` / `TOGGLER.BEFORE tags:styles[,type]` | toggler script for matching elements |
//! | `TOC` | table-of-contents container and script |
//!
//! Comments that match no recognizer are dropped from the output.

mod command;
mod interpreter;
mod output;
mod routes;

pub use command::{BoxVariant, Directive, DirectiveKind, StyleFilter, TogglerPosition};
pub use interpreter::DirectiveInterpreter;
pub use output::{DirectiveOutcome, DropReason};
pub(crate) use routes::recognize;
