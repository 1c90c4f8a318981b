//! Graphviz rendering of compiled state tables
//!
//! ```rust
//! use trielex::lexicon::LexiconBuilder;
//! use trielex::lexeme::{LexemeDef, Mode, Pattern};
//!
//! let table = LexiconBuilder::new(Mode::Character)
//!     .default_lexeme(LexemeDef::fallback("text"))
//!     .lexeme(LexemeDef::new("hr", Pattern::literal("---")))
//!     .build()
//!     .unwrap()
//!     .compile();
//!
//! let dot = table.to_dot();
//! assert!(dot.starts_with("digraph StateTable {"));
//! ```

use super::{Accept, Criterion, StateTable, TransitionKind};
use crate::token::Tag;
use std::fmt::{self, Write};

impl StateTable {
    /// Render the table in DOT format.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = self.write_dot(&mut output);
        output
    }

    /// Write the table in DOT format.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the writer.
    pub fn write_dot(&self, output: &mut impl Write) -> fmt::Result {
        writeln!(output, "digraph StateTable {{")?;
        writeln!(output, "  rankdir=LR;")?;
        writeln!(output, "  node [shape=circle];")?;
        writeln!(output)?;

        for (i, state) in self.states().iter().enumerate() {
            let shape = if state.is_initial {
                "doublecircle"
            } else if state.is_terminal_reset {
                "box"
            } else {
                "circle"
            };
            writeln!(output, "  s{i} [label={:?}, shape={shape}];", state.name.as_str())?;
        }
        writeln!(output)?;

        for (i, state) in self.states().iter().enumerate() {
            for transition in &state.transitions {
                let mut label = criterion_label(&transition.criterion);
                if let Some(accept) = transition.accept {
                    let kind = self.lexeme(accept.lexeme()).map_or("?", |l| l.kind());
                    match accept {
                        Accept::FullMatch(_) => write!(label, " / {kind}")?,
                        Accept::PartialMatch(_) => write!(label, " / {kind}~")?,
                    }
                }
                if transition.replay {
                    label.push_str(" (replay)");
                }
                let style = if transition.kind == TransitionKind::CatchAll {
                    ", style=dashed"
                } else {
                    ""
                };
                writeln!(
                    output,
                    "  s{i} -> s{} [label={label:?}{style}];",
                    transition.target.0
                )?;
            }
        }

        writeln!(output, "}}")
    }
}

fn criterion_label(criterion: &Criterion) -> String {
    let join = |tags: &[Tag]| tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(" ");
    match criterion {
        Criterion::Exact(tag) => tag.to_string(),
        Criterion::OneOf(tags) if tags.is_empty() => "eos".to_owned(),
        Criterion::OneOf(tags) => format!("[{}]", join(tags)),
        Criterion::Excluding(tags) if tags.is_empty() => "*".to_owned(),
        Criterion::Excluding(tags) => format!("[^{}]", join(tags)),
    }
}

#[cfg(test)]
mod tests {
    use crate::lexeme::{Attribute, LexemeDef, Mode, Pattern};
    use crate::lexicon::LexiconBuilder;

    #[test]
    fn test_to_dot() {
        let table = LexiconBuilder::new(Mode::Character)
            .default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
            .lexeme(LexemeDef::new("bell", Pattern::notation("b, x+").unwrap()))
            .build()
            .unwrap()
            .compile();
        let dot = table.to_dot();
        assert!(dot.starts_with("digraph StateTable {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains(r#"s0 [label="<root>", shape=doublecircle];"#));
        assert!(dot.contains(r#"label="<reset>", shape=box"#));
        // b -> b/x
        assert!(dot.contains(r#"s1 -> s2 [label="x"];"#));
        // self-loop on b/x
        assert!(dot.contains(r#"s2 -> s2 [label="x"];"#));
        assert!(dot.contains(r#"[label="[^x] / bell (replay)", style=dashed]"#));
        assert!(dot.contains(r#"[label="[^b] / text", style=dashed]"#));
    }
}
