use std::fmt::Write;

use super::Segment;
use crate::values::{Map, Value};

/// Render segments against a data record.
///
/// Missing keys render as the empty string. The output is written
/// verbatim into the tree: nothing is escaped.
pub fn render(segments: &[Segment], data: &Map) -> String {
    let lookup = |name: &str| data.get(name).unwrap_or(&Value::Null);
    let truthy = |name: &str| lookup(name).is_truthy();

    segments.iter().fold(String::new(), |mut output, segment| {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Variable(name) => {
                let _ = write!(output, "{}", lookup(name));
            }
            Segment::Conditional { cond, then } => {
                if truthy(cond) {
                    let _ = write!(output, "{}", lookup(then));
                }
            }
            Segment::ConditionalLiteral { cond, then } => {
                if truthy(cond) {
                    output.push_str(then);
                }
            }
            Segment::ConditionalLiteralElse {
                cond,
                then,
                otherwise,
            } => match truthy(cond) {
                true => output.push_str(then),
                false => output.push_str(otherwise),
            },
        }
        output
    })
}
