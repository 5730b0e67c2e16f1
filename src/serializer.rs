use crate::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// Render the batch as one pretty-printed JSON array
pub fn to_pretty_json(values: &[Value], indent: usize) -> Result<Vec<u8>> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());

    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, formatter);
    values.serialize(&mut ser)?;
    Ok(out)
}
