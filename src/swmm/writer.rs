//! Serializes a [`Model`] back to SWMM `.inp` text.

use std::io::{self, Write};

use super::{Line, Model, TITLE};

/// Placeholder SWMM reads as "no value" for an optional positional field.
const EMPTY_FIELD: &str = "*";

/// Writes `model` as `.inp` text.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails, or one of kind `InvalidData`
/// for a value containing `"`, which the format cannot represent.
pub fn write<W: Write>(model: &Model, out: &mut W) -> io::Result<()> {
    for line in &model.preamble {
        write_line(out, line)?;
    }

    for (i, section) in model.sections.iter().enumerate() {
        if i > 0 || !model.preamble.is_empty() {
            let previous_blank = match i {
                0 => model.preamble.last(),
                _ => model.sections[i - 1].lines.last(),
            }
            .is_some_and(|l| !l.is_data() && l.comment.is_none());
            if !previous_blank {
                writeln!(out)?;
            }
        }

        match &section.comment {
            Some(comment) => writeln!(out, "[{}] ;{comment}", section.name)?,
            None => writeln!(out, "[{}]", section.name)?,
        }

        for line in &section.lines {
            if section.name == TITLE {
                write_title_line(out, line)?;
            } else {
                write_line(out, line)?;
            }
        }
    }

    Ok(())
}

/// Renders the record values of one line, without its comment.
///
/// # Errors
///
/// Returns an `InvalidData` error if a value contains `"`.
pub fn format_values(values: &[String]) -> io::Result<String> {
    let last = values.iter().rposition(|v| !v.is_empty());
    let Some(last) = last else {
        return Ok(String::new());
    };
    let formatted = values[..=last]
        .iter()
        .map(|v| format_value(v))
        .collect::<io::Result<Vec<_>>>()?;
    Ok(formatted.join(" "))
}

fn format_value(value: &str) -> io::Result<String> {
    if value.contains('"') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("value {value:?} contains a double quote"),
        ));
    }
    Ok(if value.is_empty() {
        EMPTY_FIELD.to_string()
    } else if value.chars().any(|c| c.is_whitespace() || c == ';') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    })
}

fn write_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    let values = format_values(&line.values)?;
    match (&line.comment, values.is_empty()) {
        (Some(comment), true) => writeln!(out, ";{comment}"),
        (Some(comment), false) => writeln!(out, "{values} ;{comment}"),
        (None, _) => writeln!(out, "{values}"),
    }
}

fn write_title_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    writeln!(out, "{}", line.values.join(" "))
}
