use super::{Line, Model, ModelError, Section, TITLE};

/// Parses SWMM `.inp` text into a [`Model`].
///
/// Blank and comment-only lines are kept as records without values so a
/// model can be written back with its layout intact.
///
/// # Errors
///
/// Returns a `ModelError` on a malformed section header or an unterminated
/// quoted value.
pub fn parse(text: &str) -> Result<Model, ModelError> {
    let mut model = Model::default();
    let mut current: Option<usize> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = raw.trim();

        if trimmed.starts_with('[') {
            let (name, comment) = parse_header(trimmed, line_no)?;
            current = Some(match model.sections.iter().position(|s| s.name == name) {
                Some(index) => index,
                None => {
                    let mut section = Section::new(name);
                    section.comment = comment;
                    model.sections.push(section);
                    model.sections.len() - 1
                }
            });
            continue;
        }

        match current {
            Some(index) => {
                let section = &mut model.sections[index];
                let record = if section.name == TITLE {
                    title_line(raw)
                } else {
                    parse_record(raw, line_no)?
                };
                section.lines.push(record);
            }
            None => model.preamble.push(parse_record(raw, line_no)?),
        }
    }

    Ok(model)
}

fn parse_header(trimmed: &str, line: usize) -> Result<(String, Option<String>), ModelError> {
    let malformed = || ModelError::MalformedHeader {
        line,
        text: trimmed.to_string(),
    };
    let close = trimmed.find(']').ok_or_else(malformed)?;
    let name = trimmed[1..close].trim();
    if name.is_empty() {
        return Err(malformed());
    }
    let comment = trimmed[close + 1..]
        .trim()
        .strip_prefix(';')
        .map(str::to_string);
    Ok((name.to_ascii_uppercase(), comment))
}

fn title_line(raw: &str) -> Line {
    let text = raw.trim_end();
    if text.trim().is_empty() {
        Line::default()
    } else {
        Line::new(vec![text.to_string()])
    }
}

/// Splits one record into whitespace-separated values and a `;` comment.
fn parse_record(raw: &str, line: usize) -> Result<Line, ModelError> {
    let mut values = Vec::new();
    let mut comment = None;
    let mut token = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for (pos, ch) in raw.char_indices() {
        if quoted {
            if ch == '"' {
                quoted = false;
            } else {
                token.push(ch);
            }
            continue;
        }
        match ch {
            '"' => {
                quoted = true;
                in_token = true;
            }
            ';' => {
                comment = Some(raw[pos + 1..].trim_end().to_string());
                break;
            }
            c if c.is_whitespace() => {
                if in_token {
                    values.push(std::mem::take(&mut token));
                    in_token = false;
                }
            }
            c => {
                token.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ModelError::UnterminatedQuote { line });
    }
    if in_token {
        values.push(token);
    }

    Ok(Line { values, comment })
}
