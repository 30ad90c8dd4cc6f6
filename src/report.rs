use std::io;
use ariadne::{Color, Config, Label, Report, ReportKind, sources};
use rowan::TextSize;
use crate::{binding::BindingKind, unused::UnusedParam};

/// `<file>:<line> <function> contains unused parameter <name>`
pub fn plain_line(file: &str, result: &UnusedParam) -> String {
    format!("{}:{} {}\n", file, result.line, result)
}

fn color(kind: BindingKind) -> Color {
    match kind {
        BindingKind::Parameter => Color::Yellow,
        BindingKind::Receiver => Color::Magenta,
        BindingKind::NamedReturn => Color::Cyan,
        BindingKind::ClosureParameter => Color::Blue,
    }
}

// assumes results to be sorted by occurrence in file
pub fn print(file: String, content: &str, results: &[UnusedParam]) -> io::Result<()> {
    let Some(first) = results.first() else { return Ok(()) };
    let mut builder = Report::build(
        ReportKind::Warning,
        file.clone(),
        char_offset(content, first.name_range.start())
    )
        .with_config(
            Config::default()
                .with_compact(true)
        )
        .with_message("Unused parameters were found.");

    // reverse order to avoid overlapping lanes
    let mut order = results.len();
    for result in results {
        order -= 1;

        let start_char = char_offset(content, result.name_range.start());
        let end_char = char_offset(content, result.name_range.end());
        builder = builder.with_label(Label::new((file.clone(), start_char..end_char))
            .with_message(format!("{} {} of {} is unused", result.kind, result.name, result.function))
            .with_color(color(result.kind))
            .with_order(order as i32)
        );
    }

    builder.finish()
        .print(sources(vec![
            (file, content)
        ]))
}

/// ariadne counts chars, rowan counts bytes
fn char_offset(content: &str, offset: TextSize) -> usize {
    let offset = usize::from(offset).min(content.len());
    content.char_indices()
        .take_while(|(byte, _)| *byte < offset)
        .count()
}

#[cfg(feature = "json-out")]
mod json_out {
    use serde::Serialize;
    use crate::{syntax::LineIndex, unused::UnusedParam};

    #[derive(Serialize)]
    struct Json<'a> {
        file: &'a str,
        results: Vec<JsonResult<'a>>,
    }

    /// Positions point at the unused name, 1-based
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonResult<'a> {
        line: usize,
        column: usize,
        end_column: usize,
        function: &'a str,
        name: &'a str,
        kind: String,
        message: String,
    }

    /// One JSON object describing the results of `file`
    pub fn json(file: &str, content: &str, results: &[UnusedParam]) -> serde_json::Result<String> {
        let lines = LineIndex::new(content);
        let json = Json {
            file,
            results: results.iter()
                .map(|result| {
                    let (line, column) = lines.line_col(result.name_range);
                    JsonResult {
                        line,
                        column: column + 1,
                        end_column: column + 1 + usize::from(result.name_range.len()),
                        function: &result.function,
                        name: &result.name,
                        kind: result.kind.to_string(),
                        message: result.to_string(),
                    }
                })
                .collect(),
        };
        serde_json::to_string(&json)
    }
}

#[cfg(feature = "json-out")]
pub use json_out::json;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_offsets() {
        let content = "// ä\nfunc f(x int) {}";
        assert_eq!(char_offset(content, TextSize::from(0)), 0);
        // `ä` takes two bytes
        assert_eq!(char_offset(content, TextSize::from(6)), 5);
        assert_eq!(char_offset(content, TextSize::from(100)), content.chars().count());
    }
}
