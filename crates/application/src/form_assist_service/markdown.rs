use std::fmt::Write as _;

/// Renders the user-facing explanation of an AI-assisted edit.
#[must_use]
pub fn format_assist_markdown(explanation: &str, complexity: usize, warnings: &[String]) -> String {
    let noun = if complexity == 1 { "component" } else { "components" };

    let mut markdown = String::from("## Form Update\n\n");
    markdown.push_str(explanation);
    let _ = write!(
        markdown,
        "\n\n**Changes summary:** the updated form now contains {complexity} {noun}.\n"
    );

    if !warnings.is_empty() {
        markdown.push_str("\n### Warnings\n\n");
        for warning in warnings {
            let _ = writeln!(markdown, "- {warning}");
        }
    }

    markdown
}
