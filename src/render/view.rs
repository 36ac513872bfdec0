//! Rendering view options (§4.G): the knobs callers pass into `render`.

/// The output formats the renderer supports (§4.G).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Html,
    Markdown,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "html" => Some(OutputFormat::Html),
            "markdown" => Some(OutputFormat::Markdown),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
        }
    }
}

/// All known formats, in the fixed order used to list them in error messages.
pub const ALL_FORMATS: &[&str] = &["table", "json", "html", "markdown", "csv"];

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub format: OutputFormat,
    pub show_details: bool,
    pub show_no_ops: bool,
    pub expand_all: bool,
    pub group_by_provider: bool,
    pub provider_grouping_threshold: usize,
    pub max_details_chars: usize,
    pub truncate_indicator: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            format: OutputFormat::Table,
            show_details: true,
            show_no_ops: true,
            expand_all: false,
            group_by_provider: false,
            provider_grouping_threshold: 10,
            max_details_chars: 500,
            truncate_indicator: "[...truncated]".to_string(),
        }
    }
}
