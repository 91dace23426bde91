//! Output formatting shared by the command line commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of the `wfdb-admin` commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Rounded table (default)
    #[default]
    Table,
    Markdown,
    /// Compact JSON document
    Json,
    JsonPretty,
    /// One JSON object per row
    JsonLine,
    /// Pipe-separated values with a header line
    Psv,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }

    /// Render a single serializable value in a JSON format
    ///
    /// Non-JSON formats fall back to compact JSON.
    pub fn json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            Self::JsonPretty => serde_json::to_string_pretty(value),
            _ => serde_json::to_string(value),
        }
    }

    /// Render rows in this format
    #[cfg(feature = "display")]
    pub fn render<T>(&self, rows: &[T]) -> serde_json::Result<String>
    where
        T: tabled::Tabled + Serialize,
    {
        use tabled::settings::Style;
        use tabled::Table;

        let out = match self {
            Self::Table => Table::new(rows).with(Style::rounded()).to_string(),
            Self::Markdown => Table::new(rows).with(Style::markdown()).to_string(),
            Self::Json | Self::JsonPretty => self.json(&rows)?,
            Self::JsonLine => rows
                .iter()
                .map(serde_json::to_string)
                .collect::<serde_json::Result<Vec<_>>>()?
                .join("\n"),
            Self::Psv => {
                let mut lines = vec![T::headers().join("|")];
                lines.extend(rows.iter().map(|row| row.fields().join("|")));
                lines.join("\n")
            }
        };
        Ok(out)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
            Self::JsonLine => "json-line",
            Self::Psv => "psv",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonl" => Ok(Self::JsonLine),
            "psv" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}
