use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NUMBERING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("NUMBERING_PREFIX is a valid regex pattern"));

/// Ordered, immutable list of topics derived once from a topic file or form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopicList(Vec<String>);

impl TopicList {
    /// Keeps trimmed, non-empty, non-`#` lines and strips a leading `N. ` numbering.
    pub fn parse(content: &str) -> Self {
        let topics = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| NUMBERING_PREFIX.replace(line, "").trim().to_string())
            .filter(|topic| !topic.is_empty())
            .collect();

        Self(topics)
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined = lines
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse(&joined)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// Filename-safe prefix from the first three topics.
    pub fn file_prefix(&self) -> String {
        let prefix = self
            .0
            .iter()
            .take(3)
            .map(|t| t.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
            .collect::<Vec<_>>()
            .join("_");
        prefix.chars().take(50).collect()
    }
}
