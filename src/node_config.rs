//! Node configuration handling.
//!
//! Starting with CML 2.7 a node may carry several configuration files. The
//! `configuration` key of an exported node is therefore either a plain
//! string (older exports) or a list of `{name, content}` segments.
//! [`NodeConfig`] hides the difference behind one query interface.
//!
//! Only one segment of a segmented configuration is ever rendered, picked by
//! a [`SegmentSelection`]. The CML2 Terraform provider has no way to express
//! several configuration files per node yet.

use log::debug;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Errors raised when a node configuration is rendered or written out
#[derive(Debug, thiserror::Error)]
pub enum NodeConfigError {
    #[error("Unhandled configuration type: {kind}")]
    UnsupportedShape { kind: &'static str },

    #[error("Configuration of node '{label}' has no segments to write")]
    NoSegments { label: String },

    #[error("Configuration of a node without label or id cannot be saved to a file")]
    Unlabelled,

    #[error("Unable to save configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One named block of configuration text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Segment {
    pub name: String,
    pub content: String,
}

/// The shapes a `configuration` value can arrive in
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigBody {
    /// A single configuration string
    PlainText(String),
    /// An ordered list of configuration segments, decoded on selection
    SegmentedText(Vec<Value>),
    /// Anything else; kept so the error surfaces on first use
    Unsupported(Value),
}

impl ConfigBody {
    /// Classify a raw YAML value.
    ///
    /// Any sequence is segmented text. Only the selected entry has to be a
    /// `{name, content}` mapping; the others are never looked at.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::PlainText(text),
            Value::Sequence(entries) => Self::SegmentedText(entries),
            other => Self::Unsupported(other),
        }
    }
}

/// Strategy picking the segment that gets rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentSelection {
    /// Use the first segment in document order
    #[default]
    First,
}

impl SegmentSelection {
    pub fn select<'a>(&self, segments: &'a [Value]) -> Option<&'a Value> {
        match self {
            Self::First => segments.first(),
        }
    }
}

/// A node's configuration, normalized across both export formats
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    label: String,
    body: ConfigBody,
    selection: SegmentSelection,
}

impl NodeConfig {
    /// Wrap a configuration value. Never fails; unsupported shapes are
    /// reported by [`NodeConfig::out`] and [`NodeConfig::fileout`].
    ///
    /// # Arguments
    /// * `label` - Display name of the owning node, used for file names
    /// * `config` - The node's raw `configuration` value
    pub fn new(label: impl Into<String>, config: Value) -> Self {
        Self {
            label: label.into(),
            body: ConfigBody::from_value(config),
            selection: SegmentSelection::default(),
        }
    }

    /// Replace the segment selection strategy
    pub fn with_selection(mut self, selection: SegmentSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &ConfigBody {
        &self.body
    }

    /// Returns true when the configuration renders to nothing
    pub fn empty(&self) -> Result<bool, NodeConfigError> {
        Ok(self.out(0)?.is_empty())
    }

    /// Returns true when the configuration has exactly one line
    pub fn oneline(&self) -> Result<bool, NodeConfigError> {
        Ok(self.out(0)?.split('\n').count() == 1)
    }

    /// Render the configuration text with every line prefixed by `indent`
    /// spaces, ready to be embedded in an HCL heredoc.
    pub fn out(&self, indent: usize) -> Result<String, NodeConfigError> {
        let text = self.text()?;
        if indent == 0 {
            return Ok(text);
        }

        let pad = " ".repeat(indent);
        let lines: Vec<String> = text.split('\n').map(|line| format!("{}{}", pad, line)).collect();
        Ok(lines.join("\n"))
    }

    /// Write the configuration text into `dir` and return the file name used.
    ///
    /// Plain text goes to `<label>.cfg`, segmented text to
    /// `<label>-<segment name>.cfg`. Callers check [`NodeConfig::empty`]
    /// first; an empty segment list is reported as
    /// [`NodeConfigError::NoSegments`]. An empty label would leave the file
    /// without a stem and is rejected.
    pub fn fileout(&self, dir: &Path) -> Result<String, NodeConfigError> {
        if self.label.is_empty() {
            return Err(NodeConfigError::Unlabelled);
        }
        let (file_name, text) = match &self.body {
            ConfigBody::PlainText(text) => (format!("{}.cfg", self.label), text.clone()),
            ConfigBody::SegmentedText(_) => {
                let segment = self.selected_segment()?.ok_or_else(|| {
                    NodeConfigError::NoSegments {
                        label: self.label.clone(),
                    }
                })?;
                (format!("{}-{}.cfg", self.label, segment.name), segment.content)
            }
            ConfigBody::Unsupported(value) => {
                return Err(NodeConfigError::UnsupportedShape {
                    kind: value_kind(value),
                })
            }
        };

        let path = dir.join(&file_name);
        let io_error = |source: std::io::Error| NodeConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = File::create(&path).map_err(io_error)?;
        file.write_all(text.as_bytes()).map_err(io_error)?;

        debug!("Saved configuration of node '{}' to {:?}", self.label, path);
        Ok(file_name)
    }

    fn text(&self) -> Result<String, NodeConfigError> {
        match &self.body {
            ConfigBody::PlainText(text) => Ok(text.clone()),
            ConfigBody::SegmentedText(_) => {
                Ok(self.selected_segment()?.map(|segment| segment.content).unwrap_or_default())
            }
            ConfigBody::Unsupported(value) => Err(NodeConfigError::UnsupportedShape {
                kind: value_kind(value),
            }),
        }
    }

    /// Decode the selected segment; `None` when the list is empty
    fn selected_segment(&self) -> Result<Option<Segment>, NodeConfigError> {
        let ConfigBody::SegmentedText(segments) = &self.body else {
            return Ok(None);
        };
        let Some(entry) = self.selection.select(segments) else {
            return Ok(None);
        };
        serde_yaml::from_value(entry.clone())
            .map(Some)
            .map_err(|_| NodeConfigError::UnsupportedShape {
                kind: "segment",
            })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
