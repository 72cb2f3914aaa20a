//! Decoding of parsed annotation payloads.
//!
//! Payload shape:
//!
//! ```yaml
//! summary: Align reads to a reference
//! input:
//!   - tuple:
//!       - name: meta
//!         type: map
//!         description: Sample metadata
//!       - type: path
//!         description: FASTQ files
//! output:
//!   - name: bam
//!     type: path
//!     description: Aligned reads
//! ```
//!
//! Each parameter is decided once, here, to be a [`Parameter::Tuple`] or a
//! [`Parameter::Scalar`].

use nfdocs_shared::{NfDocsError, ParsedValue, Result};

/// One `input` / `output` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// A composite parameter grouping nested members.
    Tuple {
        name: Option<String>,
        members: Vec<Parameter>,
    },
    /// A single typed value.
    Scalar {
        name: Option<String>,
        ty: String,
        description: String,
    },
}

impl Parameter {
    /// Decode one parameter. `path` locates it in error messages, e.g. `input[1].tuple[0]`.
    pub fn from_value(value: &ParsedValue, path: &str) -> Result<Self> {
        if !matches!(value, ParsedValue::Mapping(_)) {
            return Err(NfDocsError::malformed_parameter(format!(
                "{path}: expected a mapping, found {}",
                value.shape()
            )));
        }

        let name = optional_text(value, "name", path)?;

        match (value.get("tuple"), value.get("type")) {
            (Some(_), Some(_)) => Err(NfDocsError::malformed_parameter(format!(
                "{path}: has both `tuple` and `type`"
            ))),
            (Some(tuple), None) => {
                let items = tuple.as_sequence().ok_or_else(|| {
                    NfDocsError::malformed_parameter(format!(
                        "{path}.tuple: expected a sequence, found {}",
                        tuple.shape()
                    ))
                })?;
                let members = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Parameter::from_value(item, &format!("{path}.tuple[{i}]")))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Parameter::Tuple { name, members })
            }
            (None, _) => {
                let ty = required_text(value, "type", path)?;
                let description = required_text(value, "description", path)?;
                Ok(Parameter::Scalar {
                    name,
                    ty,
                    description,
                })
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Tuple { name, .. } | Self::Scalar { name, .. } => name.as_deref(),
        }
    }
}

fn optional_text(value: &ParsedValue, key: &str, path: &str) -> Result<Option<String>> {
    match value.get(key) {
        None | Some(ParsedValue::Null) => Ok(None),
        Some(ParsedValue::Text(s)) => Ok(Some(s.clone())),
        Some(other) => Err(NfDocsError::malformed_parameter(format!(
            "{path}.{key}: expected text, found {}",
            other.shape()
        ))),
    }
}

fn required_text(value: &ParsedValue, key: &str, path: &str) -> Result<String> {
    optional_text(value, key, path)?
        .ok_or_else(|| NfDocsError::malformed_parameter(format!("{path}: missing `{key}`")))
}

/// The decoded documentation of one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPayload {
    pub summary: String,
    pub input: Option<Vec<Parameter>>,
    pub output: Option<Vec<Parameter>>,
}

impl DocPayload {
    /// Decode the payload of the definition called `name`.
    pub fn from_value(name: &str, value: &ParsedValue) -> Result<Self> {
        let summary = match value {
            ParsedValue::Mapping(_) => match value.get("summary") {
                None | Some(ParsedValue::Null) => None,
                Some(ParsedValue::Text(s)) => Some(s.clone()),
                Some(other) => {
                    return Err(NfDocsError::malformed_annotation(format!(
                        "summary of {name:?} must be text, found {}",
                        other.shape()
                    )));
                }
            },
            ParsedValue::Null => None,
            other => {
                return Err(NfDocsError::malformed_annotation(format!(
                    "payload of {name:?} must be a mapping, found {}",
                    other.shape()
                )));
            }
        };
        let summary = summary.ok_or_else(|| NfDocsError::MissingSummary {
            name: name.to_string(),
        })?;

        Ok(Self {
            summary,
            input: parameter_list(value, "input")?,
            output: parameter_list(value, "output")?,
        })
    }
}

fn parameter_list(value: &ParsedValue, key: &str) -> Result<Option<Vec<Parameter>>> {
    match value.get(key) {
        None | Some(ParsedValue::Null) => Ok(None),
        Some(ParsedValue::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| Parameter::from_value(item, &format!("{key}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(other) => Err(NfDocsError::malformed_parameter(format!(
            "{key}: expected a sequence, found {}",
            other.shape()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfdocs_annotations::{MarkupParser, YamlMarkup};

    fn yaml(text: &str) -> ParsedValue {
        YamlMarkup.parse(text).expect("valid yaml")
    }

    #[test]
    fn decodes_scalar_and_tuple() {
        let value = yaml(
            "summary: Align\n\
             input:\n\
             \x20 - tuple:\n\
             \x20     - name: meta\n\
             \x20       type: map\n\
             \x20       description: Sample metadata\n\
             \x20     - type: path\n\
             \x20       description: Reads\n\
             output:\n\
             \x20 - name: bam\n\
             \x20   type: path\n\
             \x20   description: Alignments\n",
        );
        let payload = DocPayload::from_value("ALIGN", &value).unwrap();
        assert_eq!(payload.summary, "Align");

        let input = payload.input.unwrap();
        assert_eq!(
            input,
            vec![Parameter::Tuple {
                name: None,
                members: vec![
                    Parameter::Scalar {
                        name: Some("meta".into()),
                        ty: "map".into(),
                        description: "Sample metadata".into(),
                    },
                    Parameter::Scalar {
                        name: None,
                        ty: "path".into(),
                        description: "Reads".into(),
                    },
                ],
            }]
        );
        assert_eq!(payload.output.unwrap()[0].name(), Some("bam"));
    }

    #[test]
    fn summary_only_payload() {
        let payload = DocPayload::from_value("X", &yaml("summary: does X")).unwrap();
        assert_eq!(payload.summary, "does X");
        assert!(payload.input.is_none());
        assert!(payload.output.is_none());
    }

    #[test]
    fn missing_summary() {
        let err = DocPayload::from_value("X", &yaml("input: []")).unwrap_err();
        assert!(matches!(err, NfDocsError::MissingSummary { ref name } if name == "X"));

        let err = DocPayload::from_value("Y", &ParsedValue::Null).unwrap_err();
        assert!(matches!(err, NfDocsError::MissingSummary { .. }));
    }

    #[test]
    fn non_mapping_payload_is_malformed() {
        let err = DocPayload::from_value("X", &yaml("just some prose")).unwrap_err();
        assert!(matches!(err, NfDocsError::MalformedAnnotation { .. }));
    }

    #[test]
    fn scalar_without_description_is_malformed() {
        let err = DocPayload::from_value("X", &yaml("summary: s\ninput:\n  - type: path\n"))
            .unwrap_err();
        match err {
            NfDocsError::MalformedParameter { message } => {
                assert_eq!(message, "input[0]: missing `description`");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tuple_and_type_together_is_malformed() {
        let value = yaml("summary: s\noutput:\n  - type: path\n    tuple: []\n");
        let err = DocPayload::from_value("X", &value).unwrap_err();
        assert!(err.to_string().contains("both `tuple` and `type`"));
    }

    #[test]
    fn nested_error_path() {
        let value = yaml("summary: s\ninput:\n  - tuple:\n      - tuple:\n          - name: x\n");
        let err = DocPayload::from_value("X", &value).unwrap_err();
        assert!(err.to_string().contains("input[0].tuple[0].tuple[0]: missing `type`"));
    }

    #[test]
    fn input_must_be_a_sequence() {
        let err = DocPayload::from_value("X", &yaml("summary: s\ninput: reads\n")).unwrap_err();
        assert!(matches!(err, NfDocsError::MalformedParameter { .. }));
    }
}
