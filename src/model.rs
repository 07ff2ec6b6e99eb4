//! Data structures describing a resume as written in its YAML source.
//!
//! Loading is lenient: every field is optional at this layer and
//! unknown keys are ignored, so documents written for a newer schema still load.
//! Required fields are enforced by the row builder in [`crate::rows`], which
//! reports the exact path of whatever is missing.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ResumeError;

/// A parsed resume document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResumeDocument {
    /// Person's name, rendered as the large heading.
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    /// One-line title shown under the name.
    #[serde(default, deserialize_with = "optional_text")]
    pub heading: Option<String>,
    /// Resume body.
    #[serde(default)]
    pub sections: Option<Sections>,
}

impl ResumeDocument {
    /// Reads and parses the YAML document at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResumeError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ResumeError::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ResumeError::Io {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        Self::from_yaml_str(&source).map_err(|source| ResumeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a resume from YAML text.
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// The two accepted shapes of the `sections` key.
///
/// A sequence lists bare section names, each rendered as a header without
/// content. A mapping carries structured content under the keys `experiences`,
/// `education` and `skills`, kept in the order they appear in the file.
#[derive(Clone, Debug, PartialEq)]
pub enum Sections {
    /// `sections: [Experience, Education]`
    Names(Vec<String>),
    /// `sections: { experiences: [...], education: [...] }`
    Structured(Vec<Section>),
}

/// A structured section with its entries.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    /// Work history.
    Experiences(Vec<Experience>),
    /// Schools and degrees.
    Education(Vec<Education>),
    /// Skill groups.
    Skills(Vec<Skill>),
}

impl Section {
    /// The YAML key this section is read from.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Experiences(_) => "experiences",
            Section::Education(_) => "education",
            Section::Skills(_) => "skills",
        }
    }
}

/// One position in the work history.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "optional_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "optional_text")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub degree: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub content: Option<String>,
}

impl<'de> Deserialize<'de> for Sections {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SectionsVisitor)
    }
}

struct SectionsVisitor;

impl<'de> Visitor<'de> for SectionsVisitor {
    type Value = Sections;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of section names or a mapping of section contents")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Sections, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut names = Vec::new();
        while let Some(value) = seq.next_element::<Value>()? {
            names.push(scalar_to_text(value).map_err(de::Error::custom)?);
        }
        Ok(Sections::Names(names))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Sections, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut sections = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let section = match key.as_str() {
                "experiences" => Section::Experiences(
                    map.next_value::<Option<Vec<Experience>>>()?
                        .unwrap_or_default(),
                ),
                "education" => Section::Education(
                    map.next_value::<Option<Vec<Education>>>()?
                        .unwrap_or_default(),
                ),
                "skills" => Section::Skills(
                    map.next_value::<Option<Vec<Skill>>>()?
                        .unwrap_or_default(),
                ),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            sections.push(section);
        }
        Ok(Sections::Structured(sections))
    }
}

/// Accepts any YAML scalar as text so unquoted values such as `2020` load.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_text(value).map(Some).map_err(de::Error::custom),
    }
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|value| scalar_to_text(value).map_err(de::Error::custom))
        .collect()
}

fn scalar_to_text(value: Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Tagged(tagged) => scalar_to_text(tagged.value),
        Value::Null => Err("expected a scalar value, found null".to_owned()),
        Value::Sequence(_) => Err("expected a scalar value, found a sequence".to_owned()),
        Value::Mapping(_) => Err("expected a scalar value, found a mapping".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_structured_sections_in_file_order() {
        let document = ResumeDocument::from_yaml_str(
            r#"
name: Jane Doe
heading: Engineer
sections:
  skills:
    - title: Languages
      content: Rust, Python
  experiences:
    - company: Acme
      title: SWE
      start_date: 2020
      end_date: Present
      highlights: [Built X]
"#,
        )
        .expect("parse succeeds");

        let Some(Sections::Structured(sections)) = document.sections else {
            panic!("expected structured sections");
        };
        let keys: Vec<_> = sections.iter().map(Section::key).collect();
        assert_eq!(keys, ["skills", "experiences"]);

        let Section::Experiences(experiences) = &sections[1] else {
            panic!("expected experiences");
        };
        assert_eq!(experiences[0].start_date.as_deref(), Some("2020"));
        assert_eq!(experiences[0].highlights, ["Built X"]);
    }

    #[test]
    fn loads_section_names() {
        let document = ResumeDocument::from_yaml_str(
            "name: Jane\nheading: Engineer\nsections: [Experience, Education]\n",
        )
        .expect("parse succeeds");

        assert_eq!(
            document.sections,
            Some(Sections::Names(vec![
                "Experience".to_owned(),
                "Education".to_owned()
            ]))
        );
    }

    #[test]
    fn ignores_unknown_keys_and_defaults_missing_lists() {
        let document = ResumeDocument::from_yaml_str(
            r#"
name: Jane
heading: Engineer
email: jane@example.com
sections:
  projects: [whatever]
  education:
  experiences:
    - company: Acme
      title: SWE
      start_date: "2020"
      end_date: "2022"
      location: Remote
"#,
        )
        .expect("parse succeeds");

        let Some(Sections::Structured(sections)) = document.sections else {
            panic!("expected structured sections");
        };
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], Section::Education(Vec::new()));
        let Section::Experiences(experiences) = &sections[1] else {
            panic!("expected experiences");
        };
        assert!(experiences[0].highlights.is_empty());
    }

    #[test]
    fn missing_name_is_not_a_parse_error() {
        let document =
            ResumeDocument::from_yaml_str("heading: Engineer\n").expect("parse succeeds");
        assert_eq!(document.name, None);
        assert_eq!(document.sections, None);
    }

    #[test]
    fn rejects_non_scalar_text() {
        let err = ResumeDocument::from_yaml_str("name: [Jane, Doe]\n").unwrap_err();
        assert!(err.to_string().contains("expected a scalar value"));
    }

    #[test]
    fn from_path_reports_missing_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("resume.yaml");
        let err = ResumeDocument::from_path(&path).unwrap_err();
        assert!(matches!(err, ResumeError::InputNotFound { path: missing } if missing == path));
    }
}
