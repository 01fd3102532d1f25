//! Route templates with named placeholders.
//!
//! A template is a `/`-separated list of segments. Each segment is either a
//! literal that must match exactly (case-sensitive) or a `{name}` placeholder
//! that captures one non-empty request segment.
//!
//! ```text
//! /users/read/{user}/info
//!  ^^^^^ ^^^^ ^^^^^^ ^^^^
//!  lit   lit  param  lit
//! ```
//!
//! There are no wildcard or greedy segments: a template only matches paths
//! with exactly the same number of segments. Captured values are returned as
//! they appear in the path; percent-decoding is the transport's job.
//!
//! # Example
//!
//! ```rust
//! use rest_dispatch::rest::PathTemplate;
//!
//! let template = PathTemplate::parse("/users/read/{user}/info").unwrap();
//! let verbs = template.match_path("/users/read/Alice/info").unwrap();
//! assert_eq!(verbs.get("user"), Some("Alice"));
//!
//! assert!(template.match_path("/users/read/Alice").is_none());
//! ```

use std::fmt;

use crate::error::TemplateError;

use super::params::RestVerbs;

/// A single template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Captures any non-empty request segment under this name.
    Placeholder(String),
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    ///
    /// Fails when the template does not start with `/`, when a placeholder is
    /// unterminated, empty, or shares its segment with literal text, or when a
    /// placeholder name appears twice.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let body = template
            .strip_prefix('/')
            .ok_or_else(|| TemplateError::MissingLeadingSlash {
                template: template.to_string(),
            })?;

        let mut segments = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for (index, part) in body.split('/').enumerate() {
            let segment = parse_segment(template, index, part)?;
            if let Segment::Placeholder(name) = &segment {
                if names.contains(name) {
                    return Err(TemplateError::DuplicateName {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
                names.push(name.clone());
            }
            segments.push(segment);
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Match a request path against this template.
    ///
    /// Returns the captured placeholder values, or `None` when the segment
    /// counts differ, a literal differs, or a placeholder would capture an
    /// empty segment.
    pub fn match_path(&self, path: &str) -> Option<RestVerbs> {
        let body = path.strip_prefix('/')?;
        let parts: Vec<&str> = body.split('/').collect();
        self.match_segments(&parts)
    }

    /// Match already-split request segments against this template.
    ///
    /// `parts` is the path after its leading `/`, split on `/`. A part may
    /// itself contain `/` when the transport decoded an escaped separator;
    /// it still counts as one segment.
    pub fn match_segments<S: AsRef<str>>(&self, parts: &[S]) -> Option<RestVerbs> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut verbs = RestVerbs::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let part = part.as_ref();
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    verbs.insert(name.clone(), part);
                }
            }
        }

        Some(verbs)
    }

    /// The template string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether two templates match exactly the same set of paths.
    ///
    /// Placeholder names are ignored: `/users/{a}` and `/users/{b}` overlap
    /// completely, so the second can never be selected.
    pub fn same_shape(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Placeholder(_), Segment::Placeholder(_)) => true,
                    _ => false,
                })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(template: &str, index: usize, part: &str) -> Result<Segment, TemplateError> {
    let opens = part.contains('{');
    let closes = part.contains('}');

    if !opens && !closes {
        return Ok(Segment::Literal(part.to_string()));
    }

    if opens && !closes {
        return Err(TemplateError::UnterminatedPlaceholder {
            template: template.to_string(),
            segment: index,
        });
    }

    if closes && !opens {
        return Err(TemplateError::UnexpectedClose {
            template: template.to_string(),
            segment: index,
        });
    }

    let name = part
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| TemplateError::EmbeddedPlaceholder {
            template: template.to_string(),
            segment: index,
        })?;

    if name.contains('{') || name.contains('}') {
        return Err(TemplateError::EmbeddedPlaceholder {
            template: template.to_string(),
            segment: index,
        });
    }

    if name.is_empty() {
        return Err(TemplateError::EmptyName {
            template: template.to_string(),
            segment: index,
        });
    }

    Ok(Segment::Placeholder(name.to_string()))
}
