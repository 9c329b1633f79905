//! Simple selector predicates for observer filtering.
//!
//! A selector is an optional tag name followed by any number of `.class`
//! and `#id` segments (`button`, `.btn`, `button.btn.primary`, `#save`).
//! Matching is target-only: whether a node's own tag/id/classes satisfy the
//! selector is decided by the host through [`ScopeNode::matches`]; there is
//! no ancestor walk in selector matching.
//!
//! [`ScopeNode::matches`]: crate::node::ScopeNode::matches

use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;

/// A parsed simple selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse selector text.
    ///
    /// Tags are normalized to lowercase; ids and class names are kept
    /// verbatim. A second `#id` segment is rejected.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selector = Self::default();
        let mut rest = trimmed;

        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if !tag.chars().all(is_name_char) {
                return Err(SelectorError::Invalid(trimmed.to_owned()));
            }
            selector.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            rest = &rest[1..];
            let end = rest.find(['.', '#']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() || !name.chars().all(is_name_char) {
                return Err(SelectorError::Invalid(trimmed.to_owned()));
            }
            match marker {
                '.' => selector.classes.push(name.to_owned()),
                _ => {
                    if selector.id.replace(name.to_owned()).is_some() {
                        return Err(SelectorError::Invalid(trimmed.to_owned()));
                    }
                }
            }
            rest = &rest[end..];
        }

        Ok(selector)
    }

    /// The tag-name component, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The `#id` component, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The `.class` components, in source order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
