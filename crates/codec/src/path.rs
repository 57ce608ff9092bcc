use crate::{CalldataSchema, SchemaError};

use std::{fmt, str::FromStr};

use alloy_json_abi::Param;
use commit_scanner_l1::{NEW_BATCHES_DATA_PARAM, PUBDATA_COMMITMENTS_FIELD};

/// A segment of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named member of a tuple.
    Field(String),
    /// An element of an array.
    Index(usize),
}

/// Locates a value inside decoded calldata, e.g. `_newBatchesData[0].pubdataCommitments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

/// A resolved [`PathSegment`], with field names replaced by their position in the tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Member(usize),
    Element(usize),
}

impl FieldPath {
    /// Returns a path from the provided segments.
    pub const fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Returns the path to the pubdata commitments of the first committed batch.
    pub fn pubdata_commitments() -> Self {
        Self(vec![
            PathSegment::Field(NEW_BATCHES_DATA_PARAM.to_owned()),
            PathSegment::Index(0),
            PathSegment::Field(PUBDATA_COMMITMENTS_FIELD.to_owned()),
        ])
    }

    /// Returns the segments of the path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Resolves the path against the schema, checking every field exists and the path ends on a
    /// `bytes` value.
    pub(crate) fn resolve(&self, schema: &CalldataSchema) -> Result<Vec<Step>, SchemaError> {
        if self.0.is_empty() {
            return Err(SchemaError::EmptyPath);
        }

        let mut components: &[Param] = schema.params();
        let mut ty = "tuple";
        let mut steps = Vec::with_capacity(self.0.len());

        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => {
                    if ty != "tuple" {
                        return Err(SchemaError::NotATuple {
                            path: self.to_string(),
                            ty: ty.to_owned(),
                        });
                    }
                    let (position, param) = components
                        .iter()
                        .enumerate()
                        .find(|(_, p)| &p.name == name)
                        .ok_or_else(|| SchemaError::UnknownField {
                            field: name.clone(),
                            path: self.to_string(),
                        })?;
                    steps.push(Step::Member(position));
                    components = &param.components;
                    ty = &param.ty;
                }
                PathSegment::Index(index) => {
                    let element = ty
                        .strip_suffix(']')
                        .and_then(|t| t.rfind('[').map(|pos| &ty[..pos]))
                        .ok_or_else(|| SchemaError::NotIndexable {
                            path: self.to_string(),
                            ty: ty.to_owned(),
                        })?;
                    steps.push(Step::Element(*index));
                    ty = element;
                }
            }
        }

        if ty != "bytes" {
            return Err(SchemaError::NotBytes { path: self.to_string(), ty: ty.to_owned() });
        }

        Ok(steps)
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::pubdata_commitments()
    }
}

impl FromStr for FieldPath {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidPath(s.to_owned());
        if s.is_empty() {
            return Err(SchemaError::EmptyPath);
        }

        let mut segments = Vec::new();
        for part in s.split('.') {
            let (name, mut rest) = part.find('[').map_or((part, ""), |pos| part.split_at(pos));
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid());
            }
            segments.push(PathSegment::Field(name.to_owned()));

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(invalid)?;
                let index = rest
                    .get(1..close)
                    .filter(|_| rest.starts_with('['))
                    .and_then(|i| i.parse().ok())
                    .ok_or_else(invalid)?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
            }
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
