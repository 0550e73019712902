//! Structured value trees returned by the ledger
//!
//! Every lookup here is total: absence is `None`, never a panic. Only the
//! numeric parsers fail, and they fail with [`RedemptionError::MalformedData`].

use bigdecimal::BigDecimal;
use std::fmt::Display;
use std::str::FromStr;

use super::error::{RedemptionError, RedemptionResult};

/// One node of a decoded ledger value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    /// Value kind as reported by the ledger (`U32`, `Decimal`, `Tuple`, `Enum`, ...)
    pub kind: String,
    /// Field name when the node is a named struct field
    pub field_name: Option<String>,
    pub body: NodeBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    /// Scalar rendered as a string
    Leaf(String),
    /// Tuple, array or enum payload. `variant` is set for enums.
    Fields {
        variant: Option<String>,
        fields: Vec<FieldNode>,
    },
    /// Map entries
    Entries(Vec<(FieldNode, FieldNode)>),
}

impl FieldNode {
    pub fn leaf(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            field_name: None,
            body: NodeBody::Leaf(value.into()),
        }
    }

    pub fn tuple(fields: Vec<FieldNode>) -> Self {
        Self {
            kind: "Tuple".to_string(),
            field_name: None,
            body: NodeBody::Fields {
                variant: None,
                fields,
            },
        }
    }

    pub fn variant(name: impl Into<String>, fields: Vec<FieldNode>) -> Self {
        Self {
            kind: "Enum".to_string(),
            field_name: None,
            body: NodeBody::Fields {
                variant: Some(name.into()),
                fields,
            },
        }
    }

    pub fn map(entries: Vec<(FieldNode, FieldNode)>) -> Self {
        Self {
            kind: "Map".to_string(),
            field_name: None,
            body: NodeBody::Entries(entries),
        }
    }

    /// Attach a field name, builder style
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn children(&self) -> &[FieldNode] {
        match &self.body {
            NodeBody::Fields { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn variant_name(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Fields { variant, .. } => variant.as_deref(),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(FieldNode, FieldNode)]> {
        match &self.body {
            NodeBody::Entries(entries) => Some(entries),
            _ => None,
        }
    }

    /// Direct child carrying this field name
    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.children()
            .iter()
            .find(|child| child.field_name.as_deref() == Some(name))
    }

    /// Leaf string of a named child
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldNode::value)
    }

    /// Payload of a named enum field holding a populated variant.
    ///
    /// `Option::None` and payload-less variants read as absent.
    pub fn variant_field(&self, name: &str) -> Option<&FieldNode> {
        let field = self.field(name)?;
        match field.variant_name() {
            Some("None") | None => None,
            Some(_) => field.children().first(),
        }
    }

    /// Descend through first children until a leaf is reached
    pub fn innermost_value(&self) -> Option<&str> {
        let mut node = self;
        loop {
            match &node.body {
                NodeBody::Leaf(value) => return Some(value),
                NodeBody::Fields { fields, .. } => node = fields.first()?,
                NodeBody::Entries(_) => return None,
            }
        }
    }

    pub fn parse_decimal(&self) -> RedemptionResult<BigDecimal> {
        parse_decimal(self.value().ok_or_else(|| self.not_a_leaf())?)
    }

    pub fn parse_int<T>(&self) -> RedemptionResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        parse_int(self.value().ok_or_else(|| self.not_a_leaf())?)
    }

    fn not_a_leaf(&self) -> RedemptionError {
        RedemptionError::malformed(format!(
            "expected a scalar for {}, found {}",
            self.field_name.as_deref().unwrap_or("<unnamed>"),
            self.kind
        ))
    }
}

pub fn parse_decimal(raw: &str) -> RedemptionResult<BigDecimal> {
    BigDecimal::from_str(raw.trim())
        .map_err(|e| RedemptionError::malformed(format!("invalid decimal {:?}: {}", raw, e)))
}

pub fn parse_int<T>(raw: &str) -> RedemptionResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| RedemptionError::malformed(format!("invalid integer {:?}: {}", raw, e)))
}
