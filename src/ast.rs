use std::str::FromStr;

use crate::translate::Error;

/// Comparison operator of a single EPQL term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    More,
    MoreOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::More,
        Operator::MoreOrEqual,
    ];

    /// `<`, `<=`, `>` and `>=`.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Operator::Equal | Operator::NotEqual)
    }

    /// True for the "or-equal" variants, which make range bounds inclusive.
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Operator::LessOrEqual | Operator::MoreOrEqual)
    }
}

impl FromStr for Operator {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Operator::Equal),
            "!=" | "<>" => Ok(Operator::NotEqual),
            "<" => Ok(Operator::Less),
            "<=" => Ok(Operator::LessOrEqual),
            ">" => Ok(Operator::More),
            ">=" => Ok(Operator::MoreOrEqual),
            other => Err(Error::UnknownOperator(other.to_string())),
        }
    }
}

/// How a term combines with the term before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Conjunction {
    /// Only valid on the first term of an expression or group.
    None = 0,
    And = 1,
    Or = 2,
    Not = 3,
}

impl TryFrom<u8> for Conjunction {
    type Error = Error;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Conjunction::None),
            1 => Ok(Conjunction::And),
            2 => Ok(Conjunction::Or),
            3 => Ok(Conjunction::Not),
            other => Err(Error::UnknownConjunction(other)),
        }
    }
}

/// A term as the parser hands it over: logical field, operator and the raw
///  literal value(s), before any field resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpQlTerm {
    pub field: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl EpQlTerm {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldType {
    String,
    /// Free text, usually registered as an analyzed field.
    Text,
    Enum,
    Boolean,
    Integer,
    Float,
    Decimal,
    Date,
    DateTime,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Float | FieldType::Decimal
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    /// Types with a total order, i.e. the ones a search range can be built on.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }
}

/// What the metadata service knows about a native field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct FieldDescriptor {
    pub native_name: String,
    pub field_type: FieldType,
    /// Several values are matched as any-of.
    #[cfg_attr(feature = "serde", serde(default))]
    pub multi_valued: bool,
    /// Free text the search index tokenizes. Search matches compare the
    ///  analyzed tokens as a phrase; relational dialects compare the raw
    ///  literal.
    #[cfg_attr(feature = "serde", serde(default))]
    pub analyzed: bool,
}

impl FieldDescriptor {
    pub fn new(native_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            native_name: native_name.into(),
            field_type,
            multi_valued: false,
            analyzed: false,
        }
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn analyzed(mut self) -> Self {
        self.analyzed = true;
        self
    }
}

/// A term after field resolution: the native field name and the literal
///  values the backend should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTerm {
    pub field: String,
    pub values: Vec<String>,
    pub descriptor: FieldDescriptor,
}

impl ResolvedTerm {
    pub fn new(descriptor: FieldDescriptor, values: Vec<String>) -> Self {
        Self {
            field: descriptor.native_name.clone(),
            values,
            descriptor,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.descriptor.field_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}
