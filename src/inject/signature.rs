//! Declared call surface of an injectable function

use crate::core::{DiError, DiResult};
use crate::provider::Arg;
use std::collections::HashSet;

/// How a parameter accepts its argument.
///
/// Declaration order must follow the variant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    /// Collects surplus positional arguments.
    VarPositional,
    KeywordOnly,
    /// Collects surplus named arguments.
    VarKeyword,
}

impl ParamKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }

    pub fn accepts_positional(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
        )
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    default: Option<Arg>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Declare a default; a provider default is injected when the caller
    /// leaves the parameter out.
    pub fn with_default(mut self, default: impl Into<Arg>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Arg> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.kind.is_variadic()
    }
}

/// Ordered parameter list.
///
/// # Example
///
/// ```
/// use lazydi::inject::Signature;
/// use serde_json::json;
///
/// let sig = Signature::new()
///     .positional("x")
///     .optional("y", json!(0))
///     .var_keyword("extra");
/// assert!(sig.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Required positional-or-keyword parameter.
    pub fn positional(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParamKind::PositionalOrKeyword))
    }

    /// Positional-or-keyword parameter with a default.
    pub fn optional(self, name: impl Into<String>, default: impl Into<Arg>) -> Self {
        self.param(Parameter::new(name, ParamKind::PositionalOrKeyword).with_default(default))
    }

    pub fn positional_only(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParamKind::PositionalOnly))
    }

    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParamKind::KeywordOnly))
    }

    pub fn keyword_only_with_default(
        self,
        name: impl Into<String>,
        default: impl Into<Arg>,
    ) -> Self {
        self.param(Parameter::new(name, ParamKind::KeywordOnly).with_default(default))
    }

    pub fn var_positional(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParamKind::VarPositional))
    }

    pub fn var_keyword(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParamKind::VarKeyword))
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub(crate) fn index_of_kind(&self, kind: ParamKind) -> Option<usize> {
        self.params.iter().position(|p| p.kind == kind)
    }

    /// Check that the declaration is one a function could have.
    pub fn validate(&self) -> DiResult<()> {
        let mut seen = HashSet::new();
        let mut previous: Option<ParamKind> = None;
        let mut positional_default = false;

        for param in &self.params {
            if param.name.is_empty() {
                return Err(DiError::InvalidArgument(
                    "parameter name must not be empty".to_string(),
                ));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(DiError::InvalidArgument(format!(
                    "duplicate parameter '{}'",
                    param.name
                )));
            }

            if let Some(prev) = previous {
                let repeated_variadic = param.kind.is_variadic() && prev == param.kind;
                if param.kind < prev || repeated_variadic {
                    return Err(DiError::InvalidArgument(format!(
                        "parameter '{}' ({:?}) cannot follow a {:?} parameter",
                        param.name, param.kind, prev
                    )));
                }
            }
            previous = Some(param.kind);

            if param.kind.is_variadic() && param.default.is_some() {
                return Err(DiError::InvalidArgument(format!(
                    "variadic parameter '{}' cannot have a default",
                    param.name
                )));
            }

            if param.kind.accepts_positional() {
                if param.default.is_some() {
                    positional_default = true;
                } else if positional_default {
                    return Err(DiError::InvalidArgument(format!(
                        "required parameter '{}' follows a parameter with a default",
                        param.name
                    )));
                }
            }
        }
        Ok(())
    }
}
