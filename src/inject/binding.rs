//! Binding call arguments against a [`Signature`]

use super::signature::{ParamKind, Signature};
use crate::core::{DiError, DiResult};
use crate::provider::Arg;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

/// Arguments bound to parameters, before provider substitution.
#[derive(Debug)]
pub(crate) struct BoundArguments {
    /// One slot per declared parameter; variadic slots stay empty.
    slots: Vec<Option<Arg>>,
    var_positional: Vec<Arg>,
    var_keyword: Vec<(String, Arg)>,
}

impl BoundArguments {
    /// Bind what was passed; parameters left out are allowed at this stage.
    pub(crate) fn bind_partial(
        signature: &Signature,
        positional: Vec<Arg>,
        named: Vec<(String, Arg)>,
    ) -> DiResult<Self> {
        let params = signature.parameters();
        let mut slots: Vec<Option<Arg>> = vec![None; params.len()];
        let mut var_positional = Vec::new();
        let mut var_keyword = Vec::new();
        let has_var_positional = signature.index_of_kind(ParamKind::VarPositional).is_some();
        let has_var_keyword = signature.index_of_kind(ParamKind::VarKeyword).is_some();

        let mut positional_slots = params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind().accepts_positional())
            .map(|(idx, _)| idx);

        for arg in positional {
            match positional_slots.next() {
                Some(idx) => slots[idx] = Some(arg),
                None if has_var_positional => var_positional.push(arg),
                None => {
                    return Err(DiError::Binding(format!(
                        "too many positional arguments (expected at most {})",
                        params.iter().filter(|p| p.kind().accepts_positional()).count()
                    )))
                }
            }
        }

        for (name, arg) in named {
            let target = params
                .iter()
                .position(|p| p.name() == name && !p.kind().is_variadic());

            match target {
                Some(idx) if params[idx].kind() == ParamKind::PositionalOnly => {
                    if has_var_keyword {
                        var_keyword.push((name, arg));
                    } else {
                        return Err(DiError::Binding(format!(
                            "'{}' is positional-only but was passed by name",
                            name
                        )));
                    }
                }
                Some(idx) => {
                    if slots[idx].is_some() {
                        return Err(DiError::Binding(format!(
                            "multiple values for argument '{}'",
                            name
                        )));
                    }
                    slots[idx] = Some(arg);
                }
                None if has_var_keyword => var_keyword.push((name, arg)),
                None => {
                    return Err(DiError::Binding(format!(
                        "unexpected keyword argument '{}'",
                        name
                    )))
                }
            }
        }

        Ok(Self {
            slots,
            var_positional,
            var_keyword,
        })
    }

    /// Fill every unsupplied parameter from its declared default.
    pub(crate) fn apply_defaults(&mut self, signature: &Signature) {
        for (slot, param) in self.slots.iter_mut().zip(signature.parameters()) {
            if slot.is_none() {
                *slot = param.default().cloned();
            }
        }
    }

    /// Substitute providers with their values, in parameter order.
    pub(crate) fn resolve(self, signature: &Signature) -> DiResult<InjectedArgs> {
        let params = signature.parameters();
        if let Some(missing) = params
            .iter()
            .zip(&self.slots)
            .find(|(param, slot)| param.is_required() && slot.is_none())
            .map(|(param, _)| param.name())
        {
            return Err(DiError::MissingArgument(format!("'{}'", missing)));
        }

        let BoundArguments {
            slots,
            var_positional,
            var_keyword,
        } = self;
        let mut var_positional = Some(var_positional);
        let mut var_keyword = Some(var_keyword);
        let mut injected = InjectedArgs::default();

        for (param, slot) in params.iter().zip(slots) {
            match param.kind() {
                ParamKind::VarPositional => {
                    for arg in var_positional.take().unwrap_or_default() {
                        injected.var_positional.push(substitute(param.name(), &arg)?);
                    }
                }
                ParamKind::VarKeyword => {
                    for (name, arg) in var_keyword.take().unwrap_or_default() {
                        let value = substitute(&name, &arg)?;
                        injected.var_keyword.insert(name, value);
                    }
                }
                _ => {
                    if let Some(arg) = slot {
                        let value = substitute(param.name(), &arg)?;
                        injected.values.push((param.name().to_string(), value));
                    }
                }
            }
        }

        Ok(injected)
    }
}

fn substitute(name: &str, arg: &Arg) -> DiResult<Value> {
    if arg.is_provider() {
        trace!(parameter = name, "injecting provider value");
    }
    arg.resolve()
}

/// Arguments as the wrapped function receives them, providers resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectedArgs {
    values: Vec<(String, Value)>,
    var_positional: Vec<Value>,
    var_keyword: Map<String, Value>,
}

impl InjectedArgs {
    /// Value bound to a named (non-variadic) parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Deserialize the value bound to `name`.
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> DiResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| DiError::MissingArgument(format!("'{}'", name)))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Named parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn var_positional(&self) -> &[Value] {
        &self.var_positional
    }

    pub fn var_keyword(&self) -> &Map<String, Value> {
        &self.var_keyword
    }
}
