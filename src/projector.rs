//! Signature-to-arguments projection.
//!
//! Turns the signature of a selected function into fresh placeholders for a
//! contract-call step: one unbound type parameter per declared generic and
//! one argument per value parameter, minus the implicit `TxContext`.

use serde::Serialize;
use tracing::debug;

use sui_ptb_types::{
    Argument, MoveCallPatch, NormalizedFunction, TypeDescriptor, TypeParameterBinding,
};

/// Placeholders derived from one function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub type_arguments: Vec<TypeParameterBinding>,
    pub arguments: Vec<Argument>,
    /// Declared return types, for display only.
    pub returns: Vec<TypeDescriptor>,
}

impl Projection {
    /// Patch that installs this projection as the call's target function.
    ///
    /// Bindings and arguments replace the previous ones wholesale.
    pub fn to_patch(&self, function: &str) -> MoveCallPatch {
        MoveCallPatch {
            function: Some(function.to_string()),
            type_arguments: Some(self.type_arguments.clone()),
            arguments: Some(self.arguments.clone()),
            ..Default::default()
        }
    }
}

/// Project `function` into type-parameter bindings, arguments and returns.
pub fn project(function: &NormalizedFunction) -> Projection {
    let type_arguments = function
        .type_parameters
        .iter()
        .map(|abilities| TypeParameterBinding::unbound(abilities.clone()))
        .collect();

    let arguments: Vec<Argument> = function
        .parameters
        .iter()
        .filter(|param| !param.is_tx_context())
        .map(|param| Argument::for_parameter(param.clone()))
        .collect();

    debug!(
        parameters = function.parameters.len(),
        arguments = arguments.len(),
        type_parameters = function.type_parameters.len(),
        "projected function signature"
    );

    Projection {
        type_arguments,
        arguments,
        returns: function.return_types.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_ptb_types::{Ability, AbilitySet, ArgumentKind, Visibility};

    fn tx_context() -> TypeDescriptor {
        TypeDescriptor::structure("0x2", "tx_context", "TxContext", vec![])
    }

    fn function(parameters: Vec<TypeDescriptor>) -> NormalizedFunction {
        NormalizedFunction {
            visibility: Visibility::Public,
            is_entry: true,
            type_parameters: vec![],
            parameters,
            return_types: vec![],
        }
    }

    #[test]
    fn test_context_parameter_is_dropped() {
        let f = function(vec![
            TypeDescriptor::mutable_reference(tx_context()),
            TypeDescriptor::scalar("U64"),
        ]);
        let projection = project(&f);
        assert_eq!(projection.arguments.len(), 1);
        assert_eq!(projection.arguments[0].kind, ArgumentKind::Pure);
        assert_eq!(
            projection.arguments[0].declared_type,
            Some(TypeDescriptor::scalar("U64"))
        );
        assert_eq!(projection.arguments[0].raw_values, Some(vec![]));
    }

    #[test]
    fn test_context_dropped_anywhere_and_order_kept() {
        let coin = TypeDescriptor::structure("0x2", "coin", "Coin", vec![]);
        let f = function(vec![
            TypeDescriptor::scalar("Bool"),
            TypeDescriptor::reference(tx_context()),
            coin.clone(),
            TypeDescriptor::mutable_reference(tx_context()),
            TypeDescriptor::vector(TypeDescriptor::scalar("U8")),
        ]);
        let kinds: Vec<ArgumentKind> = project(&f).arguments.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ArgumentKind::Pure, ArgumentKind::Object, ArgumentKind::Pure]
        );
    }

    #[test]
    fn test_by_value_context_is_kept() {
        // only the two reference forms are implicit
        let f = function(vec![tx_context()]);
        assert_eq!(project(&f).arguments.len(), 1);
    }

    #[test]
    fn test_type_parameters_and_returns() {
        let f = NormalizedFunction {
            visibility: Visibility::Public,
            is_entry: false,
            type_parameters: vec![
                AbilitySet::new(vec![Ability::Key, Ability::Store]),
                AbilitySet::default(),
            ],
            parameters: vec![TypeDescriptor::TypeParameter(0)],
            return_types: vec![TypeDescriptor::scalar("U64")],
        };
        let projection = project(&f);
        assert_eq!(projection.type_arguments.len(), 2);
        assert!(projection.type_arguments[0].bound_name.is_empty());
        assert!(projection.type_arguments[0].abilities.contains(Ability::Store));
        assert_eq!(projection.returns, vec![TypeDescriptor::scalar("U64")]);

        let patch = projection.to_patch("swap");
        assert_eq!(patch.function.as_deref(), Some("swap"));
        assert!(patch.package_id.is_none());
        assert!(patch.module.is_none());
    }
}
