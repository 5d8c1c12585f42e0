//! Rule safety validation.
//!
//! A rule is safe iff every universal head variable and every variable of a
//! negated body literal also occurs in some positive body literal. On top of
//! that, existential variables are head-only and no name may be used with
//! both quantifiers in one rule.
//!
//! Stratification of negation is not checked here; that is left to the
//! reasoning engine.

use std::collections::HashSet;

use crate::error::ModelError;
use crate::model::{Conjunction, Literal, LiteralKind, PositiveLiteral, Variable};

/// Checks the safety conditions of a head/body pair.
///
/// Checks run in this order and the first violation is reported, scanning
/// literals and arguments left to right:
/// 1. existential variables in the body
/// 2. universal head variables missing from the positive body
/// 3. negated-literal variables missing from the positive body
/// 4. names used with both quantifiers
///
/// # Errors
///
/// Returns [`ModelError::ExistentialInBody`],
/// [`ModelError::UnsafeHeadVariable`], [`ModelError::UnsafeNegatedVariable`]
/// or [`ModelError::UniversalExistentialClash`].
pub fn check_rule(
    head: &Conjunction<PositiveLiteral>,
    body: &Conjunction<Literal>,
) -> Result<(), ModelError> {
    if let Some(v) = body
        .iter()
        .flat_map(|l| l.atom().variables())
        .find(|v| v.is_existential())
    {
        return Err(ModelError::ExistentialInBody(v.clone()));
    }

    let positive = positive_body_variables(body);

    if let Some(v) = head
        .iter()
        .flat_map(|l| l.atom().variables())
        .find(|v| v.is_universal() && !positive.contains(v))
    {
        return Err(ModelError::UnsafeHeadVariable(v.clone()));
    }

    if let Some(v) = body
        .iter()
        .filter(|l| l.is_negated())
        .flat_map(|l| l.atom().variables())
        .find(|v| !positive.contains(v))
    {
        return Err(ModelError::UnsafeNegatedVariable(v.clone()));
    }

    let universal_names: HashSet<&str> = head
        .iter()
        .map(LiteralKind::atom)
        .chain(body.iter().map(LiteralKind::atom))
        .flat_map(|a| a.variables())
        .filter(|v| v.is_universal())
        .map(Variable::name)
        .collect();
    if let Some(v) = head
        .iter()
        .flat_map(|l| l.atom().variables())
        .find(|v| v.is_existential() && universal_names.contains(v.name()))
    {
        return Err(ModelError::UniversalExistentialClash(v.name().to_owned()));
    }

    Ok(())
}

/// Union of the variables of all positive body literals.
fn positive_body_variables(body: &Conjunction<Literal>) -> HashSet<&Variable> {
    body.iter()
        .filter(|l| !l.is_negated())
        .flat_map(|l| l.atom().variables())
        .collect()
}
