//! Unit conversion over a product's rule catalog.
//!
//! Resolution is best-effort: anything that cannot be resolved yields an
//! [`ConversionFactor::Unconvertible`] whose multiplier is exactly `0.0`, so a
//! stock total can always be computed. Callers that need exact conversion must
//! validate the catalog upstream.

use serde::{Deserialize, Serialize};

use stockroom_core::UnitId;

use crate::unit::ConversionRule;

/// Why a factor could not be resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unconvertible {
    /// Source or target unit is not set.
    MissingUnit,
    /// No rule starts at the source unit.
    NoRuleFromSource,
    /// A rule starts at the source unit, but neither it nor a single further
    /// hop reaches the target.
    NoPath,
    /// A rule with an unset unit was inspected during the lookup.
    MalformedRule,
}

impl core::fmt::Display for Unconvertible {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Unconvertible::MissingUnit => "source or target unit missing",
            Unconvertible::NoRuleFromSource => "no conversion rule from source unit",
            Unconvertible::NoPath => "no conversion path within two hops",
            Unconvertible::MalformedRule => "malformed conversion rule",
        };
        f.write_str(msg)
    }
}

/// Outcome of a factor lookup.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionFactor {
    Convertible(f64),
    Unconvertible(Unconvertible),
}

impl ConversionFactor {
    /// Multiplicative factor; `0.0` when unconvertible.
    pub fn multiplier(&self) -> f64 {
        match self {
            ConversionFactor::Convertible(f) => *f,
            ConversionFactor::Unconvertible(_) => 0.0,
        }
    }

    pub fn is_convertible(&self) -> bool {
        matches!(self, ConversionFactor::Convertible(_))
    }
}

/// Resolve the factor converting a quantity from `source` into `target`.
///
/// - identical units resolve to exactly `1.0` without consulting `rules`
/// - otherwise the first rule (in list order) starting at `source` is taken;
///   if it ends at `target` its factor is returned
/// - else exactly one more hop is tried: the first rule from that rule's
///   target to `target`, giving the product of both factors
///
/// Rules are directional and never inverted. Chains longer than two hops are
/// not followed. A rule with an unset unit that is inspected before a match
/// makes the whole lookup [`Unconvertible::MalformedRule`].
pub fn resolve_factor(
    rules: &[ConversionRule],
    source: Option<UnitId>,
    target: Option<UnitId>,
) -> ConversionFactor {
    let (Some(source), Some(target)) = (source, target) else {
        return ConversionFactor::Unconvertible(Unconvertible::MissingUnit);
    };

    if source == target {
        return ConversionFactor::Convertible(1.0);
    }

    let first = match find_rule(rules, |from, _| Ok(from == source)) {
        Ok(Some(rule)) => rule,
        Ok(None) => return ConversionFactor::Unconvertible(Unconvertible::NoRuleFromSource),
        Err(reason) => return ConversionFactor::Unconvertible(reason),
    };

    let Some(intermediate) = first.to_unit else {
        return ConversionFactor::Unconvertible(Unconvertible::MalformedRule);
    };
    if intermediate == target {
        return ConversionFactor::Convertible(first.factor);
    }

    let second = find_rule(rules, |from, to| {
        if from != intermediate {
            return Ok(false);
        }
        to.map(|to| to == target).ok_or(Unconvertible::MalformedRule)
    });

    match second {
        Ok(Some(rule)) => ConversionFactor::Convertible(first.factor * rule.factor),
        Ok(None) => ConversionFactor::Unconvertible(Unconvertible::NoPath),
        Err(reason) => ConversionFactor::Unconvertible(reason),
    }
}

/// First rule satisfying `pred`, in list order. Rules without a source unit
/// abort the scan.
fn find_rule<F>(rules: &[ConversionRule], pred: F) -> Result<Option<&ConversionRule>, Unconvertible>
where
    F: Fn(UnitId, Option<UnitId>) -> Result<bool, Unconvertible>,
{
    for rule in rules {
        let from = rule.from_unit.ok_or(Unconvertible::MalformedRule)?;
        if pred(from, rule.to_unit)? {
            return Ok(Some(rule));
        }
    }
    Ok(None)
}
