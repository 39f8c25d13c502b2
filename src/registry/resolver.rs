//! Bounded fixed-point resolution of pending aliases.

use std::collections::{HashMap, HashSet};

use crate::diagnostic::{codes, Diagnostic, Diagnostics};
use crate::types::{PendingAlias, TokenDefinition};

use super::TokenSet;

/// Outcome of alias resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// All definitions, with resolved aliases appended in resolution order.
    pub definitions: TokenSet,
    /// Aliases still pending when the pass budget ran out. These are never
    /// written to the store.
    pub unresolved: Vec<PendingAlias>,
    /// One warning per unresolved alias.
    pub diagnostics: Diagnostics,
}

/// Resolve pending aliases against known definitions.
///
/// The pass budget equals the number of pending aliases. Each pass sweeps the
/// remaining list in order; an alias whose target is now defined is committed
/// (taking the target's kind) and becomes visible to later aliases in the same
/// sweep. Resolution stops when nothing is pending or the budget is spent, so
/// any acyclic chain of up to N aliases resolves whatever its declaration
/// order. Cycles and missing targets are dropped.
pub fn resolve_aliases(pending: Vec<PendingAlias>, mut definitions: TokenSet) -> Resolution {
    let mut pending = pending;
    let mut budget = pending.len();
    let mut pass = 0;

    while !pending.is_empty() && budget > 0 {
        pass += 1;
        let mut resolved = vec![false; pending.len()];

        for (i, alias) in pending.iter().enumerate() {
            if let Some(target) = definitions.get(&alias.target) {
                let kind = target.kind;
                definitions.insert(TokenDefinition::alias(&alias.path, kind, &alias.target));
                resolved[i] = true;
            }
        }

        let mut flags = resolved.into_iter();
        pending.retain(|_| !flags.next().unwrap_or(false));

        tracing::debug!(pass, remaining = pending.len(), "alias resolution pass");
        budget -= 1;
    }

    let diagnostics = unresolved_diagnostics(&pending);

    Resolution {
        definitions,
        unresolved: pending,
        diagnostics,
    }
}

/// Classify each dropped alias by following its chain through the other
/// dropped aliases: a chain that revisits a path is a cycle, one that ends at
/// an undefined path is a missing target.
fn unresolved_diagnostics(unresolved: &[PendingAlias]) -> Diagnostics {
    let by_path: HashMap<&str, &str> = unresolved
        .iter()
        .map(|a| (a.path.as_str(), a.target.as_str()))
        .collect();

    let mut diagnostics = Diagnostics::new();

    for alias in unresolved {
        let reference = alias.target.replace('/', ".");
        let diagnostic = if is_cyclic(alias, &by_path) {
            Diagnostic::warning(
                codes::CYCLIC_ALIAS,
                &alias.path,
                format!("Alias {{{}}} never resolves: circular reference", reference),
            )
            .with_help("Break the reference cycle so the chain ends at a literal value")
        } else {
            Diagnostic::warning(
                codes::MISSING_ALIAS,
                &alias.path,
                format!("Alias {{{}}} never resolves: target does not exist", reference),
            )
        };
        diagnostics.push(diagnostic);
    }

    diagnostics
}

fn is_cyclic(alias: &PendingAlias, by_path: &HashMap<&str, &str>) -> bool {
    let mut visited = HashSet::from([alias.path.as_str()]);
    let mut current = alias.target.as_str();

    loop {
        if !visited.insert(current) {
            return true;
        }
        match by_path.get(current) {
            Some(&next) => current = next,
            None => return false,
        }
    }
}
