//! Transfer-rule registry.
//!
//! A [`Registry`] maps each [`OpCode`] to the [`TransferRule`] that computes
//! the axis fact of that operation's result from its operands' facts. Each
//! analysis instance owns its registry; there is no process-wide table, so
//! independent analyses (one per kernel, possibly on different threads)
//! never share mutable state.
//!
//! Operations without a registered rule produce [`AxisInfo::Unknown`], which
//! the driver turns into the pessimistic fixpoint for their results.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::smallvec;
use tile_ir::{Function, OpCode, Operation, Shape, Ty};

use crate::lattice::{AxisInfo, KnownAxis};
use crate::options::AnalysisOptions;

/// Everything a rule may look at when visiting one operation.
pub struct RuleCtx<'a> {
    pub func: &'a Function,
    pub op: &'a Operation,
    /// Current facts of `op.operands`, in order. The driver only visits an
    /// operation once every operand is known.
    pub operands: &'a [AxisInfo],
    pub options: &'a AnalysisOptions,
}

impl<'a> RuleCtx<'a> {
    /// Known fact of operand `i`; `None` if absent or still unknown.
    pub fn operand(&self, i: usize) -> Option<&'a KnownAxis> {
        self.operands.get(i).and_then(AxisInfo::as_known)
    }

    /// Type of operand `i`.
    pub fn operand_type(&self, i: usize) -> Option<&'a Ty> {
        self.op.operands.get(i).map(|&v| self.func.value_type(v))
    }

    /// Type of the first result.
    pub fn result_type(&self) -> Option<&'a Ty> {
        self.op.result().map(|v| self.func.value_type(v))
    }

    /// Shape of the first result (`[1]` for scalars and result-less ops).
    pub fn result_shape(&self) -> Shape {
        self.result_type().map_or_else(|| smallvec![1], Ty::shape)
    }
}

/// Computes the fact of an operation's result from its operands' facts.
///
/// Returning [`AxisInfo::Unknown`] means "give up": the driver marks every
/// result of the operation pessimistic and never revisits it.
///
/// Closures of type `Fn(&RuleCtx) -> AxisInfo` implement this trait, so
/// ad-hoc rules can be registered without a named type.
pub trait TransferRule: Send + Sync {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo;
}

impl<F> TransferRule for F
where
    F: Fn(&RuleCtx<'_>) -> AxisInfo + Send + Sync,
{
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        self(ctx)
    }
}

/// Operation-kind → rule table.
pub struct Registry {
    rules: FxHashMap<OpCode, Box<dyn TransferRule>>,
}

impl Registry {
    /// A registry with no rules; every operation gives up.
    pub fn empty() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    /// A registry with the built-in rule for every modeled operation kind.
    pub fn with_default_rules() -> Self {
        let mut registry = Self::empty();
        crate::rules::register_defaults(&mut registry);
        registry
    }

    /// Register `rule` for `code`, replacing any earlier rule for it.
    pub fn register(&mut self, code: OpCode, rule: impl TransferRule + 'static) -> &mut Self {
        if self.rules.insert(code, Box::new(rule)).is_some() {
            tracing::debug!(op = %code, "replaced transfer rule");
        }
        self
    }

    /// Remove the rule for `code`, so that kind falls back to pessimistic.
    pub fn unregister(&mut self, code: OpCode) -> &mut Self {
        self.rules.remove(&code);
        self
    }

    pub fn contains(&self, code: OpCode) -> bool {
        self.rules.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the rule registered for `ctx.op`, or give up if there is none.
    pub fn apply(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        match self.rules.get(&ctx.op.kind.code()) {
            Some(rule) => rule.transfer(ctx),
            None => AxisInfo::Unknown,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<OpCode> = self.rules.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("Registry").field("rules", &codes).finish()
    }
}
