//! Forward worklist dataflow driver.
//!
//! # Algorithm
//!
//! 1. Every value starts `Unknown`, except entry-block parameters, which
//!    start from their pessimistic (hint-derived) fact.
//! 2. Every operation is queued in block order, and every block whose
//!    terminator forwards arguments is queued as an edge.
//! 3. Pop items until the queue is empty:
//!    - **Operation**: skipped while any operand is `Unknown`. Otherwise the
//!      registry computes a candidate. A give-up candidate pins every result
//!      to its pessimistic fact for good. A known candidate is merged into
//!      each result; every changed result queues its users.
//!    - **Edge**: each known forwarded argument is merged into the matching
//!      parameter of the successor block; changed parameters queue their
//!      users.
//!
//! Merging only lowers per-dimension `gcd`s and drops constants, so each
//! value changes finitely often and the queue drains.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tile_ir::{BlockId, Function, OpRef, Use, UseMap, ValueId};

use crate::lattice::AxisInfo;
use crate::options::AnalysisOptions;
use crate::query::AxisFacts;
use crate::registry::{Registry, RuleCtx};

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Operations taken off the queue, including skipped ones.
    pub op_visits: usize,
    /// Terminator edges taken off the queue.
    pub edge_visits: usize,
    /// Times a value's fact changed.
    pub value_updates: usize,
}

/// Axis-info analysis with its rule table and options.
///
/// One instance can analyze any number of functions; `analyze` takes
/// `&self` and keeps all per-run state local.
#[derive(Debug, Default)]
pub struct AxisInfoAnalysis {
    registry: Registry,
    options: AnalysisOptions,
}

impl AxisInfoAnalysis {
    /// Built-in rules, default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze with a caller-supplied rule table.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            options: AnalysisOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registering extra rules before analyzing.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Run to fixpoint over `func`.
    pub fn analyze(&self, func: &Function) -> AxisFacts {
        tracing::debug!(
            function = %func.name,
            num_blocks = func.blocks.len(),
            num_values = func.num_values(),
            "computing axis info"
        );

        let mut solver = Solver::new(self, func);
        solver.seed();
        solver.run();

        tracing::debug!(
            function = %func.name,
            op_visits = solver.stats.op_visits,
            edge_visits = solver.stats.edge_visits,
            value_updates = solver.stats.value_updates,
            "axis info converged"
        );

        AxisFacts::new(solver.facts, solver.stats)
    }
}

/// Analyze `func` with the built-in rules and default options.
pub fn analyze(func: &Function) -> AxisFacts {
    AxisInfoAnalysis::new().analyze(func)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum WorkItem {
    Op(OpRef),
    /// The terminator of this block.
    Edge(BlockId),
}

/// Per-run state.
struct Solver<'a> {
    analysis: &'a AxisInfoAnalysis,
    func: &'a Function,
    users: UseMap,
    facts: Vec<AxisInfo>,
    /// Values pinned to their pessimistic fact; never merged into again.
    pinned: Vec<bool>,
    worklist: VecDeque<WorkItem>,
    queued: FxHashSet<WorkItem>,
    stats: AnalysisStats,
}

impl<'a> Solver<'a> {
    fn new(analysis: &'a AxisInfoAnalysis, func: &'a Function) -> Self {
        let num_values = func.num_values();
        Self {
            analysis,
            func,
            users: func.users(),
            facts: vec![AxisInfo::Unknown; num_values],
            pinned: vec![false; num_values],
            worklist: VecDeque::new(),
            queued: FxHashSet::default(),
            stats: AnalysisStats::default(),
        }
    }

    fn seed(&mut self) {
        let func = self.func;
        for &param in &func.entry_block().params {
            self.facts[param.index()] = AxisInfo::pessimistic(func, param);
        }
        for at in func.op_refs() {
            self.enqueue(WorkItem::Op(at));
        }
        for block in &func.blocks {
            let forwards = block
                .terminator
                .successors()
                .iter()
                .any(|(_, args)| !args.is_empty());
            if forwards {
                self.enqueue(WorkItem::Edge(block.id));
            }
        }
    }

    fn enqueue(&mut self, item: WorkItem) {
        if self.queued.insert(item) {
            self.worklist.push_back(item);
        }
    }

    fn run(&mut self) {
        while let Some(item) = self.worklist.pop_front() {
            self.queued.remove(&item);
            match item {
                WorkItem::Op(at) => self.visit_op(at),
                WorkItem::Edge(block) => self.visit_edge(block),
            }
        }
    }

    fn visit_op(&mut self, at: OpRef) {
        self.stats.op_visits += 1;
        let func = self.func;
        let op = func.op(at);
        if op.results.iter().all(|r| self.pinned[r.index()]) {
            return;
        }

        let operands: SmallVec<[AxisInfo; 3]> =
            op.operands.iter().map(|v| self.facts[v.index()].clone()).collect();
        if operands.iter().any(|fact| !fact.is_known()) {
            tracing::trace!(op = %op.kind.code(), block = %at.block, "operands pending");
            return;
        }

        let ctx = RuleCtx {
            func,
            op,
            operands: &operands,
            options: &self.analysis.options,
        };
        let candidate = self.analysis.registry.apply(&ctx);
        tracing::trace!(op = %op.kind.code(), block = %at.block, %candidate, "visited");

        let fits = op
            .results
            .iter()
            .all(|&r| candidate.rank() == Some(func.value_type(r).rank()));
        if !fits {
            if candidate.is_known() {
                tracing::warn!(op = %op.kind.code(), "rule produced a fact of the wrong rank");
            }
            for &result in &op.results {
                self.pin(result);
            }
            return;
        }

        for &result in &op.results {
            self.refine(result, &candidate);
        }
    }

    fn visit_edge(&mut self, block: BlockId) {
        self.stats.edge_visits += 1;
        let func = self.func;
        for (succ, args) in func.block(block).terminator.successors() {
            let params = &func.block(succ).params;
            for (&param, &arg) in params.iter().zip(args) {
                let incoming = self.facts[arg.index()].clone();
                let Some(rank) = incoming.rank() else {
                    continue;
                };
                if rank == func.value_type(param).rank() {
                    self.refine(param, &incoming);
                } else {
                    tracing::warn!(%param, %arg, "block argument disagrees on rank");
                    self.pin(param);
                }
            }
        }
    }

    /// Merge `incoming` into `value`, queueing its users on change.
    fn refine(&mut self, value: ValueId, incoming: &AxisInfo) {
        if self.pinned[value.index()] {
            return;
        }
        let merged = AxisInfo::merge(&self.facts[value.index()], incoming);
        self.update(value, merged);
    }

    /// Fix `value` at its pessimistic fact.
    fn pin(&mut self, value: ValueId) {
        if self.pinned[value.index()] {
            return;
        }
        self.pinned[value.index()] = true;
        let pessimistic = AxisInfo::pessimistic(self.func, value);
        self.update(value, pessimistic);
    }

    fn update(&mut self, value: ValueId, fact: AxisInfo) {
        if self.facts[value.index()] == fact {
            return;
        }
        tracing::trace!(%value, %fact, "updated");
        self.facts[value.index()] = fact;
        self.stats.value_updates += 1;

        let func = self.func;
        let users: SmallVec<[Use; 4]> = self.users.get(value).iter().copied().collect();
        for user in users {
            match user {
                Use::Op(at) => self.enqueue(WorkItem::Op(at)),
                Use::Terminator(block) => {
                    let forwards = func
                        .block(block)
                        .terminator
                        .successors()
                        .iter()
                        .any(|(_, args)| args.contains(&value));
                    if forwards {
                        self.enqueue(WorkItem::Edge(block));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
