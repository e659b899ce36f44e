//! Axis-info analysis for the Tile compiler.
//!
//! For every integer or pointer value of a kernel, this crate derives
//! per-dimension guarantees that code generation uses to pick memory
//! access widths:
//!
//! - **Lattice** ([`AxisInfo`], [`KnownAxis`]): contiguity, divisibility,
//!   and constancy per dimension plus an optional exact constant, joined by
//!   per-dimension `gcd`.
//!
//! - **Rules** ([`Registry`], [`TransferRule`], [`rules`]): one transfer
//!   rule per operation kind, looked up by [`tile_ir::OpCode`]. Callers can
//!   add or replace rules before analyzing.
//!
//! - **Driver** ([`AxisInfoAnalysis`], [`analyze`]): a forward worklist
//!   fixpoint over the function's blocks and block arguments.
//!
//! - **Queries** ([`AxisFacts`]): pointer alignment, vector width, and mask
//!   alignment along a tensor's most contiguous dimension.
//!
//! # Example
//!
//! ```
//! use tile_ir::{FunctionBuilder, OpKind, ScalarTy, Ty};
//!
//! let mut b = FunctionBuilder::new("offsets");
//! let base = b.param_with_divisibility(Ty::Scalar(ScalarTy::I32), 16);
//! let range = b.make_range(0, 128);
//! let splat = b.splat(base, &[128]);
//! let offsets = b.binary(OpKind::AddI, splat, range);
//! b.ret(&[offsets]);
//! let func = b.finish().unwrap();
//!
//! let facts = tile_axis::analyze(&func);
//! assert_eq!(facts.pointer_alignment(&func, offsets), 16);
//! ```

mod driver;
mod lattice;
pub mod math;
mod options;
mod query;
mod registry;
pub mod rules;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use driver::{analyze, AnalysisStats, AxisInfoAnalysis};
pub use lattice::{AxisInfo, DimVec, KnownAxis};
pub use options::{AnalysisOptions, VALIDATE_CASTS_ENV};
pub use query::AxisFacts;
pub use registry::{Registry, RuleCtx, TransferRule};
pub use rules::BinaryTransfer;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for debug output.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
/// Enable with `RUST_LOG=tile_axis=debug` or `RUST_LOG=tile_axis=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
