//! Parallel collection over independent root sets.

use mpgen_ir::{MetadataSnapshot, TypeRef};
use mpgen_schema::{CancellationFlag, CollectError, Collector, CollectorOptions, SchemaModel};
use rayon::prelude::*;

/// Initial stack of each worker thread; deeper graphs grow it on demand.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Collect every root set on its own closure and merge the models in set
/// order.
///
/// When a set fails, the sets after it are cancelled. The error reported is
/// the one from the earliest failing set, independent of scheduling.
#[tracing::instrument(level = "debug", skip_all, fields(sets = sets.len()))]
pub fn collect_sets(
    snapshot: &MetadataSnapshot,
    options: &CollectorOptions,
    sets: &[Vec<TypeRef>],
) -> Result<SchemaModel, CollectError> {
    let flags: Vec<CancellationFlag> = sets.iter().map(|_| CancellationFlag::new()).collect();

    let run = |(index, roots): (usize, &Vec<TypeRef>)| {
        let mut collector = Collector::new(snapshot, options);
        if let Some(flag) = flags.get(index) {
            collector = collector.with_cancellation(flag.clone());
        }
        let result = collector.collect(roots);
        if let Err(err) = &result {
            tracing::debug!(set = index, error = %err, "root set failed");
            for later in flags.iter().skip(index + 1) {
                later.cancel();
            }
        }
        result
    };

    let results: Vec<Result<SchemaModel, CollectError>> = rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK_SIZE)
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| sets.par_iter().enumerate().map(&run).collect())
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), collecting sequentially");
            sets.iter().enumerate().map(&run).collect()
        });

    let mut merged = SchemaModel::default();
    for result in results {
        merged.merge(result?);
    }
    Ok(merged)
}
