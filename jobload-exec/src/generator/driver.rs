use futures_util::stream::{self, StreamExt};

use jobload_client::JobQueueClient;

use crate::generator::{
    ConnectivityError, ConnectivityGuard, LoadGenerator, PackageContext, PackageResult,
};
use crate::shutdown::Shutdown;

#[derive(Debug, Clone)]
pub struct PackageRun {
    pub result: PackageResult,
    /// Set when the package tripped the connectivity guard; the generator must fail.
    pub connectivity: Option<ConnectivityError>,
}

/// Execute one package, keeping up to `ctx.pipeline_depth` operations in flight.
///
/// Once `shutdown` fires no further operation is dispatched; operations already in flight
/// finish and are counted. When the guard trips, remaining in-flight operations are dropped
/// and the package counts as interrupted even if every operation was attempted.
pub async fn run_package(
    generator: &dyn LoadGenerator,
    client: &dyn JobQueueClient,
    ctx: &PackageContext,
    guard: &mut ConnectivityGuard,
    shutdown: &Shutdown,
) -> PackageRun {
    let mut result = PackageResult::new(ctx.variant, ctx.package_no);
    let mut connectivity = None;

    {
        let reports = stream::iter(0..ctx.package_size)
            .take_while(|_| {
                let go = !shutdown.is_triggered();
                async move { go }
            })
            .map(move |index| async move {
                (index, generator.run_operation(client, ctx, index).await)
            })
            .buffer_unordered(ctx.pipeline_depth.max(1));
        let mut reports = std::pin::pin!(reports);

        while let Some((index, report)) = reports.next().await {
            result.record(index, &report);
            if let Some(err) = guard.observe(&report.outcome) {
                connectivity = Some(err);
                break;
            }
        }
    }

    result.errors.sort_by_key(|e| e.operation);
    result.interrupted = result.attempted < ctx.package_size || connectivity.is_some();
    PackageRun {
        result,
        connectivity,
    }
}
