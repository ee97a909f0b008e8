use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use jobload_exec::{Event, EventSink};

/// Prints periodic summary lines and generator failures to stderr.
#[derive(Default)]
pub struct ProgressEventSink {
    packages: AtomicU64,
}

impl ProgressEventSink {
    pub fn new() -> Self {
        Self {
            packages: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl EventSink for ProgressEventSink {
    async fn emit(&self, event: Event) {
        match event {
            Event::PackageFinished { .. } => {
                self.packages.fetch_add(1, Ordering::Relaxed);
            }
            Event::Progress { lines, .. } => {
                let packages = self.packages.load(Ordering::Relaxed);
                eprintln!("progress: {packages} packages finished");
                for line in lines {
                    eprintln!("  {line}");
                }
            }
            Event::GeneratorFailed { variant, error, .. } => {
                eprintln!("generator {variant} failed: {error}");
            }
            _ => {}
        }
    }
}
