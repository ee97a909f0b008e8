use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use jobload_core::Variant;
use jobload_exec::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, PackageResult, StopReason,
    TracingEventSink,
};

struct CollectingSink {
    types: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn emit(&self, event: Event) {
        self.types.lock().await.push(event.type_name().to_string());
    }
}

#[tokio::test]
async fn composite_sink_forwards_to_every_sink() {
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    let mut composite = CompositeEventSink::new();
    composite.add(Arc::new(CollectingSink {
        types: first.clone(),
    }));
    composite.add(Arc::new(NoOpEventSink));
    composite.add(Arc::new(TracingEventSink));
    composite.add(Arc::new(CollectingSink {
        types: second.clone(),
    }));

    let run_id = Uuid::new_v4();
    composite
        .emit(Event::GeneratorStarted {
            run_id,
            variant: Variant::SubmitDrop,
        })
        .await;
    composite
        .emit(Event::GeneratorStopped {
            run_id,
            variant: Variant::SubmitDrop,
            reason: StopReason::Completed,
            packages_run: 3,
        })
        .await;

    let expected = vec!["generator.started".to_string(), "generator.stopped".to_string()];
    assert_eq!(*first.lock().await, expected);
    assert_eq!(*second.lock().await, expected);
}

#[test]
fn event_json_carries_type_and_fields() {
    let run_id = Uuid::new_v4();
    let json = Event::GeneratorStopped {
        run_id,
        variant: Variant::BatchSubmitDrop,
        reason: StopReason::Cancelled,
        packages_run: 7,
    }
    .to_json();
    assert_eq!(json["type"], "generator.stopped");
    assert_eq!(json["run_id"], run_id.to_string());
    assert_eq!(json["variant"], "batchSubmitDrop");
    assert_eq!(json["reason"], "cancelled");
    assert_eq!(json["packages_run"], 7);
}

#[test]
fn package_finished_json_embeds_result() {
    let result = PackageResult::new(Variant::SingleFullOkLoop, 4);
    let json = Event::PackageFinished {
        run_id: Uuid::new_v4(),
        result,
    }
    .to_json();
    assert_eq!(json["type"], "package.finished");
    assert_eq!(json["result"]["packageNo"], 4);
    assert_eq!(json["result"]["variant"], "singleFullOkLoop");
    assert_eq!(json["result"]["interrupted"], false);
}
