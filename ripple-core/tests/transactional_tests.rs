use std::sync::{Arc, Mutex};

use ripple_core::{
    Disposable, RippleError, TransactionFailed, TransactionalProcessor, TransactionalSubscriber,
};
use ripple_test_utils::TransactionalRecorder;

#[test]
fn commits_to_every_subscriber() {
    let processor = TransactionalProcessor::<String>::new();
    let first = Arc::new(TransactionalRecorder::new());
    let second = Arc::new(TransactionalRecorder::new());
    processor.subscribe(first.clone());
    processor.subscribe(second.clone());

    processor.submit("test".to_string()).unwrap();

    assert_eq!(first.current(), Some("test".to_string()));
    assert_eq!(second.current(), Some("test".to_string()));
    assert_eq!(first.staged(), None);
    assert_eq!(second.staged(), None);
}

#[test]
fn rejection_rolls_back_the_rejector() {
    let processor = TransactionalProcessor::<String>::new();
    let subject = Arc::new(TransactionalRecorder::new());
    processor.subscribe(subject.clone());

    processor.submit("test".to_string()).unwrap();
    subject.reject(true);
    processor.submit("won't take effect".to_string()).unwrap_err();

    assert_eq!(subject.current(), Some("test".to_string()));
    assert_eq!(subject.staged(), None);
    assert_eq!(subject.rollback_count(), 1);
}

#[test]
fn one_rejection_prevents_all_commits() {
    let processor = TransactionalProcessor::<String>::new();
    let first = Arc::new(TransactionalRecorder::new());
    let second = Arc::new(TransactionalRecorder::new());
    processor.subscribe(first.clone());
    processor.subscribe(second.clone());

    processor.submit("yeet".to_string()).unwrap();
    assert_eq!(first.current(), Some("yeet".to_string()));
    assert_eq!(second.current(), Some("yeet".to_string()));

    first.reject(true);
    let error = processor.submit("next".to_string()).unwrap_err();

    assert!(matches!(error, RippleError::Transaction(_)));
    assert_eq!(first.current(), Some("yeet".to_string()));
    assert_eq!(second.current(), Some("yeet".to_string()));
    assert_eq!(first.staged(), None);
    assert_eq!(second.staged(), None);
    assert_eq!(first.rollback_count(), 1);
    assert_eq!(second.rollback_count(), 1);
    assert_eq!(first.commit_count(), 1);
    assert_eq!(second.commit_count(), 1);
}

#[test]
fn rejector_is_not_evicted() {
    let processor = TransactionalProcessor::<String>::new();
    let first = Arc::new(TransactionalRecorder::new());
    let second = Arc::new(TransactionalRecorder::new());
    processor.subscribe(first.clone());
    processor.subscribe(second.clone());

    first.reject(true);
    processor.submit("rejected".to_string()).unwrap_err();

    assert_eq!(processor.subscriber_count(), 2);
    assert!(processor.has_subscribers());
    assert!(!processor.is_closed());
}

#[test]
fn failed_submission_leaves_the_processor_usable() {
    let processor = TransactionalProcessor::<String>::new();
    let first = Arc::new(TransactionalRecorder::new());
    let second = Arc::new(TransactionalRecorder::new());
    processor.subscribe(first.clone());
    processor.subscribe(second.clone());

    first.reject(true);
    processor.submit("rejected".to_string()).unwrap_err();

    first.reject(false);
    processor.submit("recovered".to_string()).unwrap();

    assert_eq!(first.current(), Some("recovered".to_string()));
    assert_eq!(second.current(), Some("recovered".to_string()));
}

#[test]
fn disposed_subscriber_is_skipped() {
    let processor = TransactionalProcessor::<String>::new();
    let first = Arc::new(TransactionalRecorder::new());
    let second = Arc::new(TransactionalRecorder::new());
    let subscription = processor.subscribe(first.clone());
    processor.subscribe(second.clone());

    processor.submit("yeet".to_string()).unwrap();
    subscription.dispose();
    processor.submit("solo".to_string()).unwrap();

    assert_eq!(first.current(), Some("yeet".to_string()));
    assert_eq!(first.commit_count(), 1);
    assert_eq!(second.current(), Some("solo".to_string()));
    assert_eq!(second.commit_count(), 2);
}

#[test]
fn phases_follow_subscription_order() {
    struct OrderedSubscriber {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl TransactionalSubscriber<i32> for OrderedSubscriber {
        fn begin_transaction(&self, _value: i32) -> Result<(), TransactionFailed> {
            self.log.lock().unwrap().push(format!("{}:begin", self.label));
            Ok(())
        }

        fn commit(&self) -> ripple_core::Result<()> {
            self.log.lock().unwrap().push(format!("{}:commit", self.label));
            Ok(())
        }

        fn rollback(&self) -> ripple_core::Result<()> {
            self.log.lock().unwrap().push(format!("{}:rollback", self.label));
            Ok(())
        }
    }

    let processor = TransactionalProcessor::<i32>::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    processor.subscribe(Arc::new(OrderedSubscriber {
        label: "x",
        log: Arc::clone(&log),
    }));
    processor.subscribe(Arc::new(OrderedSubscriber {
        label: "y",
        log: Arc::clone(&log),
    }));

    processor.submit(1).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["x:begin", "y:begin", "x:commit", "y:commit"]
    );
}

#[test]
fn propose_panic_rolls_everyone_back() {
    struct PanickingProposer;

    impl TransactionalSubscriber<i32> for PanickingProposer {
        fn begin_transaction(&self, _value: i32) -> Result<(), TransactionFailed> {
            panic!("cannot stage");
        }

        fn commit(&self) -> ripple_core::Result<()> {
            Ok(())
        }

        fn rollback(&self) -> ripple_core::Result<()> {
            Ok(())
        }
    }

    let processor = TransactionalProcessor::<i32>::new();
    let healthy = Arc::new(TransactionalRecorder::new());
    processor.subscribe(Arc::new(PanickingProposer));
    processor.subscribe(healthy.clone());

    let error = processor.submit(1).unwrap_err();

    assert!(matches!(error, RippleError::Transaction(_)));
    assert_eq!(healthy.current(), None);
    assert_eq!(healthy.staged(), None);
    assert_eq!(healthy.rollback_count(), 1);
    assert_eq!(processor.subscriber_count(), 2);
}

#[test]
fn commit_failure_evicts_only_the_failer() {
    struct CommitBomb;

    impl TransactionalSubscriber<i32> for CommitBomb {
        fn begin_transaction(&self, _value: i32) -> Result<(), TransactionFailed> {
            Ok(())
        }

        fn commit(&self) -> ripple_core::Result<()> {
            Err(RippleError::delivery_msg("commit blew up"))
        }

        fn rollback(&self) -> ripple_core::Result<()> {
            Ok(())
        }
    }

    let processor = TransactionalProcessor::<i32>::new();
    let healthy = Arc::new(TransactionalRecorder::new());
    processor.subscribe(Arc::new(CommitBomb));
    processor.subscribe(healthy.clone());

    processor.submit(1).unwrap();

    assert_eq!(healthy.current(), Some(1));
    assert_eq!(processor.subscriber_count(), 1);

    processor.submit(2).unwrap();
    assert_eq!(healthy.current(), Some(2));
}

#[test]
fn closed_transactional_processor_rejects_subscribers() {
    let processor = TransactionalProcessor::<i32>::new();
    processor.close();

    let late = Arc::new(TransactionalRecorder::new());
    processor.subscribe(late.clone());

    assert_eq!(late.errors().len(), 1);
    assert!(late.errors()[0].contains("closed"));
}

#[test]
fn close_notifies_transactional_subscribers() {
    let processor = TransactionalProcessor::<i32>::new();
    let subject = Arc::new(TransactionalRecorder::new());
    processor.subscribe(subject.clone());

    processor.submit(1).unwrap();
    processor.close();

    assert!(processor.is_closed());
    assert_eq!(processor.subscriber_count(), 0);
    assert_eq!(subject.current(), Some(1));
}

#[test]
fn accept_applies_a_value_directly() {
    let subject = TransactionalRecorder::new();

    subject.accept(4).unwrap();
    assert_eq!(subject.current(), Some(4));
    assert_eq!(subject.commit_count(), 1);

    subject.reject(true);
    let error = subject.accept(5).unwrap_err();

    assert!(matches!(error, RippleError::Transaction(_)));
    assert_eq!(subject.current(), Some(4));
    assert_eq!(subject.rollback_count(), 1);
}
