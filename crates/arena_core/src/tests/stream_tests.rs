use super::*;
use futures::stream;

fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Vec<u8>, String>> + Unpin {
    let owned: Vec<Result<Vec<u8>, String>> = parts
        .iter()
        .map(|part| Ok(part.as_bytes().to_vec()))
        .collect();
    stream::iter(owned)
}

async fn drain<S>(records: &mut RecordStream<S>) -> Vec<String>
where
    S: Stream<Item = Result<Vec<u8>, String>> + Unpin,
{
    let mut kinds = Vec::new();
    loop {
        match records.next_record().await.expect("pull") {
            Pull::Record(record) => kinds.push(record.kind),
            Pull::Finished => return kinds,
            Pull::Cancelled => panic!("unexpected cancellation"),
        }
    }
}

#[tokio::test]
async fn records_are_pulled_in_arrival_order_across_chunks() {
    let source = chunks(&[
        "data: {\"type\":\"one\"}\n\ndata: {\"ty",
        "pe\":\"two\"}\n",
        "\ndata: {\"type\":\"three\"}",
    ]);
    let mut records = RecordStream::new(source, CancellationToken::new());

    assert_eq!(drain(&mut records).await, vec!["one", "two", "three"]);
    assert_eq!(records.next_record().await.expect("pull"), Pull::Finished);
}

#[tokio::test]
async fn cancellation_before_a_read_is_a_distinct_outcome() {
    let cancel = CancellationToken::new();
    let mut records = RecordStream::new(chunks(&["data: {\"type\":\"one\"}\n\n"]), cancel.clone());

    cancel.cancel();

    assert_eq!(records.next_record().await.expect("pull"), Pull::Cancelled);
    assert!(records.cancellation().is_cancelled());
}

#[tokio::test]
async fn already_decoded_records_are_delivered_before_cancellation() {
    let cancel = CancellationToken::new();
    let source = chunks(&["data: {\"type\":\"one\"}\n\ndata: {\"type\":\"two\"}\n\n"]);
    let mut records = RecordStream::new(source, cancel.clone());

    let Pull::Record(first) = records.next_record().await.expect("first") else {
        panic!("expected a record");
    };
    assert_eq!(first.kind, "one");

    cancel.cancel();
    let Pull::Record(second) = records.next_record().await.expect("second") else {
        panic!("buffered record should not be lost");
    };
    assert_eq!(second.kind, "two");
    assert_eq!(records.next_record().await.expect("third"), Pull::Cancelled);
}

#[tokio::test]
async fn cancellation_interrupts_a_pending_read() {
    let cancel = CancellationToken::new();
    let mut records = RecordStream::new(
        stream::pending::<Result<Vec<u8>, String>>(),
        cancel.clone(),
    );

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();
    });

    assert_eq!(records.next_record().await.expect("pull"), Pull::Cancelled);
}

#[tokio::test]
async fn source_error_surfaces_as_transport_failure() {
    let source = stream::iter(vec![
        Ok(b"data: {\"type\":\"one\"}\n\n".to_vec()),
        Err("connection reset".to_string()),
    ]);
    let mut records = RecordStream::new(source, CancellationToken::new());

    assert!(matches!(
        records.next_record().await.expect("first"),
        Pull::Record(_)
    ));
    let err = records.next_record().await.expect_err("transport failure");
    assert!(matches!(err, SessionError::Transport { status: None, .. }));
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn malformed_frame_surfaces_as_decode_failure() {
    let mut records = RecordStream::new(chunks(&["data: {oops}\n\n"]), CancellationToken::new());

    let err = records.next_record().await.expect_err("decode failure");
    assert!(matches!(err, SessionError::FrameDecode(_)));
    assert!(err.is_stream_failure());
}
