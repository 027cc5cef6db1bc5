use super::*;
use std::io::Cursor;

#[tokio::test]
async fn round_trips_a_value_through_one_buffer() {
    let mut buf = Vec::new();
    write_frame(&mut buf, &vec!["a", "b", "c"]).await.unwrap();

    let mut cursor = Cursor::new(buf);
    let value: Vec<String> = read_frame(&mut cursor).await.unwrap();
    assert_eq!(value, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn reading_past_end_of_stream_is_closed() {
    let mut cursor = Cursor::new(Vec::new());
    let err = read_frame::<_, String>(&mut cursor).await.unwrap_err();
    assert!(matches!(err, WireError::Closed));
}

#[tokio::test]
async fn oversized_frame_prefix_is_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(MAX_FRAME_BYTES + 1).to_be_bytes());
    let mut cursor = Cursor::new(buf);
    let err = read_frame::<_, String>(&mut cursor).await.unwrap_err();
    assert!(matches!(err, WireError::FrameTooLarge(_)));
}
